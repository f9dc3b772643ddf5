//! Target update: ends the game once health runs out.

use hecs::{Entity, World};

use horde_core::components::Player;
use horde_core::enums::TargetMode;

pub fn update(entity: Entity, world: &World) {
    let Ok(mut player) = world.get::<&mut Player>(entity) else {
        return;
    };
    if player.mode == TargetMode::Playing && player.health <= 0.0 {
        player.mode = TargetMode::GameOver;
        log::info!("target is down, game over");
    }
}
