#[cfg(test)]
mod tests {
    use glam::{DVec2, DVec3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use horde_core::components::Agent;
    use horde_core::config::AgentTuning;
    use horde_core::constants::*;
    use horde_core::enums::{AgentKind, AnimState, SoundCue, TargetMode};
    use horde_core::types::FrameContext;

    use crate::anim::AnimationStateMachine;
    use crate::behavior::{run_agent, AgentContext, AgentEffect, AgentUpdate};
    use crate::exclusion::{can_move_to, Peer};
    use crate::profiles::AnimationProfile;

    const SELF_ID: u32 = 1;

    fn machine(initial: AnimState) -> AnimationStateMachine {
        AnimationStateMachine::new(initial, AnimationProfile::default())
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn peer(id: u32, x: f64, z: f64) -> Peer<u32> {
        Peer {
            id,
            position: DVec2::new(x, z),
        }
    }

    /// Step the agent one frame toward a target at the origin.
    fn step(
        agent: &mut Agent,
        machine: &mut AnimationStateMachine,
        position: DVec3,
        peers: &[Peer<u32>],
        time: f64,
        frame_time: f64,
    ) -> AgentUpdate {
        step_with_mode(agent, machine, position, peers, time, frame_time, TargetMode::Playing)
    }

    fn step_with_mode(
        agent: &mut Agent,
        machine: &mut AnimationStateMachine,
        position: DVec3,
        peers: &[Peer<u32>],
        time: f64,
        frame_time: f64,
        target_mode: TargetMode,
    ) -> AgentUpdate {
        let tuning = AgentTuning::default();
        let ctx = AgentContext {
            id: SELF_ID,
            position,
            target_position: DVec3::ZERO,
            target_mode,
            peers,
            frame: FrameContext::at(0, time, frame_time),
            tuning: &tuning,
        };
        run_agent(agent, machine, &ctx, &mut rng())
    }

    fn sounds(update: &AgentUpdate, cue: SoundCue) -> usize {
        update
            .effects
            .iter()
            .filter(|e| matches!(e, AgentEffect::PlaySound { cue: c, .. } if *c == cue))
            .count()
    }

    fn damage(update: &AgentUpdate) -> Option<f64> {
        update.effects.iter().find_map(|e| match e {
            AgentEffect::DamageTarget { amount } => Some(*amount),
            _ => None,
        })
    }

    // ---- Animation state machine ----

    #[test]
    fn test_looping_progress_returns_after_one_period() {
        for (state, steps, dt) in [
            (AnimState::Idle, 8, 0.25),
            (AnimState::Running, 8, 0.1),
            (AnimState::Attacking, 7, 1.167 / 7.0),
        ] {
            let mut m = machine(state);
            m.set_animation_progress(state, 0.3);
            for _ in 0..steps {
                m.update(dt, state);
            }
            let p = m.current_state_animation_progress();
            assert!((p - 0.3).abs() < 1e-9, "{state:?} progress {p} after one period");
            assert!((0.0..1.0).contains(&p));
        }
    }

    #[test]
    fn test_terminal_progress_clamps_and_never_decreases() {
        let mut m = machine(AnimState::Dying);
        m.set_animation_progress(AnimState::Dying, DYING_START_PROGRESS);
        let mut last = m.current_state_animation_progress();
        for _ in 0..30 {
            m.update(0.1, AnimState::Dying);
            let p = m.current_state_animation_progress();
            assert!(p >= last, "terminal progress went from {last} to {p}");
            assert!(p <= 1.0);
            last = p;
        }
        assert_eq!(last, 1.0);
        assert!(!m.is_transitioning_animation_states());
    }

    #[test]
    fn test_idle_to_running_transition_timing() {
        let mut m = machine(AnimState::Idle);
        for _ in 0..3 {
            m.update(0.1, AnimState::Running);
        }
        assert!(m.is_transitioning_animation_states());
        assert_eq!(m.current_animation_state(), AnimState::Idle);
        assert!((m.blend_weight() - 0.6).abs() < 1e-9, "weight {}", m.blend_weight());

        for _ in 0..2 {
            m.update(0.1, AnimState::Running);
        }
        assert!(!m.is_transitioning_animation_states());
        assert_eq!(m.current_animation_state(), AnimState::Running);
        assert_eq!(m.blend_weight(), 1.0);
    }

    #[test]
    fn test_blend_weight_bounded_and_reaches_one_on_completion() {
        let mut m = machine(AnimState::Idle);
        let mut previous = 0.0;
        loop {
            m.update(0.07, AnimState::Attacking);
            let w = m.blend_weight();
            assert!((0.0..=1.0).contains(&w));
            if !m.is_transitioning_animation_states() {
                assert_eq!(w, 1.0);
                break;
            }
            assert!(w < 1.0, "weight hit 1 while still transitioning");
            assert!(w > previous);
            previous = w;
        }
        assert_eq!(m.current_animation_state(), AnimState::Attacking);
    }

    #[test]
    fn test_same_target_mid_transition_does_not_restart() {
        let mut m = machine(AnimState::Idle);
        m.update(0.1, AnimState::Running);
        m.update(0.1, AnimState::Running);
        let t = m.transition().unwrap();
        assert_eq!(t.from, AnimState::Idle);
        assert_eq!(t.to, AnimState::Running);
        assert!((t.elapsed - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_new_target_mid_transition_waits_for_completion() {
        let mut m = machine(AnimState::Idle);
        m.update(0.2, AnimState::Running);
        // Changed our mind: the blend to Running still finishes first.
        m.update(0.2, AnimState::Attacking);
        assert_eq!(m.transition().unwrap().to, AnimState::Running);
        m.update(0.1, AnimState::Attacking);
        assert_eq!(m.current_animation_state(), AnimState::Running);
        assert!(!m.is_transitioning_animation_states());

        // Honored on the very next update.
        m.update(0.1, AnimState::Attacking);
        let t = m.transition().unwrap();
        assert_eq!(t.from, AnimState::Running);
        assert_eq!(t.to, AnimState::Attacking);
    }

    #[test]
    fn test_dying_interrupts_transition() {
        let mut m = machine(AnimState::Idle);
        m.update(0.2, AnimState::Running);
        m.update(0.1, AnimState::Dying);

        let t = m.transition().unwrap();
        assert_eq!(t.to, AnimState::Dying);
        assert_eq!(t.from, AnimState::Idle);
        assert!((t.elapsed - 0.1).abs() < 1e-12, "blend restarted for the death clip");

        m.update(0.4, AnimState::Dying);
        assert_eq!(m.current_animation_state(), AnimState::Dying);
        assert!(!m.is_transitioning_animation_states());
    }

    #[test]
    fn test_nothing_leaves_terminal_state() {
        let mut m = machine(AnimState::Dying);
        for target in [AnimState::Idle, AnimState::Running, AnimState::Attacking] {
            m.update(0.1, target);
            assert_eq!(m.current_animation_state(), AnimState::Dying);
            assert!(!m.is_transitioning_animation_states());
        }
    }

    #[test]
    fn test_per_state_progress_survives_excursion() {
        let mut m = machine(AnimState::Running);
        m.update(0.2, AnimState::Running);
        let running = m.animation_progress(AnimState::Running);

        // Go idle for a while, then come back.
        m.update(0.5, AnimState::Idle);
        assert_eq!(m.current_animation_state(), AnimState::Idle);
        let while_idle = m.animation_progress(AnimState::Running);
        for _ in 0..10 {
            m.update(0.1, AnimState::Idle);
        }
        assert_eq!(m.animation_progress(AnimState::Running), while_idle);
        assert!(while_idle != 0.0 && running != 0.0);
    }

    #[test]
    fn test_desynchronized_machine_starts_idle() {
        let m = AnimationStateMachine::desynchronized(AnimationProfile::default(), &mut rng());
        assert_eq!(m.current_animation_state(), AnimState::Idle);
        assert_eq!(m.animation_progress(AnimState::Dying), DYING_START_PROGRESS);
        for state in [AnimState::Idle, AnimState::Running, AnimState::Attacking] {
            assert!((0.0..1.0).contains(&m.animation_progress(state)));
        }
    }

    // ---- Exclusion ----

    #[test]
    fn test_exclusion_threshold() {
        let peers = [peer(9, 0.0, 0.0)];
        // Squared distance 0.5 is too close, 2.0 is fine.
        assert!(!can_move_to(DVec2::new(0.5, 0.5), &peers, None, MIN_SEPARATION_SQ));
        assert!(can_move_to(DVec2::new(1.0, 1.0), &peers, None, MIN_SEPARATION_SQ));
        // Exactly at the threshold is allowed.
        assert!(can_move_to(DVec2::new(1.0, 0.0), &peers, None, MIN_SEPARATION_SQ));
    }

    #[test]
    fn test_exclusion_skips_self_by_identity() {
        let peers = [peer(SELF_ID, 0.0, 0.0), peer(2, 5.0, 5.0)];
        assert!(can_move_to(DVec2::new(0.1, 0.0), &peers, Some(&SELF_ID), 1.0));
        // Without identity the agent would block itself.
        assert!(!can_move_to(DVec2::new(0.1, 0.0), &peers, None, 1.0));
    }

    #[test]
    fn test_exclusion_checks_peers_sharing_a_position() {
        // Two different peers at the same spot; excluding one still leaves the other.
        let peers = [peer(2, 0.0, 0.0), peer(3, 0.0, 0.0)];
        assert!(!can_move_to(DVec2::new(0.2, 0.0), &peers, Some(&2), 1.0));
        assert!(!can_move_to(DVec2::new(0.2, 0.0), &peers, Some(&3), 1.0));
    }

    #[test]
    fn test_exclusion_independent_of_peer_order() {
        let mut peers = vec![peer(2, 3.0, 0.0), peer(3, 0.0, 3.0), peer(4, -0.5, 0.0)];
        let candidates = [DVec2::ZERO, DVec2::new(3.0, 3.0), DVec2::new(2.5, 0.0)];
        let expected: Vec<bool> = candidates
            .iter()
            .map(|c| can_move_to(*c, &peers, Some(&SELF_ID), 1.0))
            .collect();
        peers.reverse();
        peers.swap(0, 1);
        for (c, want) in candidates.iter().zip(expected) {
            assert_eq!(can_move_to(*c, &peers, Some(&SELF_ID), 1.0), want);
        }
    }

    #[test]
    fn test_exclusion_empty_peers() {
        assert!(can_move_to::<u32>(DVec2::ZERO, &[], None, 1.0));
    }

    // ---- Walker controller ----

    #[test]
    fn test_walker_beyond_leash_dies_and_leaves() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Idle);
        let before = m.clone();
        let position = DVec3::new(150.0, 0.0, 0.0);

        let update = step(&mut agent, &mut m, position, &[], 3.0, 0.1);

        assert!(update.despawns());
        assert!(!agent.alive);
        assert_eq!(agent.death_time, Some(3.0));
        assert_eq!(update.position, position);
        assert_eq!(m, before, "frame stops before the animation advances");
    }

    #[test]
    fn test_walker_moves_toward_target() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Idle);
        let position = DVec3::new(10.0, 0.5, 0.0);
        let peers = [peer(SELF_ID, 10.0, 0.0)];

        let update = step(&mut agent, &mut m, position, &peers, 1.0, 0.1);

        let expected_x = 10.0 - WALKER_SPEED * 0.1;
        assert!((update.position.x - expected_x).abs() < 1e-12);
        assert_eq!(update.position.y, 0.5, "height is kept");
        assert_eq!(update.position.z, 0.0);
        assert!(update.yaw.is_some());
        assert_eq!(m.transition().unwrap().to, AnimState::Running);
    }

    #[test]
    fn test_walker_blocked_by_peer_stays_idle() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Idle);
        let position = DVec3::new(10.0, 0.0, 0.0);
        let peers = [peer(SELF_ID, 10.0, 0.0), peer(2, 9.5, 0.0)];

        let update = step(&mut agent, &mut m, position, &peers, 1.0, 0.1);

        assert_eq!(update.position, position);
        assert_eq!(m.current_animation_state(), AnimState::Idle);
        assert!(!m.is_transitioning_animation_states());
        assert!(update.yaw.is_some(), "orientation still tracks the target");
    }

    #[test]
    fn test_walker_overshoots_on_long_frames() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Idle);

        let update = step(&mut agent, &mut m, DVec3::new(10.0, 0.0, 0.0), &[], 100.0, 100.0);

        // 1.875 m/s for 100 s from 10 m out lands 177.5 m past the target.
        assert!((update.position.x + 177.5).abs() < 1e-9, "got {}", update.position.x);
    }

    #[test]
    fn test_walker_in_range_attacks_and_growls_on_cooldown() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Idle);
        let position = DVec3::new(1.0, 0.0, 0.0);

        let first = step(&mut agent, &mut m, position, &[], 0.0, 0.1);
        assert_eq!(sounds(&first, SoundCue::Proximity), 1);
        assert_eq!(first.position, position, "no movement while attacking");
        assert_eq!(m.transition().unwrap().to, AnimState::Attacking);

        let second = step(&mut agent, &mut m, position, &[], 1.0, 0.1);
        assert_eq!(sounds(&second, SoundCue::Proximity), 0);

        let later = step(&mut agent, &mut m, position, &[], 5.0, 0.1);
        assert_eq!(sounds(&later, SoundCue::Proximity), 1);
    }

    #[test]
    fn test_walker_hit_lands_inside_window() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, -10.0);
        let mut m = machine(AnimState::Attacking);
        m.set_animation_progress(AnimState::Attacking, 0.05);
        let position = DVec3::new(1.0, 0.0, 0.0);

        // 0.1167 s of a 1.167 s clip moves progress to 0.15.
        let update = step(&mut agent, &mut m, position, &[], 2.0, 0.1167);

        let amount = damage(&update).expect("hit should land");
        assert!((DAMAGE_MIN..DAMAGE_MAX).contains(&amount), "damage {amount}");
        assert_eq!(sounds(&update, SoundCue::Impact), 1);
        assert_eq!(agent.last_hit_at, 2.0);

        // Still inside the window, but the hit interval hasn't passed.
        let again = step(&mut agent, &mut m, position, &[], 2.01, 0.01);
        assert!(damage(&again).is_none());
    }

    #[test]
    fn test_walker_no_hit_outside_window_or_mid_transition() {
        let position = DVec3::new(1.0, 0.0, 0.0);

        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, -10.0);
        let mut m = machine(AnimState::Attacking);
        m.set_animation_progress(AnimState::Attacking, 0.5);
        let update = step(&mut agent, &mut m, position, &[], 2.0, 0.1);
        assert!(damage(&update).is_none());

        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, -10.0);
        let mut m = machine(AnimState::Idle);
        m.set_animation_progress(AnimState::Attacking, 0.1);
        let update = step(&mut agent, &mut m, position, &[], 2.0, 0.05);
        assert!(m.is_transitioning_animation_states());
        assert!(damage(&update).is_none(), "no hits while blending in");
    }

    #[test]
    fn test_walker_footsteps_only_when_audible() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Running);
        let update = step(&mut agent, &mut m, DVec3::new(5.0, 0.0, 0.0), &[], 1.0, 0.1);
        assert_eq!(sounds(&update, SoundCue::Footstep), 1);
        assert!(update.effects.iter().any(|e| matches!(
            e,
            AgentEffect::PlaySound { cue: SoundCue::Footstep, falloff: Some(f), .. } if *f == FOOTSTEP_FALLOFF
        )));
        assert_eq!(agent.last_footstep_at, 1.0);

        // Too soon for the next step.
        let update = step(&mut agent, &mut m, update.position, &[], 1.1, 0.1);
        assert_eq!(sounds(&update, SoundCue::Footstep), 0);

        let mut far = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Running);
        let update = step(&mut far, &mut m, DVec3::new(20.0, 0.0, 0.0), &[], 1.0, 0.1);
        assert_eq!(sounds(&update, SoundCue::Footstep), 0);
    }

    #[test]
    fn test_walker_idles_when_target_not_playing() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        let mut m = machine(AnimState::Running);
        let position = DVec3::new(5.0, 0.0, 0.0);

        let update = step_with_mode(
            &mut agent,
            &mut m,
            position,
            &[],
            1.0,
            0.1,
            TargetMode::GameOver,
        );

        assert_eq!(update.position, position);
        assert!(update.yaw.is_some());
        assert_eq!(m.transition().unwrap().to, AnimState::Idle);
        assert!(update.effects.is_empty());
    }

    #[test]
    fn test_dead_walker_lingers_then_leaves() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Walker, 0.0);
        agent.kill(0.0);
        let mut m = machine(AnimState::Idle);
        let position = DVec3::new(5.0, 0.0, 0.0);

        let update = step(&mut agent, &mut m, position, &[], 5.0, 0.1);
        assert!(!update.despawns());
        assert_eq!(update.position, position);
        assert!(update.yaw.is_none(), "dead agents don't turn");
        assert_eq!(m.transition().unwrap().to, AnimState::Dying);

        let update = step(&mut agent, &mut m, position, &[], BODY_LASTING_SECS, 0.1);
        assert!(!update.despawns());

        let update = step(&mut agent, &mut m, position, &[], BODY_LASTING_SECS + 0.5, 0.1);
        assert!(update.despawns());
    }

    // ---- Dormant controller ----

    #[test]
    fn test_dormant_never_moves() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Dormant, 0.0);
        let mut m = machine(AnimState::Idle);
        let position = DVec3::new(3.0, 0.0, 0.0);
        for i in 0..20 {
            let update = step(&mut agent, &mut m, position, &[], i as f64 * 0.1, 0.1);
            assert_eq!(update.position, position);
            assert!(update.effects.is_empty());
        }
        assert_eq!(m.current_animation_state(), AnimState::Idle);
    }

    #[test]
    fn test_dormant_obeys_death_protocol() {
        let mut agent = Agent::new(SELF_ID, AgentKind::Dormant, 0.0);
        agent.kill(1.0);
        let mut m = machine(AnimState::Idle);
        let position = DVec3::new(3.0, 0.0, 0.0);

        let update = step(&mut agent, &mut m, position, &[], 2.0, 0.1);
        assert!(!update.despawns());
        assert_eq!(m.transition().unwrap().to, AnimState::Dying);

        let update = step(&mut agent, &mut m, position, &[], 1.0 + BODY_LASTING_SECS + 0.1, 0.1);
        assert!(update.despawns());
    }
}
