//! Render passes: hand every live entity to the renderer, 3D scene first,
//! then the 2D overlay.

use horde_core::state::EntityView;
use horde_core::types::FrameContext;

use crate::registry::EntityRegistry;
use crate::systems::snapshot::entity_view;

/// The rendering collaborator.
pub trait RenderSink {
    fn render_3d(&mut self, view: &EntityView, ctx: &FrameContext);
    fn render_2d(&mut self, view: &EntityView, ctx: &FrameContext);
}

/// Renders nothing. For headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn render_3d(&mut self, _view: &EntityView, _ctx: &FrameContext) {}
    fn render_2d(&mut self, _view: &EntityView, _ctx: &FrameContext) {}
}

pub fn run(registry: &EntityRegistry, sink: &mut impl RenderSink, ctx: &FrameContext) {
    let views: Vec<EntityView> = registry
        .live()
        .iter()
        .filter_map(|&e| entity_view(registry.world(), e))
        .collect();

    for view in &views {
        sink.render_3d(view, ctx);
    }
    for view in &views {
        sink.render_2d(view, ctx);
    }
}
