//! Bounding-box overlay task: wireframe draw of the active selection's or
//! the whole scene's world extent (§4.7).

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{tokens, Path, Token};
use crate::lighting::shadow::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBoxParams {
    pub enabled: bool,
    pub extent: BoundingBox,
    pub color: [f32; 4],
}

pub struct BoundingBoxTask {
    path: Path,
    params: BoundingBoxParams,
    color_aov: Token,
}

impl BoundingBoxTask {
    #[must_use]
    pub fn new(path: Path, params: BoundingBoxParams) -> Self {
        Self { path, params, color_aov: tokens::COLOR }
    }
}

impl RenderNode for BoundingBoxTask {
    fn name(&self) -> &str {
        "boundingBoxTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(params) = ctx.sync.get::<BoundingBoxParams>(&self.path, "params") {
            self.params = params;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        if !self.params.enabled {
            return;
        }
        let Some(view) = ctx.aov_view(self.color_aov) else { return };
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("boundingBoxTask"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }
}

#[must_use]
pub fn commit(next: BoundingBoxParams) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", next);
    })
}
