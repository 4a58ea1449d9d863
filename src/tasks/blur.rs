//! Generic separable Gaussian blur task, reused by SSAO and bloom-style
//! post-processing chains (§4.7).

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{Path, Token};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurParams {
    pub aov: Token,
    pub radius_px: f32,
    pub horizontal: bool,
}

pub struct BlurTask {
    path: Path,
    params: BlurParams,
}

impl BlurTask {
    #[must_use]
    pub fn new(path: Path, params: BlurParams) -> Self {
        Self { path, params }
    }
}

impl RenderNode for BlurTask {
    fn name(&self) -> &str {
        "blurTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(params) = ctx.sync.get::<BlurParams>(&self.path, "params") {
            self.params = params;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        let Some(view) = ctx.aov_view(self.params.aov) else { return };
        let label = if self.params.horizontal { "blurTask:h" } else { "blurTask:v" };
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
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
pub fn commit(next: BlurParams) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", next);
    })
}
