//! Pick task: an isolated, `PICKING`-tagged render pass that writes id
//! buffers (prim/instance/face/edge/point) for one pick query (§4.5, §4.7).

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{tokens, Token};
use crate::selection::pick::PickTarget;

#[derive(Clone, Debug, PartialEq)]
pub struct PickTaskParams {
    pub target: PickTarget,
    pub viewport_rect: (u32, u32, u32, u32),
}

pub struct PickTask {
    params: PickTaskParams,
    output_aovs: Vec<Token>,
}

impl PickTask {
    #[must_use]
    pub fn new(params: PickTaskParams) -> Self {
        let mut output_aovs = vec![tokens::PRIM_ID, tokens::INSTANCE_ID, tokens::DEPTH];
        match params.target {
            PickTarget::Faces => output_aovs.push(tokens::ELEMENT_ID),
            PickTarget::Edges => output_aovs.push(tokens::EDGE_ID),
            PickTarget::Points | PickTarget::PointsAndInstances => output_aovs.push(tokens::POINT_ID),
            PickTarget::PrimsAndInstances => {}
        }
        Self { params, output_aovs }
    }

    #[must_use]
    pub fn output_aovs(&self) -> &[Token] {
        &self.output_aovs
    }
}

impl RenderNode for PickTask {
    fn name(&self) -> &str {
        "pickTask"
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        let attachments: Vec<_> = self
            .output_aovs
            .iter()
            .filter_map(|&name| ctx.aov_view(name))
            .map(|view| {
                Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })
            })
            .collect();
        if attachments.is_empty() {
            return;
        }
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pickTask"),
            color_attachments: &attachments,
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        let _ = self.params.viewport_rect;
    }
}
