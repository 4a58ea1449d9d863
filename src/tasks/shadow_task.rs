//! Shadow task: renders depth-only shadow maps for every shadow-casting
//! light, using the matrices computed by [`crate::lighting::shadow`] (§4.7).
//!
//! The lighting manager that owns those matrices lives on [`crate::frame_pass::FramePass`],
//! not on this task, so they reach it the same way any out-of-band task
//! value does: [`crate::task_manager::TaskManager::set_task_value`] publishes
//! the current `(resolution, matrices)` pair under this task's own path each
//! frame, and [`prepare`](RenderNode::prepare) reads it back.

use rustc_hash::FxHashMap;

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::Path;

pub struct ShadowTask {
    path: Path,
    resolution: u32,
    matrices: FxHashMap<Path, glam::Mat4>,
}

impl ShadowTask {
    #[must_use]
    pub fn new(path: Path, resolution: u32) -> Self {
        Self { path, resolution, matrices: FxHashMap::default() }
    }

    pub fn set_light_matrix(&mut self, light_path: Path, matrix: glam::Mat4) {
        self.matrices.insert(light_path, matrix);
    }

    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}

impl RenderNode for ShadowTask {
    fn name(&self) -> &str {
        "shadowTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(resolution) = ctx.sync.get::<u32>(&self.path, "resolution") {
            self.resolution = resolution;
        }
        if let Some(matrices) = ctx.sync.get::<FxHashMap<Path, glam::Mat4>>(&self.path, "matrices") {
            self.matrices = matrices;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        for (light_path, _matrix) in &self.matrices {
            let (_depth_texture, depth_view) = ctx.wgpu.create_attachment(
                &format!("shadowTask:{light_path}"),
                (self.resolution, self.resolution),
                wgpu::TextureFormat::Depth32Float,
                wgpu::TextureUsages::empty(),
            );
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadowTask"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
    }
}
