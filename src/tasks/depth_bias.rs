//! Depth-bias task: a parameter-only task (no draw of its own) that pushes
//! constant/slope-scaled depth bias into the shadow-casting render tasks'
//! rasterizer state (§4.7).
//!
//! Downstream render tasks are delegate-owned (this crate carries no
//! material pipeline), so the only channel this task has to reach them is
//! the shared sync delegate: it commits its own params under its own path,
//! and a delegate querying `TaskManager::get_task_value` for this task's
//! token before building its rasterizer state picks them up the same way
//! any other task reads back its committed params.

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::Path;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthBiasParams {
    pub constant: i32,
    pub slope_scale: f32,
    pub clamp: f32,
}

impl Default for DepthBiasParams {
    fn default() -> Self {
        Self { constant: 4, slope_scale: 1.5, clamp: 0.0 }
    }
}

/// Carries bias parameters to the tasks registered after it; has no
/// attachment and records no GPU commands of its own.
pub struct DepthBiasTask {
    path: Path,
    params: DepthBiasParams,
}

impl DepthBiasTask {
    #[must_use]
    pub fn new(path: Path, params: DepthBiasParams) -> Self {
        Self { path, params }
    }

    #[must_use]
    pub fn params(&self) -> DepthBiasParams {
        self.params
    }
}

impl RenderNode for DepthBiasTask {
    fn name(&self) -> &str {
        "depthBiasTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(params) = ctx.sync.get::<DepthBiasParams>(&self.path, "params") {
            self.params = params;
        }
    }

    fn run(&self, _ctx: &ExecuteContext<'_>, _encoder: &mut wgpu::CommandEncoder) {}
}

#[must_use]
pub fn commit(next: DepthBiasParams) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", next);
    })
}
