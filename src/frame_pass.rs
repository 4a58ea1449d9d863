//! FramePass: the top-level facade embedding applications drive once per
//! frame (§4.2). Owns a [`TaskManager`], a [`RenderBufferManager`], a
//! [`LightingManager`] and a [`SelectionHelper`] for one render pass.

use glam::{Mat4, Vec3};

use crate::errors::Result;
use crate::ids::{tokens, Path, Token};
use crate::lighting::shadow::BoundingBox;
use crate::lighting::{LightParams, LightingManager, ShadowParams};
use crate::render_buffer_manager::{InputAovBinding, RenderBufferManager};
use crate::scene_index::{ClearValue, RenderDelegate};
use crate::selection::{SelectionHelper, SelectionSettings};
use crate::selection::pick::{Hit, PickParams, RawSample};
use crate::task_manager::{Anchor, CommitFn, TaskManager, TaskTags};
use crate::tasks::{
    bounding_box::{self, BoundingBoxParams, BoundingBoxTask},
    color_correction::{self, ColorCorrectionParams, ColorCorrectionTask},
    creation,
    depth_bias::{self, DepthBiasParams, DepthBiasTask},
    oit_resolve::{self, OitResolveParams, OitResolveTask},
    present::{self, PresentTask},
    shadow_task::ShadowTask,
    skydome::{self, SkydomeParams, SkydomeTask},
    ssao::{self, SsaoParams, SsaoTask},
    visualize_aov::{self, VisualizeAovParams, VisualizeAovTask},
};
use crate::wgpu_ctx::WgpuContext;

/// Per-frame options an embedding application sets on a [`FramePass`] (§4.2
/// "FramePassParams option table").
#[derive(Clone, Debug)]
pub struct FramePassParams {
    pub viewport_aov: Token,
    pub render_buffer_size: (u32, u32),
    pub msaa_sample_count: u32,
    pub msaa_enabled: bool,
    pub colorspace: Option<crate::tasks::color_correction::Colorspace>,
    pub enable_shadows: bool,
    pub shadow_params: ShadowParams,
    pub clear_color: Option<ClearValue>,
    pub view_matrix: Mat4,
    pub proj_matrix: Mat4,
}

impl Default for FramePassParams {
    fn default() -> Self {
        Self {
            viewport_aov: tokens::COLOR,
            render_buffer_size: (1, 1),
            msaa_sample_count: 1,
            msaa_enabled: false,
            colorspace: Some(crate::tasks::color_correction::Colorspace::Srgb),
            enable_shadows: false,
            shadow_params: ShadowParams { resolution: 1024, blur: 0.0 },
            clear_color: Some(ClearValue::Color([0.0, 0.0, 0.0, 1.0])),
            view_matrix: Mat4::IDENTITY,
            proj_matrix: Mat4::IDENTITY,
        }
    }
}

pub struct FramePass {
    pass_path: Path,
    task_manager: TaskManager,
    render_buffer_manager: RenderBufferManager,
    lighting: LightingManager,
    selection: SelectionHelper,
    params: FramePassParams,
    initialized: bool,
}

impl FramePass {
    #[must_use]
    pub fn new(pass_path: Path, renderer_display_name: &'static str, aov_supported: bool) -> Self {
        Self {
            task_manager: TaskManager::new(pass_path.clone()),
            render_buffer_manager: RenderBufferManager::new(renderer_display_name, aov_supported),
            lighting: LightingManager::new(pass_path.clone(), false),
            selection: SelectionHelper::new(),
            pass_path,
            params: FramePassParams::default(),
            initialized: false,
        }
    }

    /// Registers the canonical Storm-like task set. Call once after
    /// construction; a custom embedding may instead add its own tasks
    /// directly through [`FramePass::task_manager_mut`].
    pub fn initialize_default_tasks(&mut self) -> Result<()> {
        self.initialize_tasks(&creation::storm_like_order())
    }

    pub fn initialize_minimal_tasks(&mut self) -> Result<()> {
        self.initialize_tasks(&creation::minimal_order())
    }

    fn initialize_tasks(&mut self, order: &[Token]) -> Result<()> {
        for &token in order {
            let tags = if token == tokens::PICK_TASK || token == tokens::PICK_FROM_RENDER_BUFFER_TASK {
                TaskTags::PICKING
            } else if token.starts_with("renderTask_") {
                TaskTags::EXECUTABLE | TaskTags::RENDER
            } else {
                TaskTags::EXECUTABLE
            };
            let path = self.pass_path.append(token);
            self.add_concrete_task(token, path, tags)?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Constructs the real [`crate::tasks`] body for `token`, with a commit
    /// closure that pulls its initial parameters from `self.params`. Tokens
    /// this crate carries no task body for (the scene-rasterization and
    /// selection-overlay tasks a concrete [`RenderDelegate`] owns) register a
    /// [`DelegateOwnedTask`] stand-in instead.
    fn add_concrete_task(&mut self, token: Token, path: Path, tags: TaskTags) -> Result<()> {
        match token {
            tokens::SHADOW_TASK => {
                // Resolution and per-light matrices are published every frame
                // via `TaskManager::set_task_value` (step 3+4 of
                // `get_render_tasks`), not through a commit closure — the
                // lighting manager that owns them lives on `FramePass`, not
                // captured state a closure built at registration time could see.
                let resolution = self.params.shadow_params.resolution;
                self.task_manager.add_task(
                    token,
                    (),
                    noop_commit(),
                    ShadowTask::new(path, resolution),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::SKYDOME_TASK => {
                let params = SkydomeParams::default();
                self.task_manager.add_task(
                    token,
                    params.clone(),
                    skydome::commit(params.clone()),
                    SkydomeTask::new(path, params),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::OIT_RESOLVE_TASK => {
                let params = OitResolveParams { enabled: false };
                self.task_manager.add_task(
                    token,
                    params,
                    oit_resolve::commit(params),
                    OitResolveTask::new(path, params),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::SSAO_TASK => {
                let params = SsaoParams::default();
                self.task_manager.add_task(
                    token,
                    params,
                    ssao::commit(params),
                    SsaoTask::new(path, params),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::DEPTH_BIAS_TASK => {
                let params = DepthBiasParams::default();
                self.task_manager.add_task(
                    token,
                    params,
                    depth_bias::commit(params),
                    DepthBiasTask::new(path, params),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::COLOR_CORRECTION_TASK => {
                let params = ColorCorrectionParams {
                    colorspace: self.params.colorspace.unwrap_or(color_correction::Colorspace::Disabled),
                    exposure: 0.0,
                    aov_name: self.params.viewport_aov,
                };
                self.task_manager.add_task(
                    token,
                    params.clone(),
                    color_correction::commit(params.clone()),
                    ColorCorrectionTask::new(path, params),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::VISUALIZE_AOV_TASK => {
                let params = VisualizeAovParams {
                    source_aov: self.params.viewport_aov,
                    destination_aov: self.params.viewport_aov,
                };
                self.task_manager.add_task(
                    token,
                    params.clone(),
                    visualize_aov::commit(params.clone()),
                    VisualizeAovTask::new(path, params),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::BOUNDING_BOX_TASK => {
                let params = BoundingBoxParams {
                    enabled: false,
                    extent: BoundingBox { min: Vec3::ZERO, max: Vec3::ZERO },
                    color: [1.0, 1.0, 0.0, 1.0],
                };
                self.task_manager.add_task(
                    token,
                    params,
                    bounding_box::commit(params),
                    BoundingBoxTask::new(path, params),
                    Anchor::End,
                    tags,
                )?;
            }
            tokens::PRESENT_TASK => {
                let source_aov = self.params.viewport_aov;
                self.task_manager.add_task(
                    token,
                    source_aov,
                    present::commit(source_aov),
                    PresentTask::new(path, source_aov),
                    Anchor::End,
                    tags,
                )?;
            }
            _ => {
                self.task_manager.add_task(token, (), noop_commit(), DelegateOwnedTask, Anchor::End, tags)?;
            }
        }
        Ok(())
    }

    pub fn uninitialize(&mut self) {
        let tokens: Vec<Token> = creation::storm_like_order();
        for token in tokens {
            self.task_manager.remove_task(token);
        }
        self.initialized = false;
    }

    #[must_use]
    pub fn params(&self) -> &FramePassParams {
        &self.params
    }

    pub fn set_params(&mut self, params: FramePassParams) {
        self.params = params;
    }

    #[must_use]
    pub fn task_manager(&self) -> &TaskManager {
        &self.task_manager
    }

    pub fn task_manager_mut(&mut self) -> &mut TaskManager {
        &mut self.task_manager
    }

    #[must_use]
    pub fn render_buffer_manager(&self) -> &RenderBufferManager {
        &self.render_buffer_manager
    }

    #[must_use]
    pub fn lighting_manager(&self) -> &LightingManager {
        &self.lighting
    }

    pub fn set_enable_shadows(&mut self, enabled: bool) {
        self.params.enable_shadows = enabled;
    }

    #[must_use]
    pub fn shadow_params(&self) -> ShadowParams {
        self.params.shadow_params.clone()
    }

    pub fn set_shadow_params(&mut self, params: ShadowParams) {
        self.params.shadow_params = params;
    }

    pub fn set_selection(&mut self, prims: impl IntoIterator<Item = crate::selection::SelectedPrim>) {
        self.selection.set_selection(prims);
    }

    #[must_use]
    pub fn get_selection(&self) -> &rustc_hash::FxHashSet<crate::selection::SelectedPrim> {
        self.selection.selected()
    }

    /// Provider accessor (§6): the selection subsystem itself, for tasks
    /// that need settings/version/id-buffer-binding beyond the raw set.
    #[must_use]
    pub fn selection_helper(&self) -> &SelectionHelper {
        &self.selection
    }

    #[must_use]
    pub fn get_render_buffer(&self, aov: Token) -> Option<&wgpu::Texture> {
        self.render_buffer_manager.get_render_output(aov).map(|b| &b.texture)
    }

    #[must_use]
    pub fn get_render_texture(&self, aov: Token) -> Option<&wgpu::TextureView> {
        self.render_buffer_manager.get_render_output(aov).map(|b| &b.view)
    }

    #[must_use]
    pub fn get_render_outputs(&self) -> &[Token] {
        self.render_buffer_manager.owned_aov_names()
    }

    /// §4.2 `GetRenderTasks`: the 10-step per-frame reconciliation protocol.
    /// Returns the tokens of the tasks that will execute this frame, in
    /// registration order.
    pub fn get_render_tasks(
        &mut self,
        wgpu: &WgpuContext,
        delegate: &dyn RenderDelegate,
        active_lights: &[LightParams],
        world_extent: BoundingBox,
        inputs: &[InputAovBinding],
    ) -> Vec<Token> {
        // 1. size/MSAA update, then declare this pass's AOV set.
        self.render_buffer_manager.set_buffer_size_and_msaa(
            wgpu,
            delegate,
            self.params.render_buffer_size,
            self.params.msaa_sample_count,
            self.params.msaa_enabled,
        );
        let names = [tokens::COLOR, tokens::DEPTH, tokens::PRIM_ID];
        self.render_buffer_manager.set_render_outputs(wgpu, delegate, &names, inputs, self.params.viewport_aov);

        // 2. visualize-AOV is only meaningful once the viewport AOV is fixed.
        self.selection.resolve_id_buffer_aov(self.params.viewport_aov);

        // 3 + 4. camera matrices feed lighting reconciliation (view-space
        // shadow frusta) and the render tasks' uniform updates.
        self.lighting.set_lighting(active_lights, world_extent, Some(self.params.shadow_params.clone()));
        self.task_manager.set_task_value(
            tokens::SHADOW_TASK,
            "resolution",
            self.lighting.shadow_resolution().unwrap_or(self.params.shadow_params.resolution),
        );
        self.task_manager.set_task_value(tokens::SHADOW_TASK, "matrices", self.lighting.shadow_matrices());

        // 5. conditional clear color: only the first task in the frame clears.
        if let Some(clear) = self.params.clear_color {
            self.render_buffer_manager.set_render_output_clear_color(tokens::COLOR, Some(clear));
        }

        // 6. selection settings are read by the selection/colorize tasks below.
        let settings = self.selection.settings().clone();
        self.selection.set_settings(settings);

        // 7. policy-driven enable/disable.
        let shadows_enabled = self.params.enable_shadows && self.lighting.shadows_enabled();
        self.task_manager.enable_task(tokens::SHADOW_TASK, shadows_enabled);

        let has_render_task = self.task_manager.has_any_render_task();
        self.task_manager.enable_task(tokens::SELECTION_TASK, has_render_task);

        let viewport_is_color = self.params.viewport_aov == tokens::COLOR;
        self.task_manager.enable_task(tokens::COLORIZE_SELECTION_TASK, viewport_is_color);

        let color_correction_enabled = self.params.colorspace.is_some_and(|c| {
            c != crate::tasks::color_correction::Colorspace::Disabled
        });
        self.task_manager.enable_task(tokens::COLOR_CORRECTION_TASK, color_correction_enabled);

        self.task_manager.enable_task(tokens::VISUALIZE_AOV_TASK, !viewport_is_color);

        // 8. publish the selection version so a downstream `colorizeSelectionTask` can skip redundant work.
        log::trace!("selection version published: {}", self.selection.version());

        // 9. commit the executable subset's parameters.
        self.task_manager.commit_task_values(TaskTags::EXECUTABLE);

        // 10. the resulting enabled task order.
        creation::storm_like_order()
            .into_iter()
            .filter(|&t| self.task_manager.is_enabled(t))
            .collect()
    }

    /// Runs the executable task subset through the shared render graph.
    pub fn render(&mut self, prepare_ctx: &mut crate::graph::PrepareContext<'_>, execute_ctx: &crate::graph::ExecuteContext<'_>) {
        self.task_manager.execute(prepare_ctx, execute_ctx);
    }

    /// §4.5 `Pick`: aggregates `samples` (already decoded by a pick task
    /// into per-pixel records) into hit groups honoring `params`.
    #[must_use]
    pub fn pick(&self, samples: &[RawSample], params: &PickParams) -> Vec<Hit> {
        let hits = crate::selection::pick::aggregate_hits(samples, params.target, &params.exclude_paths);
        crate::selection::pick::resolve(hits, params.resolve_mode)
    }

    /// Convenience overload matching the app-facing "pick at this pixel"
    /// call: defaults to nearest-resolve, excluding nothing.
    #[must_use]
    pub fn pick_nearest(&self, samples: &[RawSample]) -> Vec<Hit> {
        self.pick(samples, &PickParams::default())
    }
}

/// Stand-in task body for tokens this crate carries no task body for: scene
/// rasterization (`renderTask_*`, `simpleLightTask`) and selection overlay
/// (`aovInputTask`, `selectionTask`, `colorizeSelectionTask`) are owned by
/// whatever concrete [`RenderDelegate`] the embedding application supplies,
/// not by this crate (see `scene_index`'s module doc). Registering this slot
/// still reserves the token's place in task order; it draws nothing itself.
struct DelegateOwnedTask;

impl crate::graph::RenderNode for DelegateOwnedTask {
    fn name(&self) -> &str {
        "delegateOwned"
    }

    fn run(&self, _ctx: &crate::graph::ExecuteContext<'_>, _encoder: &mut wgpu::CommandEncoder) {}
}

/// Commit closure for tasks whose state reaches them by some other channel
/// than `TaskManager::commit_task_values` (`set_task_value`, or none at all).
fn noop_commit() -> CommitFn {
    Box::new(|_sync, _path| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_index::AovDescriptor;

    struct MockDelegate;
    impl RenderDelegate for MockDelegate {
        fn execute(&mut self, _tasks: &mut [Box<dyn crate::graph::RenderNode>]) {}
        fn default_aov_descriptor(&self, _name: Token) -> Option<AovDescriptor> {
            Some(AovDescriptor {
                format: wgpu::TextureFormat::Rgba8Unorm,
                clear_value: ClearValue::Color([0.0; 4]),
                multi_sampled: false,
            })
        }
        fn is_sprim_type_supported(&self, _t: Token) -> bool {
            true
        }
        fn is_bprim_type_supported(&self, _t: Token) -> bool {
            true
        }
        fn renderer_display_name(&self) -> &str {
            "mock"
        }
        fn render_setting(&self, _k: Token) -> Option<String> {
            None
        }
        fn set_render_setting(&mut self, _k: Token, _v: String) {}
    }

    #[test]
    fn mock_delegate_accepts_every_aov_name() {
        let delegate = MockDelegate;
        assert!(delegate.default_aov_descriptor(tokens::COLOR).is_some());
    }

    #[test]
    fn default_task_order_matches_storm_like_registration() {
        let mut fp = FramePass::new(Path::from("/pass"), "mock", true);
        fp.initialize_default_tasks().unwrap();
        assert_eq!(fp.task_manager().task_count(), creation::storm_like_order().len());
    }

    #[test]
    fn minimal_order_excludes_shadow_task() {
        let mut fp = FramePass::new(Path::from("/pass"), "mock", true);
        fp.initialize_minimal_tasks().unwrap();
        assert!(!fp.task_manager().is_enabled(tokens::SHADOW_TASK));
    }

    #[test]
    fn pick_nearest_returns_only_closest_hit() {
        let fp = FramePass::new(Path::from("/pass"), "mock", true);
        let samples = vec![
            RawSample {
                path: Path::from("/a"),
                instancer_path: None,
                instance_index: None,
                face_id: Some(0),
                edge_id: None,
                point_id: None,
                depth: 0.8,
                world_space_hit_point: [0.0, 0.0, 0.0],
            },
            RawSample {
                path: Path::from("/b"),
                instancer_path: None,
                instance_index: None,
                face_id: Some(0),
                edge_id: None,
                point_id: None,
                depth: 0.2,
                world_space_hit_point: [0.0, 0.0, 0.0],
            },
        ];
        let hits = fp.pick_nearest(&samples);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, Path::from("/b"));
    }

    #[test]
    fn shadow_task_is_registered_but_left_to_get_render_tasks_to_gate() {
        let mut fp = FramePass::new(Path::from("/pass"), "mock", true);
        fp.initialize_default_tasks().unwrap();
        // Registration alone doesn't consult lighting state; only
        // `get_render_tasks` applies the enable/disable policy (step 7).
        assert!(fp.task_manager().is_enabled(tokens::SHADOW_TASK));
    }

    #[test]
    fn get_selection_reflects_set_selection() {
        let mut fp = FramePass::new(Path::from("/pass"), "mock", true);
        let prim = crate::selection::SelectedPrim { path: Path::from("/cube"), instance_index: None };
        fp.set_selection(vec![prim.clone()]);
        assert!(fp.get_selection().contains(&prim));
    }
}
