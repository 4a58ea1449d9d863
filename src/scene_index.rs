//! External collaborator contracts: the render delegate and the scene index.
//!
//! The scene-graph library and concrete render delegates are out of scope;
//! this module defines only the interfaces the orchestration core consumes
//! from them, per the "EXTERNAL INTERFACES" design section. A test harness
//! or an embedding application supplies a concrete implementation.

use crate::ids::{Path, Token};

/// Default AOV shape a render delegate reports for a given AOV name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AovDescriptor {
    pub format: wgpu::TextureFormat,
    pub clear_value: ClearValue,
    pub multi_sampled: bool,
}

/// AOV format sentinel a delegate can return to reject an AOV name outright.
pub const INVALID_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    Color([f32; 4]),
    Depth(f32),
    Uint(u32),
}

/// The render delegate contract (§6, "Render delegate (consumed)").
pub trait RenderDelegate {
    /// Runs `tasks` in order. Concrete delegates submit GPU work here.
    fn execute(&mut self, tasks: &mut [Box<dyn crate::graph::RenderNode>]);

    /// Returns `None` to reject an AOV name (format `invalid`).
    fn default_aov_descriptor(&self, name: Token) -> Option<AovDescriptor>;

    fn is_sprim_type_supported(&self, type_name: Token) -> bool;
    fn is_bprim_type_supported(&self, type_name: Token) -> bool;

    /// Used for cross-pass compatibility checks (depth re-binding, §4.2).
    fn renderer_display_name(&self) -> &str;

    fn render_setting(&self, key: Token) -> Option<String>;
    fn set_render_setting(&mut self, key: Token, value: String);

    /// Whether this delegate uses path-tracing canonical task ordering
    /// rather than the Storm-like rasterization ordering (§4.7).
    fn is_path_tracing(&self) -> bool {
        false
    }
}

/// Minimal typed data-source leaf/container produced by the geometry
/// builders in [`crate::geometry`] and consumed by a scene index (§3.3).
#[derive(Debug, Clone)]
pub enum SceneDataSource {
    Container(Vec<(Token, SceneDataSource)>),
    Floats(Vec<f32>),
    Ints(Vec<i32>),
    Vec2s(Vec<glam::Vec2>),
    Vec3s(Vec<glam::Vec3>),
    Vec4s(Vec<glam::Vec4>),
    Matrix4(glam::Mat4),
    Token(Token),
    Path(Path),
}
