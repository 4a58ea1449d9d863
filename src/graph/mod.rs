//! Render-graph execution primitives.
//!
//! Re-exposes the node/context/execution pieces shared by every task
//! implementation in [`crate::tasks`]: a [`RenderNode`] trait (prepare/run),
//! a transient [`RenderGraph`] that runs a frame's enabled task objects
//! through one shared `wgpu::CommandEncoder`, and a [`TrackedRenderPass`]
//! wrapper that elides redundant pipeline/bind-group/buffer state changes.

pub mod context;
pub mod graph;
pub mod node;
pub mod pass;

pub use context::{ExecuteContext, PrepareContext};
pub use graph::RenderGraph;
pub use node::RenderNode;
pub use pass::TrackedRenderPass;
