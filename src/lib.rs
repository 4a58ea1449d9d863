#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod depth_reduction;
pub mod errors;
pub mod frame_pass;
pub mod geometry;
pub mod graph;
pub mod ids;
pub mod lighting;
pub mod pageable;
pub mod render_buffer_manager;
pub mod scene_index;
pub mod selection;
pub mod sync_delegate;
pub mod task_manager;
pub mod tasks;
pub mod utils;
pub mod wgpu_ctx;

pub use errors::{Result, ViewportError};
pub use frame_pass::{FramePass, FramePassParams};
pub use ids::{Path, Token};
pub use lighting::LightingManager;
pub use pageable::PageableBufferManager;
pub use render_buffer_manager::RenderBufferManager;
pub use scene_index::RenderDelegate;
pub use selection::{SelectionHelper, SelectionSettings};
pub use sync_delegate::SyncDelegate;
pub use task_manager::TaskManager;
pub use wgpu_ctx::WgpuContext;
