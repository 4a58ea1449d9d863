//! Error Types
//!
//! This module defines the error taxonomy used throughout the engine.
//!
//! # Overview
//!
//! [`ViewportError`] groups failures into the four categories the orchestration
//! layer distinguishes:
//! - [`ViewportError::Programming`]: violated preconditions (unknown AOV name,
//!   duplicate task token, null lighting context). Reported once; the caller's
//!   operation is a no-op.
//! - [`ViewportError::Configuration`]: unsupported backend feature or output
//!   format. The owning subsystem self-disables rather than aborting the frame.
//! - [`ViewportError::Resource`]: GPU resource allocation failure. The owning
//!   task skips the current frame and retries after rebuilding its resources.
//! - [`ViewportError::RuntimeGraphics`]: shader compile/link failure. The
//!   affected pipeline is torn down and not recreated until parameters change.
//!
//! All public APIs return [`Result<T>`], an alias for `std::result::Result<T, ViewportError>`.

use thiserror::Error;

/// The main error type for the viewport orchestration core.
#[derive(Error, Debug)]
pub enum ViewportError {
    /// A precondition was violated by the caller (duplicate token, unknown path, …).
    #[error("programming error: {0}")]
    Programming(String),

    /// A configuration choice the active backend cannot satisfy.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// GPU resource creation failed for the current frame.
    #[error("resource error: {0}")]
    Resource(String),

    /// Shader compilation or pipeline linking failed.
    #[error("runtime graphics error: {0}")]
    RuntimeGraphics(String),

    /// Failed to request a compatible GPU adapter.
    #[error("failed to request adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("failed to create device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// I/O failure while paging a buffer to or from disk.
    #[error("paging i/o error: {0}")]
    IoError(#[from] std::io::Error),

    /// An async paging task panicked or was cancelled.
    #[error("paging task join error: {0}")]
    TaskJoinError(String),
}

impl ViewportError {
    /// Convenience constructor for [`ViewportError::Programming`].
    pub fn programming(msg: impl Into<String>) -> Self {
        Self::Programming(msg.into())
    }

    /// Convenience constructor for [`ViewportError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Convenience constructor for [`ViewportError::Resource`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Convenience constructor for [`ViewportError::RuntimeGraphics`].
    pub fn runtime_graphics(msg: impl Into<String>) -> Self {
        Self::RuntimeGraphics(msg.into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<tokio::task::JoinError> for ViewportError {
    fn from(err: tokio::task::JoinError) -> Self {
        ViewportError::TaskJoinError(err.to_string())
    }
}

/// Alias for `Result<T, ViewportError>`.
pub type Result<T> = std::result::Result<T, ViewportError>;
