//! GPU context (the Hgi stand-in)
//!
//! `WgpuContext` holds only the device, queue and a handful of backend
//! capability flags. Everything the orchestration core does to the GPU —
//! buffers, textures, pipelines, command encoders — goes through this single
//! context, matching the "abstract GPU interface" the rest of the design
//! speaks of as Hgi. There is no windowing/surface coupling here: a frame
//! pass renders into owned AOV textures, not directly onto a swapchain.

use crate::errors::{Result, ViewportError};

/// Device-level capabilities that change which reduction / task strategy is picked.
#[derive(Debug, Clone, Copy)]
pub struct BackendCaps {
    /// Maximum 2D texture dimension, used to bound AOV resize requests.
    pub max_texture_dimension_2d: u32,
}

/// Core GPU context shared by every manager and task.
pub struct WgpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub caps: BackendCaps,
}

impl WgpuContext {
    /// Requests an adapter/device pair with no surface attached.
    pub async fn new() -> Result<Self> {
        let instance = wgpu::Instance::default();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewportError::AdapterRequestFailed(e.to_string()))?;

        let adapter_limits = adapter.limits();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("viewport-core device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter_limits),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let caps = BackendCaps {
            max_texture_dimension_2d: adapter_limits.max_texture_dimension_2d,
        };

        log::info!(
            "wgpu context initialized (max_texture_dimension_2d={})",
            caps.max_texture_dimension_2d
        );

        Ok(Self { device, queue, caps })
    }

    /// Creates a simple 2D render-attachment-capable texture and its default view.
    #[must_use]
    pub fn create_attachment(
        &self,
        label: &str,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        extra_usage: wgpu::TextureUsages,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.0.max(1),
                height: size.1.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | extra_usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }
}
