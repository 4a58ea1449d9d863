//! Present task: the final task in a Storm-like frame, copying the viewport
//! AOV into the texture the embedding application will display (§4.7).
//!
//! This crate has no swapchain of its own — a frame pass renders into owned
//! AOV textures — so "present" means copying into an externally supplied
//! destination texture the host chooses how to show.

use crate::graph::{ExecuteContext, PrepareContext, RenderNode};
use crate::ids::{Path, Token};

pub struct PresentTask {
    path: Path,
    source_aov: Token,
    destination: Option<wgpu::Texture>,
    destination_size: (u32, u32),
}

impl PresentTask {
    #[must_use]
    pub fn new(path: Path, source_aov: Token) -> Self {
        Self { path, source_aov, destination: None, destination_size: (0, 0) }
    }

    pub fn set_destination(&mut self, texture: wgpu::Texture, size: (u32, u32)) {
        self.destination = Some(texture);
        self.destination_size = size;
    }
}

impl RenderNode for PresentTask {
    fn name(&self) -> &str {
        "presentTask"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext<'_>) {
        if let Some(source_aov) = ctx.sync.get::<Token>(&self.path, "params") {
            self.source_aov = source_aov;
        }
    }

    fn run(&self, ctx: &ExecuteContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        let Some(dst) = &self.destination else {
            log::warn!("presentTask: no destination texture set, skipping copy");
            return;
        };
        let Some(src) = ctx.aov_texture(self.source_aov) else {
            log::warn!("presentTask: source AOV '{}' not bound", self.source_aov);
            return;
        };

        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: src,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: dst,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: self.destination_size.0,
                height: self.destination_size.1,
                depth_or_array_layers: 1,
            },
        );
    }
}

#[must_use]
pub fn commit(source_aov: Token) -> crate::task_manager::CommitFn {
    Box::new(move |sync, path| {
        sync.set(path, "params", source_aov);
    })
}
