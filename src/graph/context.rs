//! Prepare/execute contexts shared by every [`super::node::RenderNode`].
//!
//! Mirrors the strict read/write phase split the render-graph executor uses:
//! `prepare` gets exclusive access to the sync delegate (task parameters may
//! be read and written); `run` gets a read-only view plus the AOV texture
//! views resolved for this frame and records commands into the shared
//! encoder.

use rustc_hash::FxHashMap;

use crate::ids::Token;
use crate::sync_delegate::SyncDelegate;
use crate::wgpu_ctx::WgpuContext;

pub struct PrepareContext<'a> {
    pub wgpu: &'a WgpuContext,
    pub sync: &'a mut SyncDelegate,
}

pub struct ExecuteContext<'a> {
    pub wgpu: &'a WgpuContext,
    pub sync: &'a SyncDelegate,
    /// AOV texture views resolved by the `RenderBufferManager` for this frame,
    /// keyed by AOV token (`color`, `depth`, …).
    pub aov_views: &'a FxHashMap<Token, wgpu::TextureView>,
    /// The same AOVs' underlying textures, for tasks that need
    /// `copy_texture_to_texture`/`copy_texture_to_buffer` rather than a bind
    /// group (`presentTask`, depth reduction). `wgpu::Texture` clones are a
    /// refcount bump, not a reallocation.
    pub aov_textures: &'a FxHashMap<Token, wgpu::Texture>,
}

impl<'a> ExecuteContext<'a> {
    #[must_use]
    pub fn aov_view(&self, token: Token) -> Option<&wgpu::TextureView> {
        self.aov_views.get(token)
    }

    #[must_use]
    pub fn aov_texture(&self, token: Token) -> Option<&wgpu::Texture> {
        self.aov_textures.get(token)
    }
}
