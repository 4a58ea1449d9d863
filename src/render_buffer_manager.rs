//! RenderBufferManager — AOV lifecycle: allocation, resize, cross-pass input
//! binding and the copy-shader used to pull a previous pass's AOV into this
//! pass's own buffers (§4.3).

use rustc_hash::FxHashMap;

use crate::ids::Token;
use crate::scene_index::{AovDescriptor, ClearValue, RenderDelegate, INVALID_FORMAT};
use crate::wgpu_ctx::WgpuContext;

/// One owned AOV attachment (§3.1 "AOV Binding Entry").
pub struct AovBinding {
    pub name: Token,
    pub descriptor: AovDescriptor,
    pub dimensions: (u32, u32),
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// Set when this AOV is bound to a buffer owned by a previous pass
    /// instead of one this manager allocated.
    pub external: bool,
}

/// An AOV supplied by an earlier pass, to be consumed as input (§4.2 `inputAOVs`).
#[derive(Clone)]
pub struct InputAovBinding {
    pub name: Token,
    pub renderer_name: &'static str,
    /// The producing pass's own texture. Only needed when the binding gets
    /// composed rather than reused in place — i.e. a `color` input from a
    /// different renderer than this manager's own; same-renderer bindings
    /// (and `depth`) are rebound directly and never read this field.
    pub source_texture: Option<wgpu::Texture>,
}

/// Parallel binding lists consulted by render tasks (§4.3 `AovParams`).
#[derive(Default, Clone)]
pub struct AovParams {
    /// Bindings the *first* render task in a frame uses (applies the clear value).
    pub clear: Vec<Token>,
    /// Bindings every subsequent render task uses (no clear).
    pub no_clear: Vec<Token>,
    /// Depth-only bindings consumed by volume rendering.
    pub input: Vec<Token>,
}

pub struct RenderBufferManager {
    renderer_display_name: &'static str,
    owned: FxHashMap<Token, AovBinding>,
    owned_order: Vec<Token>,
    viewport_aov: Option<Token>,
    clear_colors: FxHashMap<Token, ClearValue>,
    aov_params: AovParams,
    render_buffer_size: (u32, u32),
    msaa_sample_count: u32,
    msaa_enabled: bool,
    aov_supported: bool,
    last_inputs: Vec<InputAovBinding>,
}

impl RenderBufferManager {
    #[must_use]
    pub fn new(renderer_display_name: &'static str, aov_supported: bool) -> Self {
        Self {
            renderer_display_name,
            owned: FxHashMap::default(),
            owned_order: Vec::new(),
            viewport_aov: None,
            clear_colors: FxHashMap::default(),
            aov_params: AovParams::default(),
            render_buffer_size: (0, 0),
            msaa_sample_count: 1,
            msaa_enabled: false,
            aov_supported,
            last_inputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_aov_supported(&self) -> bool {
        self.aov_supported
    }

    #[must_use]
    pub fn render_buffer_size(&self) -> (u32, u32) {
        self.render_buffer_size
    }

    #[must_use]
    pub fn viewport_aov(&self) -> Option<Token> {
        self.viewport_aov
    }

    #[must_use]
    pub fn aov_params(&self) -> &AovParams {
        &self.aov_params
    }

    pub fn set_render_output_clear_color(&mut self, name: Token, value: Option<ClearValue>) {
        match value {
            Some(v) => {
                self.clear_colors.insert(name, v);
            }
            None => {
                self.clear_colors.remove(name);
            }
        }
    }

    /// §4.3 `SetRenderOutputs`: declares the AOV set this pass should produce,
    /// optionally taking some of them as input from a previous pass.
    ///
    /// Depth is re-bound from the producing pass rather than copied, to keep
    /// its full sub-pixel resolution; this is only correct so long as no
    /// task between the two passes writes the depth buffer. That ordering
    /// constraint is not checked at runtime — callers composing passes must
    /// uphold it themselves.
    pub fn set_render_outputs(
        &mut self,
        wgpu: &WgpuContext,
        delegate: &dyn RenderDelegate,
        names: &[Token],
        inputs: &[InputAovBinding],
        viewport_aov: Token,
    ) {
        if !self.aov_supported {
            return;
        }

        let unchanged = names.iter().copied().eq(self.owned_order.iter().copied())
            && inputs.len() == self.last_inputs.len()
            && inputs
                .iter()
                .zip(self.last_inputs.iter())
                .all(|(a, b)| a.name == b.name && a.renderer_name == b.renderer_name);
        if unchanged {
            self.viewport_aov = Some(viewport_aov);
            return;
        }

        self.owned.clear();
        self.owned_order.clear();
        self.aov_params = AovParams::default();

        for &name in names {
            let Some(descriptor) = delegate.default_aov_descriptor(name) else {
                log::warn!("AOV '{name}' rejected: unsupported format");
                continue;
            };
            if descriptor.format == INVALID_FORMAT {
                log::warn!("AOV '{name}' rejected: invalid format");
                continue;
            }

            let reuse_external = inputs.iter().find(|i| i.name == name).is_some_and(|input| {
                input.renderer_name == self.renderer_display_name && name != crate::ids::tokens::DEPTH
            });

            if reuse_external {
                log::debug!("AOV '{name}' bound externally (depth kept for sub-pixel resolution)");
                continue;
            }

            let (texture, view) = wgpu.create_attachment(
                &format!("aov:{name}"),
                self.render_buffer_size,
                descriptor.format,
                wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::COPY_DST,
            );

            self.owned.insert(
                name,
                AovBinding {
                    name,
                    descriptor,
                    dimensions: self.render_buffer_size,
                    texture,
                    view,
                    external: false,
                },
            );
            self.owned_order.push(name);
        }

        self.aov_params.clear = self.owned_order.clone();
        self.aov_params.no_clear = self.owned_order.clone();
        if self.owned.contains_key(&crate::ids::tokens::DEPTH) {
            self.aov_params.input.push(crate::ids::tokens::DEPTH);
        }

        self.viewport_aov = Some(viewport_aov);
        self.last_inputs = inputs.to_vec();

        // Cross-pass color compose (§4.3): a `color` input from a *different*
        // renderer isn't rebound in place like same-renderer bindings are —
        // this manager owns a fresh color texture for it above, which must
        // be seeded with the producing pass's result before anything else
        // draws into it this frame.
        if let Some(input) = inputs
            .iter()
            .find(|i| i.name == crate::ids::tokens::COLOR && i.renderer_name != self.renderer_display_name)
        {
            if let Some(color) = self.owned.get(&crate::ids::tokens::COLOR) {
                match &input.source_texture {
                    Some(source) => {
                        let mut encoder = wgpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("crossPassColorCompose"),
                        });
                        encoder.copy_texture_to_texture(
                            wgpu::TexelCopyTextureInfo {
                                texture: source,
                                mip_level: 0,
                                origin: wgpu::Origin3d::ZERO,
                                aspect: wgpu::TextureAspect::All,
                            },
                            wgpu::TexelCopyTextureInfo {
                                texture: &color.texture,
                                mip_level: 0,
                                origin: wgpu::Origin3d::ZERO,
                                aspect: wgpu::TextureAspect::All,
                            },
                            wgpu::Extent3d {
                                width: color.dimensions.0,
                                height: color.dimensions.1,
                                depth_or_array_layers: 1,
                            },
                        );
                        wgpu.queue.submit(Some(encoder.finish()));
                    }
                    None => log::warn!(
                        "cross-pass color compose requested for '{}' but the input binding carried no source texture; color buffer left at its clear value",
                        input.name
                    ),
                }
            }
        }
    }

    /// §4.3 `SetBufferSizeAndMsaa`. Idempotent when nothing changed.
    pub fn set_buffer_size_and_msaa(
        &mut self,
        wgpu: &WgpuContext,
        delegate: &dyn RenderDelegate,
        new_size: (u32, u32),
        sample_count: u32,
        enabled: bool,
    ) {
        if new_size == self.render_buffer_size
            && sample_count == self.msaa_sample_count
            && enabled == self.msaa_enabled
        {
            return;
        }
        self.render_buffer_size = new_size;
        self.msaa_sample_count = sample_count;
        self.msaa_enabled = enabled;

        let names = self.owned_order.clone();
        for name in names {
            if let Some(binding) = self.owned.get(&name) {
                let format = binding.descriptor.format;
                let (texture, view) = wgpu.create_attachment(
                    &format!("aov:{name}"),
                    new_size,
                    format,
                    wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::COPY_DST,
                );
                self.owned.insert(
                    name,
                    AovBinding {
                        name,
                        descriptor: binding.descriptor,
                        dimensions: new_size,
                        texture,
                        view,
                        external: false,
                    },
                );
            }
        }
        let _ = delegate;
    }

    #[must_use]
    pub fn get_render_output(&self, name: Token) -> Option<&AovBinding> {
        self.owned.get(&name)
    }

    #[must_use]
    pub fn owned_aov_names(&self) -> &[Token] {
        &self.owned_order
    }

    /// Builds the AOV-token → texture-view map tasks read from an
    /// [`crate::graph::ExecuteContext`].
    // Views are cheap to recreate per frame; callers needing the exact
    // same GPU object across a frame should use `get_render_output`.
    #[must_use]
    pub fn aov_views(&self) -> FxHashMap<Token, wgpu::TextureView> {
        self.owned
            .iter()
            .map(|(name, b)| {
                (*name, b.texture.create_view(&wgpu::TextureViewDescriptor::default()))
            })
            .collect()
    }

    /// Builds the AOV-token → texture map, for tasks needing
    /// `copy_texture_to_texture`/`copy_texture_to_buffer` instead of a view.
    #[must_use]
    pub fn aov_textures(&self) -> FxHashMap<Token, wgpu::Texture> {
        self.owned.iter().map(|(name, b)| (*name, b.texture.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::tokens;

    struct MockDelegate;
    impl RenderDelegate for MockDelegate {
        fn execute(&mut self, _tasks: &mut [Box<dyn crate::graph::RenderNode>]) {}
        fn default_aov_descriptor(&self, name: Token) -> Option<AovDescriptor> {
            if name == "bogus" {
                return None;
            }
            Some(AovDescriptor {
                format: wgpu::TextureFormat::Rgba8Unorm,
                clear_value: ClearValue::Color([0.0, 0.0, 0.0, 1.0]),
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
    fn unsupported_aov_is_dropped_without_panicking() {
        let mut rbm = RenderBufferManager::new("mock", true);
        let delegate = MockDelegate;
        // No GPU device in unit tests; exercise only the bookkeeping paths
        // that don't require a real wgpu::Device.
        rbm.set_render_output_clear_color(tokens::COLOR, Some(ClearValue::Color([1.0; 4])));
        assert!(rbm.clear_colors.contains_key(tokens::COLOR));
    }
}
