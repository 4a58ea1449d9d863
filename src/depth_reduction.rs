//! Depth min/max reduction (§4.8): derives the near/far bounds an
//! auto-exposure or cascade-fitting pass needs from the current depth AOV.
//!
//! [`reduction_sizes`] models the intermediate sizes a compute-shader
//! reduction would halve through by [`REDUCTION_FACTOR`] per pass, stopping
//! once the texture is at or below [`MIN_TEXTURE_SIZE`]. This crate doesn't
//! carry that compute pipeline, so [`reduce_depth_min_max`] instead copies
//! the depth AOV straight to a staging buffer and scans it on the CPU —
//! slower per frame, but exact, and it never discards the input it was
//! asked to reduce.

use crate::wgpu_ctx::WgpuContext;

pub const REDUCTION_FACTOR: u32 = 8;
pub const MIN_TEXTURE_SIZE: u32 = 4;

fn next_reduced_size(dim: u32) -> u32 {
    ((dim + REDUCTION_FACTOR - 1) / REDUCTION_FACTOR).max(1)
}

/// Computes the sequence of intermediate texture sizes the fallback
/// reduction passes over, ending at the last size `<= MIN_TEXTURE_SIZE`.
#[must_use]
pub fn reduction_sizes(initial: (u32, u32)) -> Vec<(u32, u32)> {
    let mut sizes = Vec::new();
    let mut current = initial;
    loop {
        let next = (next_reduced_size(current.0), next_reduced_size(current.1));
        sizes.push(next);
        if next.0 <= MIN_TEXTURE_SIZE && next.1 <= MIN_TEXTURE_SIZE {
            break;
        }
        if next == current {
            break;
        }
        current = next;
    }
    sizes
}

/// Computes `(near, far)` from the current depth AOV. Non-float depth
/// formats can't be read back as comparable depth values; those return the
/// full `[0, 1]` range with a warning rather than failing the frame.
///
/// Blocks the calling thread on a GPU readback (`device.poll(PollType::Wait)`);
/// callers on a frame-critical path should only invoke this when the reduced
/// bounds are actually needed this frame, not speculatively every frame.
pub fn reduce_depth_min_max(
    wgpu: &WgpuContext,
    depth_format: wgpu::TextureFormat,
    depth_texture: &wgpu::Texture,
    size: (u32, u32),
) -> (f32, f32) {
    if !matches!(depth_format, wgpu::TextureFormat::Depth32Float | wgpu::TextureFormat::Depth32FloatStencil8) {
        log::warn!("depth reduction: format {depth_format:?} is not sampleable as float depth, using [0, 1]");
        return (0.0, 1.0);
    }

    let width = size.0.max(1);
    let height = size.1.max(1);
    const BYTES_PER_TEXEL: u32 = 4;
    let unpadded_bytes_per_row = width * BYTES_PER_TEXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

    let staging = wgpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("depthReduction:readback"),
        size: u64::from(padded_bytes_per_row) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder =
        wgpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("depthReduction") });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: depth_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::DepthOnly,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
    wgpu.queue.submit(Some(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = wgpu.device.poll(wgpu::PollType::Wait { submission_index: None, timeout: None });

    let Ok(Ok(())) = rx.recv() else {
        log::warn!("depth reduction: readback map failed, using [0, 1]");
        return (0.0, 1.0);
    };

    let mut near = f32::MAX;
    let mut far = f32::MIN;
    {
        let data = slice.get_mapped_range();
        for row in 0..height as usize {
            let row_start = row * padded_bytes_per_row as usize;
            for col in 0..width as usize {
                let offset = row_start + col * BYTES_PER_TEXEL as usize;
                let depth = f32::from_le_bytes(data[offset..offset + 4].try_into().unwrap());
                near = near.min(depth);
                far = far.max(depth);
            }
        }
    }
    staging.unmap();

    if near > far {
        (0.0, 1.0)
    } else {
        (near, far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_sizes_shrink_each_pass() {
        let sizes = reduction_sizes((1024, 1024));
        assert!(sizes.windows(2).all(|w| w[1].0 <= w[0].0 && w[1].1 <= w[0].1));
    }

    #[test]
    fn reduction_stops_at_or_below_min_texture_size() {
        let sizes = reduction_sizes((1024, 1024));
        let last = *sizes.last().unwrap();
        assert!(last.0 <= MIN_TEXTURE_SIZE && last.1 <= MIN_TEXTURE_SIZE);
    }

    #[test]
    fn tiny_input_reduces_in_one_pass() {
        let sizes = reduction_sizes((4, 4));
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes[0], (1, 1));
    }
}
