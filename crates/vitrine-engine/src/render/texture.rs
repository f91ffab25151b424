use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use super::common::{linear_clamp_sampler, sampler_entry, texture_entry};
use super::RenderCtx;

/// Handle to a texture owned by a [`TextureStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub(crate) u32);

/// CPU-side RGBA8 image, decoded once and uploaded on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Flat grey stand-in for images that failed to load.
    pub fn placeholder() -> Self {
        Self { width: 1, height: 1, rgba: vec![96, 96, 96, 255] }
    }

    /// Width over height; `1.0` for degenerate images.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Decodes a PNG/JPEG/WebP file from disk into RGBA8.
pub fn decode_image(path: impl AsRef<Path>) -> anyhow::Result<DecodedImage> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(DecodedImage { width, height, rgba: img.into_raw() })
}

struct TextureEntry {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// GPU textures keyed by source path.
///
/// Every texture gets its own bind group (texture + shared sampler) against a
/// single layout, so renderers can switch textures with one `set_bind_group`.
/// Slot 0 is reserved for a 1×1 white texture used by solid quads.
#[derive(Default)]
pub struct TextureStore {
    layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    entries: Vec<TextureEntry>,
    by_key: HashMap<String, TextureId>,
}

const WHITE_KEY: &str = "<white>";

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_shared(&mut self, device: &wgpu::Device) {
        if self.layout.is_none() {
            self.layout = Some(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("vitrine texture bgl"),
                entries: &[texture_entry(0), sampler_entry(1)],
            }));
        }
        if self.sampler.is_none() {
            self.sampler = Some(linear_clamp_sampler(device, "vitrine texture sampler"));
        }
    }

    /// Layout every texture bind group is created against.
    pub(crate) fn layout(&mut self, device: &wgpu::Device) -> Option<&wgpu::BindGroupLayout> {
        self.ensure_shared(device);
        self.layout.as_ref()
    }

    /// Returns the id already uploaded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<TextureId> {
        self.by_key.get(key).copied()
    }

    /// Uploads `image` under `key`, or returns the cached id.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, key: &str, image: &DecodedImage) -> Option<TextureId> {
        if let Some(id) = self.get(key) {
            return Some(id);
        }
        let expected = image.width as usize * image.height as usize * 4;
        if image.width == 0 || image.height == 0 || image.rgba.len() != expected {
            log::warn!(
                "TextureStore: rejecting {key}: {}x{} with {} bytes",
                image.width,
                image.height,
                image.rgba.len()
            );
            return None;
        }

        self.ensure_shared(ctx.device);
        let layout = self.layout.as_ref()?;
        let sampler = self.sampler.as_ref()?;

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vitrine image texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vitrine image bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let id = TextureId(self.entries.len() as u32);
        self.entries.push(TextureEntry {
            _texture: texture,
            bind_group,
            size: (image.width, image.height),
        });
        self.by_key.insert(key.to_string(), id);
        log::debug!("TextureStore: uploaded {key} ({}x{})", image.width, image.height);
        Some(id)
    }

    /// 1×1 opaque white, multiplied by the quad color for solid fills.
    pub fn white(&mut self, ctx: &RenderCtx<'_>) -> Option<TextureId> {
        let white = DecodedImage { width: 1, height: 1, rgba: vec![255; 4] };
        self.upload(ctx, WHITE_KEY, &white)
    }

    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.entries.get(id.0 as usize).map(|e| e.size)
    }

    pub(crate) fn bind_group(&self, id: TextureId) -> Option<&wgpu::BindGroup> {
        self.entries.get(id.0 as usize).map(|e| &e.bind_group)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_square_and_opaque() {
        let p = DecodedImage::placeholder();
        assert_eq!(p.aspect(), 1.0);
        assert_eq!(p.rgba.len(), 4);
        assert_eq!(p.rgba[3], 255);
    }

    #[test]
    fn aspect_of_degenerate_image_is_one() {
        let img = DecodedImage { width: 0, height: 10, rgba: Vec::new() };
        assert_eq!(img.aspect(), 1.0);
        let wide = DecodedImage { width: 16, height: 9, rgba: vec![0; 16 * 9 * 4] };
        assert!((wide.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = decode_image("/nonexistent/vitrine/missing.png").unwrap_err();
        assert!(format!("{err:#}").contains("missing.png"));
    }

    #[test]
    fn empty_store_has_no_entries() {
        let store = TextureStore::new();
        assert!(store.is_empty());
        assert!(store.get("a.png").is_none());
    }
}
