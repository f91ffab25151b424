/// Color target the content scene is rendered into before compositing.
///
/// Sized to the surface in physical pixels and created with the surface
/// format, so the same pipelines draw into either target. `generation` bumps
/// on every reallocation; samplers of the view rebuild their bind groups when
/// it changes.
#[derive(Default)]
pub struct OffscreenTarget {
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    size: (u32, u32),
    format: Option<wgpu::TextureFormat>,
    generation: u64,
}

impl OffscreenTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)allocates the texture when size or format changed.
    pub fn ensure(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if self.view.is_some() && self.size == size && self.format == Some(format) {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("vitrine offscreen target"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        log::debug!("offscreen target resized to {}x{}", size.0, size.1);
        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.size = size;
        self.format = Some(format);
        self.generation += 1;
    }

    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
