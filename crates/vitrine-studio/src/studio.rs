use std::path::Path;

use glam::Vec2;
use vitrine_engine::coords::Camera;
use vitrine_engine::core::{App, AppControl, FrameCtx};
use vitrine_engine::mesh::Model;
use vitrine_engine::paint::Color;
use vitrine_engine::render::{
    DecodedImage, GlassMesh, GlassRenderer, OffscreenTarget, QuadRenderer, TextRenderer, TextureStore, decode_image,
};
use vitrine_engine::text::{FontId, FontSystem};
use vitrine_engine::window::CursorIcon;
use vitrine_scene::measure::MonospaceMeasure;
use vitrine_scene::prelude::*;

use crate::navigate::WindowNavigator;

const BACKGROUND: &str = "#5227ff";

/// A decoded image waiting for the GPU.
struct PendingImage {
    index: usize,
    key: String,
    image: DecodedImage,
}

pub struct Studio {
    portfolio: Portfolio,
    camera: Camera,
    background: Color,

    fonts: FontSystem,
    font: Option<FontId>,

    model: Option<Model>,
    mesh_key: String,
    pending: Vec<PendingImage>,
    hovering: bool,

    textures: TextureStore,
    offscreen: OffscreenTarget,
    content_quads: QuadRenderer,
    content_text: TextRenderer,
    overlay_text: TextRenderer,
    glass: GlassRenderer,
}

impl Studio {
    /// Decodes images and builds the scene. Missing assets degrade to
    /// placeholders and a missing font to untitled, unlabelled output.
    pub fn new(config: PortfolioConfig, asset_root: &Path, font_bytes: Vec<u8>) -> Self {
        let mut fonts = FontSystem::new();
        let font = match fonts.load_font(&font_bytes) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("no usable system font ({err}); text is disabled");
                None
            }
        };

        let pending: Vec<PendingImage> = config
            .images
            .iter()
            .enumerate()
            .map(|(index, spec)| PendingImage {
                index,
                key: spec.url.clone(),
                image: load_image(asset_root, &spec.url),
            })
            .collect();
        let aspects: Vec<f32> = pending.iter().map(|p| p.image.aspect()).collect();

        let profile = config.mode.profile();
        let model = Model::builtin(profile.model);
        let geometry_width = model
            .as_ref()
            .and_then(|m| m.node(profile.node))
            .and_then(|mesh| mesh.bounds())
            .map(|b| b.size().x);
        let mesh_key = format!("{}/{}", profile.model, profile.node);

        let mut portfolio = Portfolio::new(config, geometry_width, &aspects);
        if let Some(font) = font {
            portfolio.set_font(font);
        }

        Self {
            portfolio,
            camera: Camera::default(),
            background: Color::from_hex(BACKGROUND).unwrap_or(Color::BLACK),
            fonts,
            font,
            model,
            mesh_key,
            pending,
            hovering: false,
            textures: TextureStore::new(),
            offscreen: OffscreenTarget::new(),
            content_quads: QuadRenderer::new(),
            content_text: TextRenderer::new(),
            overlay_text: TextRenderer::new(),
            glass: GlassRenderer::new(),
        }
    }
}

fn load_image(root: &Path, url: &str) -> DecodedImage {
    if url.starts_with("http://") || url.starts_with("https://") {
        log::warn!("remote image {url} is not fetched; using a placeholder");
        return DecodedImage::placeholder();
    }
    let path = root.join(url);
    match decode_image(&path) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("{err:#}; using a placeholder");
            DecodedImage::placeholder()
        }
    }
}

impl App for Studio {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Studio {
            portfolio,
            camera,
            background,
            fonts,
            font,
            model,
            mesh_key,
            pending,
            hovering,
            textures,
            offscreen,
            content_quads,
            content_text,
            overlay_text,
            glass,
        } = self;
        let fonts: &FontSystem = fonts;

        let (width, height) = ctx.window.logical_size();
        let frame = ctx.input_frame;

        portfolio.set_viewport_height(height);
        if frame.scroll_delta != 0.0 {
            portfolio.on_wheel(frame.scroll_delta, height);
        }
        for key in &frame.keys_pressed {
            portfolio.on_key(*key);
        }

        let scroll = portfolio.tick_scroll(ctx.time.dt);
        let input = FrameInput::new(
            ctx.time.dt,
            ctx.time.elapsed,
            ctx.input.pointer_ndc((width, height)),
            scroll,
            *camera,
            Vec2::new(width, height),
        );

        let monospace = MonospaceMeasure::default();
        let font_measure = (*font).map(|id| FontMeasure { fonts, font: id });
        let measure: &dyn MeasureText = match &font_measure {
            Some(m) => m,
            None => &monospace,
        };

        if frame.clicked() {
            if let Some(target) = portfolio.on_click(&input, measure) {
                let base_title = portfolio.config().title.clone();
                let mut navigator = WindowNavigator { window: &ctx.window, base_title: &base_title };
                portfolio.follow(&target, &mut navigator);
            }
        }

        let hover = portfolio.hovering(&input, measure);
        if hover != *hovering {
            *hovering = hover;
            ctx.window.set_cursor(if hover { CursorIcon::Pointer } else { CursorIcon::Default });
        }

        let mut out = portfolio.tick(&input, measure);
        let view_proj = camera.view_proj(input.aspect);
        let camera = *camera;

        ctx.render_layered(
            *background,
            offscreen,
            |rctx, target| {
                let mut uploaded = false;
                for p in pending.drain(..) {
                    if let Some(id) = textures.upload(rctx, &p.key, &p.image) {
                        portfolio.gallery_mut().set_texture(p.index, id);
                        uploaded = true;
                    }
                }
                // Quads recorded before the upload carry no texture.
                if uploaded {
                    out.content.clear();
                    portfolio.emit_content(&input, &mut out.content);
                }
                content_quads.render(rctx, target, &mut out.content, textures, view_proj);
                content_text.render(rctx, target, &mut out.content, fonts, &camera);
            },
            |rctx, target, offscreen| {
                glass.blit(rctx, target, offscreen);
                if let Some(data) = model.as_ref().and_then(|m| m.node(out.glass.node)) {
                    let mesh = GlassMesh { key: mesh_key.as_str(), data, transform: out.glass.transform.matrix() };
                    glass.draw(rctx, target, offscreen, mesh, &out.glass.material, view_proj);
                }
                overlay_text.render(rctx, target, &mut out.overlay, fonts, &camera);
            },
        )
    }
}
