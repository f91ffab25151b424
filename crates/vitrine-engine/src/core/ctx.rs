use winit::window::{CursorIcon, Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::{OffscreenTarget, RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Logical window size as `(width, height)`.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    pub fn set_cursor(&self, cursor: CursorIcon) {
        self.window.set_cursor(cursor);
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Two-layer frame: content into `offscreen`, then the composite onto the
    /// surface.
    ///
    /// Both passes are recorded on one encoder in that order, so everything
    /// `composite` samples from `offscreen` is this frame's content. The
    /// offscreen target follows the surface size and format.
    pub fn render_layered<C, K>(
        &mut self,
        clear: Color,
        offscreen: &mut OffscreenTarget,
        content: C,
        composite: K,
    ) -> AppControl
    where
        C: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
        K: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>, &OffscreenTarget),
    {
        let Some(mut frame) = self.acquire() else {
            return self.fatal_or_continue();
        };
        let rctx = self.render_ctx();

        let size = self.gpu.size();
        offscreen.ensure(self.gpu.device(), self.gpu.surface_format(), size.width, size.height);

        if let Some(view) = offscreen.view() {
            clear_pass(&mut frame.encoder, view, clear, "vitrine offscreen clear");
            let mut target = RenderTarget::new(&mut frame.encoder, view);
            content(&rctx, &mut target);
        }

        clear_pass(&mut frame.encoder, &frame.view, Color::BLACK, "vitrine surface clear");
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            composite(&rctx, &mut target, offscreen);
        }

        self.present(frame);
        AppControl::Continue
    }

    fn render_ctx(&self) -> RenderCtx<'_> {
        let (w, h) = self.window.logical_size();
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            Viewport::new(w, h),
            self.window.scale_factor(),
        )
    }

    /// Acquires the next surface texture, stashing the error policy outcome.
    fn acquire(&mut self) -> Option<GpuFrame> {
        match self.gpu.begin_frame() {
            Ok(frame) => Some(frame),
            Err(err) => {
                if self.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                    self.runtime.exit();
                }
                None
            }
        }
    }

    fn fatal_or_continue(&self) -> AppControl {
        if self.runtime.exit_requested() { AppControl::Exit } else { AppControl::Continue }
    }

    fn present(&mut self, frame: GpuFrame) {
        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
    }
}

fn clear_pass(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear: Color, label: &str) {
    let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color {
                    r: clear.r as f64,
                    g: clear.g as f64,
                    b: clear.b as f64,
                    a: clear.a as f64,
                }),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}
