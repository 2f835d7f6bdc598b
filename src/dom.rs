use crate::input;
use glam::Vec2;
use tendril_core::Viewport;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

#[inline]
pub fn css_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

/// Match the canvas backing store to its CSS size times devicePixelRatio and
/// return the CSS-pixel viewport the simulation runs in.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> Viewport {
    let css = css_size(canvas);
    let (w, h) = input::backing_size(css, device_pixel_ratio());
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    input::css_viewport(css)
}
