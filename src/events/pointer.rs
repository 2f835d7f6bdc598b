use crate::dom;
use crate::input;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use tendril_core::{Engine, PointerTracker};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub engine: Rc<RefCell<Engine>>,
    pub tracker: Rc<RefCell<PointerTracker>>,
    pub paused: Rc<RefCell<bool>>,
}

#[inline]
fn pointer_css_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    input::pointer_local(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
    )
}

fn listen(target: &web::EventTarget, kind: &str, handler: impl FnMut(web::PointerEvent) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::PointerEvent)>);
    if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
        log::warn!("[input] could not listen for {kind}: {e:?}");
    }
    closure.forget();
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
    wire_pointerleave(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w2 = w.clone();
    listen(&w.canvas, "pointermove", move |ev| {
        let pos = pointer_css_px(&ev, &w2.canvas);
        let now = w2.engine.borrow().now_ms();
        w2.tracker.borrow_mut().on_move(pos, now);
    });
}

fn wire_pointerdown(w: &InputWiring) {
    let w2 = w.clone();
    listen(&w.canvas, "pointerdown", move |ev| {
        let pos = pointer_css_px(&ev, &w2.canvas);
        let (now, tip, radius) = {
            let engine = w2.engine.borrow();
            (engine.now_ms(), engine.tip(), engine.capture_radius())
        };
        if w2.tracker.borrow_mut().on_down(pos, now, tip, radius) {
            // keep receiving moves while the tip is held outside the canvas
            _ = w2.canvas.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        }
    });
}

fn wire_pointerup(w: &InputWiring) {
    let w2 = w.clone();
    listen(&w.canvas, "pointerup", move |ev| {
        if w2.canvas.has_pointer_capture(ev.pointer_id()) {
            _ = w2.canvas.release_pointer_capture(ev.pointer_id());
        }
        w2.tracker.borrow_mut().on_up();
    });
}

fn wire_pointerleave(w: &InputWiring) {
    let w2 = w.clone();
    listen(&w.canvas, "pointerleave", move |_ev| {
        w2.tracker.borrow_mut().on_leave();
    });
}

/// Rebuild the chain whenever the window is resized.
pub fn wire_resize(w: &InputWiring) {
    let w2 = w.clone();
    let closure = Closure::wrap(Box::new(move || {
        let viewport = dom::sync_canvas_backing_size(&w2.canvas);
        let mut engine = w2.engine.borrow_mut();
        engine.resize(viewport);
        if *w2.paused.borrow() {
            engine.suspend();
        }
        log::debug!("[input] resized to {}x{}", viewport.width, viewport.height);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
