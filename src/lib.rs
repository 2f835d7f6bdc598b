#![cfg(target_arch = "wasm32")]
//! Browser frontend: drives a [`tendril_core::Engine`] from
//! requestAnimationFrame and draws it onto `#tendril-canvas`.

use anyhow::anyhow;
use std::cell::RefCell;
use std::rc::Rc;
use tendril_core::Engine;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

use constants::{CANVAS_ID, PROFILE_ATTR};

thread_local! {
    static RUNNING: RefCell<Option<Running>> = const { RefCell::new(None) };
}

struct Running {
    frame_loop: frame::FrameLoop,
    engine: Rc<RefCell<Engine>>,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tendril-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
        return Err(JsValue::from_str(&e.to_string()));
    }
    Ok(())
}

/// Stop the animation loop and drop the chain. Listeners stay attached but
/// see a torn-down engine.
#[wasm_bindgen]
pub fn stop() {
    RUNNING.with(|running| {
        if let Some(r) = running.borrow_mut().take() {
            r.frame_loop.stop();
            r.engine.borrow_mut().teardown();
            log::info!("tendril-web stopped");
        }
    });
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow!("no window or document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow!("#{CANVAS_ID} is not a canvas: {:?}", e))?;
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| anyhow!("get_context failed: {:?}", e))?
        .ok_or_else(|| anyhow!("2d context unavailable"))?
        .dyn_into()
        .map_err(|e| anyhow!("unexpected context type: {:?}", e))?;

    let profile = input::profile_for_attr(canvas.get_attribute(PROFILE_ATTR).as_deref());
    log::info!("[init] orientation={:?}", profile.orientation);

    let viewport = dom::sync_canvas_backing_size(&canvas);
    let engine = Engine::with_viewport(profile, viewport)?;
    let tracker = Rc::new(RefCell::new(engine.tracker()));
    let engine = Rc::new(RefCell::new(engine));
    let paused = Rc::new(RefCell::new(false));

    let wiring = events::InputWiring {
        canvas,
        engine: engine.clone(),
        tracker: tracker.clone(),
        paused: paused.clone(),
    };
    events::wire_resize(&wiring);
    events::wire_input_handlers(wiring);
    events::wire_global_keydown(engine.clone(), tracker.clone(), paused.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        engine.clone(),
        tracker,
        paused,
        render::CanvasSurface::new(ctx),
    )));
    let frame_loop = frame::start_loop(frame_ctx);

    RUNNING.with(|running| {
        if let Some(previous) = running.borrow_mut().replace(Running { frame_loop, engine }) {
            previous.frame_loop.stop();
        }
    });
    Ok(())
}
