use crate::constants::MAX_FRAME_DT_MS;
use crate::dom;
use crate::render::CanvasSurface;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tendril_core::{Engine, FrameTicket, PointerTracker, TickOutcome};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub engine: Rc<RefCell<Engine>>,
    pub tracker: Rc<RefCell<PointerTracker>>,
    pub paused: Rc<RefCell<bool>>,
    pub surface: CanvasSurface,
    pub last_instant: Instant,
    /// Epoch this frame was scheduled against.
    pub ticket: FrameTicket,
}

impl FrameContext {
    pub fn new(
        engine: Rc<RefCell<Engine>>,
        tracker: Rc<RefCell<PointerTracker>>,
        paused: Rc<RefCell<bool>>,
        surface: CanvasSurface,
    ) -> Self {
        let ticket = engine.borrow().ticket();
        Self {
            engine,
            tracker,
            paused,
            surface,
            last_instant: Instant::now(),
            ticket,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_ms = (now - self.last_instant).as_secs_f64() * 1000.0;
        self.last_instant = now;

        let mut engine = self.engine.borrow_mut();
        if !*self.paused.borrow() {
            let snapshot = self.tracker.borrow().snapshot();
            if let TickOutcome::Stale = engine.tick(self.ticket, dt_ms.min(MAX_FRAME_DT_MS), &snapshot) {
                log::debug!("[frame] dropped tick scheduled before rebuild");
            }
        }

        let list = engine.render();
        self.ticket = engine.ticket();
        drop(engine);

        let drawn = self
            .surface
            .begin_frame(dom::device_pixel_ratio())
            .and_then(|_| list.replay(&mut self.surface));
        if let Err(e) = drawn {
            log::warn!("[frame] draw failed: {e:?}");
        }
    }
}

/// Handle to a running animation-frame loop.
#[derive(Clone)]
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    /// Cancel the pending frame; the loop does not reschedule itself afterwards.
    pub fn stop(&self) {
        self.running.set(false);
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
    }
}

fn request_frame(callback: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = callback.borrow().as_ref() {
        pending.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameLoop {
    let handle = FrameLoop {
        running: Rc::new(Cell::new(true)),
        pending: Rc::new(Cell::new(None)),
    };
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let loop_handle = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        loop_handle.pending.set(None);
        if !loop_handle.running.get() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone, &loop_handle.pending);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &handle.pending);
    handle
}
