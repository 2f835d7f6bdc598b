use crate::dom;
use crate::input::{self, KeyAction};
use crate::overlay;
use std::cell::RefCell;
use std::rc::Rc;
use tendril_core::{Engine, PointerTracker};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    engine: &Rc<RefCell<Engine>>,
    tracker: &Rc<RefCell<PointerTracker>>,
    paused: &Rc<RefCell<bool>>,
) {
    let Some(action) = input::action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::TogglePause => {
            let mut p = paused.borrow_mut();
            *p = !*p;
            let mut eng = engine.borrow_mut();
            if *p {
                eng.suspend();
            } else {
                eng.resume();
            }
            log::info!("[keys] paused={}", *p);
            ev.prevent_default();
        }
        KeyAction::SwitchOrientation => {
            let mut eng = engine.borrow_mut();
            let profile = input::toggled_profile(eng.profile().orientation);
            match eng.set_profile(profile) {
                Ok(state) => {
                    *tracker.borrow_mut() = eng.tracker();
                    if *paused.borrow() {
                        eng.suspend();
                    }
                    log::info!("[keys] orientation={:?} lifecycle={:?}", eng.profile().orientation, state);
                }
                Err(e) => log::warn!("[keys] orientation switch rejected: {e}"),
            }
        }
        KeyAction::ToggleHint => {
            if let Some(doc) = dom::window_document() {
                overlay::toggle_hint(&doc);
            }
        }
    }
}

pub fn wire_global_keydown(
    engine: Rc<RefCell<Engine>>,
    tracker: Rc<RefCell<PointerTracker>>,
    paused: Rc<RefCell<bool>>,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &engine, &tracker, &paused);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
