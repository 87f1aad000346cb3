//! Browser host
//!
//! Binds the engine to `web_sys`: a [`WebDocument`] over the live DOM, a
//! [`WebScheduler`] over `requestAnimationFrame` and timeouts, and `gloo`
//! listeners forwarding scroll and pointer events.

mod document;
mod scheduler;
mod logging;

pub use document::WebDocument;
pub use scheduler::WebScheduler;
pub use logging::init_logging;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use crate::config::EngineConfig;
use crate::engine::Orchestrator;
use crate::error::{EngineError, Result};

pub type WebEngine = Orchestrator<WebDocument, WebScheduler>;

/// Run `f` against the engine if it is still alive and not already borrowed
pub(crate) fn with_engine(engine: &Weak<RefCell<WebEngine>>, f: impl FnOnce(&mut WebEngine)) {
    let Some(engine) = engine.upgrade() else {
        return;
    };
    let Ok(mut engine) = engine.try_borrow_mut() else {
        tracing::warn!("Motion engine busy; dropped a callback");
        return;
    };
    f(&mut engine);
}

/// Build and initialize an engine for the current page
pub fn create_engine(config: EngineConfig) -> Result<Rc<RefCell<WebEngine>>> {
    let window = web_sys::window().ok_or(EngineError::CapabilityMissing("window"))?;
    let document = window
        .document()
        .ok_or(EngineError::CapabilityMissing("document"))?;

    let engine = Rc::new_cyclic(|weak: &Weak<RefCell<WebEngine>>| {
        let doc = WebDocument::new(window.clone(), document, weak.clone());
        let scheduler = WebScheduler::new(&window, weak.clone());
        RefCell::new(Orchestrator::new(doc, scheduler, config))
    });

    engine.borrow_mut().initialize();
    Ok(engine)
}

/// Attach scroll and pointer listeners for the subsystems that asked for them.
/// Dropping the returned listeners detaches them.
pub fn install_listeners(engine: &Rc<RefCell<WebEngine>>) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let Some(window) = web_sys::window() else {
        return listeners;
    };

    let current = engine.borrow();

    if current.wants_scroll() {
        let weak = Rc::downgrade(engine);
        listeners.push(EventListener::new(&window, "scroll", move |_| {
            with_engine(&weak, |engine| engine.on_scroll());
        }));
    }

    for &id in current.pointer_targets() {
        let Some(element) = current.document().element(id).cloned() else {
            continue;
        };

        let weak = Rc::downgrade(engine);
        listeners.push(EventListener::new(&element, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = (event.client_x() as f64, event.client_y() as f64);
            with_engine(&weak, |engine| engine.on_pointer_move(id, x, y));
        }));

        let weak = Rc::downgrade(engine);
        listeners.push(EventListener::new(&element, "mouseleave", move |_| {
            with_engine(&weak, |engine| engine.on_pointer_leave(id));
        }));
    }

    tracing::debug!("Installed {} event listener(s)", listeners.len());
    listeners
}
