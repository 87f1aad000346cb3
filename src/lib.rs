use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod reveal;
pub mod schedule;
pub mod web;

pub use config::EngineConfig;
pub use dom::{Document, ElementId, MemoryDocument, MemoryElement};
pub use engine::{MotionPreference, Orchestrator};
pub use error::EngineError;
pub use schedule::{ManualScheduler, Scheduler, Task};

use web::WebEngine;

thread_local! {
    /// Engine targeted by `refreshAnimations`
    static ACTIVE_ENGINE: RefCell<Weak<RefCell<WebEngine>>> = RefCell::new(Weak::new());
}

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Page motion engine exposed to JavaScript
#[wasm_bindgen]
pub struct MotionEngine {
    engine: Rc<RefCell<WebEngine>>,
    /// Held so the scroll and pointer listeners stay attached
    _listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl MotionEngine {
    /// Start the engine with default markers and timings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MotionEngine, JsValue> {
        Self::start(EngineConfig::default())
    }

    /// Start the engine from a YAML configuration
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(yaml: &str) -> Result<MotionEngine, JsValue> {
        let config = EngineConfig::from_yaml(yaml)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::start(config)
    }

    /// Re-scan for scroll-reveal elements inserted after load
    #[wasm_bindgen]
    pub fn refresh(&self) {
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            engine.refresh();
        }
    }

    /// Whether the page asked for reduced motion at startup
    #[wasm_bindgen(js_name = reducedMotion)]
    pub fn reduced_motion(&self) -> bool {
        self.engine.borrow().reduced_motion()
    }
}

impl MotionEngine {
    fn start(config: EngineConfig) -> Result<MotionEngine, JsValue> {
        web::init_logging(&config.log_level);

        let engine = web::create_engine(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let listeners = web::install_listeners(&engine);

        ACTIVE_ENGINE.with(|active| *active.borrow_mut() = Rc::downgrade(&engine));

        Ok(Self {
            engine,
            _listeners: listeners,
        })
    }
}

/// Re-scan the most recently started engine for new scroll-reveal elements.
/// Does nothing before an engine exists.
#[wasm_bindgen(js_name = refreshAnimations)]
pub fn refresh_animations() {
    let engine = ACTIVE_ENGINE.with(|active| active.borrow().upgrade());
    if let Some(engine) = engine {
        if let Ok(mut engine) = engine.try_borrow_mut() {
            engine.refresh();
        }
    }
}
