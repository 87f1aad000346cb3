use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use web_sys::{Performance, Window};

use super::{with_engine, WebEngine};
use crate::schedule::{Scheduler, Task};

/// Scheduler over `requestAnimationFrame` and `setTimeout`
///
/// Frame tasks requested before the next frame share one animation frame
/// callback, which drains them in request order.
pub struct WebScheduler {
    engine: Weak<RefCell<WebEngine>>,
    performance: Option<Performance>,
    frame_queue: Rc<RefCell<Vec<Task>>>,
    frame_handle: Rc<RefCell<Option<AnimationFrame>>>,
}

impl WebScheduler {
    pub fn new(window: &Window, engine: Weak<RefCell<WebEngine>>) -> Self {
        Self {
            engine,
            performance: window.performance(),
            frame_queue: Rc::new(RefCell::new(Vec::new())),
            frame_handle: Rc::new(RefCell::new(None)),
        }
    }
}

impl Scheduler for WebScheduler {
    fn now(&self) -> f64 {
        self.performance
            .as_ref()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&mut self, task: Task) {
        self.frame_queue.borrow_mut().push(task);
        if self.frame_handle.borrow().is_some() {
            return;
        }

        let queue = Rc::clone(&self.frame_queue);
        let slot = Rc::clone(&self.frame_handle);
        let engine = self.engine.clone();
        let handle = request_animation_frame(move |_| {
            slot.borrow_mut().take();
            let tasks: Vec<Task> = queue.borrow_mut().drain(..).collect();
            with_engine(&engine, |engine| {
                for task in tasks {
                    engine.dispatch(task);
                }
            });
        });
        *self.frame_handle.borrow_mut() = Some(handle);
    }

    fn set_timeout(&mut self, delay_ms: f64, task: Task) {
        let engine = self.engine.clone();
        let delay = delay_ms.max(0.0).round() as u32;
        Timeout::new(delay, move || {
            with_engine(&engine, |engine| engine.dispatch(task));
        })
        .forget();
    }
}
