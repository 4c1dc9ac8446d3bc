use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use js_sys::{Function, Promise};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

use crate::sequencer::Sleeper;
use crate::timers::{TimerSet, TimerSlot};

fn millis(d: Duration) -> i32 {
    i32::try_from(d.as_millis()).unwrap_or(i32::MAX)
}

/// `setTimeout` handles owned by one feature so they can all be cleared.
#[derive(Clone)]
pub struct Timers {
    window: Window,
    pending: Rc<RefCell<TimerSet<i32>>>,
}

impl Timers {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            pending: Rc::new(RefCell::new(TimerSet::new())),
        }
    }

    /// Runs `f` once after `delay`.
    pub fn after(&self, delay: Duration, f: impl FnOnce() + 'static) {
        let id = Rc::new(Cell::new(None::<i32>));
        let pending = self.pending.clone();
        let fired_id = id.clone();
        let callback = Closure::once_into_js(move || {
            if let Some(h) = fired_id.get() {
                pending.borrow_mut().remove(&h);
            }
            f();
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis(delay),
            ) {
            Ok(h) => {
                id.set(Some(h));
                self.pending.borrow_mut().insert(h);
            }
            Err(e) => log::warn!("setTimeout failed: {e:?}"),
        }
    }

    /// Clears every timer still pending.
    pub fn cancel_all(&self) {
        let handles = self.pending.borrow_mut().drain();
        for h in handles {
            self.window.clear_timeout_with_handle(h);
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl Sleeper for Timers {
    fn sleep(&self, hold: Duration) -> impl Future<Output = ()> {
        let window = self.window.clone();
        let pending = self.pending.clone();
        let id = Rc::new(Cell::new(None::<i32>));
        let armed = id.clone();
        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            match window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis(hold))
            {
                Ok(h) => {
                    armed.set(Some(h));
                    pending.borrow_mut().insert(h);
                }
                Err(_) => {
                    let _ = resolve.call0(&JsValue::NULL);
                }
            }
        });
        let pending = self.pending.clone();
        async move {
            let _ = JsFuture::from(promise).await;
            if let Some(h) = id.get() {
                pending.borrow_mut().remove(&h);
            }
        }
    }
}

/// Delays a callback until calls stop arriving for `delay`.
pub struct Debouncer {
    window: Window,
    delay: Duration,
    slot: Rc<RefCell<TimerSlot<i32>>>,
}

impl Debouncer {
    pub fn new(window: Window, delay: Duration) -> Self {
        Self {
            window,
            delay,
            slot: Rc::new(RefCell::new(TimerSlot::new())),
        }
    }

    pub fn call(&self, f: impl FnOnce() + 'static) {
        let slot = self.slot.clone();
        let callback = Closure::once_into_js(move || {
            slot.borrow_mut().fired();
            f();
        });
        let Ok(h) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis(self.delay),
            )
        else {
            return;
        };
        let replaced = self.slot.borrow_mut().arm(h);
        if let Some(old) = replaced {
            self.window.clear_timeout_with_handle(old);
        }
    }

    /// Drops the pending call, if any.
    pub fn cancel(&self) {
        let pending = self.slot.borrow_mut().disarm();
        if let Some(h) = pending {
            self.window.clear_timeout_with_handle(h);
        }
    }
}
