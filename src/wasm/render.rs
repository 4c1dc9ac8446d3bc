use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::window;

use super::canvas::CanvasSurface;
use crate::scene::{FrameClock, Scene};

/// Handle to the running animation loop.
pub struct RenderLoop {
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl RenderLoop {
    /// Starts ticking `scene` onto `surface` every animation frame.
    pub fn start(scene: Rc<RefCell<Scene>>, mut surface: CanvasSurface) -> Result<Self, JsValue> {
        let running = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));

        // `f` holds the animation-frame closure so that it can keep calling
        // `request_animation_frame` on itself. Storing it inside an `Option`
        // lets us create the `Closure` first and then reference it from within.
        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let mut clock = FrameClock::new();
        {
            let running = running.clone();
            let pending = pending.clone();
            *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                pending.set(None);
                if !running.get() {
                    return;
                }

                let tick = clock.tick();
                scene.borrow_mut().tick(&mut surface);
                if let Some(fps) = tick.fps {
                    log::debug!("render loop at {fps:.1} fps, last frame {:?}", tick.dt);
                }

                // schedule next
                let next = window().and_then(|w| {
                    let frame = f.borrow();
                    let callback = frame.as_ref()?;
                    w.request_animation_frame(callback.as_ref().unchecked_ref())
                        .ok()
                });
                pending.set(next);
            }) as Box<dyn FnMut()>));
        }

        let w = window().ok_or("no window")?;
        let first = w.request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or("frame callback missing")?
                .as_ref()
                .unchecked_ref(),
        )?;
        pending.set(Some(first));
        log::info!("render loop started");

        Ok(Self {
            running,
            pending,
            frame: g,
        })
    }

    /// Cancels the queued frame; the loop never reschedules afterwards.
    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.pending.take(), window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // The closure references its own slot; dropping it breaks the cycle.
        self.frame.borrow_mut().take();
        log::info!("render loop stopped");
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
