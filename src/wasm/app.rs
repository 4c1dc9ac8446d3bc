use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsValue;
use web_sys::{Event, MouseEvent, PageTransitionEvent};

use super::audio::AudioCues;
use super::canvas::{CanvasFrame, CanvasSurface};
use super::context::FxContext;
use super::cursor::CursorFollower;
use super::dom;
use super::form;
use super::preloader;
use super::render::RenderLoop;
use super::stages::{self, DomStageHooks, StageDriver};
use super::timers::{Debouncer, Timers};
use crate::geometry::{Bounds, Vec2};
use crate::scene::Scene;
use crate::sequencer::{CancelToken, StageSequencer};

const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Composition root: owns every component and wires each exactly once.
pub struct App {
    ctx: Rc<FxContext>,
    scene: Rc<RefCell<Scene>>,
    frame: Option<CanvasFrame>,
    render: RefCell<Option<RenderLoop>>,
    cursor: RefCell<Option<CursorFollower>>,
    driver: StageDriver,
    boot_timers: Timers,
}

impl App {
    pub fn boot() -> Result<Rc<Self>, JsValue> {
        let ctx = Rc::new(FxContext::from_window()?);
        log::set_max_level(ctx.config.log_filter());

        let frame = ctx.canvas().map(CanvasFrame::new);
        let bounds = frame
            .as_ref()
            .map(CanvasFrame::fit_to_parent)
            .unwrap_or(Bounds::new(0.0, 0.0));
        let scene = Rc::new(RefCell::new(Scene::new(&ctx.config, bounds)));

        let stage_timers = Timers::new(ctx.window.clone());
        let fields = form::inputs(&ctx).len();
        let driver = StageDriver {
            ctx: ctx.clone(),
            scene: scene.clone(),
            frame: frame.clone(),
            sequencer: Rc::new(RefCell::new(StageSequencer::new(
                ctx.config.stages.clone(),
                fields,
            ))),
            hooks: Rc::new(DomStageHooks::new(
                ctx.clone(),
                scene.clone(),
                stage_timers.clone(),
            )),
            timers: stage_timers,
            cancel: CancelToken::new(),
            audio: Rc::new(AudioCues::new(ctx.config.audio)),
        };

        let app = Rc::new(Self {
            boot_timers: Timers::new(ctx.window.clone()),
            ctx,
            scene,
            frame,
            render: RefCell::new(None),
            cursor: RefCell::new(None),
            driver,
        });

        // Listen before the preloader can possibly fire the event.
        let ready = preloader::page_ready(&app.ctx.document);
        preloader::start(&app.ctx, &app.boot_timers)?;

        app.wire_pointer()?;
        app.wire_resize()?;
        form::wire(&app.ctx, &app.scene, app.frame.clone())?;
        stages::wire(&app.driver)?;

        {
            let window = app.ctx.window.clone();
            let app = app.clone();
            dom::listen(&window, "pagehide", move |_: Event| app.shutdown())?;
        }
        {
            let window = app.ctx.window.clone();
            let app = app.clone();
            dom::listen(&window, "pageshow", move |e: PageTransitionEvent| {
                if e.persisted() {
                    app.resume();
                }
            })?;
        }
        {
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if ready.await.is_ok() {
                    app.on_page_ready();
                }
            });
        }
        log::info!(
            "neon fx booted: canvas={}, audio={}, fields={fields}",
            app.frame.is_some(),
            app.driver.audio.is_enabled()
        );
        Ok(app)
    }

    fn on_page_ready(&self) {
        *self.cursor.borrow_mut() = Some(CursorFollower::detect(&self.ctx));
        self.start_render();
    }

    fn start_render(&self) {
        if self.render.borrow().is_some() {
            return;
        }
        let Some(frame) = &self.frame else {
            log::info!("no #particles-canvas, skipping render loop");
            return;
        };
        let started = CanvasSurface::new(frame.element())
            .and_then(|surface| RenderLoop::start(self.scene.clone(), surface));
        match started {
            Ok(render) => *self.render.borrow_mut() = Some(render),
            Err(e) => log::warn!("render loop not started: {e:?}"),
        }
    }

    fn wire_pointer(self: &Rc<Self>) -> Result<(), JsValue> {
        {
            let app = self.clone();
            dom::listen(&self.ctx.document, "mousemove", move |e: MouseEvent| {
                let client = Vec2::new(f64::from(e.client_x()), f64::from(e.client_y()));
                if let Some(frame) = &app.frame {
                    app.scene.borrow_mut().pointer_moved(frame.to_canvas(client));
                }
                if let Some(cursor) = app.cursor.borrow().as_ref() {
                    cursor.move_to(client.x, client.y);
                }
            })?;
        }
        let app = self.clone();
        dom::listen(&self.ctx.document, "click", move |e: MouseEvent| {
            let Some(frame) = &app.frame else {
                return;
            };
            let client = Vec2::new(f64::from(e.client_x()), f64::from(e.client_y()));
            app.scene.borrow_mut().click(frame.to_canvas(client));
        })
    }

    fn wire_resize(self: &Rc<Self>) -> Result<(), JsValue> {
        let Some(frame) = self.frame.clone() else {
            return Ok(());
        };
        let debouncer = Debouncer::new(self.ctx.window.clone(), RESIZE_DEBOUNCE);
        let scene = self.scene.clone();
        dom::listen(&self.ctx.window, "resize", move |_: Event| {
            let (frame, scene) = (frame.clone(), scene.clone());
            debouncer.call(move || {
                let bounds = frame.fit_to_parent();
                scene.borrow_mut().resize(bounds);
            });
        })
    }

    /// Back from the back/forward cache: re-arm the stages and restart drawing.
    fn resume(&self) {
        self.driver.cancel.reset();
        self.driver.resume();
        self.start_render();
        log::info!("neon fx resumed from the back/forward cache");
    }

    /// Stops the loop and every pending timer; used on navigation away.
    pub fn shutdown(&self) {
        let cleared = self.driver.timers.pending() + self.boot_timers.pending();
        if let Some(render) = self.render.borrow_mut().take() {
            render.stop();
        }
        self.driver.cancel.cancel();
        self.driver.timers.cancel_all();
        self.boot_timers.cancel_all();
        log::info!("neon fx shut down, {cleared} timers cleared");
    }
}
