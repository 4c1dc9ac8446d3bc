use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsValue;
use web_sys::{Element, Event, MouseEvent};

use super::audio::AudioCues;
use super::canvas::CanvasFrame;
use super::context::FxContext;
use super::dom;
use super::form;
use super::timers::Timers;
use crate::audio::Cue;
use crate::error::SequenceError;
use crate::scene::Scene;
use crate::sequencer::{
    play, CancelToken, Choreography, Phase, Stage, StageHooks, StageSequencer, SubmitOutcome,
};

const EXIT_EASE: &str = "all 1s cubic-bezier(0.68, -0.55, 0.265, 1.55)";
const PORTAL_EASE: &str = "all 1.5s cubic-bezier(0.175, 0.885, 0.32, 1.275)";
const SUCCESS_PORTAL_EASE: &str = "all 1s cubic-bezier(0.175, 0.885, 0.32, 1.275)";

/// Applies each phase to the page: inline transitions, stage visibility and
/// canvas effects.
pub struct DomStageHooks {
    ctx: Rc<FxContext>,
    scene: Rc<RefCell<Scene>>,
    timers: Timers,
}

impl DomStageHooks {
    pub fn new(ctx: Rc<FxContext>, scene: Rc<RefCell<Scene>>, timers: Timers) -> Self {
        Self { ctx, scene, timers }
    }

    /// Shows `active` and hides the other two stages.
    fn show_stage(&self, active: Stage) {
        for stage in Stage::ALL {
            let Some(el) = self.ctx.by_id(stage.element_id()) else {
                continue;
            };
            if stage == active {
                dom::remove_class(&el, "hidden");
                dom::add_class(&el, "active");
            } else {
                dom::add_class(&el, "hidden");
                dom::remove_class(&el, "active");
            }
        }
    }

    fn portal(&self, stage: Stage, selector: &str) -> Option<Element> {
        let container = self.ctx.by_id(stage.element_id())?;
        dom::query_in(&container, selector)
    }

    fn cascade_fields(&self) {
        let stagger = self.ctx.config.stages.field_stagger_ms;
        let fields = self.ctx.query_all(".nano-field");
        for (i, field) in fields.iter().enumerate() {
            let field = field.clone();
            let delay = Duration::from_millis(u64::from(stagger) * i as u64);
            self.timers.after(delay, move || {
                dom::set_styles(
                    &field,
                    &[
                        ("transform", "translateY(0)"),
                        ("opacity", "1"),
                        ("filter", "blur(0)"),
                    ],
                );
            });
        }
        let reveal = self
            .ctx
            .config
            .stages
            .form_cascade(fields.len());
        if let Some(submit) = self.ctx.query(".quantum-submit") {
            self.timers.after(reveal, move || {
                dom::set_styles(&submit, &[("transform", "scale(1)"), ("opacity", "1")]);
            });
        }
    }

    fn cascade_rings(&self) {
        let stagger = self.ctx.config.stages.ring_stagger_ms;
        for (i, ring) in self.ctx.query_all(".success-rings .ring").into_iter().enumerate() {
            let delay = Duration::from_millis(u64::from(stagger) * i as u64);
            self.timers.after(delay, move || {
                dom::set_styles(&ring, &[("animation", "successRing 2s ease-out infinite")]);
            });
        }
    }
}

impl StageHooks for DomStageHooks {
    fn enter(&self, phase: Phase) {
        match phase {
            Phase::Button => {}
            Phase::ExitAnimation => {
                if let Some(button) = self.ctx.by_id("cyber-btn") {
                    dom::set_styles(
                        &button,
                        &[
                            ("transition", EXIT_EASE),
                            ("transform", "rotateY(90deg) rotateX(45deg) scale(0)"),
                            ("opacity", "0"),
                            ("filter", "blur(10px)"),
                        ],
                    );
                }
                self.scene.borrow_mut().explode();
            }
            Phase::PortalEntrance => {
                self.show_stage(Stage::Form);
                if let Some(portal) = self.portal(Stage::Form, ".form-portal") {
                    dom::set_styles(
                        &portal,
                        &[
                            ("transform", "scale(0) rotateZ(180deg)"),
                            ("opacity", "0"),
                            ("filter", "blur(20px) hue-rotate(180deg)"),
                        ],
                    );
                }
            }
            Phase::FormVisible => self.cascade_fields(),
            Phase::SuccessTransition => {
                if let Some(form) = self.ctx.by_id(Stage::Form.element_id()) {
                    dom::set_styles(
                        &form,
                        &[
                            ("transition", "all 1s ease-out"),
                            ("transform", "scale(0.8) rotateX(90deg)"),
                            ("opacity", "0"),
                        ],
                    );
                }
            }
            Phase::Success => {
                self.show_stage(Stage::Success);
                if let Some(portal) = self.portal(Stage::Success, ".success-portal") {
                    dom::set_styles(
                        &portal,
                        &[("transform", "scale(0) rotateZ(180deg)"), ("opacity", "0")],
                    );
                }
            }
        }
    }

    fn settle(&self, phase: Phase) {
        match phase {
            Phase::PortalEntrance => {
                if let Some(portal) = self.portal(Stage::Form, ".form-portal") {
                    dom::set_styles(
                        &portal,
                        &[
                            ("transition", PORTAL_EASE),
                            ("transform", "scale(1) rotateZ(0deg)"),
                            ("opacity", "1"),
                            ("filter", "blur(0px) hue-rotate(0deg)"),
                        ],
                    );
                }
            }
            Phase::Success => {
                if let Some(portal) = self.portal(Stage::Success, ".success-portal") {
                    dom::set_styles(
                        &portal,
                        &[
                            ("transition", SUCCESS_PORTAL_EASE),
                            ("transform", "scale(1) rotateZ(0deg)"),
                            ("opacity", "1"),
                        ],
                    );
                }
                self.cascade_rings();
            }
            _ => {}
        }
    }
}

/// Everything the button and submit handlers share.
#[derive(Clone)]
pub struct StageDriver {
    pub ctx: Rc<FxContext>,
    pub scene: Rc<RefCell<Scene>>,
    pub frame: Option<CanvasFrame>,
    pub sequencer: Rc<RefCell<StageSequencer>>,
    pub hooks: Rc<DomStageHooks>,
    pub timers: Timers,
    pub cancel: CancelToken,
    pub audio: Rc<AudioCues>,
}

impl StageDriver {
    fn run(&self, choreography: Choreography) {
        let this = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = play(
                &this.sequencer,
                choreography,
                &this.timers,
                this.hooks.as_ref(),
                &this.cancel,
            )
            .await;
            match result {
                Ok(phase) => log::info!("stage choreography settled in {phase:?}"),
                Err(e) => log::warn!("stage choreography stopped: {e}"),
            }
        });
    }

    pub fn start_transition(&self) {
        let started = self.sequencer.borrow_mut().start_transition();
        match started {
            Ok(choreography) => self.run(choreography),
            Err(SequenceError::Busy) => log::debug!("button ignored: transition running"),
            Err(e) => log::debug!("button ignored: {e}"),
        }
    }

    pub fn submit(&self) {
        let all_valid = form::check_all(&self.ctx);
        let outcome = self.sequencer.borrow_mut().submit(all_valid);
        match outcome {
            Ok(SubmitOutcome::Accepted(choreography)) => {
                self.audio.play(Cue::Success);
                self.run(choreography);
            }
            Ok(SubmitOutcome::Rejected) => {
                log::info!("submit rejected: invalid fields");
                self.audio.play(Cue::Error);
            }
            Err(e) => log::debug!("submit ignored: {e}"),
        }
    }

    /// Finishes a choreography that a page hide cut short.
    pub fn resume(&self) {
        let (interrupted, rest) = {
            let mut seq = self.sequencer.borrow_mut();
            (seq.phase(), seq.resume())
        };
        let Some(rest) = rest else {
            return;
        };
        log::info!("resuming stage choreography after {interrupted:?}");
        self.hooks.settle(interrupted);
        self.run(rest);
    }

    fn hover_button(&self, button: &Element) {
        dom::set_styles(button, &[("transform", "scale(1.05)")]);
        for ring in self.ctx.query_all("#cyber-btn .plasma-ring") {
            dom::set_styles(&ring, &[("animation-duration", "0.5s")]);
        }
        self.audio.play(Cue::Hover);
        if let Some(frame) = &self.frame {
            let origin = frame.to_canvas(dom::center_of(button));
            self.scene.borrow_mut().ripple(origin);
        }
    }
}

/// Hooks up `#cyber-btn` and `.quantum-submit`. Either may be absent.
pub fn wire(driver: &StageDriver) -> Result<(), JsValue> {
    if let Some(button) = driver.ctx.by_id("cyber-btn") {
        {
            let driver = driver.clone();
            let el = button.clone();
            dom::listen(&button, "mouseenter", move |_: Event| driver.hover_button(&el))?;
        }
        {
            let driver = driver.clone();
            dom::listen(&button, "click", move |e: MouseEvent| {
                e.prevent_default();
                driver.audio.play(Cue::Click);
                driver.start_transition();
            })?;
        }
    }

    if driver.ctx.by_id("quantum-form").is_some() {
        if let Some(submit) = driver.ctx.query(".quantum-submit") {
            let driver = driver.clone();
            dom::listen(&submit, "click", move |e: MouseEvent| {
                e.prevent_default();
                driver.submit();
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageTimings;
    use crate::geometry::Bounds;
    use crate::sequencer::Sleeper;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::HtmlInputElement;

    fn quick_driver() -> StageDriver {
        let mut ctx = FxContext::from_window().unwrap();
        ctx.config.stages = StageTimings {
            button_exit_ms: 5,
            portal_entrance_ms: 5,
            field_stagger_ms: 1,
            submit_reveal_ms: 5,
            success_exit_ms: 5,
            success_portal_ms: 5,
            ring_stagger_ms: 1,
        };
        let ctx = Rc::new(ctx);
        let scene = Rc::new(RefCell::new(Scene::seeded(
            &ctx.config,
            Bounds::new(200.0, 100.0),
            3,
        )));
        let timers = Timers::new(ctx.window.clone());
        StageDriver {
            sequencer: Rc::new(RefCell::new(StageSequencer::new(
                ctx.config.stages.clone(),
                1,
            ))),
            hooks: Rc::new(DomStageHooks::new(ctx.clone(), scene.clone(), timers.clone())),
            timers,
            cancel: CancelToken::new(),
            audio: Rc::new(AudioCues::new(false)),
            frame: None,
            scene,
            ctx,
        }
    }

    async fn settle(driver: &StageDriver) {
        Timers::new(driver.ctx.window.clone())
            .sleep(Duration::from_millis(100))
            .await;
    }

    /// `#quantum-form > .nano-field > input[type=text]`, attached to the body.
    fn text_field(driver: &StageDriver) -> (Element, HtmlInputElement) {
        let doc = &driver.ctx.document;
        let form = doc.create_element("form").unwrap();
        form.set_id("quantum-form");
        let field = doc.create_element("div").unwrap();
        field.set_class_name("nano-field");
        let input: HtmlInputElement = doc.create_element("input").unwrap().dyn_into().unwrap();
        input.set_type("text");
        field.append_child(&input).unwrap();
        form.append_child(&field).unwrap();
        doc.body().unwrap().append_child(&form).unwrap();
        (form, input)
    }

    #[wasm_bindgen_test]
    async fn double_click_runs_one_transition() {
        let driver = quick_driver();
        driver.start_transition();
        driver.start_transition();
        assert!(driver.sequencer.borrow().is_busy());

        settle(&driver).await;

        assert_eq!(driver.sequencer.borrow().phase(), Phase::FormVisible);
        assert!(!driver.sequencer.borrow().is_busy());
        let config = &driver.ctx.config.particles;
        assert_eq!(
            driver.scene.borrow().particles().len(),
            config.count + config.burst_count
        );
    }

    #[wasm_bindgen_test]
    async fn invalid_submit_marks_field_and_stays_on_form() {
        let driver = quick_driver();
        let (form, input) = text_field(&driver);
        driver.start_transition();
        settle(&driver).await;

        driver.submit();
        let field = input.parent_element().unwrap();
        assert!(field.class_list().contains("field-invalid"));
        assert_eq!(driver.sequencer.borrow().phase(), Phase::FormVisible);

        input.set_value("Ana");
        driver.submit();
        settle(&driver).await;
        assert_eq!(driver.sequencer.borrow().phase(), Phase::Success);
        form.remove();
    }

    #[wasm_bindgen_test]
    async fn cancelled_transition_resumes_after_restore() {
        let driver = quick_driver();
        driver.start_transition();
        // A zero-delay timer runs while the 5 ms exit hold is still pending.
        Timers::new(driver.ctx.window.clone())
            .sleep(Duration::ZERO)
            .await;
        assert_eq!(driver.sequencer.borrow().phase(), Phase::ExitAnimation);

        driver.cancel.cancel();
        driver.timers.cancel_all();
        settle(&driver).await;
        assert!(!driver.sequencer.borrow().is_busy());

        driver.cancel.reset();
        driver.resume();
        settle(&driver).await;
        assert_eq!(driver.sequencer.borrow().phase(), Phase::FormVisible);
    }
}
