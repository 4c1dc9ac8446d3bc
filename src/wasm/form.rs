use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlInputElement};

use super::canvas::CanvasFrame;
use super::context::FxContext;
use super::dom;
use super::timers::Debouncer;
use crate::geometry::Vec2;
use crate::scene::Scene;
use crate::validate::{validate, Feedback, FieldKind};

pub const FIELD_INPUTS: &str = ".nano-field input";

pub fn inputs(ctx: &FxContext) -> Vec<HtmlInputElement> {
    ctx.query_all(FIELD_INPUTS)
        .into_iter()
        .filter_map(|el| el.dyn_into().ok())
        .collect()
}

fn kind_of(input: &HtmlInputElement) -> FieldKind {
    FieldKind::from_input_type(&input.type_())
}

pub fn is_valid(input: &HtmlInputElement) -> bool {
    validate(kind_of(input), &input.value())
}

/// Validates every field, marking the failing ones. Returns the overall verdict.
pub fn check_all(ctx: &FxContext) -> bool {
    let mut all_valid = true;
    for input in inputs(ctx) {
        if !is_valid(&input) {
            all_valid = false;
            if let Some(field) = input.parent_element() {
                dom::add_class(&field, "field-invalid");
                dom::remove_class(&field, "field-valid");
            }
        }
    }
    all_valid
}

/// Checks one field, toggles its classes and throws feedback sparks from its
/// right edge.
fn check_one(input: &HtmlInputElement, scene: &RefCell<Scene>, frame: Option<&CanvasFrame>) {
    let feedback = Feedback::of(kind_of(input), &input.value());
    let Some((add, remove)) = feedback.classes() else {
        return;
    };
    let Some(field) = input.parent_element() else {
        return;
    };
    dom::add_class(&field, add);
    dom::remove_class(&field, remove);

    if let Some(frame) = frame {
        let r = field.get_bounding_client_rect();
        let origin = frame.to_canvas(Vec2::new(r.right() - 10.0, r.top() + r.height() / 2.0));
        scene
            .borrow_mut()
            .validation_sparks(origin, feedback == Feedback::Valid);
    }
}

/// Debounced validation while typing, immediate validation on blur.
pub fn wire(
    ctx: &Rc<FxContext>,
    scene: &Rc<RefCell<Scene>>,
    frame: Option<CanvasFrame>,
) -> Result<(), JsValue> {
    if ctx.by_id("quantum-form").is_none() {
        return Ok(());
    }
    let delay = Duration::from_millis(u64::from(ctx.config.debounce_ms));

    for input in inputs(ctx) {
        let debouncer = Rc::new(Debouncer::new(ctx.window.clone(), delay));

        {
            let (input2, scene, frame, debouncer) =
                (input.clone(), scene.clone(), frame.clone(), debouncer.clone());
            dom::listen(&input, "input", move |_: Event| {
                let (input, scene, frame) = (input2.clone(), scene.clone(), frame.clone());
                debouncer.call(move || check_one(&input, &scene, frame.as_ref()));
            })?;
        }
        {
            let (input2, scene, frame) = (input.clone(), scene.clone(), frame.clone());
            dom::listen(&input, "blur", move |_: Event| {
                debouncer.cancel();
                check_one(&input2, &scene, frame.as_ref());
                if let Some(field) = input2.parent_element() {
                    dom::remove_class(&field, "field-active");
                }
            })?;
        }
        {
            let input2 = input.clone();
            dom::listen(&input, "focus", move |_: Event| {
                if let Some(field) = input2.parent_element() {
                    dom::add_class(&field, "field-active");
                }
            })?;
        }
    }
    Ok(())
}
