use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use super::context::FxContext;
use super::dom;
use crate::lifecycle::{translate, CursorMode};

/// Moves the custom `.cursor` ring and `.cursor-dot` with the pointer.
pub struct CursorFollower {
    mode: CursorMode,
    ring: Option<Element>,
    dot: Option<Element>,
    gsap: Option<(JsValue, Function)>,
}

impl CursorFollower {
    /// Looks for GSAP exactly once; call after `pageReady` so deferred
    /// scripts have loaded.
    pub fn detect(ctx: &FxContext) -> Self {
        let ring = ctx.query(".cursor");
        let dot = ctx.query(".cursor-dot");
        let gsap = find_gsap();
        let mode = CursorMode::choose(
            ring.is_some() && dot.is_some(),
            ctx.viewport_width(),
            gsap.is_some(),
        );
        log::info!("cursor follower mode: {mode:?}");

        if mode == CursorMode::Disabled {
            for el in ring.iter().chain(dot.iter()) {
                dom::add_class(el, "is-hidden");
            }
        }
        Self {
            mode,
            ring,
            dot,
            gsap,
        }
    }

    pub fn move_to(&self, x: f64, y: f64) {
        let (Some(ring), Some(dot)) = (&self.ring, &self.dot) else {
            return;
        };
        match (self.mode, &self.gsap) {
            (CursorMode::Tween, Some((gsap, to))) => {
                tween(gsap, to, ring, x, y, CursorMode::RING_TWEEN_SECS);
                tween(gsap, to, dot, x, y, CursorMode::DOT_TWEEN_SECS);
            }
            (CursorMode::Disabled, _) => {}
            _ => {
                let transform = translate(x, y);
                for el in [ring, dot] {
                    dom::add_class(el, "translate-cursor");
                    dom::set_styles(el, &[("transform", &transform)]);
                }
            }
        }
    }
}

fn find_gsap() -> Option<(JsValue, Function)> {
    let gsap = Reflect::get(&js_sys::global(), &JsValue::from_str("gsap")).ok()?;
    if gsap.is_undefined() || gsap.is_null() {
        return None;
    }
    let to = Reflect::get(&gsap, &JsValue::from_str("to"))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((gsap, to))
}

fn tween(gsap: &JsValue, to: &Function, el: &Element, x: f64, y: f64, secs: f64) {
    let vars = Object::new();
    let _ = Reflect::set(&vars, &"x".into(), &x.into());
    let _ = Reflect::set(&vars, &"y".into(), &y.into());
    let _ = Reflect::set(&vars, &"duration".into(), &secs.into());
    let _ = to.call2(gsap, el, &vars);
}
