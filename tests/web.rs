#![cfg(target_arch = "wasm32")]

use neon_fx::surface::Recorder;
use neon_fx::validate::{validate, FieldKind};
use neon_fx::{Bounds, FxConfig, Scene, Vec2};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn attach_canvas(width: u32, height: u32) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: web_sys::HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn scene_runs_with_browser_entropy() {
    let canvas = attach_canvas(320, 200);
    let bounds = Bounds::new(f64::from(canvas.width()), f64::from(canvas.height()));
    let mut scene = Scene::new(&FxConfig::default(), bounds);
    let mut surface = Recorder::default();

    scene.pointer_moved(Vec2::new(160.0, 100.0));
    for _ in 0..120 {
        scene.tick(&mut surface);
    }

    assert_eq!(scene.particles().len(), 50);
    assert!(scene
        .particles()
        .particles()
        .iter()
        .all(|p| bounds.contains(p.pos)));
    canvas.remove();
}

#[wasm_bindgen_test]
fn zero_sized_canvas_falls_back() {
    let canvas = attach_canvas(0, 0);
    let bounds = Bounds::new(f64::from(canvas.width()), f64::from(canvas.height()));
    let scene = Scene::new(&FxConfig::default(), bounds);
    assert_eq!(scene.bounds(), Bounds::new(400.0, 300.0));
    canvas.remove();
}

#[wasm_bindgen_test]
fn phone_rule_matches_in_browser() {
    assert!(validate(FieldKind::Phone, "(11) 98765-4321"));
    assert!(!validate(FieldKind::Phone, "12345"));
}
