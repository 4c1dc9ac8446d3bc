use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, Document, Event};

use super::context::FxContext;
use super::dom;
use super::timers::Timers;
use crate::lifecycle::{Once, PreloaderPlan};

pub const PAGE_READY: &str = "pageReady";

/// Resolves the first time `pageReady` is dispatched on the document.
///
/// Must be created before [`start`] so the event cannot be missed.
pub fn page_ready(document: &Document) -> JsFuture {
    let document = document.clone();
    let promise = Promise::new(&mut |resolve, _reject| {
        let resolve = RefCell::new(Some(resolve));
        let _ = dom::listen(&document, PAGE_READY, move |_: Event| {
            if let Some(resolve) = resolve.borrow_mut().take() {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
    });
    JsFuture::from(promise)
}

/// Runs the preloader animation and raises `pageReady` once it is gone.
pub fn start(ctx: &Rc<FxContext>, timers: &Timers) -> Result<(), JsValue> {
    let plan = PreloaderPlan::default();
    let ready = Rc::new(RefCell::new(Once::default()));

    let Some(loader) = ctx
        .by_id("preloader")
        .or_else(|| ctx.query(".loader"))
    else {
        // Nothing to animate: the page is ready as soon as it has loaded.
        let ctx2 = ctx.clone();
        return when_loaded(ctx, move || dispatch_ready(&ctx2, &ready));
    };

    if let Some(fill) = ctx.query(".loader-progress-fill") {
        let f60 = fill.clone();
        timers.after(plan.progress_60, move || dom::add_class(&f60, "progress-60"));
        timers.after(plan.progress_100, move || {
            dom::remove_class(&fill, "progress-60");
            dom::add_class(&fill, "progress-100");
        });
    }

    let hide = {
        let ctx = ctx.clone();
        let timers = timers.clone();
        let hiding = Rc::new(RefCell::new(Once::default()));
        Rc::new(move || {
            if !hiding.borrow_mut().fire() {
                return;
            }
            dom::add_class(&loader, "fade-out");
            let loader = loader.clone();
            let ctx = ctx.clone();
            let ready = ready.clone();
            timers.after(plan.fade, move || {
                dom::add_class(&loader, "is-hidden");
                dom::add_class(&loader, "hidden");
                let _ = loader.set_attribute("aria-hidden", "true");
                loader.remove();
                if let Some(body) = ctx.document.body() {
                    dom::remove_class(&body, "is-locked");
                    dom::add_class(&body, "is-unlocked");
                }
                dispatch_ready(&ctx, &ready);
            });
        })
    };

    {
        let hide = hide.clone();
        let timers2 = timers.clone();
        when_loaded(ctx, move || timers2.after(plan.hide_after_load, move || hide()))?;
    }
    if PreloaderPlan::is_dev_host(&ctx.hostname()) {
        timers.after(plan.hide_on_localhost, move || hide());
    }
    Ok(())
}

/// Runs `f` once the window has loaded. The module is fetched asynchronously,
/// so `load` has usually fired already and `f` runs straight away.
fn when_loaded(ctx: &FxContext, f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    if ctx.document.ready_state() == "complete" {
        f();
        return Ok(());
    }
    let mut f = Some(f);
    dom::listen(&ctx.window, "load", move |_: Event| {
        if let Some(f) = f.take() {
            f();
        }
    })
}

fn dispatch_ready(ctx: &FxContext, ready: &RefCell<Once>) {
    if !ready.borrow_mut().fire() {
        return;
    }
    match CustomEvent::new(PAGE_READY) {
        Ok(event) => {
            let _ = ctx.document.dispatch_event(&event);
            log::info!("{PAGE_READY} dispatched");
        }
        Err(e) => log::error!("could not create {PAGE_READY} event: {e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn context() -> Rc<FxContext> {
        Rc::new(FxContext::from_window().unwrap())
    }

    #[wasm_bindgen_test]
    async fn ready_fires_when_started_after_load() {
        let ctx = context();
        let timers = Timers::new(ctx.window.clone());

        let ready = page_ready(&ctx.document);
        start(&ctx, &timers).unwrap();

        ready.await.unwrap();
    }

    #[wasm_bindgen_test]
    async fn loader_is_gone_and_body_unlocked_before_ready() {
        let ctx = context();
        let timers = Timers::new(ctx.window.clone());
        let body = ctx.document.body().unwrap();
        dom::add_class(&body, "is-locked");
        let loader = ctx.document.create_element("div").unwrap();
        loader.set_id("preloader");
        body.append_child(&loader).unwrap();

        let ready = page_ready(&ctx.document);
        start(&ctx, &timers).unwrap();
        ready.await.unwrap();

        assert!(ctx.by_id("preloader").is_none());
        assert!(body.class_list().contains("is-unlocked"));
        assert!(!body.class_list().contains("is-locked"));
        dom::remove_class(&body, "is-unlocked");
    }
}
