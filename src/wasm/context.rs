use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlCanvasElement, Window};

use super::dom;
use crate::config::FxConfig;
use crate::error::FxError;

pub const CANVAS_ID: &str = "particles-canvas";
pub const CONFIG_ID: &str = "fx-config";

/// Browser handles and configuration, built once and passed to every
/// initializer.
pub struct FxContext {
    pub window: Window,
    pub document: Document,
    pub config: FxConfig,
}

impl FxContext {
    pub fn from_window() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| FxError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| FxError::Dom("no document".into()))?;
        let config = load_config(&document);
        Ok(Self {
            window,
            document,
            config,
        })
    }

    pub fn by_id(&self, id: &str) -> Option<Element> {
        dom::by_id(&self.document, id)
    }

    pub fn query(&self, selector: &str) -> Option<Element> {
        dom::query(&self.document, selector)
    }

    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        dom::query_all(&self.document, selector)
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        use wasm_bindgen::JsCast;
        self.by_id(CANVAS_ID)?.dyn_into().ok()
    }

    pub fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    pub fn hostname(&self) -> String {
        self.window.location().hostname().unwrap_or_default()
    }
}

/// Reads `<script id="fx-config" type="application/json">`, falling back to
/// defaults when it is absent or malformed.
fn load_config(document: &Document) -> FxConfig {
    let Some(json) = dom::by_id(document, CONFIG_ID).and_then(|el| el.text_content()) else {
        return FxConfig::default();
    };
    match FxConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring #{CONFIG_ID}: {e}");
            FxConfig::default()
        }
    }
}

impl From<FxError> for JsValue {
    fn from(e: FxError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
