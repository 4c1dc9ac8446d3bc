//! Canvas effects and the staged contact-form journey for the landing page.
//!
//! The simulation (particles, energy ripples, streaks), the stage sequencer
//! and the form rules are plain Rust and run anywhere. The `wasm` module binds
//! them to the page and only exists on `wasm32`.

pub mod audio;
pub mod config;
pub mod energy;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod palette;
pub mod particles;
pub mod scene;
pub mod sequencer;
pub mod streaks;
pub mod surface;
pub mod timers;
pub mod validate;

pub use config::FxConfig;
pub use error::{FxError, SequenceError};
pub use geometry::{Bounds, Vec2};
pub use scene::Scene;
pub use sequencer::{Phase, Stage, StageSequencer};

// Only compile the browser glue when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    #[cfg(test)]
    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    mod app;
    mod audio;
    mod canvas;
    mod context;
    mod cursor;
    mod dom;
    mod form;
    mod preloader;
    mod render;
    mod stages;
    mod timers;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // Default level until the page config has been read.
        console_log::init_with_level(log::Level::Info).ok();
        // Listeners keep the app alive for the life of the page.
        let _app = app::App::boot()?;
        Ok(())
    }
}
