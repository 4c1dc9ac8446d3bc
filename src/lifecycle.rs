//! Preloader timeline and cursor follower policy.

use std::time::Duration;

/// Class steps and delays for hiding the preloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloaderPlan {
    pub progress_60: Duration,
    pub progress_100: Duration,
    /// Delay after `load` before the fade starts.
    pub hide_after_load: Duration,
    /// Delay after start on a dev host, whichever fires first wins.
    pub hide_on_localhost: Duration,
    /// Fade-out length before the node is removed and `pageReady` fires.
    pub fade: Duration,
}

impl Default for PreloaderPlan {
    fn default() -> Self {
        Self {
            progress_60: Duration::from_millis(100),
            progress_100: Duration::from_millis(1000),
            hide_after_load: Duration::from_millis(1200),
            hide_on_localhost: Duration::from_millis(800),
            fade: Duration::from_millis(300),
        }
    }
}

impl PreloaderPlan {
    pub fn is_dev_host(hostname: &str) -> bool {
        matches!(hostname, "localhost" | "127.0.0.1")
    }
}

/// Fires once; later calls report that the event was already raised.
#[derive(Debug, Default)]
pub struct Once {
    fired: bool,
}

impl Once {
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Viewport widths at or below this get no custom cursor.
pub const CURSOR_MIN_VIEWPORT: f64 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Tween with GSAP: ring over 0.2 s, dot over 0.1 s.
    Tween,
    /// Write `transform: translate(...)` directly.
    Transform,
    Disabled,
}

impl CursorMode {
    pub const RING_TWEEN_SECS: f64 = 0.2;
    pub const DOT_TWEEN_SECS: f64 = 0.1;

    pub fn choose(has_elements: bool, viewport_width: f64, has_gsap: bool) -> Self {
        if !has_elements || viewport_width <= CURSOR_MIN_VIEWPORT {
            CursorMode::Disabled
        } else if has_gsap {
            CursorMode::Tween
        } else {
            CursorMode::Transform
        }
    }
}

pub fn translate(x: f64, y: f64) -> String {
    format!("translate({x}px, {y}px)")
}
