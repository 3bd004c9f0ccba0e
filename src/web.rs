//! Browser bindings
//!
//! The page owns rendering and timers. It forwards key presses, calls `pump`
//! whenever `next_delay_ms` elapses, and draws from `snapshot_json`.

use wasm_bindgen::prelude::*;

use crate::driver::Driver;
use crate::settings::Settings;
use crate::sim::{Direction, Engine, SeededSpawner, SystemClock};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Star Catcher starting...");
}

/// One game instance driven from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    driver: Driver<SystemClock, SeededSpawner>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>) -> WebGame {
        let settings = Settings::load();
        let spawner = SeededSpawner::new(seed.unwrap_or_else(|| settings.resolve_seed()));
        log::info!("Game initialized with seed: {}", spawner.seed());
        let engine = Engine::new(SystemClock::new(), spawner);
        WebGame {
            driver: Driver::new(engine, settings),
        }
    }

    /// Forward a `keydown` key name. Returns true if the key was used.
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(direction) = Direction::from_key(key) else {
            return false;
        };
        self.driver.press(direction);
        true
    }

    /// Toggle idle/demo steering and remember the choice
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.driver.set_autopilot(enabled);
        self.driver.settings().save();
    }

    /// Run due work. Returns true if the page should redraw.
    pub fn pump(&mut self) -> bool {
        self.driver.pump().changed()
    }

    /// Milliseconds until the next task, or None when nothing is scheduled
    pub fn next_delay_ms(&self) -> Option<f64> {
        let now = self.driver.engine().now_ms();
        self.driver
            .next_due_ms()
            .map(|due| due.saturating_sub(now) as f64)
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.driver.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn is_over(&self) -> bool {
        self.driver.engine().is_over()
    }

    /// "Play Again"
    pub fn reset(&mut self) {
        self.driver.reset();
    }

    /// Tear down: no task fires after this
    pub fn stop(&mut self) {
        self.driver.stop();
    }
}
