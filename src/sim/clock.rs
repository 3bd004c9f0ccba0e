//! Millisecond clocks for power-up timing and task scheduling

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time: `Instant` natively, `performance.now()` in the browser.
/// Readings are clamped so they never go backwards.
#[derive(Debug, Clone)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
    last: Cell<u64>,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
            last: Cell::new(0),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn raw_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    fn raw_ms(&self) -> u64 {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        now as u64
    }

    fn observe(&self, raw_ms: u64) -> u64 {
        let now = self.last.get().max(raw_ms);
        self.last.set(now);
        now
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.observe(self.raw_ms())
    }
}

/// Hand-driven clock. Clones share the same time, so a test or a headless
/// runner can keep one handle and give another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Jump to `ms`; the clock never goes backwards
    pub fn set(&self, ms: u64) {
        self.now.set(self.now.get().max(ms));
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        handle.advance(50);
        assert_eq!(clock.now_ms(), 150);
        handle.set(120);
        assert_eq!(clock.now_ms(), 150);
        handle.set(400);
        assert_eq!(clock.now_ms(), 400);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn test_system_clock_never_steps_back() {
        let clock = SystemClock::new();
        assert_eq!(clock.observe(1_000), 1_000);
        // A source stepping backwards reads as a pause
        assert_eq!(clock.observe(400), 1_000);
        assert_eq!(clock.observe(1_250), 1_250);
    }
}
