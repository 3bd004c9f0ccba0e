//! Star Catcher - A falling-star arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (falling stars, catches, power-ups, game state)
//! - `driver`: Cooperative scheduler running the tick and cleanup tasks
//! - `autopilot`: Idle/demo mode that plays the game
//! - `settings`: Runtime configuration for the drivers
//! - `web`: Browser bindings (wasm32 only)

pub mod autopilot;
pub mod driver;
pub mod error;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{Driver, PumpSummary};
pub use error::{SettingsError, SimError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Paddle movement per key press (percent of field width)
    pub const BASE_SPEED: f32 = 5.0;
    /// Paddle speed multiplier while a speed boost is active
    pub const SPEED_MULTIPLIER: f32 = 2.0;
    /// Speed boost lifetime
    pub const SPEED_POWERUP_DURATION_MS: u64 = 5000;
    /// Misses allowed before the run ends
    pub const MAX_MISSES: u32 = 3;

    /// Paddle bounds (left edge, percent)
    pub const PLAYER_MIN_X: f32 = 0.0;
    pub const PLAYER_MAX_X: f32 = 90.0;
    pub const PLAYER_START_X: f32 = 50.0;

    /// Stars spawn in [0, SPAWN_MAX_X)
    pub const SPAWN_MAX_X: f32 = 90.0;
    /// Top of the catch window
    pub const CATCH_Y: f32 = 85.0;
    /// Stars at or below this line are missed
    pub const MISS_Y: f32 = 90.0;
    /// Horizontal distance (exclusive) within which the paddle catches a star
    pub const CATCH_HALF_WIDTH: f32 = 10.0;

    /// Chance a freshly spawned star is a speed boost
    pub const SPEED_BOOST_CHANCE: f64 = 0.10;
    /// Hard cap on simultaneous stars
    pub const MAX_STARS: u32 = 5;

    /// Tick cadence at score 0
    pub const BASE_TICK_MS: u64 = 50;
    /// Fastest allowed tick cadence
    pub const MIN_TICK_MS: u64 = 15;

    /// Power-up HUD flags a power-up as expiring below this
    pub const EXPIRING_SOON_MS: u64 = 3000;
}
