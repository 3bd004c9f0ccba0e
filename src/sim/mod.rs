//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only comes from an injected `Clock`
//! - Randomness only comes from an injected `Spawner`
//! - Stable iteration order (stars keep spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod engine;
pub mod powerup;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Engine, TickReport};
pub use powerup::{ActivePowerUps, Effect, PowerUp, PowerUpKind};
pub use snapshot::{PowerUpView, Snapshot, StarView};
pub use spawn::{FixedSpawner, ScriptedSpawner, SeededSpawner, SpawnRoll, Spawner};
pub use state::{Direction, GamePhase, GameState, Star, StarFate, StarKind};
pub use tick::{TickEvents, fall_speed, level_for_score, max_stars, tick, tick_interval_ms};
