//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::powerup::{ActivePowerUps, PowerUpKind};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Stars are falling
    Playing,
    /// Run ended, waiting for reset
    GameOver,
}

/// Paddle movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` name to a move
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Star types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StarKind {
    #[default]
    Normal,
    SpeedBoost,
}

impl StarKind {
    /// Power-up granted when a star of this kind is caught
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            StarKind::Normal => None,
            StarKind::SpeedBoost => Some(PowerUpKind::SpeedBoost),
        }
    }
}

/// What happened to a star after it fell this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarFate {
    Falling,
    Caught,
    Missed,
}

/// A falling star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: u64,
    /// x is fixed at spawn, y grows toward the bottom (percent of the field)
    pub pos: Vec2,
    pub kind: StarKind,
}

impl Star {
    pub fn new(id: u64, x: f32, kind: StarKind) -> Self {
        Self {
            id,
            pos: Vec2::new(x, 0.0),
            kind,
        }
    }

    pub fn fall(&mut self, dy: f32) {
        self.pos.y += dy;
    }

    /// Classify the star against the paddle. A miss wins over a catch, and
    /// the catch window ends where the miss line starts, so the two never
    /// overlap.
    pub fn resolve(&self, player_x: f32) -> StarFate {
        if self.pos.y >= MISS_Y {
            StarFate::Missed
        } else if self.pos.y >= CATCH_Y && (self.pos.x - player_x).abs() < CATCH_HALF_WIDTH {
            StarFate::Caught
        } else {
            StarFate::Falling
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Paddle left edge, always within [PLAYER_MIN_X, PLAYER_MAX_X]
    pub player_x: f32,
    /// Falling stars in spawn order
    pub stars: Vec<Star>,
    pub score: u32,
    /// Never exceeds MAX_MISSES
    pub misses: u32,
    pub level: u32,
    pub power_ups: ActivePowerUps,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next star ID
    next_id: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh run: paddle centered, one normal star dropping from the middle
    pub fn new() -> Self {
        let mut state = Self {
            player_x: PLAYER_START_X,
            stars: Vec::new(),
            score: 0,
            misses: 0,
            level: 1,
            power_ups: ActivePowerUps::default(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            next_id: 1,
        };

        state.spawn_star(PLAYER_START_X, StarKind::Normal);

        state
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new star ID
    pub fn next_star_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a star at the top of the field
    pub fn spawn_star(&mut self, x: f32, kind: StarKind) -> u64 {
        let id = self.next_star_id();
        let x = x.clamp(0.0, SPAWN_MAX_X);
        self.stars.push(Star::new(id, x, kind));
        id
    }

    /// Paddle distance per move command at `now_ms`
    pub fn move_speed(&self, now_ms: u64) -> f32 {
        BASE_SPEED * self.power_ups.move_speed_multiplier(now_ms)
    }

    /// Move the paddle one step. Returns false when the run is over.
    pub fn move_player(&mut self, direction: Direction, now_ms: u64) -> bool {
        if self.is_over() {
            return false;
        }
        let step = self.move_speed(now_ms) * direction.sign();
        self.player_x = (self.player_x + step).clamp(PLAYER_MIN_X, PLAYER_MAX_X);
        log::trace!("Paddle {:?} to {}", direction, self.player_x);
        true
    }

    /// Count missed stars, saturating at MAX_MISSES
    pub fn record_misses(&mut self, count: u32) {
        self.misses = self.misses.saturating_add(count).min(MAX_MISSES);
    }
}
