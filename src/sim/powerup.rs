//! Timed power-ups
//!
//! Each kind maps to an effect through `PowerUpKind::effect`, so the tick and
//! movement code never branch on a specific kind.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
}

/// What an active power-up does to the game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Multiplies paddle movement per key press
    MoveSpeed(f32),
}

impl PowerUpKind {
    /// Every kind, for effect lookups
    pub const ALL: [PowerUpKind; 1] = [PowerUpKind::SpeedBoost];

    /// How long one activation lasts
    pub fn duration_ms(self) -> u64 {
        match self {
            PowerUpKind::SpeedBoost => SPEED_POWERUP_DURATION_MS,
        }
    }

    pub fn effect(self) -> Effect {
        match self {
            PowerUpKind::SpeedBoost => Effect::MoveSpeed(SPEED_MULTIPLIER),
        }
    }

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed Boost",
        }
    }
}

/// One activation of a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Clock value at activation
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, start_ms: u64) -> Self {
        Self {
            kind,
            start_ms,
            duration_ms: kind.duration_ms(),
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) < self.duration_ms
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms(now_ms))
    }

    /// Remaining time as a fraction of the full duration, in [0, 1]
    pub fn remaining_fraction(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.remaining_ms(now_ms) as f32 / self.duration_ms as f32
    }
}

/// Active power-ups, unique by (kind, start time)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUps {
    items: Vec<PowerUp>,
}

impl ActivePowerUps {
    /// Start a power-up at `now_ms`. Returns false if the same kind was
    /// already activated at that exact time.
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: u64) -> bool {
        if self
            .items
            .iter()
            .any(|p| p.kind == kind && p.start_ms == now_ms)
        {
            return false;
        }
        self.items.push(PowerUp::new(kind, now_ms));
        true
    }

    /// True iff some power-up of `kind` has not yet run out at `now_ms`
    pub fn is_active(&self, kind: PowerUpKind, now_ms: u64) -> bool {
        self.items
            .iter()
            .any(|p| p.kind == kind && p.is_active(now_ms))
    }

    /// Drop expired power-ups, returning how many were removed
    pub fn purge(&mut self, now_ms: u64) -> usize {
        let before = self.items.len();
        self.items.retain(|p| p.is_active(now_ms));
        before - self.items.len()
    }

    /// Combined paddle speed multiplier. Overlapping activations of one kind
    /// count once.
    pub fn move_speed_multiplier(&self, now_ms: u64) -> f32 {
        PowerUpKind::ALL
            .iter()
            .filter(|kind| self.is_active(**kind, now_ms))
            .map(|kind| match kind.effect() {
                Effect::MoveSpeed(factor) => factor,
            })
            .product()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_boost_lifetime() {
        let mut active = ActivePowerUps::default();
        assert!(active.activate(PowerUpKind::SpeedBoost, 1_000));

        assert!(active.is_active(PowerUpKind::SpeedBoost, 1_000));
        assert!(active.is_active(PowerUpKind::SpeedBoost, 5_999));
        assert!(!active.is_active(PowerUpKind::SpeedBoost, 6_000));

        // Still stored until purged
        assert_eq!(active.len(), 1);
        assert_eq!(active.purge(6_000), 1);
        assert!(active.is_empty());
    }

    #[test]
    fn test_purge_is_idempotent() {
        let mut active = ActivePowerUps::default();
        active.activate(PowerUpKind::SpeedBoost, 0);
        active.activate(PowerUpKind::SpeedBoost, 4_000);

        assert_eq!(active.purge(5_000), 1);
        assert_eq!(active.purge(5_000), 0);
        assert_eq!(active.len(), 1);
        assert!(active.is_active(PowerUpKind::SpeedBoost, 5_000));
    }

    #[test]
    fn test_same_start_time_is_deduplicated() {
        let mut active = ActivePowerUps::default();
        assert!(active.activate(PowerUpKind::SpeedBoost, 250));
        assert!(!active.activate(PowerUpKind::SpeedBoost, 250));
        assert!(active.activate(PowerUpKind::SpeedBoost, 251));
        assert_eq!(active.len(), 2);
    }

    #[test]
    fn test_multiplier_does_not_stack() {
        let mut active = ActivePowerUps::default();
        assert_eq!(active.move_speed_multiplier(0), 1.0);

        active.activate(PowerUpKind::SpeedBoost, 0);
        active.activate(PowerUpKind::SpeedBoost, 10);
        assert_eq!(active.move_speed_multiplier(20), SPEED_MULTIPLIER);
        assert_eq!(active.move_speed_multiplier(10_000), 1.0);
    }

    #[test]
    fn test_remaining_fraction() {
        let boost = PowerUp::new(PowerUpKind::SpeedBoost, 0);
        assert_eq!(boost.remaining_fraction(0), 1.0);
        assert!((boost.remaining_fraction(2_500) - 0.5).abs() < 1e-6);
        assert_eq!(boost.remaining_fraction(9_000), 0.0);
        assert_eq!(boost.remaining_ms(4_000), 1_000);
    }
}
