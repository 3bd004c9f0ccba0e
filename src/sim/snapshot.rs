//! Read-only views of the game for presentation
//!
//! A `Snapshot` is captured after each mutating call and carries everything a
//! renderer or HUD needs, including derived values like power-up countdowns.

use serde::Serialize;

use super::powerup::{PowerUp, PowerUpKind};
use super::state::{GameState, Star, StarKind};
use super::tick::tick_interval_ms;
use crate::consts::*;

/// A star as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub kind: StarKind,
}

impl From<&Star> for StarView {
    fn from(star: &Star) -> Self {
        Self {
            id: star.id,
            x: star.pos.x,
            y: star.pos.y,
            kind: star.kind,
        }
    }
}

/// Active power-up indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub label: &'static str,
    pub remaining_ms: u64,
    /// Countdown bar fill, 1.0 when fresh
    pub remaining_fraction: f32,
    /// HUD pulses the indicator when set
    pub expiring_soon: bool,
}

impl PowerUpView {
    fn capture(power_up: &PowerUp, now_ms: u64) -> Self {
        let remaining_ms = power_up.remaining_ms(now_ms);
        Self {
            kind: power_up.kind,
            label: power_up.kind.label(),
            remaining_ms,
            remaining_fraction: power_up.remaining_fraction(now_ms),
            expiring_soon: remaining_ms < EXPIRING_SOON_MS,
        }
    }
}

/// Immutable view of the whole game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub player_x: f32,
    pub stars: Vec<StarView>,
    pub score: u32,
    pub level: u32,
    pub misses: u32,
    pub max_misses: u32,
    pub game_over: bool,
    /// Delay the tick driver should wait before the next tick
    pub tick_interval_ms: u64,
    /// Current paddle step per move
    pub move_speed: f32,
    /// Only power-ups still running at capture time
    pub power_ups: Vec<PowerUpView>,
}

impl Snapshot {
    pub fn capture(state: &GameState, now_ms: u64) -> Self {
        Self {
            player_x: state.player_x,
            stars: state.stars.iter().map(StarView::from).collect(),
            score: state.score,
            level: state.level,
            misses: state.misses,
            max_misses: MAX_MISSES,
            game_over: state.is_over(),
            tick_interval_ms: tick_interval_ms(state.score),
            move_speed: state.move_speed(now_ms),
            power_ups: state
                .power_ups
                .iter()
                .filter(|p| p.is_active(now_ms))
                .map(|p| PowerUpView::capture(p, now_ms))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_initial() {
        let snapshot = Snapshot::capture(&GameState::new(), 0);
        assert_eq!(snapshot.player_x, 50.0);
        assert_eq!(
            snapshot.stars,
            vec![StarView {
                id: 1,
                x: 50.0,
                y: 0.0,
                kind: StarKind::Normal
            }]
        );
        assert_eq!(snapshot.tick_interval_ms, 50);
        assert_eq!(snapshot.move_speed, BASE_SPEED);
        assert!(snapshot.power_ups.is_empty());
        assert!(!snapshot.game_over);
    }

    #[test]
    fn test_power_up_countdown() {
        let mut state = GameState::new();
        state.power_ups.activate(PowerUpKind::SpeedBoost, 1_000);

        let fresh = Snapshot::capture(&state, 1_000);
        assert_eq!(fresh.power_ups.len(), 1);
        assert_eq!(fresh.power_ups[0].label, "Speed Boost");
        assert_eq!(fresh.power_ups[0].remaining_fraction, 1.0);
        assert!(!fresh.power_ups[0].expiring_soon);
        assert_eq!(fresh.move_speed, BASE_SPEED * SPEED_MULTIPLIER);

        let late = Snapshot::capture(&state, 4_500);
        assert_eq!(late.power_ups[0].remaining_ms, 1_500);
        assert!(late.power_ups[0].expiring_soon);

        // Expired but not yet purged: hidden from the view
        let expired = Snapshot::capture(&state, 6_000);
        assert!(expired.power_ups.is_empty());
        assert_eq!(expired.move_speed, BASE_SPEED);
    }

    #[test]
    fn test_serializes_for_the_page() {
        let json = serde_json::to_value(Snapshot::capture(&GameState::new(), 0)).unwrap();
        assert_eq!(json["score"], 0);
        assert_eq!(json["stars"][0]["kind"], "Normal");
        assert_eq!(json["max_misses"], 3);
    }
}
