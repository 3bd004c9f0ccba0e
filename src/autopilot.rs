//! Idle/demo mode
//!
//! Steers the paddle under whichever star will land first, preferring
//! power-up stars when two are level.

use crate::sim::{Direction, GameState, Star};

/// Star the autopilot is chasing
pub fn target_star(state: &GameState) -> Option<&Star> {
    state.stars.iter().max_by(|a, b| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.kind.power_up().is_some().cmp(&b.kind.power_up().is_some()))
    })
}

/// Next paddle move, or `None` when already close enough
pub fn choose_move(state: &GameState, now_ms: u64) -> Option<Direction> {
    if state.is_over() {
        return None;
    }
    let target = target_star(state)?;
    let delta = target.pos.x - state.player_x;
    // Moving would overshoot by more than it gains
    if delta.abs() <= state.move_speed(now_ms) / 2.0 {
        return None;
    }
    Some(if delta < 0.0 {
        Direction::Left
    } else {
        Direction::Right
    })
}
