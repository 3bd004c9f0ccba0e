//! Simulation tick
//!
//! Advances falling stars one discrete step and resolves catches, misses,
//! power-ups, level and game over.

use serde::Serialize;

use super::powerup::PowerUpKind;
use super::spawn::Spawner;
use super::state::{GamePhase, GameState, StarFate};
use crate::consts::*;
use crate::error::SimError;

/// Everything that happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickEvents {
    pub caught: u32,
    pub missed: u32,
    pub spawned: u32,
    /// Power-ups started this tick
    pub activated: Vec<PowerUpKind>,
    /// New level, if it changed
    pub level_up: Option<u32>,
    pub game_over: bool,
}

/// Distance every star falls per tick
pub fn fall_speed(score: u32) -> f32 {
    1.0 + (score / 15) as f32
}

/// Stars kept on the field at `score`
pub fn max_stars(score: u32) -> usize {
    (1 + score / 10).min(MAX_STARS) as usize
}

/// Delay between ticks at `score`
pub fn tick_interval_ms(score: u32) -> u64 {
    let speedup = (score / 5) as u64 * 3;
    BASE_TICK_MS.saturating_sub(speedup).max(MIN_TICK_MS)
}

pub fn level_for_score(score: u32) -> u32 {
    score / 10 + 1
}

/// Advance the game state by one tick at clock time `now_ms`
///
/// The level is derived from the score as it stood *before* this tick's
/// catches, so a level-up shows one tick after the catch that earned it.
pub fn tick<S: Spawner + ?Sized>(
    state: &mut GameState,
    spawner: &mut S,
    now_ms: u64,
) -> Result<TickEvents, SimError> {
    if state.is_over() {
        return Err(SimError::GameOver {
            score: state.score,
            level: state.level,
        });
    }

    state.time_ticks += 1;

    let score_before = state.score;
    let dy = fall_speed(score_before);
    let player_x = state.player_x;

    let mut events = TickEvents::default();
    let mut caught_kinds = Vec::new();

    state.stars.retain_mut(|star| {
        star.fall(dy);
        match star.resolve(player_x) {
            StarFate::Missed => {
                events.missed += 1;
                false
            }
            StarFate::Caught => {
                events.caught += 1;
                caught_kinds.push(star.kind);
                false
            }
            StarFate::Falling => true,
        }
    });

    if events.missed > 0 {
        state.record_misses(events.missed);
        log::debug!(
            "Tick {}: {} missed ({}/{})",
            state.time_ticks,
            events.missed,
            state.misses,
            MAX_MISSES
        );
    }

    if events.caught > 0 {
        state.score = state.score.saturating_add(events.caught);
        log::debug!(
            "Tick {}: {} caught, score {}",
            state.time_ticks,
            events.caught,
            state.score
        );
    }

    for kind in caught_kinds {
        if let Some(power_up) = kind.power_up() {
            if state.power_ups.activate(power_up, now_ms) {
                log::debug!("{} activated at {}ms", power_up.label(), now_ms);
                events.activated.push(power_up);
            }
        }
    }

    let level = level_for_score(score_before);
    if level != state.level {
        log::info!("Level {} (score {})", level, state.score);
        events.level_up = Some(level);
        state.level = level;
    }

    let target = max_stars(state.score);
    while state.stars.len() < target {
        let roll = spawner.roll();
        state.spawn_star(roll.x, roll.kind);
        events.spawned += 1;
    }

    if state.misses >= MAX_MISSES {
        state.phase = GamePhase::GameOver;
        events.game_over = true;
        log::info!(
            "Game over after {} ticks: score {}, level {}",
            state.time_ticks,
            state.score,
            state.level
        );
    }

    Ok(events)
}
