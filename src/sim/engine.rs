//! Simulation engine
//!
//! Owns the one `GameState` together with its clock and spawn source. All
//! mutation goes through `&mut self`, so input, ticks and power-up cleanup
//! are serialized by construction.

use serde::Serialize;

use super::clock::Clock;
use super::powerup::PowerUpKind;
use super::snapshot::Snapshot;
use super::spawn::Spawner;
use super::state::{Direction, GameState};
use super::tick::{TickEvents, tick, tick_interval_ms};
use crate::error::SimError;

/// Result of a successful tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub events: TickEvents,
    pub snapshot: Snapshot,
}

pub struct Engine<C: Clock, S: Spawner> {
    state: GameState,
    clock: C,
    spawner: S,
}

impl<C: Clock, S: Spawner> Engine<C, S> {
    pub fn new(clock: C, spawner: S) -> Self {
        Self {
            state: GameState::new(),
            clock,
            spawner,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Move the paddle one step; ignored once the game is over
    pub fn move_player(&mut self, direction: Direction) {
        let now = self.clock.now_ms();
        if !self.state.move_player(direction, now) {
            log::trace!("Ignoring {:?} move: game over", direction);
        }
    }

    /// Advance one tick. Fails with `SimError::GameOver` and changes nothing
    /// once the run has ended.
    pub fn tick(&mut self) -> Result<TickReport, SimError> {
        let now = self.clock.now_ms();
        let events = tick(&mut self.state, &mut self.spawner, now)?;
        Ok(TickReport {
            events,
            snapshot: Snapshot::capture(&self.state, now),
        })
    }

    /// Drop expired power-ups. Safe to call at any cadence.
    pub fn cleanup_power_ups(&mut self) -> usize {
        let removed = self.state.power_ups.purge(self.clock.now_ms());
        if removed > 0 {
            log::debug!("Expired {} power-up(s)", removed);
        }
        removed
    }

    pub fn has_active_power_up(&self, kind: PowerUpKind) -> bool {
        self.state.power_ups.is_active(kind, self.clock.now_ms())
    }

    /// Delay before the next tick at the current score
    pub fn tick_interval_ms(&self) -> u64 {
        tick_interval_ms(self.state.score)
    }

    /// Start a fresh run. Clock and spawner carry on.
    pub fn reset(&mut self) {
        log::info!(
            "Reset (previous run: score {}, level {}, {} ticks)",
            self.state.score,
            self.state.level,
            self.state.time_ticks
        );
        self.state = GameState::new();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.clock.now_ms())
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::clock::ManualClock;
    use crate::sim::spawn::{FixedSpawner, ScriptedSpawner, SeededSpawner, SpawnRoll};
    use crate::sim::state::StarKind;
    use crate::sim::tick::max_stars;
    use proptest::prelude::*;

    fn engine_at(x: f32) -> (ManualClock, Engine<ManualClock, FixedSpawner>) {
        let clock = ManualClock::new(0);
        let engine = Engine::new(clock.clone(), FixedSpawner::new(x, StarKind::Normal));
        (clock, engine)
    }

    #[test]
    fn test_determinism_scenario() {
        let (_clock, mut engine) = engine_at(50.0);

        let mut ticks = 0;
        while engine.state().score == 0 {
            let report = engine.tick().unwrap();
            ticks += 1;
            assert_eq!(report.snapshot.stars.len(), max_stars(report.snapshot.score));
        }

        assert_eq!(ticks, 85);
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.state().misses, 0);
        assert_eq!(engine.state().stars.len(), max_stars(1));
    }

    #[test]
    fn test_speed_boost_doubles_movement() {
        let boost = SpawnRoll {
            x: 50.0,
            kind: StarKind::SpeedBoost,
        };
        let normal = SpawnRoll {
            x: 50.0,
            kind: StarKind::Normal,
        };
        let clock = ManualClock::new(10_000);
        let mut engine = Engine::new(clock.clone(), ScriptedSpawner::new([boost], normal));

        engine.move_player(Direction::Left);
        assert_eq!(engine.state().player_x, 45.0);
        engine.move_player(Direction::Right);

        // Catch the seed star, which spawns the boost star
        while engine.state().score == 0 {
            engine.tick().unwrap();
        }
        // Catch the boost star
        let activated = loop {
            let report = engine.tick().unwrap();
            if !report.events.activated.is_empty() {
                break report;
            }
        };
        assert_eq!(activated.snapshot.power_ups.len(), 1);
        assert!(engine.has_active_power_up(PowerUpKind::SpeedBoost));

        engine.move_player(Direction::Right);
        assert_eq!(engine.state().player_x, 60.0);

        clock.advance(SPEED_POWERUP_DURATION_MS - 1);
        assert!(engine.has_active_power_up(PowerUpKind::SpeedBoost));
        assert_eq!(engine.cleanup_power_ups(), 0);

        clock.advance(1);
        assert!(!engine.has_active_power_up(PowerUpKind::SpeedBoost));
        assert_eq!(engine.cleanup_power_ups(), 1);
        assert_eq!(engine.cleanup_power_ups(), 0);
        assert!(engine.state().power_ups.is_empty());

        engine.move_player(Direction::Left);
        assert_eq!(engine.state().player_x, 55.0);
    }

    #[test]
    fn test_termination_is_sticky() {
        // Every star lands far from the paddle
        let (clock, mut engine) = engine_at(0.0);
        for _ in 0..8 {
            engine.move_player(Direction::Right);
        }
        assert_eq!(engine.state().player_x, 90.0);

        let mut ticks = 0;
        while !engine.is_over() {
            engine.tick().unwrap();
            ticks += 1;
            assert!(ticks < 1_000, "game never ended");
        }
        assert_eq!(engine.state().misses, MAX_MISSES);

        let frozen = engine.snapshot();
        clock.advance(1_000);
        for _ in 0..10 {
            assert!(matches!(engine.tick(), Err(SimError::GameOver { .. })));
            engine.move_player(Direction::Left);
        }
        assert_eq!(engine.snapshot(), frozen);
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let clock = ManualClock::new(0);
        let mut engine = Engine::new(clock.clone(), SeededSpawner::new(11));
        let initial = engine.snapshot();

        for _ in 0..500 {
            if engine.tick().is_err() {
                break;
            }
            engine.move_player(Direction::Left);
            clock.advance(20);
        }
        engine.reset();
        assert_eq!(engine.snapshot(), initial);

        engine.state_mut().score = 99;
        engine.reset();
        engine.reset();
        assert_eq!(engine.snapshot(), initial);
        assert_eq!(engine.state(), &GameState::new());
    }

    #[test]
    fn test_tick_interval_follows_score() {
        let (_clock, mut engine) = engine_at(50.0);
        assert_eq!(engine.tick_interval_ms(), 50);
        engine.state_mut().score = 20;
        assert_eq!(engine.tick_interval_ms(), 38);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_field(moves in prop::collection::vec(any::<bool>(), 0..200)) {
            let (_clock, mut engine) = engine_at(50.0);
            for right in moves {
                let direction = if right { Direction::Right } else { Direction::Left };
                engine.move_player(direction);
                let x = engine.state().player_x;
                prop_assert!((PLAYER_MIN_X..=PLAYER_MAX_X).contains(&x));
            }
        }

        #[test]
        fn prop_star_count_after_tick(seed in any::<u64>(), ticks in 1usize..400) {
            let clock = ManualClock::new(0);
            let mut engine = Engine::new(clock.clone(), SeededSpawner::new(seed));
            for _ in 0..ticks {
                let Ok(report) = engine.tick() else { break };
                if !report.snapshot.game_over {
                    prop_assert_eq!(report.snapshot.stars.len(), max_stars(report.snapshot.score));
                }
                clock.advance(report.snapshot.tick_interval_ms);
            }
        }
    }
}
