//! Cooperative game driver
//!
//! Runs the two periodic tasks against one `Engine` on a single logical
//! thread:
//! - the tick task, rescheduled after every tick at the score's cadence
//! - the power-up cleanup task, on a fixed cadence
//!
//! Key presses are queued and applied at the start of the next pump, so a
//! move never lands mid-tick. An external timer (browser `setTimeout`, the
//! headless runner's virtual clock) calls `pump` at or after `next_due_ms`.

use std::collections::VecDeque;

use crate::autopilot;
use crate::settings::Settings;
use crate::sim::{Clock, Direction, Engine, Snapshot, Spawner};

/// Periodic task kinds, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Task {
    Tick,
    Cleanup,
}

/// What one pump did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PumpSummary {
    pub moves: u32,
    pub ticks: u32,
    pub cleanups: u32,
    pub power_ups_expired: usize,
    /// The run ended during this pump
    pub game_over: bool,
    /// The pump hit its task limit and skipped the rest of the backlog
    pub skipped_backlog: bool,
}

impl PumpSummary {
    /// Whether anything visible may have changed
    pub fn changed(&self) -> bool {
        self.moves > 0 || self.ticks > 0 || self.power_ups_expired > 0
    }
}

pub struct Driver<C: Clock, S: Spawner> {
    engine: Engine<C, S>,
    settings: Settings,
    /// None once cancelled
    next_tick_ms: Option<u64>,
    next_cleanup_ms: Option<u64>,
    pending: VecDeque<Direction>,
    stopped: bool,
}

impl<C: Clock, S: Spawner> Driver<C, S> {
    /// Schedule both tasks from the engine's current time
    pub fn new(engine: Engine<C, S>, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let now = engine.now_ms();
        let next_tick_ms = Some(now + engine.tick_interval_ms());
        let next_cleanup_ms = Some(now + settings.cleanup_interval_ms);
        log::info!(
            "Driver started at {}ms (cleanup every {}ms, autopilot {})",
            now,
            settings.cleanup_interval_ms,
            settings.autopilot
        );
        Self {
            engine,
            settings,
            next_tick_ms,
            next_cleanup_ms,
            pending: VecDeque::new(),
            stopped: false,
        }
    }

    pub fn engine(&self) -> &Engine<C, S> {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Toggle the autopilot; takes effect from the next tick
    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.settings.autopilot != enabled {
            log::info!("Autopilot {}", if enabled { "on" } else { "off" });
        }
        self.settings.autopilot = enabled;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Queue a paddle move for the next pump
    pub fn press(&mut self, direction: Direction) {
        if self.stopped {
            return;
        }
        self.pending.push_back(direction);
    }

    /// Earliest time a task is due, or None when nothing is scheduled
    pub fn next_due_ms(&self) -> Option<u64> {
        match (self.next_tick_ms, self.next_cleanup_ms) {
            (Some(t), Some(c)) => Some(t.min(c)),
            (t, c) => t.or(c),
        }
    }

    fn next_task(&self, now_ms: u64) -> Option<(Task, u64)> {
        let tick = self.next_tick_ms.map(|due| (due, Task::Tick));
        let cleanup = self.next_cleanup_ms.map(|due| (due, Task::Cleanup));
        [tick, cleanup]
            .into_iter()
            .flatten()
            .filter(|&(due, _)| due <= now_ms)
            .min()
            .map(|(due, task)| (task, due))
    }

    /// Apply queued input, then run due tasks in due-time order.
    ///
    /// At most `max_tasks_per_pump` tasks run. Whatever is still overdue after
    /// that is dropped and rescheduled one interval from now, so a stall (a
    /// hidden tab, a suspended process) never fast-forwards the game.
    pub fn pump(&mut self) -> PumpSummary {
        let mut summary = PumpSummary::default();
        if self.stopped {
            return summary;
        }

        while let Some(direction) = self.pending.pop_front() {
            self.engine.move_player(direction);
            summary.moves += 1;
        }

        let now = self.engine.now_ms();
        let mut ran = 0;
        while let Some((task, due)) = self.next_task(now) {
            if ran >= self.settings.max_tasks_per_pump {
                log::warn!(
                    "Pump at {}ms hit its limit of {} tasks, skipping the backlog",
                    now,
                    self.settings.max_tasks_per_pump
                );
                summary.skipped_backlog = true;
                self.skip_backlog(now);
                break;
            }
            ran += 1;
            match task {
                Task::Tick => self.run_tick(due, &mut summary),
                Task::Cleanup => {
                    summary.power_ups_expired += self.engine.cleanup_power_ups();
                    summary.cleanups += 1;
                    self.next_cleanup_ms = Some(due + self.settings.cleanup_interval_ms);
                }
            }
        }

        summary
    }

    /// Move overdue tasks to one interval past `now`
    fn skip_backlog(&mut self, now_ms: u64) {
        if let Some(due) = self.next_tick_ms.filter(|&due| due <= now_ms) {
            log::debug!("Dropping tick backlog from {}ms", due);
            self.next_tick_ms = Some(now_ms + self.engine.tick_interval_ms());
        }
        if self.next_cleanup_ms.is_some_and(|due| due <= now_ms) {
            self.next_cleanup_ms = Some(now_ms + self.settings.cleanup_interval_ms);
        }
    }

    fn run_tick(&mut self, due: u64, summary: &mut PumpSummary) {
        if self.settings.autopilot {
            let now = self.engine.now_ms();
            if let Some(direction) = autopilot::choose_move(self.engine.state(), now) {
                self.engine.move_player(direction);
            }
        }

        match self.engine.tick() {
            Ok(report) => {
                summary.ticks += 1;
                if report.events.game_over {
                    summary.game_over = true;
                    self.next_tick_ms = None;
                    log::info!("Tick task cancelled: game over");
                } else {
                    self.next_tick_ms = Some(due + report.snapshot.tick_interval_ms);
                }
            }
            Err(e) => {
                log::debug!("Tick skipped: {}", e);
                self.next_tick_ms = None;
            }
        }
    }

    /// Cancel both tasks for good; later pumps do nothing
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.next_tick_ms = None;
        self.next_cleanup_ms = None;
        self.pending.clear();
        log::info!("Driver stopped");
    }

    /// Start a new run and reschedule the tick task (unless stopped)
    pub fn reset(&mut self) {
        self.engine.reset();
        self.pending.clear();
        if self.stopped {
            return;
        }
        let now = self.engine.now_ms();
        self.next_tick_ms = Some(now + self.engine.tick_interval_ms());
        if self.next_cleanup_ms.is_none() {
            self.next_cleanup_ms = Some(now + self.settings.cleanup_interval_ms);
        }
    }
}
