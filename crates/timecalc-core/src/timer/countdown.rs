//! Countdown controller.
//!
//! Counts down the first interval against the wall clock. Like the rest of
//! the engine it owns no thread: the caller invokes `tick()` once a second
//! (see [`super::ticker`]) and applies the outcome.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> ExpiredTransitioning -> (Running | Idle)
//!            \-> Idle (stop)
//! ```
//!
//! While running, the remaining whole minutes are written back into
//! interval #1 so the projected schedule keeps tracking the clock. On
//! expiry the list is shifted and, with cascading enabled, the next
//! interval is counted down straight away.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CountdownError;
use crate::interval::{minutes_to_text, Interval};
use crate::schedule::ScheduleEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    Idle,
    Running,
    /// Interval #1 just ran out; the list is being shifted.
    ExpiredTransitioning,
}

/// Observable countdown state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub phase: CountdownPhase,
    pub target_time: Option<NaiveDateTime>,
    /// Minutes interval #1 held when this leg of the countdown began.
    pub initial_minutes: u32,
    /// Seconds left as of the last tick.
    pub remaining_secs: Option<u64>,
    /// Interval #1 text before the countdown started overwriting it.
    pub original_text: Option<String>,
    /// When the order last changed (an interval expired).
    pub last_changed_at: Option<NaiveDateTime>,
}

impl CountdownState {
    pub fn active(&self) -> bool {
        self.phase != CountdownPhase::Idle
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self {
            phase: CountdownPhase::Idle,
            target_time: None,
            initial_minutes: 0,
            remaining_secs: None,
            original_text: None,
            last_changed_at: None,
        }
    }
}

/// Countdown leg that was just (re)started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownLeg {
    pub minutes: u32,
    pub target: NaiveDateTime,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing happened.
    Inactive,
    /// Still counting down interval #1.
    Counting { remaining_secs: u64 },
    /// Interval #1 ran out and was shifted out of the list.
    Expired {
        changed_at: NaiveDateTime,
        dropped: Interval,
        /// Next leg, if the countdown cascaded.
        next: Option<CountdownLeg>,
    },
}

#[derive(Debug, Clone)]
pub struct CountdownController {
    state: CountdownState,
    cascade: bool,
    /// Last text this controller wrote into interval #1.
    written_text: Option<String>,
}

impl CountdownController {
    pub fn new(cascade: bool) -> Self {
        Self {
            state: CountdownState::default(),
            cascade,
            written_text: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &CountdownState {
        &self.state
    }

    pub fn phase(&self) -> CountdownPhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == CountdownPhase::Running
    }

    pub fn cascade(&self) -> bool {
        self.cascade
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down interval #1 from `now`.
    ///
    /// Restarting while running re-reads interval #1. If the field still
    /// holds the countdown's own text, the pre-countdown text is kept for
    /// `stop()` to restore. A failed restart leaves the running countdown
    /// untouched.
    pub fn start(
        &mut self,
        engine: &mut ScheduleEngine,
        now: NaiveDateTime,
    ) -> Result<CountdownLeg, CountdownError> {
        let Ok(Some(minutes)) = engine.first().minutes() else {
            return Err(CountdownError::NoActiveInterval);
        };
        let first = engine.first().raw_text.clone();

        let original = match (&self.state.original_text, &self.written_text) {
            (Some(original), Some(written)) if self.state.active() && *written == first => {
                original.clone()
            }
            _ => first,
        };

        let leg = self.begin_leg(engine, minutes, now, original);
        info!(minutes, target = %leg.target, "countdown started");
        Ok(leg)
    }

    /// Advance the countdown to `now`.
    pub fn tick(&mut self, engine: &mut ScheduleEngine, now: NaiveDateTime) -> TickOutcome {
        if self.state.phase != CountdownPhase::Running {
            return TickOutcome::Inactive;
        }
        let Some(target) = self.state.target_time else {
            self.reset();
            return TickOutcome::Inactive;
        };

        let remaining = (target - now).num_seconds();
        if remaining > 0 {
            let remaining_secs = remaining as u64;
            self.state.remaining_secs = Some(remaining_secs);
            self.write_first(engine, minutes_to_text(remaining_secs / 60));
            return TickOutcome::Counting { remaining_secs };
        }

        self.state.phase = CountdownPhase::ExpiredTransitioning;
        self.state.last_changed_at = Some(target);
        let dropped = engine.shift();
        info!(changed_at = %target, remaining = engine.len(), "interval expired, order changed");

        let next = match (self.cascade, engine.first().minutes()) {
            (true, Ok(Some(minutes))) => {
                let original = engine.first().raw_text.clone();
                Some(self.begin_leg(engine, minutes, now, original))
            }
            _ => {
                self.reset();
                None
            }
        };

        TickOutcome::Expired {
            changed_at: target,
            dropped,
            next,
        }
    }

    /// Stop counting and put interval #1 back the way it was.
    ///
    /// Returns the restored text, or `None` if nothing was running.
    pub fn stop(&mut self, engine: &mut ScheduleEngine) -> Option<String> {
        if !self.state.active() {
            return None;
        }
        let restored = self.state.original_text.clone().unwrap_or_default();
        // The first slot always exists, so this cannot fail.
        let _ = engine.set_text(1, restored.clone());
        self.reset();
        info!(restored = %restored, "countdown stopped");
        Some(restored)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_leg(
        &mut self,
        engine: &mut ScheduleEngine,
        minutes: u32,
        now: NaiveDateTime,
        original: String,
    ) -> CountdownLeg {
        let target = now + Duration::minutes(i64::from(minutes));
        self.state.phase = CountdownPhase::Running;
        self.state.target_time = Some(target);
        self.state.initial_minutes = minutes;
        self.state.remaining_secs = Some(u64::from(minutes) * 60);
        self.state.original_text = Some(original);
        self.write_first(engine, minutes_to_text(u64::from(minutes)));
        CountdownLeg { minutes, target }
    }

    fn write_first(&mut self, engine: &mut ScheduleEngine, text: String) {
        let _ = engine.set_text(1, text.clone());
        self.written_text = Some(text);
    }

    /// Back to idle, keeping the last order-change time for display.
    fn reset(&mut self) {
        let last_changed_at = self.state.last_changed_at;
        self.state = CountdownState {
            last_changed_at,
            ..CountdownState::default()
        };
        self.written_text = None;
    }
}

impl Default for CountdownController {
    fn default() -> Self {
        Self::new(true)
    }
}
