use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::schedule::ScheduleState;

/// Every state change in a session produces an Event.
///
/// Events carry ready-to-show labels alongside the raw values, so a UI
/// layer can either render them directly or format its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Minute tick: the wall clock label changed.
    ClockRefreshed {
        label: String,
        at: NaiveDateTime,
    },
    /// Slots were added, removed, edited or shifted.
    IntervalsChanged {
        intervals: Vec<Interval>,
        at: NaiveDateTime,
    },
    ScheduleRecomputed {
        state: ScheduleState,
        result_text: String,
        /// Empty when no cutoff is exceeded.
        warning_text: String,
        at: NaiveDateTime,
    },
    /// Recompute stopped at a malformed interval.
    ScheduleInvalid {
        position: usize,
        message: String,
        at: NaiveDateTime,
    },
    CountdownStarted {
        minutes: u32,
        target: NaiveDateTime,
        at: NaiveDateTime,
    },
    CountdownTick {
        remaining_secs: u64,
        label: String,
        at: NaiveDateTime,
    },
    /// Interval #1 expired and the list moved up.
    OrderChanged {
        changed_at: NaiveDateTime,
        label: String,
        at: NaiveDateTime,
    },
    CountdownStopped {
        restored_text: String,
        at: NaiveDateTime,
    },
    /// No countdown running, either after a failed start or once the list
    /// has run out.
    CountdownIdle {
        message: String,
        at: NaiveDateTime,
    },
}

impl Event {
    pub fn at(&self) -> NaiveDateTime {
        match self {
            Event::ClockRefreshed { at, .. }
            | Event::IntervalsChanged { at, .. }
            | Event::ScheduleRecomputed { at, .. }
            | Event::ScheduleInvalid { at, .. }
            | Event::CountdownStarted { at, .. }
            | Event::CountdownTick { at, .. }
            | Event::OrderChanged { at, .. }
            | Event::CountdownStopped { at, .. }
            | Event::CountdownIdle { at, .. } => *at,
        }
    }
}

/// Observer for session events.
pub trait EventSink {
    fn publish(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn publish(&mut self, event: &Event) {
        self(event)
    }
}
