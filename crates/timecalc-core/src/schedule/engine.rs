//! Ownership of the interval list.
//!
//! The engine keeps positions contiguous (1..=N) after every mutation and
//! never lets the list go empty: there is always at least one slot to type
//! into.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{compute_schedule, ScheduleState};
use crate::cutoff::CutoffEvaluator;
use crate::error::ScheduleError;
use crate::interval::{renumber, Interval};

#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    intervals: Vec<Interval>,
    evaluator: CutoffEvaluator,
}

/// Serializable snapshot of the list, for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalList {
    pub intervals: Vec<Interval>,
}

impl ScheduleEngine {
    /// Engine with a single empty slot.
    pub fn new(evaluator: CutoffEvaluator) -> Self {
        Self {
            intervals: vec![Interval::empty(1)],
            evaluator,
        }
    }

    /// Engine pre-filled with the given texts (at least one slot is kept).
    pub fn with_texts<I, S>(evaluator: CutoffEvaluator, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut intervals: Vec<Interval> = texts
            .into_iter()
            .enumerate()
            .map(|(i, t)| Interval::new(i + 1, t))
            .collect();
        if intervals.is_empty() {
            intervals.push(Interval::empty(1));
        }
        Self {
            intervals,
            evaluator,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn first(&self) -> &Interval {
        // Never empty; see `shift` and `remove_last`.
        &self.intervals[0]
    }

    pub fn evaluator(&self) -> &CutoffEvaluator {
        &self.evaluator
    }

    /// True when the list has been consumed down to one blank slot.
    pub fn is_exhausted(&self) -> bool {
        self.intervals.len() == 1 && self.intervals[0].is_blank()
    }

    pub fn recompute(&self, now: NaiveDateTime) -> Result<ScheduleState, ScheduleError> {
        let state = compute_schedule(&self.intervals, &self.evaluator, now)?;
        debug!(
            total_minutes = state.total_minutes,
            projected = %state.projected_time,
            violated = state.violation.as_ref().map(|v| v.threshold.name.as_str()),
            "schedule recomputed"
        );
        Ok(state)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_text(
        &mut self,
        position: usize,
        text: impl Into<String>,
    ) -> Result<(), ScheduleError> {
        let len = self.intervals.len();
        let slot = position
            .checked_sub(1)
            .and_then(|i| self.intervals.get_mut(i))
            .ok_or(ScheduleError::NoSuchInterval { position, len })?;
        slot.raw_text = text.into();
        Ok(())
    }

    /// Append an empty slot.
    pub fn add_interval(&mut self) -> &[Interval] {
        self.intervals.push(Interval::empty(self.intervals.len() + 1));
        renumber(&mut self.intervals);
        &self.intervals
    }

    /// Drop the last slot unless it is the only one.
    pub fn remove_last(&mut self) -> bool {
        if self.intervals.len() <= 1 {
            return false;
        }
        self.intervals.pop();
        renumber(&mut self.intervals);
        true
    }

    /// Remove the first interval and move the rest up.
    ///
    /// Remaining raw text is carried over untouched. A list that would
    /// become empty gets a fresh blank slot.
    pub fn shift(&mut self) -> Interval {
        let dropped = self.intervals.remove(0);
        if self.intervals.is_empty() {
            self.intervals.push(Interval::empty(1));
        }
        renumber(&mut self.intervals);
        debug!(remaining = self.intervals.len(), dropped = %dropped.raw_text, "intervals shifted");
        dropped
    }

    pub fn snapshot(&self) -> IntervalList {
        IntervalList {
            intervals: self.intervals.clone(),
        }
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::new(CutoffEvaluator::default())
    }
}
