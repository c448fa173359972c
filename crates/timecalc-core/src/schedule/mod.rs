mod engine;

pub use engine::{IntervalList, ScheduleEngine};

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::cutoff::{CutoffEvaluator, CutoffViolation};
use crate::error::ScheduleError;
use crate::interval::Interval;

/// Derived view of an interval list at a given instant.
///
/// Always a pure function of the intervals and `now`; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub total_minutes: u64,
    pub projected_time: NaiveDateTime,
    pub violation: Option<CutoffViolation>,
}

impl ScheduleState {
    pub fn minutes_past_threshold(&self) -> Option<u64> {
        self.violation.as_ref().map(|v| v.minutes_past)
    }
}

/// Sum the intervals and project the completion time from `now`.
///
/// Blank intervals add nothing and are not checked against cutoffs. The
/// first invalid interval aborts the whole computation.
pub fn compute_schedule(
    intervals: &[Interval],
    evaluator: &CutoffEvaluator,
    now: NaiveDateTime,
) -> Result<ScheduleState, ScheduleError> {
    let mut total: u64 = 0;
    let mut cumulative = Vec::with_capacity(intervals.len());

    for interval in intervals {
        let minutes = interval
            .minutes()
            .map_err(|source| ScheduleError::InvalidInterval {
                position: interval.position,
                source,
            })?;
        if let Some(minutes) = minutes {
            total += u64::from(minutes);
            cumulative.push((interval.position, total));
        }
    }

    Ok(ScheduleState {
        total_minutes: total,
        projected_time: now + Duration::minutes(total as i64),
        violation: evaluator.evaluate(&cumulative, now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntervalParseError;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn list(texts: &[&str]) -> Vec<Interval> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Interval::new(i + 1, *t))
            .collect()
    }

    #[test]
    fn totals_and_projection() {
        let state = compute_schedule(&list(&["30", "45"]), &CutoffEvaluator::default(), at(9, 0))
            .unwrap();
        assert_eq!(state.total_minutes, 75);
        assert_eq!(state.projected_time, at(10, 15));
        assert_eq!(state.violation, None);
    }

    #[test]
    fn blank_slots_contribute_nothing() {
        let state = compute_schedule(&list(&["", "20", " "]), &CutoffEvaluator::default(), at(9, 0))
            .unwrap();
        assert_eq!(state.total_minutes, 20);
    }

    #[test]
    fn invalid_entry_names_its_position() {
        let intervals = list(&["10", "abc", "999"]);
        let err = compute_schedule(&intervals, &CutoffEvaluator::default(), at(9, 0)).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidInterval {
                position: 2,
                source: IntervalParseError::NotNumeric
            }
        );
    }

    #[test]
    fn violation_at_first_crossing() {
        let state = compute_schedule(&list(&["20", "10"]), &CutoffEvaluator::default(), at(14, 50))
            .unwrap();
        assert_eq!(state.total_minutes, 30);
        assert_eq!(state.projected_time, at(15, 20));
        let v = state.violation.unwrap();
        assert_eq!(v.position, 1);
        assert_eq!(v.minutes_past, 10);
    }

    #[test]
    fn leading_blank_does_not_trigger_late_warning() {
        // Already past 3 PM but nothing entered yet.
        let state = compute_schedule(&list(&[""]), &CutoffEvaluator::default(), at(16, 0)).unwrap();
        assert_eq!(state.violation, None);
        assert_eq!(state.minutes_past_threshold(), None);
    }
}
