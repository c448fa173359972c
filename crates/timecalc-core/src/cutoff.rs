//! Cutoff threshold detection.
//!
//! A cutoff is a time of day after which a projected completion should
//! raise a warning. Each threshold is judged independently and latched at
//! the first interval that carries the projection past it; the warning that
//! is reported is the latest threshold crossed.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::format::format_clock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffThreshold {
    pub name: String,
    #[serde(with = "hhmm")]
    pub time_of_day: NaiveTime,
}

impl CutoffThreshold {
    pub fn new(name: impl Into<String>, time_of_day: NaiveTime) -> Self {
        Self {
            name: name.into(),
            time_of_day,
        }
    }

    /// Threshold named after its own clock time ("3:00 PM").
    pub fn at(hour: u32, minute: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self::new(format_clock(time), time))
    }

    /// The 3 PM / 5 PM / 7 PM set.
    pub fn defaults() -> Vec<Self> {
        [(15, 0), (17, 0), (19, 0)]
            .into_iter()
            .filter_map(|(h, m)| Self::at(h, m))
            .collect()
    }
}

/// A threshold first crossed at `position`, `minutes_past` after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffViolation {
    pub position: usize,
    pub threshold: CutoffThreshold,
    pub minutes_past: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoffEvaluator {
    thresholds: Vec<CutoffThreshold>,
}

impl CutoffEvaluator {
    pub fn new(thresholds: Vec<CutoffThreshold>) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &[CutoffThreshold] {
        &self.thresholds
    }

    /// All latched crossings, one per crossed threshold, in threshold order.
    ///
    /// `cumulative` holds `(position, minutes elapsed up to and including
    /// that interval)` for each contributing interval, in entry order.
    /// Threshold times are taken on the calendar day of `now`.
    pub fn crossings(
        &self,
        cumulative: &[(usize, u64)],
        now: NaiveDateTime,
    ) -> Vec<CutoffViolation> {
        let mut latched: Vec<Option<CutoffViolation>> = vec![None; self.thresholds.len()];

        for &(position, minutes) in cumulative {
            let projected = now + Duration::minutes(minutes as i64);
            for (slot, threshold) in latched.iter_mut().zip(&self.thresholds) {
                if slot.is_some() {
                    continue;
                }
                let cutoff = now.date().and_time(threshold.time_of_day);
                if projected > cutoff {
                    *slot = Some(CutoffViolation {
                        position,
                        threshold: threshold.clone(),
                        minutes_past: (projected - cutoff).num_minutes().max(0) as u64,
                    });
                }
            }
        }

        latched.into_iter().flatten().collect()
    }

    /// The crossed threshold with the latest time of day, if any.
    pub fn evaluate(
        &self,
        cumulative: &[(usize, u64)],
        now: NaiveDateTime,
    ) -> Option<CutoffViolation> {
        self.crossings(cumulative, now)
            .into_iter()
            .max_by_key(|v| v.threshold.time_of_day)
    }
}

impl Default for CutoffEvaluator {
    fn default() -> Self {
        Self::new(CutoffThreshold::defaults())
    }
}

/// `NaiveTime` as "HH:MM" for config files.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
