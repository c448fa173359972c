//! Human-readable rendering of durations, clock times and status labels.
//!
//! All display text the engine produces goes through here, so a UI layer
//! only ever has to place strings.

use std::fmt::Display;

use chrono::{DateTime, NaiveTime, TimeZone};

use crate::cutoff::CutoffViolation;
use crate::schedule::ScheduleState;

/// Placeholder shown when no countdown is running.
pub const NO_COUNTDOWN: &str = "--:--";

/// "45 min", "1 hr", "2 hr 5 min".
pub fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{hours} hr {rest} min")
    } else {
        format!("{hours} hr")
    }
}

/// 12-hour clock, e.g. "3:07 PM".
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// 12-hour clock followed by the zone designation, e.g. "3:07 PM +01:00".
///
/// chrono only knows abbreviations for named zones; fixed offsets and
/// `Local` render as the numeric offset.
pub fn format_clock_zoned<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-I:%M %p %Z").to_string()
}

/// Remaining countdown as "m:ss".
pub fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn current_time_label<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("Current Time: {}", format_clock_zoned(at))
}

pub fn result_label(state: &ScheduleState) -> String {
    format!(
        "Resulting Time: {} (Added {})",
        format_clock(state.projected_time.time()),
        format_duration(state.total_minutes)
    )
}

pub fn warning_label(violation: Option<&CutoffViolation>) -> String {
    match violation {
        Some(v) => format!(
            "Warning: exceeds {} at Interval {} by {}",
            v.threshold.name,
            v.position,
            format_duration(v.minutes_past)
        ),
        None => String::new(),
    }
}

pub fn invalid_label(position: usize) -> String {
    format!("Invalid input in Interval {position}")
}

/// ETA line; `None` renders the idle placeholder.
pub fn eta_label(remaining_secs: Option<u64>) -> String {
    let value = remaining_secs
        .map(format_remaining)
        .unwrap_or_else(|| NO_COUNTDOWN.to_string());
    format!("Next order change in: {value}")
}

pub fn order_changed_label(at: NaiveTime) -> String {
    format!("Order changed at: {}", format_clock(at))
}
