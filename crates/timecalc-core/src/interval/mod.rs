mod parser;

pub use parser::parse_interval;

use serde::{Deserialize, Serialize};

use crate::error::IntervalParseError;

/// One user-entered slot in the interval list.
///
/// The raw text is kept exactly as typed; minutes are derived on demand so
/// the model never disagrees with what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// 1-based position in the list.
    pub position: usize,
    pub raw_text: String,
}

impl Interval {
    pub fn new(position: usize, raw_text: impl Into<String>) -> Self {
        Self {
            position,
            raw_text: raw_text.into(),
        }
    }

    pub fn empty(position: usize) -> Self {
        Self::new(position, String::new())
    }

    /// Parsed duration: `Ok(None)` for a blank slot.
    pub fn minutes(&self) -> Result<Option<u32>, IntervalParseError> {
        parse_interval(&self.raw_text)
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }

    /// Label shown next to the input field.
    pub fn label(&self) -> String {
        format!("Interval {} (MM / HMM):", self.position)
    }
}

/// Render minutes as text that parses back to the same value.
///
/// Below 100 the plain number is used; from 100 up the `HMM` form, since
/// "150" would otherwise read as 1 hr 50 min. Values beyond 9 hr 59 min
/// have no text form and are clamped.
pub fn minutes_to_text(minutes: u64) -> String {
    if minutes < 100 {
        return minutes.to_string();
    }
    let minutes = minutes.min(9 * 60 + 59);
    format!("{}{:02}", minutes / 60, minutes % 60)
}

/// Reassign positions so they run 1..=N in list order.
pub(crate) fn renumber(intervals: &mut [Interval]) {
    for (i, interval) in intervals.iter_mut().enumerate() {
        interval.position = i + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renumber_makes_positions_contiguous() {
        let mut list = vec![
            Interval::new(4, "10"),
            Interval::new(9, ""),
            Interval::new(2, "130"),
        ];
        renumber(&mut list);
        let positions: Vec<_> = list.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(list[2].raw_text, "130");
    }

    #[test]
    fn blank_interval_has_no_minutes() {
        let interval = Interval::new(1, "  ");
        assert!(interval.is_blank());
        assert_eq!(interval.minutes(), Ok(None));
    }

    #[test]
    fn minutes_text_round_trips_through_parser() {
        for m in [0u64, 5, 59, 99, 100, 150, 599] {
            let text = minutes_to_text(m);
            assert_eq!(parse_interval(&text), Ok(Some(m as u32)), "{m} -> {text}");
        }
        assert_eq!(minutes_to_text(150), "230");
        assert_eq!(minutes_to_text(45), "45");
    }

    #[test]
    fn label_uses_position() {
        assert_eq!(Interval::empty(3).label(), "Interval 3 (MM / HMM):");
    }
}
