use crate::error::IntervalParseError;

/// Largest hour digit accepted in `HMM` form (exclusive).
const MAX_HMM_HOURS: u32 = 10;

/// Parse interval text into minutes.
///
/// Accepts:
/// - empty or whitespace-only text, which yields `Ok(None)` (no interval)
/// - one or two digits, read directly as minutes (e.g. "5", "45")
/// - exactly three digits in `HMM` form (e.g. "130" is 1 hr 30 min)
///
/// Everything else (signs, letters, four or more digits) is rejected.
pub fn parse_interval(text: &str) -> Result<Option<u32>, IntervalParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IntervalParseError::NotNumeric);
    }

    // Digits only, at most three of them: cannot overflow.
    let value: u32 = match text.len() {
        1..=3 => text.parse().map_err(|_| IntervalParseError::NotNumeric)?,
        digits => return Err(IntervalParseError::TooManyDigits { digits }),
    };

    if text.len() < 3 {
        return Ok(Some(value));
    }

    let hours = value / 100;
    let minutes = value % 100;
    if hours >= MAX_HMM_HOURS || minutes >= 60 {
        return Err(IntervalParseError::OutOfRange { hours, minutes });
    }
    Ok(Some(hours * 60 + minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_plain_minutes() {
        assert_eq!(parse_interval("5"), Ok(Some(5)));
        assert_eq!(parse_interval("45"), Ok(Some(45)));
        assert_eq!(parse_interval("07"), Ok(Some(7)));
        assert_eq!(parse_interval("0"), Ok(Some(0)));
    }

    #[test]
    fn parse_hmm() {
        assert_eq!(parse_interval("130"), Ok(Some(90)));
        assert_eq!(parse_interval("100"), Ok(Some(60)));
        assert_eq!(parse_interval("959"), Ok(Some(9 * 60 + 59)));
        assert_eq!(parse_interval("059"), Ok(Some(59)));
    }

    #[test]
    fn parse_hmm_minutes_out_of_range() {
        assert_eq!(
            parse_interval("999"),
            Err(IntervalParseError::OutOfRange {
                hours: 9,
                minutes: 99
            })
        );
        assert!(parse_interval("160").is_err());
    }

    #[test]
    fn parse_blank_is_skipped() {
        assert_eq!(parse_interval(""), Ok(None));
        assert_eq!(parse_interval("   "), Ok(None));
        assert_eq!(parse_interval("\t"), Ok(None));
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        assert_eq!(parse_interval(" 20 "), Ok(Some(20)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_interval("abc"), Err(IntervalParseError::NotNumeric));
        assert_eq!(parse_interval("-5"), Err(IntervalParseError::NotNumeric));
        assert_eq!(parse_interval("+5"), Err(IntervalParseError::NotNumeric));
        assert_eq!(parse_interval("1 5"), Err(IntervalParseError::NotNumeric));
        assert_eq!(parse_interval("1.5"), Err(IntervalParseError::NotNumeric));
        assert_eq!(
            parse_interval("1200"),
            Err(IntervalParseError::TooManyDigits { digits: 4 })
        );
    }

    proptest! {
        #[test]
        fn one_or_two_digits_are_minutes(n in 0u32..100) {
            prop_assert_eq!(parse_interval(&n.to_string()), Ok(Some(n)));
        }

        #[test]
        fn three_digits_follow_hmm(h in 1u32..10, mm in 0u32..100) {
            let text = format!("{h}{mm:02}");
            let parsed = parse_interval(&text);
            if mm < 60 {
                prop_assert_eq!(parsed, Ok(Some(h * 60 + mm)));
            } else {
                prop_assert!(parsed.is_err());
            }
        }

        #[test]
        fn four_or_more_digits_are_rejected(n in 1000u32..10_000_000) {
            prop_assert!(parse_interval(&n.to_string()).is_err());
        }
    }
}
