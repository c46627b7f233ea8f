use std::sync::LazyLock;

use chrono::Duration;
use regex::Regex;

use crate::error::DurationError;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(\d+)([dhm])$").expect("duration regex")
});

/// Parse a mute duration such as `1d`, `12h` or `30m`.
///
/// Units are days, hours and minutes. Surrounding whitespace and letter case
/// are ignored; anything else after the unit is rejected.
pub fn parse_mute_duration(input: &str) -> Result<Duration, DurationError> {
    let normalized = input.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(DurationError::Empty);
    }

    let caps = DURATION_RE
        .captures(&normalized)
        .ok_or_else(|| DurationError::Malformed(input.to_string()))?;

    let value: i64 = caps[1]
        .parse()
        .map_err(|_| DurationError::OutOfRange(input.to_string()))?;

    let span = match &caps[2] {
        "d" => Duration::try_days(value),
        "h" => Duration::try_hours(value),
        "m" => Duration::try_minutes(value),
        _ => None,
    };

    span.ok_or_else(|| DurationError::OutOfRange(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_mute_duration("1d").unwrap(), Duration::days(1));
        assert_eq!(parse_mute_duration("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_mute_duration("30m").unwrap(), Duration::minutes(30));
    }

    #[test]
    fn ignores_case_and_whitespace() {
        assert_eq!(parse_mute_duration(" 3H ").unwrap(), Duration::hours(3));
    }

    #[test]
    fn rejects_unknown_unit() {
        assert_eq!(
            parse_mute_duration("2x"),
            Err(DurationError::Malformed("2x".into()))
        );
    }

    #[test]
    fn rejects_trailing_garbage_and_missing_number() {
        assert!(matches!(parse_mute_duration("2hours"), Err(DurationError::Malformed(_))));
        assert!(matches!(parse_mute_duration("h"), Err(DurationError::Malformed(_))));
        assert!(matches!(parse_mute_duration("-1d"), Err(DurationError::Malformed(_))));
    }

    #[test]
    fn rejects_empty_and_overflow() {
        assert_eq!(parse_mute_duration("   "), Err(DurationError::Empty));
        assert!(matches!(
            parse_mute_duration("99999999999999999999d"),
            Err(DurationError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_mute_duration("9999999999999999d"),
            Err(DurationError::OutOfRange(_))
        ));
    }
}
