//! Display and input helpers for period lengths and the countdown readout.

use thiserror::Error;

/// Longest period, break or overtime the console accepts (99:59).
pub const MAX_PERIOD_SECS: u32 = 99 * 60 + 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("seconds must be below 60, got {0}")]
    SecondsOutOfRange(u32),
    #[error("duration {0}s is above the 99:59 maximum")]
    TooLong(u32),
}

/// Countdown readout, `mm:ss`. Minutes are not wrapped at 60.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Human readable length for configuration summaries.
///
/// Omits a zero clause, except for a zero duration which reads
/// "0 minutes 0 seconds".
pub fn format_duration(secs: u32) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    match (minutes, seconds) {
        (0, 0) => "0 minutes 0 seconds".to_string(),
        (m, 0) => unit(m, "minute"),
        (0, s) => unit(s, "second"),
        (m, s) => format!("{} {}", unit(m, "minute"), unit(s, "second")),
    }
}

fn unit(n: u32, name: &str) -> String {
    if n == 1 {
        format!("1 {name}")
    } else {
        format!("{n} {name}s")
    }
}

/// Combine separate minute and second inputs.
pub fn from_parts(minutes: u32, seconds: u32) -> Result<u32, DurationError> {
    if seconds >= 60 {
        return Err(DurationError::SecondsOutOfRange(seconds));
    }
    let total = minutes.saturating_mul(60).saturating_add(seconds);
    if total > MAX_PERIOD_SECS {
        return Err(DurationError::TooLong(total));
    }
    Ok(total)
}

/// Parse operator input: `m:ss`, `mm:ss`, or a bare number of minutes.
pub fn parse_clock(input: &str) -> Option<u32> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let (minutes, seconds) = match input.split_once(':') {
        Some((m, s)) => {
            let m = if m.is_empty() { 0 } else { m.parse::<u32>().ok()? };
            (m, s.parse::<u32>().ok()?)
        }
        None => (input.parse::<u32>().ok()?, 0),
    };
    from_parts(minutes, seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_readout_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(300), "05:00");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn long_form_omits_zero_clauses() {
        assert_eq!(format_duration(70), "1 minute 10 seconds");
        assert_eq!(format_duration(60), "1 minute");
        assert_eq!(format_duration(45), "45 seconds");
        assert_eq!(format_duration(0), "0 minutes 0 seconds");
        assert_eq!(format_duration(1), "1 second");
        assert_eq!(format_duration(125), "2 minutes 5 seconds");
        assert_eq!(format_duration(600), "10 minutes");
    }

    #[test]
    fn parts_are_validated() {
        assert_eq!(from_parts(5, 0), Ok(300));
        assert_eq!(from_parts(0, 60), Err(DurationError::SecondsOutOfRange(60)));
        assert_eq!(from_parts(100, 0), Err(DurationError::TooLong(6000)));
        assert_eq!(from_parts(99, 59), Ok(MAX_PERIOD_SECS));
    }

    #[test]
    fn parses_operator_input() {
        assert_eq!(parse_clock("3:00"), Some(180));
        assert_eq!(parse_clock(" 12:05 "), Some(725));
        assert_eq!(parse_clock(":30"), Some(30));
        assert_eq!(parse_clock("7"), Some(420));
        assert_eq!(parse_clock("1:75"), None);
        assert_eq!(parse_clock("abc"), None);
        assert_eq!(parse_clock(""), None);
    }
}
