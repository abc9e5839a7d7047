//! Time-of-day parsing, formatting and input masking
//!
//! A time of day is carried around as plain seconds since midnight. Text is
//! always `HH:MM:SS`; anything malformed counts as midnight.

/// Seconds in one wall-clock day
pub const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Maximum number of digits accepted by the input mask (`HHMMSS`)
const MASK_MAX_DIGITS: usize = 6;

/// Parse `HH:MM:SS` text into seconds since midnight.
///
/// Each part that is not an unsigned integer counts as 0. Text that does not
/// split into exactly three parts is discarded entirely and yields 0, so
/// `"07:05"` is midnight rather than seven hours. Minutes and seconds are not
/// range-checked: `"00:90:00"` is 5400.
///
/// Parts are read as whole unsigned integers, so `"7abc"` and `"-1"` are 0
/// rather than the leading-digit or negative values a lenient integer parse
/// would give. Masked input only ever contains digits and colons.
pub fn parse_time_of_day(text: &str) -> u64 {
    let parts: Vec<u64> = text
        .split(':')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0))
        .collect();

    match parts.as_slice() {
        [hours, minutes, seconds] => hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(*seconds),
        _ => 0,
    }
}

/// Format a number of seconds as `HH:MM:SS`.
///
/// The sign is dropped and hours do not wrap at 24, so `90000` renders as
/// `"25:00:00"`.
pub fn format_seconds(total_seconds: i64) -> String {
    let total = total_seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Normalise raw keystrokes into the `HH:MM:SS` editing shape.
///
/// Non-digits are dropped, the result is cut to six digits and separators are
/// inserted after the second and fourth digit as they appear. This is an
/// editing aid only; the output may still be incomplete (`"07:3"`).
pub fn mask_time_input(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MASK_MAX_DIGITS)
        .collect();

    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}:{}", &digits[..2], &digits[2..]),
        _ => format!("{}:{}:{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_time() {
        assert_eq!(parse_time_of_day("07:05:09"), 25509);
        assert_eq!(parse_time_of_day("00:00:00"), 0);
        assert_eq!(parse_time_of_day("23:59:59"), 86399);
    }

    #[test]
    fn test_parse_rejects_incomplete_input() {
        assert_eq!(parse_time_of_day(""), 0);
        assert_eq!(parse_time_of_day("bad"), 0);
        assert_eq!(parse_time_of_day("07:05"), 0);
        assert_eq!(parse_time_of_day("07:05:09:01"), 0);
    }

    #[test]
    fn test_parse_bad_parts_are_zero() {
        assert_eq!(parse_time_of_day("xx:05:09"), 309);
        assert_eq!(parse_time_of_day("07::09"), 25209);
        assert_eq!(parse_time_of_day("-1:00:10"), 10);
        assert_eq!(parse_time_of_day("7abc:00:10"), 10);
    }

    #[test]
    fn test_parse_does_not_clamp_fields() {
        assert_eq!(parse_time_of_day("00:90:00"), 5400);
        assert_eq!(parse_time_of_day("99:00:00"), 356_400);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(3661), "01:01:01");
        assert_eq!(format_seconds(1000), "00:16:40");
        assert_eq!(format_seconds(500), "00:08:20");
    }

    #[test]
    fn test_format_does_not_wrap_days() {
        assert_eq!(format_seconds(90000), "25:00:00");
    }

    #[test]
    fn test_format_drops_sign() {
        assert_eq!(format_seconds(-3661), "01:01:01");
    }

    #[test]
    fn test_mask_progressive_separators() {
        assert_eq!(mask_time_input(""), "");
        assert_eq!(mask_time_input("0"), "0");
        assert_eq!(mask_time_input("07"), "07");
        assert_eq!(mask_time_input("073"), "07:3");
        assert_eq!(mask_time_input("0730"), "07:30");
        assert_eq!(mask_time_input("07301"), "07:30:1");
        assert_eq!(mask_time_input("073015"), "07:30:15");
    }

    #[test]
    fn test_mask_strips_and_truncates() {
        assert_eq!(mask_time_input("07:30:15"), "07:30:15");
        assert_eq!(mask_time_input("ab07-30 15"), "07:30:15");
        assert_eq!(mask_time_input("0730159999"), "07:30:15");
    }
}
