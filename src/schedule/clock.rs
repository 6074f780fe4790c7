/// Minutes in one wall-clock day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse a "HH:mm" wall-clock string into minutes since midnight.
///
/// Callers are expected to hand in well-formed 24h times (the UI uses a
/// native time input), so anything else returns `None` rather than a
/// half-parsed value: both fields must be exactly two digits, hours in
/// 0..=23, minutes in 0..=59.
pub fn parse_time(time: &str) -> Option<i64> {
    let (hours, minutes) = time.split_once(':')?;
    let hours = two_digit_field(hours)?;
    let minutes = two_digit_field(minutes)?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn two_digit_field(field: &str) -> Option<i64> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Format minutes since midnight as "HH:mm", wrapping at the 24-hour
/// boundary in either direction: `-30` formats as "23:30", `1450` as
/// "00:10".
pub fn format_time(minutes: i64) -> String {
    // `%` keeps the sign of a negative operand, so fold twice to land
    // in [0, 1440).
    let normalized = ((minutes % MINUTES_PER_DAY) + MINUTES_PER_DAY) % MINUTES_PER_DAY;
    format!("{:02}:{:02}", normalized / 60, normalized % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        assert_eq!(parse_time("00:00"), Some(0));
        assert_eq!(parse_time("09:00"), Some(540));
        assert_eq!(parse_time("23:59"), Some(1439));
    }

    #[test]
    fn parse_rejects_out_of_range_fields() {
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("12:60"), None);
        assert_eq!(parse_time("99:99"), None);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("0900"), None);
        assert_eq!(parse_time("9:00"), None);
        assert_eq!(parse_time("09:0"), None);
        assert_eq!(parse_time("09:00:00"), None);
        assert_eq!(parse_time("ab:cd"), None);
        assert_eq!(parse_time("-1:30"), None);
        assert_eq!(parse_time("+9:30"), None);
    }

    #[test]
    fn format_within_day() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(540), "09:00");
        assert_eq!(format_time(1439), "23:59");
    }

    #[test]
    fn format_wraps_backward_across_midnight() {
        assert_eq!(format_time(-30), "23:30");
        assert_eq!(format_time(-1), "23:59");
        assert_eq!(format_time(-1440), "00:00");
        assert_eq!(format_time(-1470), "23:30");
    }

    #[test]
    fn format_wraps_forward_across_midnight() {
        assert_eq!(format_time(1440), "00:00");
        assert_eq!(format_time(1450), "00:10");
        assert_eq!(format_time(2 * 1440 + 75), "01:15");
    }

    #[test]
    fn format_zero_pads_components() {
        assert_eq!(format_time(61), "01:01");
        assert_eq!(format_time(605), "10:05");
    }

    #[test]
    fn parse_format_round_trip() {
        for time in ["00:00", "06:45", "12:00", "18:30", "23:59"] {
            assert_eq!(format_time(parse_time(time).unwrap()), time);
        }
    }
}
