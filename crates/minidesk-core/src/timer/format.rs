/// Render seconds as `MM:SS`.
///
/// Both fields are zero-padded to two digits. Minutes are not wrapped into
/// hours, so 3661 seconds renders as `61:01`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_default_work_session() {
        assert_eq!(format_clock(1500), "25:00");
    }

    #[test]
    fn pads_both_fields() {
        assert_eq!(format_clock(90), "01:30");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_clock(3661), "61:01");
        assert_eq!(format_clock(100 * 60 + 5), "100:05");
    }
}
