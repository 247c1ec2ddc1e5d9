use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses the `added` / `last_modified` values the Xtream API hands out.
/// Observed formats: unix epoch seconds as numerals, RFC 3339, and the
/// panel date strings `%Y-%m-%d %H:%M:%S` / `%Y-%m-%d`. Anything else is
/// `None`.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(epoch) = trimmed.parse::<i64>() {
        return Some(epoch);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.timestamp());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc().timestamp());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;

    #[test]
    fn test_epoch_numerals() {
        assert_eq!(parse_timestamp("1700000000"), Some(1_700_000_000));
        assert_eq!(parse_timestamp(" 0 "), Some(0));
    }

    #[test]
    fn test_date_strings() {
        assert_eq!(parse_timestamp("1970-01-01 00:00:10"), Some(10));
        assert_eq!(parse_timestamp("1970-01-02"), Some(86_400));
        assert_eq!(parse_timestamp("1970-01-01T00:00:10+00:00"), Some(10));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_timestamp("unknown"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
