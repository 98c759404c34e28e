use chrono::{NaiveDate, NaiveTime};

/// Parse a collection date from a CSV cell.
///
/// Accepted shapes: `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY` and `MM/DD/YY`,
/// optionally followed by a time of day (`HH:MM` or `HH:MM:SS`) separated by a
/// space or `T`. The time is validated and then dropped. Returns `None` when
/// parsing fails.
pub fn parse_collection_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let (date_part, time_part) = match raw.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (raw, None),
    };
    if let Some(time) = time_part {
        parse_time_of_day(time)?;
    }
    parse_date_part(date_part)
}

fn parse_date_part(value: &str) -> Option<NaiveDate> {
    if value.contains('-') {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").ok();
    }
    let segments: Vec<&str> = value.split('/').collect();
    if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    let format = if segments[0].len() == 4 {
        "%Y/%m/%d"
    } else if segments[2].len() == 2 {
        "%m/%d/%y"
    } else if segments[2].len() == 4 {
        "%m/%d/%Y"
    } else {
        return None;
    };
    NaiveDate::parse_from_str(value, format).ok()
}

fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_and_slash_formats() {
        assert_eq!(
            parse_collection_date("2023-02-14"),
            NaiveDate::from_ymd_opt(2023, 2, 14)
        );
        assert_eq!(
            parse_collection_date("2023/02/14"),
            NaiveDate::from_ymd_opt(2023, 2, 14)
        );
        assert_eq!(
            parse_collection_date("2/14/2023"),
            NaiveDate::from_ymd_opt(2023, 2, 14)
        );
        assert_eq!(
            parse_collection_date("02/14/23"),
            NaiveDate::from_ymd_opt(2023, 2, 14)
        );
        assert_eq!(
            parse_collection_date(" 02/14/2023 "),
            NaiveDate::from_ymd_opt(2023, 2, 14)
        );
    }

    #[test]
    fn accepts_and_drops_time_of_day() {
        assert_eq!(
            parse_collection_date("2023-02-14 00:00:00"),
            NaiveDate::from_ymd_opt(2023, 2, 14)
        );
        assert_eq!(
            parse_collection_date("2023-02-14T08:30"),
            NaiveDate::from_ymd_opt(2023, 2, 14)
        );
        assert_eq!(parse_collection_date("2023-02-14 25:00"), None);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_collection_date(""), None);
        assert_eq!(parse_collection_date("not-a-date"), None);
        assert_eq!(parse_collection_date("13/01/2023"), None);
        assert_eq!(parse_collection_date("02/30/2023"), None);
        assert_eq!(parse_collection_date("2023-13-01"), None);
        assert_eq!(parse_collection_date("2/14/202"), None);
        assert_eq!(parse_collection_date("2//2023"), None);
    }
}
