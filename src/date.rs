//! Date formatting for reports and file names.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

/// `"2012-04-03 12:14:32"`, or `"N/A"` without a date.
#[must_use]
pub fn date_to_string(date: Option<NaiveDateTime>) -> String {
    date.map_or_else(
        || "N/A".to_string(),
        |date| date.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// `"2012 April"`
#[must_use]
pub fn date_to_month_string(date: NaiveDateTime) -> String {
    date.format("%Y %B").to_string()
}

/// The week starting at `date`: `"2012 April 03 - 2012 April 09"`.
#[must_use]
pub fn date_to_week_string(date: NaiveDateTime) -> String {
    format!(
        "{} - {}",
        date_to_day_string(date),
        date_to_day_string(date + Duration::days(6))
    )
}

/// `"2014 July 23"`
#[must_use]
pub fn date_to_day_string(date: NaiveDateTime) -> String {
    date.format("%Y %B %d").to_string()
}

/// `"2014-07-23"`
#[must_use]
pub fn date_to_number_day_string(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Midnight of the same day.
#[must_use]
pub fn to_day(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(NaiveTime::MIN)
}

/// True when both dates fall in the same hour of the same day.
#[must_use]
pub fn compare_dates(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour()
}

/// `"2012-02-03-04-05-05"`
#[must_use]
pub fn to_file_name(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d-%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        at(y, m, d, 0, 0, 0)
    }

    #[test]
    fn test_date_to_string() {
        assert_eq!(date_to_string(None), "N/A");
        assert_eq!(date_to_string(Some(at(2012, 4, 3, 12, 14, 32))), "2012-04-03 12:14:32");
        assert_eq!(date_to_string(Some(day(2012, 4, 3))), "2012-04-03 00:00:00");
    }

    #[test]
    fn test_month_week_and_day_strings() {
        assert_eq!(date_to_month_string(day(2012, 4, 3)), "2012 April");
        assert_eq!(date_to_week_string(day(2012, 4, 3)), "2012 April 03 - 2012 April 09");
        assert_eq!(date_to_day_string(day(2014, 7, 23)), "2014 July 23");
        assert_eq!(date_to_number_day_string(day(2014, 7, 23)), "2014-07-23");
    }

    #[test]
    fn test_week_string_crosses_month() {
        assert_eq!(date_to_week_string(day(2012, 4, 28)), "2012 April 28 - 2012 May 04");
    }

    #[test]
    fn test_to_day() {
        assert_eq!(to_day(at(2032, 11, 12, 12, 23, 43)), day(2032, 11, 12));
    }

    #[test]
    fn test_compare_dates() {
        // Earlier year, month and day on either side
        assert!(!compare_dates(at(2032, 11, 12, 12, 0, 43), at(2034, 11, 11, 12, 0, 0)));
        assert!(!compare_dates(at(2032, 8, 12, 12, 0, 43), at(2032, 11, 11, 12, 0, 0)));
        assert!(!compare_dates(at(2032, 8, 7, 12, 0, 43), at(2032, 8, 11, 12, 0, 0)));
        assert!(!compare_dates(at(2040, 11, 12, 12, 0, 43), at(2034, 11, 11, 7, 0, 0)));
        assert!(!compare_dates(at(2032, 8, 12, 12, 0, 43), at(2032, 5, 11, 5, 0, 0)));
        assert!(!compare_dates(at(2032, 8, 7, 12, 0, 43), at(2032, 8, 2, 11, 0, 0)));

        assert!(compare_dates(at(2032, 8, 7, 12, 10, 10), at(2032, 8, 7, 12, 10, 10)));
        assert!(compare_dates(at(2032, 8, 7, 12, 13, 7), at(2032, 8, 7, 12, 10, 10)));
        assert!(!compare_dates(at(2032, 8, 7, 12, 13, 7), at(2032, 8, 7, 13, 13, 7)));
    }

    #[test]
    fn test_to_file_name() {
        assert_eq!(to_file_name(at(2012, 2, 3, 4, 5, 5)), "2012-02-03-04-05-05");
    }
}
