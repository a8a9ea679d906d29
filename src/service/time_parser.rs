use chrono::{Datelike, NaiveDateTime, NaiveTime};

use crate::errors::ScheduleError;

/// Shown next to every time option.
pub const TIME_HINT: &str =
    "(mm/dd(/yy)) hh:mm ({a,p}m) where () = optional and {} = choose either";

// Dated patterns. Those without a year get the current one appended.
const DATED_PATTERNS: [(&str, bool); 4] = [
    ("%m/%d/%y %I:%M %p", false),
    ("%m/%d/%y %H:%M", false),
    ("%m/%d %H:%M", true),
    ("%m/%d %I:%M %p", true),
];

const TIME_PATTERNS: [&str; 2] = ["%I:%M %p", "%H:%M"];

/// Parses loosely formatted user input, filling omitted date parts from `now`.
pub fn parse_time(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime, ScheduleError> {
    let input = text.trim().to_uppercase();
    // chrono lets a pattern space match no whitespace at all, so words must line up.
    let words = word_count(&input);

    for (pattern, needs_year) in DATED_PATTERNS {
        if word_count(pattern) != words {
            continue;
        }
        let parsed = if needs_year {
            NaiveDateTime::parse_from_str(
                &format!("{} {}", input, now.year()),
                &format!("{} %Y", pattern),
            )
        } else {
            NaiveDateTime::parse_from_str(&input, pattern)
        };
        if let Ok(value) = parsed {
            return Ok(value);
        }
    }

    TIME_PATTERNS
        .iter()
        .filter(|pattern| word_count(pattern) == words)
        .find_map(|pattern| NaiveTime::parse_from_str(&input, pattern).ok())
        .map(|time| now.date().and_time(time))
        .ok_or_else(|| ScheduleError::Parse(text.to_string()))
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 45, 0)
            .unwrap()
    }

    fn ymdhm(value: NaiveDateTime) -> (i32, u32, u32, u32, u32) {
        (value.year(), value.month(), value.day(), value.hour(), value.minute())
    }

    #[test]
    fn full_date_with_meridiem() {
        let parsed = parse_time("3/15/24 2:30 PM", now()).unwrap();
        assert_eq!(ymdhm(parsed), (2024, 3, 15, 14, 30));
    }

    #[test]
    fn full_date_twenty_four_hour() {
        let parsed = parse_time("12/01/25 17:05", now()).unwrap();
        assert_eq!(ymdhm(parsed), (2025, 12, 1, 17, 5));
    }

    #[test]
    fn month_day_defaults_to_current_year() {
        let parsed = parse_time("3/15 14:30", now()).unwrap();
        assert_eq!(ymdhm(parsed), (2026, 3, 15, 14, 30));

        let parsed = parse_time("3/15 2:30 pm", now()).unwrap();
        assert_eq!(ymdhm(parsed), (2026, 3, 15, 14, 30));
    }

    #[test]
    fn time_only_defaults_to_today() {
        let parsed = parse_time("2:30 PM", now()).unwrap();
        assert_eq!(ymdhm(parsed), (2026, 10, 19, 14, 30));

        let parsed = parse_time("09:15", now()).unwrap();
        assert_eq!(ymdhm(parsed), (2026, 10, 19, 9, 15));
    }

    #[test]
    fn lowercase_meridiem_is_accepted() {
        let parsed = parse_time("12:00 am", now()).unwrap();
        assert_eq!(ymdhm(parsed), (2026, 10, 19, 0, 0));
    }

    #[test]
    fn leap_day_without_year_uses_current_year() {
        let leap_now = NaiveDate::from_ymd_opt(2028, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let parsed = parse_time("2/29 10:00", leap_now).unwrap();
        assert_eq!(ymdhm(parsed), (2028, 2, 29, 10, 0));
        assert!(parse_time("2/29 10:00", now()).is_err());
    }

    #[test]
    fn rejects_garbage_and_partial_matches() {
        for text in [
            "soon",
            "",
            "25:00",
            "14:30 PM",
            "3/15/24",
            "3/15/24 2:30 PM extra",
            "3/152:30 PM",
            "3/15/242:30PM",
            "2:30PM",
        ] {
            assert_eq!(
                parse_time(text, now()),
                Err(ScheduleError::Parse(text.to_string())),
                "{text:?} should not parse"
            );
        }
    }
}
