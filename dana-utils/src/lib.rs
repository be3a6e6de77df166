//! Shared utility functions for DANA story crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Parse a day string as found in the sea temperature dataset.
    ///
    /// Accepts "YYYY-MM-DD" and ISO timestamps ("YYYY-MM-DDTHH:MM:SS", with
    /// or without a zone suffix); only the calendar date is kept.
    pub fn parse_day(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        let day = trimmed.get(..10).unwrap_or(trimmed);
        Ok(NaiveDate::parse_from_str(day, "%Y-%m-%d")?)
    }

    /// Format a date as the short "day/month" axis label used by the charts,
    /// without zero padding (e.g. "29/10").
    pub fn day_month_label(date: &NaiveDate) -> String {
        format!("{}/{}", date.day(), date.month())
    }

    /// Parse and format in one step, falling back to the raw string when the
    /// day cannot be parsed so the axis still shows something.
    pub fn day_month_label_or_raw(s: &str) -> String {
        match parse_day(s) {
            Ok(date) => day_month_label(&date),
            Err(_) => s.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_day() {
            let expected = NaiveDate::from_ymd_opt(2024, 10, 29).unwrap();
            assert_eq!(parse_day("2024-10-29").unwrap(), expected);
            assert_eq!(parse_day("2024-10-29T00:00:00").unwrap(), expected);
            assert_eq!(parse_day(" 2024-10-29T12:30:00Z ").unwrap(), expected);
            assert!(parse_day("29/10/2024").is_err());
            assert!(parse_day("").is_err());
        }

        #[test]
        fn test_day_month_label() {
            let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
            assert_eq!(day_month_label(&date), "1/10");
            let date = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
            assert_eq!(day_month_label(&date), "30/9");
        }

        #[test]
        fn test_label_falls_back_to_raw() {
            assert_eq!(day_month_label_or_raw("2024-08-15"), "15/8");
            assert_eq!(day_month_label_or_raw("mid-august"), "mid-august");
        }
    }
}

/// Number formatting for tooltips and popups
pub mod numbers {
    /// Format with a fixed number of decimals ("12.3").
    pub fn fixed(value: f64, decimals: usize) -> String {
        format!("{:.*}", decimals, value)
    }

    /// Group an integer's thousands the Spanish way ("12.345", "1.234.567").
    ///
    /// Four-digit numbers are left ungrouped ("1234"), matching the es-ES
    /// locale's minimum grouping digits.
    pub fn group_thousands(value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let sign = if value < 0 { "-" } else { "" };
        if digits.len() <= 4 {
            return format!("{sign}{digits}");
        }
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        format!("{sign}{grouped}")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_fixed() {
            assert_eq!(fixed(12.345, 1), "12.3");
            assert_eq!(fixed(0.0, 1), "0.0");
            assert_eq!(fixed(771.0, 0), "771");
        }

        #[test]
        fn test_group_thousands() {
            assert_eq!(group_thousands(0), "0");
            assert_eq!(group_thousands(999), "999");
            assert_eq!(group_thousands(1234), "1234");
            assert_eq!(group_thousands(12345), "12.345");
            assert_eq!(group_thousands(1234567), "1.234.567");
            assert_eq!(group_thousands(-812345), "-812.345");
        }
    }
}
