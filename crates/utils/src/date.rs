//! Date and time formatting on top of `chrono`
//!
//! Patterns use the familiar `yyyy-MM-dd'T'HH:mm:ss.SSS` token style and are
//! translated into `chrono` format strings by plain token substitution. No
//! locale handling is attempted.

use crate::string::is_blank;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use commonutil_core::{Error, Result};
use std::fmt::Write as _;
use tracing::debug;

/// `chrono` rendering of `ISO_DATE_FMT`
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
/// `chrono` rendering of `TIMESTAMP_FMT`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
/// `chrono` rendering of `DATE_FMT`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Translate a token-style date pattern into a `chrono` format string
///
/// Supported tokens: `yyyy`/`yy`, `M`..`MMMM`, `d`/`dd`, `H`/`HH`, `h`/`hh`,
/// `m`/`mm`, `s`/`ss`, `SSS`/`SSSSSS`/`SSSSSSSSS`, `a`, `E`..`EEEE`.
/// Text in single quotes is copied literally and `''` is a single quote.
pub fn to_chrono_format(pattern: &str) -> Result<String> {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push('\'');
                    continue;
                }

                let mut closed = false;
                while let Some(literal) = chars.next() {
                    if literal == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            out.push('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    push_literal(&mut out, literal);
                }

                if !closed {
                    return Err(Error::date_format(pattern, "unterminated quoted literal"));
                }
            }
            letter if letter.is_ascii_alphabetic() => {
                let mut count = 1;
                while chars.peek() == Some(&letter) {
                    chars.next();
                    count += 1;
                }

                let specifier = token(letter, count).ok_or_else(|| {
                    Error::date_format(
                        pattern,
                        format!("unsupported token '{}'", letter.to_string().repeat(count)),
                    )
                })?;
                out.push_str(specifier);
            }
            other => push_literal(&mut out, other),
        }
    }

    Ok(out)
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

fn token(letter: char, count: usize) -> Option<&'static str> {
    let specifier = match (letter, count) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('a', 1) => "%p",
        ('E', 1..=3) => "%a",
        ('E', _) => "%A",
        _ => return None,
    };
    Some(specifier)
}

/// True when `first` is the same instant as `second` or later
pub fn is_date_after(first: &NaiveDateTime, second: &NaiveDateTime) -> bool {
    first >= second
}

/// Current UTC instant
pub fn timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Parse `value` as a date-time; a blank `value` yields `None`
pub fn string_to_local_date_time(value: &str, pattern: &str) -> Result<Option<NaiveDateTime>> {
    if is_blank(value) {
        return Ok(None);
    }

    let format = to_chrono_format(pattern)?;
    NaiveDateTime::parse_from_str(value, &format)
        .map(Some)
        .map_err(|e| {
            debug!(value = %value, pattern = %pattern, "value not in expected format");
            Error::date_parse(value, pattern, e.to_string())
        })
}

/// Parse `value` as a calendar date; a blank `value` yields `None`
pub fn string_to_local_date(value: &str, pattern: &str) -> Result<Option<NaiveDate>> {
    if is_blank(value) {
        return Ok(None);
    }

    let format = to_chrono_format(pattern)?;
    NaiveDate::parse_from_str(value, &format)
        .map(Some)
        .map_err(|e| {
            debug!(value = %value, pattern = %pattern, "value not in expected format");
            Error::date_parse(value, pattern, e.to_string())
        })
}

/// Format as `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`
pub fn date_to_iso_string(value: &NaiveDateTime) -> String {
    value.format(ISO_FORMAT).to_string()
}

/// Format as `yyyy-MM-dd`
pub fn date_to_string(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Format as `yyyy-MM-dd'T'HH:mm:ss.SSS`
pub fn timestamp_to_string(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an ISO string produced by [`date_to_iso_string`] and keep the date
pub fn iso_string_to_date(value: &str) -> Result<NaiveDate> {
    NaiveDateTime::parse_from_str(value, ISO_FORMAT)
        .map(|dt| dt.date())
        .map_err(|e| Error::date_parse(value, commonutil_core::ISO_DATE_FMT, e.to_string()))
}

/// Minute of the hour
pub fn minute<T: Timelike>(value: &T) -> u32 {
    value.minute()
}

/// Format with an arbitrary token-style pattern
pub fn format_with(value: &NaiveDateTime, pattern: &str) -> Result<String> {
    let format = to_chrono_format(pattern)?;
    let mut out = String::new();
    write!(out, "{}", value.format(&format))
        .map_err(|_| Error::date_format(pattern, "pattern cannot be rendered"))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonutil_core::{DATE_FMT, ISO_DATE_FMT, TIMESTAMP_FMT};

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2012, 6, 10)
            .unwrap()
            .and_hms_milli_opt(7, 5, 9, 42)
            .unwrap()
    }

    #[test]
    fn test_translate_patterns() {
        assert_eq!(to_chrono_format("yyyy-MM-dd").unwrap(), "%Y-%m-%d");
        assert_eq!(
            to_chrono_format("yyyy-MM-dd HH:mm:ss").unwrap(),
            "%Y-%m-%d %H:%M:%S"
        );
        assert_eq!(
            to_chrono_format(ISO_DATE_FMT).unwrap(),
            "%Y-%m-%dT%H:%M:%S.%3fZ"
        );
        assert_eq!(to_chrono_format("d/M/yy h a").unwrap(), "%-d/%-m/%y %-I %p");
        assert_eq!(to_chrono_format("'It''s' 100%").unwrap(), "It's 100%%");
        assert_eq!(to_chrono_format("''").unwrap(), "'");
    }

    #[test]
    fn test_translate_rejects_unknown_tokens() {
        assert!(matches!(
            to_chrono_format("yyyy-QQ"),
            Err(Error::DateFormat { .. })
        ));
        assert!(matches!(to_chrono_format("SS"), Err(Error::DateFormat { .. })));
        assert!(matches!(
            to_chrono_format("'open"),
            Err(Error::DateFormat { .. })
        ));
    }

    #[test]
    fn test_fixed_formats_agree_with_patterns() {
        let value = sample();
        assert_eq!(format_with(&value, ISO_DATE_FMT).unwrap(), date_to_iso_string(&value));
        assert_eq!(format_with(&value, TIMESTAMP_FMT).unwrap(), timestamp_to_string(&value));
        assert_eq!(
            format_with(&value, DATE_FMT).unwrap(),
            date_to_string(&value.date())
        );
    }

    #[test]
    fn test_is_date_after() {
        let earlier = NaiveDate::from_ymd_opt(2012, 6, 10)
            .unwrap()
            .and_hms_opt(0, 15, 0)
            .unwrap();
        let now = timestamp().naive_utc();

        assert!(is_date_after(&now, &earlier));
        assert!(is_date_after(&earlier, &earlier));
        assert!(!is_date_after(&earlier, &now));
    }

    #[test]
    fn test_string_to_local_date_time() {
        let parsed = string_to_local_date_time("2016-03-04 11:30:40", "yyyy-MM-dd HH:mm:ss")
            .unwrap()
            .unwrap();
        assert_eq!(parsed.to_string(), "2016-03-04 11:30:40");
        assert_eq!(parsed.format("%Y-%m-%dT%H:%M:%S").to_string(), "2016-03-04T11:30:40");

        assert_eq!(string_to_local_date_time("  ", "yyyy").unwrap(), None);
        assert!(matches!(
            string_to_local_date_time("04/03/2016", "yyyy-MM-dd HH:mm:ss"),
            Err(Error::DateParse { .. })
        ));
    }

    #[test]
    fn test_string_to_local_date() {
        let date = string_to_local_date("2016-03-04", "yyyy-MM-dd")
            .unwrap()
            .unwrap();
        assert_eq!(date.to_string(), "2016-03-04");
        assert_eq!(string_to_local_date("", "yyyy-MM-dd").unwrap(), None);
    }

    #[test]
    fn test_iso_round_trip() {
        let midnight = NaiveDate::from_ymd_opt(2012, 6, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let iso = date_to_iso_string(&midnight);
        assert_eq!(iso, "2012-06-10T00:00:00.000Z");
        assert_eq!(iso_string_to_date(&iso).unwrap(), midnight.date());
        assert!(matches!(
            iso_string_to_date("2012-06-10"),
            Err(Error::DateParse { .. })
        ));
    }

    #[test]
    fn test_plain_formats() {
        let value = sample();
        assert_eq!(date_to_string(&value.date()), "2012-06-10");
        assert_eq!(timestamp_to_string(&value), "2012-06-10T07:05:09.042");
        assert_eq!(minute(&value), 5);
    }
}
