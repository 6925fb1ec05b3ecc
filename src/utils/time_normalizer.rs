//! Timezone-aware normalization of expiration dates and times.
//!
//! Expiration values arrive as wall-clock strings in the submitter's timezone.
//! They are converted to UTC before being compared with the current time or
//! stored, so every comparison happens in one canonical zone. The timezone is
//! always passed in explicitly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;

/// Fixed calendar date used to place a time-only value on a timeline.
pub const REFERENCE_DATE: (i32, u32, u32) = (1996, 3, 7);

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Errors that can occur while normalizing expiration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeNormalizationError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Local time {0} does not exist in the given timezone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Parses an IANA timezone name. `None` or a blank name means UTC.
///
/// # Errors
///
/// Returns [`TimeNormalizationError::UnknownTimezone`] for unrecognised names.
pub fn parse_timezone(name: Option<&str>) -> Result<Tz, TimeNormalizationError> {
    match name.map(str::trim) {
        None | Some("") => Ok(Tz::UTC),
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| TimeNormalizationError::UnknownTimezone(name.to_string())),
    }
}

/// Converts a `YYYY-MM-DD` date in `tz` to the UTC calendar date of its
/// local midnight.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chrono_tz::Tz;
/// use shortlink::utils::time_normalizer::expire_date_to_utc;
///
/// // Midnight in Kolkata is 18:30 UTC on the previous day.
/// let date = expire_date_to_utc("2030-01-10", Tz::Asia__Kolkata).unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2030, 1, 9).unwrap());
/// ```
pub fn expire_date_to_utc(date: &str, tz: Tz) -> Result<NaiveDate, TimeNormalizationError> {
    let local_date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| TimeNormalizationError::InvalidDate(date.to_string()))?;

    let local_midnight = local_date.and_time(NaiveTime::MIN);
    Ok(local_to_utc(local_midnight, tz)?.date())
}

/// Converts an `HH:MM` (or `HH:MM:SS`) time in `tz` to UTC, evaluated on
/// [`REFERENCE_DATE`]. Seconds are dropped.
pub fn expire_time_to_utc(time: &str, tz: Tz) -> Result<NaiveTime, TimeNormalizationError> {
    let trimmed = time.trim();
    let local_time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| TimeNormalizationError::InvalidTime(time.to_string()))?;

    let (year, month, day) = REFERENCE_DATE;
    let reference = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimeNormalizationError::InvalidDate(format!("{year}-{month}-{day}")))?;

    let utc_time = local_to_utc(reference.and_time(local_time), tz)?.time();
    Ok(truncate_to_minute(utc_time))
}

/// Drops seconds and sub-second precision, including a leap second.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    let minutes = i64::from(time.hour() * 60 + time.minute());
    NaiveTime::MIN + TimeDelta::minutes(minutes)
}

fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Result<NaiveDateTime, TimeNormalizationError> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.naive_utc())
        .ok_or(TimeNormalizationError::NonexistentLocalTime(local))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_timezone_defaults_to_utc() {
        assert_eq!(parse_timezone(None).unwrap(), Tz::UTC);
        assert_eq!(parse_timezone(Some("")).unwrap(), Tz::UTC);
        assert_eq!(parse_timezone(Some("  ")).unwrap(), Tz::UTC);
    }

    #[test]
    fn test_parse_timezone_named() {
        assert_eq!(
            parse_timezone(Some("Europe/Moscow")).unwrap(),
            Tz::Europe__Moscow
        );
    }

    #[test]
    fn test_parse_timezone_unknown() {
        assert_eq!(
            parse_timezone(Some("Mars/Olympus")),
            Err(TimeNormalizationError::UnknownTimezone(
                "Mars/Olympus".to_string()
            ))
        );
    }

    #[test]
    fn test_expire_date_utc_is_unchanged() {
        assert_eq!(
            expire_date_to_utc("2030-05-01", Tz::UTC).unwrap(),
            date(2030, 5, 1)
        );
    }

    #[test]
    fn test_expire_date_east_of_utc_moves_back() {
        assert_eq!(
            expire_date_to_utc("2030-05-01", Tz::Asia__Tokyo).unwrap(),
            date(2030, 4, 30)
        );
    }

    #[test]
    fn test_expire_date_west_of_utc_keeps_day() {
        assert_eq!(
            expire_date_to_utc("2030-05-01", Tz::America__New_York).unwrap(),
            date(2030, 5, 1)
        );
    }

    #[test]
    fn test_expire_date_invalid() {
        assert!(matches!(
            expire_date_to_utc("01/05/2030", Tz::UTC),
            Err(TimeNormalizationError::InvalidDate(_))
        ));
        assert!(matches!(
            expire_date_to_utc("2030-02-30", Tz::UTC),
            Err(TimeNormalizationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_expire_time_utc_is_unchanged() {
        assert_eq!(expire_time_to_utc("14:30", Tz::UTC).unwrap(), time(14, 30));
    }

    #[test]
    fn test_expire_time_uses_reference_date_offset() {
        // Moscow was UTC+3 on 1996-03-07.
        assert_eq!(
            expire_time_to_utc("14:30", Tz::Europe__Moscow).unwrap(),
            time(11, 30)
        );
        // Kolkata is UTC+5:30.
        assert_eq!(
            expire_time_to_utc("02:00", Tz::Asia__Kolkata).unwrap(),
            time(20, 30)
        );
    }

    #[test]
    fn test_expire_time_drops_seconds() {
        assert_eq!(
            expire_time_to_utc("08:15:59", Tz::UTC).unwrap(),
            time(8, 15)
        );
    }

    #[test]
    fn test_truncate_to_minute() {
        let precise = NaiveTime::from_hms_nano_opt(12, 0, 59, 500_000_000).unwrap();
        assert_eq!(truncate_to_minute(precise), time(12, 0));

        let leap = NaiveTime::from_hms_nano_opt(23, 59, 59, 1_500_000_000).unwrap();
        assert_eq!(truncate_to_minute(leap), time(23, 59));

        assert_eq!(truncate_to_minute(NaiveTime::MIN), time(0, 0));
    }

    #[test]
    fn test_expire_time_invalid() {
        assert!(matches!(
            expire_time_to_utc("25:00", Tz::UTC),
            Err(TimeNormalizationError::InvalidTime(_))
        ));
        assert!(matches!(
            expire_time_to_utc("noon", Tz::UTC),
            Err(TimeNormalizationError::InvalidTime(_))
        ));
    }
}
