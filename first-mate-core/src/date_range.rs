//! Date range for selecting classes.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{FirstMateError, FirstMateResult};

/// Half-open range of instants, `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> FirstMateResult<Self> {
        if from >= to {
            return Err(FirstMateError::DateRange(format!(
                "start {} is not before end {}",
                from, to
            )));
        }
        Ok(DateRange { from, to })
    }

    /// The Monday-to-Monday week containing `now`, shifted by `offset` weeks.
    ///
    /// `0` is this week, `-1` last week and `1` next week.
    pub fn week(offset: i64, now: DateTime<Utc>, tz: Tz) -> FirstMateResult<Self> {
        let out_of_range =
            || FirstMateError::DateRange(format!("week offset {} is out of range", offset));

        let today = now.with_timezone(&tz).date_naive();
        let this_monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let monday = Duration::try_weeks(offset)
            .and_then(|shift| this_monday.checked_add_signed(shift))
            .ok_or_else(out_of_range)?;
        let next_monday = monday
            .checked_add_signed(Duration::weeks(1))
            .ok_or_else(out_of_range)?;

        Self::new(local_midnight(monday, tz)?, local_midnight(next_monday, tz)?)
    }

    /// Build a range from YYYY-MM-DD arguments, read as local dates.
    ///
    /// `to` is inclusive: the range ends at the midnight after it. A missing
    /// `to` means one week after `from`.
    pub fn from_args(from: &str, to: Option<&str>, tz: Tz) -> FirstMateResult<Self> {
        let from_date = parse_date(from)?;
        let to_date = match to {
            Some(s) => parse_date(s)? + Duration::days(1),
            None => from_date + Duration::weeks(1),
        };

        Self::new(local_midnight(from_date, tz)?, local_midnight(to_date, tz)?)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.from && instant < self.to
    }

    /// Local calendar days touched by the range, in order.
    pub fn days(&self, tz: Tz) -> Vec<NaiveDate> {
        let first = self.from.with_timezone(&tz).date_naive();
        let last = (self.to - Duration::nanoseconds(1))
            .with_timezone(&tz)
            .date_naive();

        first
            .iter_days()
            .take_while(|day| *day <= last)
            .collect()
    }
}

/// Midnight at the start of `date` in `tz`, as a UTC instant.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> FirstMateResult<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FirstMateError::DateRange(format!("{} has no local midnight", date)))
}

fn parse_date(s: &str) -> FirstMateResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        FirstMateError::DateRange(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LOCAL_TZ;

    #[test]
    fn test_week_starts_on_local_monday() {
        // Wednesday 5 March 2025, 10am in Sydney
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 23, 0, 0).unwrap();
        let week = DateRange::week(0, now, LOCAL_TZ).unwrap();

        assert_eq!(week.from, Utc.with_ymd_and_hms(2025, 3, 2, 13, 0, 0).unwrap());
        assert_eq!(week.to, Utc.with_ymd_and_hms(2025, 3, 9, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_week_offset_moves_whole_weeks() {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 23, 0, 0).unwrap();
        let this_week = DateRange::week(0, now, LOCAL_TZ).unwrap();
        let last_week = DateRange::week(-1, now, LOCAL_TZ).unwrap();

        assert_eq!(last_week.to, this_week.from);
        assert_eq!(this_week.days(LOCAL_TZ).len(), 7);
        assert_eq!(
            last_week.days(LOCAL_TZ)[0],
            NaiveDate::from_ymd_opt(2025, 2, 24).unwrap()
        );
    }

    #[test]
    fn test_huge_week_offsets_are_errors() {
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 2, 0, 0).unwrap();

        for offset in [100_000_000_000_000, i64::MAX, i64::MIN, -20_000_000] {
            assert!(matches!(
                DateRange::week(offset, now, LOCAL_TZ),
                Err(FirstMateError::DateRange(_))
            ));
        }
    }

    #[test]
    fn test_from_args_includes_end_date() {
        let range = DateRange::from_args("2025-03-03", Some("2025-03-07"), LOCAL_TZ).unwrap();

        let days = range.days(LOCAL_TZ);
        assert_eq!(days.len(), 5);
        assert_eq!(days[4], NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        assert!(DateRange::from_args("03/03/2025", None, LOCAL_TZ).is_err());
        assert!(DateRange::from_args("2025-03-07", Some("2025-03-01"), LOCAL_TZ).is_err());
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = DateRange::from_args("2025-03-03", None, LOCAL_TZ).unwrap();

        assert!(range.contains(range.from));
        assert!(!range.contains(range.to));
    }
}
