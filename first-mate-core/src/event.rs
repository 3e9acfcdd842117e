//! Calendar events as read from a timetable feed.
//!
//! These mirror the VEVENT components of an ICS feed closely enough to
//! expand recurrences, before [`crate::class::ClassEvent`] narrows them down
//! to university classes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    /// RRULE and EXDATEs for master events
    pub recurrence: Option<Recurrence>,
    /// Original start of the instance this event overrides (RECURRENCE-ID)
    pub recurrence_id: Option<EventTime>,
}

/// Recurrence rule of a master event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    /// RRULE value without the `RRULE:` prefix
    pub rrule: String,
    pub exdates: Vec<EventTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
    /// No timezone given; interpreted in the campus timezone
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    /// Resolve to a UTC instant.
    ///
    /// Floating times and all-day dates are read in `local`, as is any
    /// TZID chrono-tz doesn't know.
    pub fn to_utc(&self, local: Tz) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Date(d) => resolve_local(&local, d.and_time(NaiveTime::MIN)),
            EventTime::DateTimeUtc(dt) => Some(*dt),
            EventTime::DateTimeFloating(naive) => resolve_local(&local, *naive),
            EventTime::DateTimeZoned { datetime, tzid } => {
                let tz = Tz::from_str(tzid).unwrap_or(local);
                resolve_local(&tz, *datetime)
            }
        }
    }

    /// The ICS value form, used to key RECURRENCE-ID overrides.
    pub fn to_ics_string(&self) -> String {
        match self {
            EventTime::Date(d) => d.format("%Y%m%d").to_string(),
            EventTime::DateTimeUtc(dt) => dt.format("%Y%m%dT%H%M%SZ").to_string(),
            EventTime::DateTimeFloating(dt) => dt.format("%Y%m%dT%H%M%S").to_string(),
            EventTime::DateTimeZoned { datetime, .. } => {
                datetime.format("%Y%m%dT%H%M%S").to_string()
            }
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

/// Pick the earlier instant for ambiguous local times (DST fall-back) and
/// skip nonexistent ones (DST spring-forward).
fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeUtc(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            EventTime::DateTimeZoned { datetime, tzid } => {
                write!(f, "{} ({})", datetime.format("%Y-%m-%d %H:%M"), tzid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LOCAL_TZ;

    #[test]
    fn test_floating_time_is_read_in_local_tz() {
        let naive = NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let utc = EventTime::DateTimeFloating(naive).to_utc(LOCAL_TZ).unwrap();

        // Sydney is UTC+11 during daylight saving
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 3, 2, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_unknown_tzid_falls_back_to_local() {
        let naive = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let zoned = EventTime::DateTimeZoned {
            datetime: naive,
            tzid: "Not/AZone".to_string(),
        };

        // UTC+10 outside daylight saving
        assert_eq!(
            zoned.to_utc(LOCAL_TZ),
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_zoned_time_uses_its_own_tzid() {
        let naive = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let zoned = EventTime::DateTimeZoned {
            datetime: naive,
            tzid: "Europe/London".to_string(),
        };

        assert_eq!(
            zoned.to_utc(LOCAL_TZ),
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap())
        );
    }
}
