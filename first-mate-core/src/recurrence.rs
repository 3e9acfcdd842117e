//! RRULE expansion for recurring classes.
//!
//! Timetable feeds usually describe a class once with a weekly RRULE. This
//! expands such a master event into individual instances within a date
//! range, respecting EXDATEs and RECURRENCE-ID overrides.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::constants::MAX_OCCURRENCES;
use crate::date_range::DateRange;
use crate::error::{FirstMateError, FirstMateResult};
use crate::event::{Event, EventTime, Recurrence};

/// Build an iCalendar-format RRULE string for the rrule crate parser.
///
/// Floating times are pinned to `local` so occurrences keep their wall-clock
/// time across daylight saving changes.
fn build_rrule_string(start: &EventTime, recurrence: &Recurrence, local: Tz) -> String {
    let mut lines = vec![format!("DTSTART{}", ics_time_value(start, local))];

    lines.push(format!("RRULE:{}", recurrence.rrule));

    for exdate in &recurrence.exdates {
        lines.push(format!("EXDATE{}", ics_time_value(exdate, local)));
    }

    lines.join("\n")
}

/// Parameters and value of a DTSTART/EXDATE line, from the `;` or `:` on.
fn ics_time_value(time: &EventTime, local: Tz) -> String {
    match time {
        // the rrule crate needs a datetime, so all-day dates become midnight UTC
        EventTime::Date(d) => format!(":{}T000000Z", d.format("%Y%m%d")),
        EventTime::DateTimeUtc(dt) => format!(":{}", dt.format("%Y%m%dT%H%M%SZ")),
        EventTime::DateTimeFloating(dt) => {
            format!(";TZID={}:{}", local.name(), dt.format("%Y%m%dT%H%M%S"))
        }
        // unknown zones, e.g. Windows names from Outlook, read as local time
        EventTime::DateTimeZoned { datetime, tzid } => {
            let tz = tzid.parse::<Tz>().unwrap_or(local);
            format!(";TZID={}:{}", tz.name(), datetime.format("%Y%m%dT%H%M%S"))
        }
    }
}

/// Convert an rrule occurrence back to an EventTime matching the master's variant.
fn occurrence_to_event_time(dt: &DateTime<rrule::Tz>, master_start: &EventTime) -> EventTime {
    match master_start {
        EventTime::Date(_) => EventTime::Date(dt.date_naive()),
        EventTime::DateTimeUtc(_) => EventTime::DateTimeUtc(dt.with_timezone(&Utc)),
        EventTime::DateTimeFloating(_) => EventTime::DateTimeFloating(dt.naive_local()),
        EventTime::DateTimeZoned { tzid, .. } => EventTime::DateTimeZoned {
            datetime: dt.naive_local(),
            tzid: tzid.clone(),
        },
    }
}

/// Expand a recurring master event into the instances starting within `range`.
///
/// - `overrides` maps RECURRENCE-ID ICS strings to override events. An
///   override replaces the generated instance it points at.
/// - The master itself is not returned; every instance has `recurrence_id` set.
pub fn expand_recurring_event(
    master: &Event,
    range: &DateRange,
    overrides: &HashMap<String, Event>,
    local: Tz,
) -> FirstMateResult<Vec<Event>> {
    let recurrence = match &master.recurrence {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };

    let rrule_str = build_rrule_string(&master.start, recurrence, local);

    let rrule_set: RRuleSet = rrule_str.parse().map_err(|e| {
        FirstMateError::IcsParse(format!(
            "Failed to parse RRULE for event '{}': {}",
            master.uid, e
        ))
    })?;

    // after/before are exclusive, widen by a second to keep the range inclusive
    let tz: rrule::Tz = Utc.into();
    let after = (range.from - Duration::seconds(1)).with_timezone(&tz);
    let before = (range.to + Duration::seconds(1)).with_timezone(&tz);

    let result = rrule_set.after(after).before(before).all(MAX_OCCURRENCES);
    if result.limited {
        tracing::warn!(
            uid = %master.uid,
            limit = MAX_OCCURRENCES,
            "recurring event truncated"
        );
    }

    let duration = match (master.start.to_utc(local), master.end.to_utc(local)) {
        (Some(s), Some(e)) => e - s,
        _ => Duration::zero(),
    };

    let mut events = Vec::new();

    for occ_dt in &result.dates {
        let occ_event_time = occurrence_to_event_time(occ_dt, &master.start);

        if let Some(override_event) = overrides.get(&occ_event_time.to_ics_string()) {
            events.push(override_event.clone());
            continue;
        }

        let instance_end = match (&master.start, &master.end) {
            (EventTime::Date(d_start), EventTime::Date(d_end)) => {
                let day_diff = (*d_end - *d_start).num_days();
                EventTime::Date(occ_dt.date_naive() + Duration::days(day_diff))
            }
            (EventTime::DateTimeFloating(_), _) => {
                EventTime::DateTimeFloating(occ_dt.naive_local() + duration)
            }
            (EventTime::DateTimeZoned { tzid, .. }, _) => EventTime::DateTimeZoned {
                datetime: occ_dt.naive_local() + duration,
                tzid: tzid.clone(),
            },
            _ => EventTime::DateTimeUtc(occ_dt.with_timezone(&Utc) + duration),
        };

        events.push(Event {
            uid: master.uid.clone(),
            summary: master.summary.clone(),
            description: master.description.clone(),
            location: master.location.clone(),
            start: occ_event_time.clone(),
            end: instance_end,
            recurrence: None,
            recurrence_id: Some(occ_event_time),
        });
    }

    Ok(events)
}
