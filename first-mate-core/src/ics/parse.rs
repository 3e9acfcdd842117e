//! ICS feed parsing using the icalendar crate's parser.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use icalendar::{
    DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use crate::error::{FirstMateError, FirstMateResult};
use crate::event::{Event, EventTime, Recurrence};

/// Parse the VEVENTs of an ICS feed.
///
/// Events without a DTSTART or with a blank summary are skipped. A missing
/// DTEND means one hour for timed events and one day for all-day events.
pub fn parse_calendar(content: &str) -> FirstMateResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(FirstMateError::IcsParse)?;

    let mut vevents = Vec::new();
    for component in &calendar.components {
        collect_vevents(component, &mut vevents);
    }

    let events = vevents
        .into_iter()
        .filter_map(|vevent| {
            let event = parse_vevent(vevent);
            if event.is_none() {
                tracing::debug!(
                    uid = vevent.find_prop("UID").map(|p| p.val.as_ref()),
                    "skipping VEVENT without start or summary"
                );
            }
            event
        })
        .collect();

    Ok(events)
}

/// Parse a feed that must contain at least a VCALENDAR, even an empty one.
pub fn validate_calendar(content: &str) -> FirstMateResult<()> {
    if !content.contains("BEGIN:VCALENDAR") {
        return Err(FirstMateError::IcsParse(
            "Missing BEGIN:VCALENDAR".to_string(),
        ));
    }
    parse_calendar(content).map(|_| ())
}

fn collect_vevents<'a>(component: &'a Component<'a>, out: &mut Vec<&'a Component<'a>>) {
    if component.name == "VEVENT" {
        out.push(component);
        return;
    }
    for child in &component.components {
        collect_vevents(child, out);
    }
}

fn parse_vevent(vevent: &Component) -> Option<Event> {
    let summary = vevent.find_prop("SUMMARY").map(text_value)?;
    if summary.trim().is_empty() {
        return None;
    }

    let start = to_event_time(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .unwrap_or_else(|| default_end(&start));

    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| format!("{}@{}", summary, start.to_ics_string()));

    let description = vevent.find_prop("DESCRIPTION").map(text_value);
    let location = vevent.find_prop("LOCATION").map(text_value);

    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());
    let exdates: Vec<EventTime> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .flat_map(parse_exdate_property)
        .collect();
    let recurrence = rrule.map(|rrule| Recurrence { rrule, exdates });

    let recurrence_id = vevent
        .find_prop("RECURRENCE-ID")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time);

    Some(Event {
        uid,
        summary,
        description,
        location,
        start,
        end,
        recurrence,
        recurrence_id,
    })
}

fn default_end(start: &EventTime) -> EventTime {
    match start {
        EventTime::Date(d) => EventTime::Date(*d + Duration::days(1)),
        EventTime::DateTimeUtc(dt) => EventTime::DateTimeUtc(*dt + Duration::hours(1)),
        EventTime::DateTimeFloating(dt) => EventTime::DateTimeFloating(*dt + Duration::hours(1)),
        EventTime::DateTimeZoned { datetime, tzid } => EventTime::DateTimeZoned {
            datetime: *datetime + Duration::hours(1),
            tzid: tzid.clone(),
        },
    }
}

/// Read a TEXT property, undoing RFC 5545 escapes.
fn text_value(prop: &Property) -> String {
    let raw = prop.val.as_ref();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn to_event_time(value: DatePerhapsTime) -> EventTime {
    use icalendar::CalendarDateTime::{Floating, Utc, WithTimezone};

    match value {
        DatePerhapsTime::Date(date) => EventTime::Date(date),
        DatePerhapsTime::DateTime(Utc(dt)) => EventTime::DateTimeUtc(dt),
        DatePerhapsTime::DateTime(Floating(dt)) => EventTime::DateTimeFloating(dt),
        DatePerhapsTime::DateTime(WithTimezone { date_time, tzid }) => EventTime::DateTimeZoned {
            datetime: date_time,
            tzid,
        },
    }
}

/// All values of an EXDATE property, which may be a comma-separated list.
fn parse_exdate_property(prop: &Property) -> Vec<EventTime> {
    let param = |key: &str| {
        prop.params
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| p.val.as_ref())
            .map(|v| v.as_ref())
    };
    let tzid = param("TZID");
    let all_day = param("VALUE") == Some("DATE");

    prop.val
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter_map(|value| exdate_value(value, tzid, all_day))
        .collect()
}

fn exdate_value(value: &str, tzid: Option<&str>, all_day: bool) -> Option<EventTime> {
    const DATE_TIME: &str = "%Y%m%dT%H%M%S";

    if all_day {
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(EventTime::Date);
    }

    match (tzid, value.strip_suffix('Z')) {
        (_, Some(utc)) => NaiveDateTime::parse_from_str(utc, DATE_TIME)
            .ok()
            .map(|dt| EventTime::DateTimeUtc(dt.and_utc())),
        (Some(tzid), None) => NaiveDateTime::parse_from_str(value, DATE_TIME)
            .ok()
            .map(|datetime| EventTime::DateTimeZoned {
                datetime,
                tzid: tzid.to_string(),
            }),
        (None, None) => NaiveDateTime::parse_from_str(value, DATE_TIME)
            .ok()
            .map(EventTime::DateTimeFloating),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_parse_multiple_events() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:lec-1
SUMMARY:COMP1511 Lecture
DTSTART:20250303T220000Z
DTEND:20250304T000000Z
LOCATION:Ainsworth G03 (K-J17-G03)
END:VEVENT
BEGIN:VEVENT
UID:tut-1
SUMMARY:MATH1081 Tutorial
DTSTART;TZID=Australia/Sydney:20250305T140000
DTEND;TZID=Australia/Sydney:20250305T150000
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].uid, "lec-1");
        assert_eq!(
            events[0].start,
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 3, 3, 22, 0, 0).unwrap())
        );
        assert_eq!(events[0].location.as_deref(), Some("Ainsworth G03 (K-J17-G03)"));

        match &events[1].start {
            EventTime::DateTimeZoned { tzid, .. } => assert_eq!(tzid, "Australia/Sydney"),
            other => panic!("Expected DateTimeZoned, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_dtend_defaults_to_one_hour() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:quiz-1
SUMMARY:COMP1531 Quiz
DTSTART:20250303T230000Z
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(
            events[0].end,
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_dtend_on_all_day_event_is_one_day() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:exam-1
SUMMARY:COMP1511 Exam
DTSTART;VALUE=DATE:20250505
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(
            events[0].end,
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 5, 6).unwrap())
        );
    }

    #[test]
    fn test_events_without_start_are_skipped() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:no-start
SUMMARY:COMP1511 Lab
END:VEVENT
BEGIN:VEVENT
UID:ok
SUMMARY:COMP1511 Lab
DTSTART:20250303T230000Z
DTEND:20250304T010000Z
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "ok");
    }

    #[test]
    fn test_text_escapes_are_undone() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:esc
SUMMARY:COMP1511 Tutorial\, stream A
DESCRIPTION:Bring a laptop\nand charger
DTSTART:20250303T230000Z
DTEND:20250304T000000Z
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(events[0].summary, "COMP1511 Tutorial, stream A");
        assert_eq!(
            events[0].description.as_deref(),
            Some("Bring a laptop\nand charger")
        );
    }

    #[test]
    fn test_exdates_keep_their_timezone() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:test-123
SUMMARY:COMP1521 Lecture
DTSTART;TZID=Australia/Sydney:20250303T100000
DTEND;TZID=Australia/Sydney:20250303T120000
RRULE:FREQ=WEEKLY;COUNT=10
EXDATE;TZID=Australia/Sydney:20250310T100000,20250317T100000
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).expect("Should parse");
        let recurrence = events[0].recurrence.as_ref().expect("Should have recurrence");
        assert_eq!(recurrence.rrule, "FREQ=WEEKLY;COUNT=10");
        assert_eq!(recurrence.exdates.len(), 2);
        for exdate in &recurrence.exdates {
            match exdate {
                EventTime::DateTimeZoned { tzid, .. } => {
                    assert_eq!(tzid, "Australia/Sydney");
                }
                other => panic!("Expected DateTimeZoned, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_utc_and_all_day_exdates() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:utc
SUMMARY:MATH1131 Tutorial
DTSTART:20250303T230000Z
RRULE:FREQ=WEEKLY;COUNT=3
EXDATE:20250310T230000Z
END:VEVENT
BEGIN:VEVENT
UID:day
SUMMARY:Census Date
DTSTART;VALUE=DATE:20250303
RRULE:FREQ=DAILY;COUNT=3
EXDATE;VALUE=DATE:20250304
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).unwrap();
        let utc = &events[0].recurrence.as_ref().unwrap().exdates;
        assert_eq!(
            utc,
            &vec![EventTime::DateTimeUtc(
                Utc.with_ymd_and_hms(2025, 3, 10, 23, 0, 0).unwrap()
            )]
        );
        let day = &events[1].recurrence.as_ref().unwrap().exdates;
        assert_eq!(
            day,
            &vec![EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap())]
        );
    }

    #[test]
    fn test_validate_rejects_non_calendar() {
        assert!(validate_calendar("<html>Not a calendar</html>").is_err());
        assert!(validate_calendar("BEGIN:VCALENDAR\nVERSION:2.0\nEND:VCALENDAR").is_ok());
    }
}
