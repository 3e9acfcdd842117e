//! A student's timetable, read from their calendar feed.

use std::collections::{HashMap, HashSet};

use chrono_tz::Tz;

use crate::class::ClassEvent;
use crate::date_range::DateRange;
use crate::error::FirstMateResult;
use crate::event::Event;
use crate::ics::parse_calendar;
use crate::recurrence::expand_recurring_event;

/// Parsed calendar feed, split into the shapes recurrence expansion needs.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    /// Events without an RRULE or RECURRENCE-ID
    singles: Vec<Event>,
    /// Events with an RRULE
    masters: Vec<Event>,
    /// RECURRENCE-ID overrides, by uid then recurrence-id ICS string
    overrides: HashMap<String, HashMap<String, Event>>,
}

impl Timetable {
    pub fn from_ics(content: &str) -> FirstMateResult<Self> {
        Ok(Self::from_events(parse_calendar(content)?))
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        let mut timetable = Timetable::default();

        for event in events {
            if let Some(recurrence_id) = &event.recurrence_id {
                timetable
                    .overrides
                    .entry(event.uid.clone())
                    .or_default()
                    .insert(recurrence_id.to_ics_string(), event);
            } else if event.recurrence.is_some() {
                timetable.masters.push(event);
            } else {
                timetable.singles.push(event);
            }
        }

        timetable
    }

    /// Every event instance starting within `range`, recurrences expanded.
    pub fn events_in_range(&self, range: &DateRange, tz: Tz) -> Vec<Event> {
        let no_overrides = HashMap::new();
        let mut instances = Vec::new();
        let mut seen_overrides: HashSet<(String, String)> = HashSet::new();

        for master in &self.masters {
            let overrides = self.overrides.get(&master.uid).unwrap_or(&no_overrides);
            match expand_recurring_event(master, range, overrides, tz) {
                Ok(expanded) => {
                    for event in &expanded {
                        if let Some(rid) = &event.recurrence_id {
                            seen_overrides.insert((event.uid.clone(), rid.to_ics_string()));
                        }
                    }
                    instances.extend(expanded);
                }
                Err(e) => tracing::warn!(uid = %master.uid, error = %e, "skipping recurring event"),
            }
        }

        // Overrides moved into the range from an occurrence outside it
        let stray_overrides = self
            .overrides
            .iter()
            .flat_map(|(uid, by_rid)| by_rid.iter().map(move |(rid, event)| (uid, rid, event)))
            .filter(|(uid, rid, _)| !seen_overrides.contains(&((*uid).clone(), (*rid).clone())))
            .map(|(_, _, event)| event.clone());

        instances
            .into_iter()
            .chain(self.singles.iter().cloned())
            .chain(stray_overrides)
            .filter(|event| {
                event
                    .start
                    .to_utc(tz)
                    .is_some_and(|start| range.contains(start))
            })
            .collect()
    }

    /// Classes starting within `range`, sorted by start time.
    ///
    /// Events that aren't recognisable classes are dropped, as are exact
    /// duplicates (feeds list some classes once per stream).
    pub fn class_events(&self, range: &DateRange, tz: Tz) -> Vec<ClassEvent> {
        let mut seen = HashSet::new();

        let mut classes: Vec<ClassEvent> = self
            .events_in_range(range, tz)
            .into_iter()
            .filter_map(|event| {
                let start = event.start.to_utc(tz)?;
                let end = event.end.to_utc(tz)?;
                ClassEvent::from_parts(
                    &event.summary,
                    event.description.as_deref().unwrap_or(""),
                    event.location.as_deref().unwrap_or(""),
                    start,
                    end,
                )
            })
            .filter(|class| {
                seen.insert((
                    class.description(),
                    class.start,
                    class.end,
                    class.location.clone(),
                ))
            })
            .collect();

        classes.sort_by_key(|class| (class.start, class.end));
        classes
    }
}

/// Find the classes in an ICS feed that start within `range`.
pub fn find_class_events(ics: &str, range: &DateRange, tz: Tz) -> FirstMateResult<Vec<ClassEvent>> {
    Ok(Timetable::from_ics(ics)?.class_events(range, tz))
}
