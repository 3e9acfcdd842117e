//! Common free time between two timetables on a fixed daily grid.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::class::ClassEvent;
use crate::constants::{DAY_END_HOUR, DAY_START_HOUR, TIME_SLOT_MINUTES};
use crate::date_range::DateRange;

/// A stretch of time both students have free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeBlock {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Common free blocks on one local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeDay {
    pub date: NaiveDate,
    pub blocks: Vec<FreeBlock>,
}

#[derive(Debug, Clone, Copy)]
pub struct FreeTimeOptions {
    pub slot: Duration,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub weekdays_only: bool,
}

impl Default for FreeTimeOptions {
    fn default() -> Self {
        FreeTimeOptions {
            slot: Duration::minutes(TIME_SLOT_MINUTES),
            day_start: NaiveTime::from_hms_opt(DAY_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(DAY_END_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            weekdays_only: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Slot {
    fn is_busy(&self, classes: &[ClassEvent]) -> bool {
        classes
            .iter()
            .any(|class| class.start < self.end && class.end > self.start)
    }
}

impl FreeTimeOptions {
    /// Days in `range` on which both students have common free time.
    pub fn common_free_time(
        &self,
        mine: &[ClassEvent],
        theirs: &[ClassEvent],
        range: &DateRange,
        tz: Tz,
    ) -> Vec<FreeDay> {
        range
            .days(tz)
            .into_iter()
            .filter(|date| !self.weekdays_only || !is_weekend(date.weekday()))
            .filter_map(|date| {
                let free_slots: Vec<Slot> = self
                    .day_slots(date, tz)
                    .into_iter()
                    .filter(|slot| !slot.is_busy(mine) && !slot.is_busy(theirs))
                    .collect();

                let blocks: Vec<FreeBlock> = merge_consecutive_slots(&free_slots)
                    .into_iter()
                    .filter(|block| block.duration() >= self.slot)
                    .collect();

                if blocks.is_empty() {
                    None
                } else {
                    Some(FreeDay { date, blocks })
                }
            })
            .collect()
    }

    /// The grid of slots for a local day.
    fn day_slots(&self, date: NaiveDate, tz: Tz) -> Vec<Slot> {
        let to_utc = |time: NaiveTime| {
            tz.from_local_datetime(&date.and_time(time))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        };
        let (Some(day_start), Some(day_end)) = (to_utc(self.day_start), to_utc(self.day_end))
        else {
            return Vec::new();
        };
        if self.slot <= Duration::zero() {
            return Vec::new();
        }

        let mut slots = Vec::new();
        let mut current = day_start;
        while current < day_end {
            let end = (current + self.slot).min(day_end);
            slots.push(Slot {
                start: current,
                end,
            });
            current = end;
        }
        slots
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

fn merge_consecutive_slots(slots: &[Slot]) -> Vec<FreeBlock> {
    let mut blocks: Vec<FreeBlock> = Vec::new();

    for slot in slots {
        match blocks.last_mut() {
            Some(block) if block.end == slot.start => block.end = slot.end,
            _ => blocks.push(FreeBlock {
                start: slot.start,
                end: slot.end,
            }),
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassType;
    use crate::constants::LOCAL_TZ;

    /// A class on the given March 2025 day between local hours.
    fn class(day: u32, start_hour: u32, end_hour: u32) -> ClassEvent {
        let local = |h| {
            LOCAL_TZ
                .with_ymd_and_hms(2025, 3, day, h, 0, 0)
                .unwrap()
                .with_timezone(&Utc)
        };
        ClassEvent {
            course_code: "COMP1511".to_string(),
            class_type: ClassType::Lecture,
            location: String::new(),
            start: local(start_hour),
            end: local(end_hour),
        }
    }

    fn local(day: u32, hour: u32) -> DateTime<Utc> {
        LOCAL_TZ
            .with_ymd_and_hms(2025, 3, day, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn monday_only() -> DateRange {
        DateRange::from_args("2025-03-03", Some("2025-03-03"), LOCAL_TZ).unwrap()
    }

    #[test]
    fn test_free_day_is_one_block() {
        let days = FreeTimeOptions::default().common_free_time(&[], &[], &monday_only(), LOCAL_TZ);

        assert_eq!(days.len(), 1);
        assert_eq!(
            days[0].blocks,
            vec![FreeBlock {
                start: local(3, 8),
                end: local(3, 22),
            }]
        );
    }

    #[test]
    fn test_either_students_classes_split_blocks() {
        let mine = vec![class(3, 10, 12)];
        let theirs = vec![class(3, 14, 15)];

        let days =
            FreeTimeOptions::default().common_free_time(&mine, &theirs, &monday_only(), LOCAL_TZ);

        assert_eq!(
            days[0].blocks,
            vec![
                FreeBlock {
                    start: local(3, 8),
                    end: local(3, 10),
                },
                FreeBlock {
                    start: local(3, 12),
                    end: local(3, 14),
                },
                FreeBlock {
                    start: local(3, 15),
                    end: local(3, 22),
                },
            ]
        );
    }

    #[test]
    fn test_partially_overlapped_slot_is_busy() {
        let mut mine = vec![class(3, 8, 22)];
        mine[0].end = local(3, 21) + Duration::minutes(10);

        let days =
            FreeTimeOptions::default().common_free_time(&mine, &[], &monday_only(), LOCAL_TZ);

        assert_eq!(
            days[0].blocks,
            vec![FreeBlock {
                start: local(3, 21) + Duration::minutes(30),
                end: local(3, 22),
            }]
        );
    }

    #[test]
    fn test_fully_booked_days_are_omitted() {
        let mine = vec![class(3, 8, 22)];

        let days =
            FreeTimeOptions::default().common_free_time(&mine, &[], &monday_only(), LOCAL_TZ);
        assert!(days.is_empty());
    }

    #[test]
    fn test_weekends_skipped_by_default() {
        let week = DateRange::from_args("2025-03-03", Some("2025-03-09"), LOCAL_TZ).unwrap();

        let weekdays = FreeTimeOptions::default().common_free_time(&[], &[], &week, LOCAL_TZ);
        assert_eq!(weekdays.len(), 5);

        let everyday = FreeTimeOptions {
            weekdays_only: false,
            ..FreeTimeOptions::default()
        }
        .common_free_time(&[], &[], &week, LOCAL_TZ);
        assert_eq!(everyday.len(), 7);
    }
}
