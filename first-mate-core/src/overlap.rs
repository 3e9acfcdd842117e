//! Find times when two students' classes line up well enough to meet.
//!
//! A match is either:
//! - both students' classes start at roughly the same time and both are
//!   free for a while before, so they can meet up beforehand, or
//! - both students' classes end at roughly the same time and both are free
//!   for a while after, so they can meet up afterwards.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::campus::distance_between;
use crate::class::ClassEvent;
use crate::constants::{ENOUGH_TIME_FOR_MEET_UP, FREE_DAY, ROUGHLY_THE_SAME_TIME};

/// Thresholds for the matching heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// How far apart two start (or end) times can be and still count as the same
    pub tolerance: Duration,
    /// Free time both students need next to the boundary
    pub meet_up: Duration,
}

impl Default for MatchRules {
    fn default() -> Self {
        MatchRules {
            tolerance: ROUGHLY_THE_SAME_TIME,
            meet_up: ENOUGH_TIME_FOR_MEET_UP,
        }
    }
}

/// An opportunity to meet up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    /// Start of my class in the matched pair
    pub time: DateTime<Utc>,
    /// Whether the meet-up should happen before (true) or after (false) class
    pub before: bool,
    /// e.g. "COMP1531 Tutorial"
    pub class_description: String,
    /// Distance between the two classes' buildings, when both are known
    pub distance_m: Option<f64>,
}

/// A potential mate and every opportunity to meet them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mate {
    pub zid: String,
    pub matches: Vec<MatchInfo>,
}

impl MatchRules {
    pub fn times_are_similar(&self, t1: DateTime<Utc>, t2: DateTime<Utc>) -> bool {
        (t1 - t2).abs() <= self.tolerance
    }

    /// Whether there's enough free time before `time` on the calendar.
    ///
    /// A class that is still running at `time` leaves negative free time,
    /// which correctly fails the check.
    pub fn is_free_before(&self, calendar: &[ClassEvent], time: DateTime<Utc>) -> bool {
        let free = calendar
            .iter()
            .filter(|class| class.start < time)
            .map(|class| time - class.end)
            .fold(FREE_DAY, Duration::min);

        free >= self.meet_up
    }

    /// Whether there's enough free time after `time` on the calendar.
    pub fn is_free_after(&self, calendar: &[ClassEvent], time: DateTime<Utc>) -> bool {
        let free = calendar
            .iter()
            .filter(|class| class.end > time)
            .map(|class| class.start - time)
            .fold(FREE_DAY, Duration::min);

        free >= self.meet_up
    }

    /// Every meet-up opportunity between two sets of classes.
    ///
    /// Pairs are compared in order: each of my classes against each of
    /// theirs, a start match before an end match. Every match is reported
    /// at the start of my class.
    pub fn matching_times(&self, mine: &[ClassEvent], theirs: &[ClassEvent]) -> Vec<MatchInfo> {
        let mut matches = Vec::new();

        for my_class in mine {
            for their_class in theirs {
                let distance_m = match (my_class.building(), their_class.building()) {
                    (Some(a), Some(b)) => distance_between(a, b),
                    _ => None,
                };

                if self.times_are_similar(my_class.start, their_class.start) {
                    let earliest_start = my_class.start.min(their_class.start);
                    if self.is_free_before(mine, earliest_start)
                        && self.is_free_before(theirs, earliest_start)
                    {
                        matches.push(MatchInfo {
                            time: my_class.start,
                            before: true,
                            class_description: my_class.description(),
                            distance_m,
                        });
                    }
                }

                if self.times_are_similar(my_class.end, their_class.end) {
                    let latest_finish = my_class.end.max(their_class.end);
                    if self.is_free_after(mine, latest_finish)
                        && self.is_free_after(theirs, latest_finish)
                    {
                        matches.push(MatchInfo {
                            time: my_class.start,
                            before: false,
                            class_description: my_class.description(),
                            distance_m,
                        });
                    }
                }
            }
        }

        matches
    }

    /// Rank candidates as potential mates for `me`.
    ///
    /// `candidates` pairs each zID with that student's classes in the range
    /// of interest. `me` never matches themself, candidates without any
    /// match are dropped, and the rest are sorted by number of matches,
    /// most first (ties keep candidate order).
    pub fn find_mates<'a, I>(&self, me: &str, my_classes: &[ClassEvent], candidates: I) -> Vec<Mate>
    where
        I: IntoIterator<Item = (&'a str, &'a [ClassEvent])>,
    {
        let mut mates: Vec<Mate> = candidates
            .into_iter()
            .filter(|(zid, _)| *zid != me)
            .filter_map(|(zid, their_classes)| {
                let matches = self.matching_times(my_classes, their_classes);
                if matches.is_empty() {
                    None
                } else {
                    Some(Mate {
                        zid: zid.to_string(),
                        matches,
                    })
                }
            })
            .collect();

        mates.sort_by(|a, b| b.matches.len().cmp(&a.matches.len()));
        mates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassType;
    use chrono::TimeZone;

    /// A class on 3 March 2025 between the given UTC hours and minutes.
    fn class(code: &str, start: (u32, u32), end: (u32, u32), location: &str) -> ClassEvent {
        ClassEvent {
            course_code: code.to_string(),
            class_type: ClassType::Tutorial,
            location: location.to_string(),
            start: Utc.with_ymd_and_hms(2025, 3, 3, start.0, start.1, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 3, end.0, end.1, 0).unwrap(),
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, h, m, 0).unwrap()
    }

    #[test]
    fn test_times_are_similar_is_inclusive() {
        let rules = MatchRules::default();

        assert!(rules.times_are_similar(at(10, 0), at(10, 15)));
        assert!(rules.times_are_similar(at(10, 15), at(10, 0)));
        assert!(!rules.times_are_similar(at(10, 0), at(10, 16)));
    }

    #[test]
    fn test_free_before_with_empty_calendar() {
        let rules = MatchRules::default();
        assert!(rules.is_free_before(&[], at(10, 0)));
        assert!(rules.is_free_after(&[], at(10, 0)));
    }

    #[test]
    fn test_free_before_needs_a_full_hour() {
        let rules = MatchRules::default();
        let calendar = vec![class("COMP1511", (8, 0), (9, 0), "")];

        assert!(rules.is_free_before(&calendar, at(10, 0)));
        assert!(!rules.is_free_before(&calendar, at(9, 59)));
    }

    #[test]
    fn test_free_before_fails_during_a_class() {
        let rules = MatchRules::default();
        let calendar = vec![class("COMP1511", (8, 0), (11, 0), "")];

        assert!(!rules.is_free_before(&calendar, at(10, 0)));
    }

    #[test]
    fn test_free_after_ignores_earlier_classes() {
        let rules = MatchRules::default();
        let calendar = vec![
            class("COMP1511", (8, 0), (9, 0), ""),
            class("COMP1521", (10, 30), (12, 0), ""),
        ];

        assert!(!rules.is_free_after(&calendar, at(10, 0)));
        assert!(rules.is_free_after(&calendar, at(12, 0)));
    }

    #[test]
    fn test_similar_starts_match_before() {
        let rules = MatchRules::default();
        let mine = vec![class("COMP1531", (10, 0), (11, 0), "(K-J17-G03)")];
        let theirs = vec![class("MATH1081", (10, 10), (12, 0), "(K-K17-G03)")];

        let matches = rules.matching_times(&mine, &theirs);

        assert_eq!(matches.len(), 1);
        assert!(matches[0].before);
        assert_eq!(matches[0].time, at(10, 0));
        assert_eq!(matches[0].class_description, "COMP1531 Tutorial");
        assert!(matches[0].distance_m.is_some());
    }

    #[test]
    fn test_similar_ends_match_after() {
        let rules = MatchRules::default();
        let mine = vec![class("COMP1531", (9, 0), (11, 0), "")];
        let theirs = vec![class("MATH1081", (10, 0), (11, 5), "")];

        let matches = rules.matching_times(&mine, &theirs);

        assert_eq!(matches.len(), 1);
        assert!(!matches[0].before);
        assert_eq!(matches[0].time, at(9, 0));
        assert_eq!(matches[0].distance_m, None);
    }

    #[test]
    fn test_match_time_is_my_class_start() {
        let rules = MatchRules::default();
        let mine = vec![class("COMP1531", (10, 10), (11, 0), "")];
        let theirs = vec![class("MATH1081", (10, 0), (11, 5), "")];

        let matches = rules.matching_times(&mine, &theirs);

        assert_eq!(matches.len(), 2);
        assert!(matches[0].before);
        assert!(!matches[1].before);
        assert!(matches.iter().all(|m| m.time == at(10, 10)));
    }

    #[test]
    fn test_same_class_matches_both_ways() {
        let rules = MatchRules::default();
        let mine = vec![class("COMP1531", (10, 0), (11, 0), "")];
        let theirs = vec![class("COMP1531", (10, 0), (11, 0), "")];

        let matches = rules.matching_times(&mine, &theirs);

        assert_eq!(matches.len(), 2);
        assert!(matches[0].before);
        assert!(!matches[1].before);
    }

    #[test]
    fn test_no_match_when_either_student_is_busy() {
        let rules = MatchRules::default();
        let mine = vec![
            class("COMP1511", (9, 0), (9, 30), ""),
            class("COMP1531", (10, 0), (11, 0), ""),
        ];
        let theirs = vec![class("MATH1081", (10, 0), (11, 30), "")];

        // I only have 30 minutes before, ends are 30 minutes apart
        assert!(rules.matching_times(&mine, &theirs).is_empty());
    }

    #[test]
    fn test_empty_calendars_have_no_matches() {
        let rules = MatchRules::default();
        let mine = vec![class("COMP1531", (10, 0), (11, 0), "")];

        assert!(rules.matching_times(&mine, &[]).is_empty());
        assert!(rules.matching_times(&[], &mine).is_empty());
    }

    #[test]
    fn test_find_mates_ranks_by_match_count_and_skips_self() {
        let rules = MatchRules::default();
        let mine = vec![
            class("COMP1531", (10, 0), (11, 0), ""),
            class("COMP1521", (14, 0), (15, 0), ""),
        ];
        let one_match = vec![class("MATH1081", (10, 5), (12, 0), "")];
        let two_matches = vec![class("COMP1531", (10, 0), (11, 0), "")];
        let no_match = vec![class("ARTS1000", (12, 0), (13, 30), "")];

        let candidates = vec![
            ("z1111111", mine.as_slice()),
            ("z2222222", one_match.as_slice()),
            ("z3333333", no_match.as_slice()),
            ("z4444444", two_matches.as_slice()),
        ];

        let mates = rules.find_mates("z1111111", &mine, candidates);

        let zids: Vec<_> = mates.iter().map(|m| m.zid.as_str()).collect();
        assert_eq!(zids, vec!["z4444444", "z2222222"]);
        assert_eq!(mates[0].matches.len(), 2);
    }

    #[test]
    fn test_mate_json_shape() {
        let mate = Mate {
            zid: "z1234567".to_string(),
            matches: vec![MatchInfo {
                time: at(10, 0),
                before: true,
                class_description: "COMP1531 Tutorial".to_string(),
                distance_m: None,
            }],
        };

        let json = serde_json::to_value(&mate).unwrap();
        assert_eq!(json["zid"], "z1234567");
        assert_eq!(json["matches"][0]["time"], "2025-03-03T10:00:00Z");
        assert_eq!(json["matches"][0]["before"], true);
        assert!(json["matches"][0]["distance_m"].is_null());
    }

    #[test]
    fn test_custom_rules_widen_the_window() {
        let rules = MatchRules {
            tolerance: Duration::minutes(30),
            meet_up: Duration::minutes(30),
        };
        let mine = vec![class("COMP1531", (10, 0), (11, 0), "")];
        let theirs = vec![class("MATH1081", (10, 25), (12, 0), "")];

        assert_eq!(rules.matching_times(&mine, &theirs).len(), 1);
        assert!(
            MatchRules::default()
                .matching_times(&mine, &theirs)
                .is_empty()
        );
    }
}
