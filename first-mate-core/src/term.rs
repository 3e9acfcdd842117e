//! UNSW term dates, for labelling weeks.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Number of teaching weeks before exams; exam week `n` is reported as
/// week `TEACHING_WEEKS + n`.
pub const TEACHING_WEEKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Term {
    pub year: i32,
    pub number: u8,
    /// Monday of orientation week
    pub orientation_start: NaiveDate,
    /// Monday of week 1
    pub teaching_start: NaiveDate,
    pub exam_start: NaiveDate,
    /// Last day of the exam period, inclusive
    pub end: NaiveDate,
}

const fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(y, m, d) {
        Some(date) => date,
        None => panic!("invalid term date"),
    }
}

const fn term(year: i32, number: u8, dates: [(u32, u32); 4]) -> Term {
    Term {
        year,
        number,
        orientation_start: date(year, dates[0].0, dates[0].1),
        teaching_start: date(year, dates[1].0, dates[1].1),
        exam_start: date(year, dates[2].0, dates[2].1),
        end: date(year, dates[3].0, dates[3].1),
    }
}

/// Orientation, week 1, exams and end of exams for each term.
pub static TERMS: &[Term] = &[
    term(2024, 1, [(2, 12), (2, 19), (4, 22), (5, 11)]),
    term(2024, 2, [(5, 20), (5, 27), (7, 29), (8, 17)]),
    term(2024, 3, [(9, 2), (9, 9), (11, 11), (12, 7)]),
    term(2025, 1, [(2, 17), (2, 24), (4, 28), (5, 17)]),
    term(2025, 2, [(5, 26), (6, 2), (8, 4), (8, 23)]),
    term(2025, 3, [(9, 8), (9, 15), (11, 17), (12, 13)]),
];

impl Term {
    /// e.g. "Term 1 2025"
    pub fn name(&self) -> String {
        format!("Term {} {}", self.number, self.year)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.orientation_start <= day && day <= self.end
    }

    pub fn week_of(&self, day: NaiveDate) -> TermWeek {
        if !self.contains(day) {
            TermWeek::OutOfTerm
        } else if day < self.teaching_start {
            TermWeek::Orientation
        } else if day >= self.exam_start {
            TermWeek::Exam(weeks_since(self.exam_start, day))
        } else {
            TermWeek::Teaching(weeks_since(self.teaching_start, day))
        }
    }
}

fn weeks_since(start: NaiveDate, day: NaiveDate) -> u32 {
    ((day - start).num_days() / 7 + 1) as u32
}

/// The term a local day falls in, if any.
pub fn term_for(day: NaiveDate) -> Option<&'static Term> {
    TERMS.iter().find(|term| term.contains(day))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TermWeek {
    Orientation,
    Teaching(u32),
    Exam(u32),
    OutOfTerm,
}

impl TermWeek {
    /// Which week of term `instant` falls in, using local dates in `tz`.
    pub fn at(instant: DateTime<Utc>, tz: Tz) -> Self {
        let day = instant.with_timezone(&tz).date_naive();
        term_for(day).map_or(TermWeek::OutOfTerm, |term| term.week_of(day))
    }

    /// Week number counted from week 1, with exam weeks following on
    /// from the teaching weeks.
    pub fn week_number(&self) -> Option<u32> {
        match self {
            TermWeek::Teaching(n) => Some(*n),
            TermWeek::Exam(n) => Some(TEACHING_WEEKS + n),
            TermWeek::Orientation | TermWeek::OutOfTerm => None,
        }
    }
}

impl fmt::Display for TermWeek {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TermWeek::Orientation => write!(f, "Orientation Week"),
            TermWeek::Teaching(n) => write!(f, "Week {}", n),
            TermWeek::Exam(n) => write!(f, "Exam Week {}", n),
            TermWeek::OutOfTerm => write!(f, "Not in term"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LOCAL_TZ;
    use chrono::TimeZone;

    fn sydney(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        LOCAL_TZ
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_teaching_weeks() {
        assert_eq!(TermWeek::at(sydney(2025, 2, 24, 9), LOCAL_TZ), TermWeek::Teaching(1));
        assert_eq!(TermWeek::at(sydney(2025, 3, 5, 9), LOCAL_TZ), TermWeek::Teaching(2));
        assert_eq!(TermWeek::at(sydney(2025, 4, 27, 9), LOCAL_TZ), TermWeek::Teaching(9));
    }

    #[test]
    fn test_orientation_week() {
        let week = TermWeek::at(sydney(2025, 2, 18, 9), LOCAL_TZ);
        assert_eq!(week, TermWeek::Orientation);
        assert_eq!(week.week_number(), None);
        assert_eq!(week.to_string(), "Orientation Week");
    }

    #[test]
    fn test_exam_weeks_follow_teaching_weeks() {
        let week = TermWeek::at(sydney(2025, 4, 29, 9), LOCAL_TZ);
        assert_eq!(week, TermWeek::Exam(1));
        assert_eq!(week.week_number(), Some(11));
        assert_eq!(week.to_string(), "Exam Week 1");

        // Last day of exams is still in term
        assert_eq!(TermWeek::at(sydney(2025, 5, 17, 20), LOCAL_TZ), TermWeek::Exam(3));
    }

    #[test]
    fn test_between_terms() {
        assert_eq!(TermWeek::at(sydney(2025, 5, 18, 9), LOCAL_TZ), TermWeek::OutOfTerm);
        assert_eq!(TermWeek::at(sydney(2030, 3, 1, 9), LOCAL_TZ), TermWeek::OutOfTerm);
    }

    #[test]
    fn test_local_date_decides_the_week() {
        // Monday 24 Feb 2025 at 1am in Sydney is still Sunday in UTC
        let instant = sydney(2025, 2, 24, 1);
        assert_eq!(TermWeek::at(instant, LOCAL_TZ), TermWeek::Teaching(1));
        assert_eq!(TermWeek::at(instant, chrono_tz::UTC), TermWeek::Orientation);
    }

    #[test]
    fn test_term_names() {
        let term = term_for(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()).unwrap();
        assert_eq!(term.name(), "Term 3 2024");
    }
}
