//! Classes (the university kind) extracted from timetable events.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static COURSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{4}[0-9]{4}[A-Za-z]*").expect("valid regex"));

/// Matches the `(K-J17-G03)` suffix UNSW puts on class locations.
static BUILDING_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(K-([A-Z][0-9]{1,2})-").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    Lecture,
    Tutorial,
    Lab,
    Exam,
    Workshop,
}

/// Keywords searched for in the lower-cased summary and description.
/// Checked in order, so "Lecture test" is a lecture.
const CLASS_KEYWORDS: &[(ClassType, &[&str])] = &[
    (ClassType::Lecture, &["lect", "sem"]),
    (ClassType::Tutorial, &["tut"]),
    (ClassType::Lab, &["lab"]),
    (ClassType::Exam, &["exam", "test", "quiz", "assessment"]),
    (ClassType::Workshop, &["workshop"]),
];

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ClassType::Lecture => "Lecture",
            ClassType::Tutorial => "Tutorial",
            ClassType::Lab => "Lab",
            ClassType::Exam => "Exam",
            ClassType::Workshop => "Workshop",
        };
        f.write_str(name)
    }
}

/// A single scheduled class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEvent {
    /// Course code, e.g. COMP1531
    pub course_code: String,
    pub class_type: ClassType,
    /// Location as given by the feed, e.g. "Oboe Lab (K-J17-305)"
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ClassEvent {
    /// Interpret an event as a class.
    ///
    /// Returns None when no course code or class type can be found, meaning
    /// the event is an unknown kind of class or not a class at all.
    pub fn from_parts(
        summary: &str,
        description: &str,
        location: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<Self> {
        let course_code = extract_course_code(summary)?;
        let class_type = determine_class_type(summary, description)?;

        Some(ClassEvent {
            course_code,
            class_type,
            location: location.to_string(),
            start,
            end,
        })
    }

    /// e.g. "COMP1531 Tutorial"
    pub fn description(&self) -> String {
        format!("{} {}", self.course_code, self.class_type)
    }

    /// Campus building code from the location, e.g. "J17".
    pub fn building(&self) -> Option<&str> {
        BUILDING_CODE
            .captures(&self.location)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// Extract course code from a summary like "MATH1081 Tutorial".
pub fn extract_course_code(summary: &str) -> Option<String> {
    COURSE_CODE.find(summary).map(|m| m.as_str().to_string())
}

/// Determine the type of class from an event's summary and description.
pub fn determine_class_type(summary: &str, description: &str) -> Option<ClassType> {
    let text = format!("{} {}", summary, description).to_lowercase();

    CLASS_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(class_type, _)| *class_type)
}
