//! Core library for first-mate.
//!
//! Reads students' university timetable feeds and finds other students
//! whose classes line up with theirs:
//! - `timetable` and `class` turn an ICS feed into a list of classes
//! - `overlap` finds times two students could meet before or after class
//! - `directory` stores registered students and wires the two together

pub mod campus;
pub mod class;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod directory;
pub mod error;
pub mod event;
pub mod feed;
pub mod free_time;
pub mod ics;
pub mod overlap;
pub mod recurrence;
pub mod term;
pub mod timetable;
pub mod user;

pub use class::{ClassEvent, ClassType};
pub use config::FirstMateConfig;
pub use date_range::DateRange;
pub use directory::Directory;
pub use error::{FirstMateError, FirstMateResult};
pub use overlap::{MatchInfo, MatchRules, Mate};
pub use timetable::{Timetable, find_class_events};
pub use user::{NewUser, ProfileUpdate, User};
