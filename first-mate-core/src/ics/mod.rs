//! ICS feed parsing.
//!
//! Timetable feeds are read according to RFC 5545; first-mate never writes ICS.

mod parse;

pub use parse::{parse_calendar, validate_calendar};
