//! TUI rendering traits for first-mate types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to first-mate-core types using owo_colors.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use first_mate_core::campus::Building;
use first_mate_core::class::ClassEvent;
use first_mate_core::free_time::FreeBlock;
use first_mate_core::overlap::MatchInfo;
use first_mate_core::user::User;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Rendering for types holding instants, shown in local time.
pub trait RenderLocal {
    fn render_local(&self, tz: Tz) -> String;
}

impl Render for User {
    fn render(&self) -> String {
        format!("{} {}", self.display_name.bold(), self.zid.dimmed())
    }
}

impl Render for Building {
    fn render(&self) -> String {
        format!("{:<4} {}", self.code.bold(), self.name)
    }
}

impl RenderLocal for ClassEvent {
    fn render_local(&self, tz: Tz) -> String {
        format!(
            "{} {} {}",
            format_time_span(self.start, self.end, tz),
            self.description(),
            self.location.dimmed()
        )
    }
}

impl RenderLocal for MatchInfo {
    fn render_local(&self, tz: Tz) -> String {
        let when = format!(
            "{} the {} class",
            if self.before { "before" } else { "after" },
            format_time(self.time, tz)
        );

        let mut line = format!(
            "{} {} {}",
            format_date_label(self.time, tz).bold(),
            when.green(),
            self.class_description
        );
        if let Some(distance) = self.distance_m {
            line.push_str(&format!(" {}", format!("({} apart)", format_distance(distance)).dimmed()));
        }
        line
    }
}

impl RenderLocal for FreeBlock {
    fn render_local(&self, tz: Tz) -> String {
        format!(
            "{} {}",
            format_time_span(self.start, self.end, tz),
            format!("({})", format_duration(self.duration())).dimmed()
        )
    }
}

/// Describe a week offset relative to this week.
pub fn week_offset_label(offset: i64) -> String {
    match offset {
        0 => "This week".to_string(),
        -1 => "Last week".to_string(),
        1 => "Next week".to_string(),
        n if n < 0 => format!("{} weeks ago", n.unsigned_abs()),
        n => format!("{} weeks from now", n),
    }
}

/// e.g. "Mon Mar 3"
pub fn format_day(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}

fn format_date_label(time: DateTime<Utc>, tz: Tz) -> String {
    format_day(time.with_timezone(&tz).date_naive())
}

fn format_time(time: DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%H:%M").to_string()
}

fn format_time_span(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> String {
    format!("{}-{}", format_time(start, tz), format_time(end, tz))
}

/// e.g. "1h 30m"
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0) as u64;
    humantime::format_duration(std::time::Duration::from_secs(minutes * 60)).to_string()
}

/// e.g. "350 m" or "1.2 km"
pub fn format_distance(metres: f64) -> String {
    if metres < 1000.0 {
        format!("{:.0} m", metres)
    } else {
        format!("{:.1} km", metres / 1000.0)
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
