use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use first_mate_core::term::TermWeek;
use owo_colors::OwoColorize;

use crate::RangeArgs;
use crate::render::{RenderLocal, format_day};

pub fn run(config: &FirstMateConfig, zid: &str, range: &RangeArgs) -> Result<()> {
    let tz = config.tz()?;
    let (range, label) = range.resolve(tz)?;
    let classes = Directory::open(config).class_events(zid, &range, tz)?;

    let term_week = TermWeek::at(range.from, tz);
    println!("{} {}\n", label.bold(), format!("({})", term_week).dimmed());

    if classes.is_empty() {
        println!("{}", "No classes found".dimmed());
        return Ok(());
    }

    // Group classes by local day
    let mut current_date = None;

    for class in &classes {
        let date = class.start.with_timezone(&tz).date_naive();

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_day(date).bold());
            current_date = Some(date);
        }

        println!("  {}", class.render_local(tz));
    }

    Ok(())
}
