use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use owo_colors::OwoColorize;

use crate::RangeArgs;
use crate::render::{Render, RenderLocal, format_day};

pub fn run(
    config: &FirstMateConfig,
    zid: &str,
    them: &str,
    range: &RangeArgs,
    weekends: bool,
) -> Result<()> {
    let tz = config.tz()?;
    let (range, label) = range.resolve(tz)?;

    let mut options = config.free_time_options();
    if weekends {
        options.weekdays_only = false;
    }

    let directory = Directory::open(config);
    let other = directory.user(them)?;
    let days = directory.common_free_time(zid, them, &range, tz, &options)?;

    println!("{} with {}\n", label.bold(), other.render());

    if days.is_empty() {
        println!("{}", "No free time in common".dimmed());
        return Ok(());
    }

    for day in &days {
        println!("{}", format_day(day.date).bold());
        for block in &day.blocks {
            println!("  {}", block.render_local(tz));
        }
    }

    Ok(())
}
