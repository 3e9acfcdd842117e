use anyhow::Result;
use first_mate_core::FirstMateConfig;
use owo_colors::OwoColorize;

use crate::render::format_duration;

pub fn run(config: &FirstMateConfig) -> Result<()> {
    let config_path = FirstMateConfig::config_path()?;
    let rules = config.match_rules()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Data:       {}", config.data_path().display());

    println!("\n{}", "Matching".bold());
    println!("  Timezone:   {}", config.tz()?.name());
    println!("  Tolerance:  {}", format_duration(rules.tolerance));
    println!("  Meet-up:    {}", format_duration(rules.meet_up));
    println!(
        "  Free time:  {}",
        if config.weekdays_only {
            "weekdays only"
        } else {
            "every day"
        }
    );

    Ok(())
}
