use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(config: &FirstMateConfig, zid: &str) -> Result<()> {
    let matches = Directory::open(config).mutual_matches(zid)?;

    if matches.is_empty() {
        println!("{}", "No matches yet".dimmed());
        return Ok(());
    }

    // Private descriptions are only shown to mutual matches
    for user in &matches {
        println!("{}", user.render());
        if !user.private_description.is_empty() {
            println!("  {}", user.private_description);
        }
    }

    Ok(())
}
