use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(config: &FirstMateConfig) -> Result<()> {
    let users = Directory::open(config).users()?;

    if users.is_empty() {
        println!("{}", "No students registered".dimmed());
        println!("\nRegister with:\n  first-mate register");
        return Ok(());
    }

    for user in &users {
        println!("{}", user.render());
        if !user.degrees.is_empty() {
            println!("  {}", user.degrees.join(", ").dimmed());
        }
        if !user.public_description.is_empty() {
            println!("  {}", user.public_description);
        }
    }

    Ok(())
}
