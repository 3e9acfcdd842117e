use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use first_mate_core::user::{ProfileUpdate, User};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(config: &FirstMateConfig, zid: &str, update: ProfileUpdate) -> Result<()> {
    let directory = Directory::open(config);

    let user = if update.is_empty() {
        directory.user(zid)?
    } else {
        let user = directory.update_profile(zid, update)?;
        println!("{} Profile updated\n", "✓".green());
        user
    };

    print_profile(&user);

    let mutual = directory.mutual_matches(&user.zid)?;
    println!("  Likes:       {}", user.likes.len());
    println!("  Matches:     {}", mutual.len());

    Ok(())
}

fn print_profile(user: &User) {
    println!("{}", user.render());

    let degrees = if user.degrees.is_empty() {
        "-".to_string()
    } else {
        user.degrees.join(", ")
    };
    println!("  Degrees:     {}", degrees);
    println!("  Feed:        {}", user.ical_url.dimmed());

    if !user.public_description.is_empty() {
        println!("  Public:      {}", user.public_description);
    }
    if !user.private_description.is_empty() {
        println!("  Private:     {}", user.private_description);
    }
}
