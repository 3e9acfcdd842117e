use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use first_mate_core::overlap::Mate;
use first_mate_core::user::User;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::RangeArgs;
use crate::render::{Render, RenderLocal, pluralize};

/// A mate along with the profile fields anyone can see.
#[derive(Serialize)]
struct MateOutput<'a> {
    #[serde(flatten)]
    mate: &'a Mate,
    display_name: &'a str,
    degrees: &'a [String],
    public_description: &'a str,
}

pub fn run(config: &FirstMateConfig, zid: &str, range: &RangeArgs, json: bool) -> Result<()> {
    let tz = config.tz()?;
    let rules = config.match_rules()?;
    let (range, label) = range.resolve(tz)?;

    let directory = Directory::open(config);
    let mates = directory.find_mates(zid, &range, tz, &rules)?;
    let users = directory.users()?;

    let with_profiles: Vec<(&Mate, &User)> = mates
        .iter()
        .filter_map(|mate| Some((mate, users.iter().find(|u| u.zid == mate.zid)?)))
        .collect();

    if json {
        let output: Vec<MateOutput> = with_profiles
            .iter()
            .map(|(mate, user)| MateOutput {
                mate,
                display_name: &user.display_name,
                degrees: &user.degrees,
                public_description: &user.public_description,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}\n", label.bold());

    if with_profiles.is_empty() {
        println!("{}", "No mates found".dimmed());
        return Ok(());
    }

    for (i, (mate, user)) in with_profiles.iter().enumerate() {
        if i > 0 {
            println!();
        }

        let count = format!(
            "{} {}",
            mate.matches.len(),
            pluralize("chance", mate.matches.len())
        );
        println!("{} {}", user.render(), count.dimmed());

        if !user.public_description.is_empty() {
            println!("  {}", user.public_description);
        }
        for info in &mate.matches {
            println!("  {}", info.render_local(tz));
        }
    }

    Ok(())
}
