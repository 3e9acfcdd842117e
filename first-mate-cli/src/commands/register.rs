use anyhow::{Context, Result};
use dialoguer::{Input, MultiSelect};
use first_mate_core::FirstMateConfig;
use first_mate_core::constants::DEGREES;
use first_mate_core::directory::Directory;
use first_mate_core::feed::{download_ical, normalize_feed_url};
use first_mate_core::user::{NewUser, normalize_zid};
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(
    config: &FirstMateConfig,
    zid: Option<String>,
    name: Option<String>,
    ical_url: Option<String>,
    degrees: Vec<String>,
) -> Result<()> {
    let directory = Directory::open(config);

    // --- zID ---
    let zid = match zid {
        Some(zid) => normalize_zid(&zid)?,
        None => prompt_with_retry("  zID", |input| Ok(normalize_zid(input)?))?,
    };
    if directory.user(&zid).is_ok() {
        anyhow::bail!(
            "{} is already registered.\n\n\
            Download their timetable again with:\n  \
            first-mate refresh {}",
            zid,
            zid
        );
    }

    // --- Name ---
    let display_name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("  Display name")
            .default(zid.clone())
            .interact_text()?,
    };

    // --- Feed ---
    let ical_url = match ical_url {
        Some(url) => url,
        None => prompt_with_retry("  Timetable feed URL", |input| {
            normalize_feed_url(input)?;
            Ok(input.to_string())
        })?,
    };

    // --- Degrees ---
    let degrees = if degrees.is_empty() {
        let selections = MultiSelect::new()
            .with_prompt("  Degrees (space to toggle, enter to confirm)")
            .items(DEGREES)
            .interact()?;
        selections.into_iter().map(|i| DEGREES[i].to_string()).collect()
    } else {
        degrees
    };

    let spinner = create_spinner("Downloading timetable...".to_string());
    let downloaded = download_ical(&ical_url).await;
    spinner.finish_and_clear();
    let calendar = downloaded.context("Could not download your timetable")?;

    let user = directory.register(
        NewUser {
            zid,
            display_name,
            ical_url,
            degrees,
        },
        &calendar,
    )?;

    println!("{} Registered {}", "✓".green(), user.render());
    println!(
        "\nFind people to meet with:\n  first-mate mates {}",
        user.zid
    );

    Ok(())
}

/// Prompt the user with retry on validation errors.
fn prompt_with_retry<F>(prompt: &str, validate: F) -> Result<String>
where
    F: Fn(&str) -> Result<String>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match validate(input.trim()) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}
