use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use first_mate_core::feed::download_ical;
use first_mate_core::user::User;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};
use crate::utils::tui::create_spinner;

pub async fn run(config: &FirstMateConfig, zid: Option<&str>) -> Result<()> {
    let directory = Directory::open(config);

    let users = match zid {
        Some(zid) => vec![directory.user(zid)?],
        None => directory.users()?,
    };

    if users.is_empty() {
        println!("{}", "No students registered".dimmed());
        return Ok(());
    }

    let mut failed = 0;
    for user in &users {
        if let Err(e) = refresh_user(&directory, user).await {
            failed += 1;
            println!("{} {} {}", "✗".red(), user.render(), e.to_string().red());
        }
    }

    let refreshed = users.len() - failed;
    println!(
        "\nRefreshed {} {}",
        refreshed,
        pluralize("timetable", refreshed)
    );

    if failed > 0 {
        anyhow::bail!("{} {} could not be refreshed", failed, pluralize("timetable", failed));
    }

    Ok(())
}

async fn refresh_user(directory: &Directory, user: &User) -> Result<()> {
    let spinner = create_spinner(format!("Downloading timetable for {}...", user.zid));
    let downloaded = download_ical(&user.ical_url).await;
    spinner.finish_and_clear();

    directory.set_calendar(&user.zid, &user.ical_url, &downloaded?)?;
    println!("{} {}", "✓".green(), user.render());
    Ok(())
}
