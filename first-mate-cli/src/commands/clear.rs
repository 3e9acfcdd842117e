use anyhow::Result;
use dialoguer::Confirm;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;

use crate::render::pluralize;

pub fn run(config: &FirstMateConfig, force: bool) -> Result<()> {
    let directory = Directory::open(config);
    let total = directory.users()?.len();

    if total == 0 {
        println!("Nothing to clear");
        return Ok(());
    }

    // Confirm unless --force
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete {} {} from {}?",
                total,
                pluralize("student", total),
                directory.root().display()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    directory.clear()?;
    println!("Deleted {} {}", total, pluralize("student", total));

    Ok(())
}
