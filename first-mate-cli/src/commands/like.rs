use anyhow::Result;
use first_mate_core::FirstMateConfig;
use first_mate_core::directory::Directory;
use owo_colors::OwoColorize;

use crate::render::Render;

/// Like (or with `like == false`, unlike) another student.
pub fn run(config: &FirstMateConfig, zid: &str, them: &str, like: bool) -> Result<()> {
    let directory = Directory::open(config);
    let other = directory.user(them)?;

    if !like {
        directory.unlike(zid, them)?;
        println!("Unliked {}", other.render());
        return Ok(());
    }

    directory.like(zid, them)?;
    println!("{} Liked {}", "♥".red(), other.render());

    let me = directory.user(zid)?;
    if other.likes(&me.zid) {
        println!("\n{}", "It's a match!".green().bold());
        if !other.private_description.is_empty() {
            println!("  {}", other.private_description);
        }
    }

    Ok(())
}
