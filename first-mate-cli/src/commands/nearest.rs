use anyhow::Result;
use first_mate_core::campus::{building_by_code, nearest_buildings};
use owo_colors::OwoColorize;

use crate::render::{Render, format_distance};

pub fn run(code: &str, count: usize) -> Result<()> {
    let Some(building) = building_by_code(code) else {
        anyhow::bail!(
            "Unknown building '{}'. Use a grid reference like K17 or J17",
            code
        );
    };

    println!("{}\n", building.render());

    // The building itself is always nearest
    let nearest = nearest_buildings(building.point(), count + 1)
        .into_iter()
        .filter(|(other, _)| other.code != building.code);

    for (other, distance) in nearest {
        println!(
            "  {} {}",
            other.render(),
            format_distance(distance).dimmed()
        );
    }

    Ok(())
}
