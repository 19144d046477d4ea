use super::load_config;
use colored::*;
use std::path::Path;

pub fn info(config_path: Option<&Path>) -> election_map::Result<()> {
    let config = load_config(config_path)?;

    println!(
        "🗳  {} seats, {} districts",
        config.total_seats.to_string().bright_yellow(),
        config.districts.len().to_string().bright_yellow()
    );

    println!("{}", "Parties".bold());
    for party in &config.parties {
        println!(
            "  {} {} (declared {}, leading {})",
            party.code.to_string().bright_cyan(),
            party.name,
            party.color,
            party.lead_color
        );
    }

    println!("{}", "Districts".bold());
    for district in &config.districts {
        let candidates: Vec<String> = config
            .parties
            .iter()
            .filter_map(|p| {
                district
                    .candidates
                    .get(&p.code)
                    .map(|name| format!("{}: {}", p.code, name))
            })
            .collect();
        println!(
            "  {} [{}] {}",
            district.name.green(),
            district.code.as_deref().unwrap_or("-"),
            candidates.join(", ")
        );
    }

    Ok(())
}
