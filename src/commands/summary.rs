use colored::*;
use election_map::decision::FillState;
use election_map::merge::MergeReport;
use election_map::ElectionView;

/// Prints the derived view as a console summary.
pub fn print_view(view: &ElectionView) {
    let updated = view.last_updated.as_deref().unwrap_or("never");
    println!("📡 Last updated: {}", updated.bright_cyan());

    println!("{}", "Districts".bold());
    for district in &view.districts {
        let status = match (district.fill_state, &district.party) {
            (FillState::DeclaredWinner, Some(party)) => {
                format!("{} declared (+{})", party, district.lead_margin).green()
            }
            (FillState::Leading, Some(party)) => {
                format!("{} leading (+{})", party, district.lead_margin).yellow()
            }
            (FillState::Tie, _) => "tie".red(),
            _ => "no results".dimmed(),
        };
        println!(
            "  {:<28} {:>8} votes  {}",
            district.name, district.total_votes, status
        );
        if district.conflict {
            println!("    {}", "⚠️  both parties flagged as declared".red());
        }
    }

    println!("{}", "Popular vote".bold());
    for party in &view.aggregate.parties {
        println!(
            "  {:<24} {:>8} {:>3}%  swing {}",
            party.name,
            party.votes,
            party.rounded_pct(),
            party.national_swing
        );
    }
    println!("  {} votes", view.aggregate.total_votes);

    let strip: Vec<String> = view
        .seats
        .seats
        .iter()
        .map(|seat| match &seat.party {
            Some(party) if seat.declared => party.to_string().bold().to_string(),
            Some(party) => party.to_string().to_lowercase(),
            None => "·".to_string(),
        })
        .collect();
    println!("{} {}", "Seats".bold(), strip.join(" "));
    println!("  {}", view.seats.summary().bright_green());
}

pub fn print_report(report: &MergeReport) {
    if report.ignored {
        eprintln!("{}", "⚠️  Payload was not an object, ignored".yellow());
        return;
    }
    for key in &report.unresolved {
        eprintln!("{} {}", "Unknown district key:".yellow(), key);
    }
    for name in &report.ambiguous {
        eprintln!(
            "{} {}",
            "Declared on tied votes, no winner set:".yellow(),
            name
        );
    }
}
