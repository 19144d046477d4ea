//! Packs district decisions into the fixed seat strip.

use crate::config::ElectionConfig;
use crate::decision::{Decision, FillState};
use crate::model::PartyCode;
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub state: FillState,
    pub party: Option<PartyCode>,
    pub district: Option<String>,
    pub declared: bool,
    #[serde(rename = "leadMargin")]
    pub lead_margin: u64,
    pub color: String,
}

impl Seat {
    fn empty(config: &ElectionConfig) -> Seat {
        Seat {
            state: FillState::Undecided,
            party: None,
            district: None,
            declared: false,
            lead_margin: 0,
            color: config.palette.undecided.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.party.is_none()
    }

    /// Hover text for the seat: district and lead, or "No results".
    pub fn label(&self) -> String {
        match (&self.district, &self.party) {
            (Some(district), Some(party)) => {
                format!("{}: {} +{} votes", district, party, self.lead_margin)
            }
            _ => "No results".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatChart {
    pub seats: Vec<Seat>,
    /// Seats held by a declared winner.
    #[serde(rename = "decidedCount")]
    pub decided_count: usize,
    #[serde(rename = "leadingCount")]
    pub leading_count: usize,
}

impl SeatChart {
    pub fn total(&self) -> usize {
        self.seats.len()
    }

    pub fn seats_for(&self, party: &PartyCode) -> usize {
        self.seats
            .iter()
            .filter(|s| s.party.as_ref() == Some(party))
            .count()
    }

    pub fn summary(&self) -> String {
        format!("{} / {} decided", self.decided_count, self.total())
    }
}

/// Builds a strip of `total` seats. The first seat-side party fills from
/// slot 0 upward, the second from the last slot downward; each side is
/// ordered declared-first, then by descending lead. Ties and undecided
/// districts take no seat.
///
/// If the two sides meet, an occupied slot changes hands only when the
/// incoming district has a strictly larger lead.
pub fn allocate<'a, I>(config: &ElectionConfig, decisions: I, total: usize) -> SeatChart
where
    I: IntoIterator<Item = (&'a str, &'a Decision)>,
{
    let mut seats: Vec<Seat> = (0..total).map(|_| Seat::empty(config)).collect();

    let (left, right) = match config.seat_sides() {
        Some(sides) => sides,
        None => {
            tracing::warn!("Seat strip needs two parties, found {}", config.parties.len());
            return SeatChart {
                seats,
                decided_count: 0,
                leading_count: 0,
            };
        }
    };

    let holders: Vec<(&str, &Decision)> = decisions
        .into_iter()
        .filter(|(_, decision)| decision.holds_seat())
        .collect();

    for (slot, (district, decision)) in ranked(&holders, left).into_iter().take(total).enumerate() {
        seats[slot] = occupied(config, district, decision);
    }

    for (offset, (district, decision)) in ranked(&holders, right).into_iter().take(total).enumerate() {
        let slot = total - 1 - offset;
        let current = &seats[slot];
        if current.is_empty() || decision.lead_margin > current.lead_margin {
            if !current.is_empty() {
                tracing::debug!(
                    "Seat {} reassigned from {:?} to {}",
                    slot,
                    current.district,
                    district
                );
            }
            seats[slot] = occupied(config, district, decision);
        }
    }

    let decided_count = seats.iter().filter(|s| s.declared).count();
    let leading_count = seats
        .iter()
        .filter(|s| s.state == FillState::Leading)
        .count();

    SeatChart {
        seats,
        decided_count,
        leading_count,
    }
}

/// One side's districts, most secure first. Equal keys keep input order.
fn ranked<'a>(holders: &[(&'a str, &'a Decision)], side: &PartyCode) -> Vec<(&'a str, &'a Decision)> {
    holders
        .iter()
        .filter(|(_, decision)| decision.party.as_ref() == Some(side))
        .copied()
        .sorted_by_key(|(_, decision)| (!decision.is_declared(), Reverse(decision.lead_margin)))
        .collect()
}

fn occupied(config: &ElectionConfig, district: &str, decision: &Decision) -> Seat {
    Seat {
        state: decision.state,
        party: decision.party.clone(),
        district: Some(district.to_string()),
        declared: decision.is_declared(),
        lead_margin: decision.lead_margin,
        color: decision.color(config).to_string(),
    }
}
