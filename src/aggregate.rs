//! Popular-vote totals across all districts.

use crate::config::ElectionConfig;
use crate::model::{PartyCode, Swing};
use crate::store::VoteStore;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyTotal {
    pub party: PartyCode,
    pub name: String,
    pub color: String,
    pub votes: u64,
    /// Share of all votes cast, 0-100.
    pub pct: f64,
    #[serde(rename = "nationalSwing")]
    pub national_swing: Swing,
}

impl PartyTotal {
    /// Whole-number share for the popular-vote bar label.
    pub fn rounded_pct(&self) -> u64 {
        self.pct.round() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    /// In configured party order.
    pub parties: Vec<PartyTotal>,
    #[serde(rename = "totalVotes")]
    pub total_votes: u64,
}

impl Aggregate {
    pub fn party(&self, code: &PartyCode) -> Option<&PartyTotal> {
        self.parties.iter().find(|p| &p.party == code)
    }
}

pub fn share_pct(votes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        votes as f64 / total as f64 * 100.0
    }
}

pub fn aggregate(store: &VoteStore, config: &ElectionConfig) -> Aggregate {
    let mut votes: HashMap<&PartyCode, u64> = HashMap::new();
    let mut total_votes: u64 = 0;

    for district in store.districts() {
        for candidate in district.candidates() {
            let party_votes = votes.entry(&candidate.party).or_insert(0);
            *party_votes = party_votes.saturating_add(candidate.votes);
            total_votes = total_votes.saturating_add(candidate.votes);
        }
    }

    let parties = config
        .parties
        .iter()
        .map(|party| {
            let party_votes = votes.get(&party.code).copied().unwrap_or(0);
            PartyTotal {
                party: party.code.clone(),
                name: party.name.clone(),
                color: party.color.clone(),
                votes: party_votes,
                pct: share_pct(party_votes, total_votes),
                national_swing: store.national_swing(&party.code),
            }
        })
        .collect();

    Aggregate {
        parties,
        total_votes,
    }
}
