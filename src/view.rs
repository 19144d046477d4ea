//! Read-only snapshot handed to rendering: per-district fills, the seat
//! strip and popular-vote totals.

use crate::aggregate::{aggregate, share_pct, Aggregate};
use crate::config::ElectionConfig;
use crate::decision::{decide, Decision, FillState};
use crate::model::{District, PartyCode, Swing};
use crate::seats::{allocate, SeatChart};
use crate::store::VoteStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub party: PartyCode,
    pub party_name: String,
    pub name: String,
    pub votes: u64,
    /// Share of the district total, 0-100.
    pub share_pct: f64,
    pub swing: Swing,
    pub declared: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictView {
    pub name: String,
    pub code: Option<String>,
    pub fill_state: FillState,
    pub party: Option<PartyCode>,
    pub lead_margin: u64,
    pub conflict: bool,
    pub total_votes: u64,
    pub color: String,
    pub candidates: Vec<CandidateView>,
}

impl DistrictView {
    fn new(district: &District, decision: &Decision, config: &ElectionConfig) -> DistrictView {
        let total = district.total_votes();
        let declared = district.declared();

        let candidates = district
            .candidates()
            .iter()
            .zip(declared.iter())
            .map(|(candidate, declared)| CandidateView {
                party: candidate.party.clone(),
                party_name: config
                    .party(&candidate.party)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| candidate.party.to_string()),
                name: candidate.name.clone(),
                votes: candidate.votes,
                share_pct: share_pct(candidate.votes, total),
                swing: candidate.swing,
                declared: *declared,
            })
            .collect();

        DistrictView {
            name: district.name.clone(),
            code: district.code.clone(),
            fill_state: decision.state,
            party: decision.party.clone(),
            lead_margin: decision.lead_margin,
            conflict: decision.conflict,
            total_votes: total,
            color: decision.color(config).to_string(),
            candidates,
        }
    }

    /// Plain-text tooltip body.
    pub fn tooltip_lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if self.total_votes == 0 {
            lines.push("No results yet.".to_string());
            return lines;
        }
        for c in &self.candidates {
            lines.push(format!(
                "{} ({}) {} ({:.1}%) {}",
                c.name, c.party_name, c.votes, c.share_pct, c.swing
            ));
        }
        lines.push(format!("Total votes: {}", self.total_votes));
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionView {
    /// Roster order.
    pub districts: Vec<DistrictView>,
    pub seats: SeatChart,
    pub aggregate: Aggregate,
    /// `updatedAt` from the feed.
    pub last_updated: Option<String>,
    /// When the latest payload was merged.
    pub merged_at: Option<DateTime<Utc>>,
}

impl ElectionView {
    pub fn district(&self, name: &str) -> Option<&DistrictView> {
        self.districts.iter().find(|d| d.name == name)
    }

    pub fn count_in_state(&self, state: FillState) -> usize {
        self.districts
            .iter()
            .filter(|d| d.fill_state == state)
            .count()
    }
}

/// Recomputes everything from the store. Reads only.
pub fn derive(store: &VoteStore, config: &ElectionConfig) -> ElectionView {
    let decisions: Vec<(&District, Decision)> =
        store.districts().map(|d| (d, decide(d))).collect();

    let seats = allocate(
        config,
        decisions.iter().map(|(d, decision)| (d.name.as_str(), decision)),
        config.total_seats,
    );

    let districts = decisions
        .iter()
        .map(|(d, decision)| DistrictView::new(d, decision, config))
        .collect();

    ElectionView {
        districts,
        seats,
        aggregate: aggregate(store, config),
        last_updated: store.updated_at().map(|s| s.to_string()),
        merged_at: store.merged_at(),
    }
}
