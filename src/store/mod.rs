pub mod canonical;

use crate::config::ElectionConfig;
use crate::model::{Candidate, District, PartyCode, Swing};
use canonical::CanonicalIndex;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// In-memory vote state for every district, plus the feed-level fields
/// carried alongside it.
#[derive(Debug, Clone, Default)]
pub struct VoteStore {
    districts: Vec<District>,
    index: CanonicalIndex,
    positions: BTreeMap<String, usize>,
    national_swing: BTreeMap<PartyCode, Swing>,
    updated_at: Option<String>,
    merged_at: Option<DateTime<Utc>>,
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded from the configured roster.
    pub fn from_config(config: &ElectionConfig) -> Self {
        let mut store = VoteStore::new();
        store.seed(config);
        store
    }

    /// Creates the districts named in the roster that do not exist yet.
    /// Existing districts keep their state. Returns the number created.
    pub fn seed(&mut self, config: &ElectionConfig) -> usize {
        let mut created = 0;

        for seed in &config.districts {
            if self.positions.contains_key(&seed.name) {
                continue;
            }

            // Candidate slots follow the configured party order.
            let candidates: Vec<Candidate> = config
                .parties
                .iter()
                .filter_map(|party| {
                    seed.candidates
                        .get(&party.code)
                        .map(|name| Candidate::new(party.code.clone(), name))
                })
                .collect();
            let pair: [Candidate; 2] = match candidates.try_into() {
                Ok(pair) => pair,
                Err(candidates) => {
                    tracing::warn!(
                        "Skipping district {} with {} known candidates",
                        seed.name,
                        candidates.len()
                    );
                    continue;
                }
            };

            self.index.insert(&seed.name, seed.code.as_deref());
            self.positions.insert(seed.name.clone(), self.districts.len());
            self.districts
                .push(District::new(&seed.name, seed.code.as_deref(), pair));
            created += 1;
        }

        created
    }

    /// Canonical district name for a raw feed key.
    pub fn resolve(&self, raw_key: &str) -> Option<&str> {
        self.index.resolve(raw_key)
    }

    pub fn get(&self, name: &str) -> Option<&District> {
        self.positions.get(name).map(|&i| &self.districts[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut District> {
        match self.positions.get(name) {
            Some(&i) => self.districts.get_mut(i),
            None => None,
        }
    }

    /// Districts in roster order.
    pub fn districts(&self) -> impl Iterator<Item = &District> {
        self.districts.iter()
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn national_swing(&self, party: &PartyCode) -> Swing {
        self.national_swing
            .get(party)
            .copied()
            .unwrap_or(Swing::NEUTRAL)
    }

    pub fn set_national_swing(&mut self, party: PartyCode, swing: Swing) {
        self.national_swing.insert(party, swing);
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    pub fn set_updated_at(&mut self, updated_at: String) {
        self.updated_at = Some(updated_at);
    }

    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    pub fn mark_merged(&mut self, at: DateTime<Utc>) {
        self.merged_at = Some(at);
    }

    /// Clears every result while keeping the seeded roster.
    pub fn reset(&mut self) {
        for district in self.districts.iter_mut() {
            district.clear();
        }
        self.national_swing.clear();
        self.updated_at = None;
        self.merged_at = None;
    }
}
