//! Applies feed updates onto the vote store.

use crate::config::ElectionConfig;
use crate::formats::{Declaration, DistrictRow, UpdatePayload};
use crate::model::District;
use crate::store::VoteStore;
use serde_json::Value;
use std::cmp::Ordering;

/// What a merge did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// The payload was not an object and was dropped wholesale.
    pub ignored: bool,
    /// Canonical names of districts touched by this payload.
    pub updated: Vec<String>,
    /// Raw keys that matched no district.
    pub unresolved: Vec<String>,
    /// Districts left with both parties flagged as declared.
    pub conflicts: Vec<String>,
    /// Districts where a legacy declared flag met tied votes.
    pub ambiguous: Vec<String>,
}

impl MergeReport {
    fn ignored() -> MergeReport {
        MergeReport {
            ignored: true,
            ..MergeReport::default()
        }
    }
}

/// Parses and merges a raw JSON payload. Never fails; see [`UpdatePayload::parse`].
pub fn merge_value(store: &mut VoteStore, config: &ElectionConfig, payload: &Value) -> MergeReport {
    match UpdatePayload::parse(payload) {
        Some(update) => merge(store, config, &update),
        None => {
            tracing::debug!("Ignoring payload that is not an object");
            MergeReport::ignored()
        }
    }
}

/// Merges a normalized payload. Districts absent from the payload, and
/// fields absent from a row, are left as they are.
pub fn merge(store: &mut VoteStore, config: &ElectionConfig, update: &UpdatePayload) -> MergeReport {
    let mut report = MergeReport::default();

    if let Some(updated_at) = &update.updated_at {
        store.set_updated_at(updated_at.clone());
    }

    for (key, swing) in &update.national_swing {
        match config.resolve_party(key) {
            Some(party) => store.set_national_swing(party.code.clone(), *swing),
            None => tracing::debug!("Ignoring national swing for unknown party {}", key),
        }
    }

    // Keys that alias the same district are folded into one row so each
    // district is applied once per payload.
    let mut rows: Vec<(String, DistrictRow)> = Vec::new();
    for (raw_key, row) in &update.districts {
        let name = match store.resolve(raw_key) {
            Some(name) => name,
            None => {
                tracing::debug!("No district matches key {}", raw_key);
                report.unresolved.push(raw_key.clone());
                continue;
            }
        };

        match rows.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, folded)) => folded.absorb(row),
            None => rows.push((name.to_string(), row.clone())),
        }
    }

    for (name, row) in rows {
        let district = match store.get_mut(&name) {
            Some(district) => district,
            None => continue,
        };

        apply_row(district, config, &row, &mut report);

        if district.declared() == [true, true] {
            tracing::warn!("Both parties declared in {}", name);
            report.conflicts.push(name.clone());
        }
        report.updated.push(name);
    }

    report
}

fn apply_row(district: &mut District, config: &ElectionConfig, row: &DistrictRow, report: &mut MergeReport) {
    for (party_key, entry) in &row.entries {
        match slot_for(district, config, party_key) {
            Some(slot) => district.set_result(slot, entry.votes(), entry.swing()),
            None => tracing::debug!(
                "Ignoring entry {} in {}: no such candidate",
                party_key,
                district.name
            ),
        }
    }

    // Declarations are resolved after votes so legacy inference sees this
    // row's counts.
    let declared = match &row.declared {
        None => return,
        Some(Declaration::PerParty(flags)) => {
            let mut declared = [false, false];
            for (party_key, flag) in flags {
                match slot_for(district, config, party_key) {
                    Some(slot) => declared[slot] = *flag,
                    None => tracing::debug!(
                        "Ignoring declaration for {} in {}",
                        party_key,
                        district.name
                    ),
                }
            }
            declared
        }
        Some(Declaration::Legacy(false)) => [false, false],
        Some(Declaration::Legacy(true)) => {
            let [a, b] = district.votes();
            match a.cmp(&b) {
                Ordering::Greater => [true, false],
                Ordering::Less => [false, true],
                Ordering::Equal => {
                    // No winner is guessed on a tie.
                    tracing::debug!("Declared flag on tied votes in {}", district.name);
                    report.ambiguous.push(district.name.clone());
                    [false, false]
                }
            }
        }
    };

    district.set_declared(declared);
}

fn slot_for(district: &District, config: &ElectionConfig, party_key: &str) -> Option<usize> {
    config
        .resolve_party(party_key)
        .and_then(|party| district.slot_of(&party.code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::payload::MAX_VOTES;
    use crate::model::Swing;
    use serde_json::json;

    fn setup() -> (ElectionConfig, VoteStore) {
        let config = ElectionConfig::default();
        let store = VoteStore::from_config(&config);
        (config, store)
    }

    #[test]
    fn merges_votes_and_swing_by_code() {
        let (config, mut store) = setup();
        let report = merge_value(
            &mut store,
            &config,
            &json!({"districts": {"NW": {"ULP": 1200, "NDP": {"votes": 900, "swing": "+2.1%"}}}}),
        );

        assert_eq!(report.updated, vec!["North Windward".to_string()]);
        let district = store.get("North Windward").unwrap();
        assert_eq!(district.votes(), [1200, 900]);
        assert_eq!(district.total_votes(), 2100);
        assert_eq!(district.candidates()[0].swing, Swing::NEUTRAL);
        assert_eq!(district.candidates()[1].swing, Swing::new(2.1));
    }

    #[test]
    fn party_keys_resolve_by_name() {
        let (config, mut store) = setup();
        merge_value(
            &mut store,
            &config,
            &json!({"districts": {"MQ": {"New Democratic Party": 77}}}),
        );
        assert_eq!(store.get("Marriaqua").unwrap().votes(), [0, 77]);
    }

    #[test]
    fn absent_districts_and_fields_are_untouched() {
        let (config, mut store) = setup();
        merge_value(
            &mut store,
            &config,
            &json!({"districts": {
                "NW": {"ULP": 10, "NDP": 20, "declared": {"NDP": 1}},
                "SW": {"ULP": 5, "NDP": 3}
            }}),
        );
        merge_value(&mut store, &config, &json!({"districts": {"NW": {"ULP": 15}}}));

        let nw = store.get("North Windward").unwrap();
        assert_eq!(nw.votes(), [15, 20]);
        assert_eq!(nw.declared(), [false, true]);
        assert_eq!(store.get("South Windward").unwrap().votes(), [5, 3]);
    }

    #[test]
    fn unresolved_keys_are_reported_not_fatal() {
        let (config, mut store) = setup();
        let report = merge_value(
            &mut store,
            &config,
            &json!({"districts": {"XX": {"ULP": 10}, "SG": {"ULP": 4}}}),
        );
        assert_eq!(report.unresolved, vec!["XX".to_string()]);
        assert_eq!(report.updated, vec!["Southern Grenadines".to_string()]);
    }

    #[test]
    fn legacy_flag_infers_party_from_votes() {
        let (config, mut store) = setup();
        merge_value(
            &mut store,
            &config,
            &json!({"districts": {"CK": {"ULP": 400, "NDP": 410, "declared": 1}}}),
        );
        assert_eq!(store.get("Central Kingstown").unwrap().declared(), [false, true]);

        merge_value(&mut store, &config, &json!({"districts": {"CK": {"declared": 0}}}));
        assert_eq!(store.get("Central Kingstown").unwrap().declared(), [false, false]);
    }

    #[test]
    fn legacy_flag_on_tie_declares_nobody() {
        let (config, mut store) = setup();
        let report = merge_value(
            &mut store,
            &config,
            &json!({"districts": {"CK": {"ULP": 400, "NDP": 400, "declared": 1}}}),
        );
        assert_eq!(store.get("Central Kingstown").unwrap().declared(), [false, false]);
        assert_eq!(report.ambiguous, vec!["Central Kingstown".to_string()]);
    }

    #[test]
    fn both_declared_is_reported_as_conflict() {
        let (config, mut store) = setup();
        let report = merge_value(
            &mut store,
            &config,
            &json!({"districts": {"EK": {"ULP": 1, "NDP": 2, "declared": {"ULP": 1, "NDP": 1}}}}),
        );
        assert_eq!(report.conflicts, vec!["East Kingstown".to_string()]);
        assert_eq!(store.get("East Kingstown").unwrap().declared(), [true, true]);
    }

    #[test]
    fn aliased_keys_apply_once_and_stay_stable() {
        let (config, mut store) = setup();
        let payload = json!({"districts": {
            "CK": {"ULP": 10, "declared": 1},
            "Central Kingstown": {"NDP": 20}
        }});

        let report = merge_value(&mut store, &config, &payload);
        assert_eq!(report.updated, vec!["Central Kingstown".to_string()]);
        let first = store.get("Central Kingstown").unwrap().clone();
        assert_eq!(first.votes(), [10, 20]);
        assert_eq!(first.declared(), [false, true]);

        merge_value(&mut store, &config, &payload);
        assert_eq!(store.get("Central Kingstown").unwrap(), &first);
    }

    #[test]
    fn oversized_votes_are_clamped_not_fatal() {
        let (config, mut store) = setup();
        merge_value(
            &mut store,
            &config,
            &json!({"districts": {"NW": {"ULP": 1e20, "NDP": 5}}}),
        );

        let nw = store.get("North Windward").unwrap();
        assert_eq!(nw.votes(), [MAX_VOTES, 5]);
        assert_eq!(nw.total_votes(), MAX_VOTES + 5);
    }

    #[test]
    fn non_object_payload_is_ignored() {
        let (config, mut store) = setup();
        let report = merge_value(&mut store, &config, &json!(42));
        assert!(report.ignored);
        assert!(store.districts().all(|d| d.total_votes() == 0));
    }

    #[test]
    fn top_level_fields_persist_until_replaced() {
        let (config, mut store) = setup();
        merge_value(
            &mut store,
            &config,
            &json!({"updatedAt": "2025-11-27T20:00:00Z", "nationalSwing": {"ULP": "-1.0"}}),
        );
        merge_value(&mut store, &config, &json!({"districts": {}}));

        assert_eq!(store.updated_at(), Some("2025-11-27T20:00:00Z"));
        assert_eq!(
            store.national_swing(&crate::model::PartyCode::from("ULP")),
            Swing::new(-1.0)
        );
    }
}
