use election_map::config::ElectionConfig;
use election_map::decision::FillState;
use election_map::model::PartyCode;
use election_map::LiveResults;
use std::path::PathBuf;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[test]
fn sample_config_loads() {
    let config = ElectionConfig::load(&data("election.json")).unwrap();
    assert_eq!(config.total_seats, 5);
    assert_eq!(config.seat_sides().unwrap().1, &PartyCode::from("VA"));

    let mut live = LiveResults::new(config).unwrap();
    live.apply(&serde_json::json!({"districts": {"RG": {"HP": 10, "VA": 30}}}));
    let view = live.view();
    assert_eq!(view.seats.seats[4].district.as_deref(), Some("Ridge"));
    assert_eq!(view.seats.seats[4].color, "#b2e0c0");
}

#[test]
fn missing_config_is_an_io_error() {
    let err = ElectionConfig::load(&data("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, election_map::ConfigError::Io(_)));
}

#[test]
fn sample_update_applies_to_builtin_roster() {
    let text = std::fs::read_to_string(data("sample_update.json")).unwrap();
    let payload: serde_json::Value = serde_json::from_str(&text).unwrap();

    let mut live = LiveResults::new(ElectionConfig::default()).unwrap();
    let report = live.apply(&payload);
    assert_eq!(report.unresolved, vec!["ZZ".to_string()]);
    assert_eq!(report.updated.len(), 5);

    let view = live.view();
    let state = |name: &str| view.district(name).unwrap().fill_state;
    assert_eq!(state("North Windward"), FillState::DeclaredWinner);
    assert_eq!(state("North Central Windward"), FillState::Leading);
    assert_eq!(state("Central Kingstown"), FillState::DeclaredWinner);
    assert_eq!(state("West Kingstown"), FillState::Tie);
    assert_eq!(state("Southern Grenadines"), FillState::Leading);

    assert_eq!(
        view.district("Central Kingstown").unwrap().party,
        Some(PartyCode::from("NDP"))
    );
    assert_eq!(view.seats.decided_count, 2);
    assert_eq!(view.seats.summary(), "2 / 15 decided");
    assert_eq!(view.seats.seats_for(&PartyCode::from("ULP")), 2);
    assert_eq!(view.seats.seats_for(&PartyCode::from("NDP")), 2);
    assert_eq!(view.last_updated.as_deref(), Some("2025-11-27T21:45:00Z"));
}
