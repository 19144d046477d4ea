use crate::model::{Party, PartyCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub const DEFAULT_TOTAL_SEATS: usize = 15;

fn default_total_seats() -> usize {
    DEFAULT_TOTAL_SEATS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Fill for districts and seats with no result.
    #[serde(default = "Palette::default_undecided")]
    pub undecided: String,
    /// Fill for tied districts.
    #[serde(default = "Palette::default_tie")]
    pub tie: String,
}

impl Palette {
    fn default_undecided() -> String {
        "#d7d7d7".to_string()
    }

    fn default_tie() -> String {
        "#000000".to_string()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            undecided: Palette::default_undecided(),
            tie: Palette::default_tie(),
        }
    }
}

/// Roster entry for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictSeed {
    pub name: String,
    /// Short code used by the results feed.
    #[serde(default)]
    pub code: Option<String>,
    /// Party code to candidate display name.
    pub candidates: BTreeMap<PartyCode, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "totalSeats", default = "default_total_seats")]
    pub total_seats: usize,
    /// Ordered; the first two are the left and right sides of the seat strip.
    pub parties: Vec<Party>,
    #[serde(default)]
    pub palette: Palette,
    pub districts: Vec<DistrictSeed>,
}

impl ElectionConfig {
    pub fn load(path: &Path) -> ConfigResult<ElectionConfig> {
        let reader = BufReader::new(File::open(path)?);
        let config: ElectionConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn party(&self, code: &PartyCode) -> Option<&Party> {
        self.parties.iter().find(|p| &p.code == code)
    }

    /// Resolves a payload key (code or canonical name) to a party.
    pub fn resolve_party(&self, key: &str) -> Option<&Party> {
        self.parties.iter().find(|p| p.matches(key))
    }

    /// Parties packed from the left and right ends of the seat strip.
    /// `None` when fewer than two parties are configured.
    pub fn seat_sides(&self) -> Option<(&PartyCode, &PartyCode)> {
        match self.parties.as_slice() {
            [left, right, ..] => Some((&left.code, &right.code)),
            _ => None,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.total_seats == 0 {
            return Err(invalid("totalSeats must be at least 1"));
        }
        if self.parties.len() < 2 {
            return Err(invalid(format!(
                "expected at least two parties, found {}",
                self.parties.len()
            )));
        }

        let mut codes = HashSet::new();
        let mut names = HashSet::new();
        for party in &self.parties {
            if !codes.insert(party.code.as_str().to_lowercase()) {
                return Err(invalid(format!("duplicate party code {}", party.code)));
            }
            if !names.insert(party.name.to_lowercase()) {
                return Err(invalid(format!("duplicate party name {}", party.name)));
            }
        }

        let mut keys = HashSet::new();
        for district in &self.districts {
            if district.candidates.len() != 2 {
                return Err(invalid(format!(
                    "district {} must have exactly two candidates, found {}",
                    district.name,
                    district.candidates.len()
                )));
            }
            for code in district.candidates.keys() {
                if self.party(code).is_none() {
                    return Err(invalid(format!(
                        "district {} names unknown party {}",
                        district.name, code
                    )));
                }
            }
            let district_keys = std::iter::once(&district.name).chain(district.code.as_ref());
            for key in district_keys {
                if !keys.insert(key.trim().to_lowercase()) {
                    return Err(invalid(format!("duplicate district key {}", key)));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

const BUILTIN_DISTRICTS: [(&str, &str); 15] = [
    ("North Windward", "NW"),
    ("North Central Windward", "NCW"),
    ("South Central Windward", "SCW"),
    ("South Windward", "SW"),
    ("Marriaqua", "MQ"),
    ("East St. George", "ESG"),
    ("West St. George", "WSG"),
    ("East Kingstown", "EK"),
    ("Central Kingstown", "CK"),
    ("West Kingstown", "WK"),
    ("South Leeward", "SL"),
    ("Central Leeward", "CL"),
    ("North Leeward", "NL"),
    ("Northern Grenadines", "NG"),
    ("Southern Grenadines", "SG"),
];

impl Default for ElectionConfig {
    fn default() -> Self {
        let parties = vec![
            Party::new("Unity Labour Party", "ULP", "#ed2633", "#f4a3a8"),
            Party::new("New Democratic Party", "NDP", "#f5c02c", "#fae3a0"),
        ];

        let districts = BUILTIN_DISTRICTS
            .iter()
            .map(|(name, code)| DistrictSeed {
                name: name.to_string(),
                code: Some(code.to_string()),
                candidates: parties
                    .iter()
                    .map(|p| (p.code.clone(), format!("{} candidate, {}", p.code, name)))
                    .collect(),
            })
            .collect();

        ElectionConfig {
            total_seats: DEFAULT_TOTAL_SEATS,
            parties,
            palette: Palette::default(),
            districts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_config_is_valid() {
        let config = ElectionConfig::default();
        config.validate().unwrap();
        assert_eq!(config.total_seats, 15);
        assert_eq!(config.districts.len(), 15);
        assert_eq!(config.seat_sides().unwrap().0.as_str(), "ULP");
    }

    #[test]
    fn parses_camel_case_json_with_defaults() {
        let config: ElectionConfig = serde_json::from_value(json!({
            "parties": [
                {"name": "Left", "code": "L", "color": "#f00", "leadColor": "#faa"},
                {"name": "Right", "code": "R", "color": "#00f", "leadColor": "#aaf"}
            ],
            "districts": [
                {"name": "Alpha", "code": "A", "candidates": {"L": "Ann", "R": "Rob"}}
            ]
        }))
        .unwrap();

        assert_eq!(config.total_seats, DEFAULT_TOTAL_SEATS);
        assert_eq!(config.palette, Palette::default());
        config.validate().unwrap();
    }

    #[test]
    fn rejects_single_candidate_district() {
        let mut config = ElectionConfig::default();
        config.districts[0].candidates.remove(&PartyCode::from("NDP"));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unknown_party_and_duplicate_codes() {
        let mut config = ElectionConfig::default();
        config.districts[1].candidates = [("ULP", "x"), ("XYZ", "y")]
            .iter()
            .map(|(c, n)| (PartyCode::from(*c), n.to_string()))
            .collect();
        assert!(config.validate().is_err());

        let mut config = ElectionConfig::default();
        config.districts[2].code = Some("nw".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_too_few_parties() {
        let mut config = ElectionConfig::default();
        config.parties.truncate(1);
        config.districts.clear();
        assert!(config.validate().is_err());
    }
}
