use serde::{Deserialize, Serialize};
use std::fmt;

/// Short party identifier used as the key in payload rows (e.g. `ULP`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyCode(String);

impl PartyCode {
    pub fn new(code: impl Into<String>) -> Self {
        PartyCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyCode {
    fn from(code: &str) -> Self {
        PartyCode::new(code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Canonical display name.
    pub name: String,
    pub code: PartyCode,
    /// Fill used once the party's win is declared.
    pub color: String,
    /// Lighter tint used while the party is only leading.
    #[serde(rename = "leadColor")]
    pub lead_color: String,
}

impl Party {
    pub fn new(name: &str, code: &str, color: &str, lead_color: &str) -> Party {
        Party {
            name: name.to_string(),
            code: PartyCode::new(code),
            color: color.to_string(),
            lead_color: lead_color.to_string(),
        }
    }

    /// True if `key` names this party by code or canonical name.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.code.as_str().eq_ignore_ascii_case(key) || self.name.eq_ignore_ascii_case(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_code_or_name_ignoring_case() {
        let party = Party::new("Unity Labour Party", "ULP", "#ed2633", "#f4a3a8");
        assert!(party.matches("ULP"));
        assert!(party.matches(" ulp "));
        assert!(party.matches("unity labour party"));
        assert!(!party.matches("NDP"));
    }
}
