//! Boundary parse for results-feed payloads.
//!
//! The feed is spreadsheet-backed and loosely typed: a vote entry may be a
//! bare number or an object, a declaration may be a single flag or one flag
//! per party, and numbers sometimes arrive as strings. Everything is
//! normalized here so the merge step only sees [`UpdatePayload`].

use crate::model::Swing;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

/// One party's entry in a district row.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteEntry {
    /// Bare vote count; swing is neutral.
    Count(u64),
    Detailed { votes: u64, swing: Swing },
}

impl VoteEntry {
    pub fn votes(&self) -> u64 {
        match self {
            VoteEntry::Count(votes) => *votes,
            VoteEntry::Detailed { votes, .. } => *votes,
        }
    }

    pub fn swing(&self) -> Swing {
        match self {
            VoteEntry::Count(_) => Swing::NEUTRAL,
            VoteEntry::Detailed { swing, .. } => *swing,
        }
    }

    fn from_value(value: &Value) -> VoteEntry {
        match value {
            Value::Object(fields) => VoteEntry::Detailed {
                votes: fields.get("votes").map(coerce_votes).unwrap_or(0),
                swing: fields
                    .get("swing")
                    .map(Swing::from_value)
                    .unwrap_or(Swing::NEUTRAL),
            },
            other => VoteEntry::Count(coerce_votes(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// Older feeds send one flag; the declared party is inferred from votes.
    Legacy(bool),
    /// Raw party key to flag.
    PerParty(Vec<(String, bool)>),
}

impl Declaration {
    fn from_value(value: &Value) -> Option<Declaration> {
        match value {
            Value::Null => None,
            Value::Object(fields) => Some(Declaration::PerParty(
                fields
                    .iter()
                    .map(|(key, flag)| (key.clone(), truthy(flag)))
                    .collect(),
            )),
            other => Some(Declaration::Legacy(truthy(other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistrictRow {
    pub declared: Option<Declaration>,
    /// Raw party key to vote entry, in payload order.
    pub entries: Vec<(String, VoteEntry)>,
}

impl DistrictRow {
    fn from_map(fields: &Map<String, Value>) -> DistrictRow {
        let mut row = DistrictRow::default();
        for (key, value) in fields {
            if key == "declared" {
                row.declared = Declaration::from_value(value);
            } else {
                row.entries.push((key.clone(), VoteEntry::from_value(value)));
            }
        }
        row
    }

    /// Folds a later row for the same district into this one. Later vote
    /// entries and a later declaration take precedence.
    pub fn absorb(&mut self, later: &DistrictRow) {
        self.entries.extend(later.entries.iter().cloned());
        if later.declared.is_some() {
            self.declared = later.declared.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdatePayload {
    pub updated_at: Option<String>,
    /// Raw party key to national swing.
    pub national_swing: Vec<(String, Swing)>,
    /// Raw district key to row, in payload order.
    pub districts: Vec<(String, DistrictRow)>,
}

impl UpdatePayload {
    /// Returns `None` when the payload is not a JSON object at all.
    /// Anything structurally parseable below that is coerced, never rejected.
    pub fn parse(value: &Value) -> Option<UpdatePayload> {
        let top = value.as_object()?;

        let updated_at = match top.get("updatedAt") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::debug!("Ignoring non-string updatedAt: {}", other);
                None
            }
        };

        let national_swing = match top.get("nationalSwing") {
            Some(Value::Object(swings)) => swings
                .iter()
                .map(|(party, swing)| (party.clone(), Swing::from_value(swing)))
                .collect(),
            _ => Vec::new(),
        };

        let mut districts = Vec::new();
        match top.get("districts") {
            Some(Value::Object(rows)) => {
                for (key, row) in rows {
                    match row {
                        Value::Object(fields) => {
                            districts.push((key.clone(), DistrictRow::from_map(fields)))
                        }
                        _ => tracing::debug!("Skipping non-object row for district {}", key),
                    }
                }
            }
            Some(_) => tracing::debug!("Ignoring non-object districts field"),
            None => {}
        }

        Some(UpdatePayload {
            updated_at,
            national_swing,
            districts,
        })
    }
}

/// Largest vote count accepted from the feed; larger values are clamped.
pub const MAX_VOTES: u64 = 1_000_000_000_000;

/// Coerces a feed value to a vote count. Malformed or negative values are 0,
/// anything above [`MAX_VOTES`] is clamped to it.
pub fn coerce_votes(value: &Value) -> u64 {
    parse_votes(value).min(MAX_VOTES)
}

fn parse_votes(value: &Value) -> u64 {
    lazy_static! {
        static ref COUNT_RX: Regex = Regex::new(r"^\d+(?:\.\d+)?$").unwrap();
    }

    match value {
        Value::Number(n) => {
            if let Some(votes) = n.as_u64() {
                votes
            } else {
                n.as_f64()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .map(|v| v.trunc() as u64)
                    .unwrap_or(0)
            }
        }
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if !COUNT_RX.is_match(&cleaned) {
                return 0;
            }
            cleaned
                .parse::<u64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().map(|v| v.trunc() as u64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Declaration flag truthiness: `true`, non-zero numbers, `1`/`true`/`yes`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes")
        }
        _ => false,
    }
}
