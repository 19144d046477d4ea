//! Per-district classification: who (if anyone) owns the district and
//! how firmly.

use crate::config::ElectionConfig;
use crate::model::{District, PartyCode};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FillState {
    /// No votes reported.
    Undecided,
    Tie,
    DeclaredWinner,
    Leading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub state: FillState,
    pub party: Option<PartyCode>,
    #[serde(rename = "leadMargin")]
    pub lead_margin: u64,
    /// Both parties were flagged as declared.
    pub conflict: bool,
}

impl Decision {
    fn new(state: FillState, party: Option<PartyCode>, lead_margin: u64) -> Decision {
        Decision {
            state,
            party,
            lead_margin,
            conflict: false,
        }
    }

    pub fn is_declared(&self) -> bool {
        self.state == FillState::DeclaredWinner
    }

    /// True if the district counts towards a party's seats.
    pub fn holds_seat(&self) -> bool {
        matches!(self.state, FillState::DeclaredWinner | FillState::Leading) && self.party.is_some()
    }

    /// Map fill for this decision.
    pub fn color<'a>(&self, config: &'a ElectionConfig) -> &'a str {
        let party = self.party.as_ref().and_then(|code| config.party(code));
        match (self.state, party) {
            (FillState::DeclaredWinner, Some(party)) => &party.color,
            (FillState::Leading, Some(party)) => &party.lead_color,
            (FillState::Tie, _) => &config.palette.tie,
            _ => &config.palette.undecided,
        }
    }
}

/// Classifies a district. Rules, first match wins:
///
/// 1. no votes at all: undecided
/// 2. equal votes and no declaration: tie
/// 3. exactly one party declared: that party, whatever the count says
/// 4. both declared: the vote leader, or a tie if the votes are equal
/// 5. otherwise the vote leader is leading
pub fn decide(district: &District) -> Decision {
    let [a, b] = district.votes();
    let lead_margin = a.abs_diff(b);
    let candidates = district.candidates();

    if a == 0 && b == 0 {
        return Decision::new(FillState::Undecided, None, 0);
    }

    let leader = match a.cmp(&b) {
        Ordering::Greater => Some(0),
        Ordering::Less => Some(1),
        Ordering::Equal => None,
    };

    match district.declared() {
        [false, false] => match leader {
            None => Decision::new(FillState::Tie, None, 0),
            Some(slot) => Decision::new(
                FillState::Leading,
                Some(candidates[slot].party.clone()),
                lead_margin,
            ),
        },
        [true, false] => Decision::new(
            FillState::DeclaredWinner,
            Some(candidates[0].party.clone()),
            lead_margin,
        ),
        [false, true] => Decision::new(
            FillState::DeclaredWinner,
            Some(candidates[1].party.clone()),
            lead_margin,
        ),
        [true, true] => {
            let mut decision = match leader {
                Some(slot) => Decision::new(
                    FillState::DeclaredWinner,
                    Some(candidates[slot].party.clone()),
                    lead_margin,
                ),
                None => Decision::new(FillState::Tie, None, 0),
            };
            decision.conflict = true;
            decision
        }
    }
}
