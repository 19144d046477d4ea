use super::{PartyCode, Swing};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub party: PartyCode,
    pub name: String,
    pub votes: u64,
    pub swing: Swing,
}

impl Candidate {
    pub fn new(party: PartyCode, name: &str) -> Candidate {
        Candidate {
            party,
            name: name.to_string(),
            votes: 0,
            swing: Swing::NEUTRAL,
        }
    }
}

/// One constituency. The candidate pair is fixed when the district is
/// seeded; only votes, swing and the declaration flags change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct District {
    pub name: String,
    pub code: Option<String>,
    candidates: [Candidate; 2],
    declared: [bool; 2],
    #[serde(rename = "totalVotes")]
    total_votes: u64,
}

impl District {
    pub fn new(name: &str, code: Option<&str>, candidates: [Candidate; 2]) -> District {
        let mut district = District {
            name: name.to_string(),
            code: code.map(|c| c.to_string()),
            candidates,
            declared: [false, false],
            total_votes: 0,
        };
        district.recount();
        district
    }

    pub fn candidates(&self) -> &[Candidate; 2] {
        &self.candidates
    }

    pub fn declared(&self) -> [bool; 2] {
        self.declared
    }

    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    pub fn votes(&self) -> [u64; 2] {
        [self.candidates[0].votes, self.candidates[1].votes]
    }

    /// Candidate slot (0 or 1) held by `party`, if it contests this district.
    pub fn slot_of(&self, party: &PartyCode) -> Option<usize> {
        self.candidates.iter().position(|c| &c.party == party)
    }

    pub fn set_result(&mut self, slot: usize, votes: u64, swing: Swing) {
        let candidate = &mut self.candidates[slot];
        candidate.votes = votes;
        candidate.swing = swing;
        self.recount();
    }

    pub fn set_declared(&mut self, declared: [bool; 2]) {
        self.declared = declared;
    }

    /// Zeroes votes, swing and declarations, keeping the candidate pair.
    pub fn clear(&mut self) {
        for candidate in self.candidates.iter_mut() {
            candidate.votes = 0;
            candidate.swing = Swing::NEUTRAL;
        }
        self.declared = [false, false];
        self.recount();
    }

    fn recount(&mut self) {
        self.total_votes = self
            .candidates
            .iter()
            .fold(0u64, |total, c| total.saturating_add(c.votes));
    }
}
