//! Rounds: a round number plus the matches paired into it, tracked through
//! an outstanding/reported lifecycle so the round knows when it's complete
//! without re-scanning every match's state.

use std::collections::HashSet;

use crate::ids::MatchId;

#[derive(Debug, Clone)]
pub struct Round {
    /// Round number with the bracket bit already folded in, per
    /// [`crate::ids::MatchId`]'s packing.
    number: u8,
    outstanding: HashSet<MatchId>,
    reported: HashSet<MatchId>,
}

impl Round {
    pub fn new(number: u8) -> Self {
        Round {
            number,
            outstanding: HashSet::new(),
            reported: HashSet::new(),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn is_bracket(&self) -> bool {
        MatchId::new(self.number, 0).is_bracket()
    }

    /// Registers a newly created match as awaiting a result.
    pub fn init(&mut self, id: MatchId) {
        debug_assert_eq!(id.round, self.number, "match belongs to a different round");
        debug_assert!(!self.reported.contains(&id), "match already reported");
        self.outstanding.insert(id);
    }

    /// Moves a match from outstanding to reported once both sides agree on
    /// a result.
    pub fn commit_match_result(&mut self, id: MatchId) {
        debug_assert!(
            self.outstanding.contains(&id),
            "match {id} was not outstanding in round {}",
            self.number
        );
        self.outstanding.remove(&id);
        self.reported.insert(id);
    }

    /// A judge's ruling moves a match to reported regardless of whether it
    /// was previously outstanding or already reported.
    pub fn judge_set_result(&mut self, id: MatchId) {
        self.outstanding.remove(&id);
        self.reported.insert(id);
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn match_ids(&self) -> Vec<MatchId> {
        self.outstanding.iter().chain(self.reported.iter()).copied().collect()
    }

    pub fn outstanding(&self) -> &HashSet<MatchId> {
        &self.outstanding
    }

    pub fn reported(&self) -> &HashSet<MatchId> {
        &self.reported
    }
}
