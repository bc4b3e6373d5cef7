//! The top-level `Tournament` type: owns every competitor, match, and
//! round, and is the only thing callers talk to directly.
//!
//! Results are reported and committed without holding the tournament-wide
//! lock across competitor-accumulator updates, rounds are paired by
//! incrementing the round number (folding in the bracket bit once Swiss
//! rounds are exhausted), and standings are produced by sorting every
//! active competitor by tiebreaker and assigning 1-indexed places.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::competitor::{Competitor, TieBreakInfo};
use crate::error::TournamentError;
use crate::ids::{CompetitorId, MatchId};
use crate::match_::{Match, MatchResult, Players};
use crate::pairing::pair_swiss_round;
use crate::round::Round;

/// How many competitors cut to single-elimination bracket play once the
/// Swiss rounds finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BracketSize {
    None,
    Top2,
    Top4,
    Top6,
    Top8,
}

impl BracketSize {
    pub fn cut_size(self) -> usize {
        match self {
            BracketSize::None => 0,
            BracketSize::Top2 => 2,
            BracketSize::Top4 => 4,
            BracketSize::Top6 => 6,
            BracketSize::Top8 => 8,
        }
    }
}

/// Configuration fixed at tournament creation.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TournamentOptions {
    pub swiss_rounds: u8,
    pub bracket: BracketSize,
}

/// One row of a standings table: a competitor's rank and the tiebreaker
/// tuple that produced it.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct StandingsEntry {
    pub place: u32,
    pub competitor: CompetitorId,
    pub tiebreak: TieBreakInfo,
}

pub struct Tournament {
    options: TournamentOptions,
    competitors: RwLock<HashMap<CompetitorId, Arc<Competitor>>>,
    active: RwLock<HashSet<CompetitorId>>,
    matches: RwLock<HashMap<MatchId, Arc<Match>>>,
    rounds: RwLock<Vec<Round>>,
    rng: std::sync::Mutex<StdRng>,
}

impl Tournament {
    pub fn new(options: TournamentOptions) -> Self {
        Tournament {
            options,
            competitors: RwLock::new(HashMap::new()),
            active: RwLock::new(HashSet::new()),
            matches: RwLock::new(HashMap::new()),
            rounds: RwLock::new(Vec::new()),
            rng: std::sync::Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn options(&self) -> TournamentOptions {
        self.options
    }

    pub fn add_competitor(&self, id: CompetitorId, last_name: impl Into<String>, first_name: impl Into<String>, username: impl Into<String>) -> Result<(), TournamentError> {
        let mut competitors = self.competitors.write().unwrap();
        if let Some(existing) = competitors.get(&id) {
            return Err(TournamentError::already_exists(existing.error_string_id()));
        }
        let competitor = Arc::new(Competitor::new(id, last_name, first_name, username));
        let error_id = competitor.error_string_id();
        competitors.insert(id, competitor);
        drop(competitors);
        self.active.write().unwrap().insert(id);
        tracing::debug!(competitor = %error_id, "registered competitor");
        Ok(())
    }

    pub fn drop_competitor(&self, id: CompetitorId) -> Result<(), TournamentError> {
        let competitor = self.get_competitor(id)?;
        competitor.set_dropped(true);
        self.active.write().unwrap().remove(&id);
        Ok(())
    }

    pub fn get_competitor(&self, id: CompetitorId) -> Result<Arc<Competitor>, TournamentError> {
        self.competitors
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| TournamentError::no_competitor(id))
    }

    pub fn get_match(&self, id: MatchId) -> Result<Arc<Match>, TournamentError> {
        self.matches.read().unwrap().get(&id).cloned().ok_or_else(|| TournamentError::no_match(id))
    }

    pub fn current_round(&self) -> Option<u8> {
        self.rounds.read().unwrap().last().map(|r| r.number())
    }

    /// Active (non-dropped) competitors, sorted by descending match points.
    /// This is a read-only snapshot; it doesn't hold any lock once it
    /// returns.
    pub fn active_players_by_points(&self) -> Vec<CompetitorId> {
        let competitors = self.competitors.read().unwrap();
        let mut ids: Vec<CompetitorId> = self.active.read().unwrap().iter().copied().collect();
        ids.sort_by_key(|id| std::cmp::Reverse(competitors.get(id).map(|c| c.match_points()).unwrap_or(0)));
        ids
    }

    /// Applies a confirmed result to both competitors' accumulators, in
    /// ascending `CompetitorId` order, matching the deterministic
    /// lock-acquisition discipline used throughout this crate.
    fn commit(&self, players: Players, result: MatchResult) {
        match players {
            Players::Bye(c) => {
                let competitor = self.competitors.read().unwrap().get(&c).cloned();
                if let Some(c) = competitor {
                    c.apply_bye();
                }
            }
            Players::Pairing(a, b) => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let competitors = self.competitors.read().unwrap();
                let lo_c = competitors.get(&lo).cloned();
                let hi_c = competitors.get(&hi).cloned();
                drop(competitors);
                let (lo_wins, hi_wins) = result.games;
                let draw = result.winner.is_none();
                if let Some(c) = lo_c {
                    c.apply_result(lo_wins, hi_wins, result.games_drawn, draw);
                }
                if let Some(c) = hi_c {
                    c.apply_result(hi_wins, lo_wins, result.games_drawn, draw);
                }
            }
        }
    }

    fn rollback(&self, players: Players, result: MatchResult) {
        match players {
            Players::Bye(c) => {
                let competitor = self.competitors.read().unwrap().get(&c).cloned();
                if let Some(c) = competitor {
                    c.revert_bye();
                }
            }
            Players::Pairing(a, b) => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let competitors = self.competitors.read().unwrap();
                let lo_c = competitors.get(&lo).cloned();
                let hi_c = competitors.get(&hi).cloned();
                drop(competitors);
                let (lo_wins, hi_wins) = result.games;
                let draw = result.winner.is_none();
                if let Some(c) = lo_c {
                    c.revert_result(lo_wins, hi_wins, result.games_drawn, draw);
                }
                if let Some(c) = hi_c {
                    c.revert_result(hi_wins, lo_wins, result.games_drawn, draw);
                }
            }
        }
    }

    /// Looks up the round owning `id` and applies `f` to it, if the round
    /// still exists.
    fn with_round_mut(&self, id: MatchId, f: impl FnOnce(&mut Round)) {
        let mut rounds = self.rounds.write().unwrap();
        if let Some(round) = rounds.iter_mut().find(|r| r.number() == id.round) {
            f(round);
        }
    }

    /// A competitor reports their account of a match's outcome. Once both
    /// sides agree, the result is committed to both competitors'
    /// accumulators.
    pub fn report_result(&self, match_id: MatchId, reporter: CompetitorId, result: MatchResult) -> Result<(), TournamentError> {
        let m = self.get_match(match_id)?;
        if let Some(confirmed) = m.report(reporter, result)? {
            tracing::info!(match_id = %match_id, reporter = %reporter, "match result confirmed");
            self.commit(m.players(), confirmed);
            self.with_round_mut(match_id, |round| round.commit_match_result(match_id));
        }
        Ok(())
    }

    /// A judge sets the result directly, overriding any prior reports or
    /// an already-committed result. Rolls back the previous commit (if
    /// any) before applying the new one.
    pub fn judge_set_result(&self, match_id: MatchId, result: MatchResult) -> Result<(), TournamentError> {
        let m = self.get_match(match_id)?;
        let previous = m.judge_set(result)?;
        if let Some(previous) = previous {
            self.rollback(m.players(), previous);
        }
        tracing::info!(match_id = %match_id, "match result set by judge");
        self.commit(m.players(), result);
        self.with_round_mut(match_id, |round| round.judge_set_result(match_id));
        Ok(())
    }

    /// Whether every match in `round` has a confirmed result.
    pub fn round_is_complete(&self, round: u8) -> Result<bool, TournamentError> {
        let rounds = self.rounds.read().unwrap();
        let round = rounds.iter().find(|r| r.number() == round).ok_or_else(|| TournamentError::no_round(round))?;
        Ok(round.is_complete())
    }

    /// Pairs and commits the next Swiss round, returning the round number
    /// just created.
    ///
    /// # Panics (debug builds)
    ///
    /// Asserts more than one competitor is left unpaired after a full
    /// pairing pass, which would indicate a bug in [`pair_swiss_round`]
    /// rather than a normal tournament state.
    pub fn pair_next_round(&self) -> Result<u8, TournamentError> {
        if let Some(current) = self.current_round() {
            if !self.round_is_complete(current)? {
                return Err(TournamentError::failed_precondition(format!("round {current} is not yet complete")));
            }
        }

        let swiss_rounds_played = self.rounds.read().unwrap().iter().filter(|r| !r.is_bracket()).count() as u8;
        if swiss_rounds_played >= self.options.swiss_rounds {
            return Err(TournamentError::failed_precondition("all swiss rounds have already been paired"));
        }
        let round_number = swiss_rounds_played + 1;

        // Shuffle before bucketing by points so same-bracket tie order
        // isn't predictable round after round.
        let mut active: Vec<CompetitorId> = self.active.read().unwrap().iter().copied().collect();
        {
            use rand::seq::SliceRandom;
            let mut rng = self.rng.lock().unwrap();
            active.shuffle(&mut *rng);
        }
        let competitors = self.competitors.read().unwrap();
        let match_points = |id: CompetitorId| competitors.get(&id).map(|c| c.match_points()).unwrap_or(0);
        let can_pair = |a: CompetitorId, b: CompetitorId| {
            competitors.get(&a).map(|c| !c.has_played(b)).unwrap_or(false)
        };
        let (mut pairs, unpaired) = pair_swiss_round(&active, match_points, can_pair);
        drop(competitors);

        debug_assert!(unpaired.len() <= 1, "more than one competitor left unpaired after a full pairing pass");

        if let Some(&bye) = unpaired.first() {
            pairs.push((bye, bye));
        }

        let mut round = Round::new(round_number);
        let mut matches = self.matches.write().unwrap();
        let competitors = self.competitors.read().unwrap();
        let mut number = 1u32;
        for (a, b) in pairs {
            let id = MatchId::new(round_number, number);
            number += 1;
            round.init(id);
            if a == b {
                let m = Match::new_bye(id, a);
                if let Some(c) = competitors.get(&a) {
                    c.record_pairing(id, None);
                }
                self.commit(m.players(), m.confirmed_result().expect("a bye is confirmed on creation"));
                matches.insert(id, Arc::new(m));
                round.commit_match_result(id);
            } else {
                let m = Match::new_pairing(id, a, b);
                if let Some(c) = competitors.get(&a) {
                    c.record_pairing(id, Some(b));
                }
                if let Some(c) = competitors.get(&b) {
                    c.record_pairing(id, Some(a));
                }
                matches.insert(id, Arc::new(m));
            }
        }
        drop(competitors);
        drop(matches);
        self.rounds.write().unwrap().push(round);
        tracing::info!(round = round_number, "paired swiss round");
        Ok(round_number)
    }

    /// Produces a standings table covering every active competitor, sorted
    /// by tiebreaker descending and ranked 1-indexed.
    pub fn generate_standings(&self) -> Vec<StandingsEntry> {
        let competitors = self.competitors.read().unwrap();

        let mwp_gwp = |id: CompetitorId| -> (crate::rational::Rational, crate::rational::Rational) {
            match competitors.get(&id) {
                Some(c) => (c.mwp(), c.gwp()),
                None => (crate::rational::Rational::ONE, crate::rational::Rational::ONE),
            }
        };

        let mut entries: Vec<(CompetitorId, TieBreakInfo)> = self
            .active
            .read()
            .unwrap()
            .iter()
            .filter_map(|id| {
                competitors.get(id).map(|c| (*id, c.compute_tiebreak(&mwp_gwp)))
            })
            .collect();

        entries.sort_by(|a, b| b.1.cmp(&a.1));

        entries
            .into_iter()
            .enumerate()
            .map(|(i, (competitor, tiebreak))| StandingsEntry {
                place: i as u32 + 1,
                competitor,
                tiebreak,
            })
            .collect()
    }
}
