//! Matches: pairings between two competitors (or a bye), their reported
//! results, and the two-party confirmation protocol.
//!
//! A pairing always normalizes its two competitors so the lower-ordered id
//! is stored first, giving the engine a deterministic lock-acquisition
//! order. A reported result only commits once both sides agree; a judge's
//! ruling bypasses that and commits unconditionally.

use std::sync::Mutex;

use crate::error::TournamentError;
use crate::ids::{CompetitorId, MatchId};

/// The two seats in a match: either a single competitor with a bye, or two
/// competitors with `a < b` (the ordering the tournament uses to acquire
/// per-competitor locks without risking deadlock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Players {
    Bye(CompetitorId),
    Pairing(CompetitorId, CompetitorId),
}

impl Players {
    pub fn pairing(a: CompetitorId, b: CompetitorId) -> Self {
        if a <= b {
            Players::Pairing(a, b)
        } else {
            Players::Pairing(b, a)
        }
    }

    pub fn contains(&self, competitor: CompetitorId) -> bool {
        match self {
            Players::Bye(c) => *c == competitor,
            Players::Pairing(a, b) => *a == competitor || *b == competitor,
        }
    }

    /// The other competitor in a pairing, or `None` for a bye or a
    /// competitor not in this match.
    pub fn opponent(&self, competitor: CompetitorId) -> Option<CompetitorId> {
        match self {
            Players::Bye(_) => None,
            Players::Pairing(a, b) if *a == competitor => Some(*b),
            Players::Pairing(a, b) if *b == competitor => Some(*a),
            Players::Pairing(_, _) => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Players::Bye(_))
    }
}

/// A reported or confirmed outcome, tagged with the [`MatchId`] it claims to
/// resolve so a report can be checked against the match it was submitted to.
///
/// `games` is `(games won by the first competitor in [`Players::Pairing`]
/// order, games won by the second)`; `games_drawn` counts games that ended
/// even, mirroring match points at the game level (a won game is worth 3
/// game points, a drawn game 1). For a bye, `games` is `(2, 0)` and `winner`
/// is the byed competitor: regulation treats a bye as a real 2-0 win, not a
/// match-points-only credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchResult {
    pub id: MatchId,
    pub games: (u32, u32),
    pub games_drawn: u32,
    /// `None` means the match was a draw.
    pub winner: Option<CompetitorId>,
}

impl MatchResult {
    pub fn bye(id: MatchId, competitor: CompetitorId) -> Self {
        MatchResult {
            id,
            games: (2, 0),
            games_drawn: 0,
            winner: Some(competitor),
        }
    }

    pub fn draw(id: MatchId, games: (u32, u32), games_drawn: u32) -> Self {
        MatchResult { id, games, games_drawn, winner: None }
    }

    pub fn win(id: MatchId, winner: CompetitorId, games: (u32, u32), games_drawn: u32) -> Self {
        MatchResult {
            id,
            games,
            games_drawn,
            winner: Some(winner),
        }
    }
}

#[derive(Debug, Default)]
struct MatchState {
    reports: std::collections::HashMap<CompetitorId, MatchResult>,
    confirmed: Option<MatchResult>,
    judge_overridden: bool,
}

/// A single match within a round: either a bye or a pairing between two
/// competitors, plus whatever has been reported/confirmed about its
/// outcome so far.
#[derive(Debug)]
pub struct Match {
    id: MatchId,
    players: Players,
    state: Mutex<MatchState>,
}

impl Match {
    pub fn new_bye(id: MatchId, competitor: CompetitorId) -> Self {
        let mut state = MatchState::default();
        state.confirmed = Some(MatchResult::bye(id, competitor));
        Match {
            id,
            players: Players::Bye(competitor),
            state: Mutex::new(state),
        }
    }

    pub fn new_pairing(id: MatchId, a: CompetitorId, b: CompetitorId) -> Self {
        Match {
            id,
            players: Players::pairing(a, b),
            state: Mutex::new(MatchState::default()),
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn players(&self) -> Players {
        self.players
    }

    pub fn has_competitor(&self, competitor: CompetitorId) -> bool {
        self.players.contains(competitor)
    }

    /// The agreed result, or an error naming which side hasn't reported yet
    /// (or that the two sides disagree and a judge needs to rule).
    pub fn confirmed_result(&self) -> Result<MatchResult, TournamentError> {
        let state = self.state.lock().unwrap();
        if let Some(result) = state.confirmed {
            return Ok(result);
        }
        let (a, b) = match self.players {
            Players::Pairing(a, b) => (a, b),
            Players::Bye(_) => unreachable!("a bye is confirmed on creation"),
        };
        match (state.reports.get(&a), state.reports.get(&b)) {
            (None, _) => Err(TournamentError::failed_precondition(format!("{a} has not reported for {}", self.id))),
            (_, None) => Err(TournamentError::failed_precondition(format!("{b} has not reported for {}", self.id))),
            (Some(ra), Some(rb)) if ra != rb => Err(TournamentError::failed_precondition(format!(
                "{a} and {b} reported different results for {}",
                self.id
            ))),
            (Some(ra), Some(_)) => Ok(*ra),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.confirmed_result().is_ok()
    }

    fn validate_result(&self, result: &MatchResult) -> Result<(), TournamentError> {
        if self.players.is_bye() {
            return Err(TournamentError::invalid_argument(format!("Match {} is a bye and cannot be reported", self.id)));
        }
        if result.id != self.id {
            return Err(TournamentError::invalid_argument(format!(
                "reported {} does not equal {}",
                result.id, self.id
            )));
        }
        match result.winner {
            None => {
                if result.games.0 != result.games.1 {
                    return Err(TournamentError::invalid_argument(format!(
                        "reported draw for {} does not have equal game wins between the two competitors",
                        self.id
                    )));
                }
            }
            Some(winner) => {
                if !self.players.contains(winner) {
                    return Err(TournamentError::invalid_argument(format!(
                        "winner {winner} is not a competitor in match {}",
                        self.id
                    )));
                }
                let (winner_games, loser_games) = match self.players {
                    Players::Pairing(a, _) if a == winner => (result.games.0, result.games.1),
                    Players::Pairing(_, b) if b == winner => (result.games.1, result.games.0),
                    _ => unreachable!("winner membership already checked above"),
                };
                if winner_games <= loser_games {
                    return Err(TournamentError::invalid_argument(format!(
                        "{} report has a winner but reported score ({winner_games}-{loser_games}) is invalid for a won match",
                        self.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Records `reporter`'s account of the match result. Returns `Ok(Some(result))`
    /// once both sides have reported and agree (the match is now confirmed),
    /// `Ok(None)` if still waiting on the other side or the two reports
    /// disagree (a judge must resolve it).
    pub fn report(&self, reporter: CompetitorId, result: MatchResult) -> Result<Option<MatchResult>, TournamentError> {
        self.validate_result(&result)?;
        if !self.players.contains(reporter) {
            return Err(TournamentError::invalid_argument(format!(
                "{reporter} is not a competitor in match {}",
                self.id
            )));
        }
        let mut state = self.state.lock().unwrap();
        if state.judge_overridden {
            return Err(TournamentError::failed_precondition(format!(
                "match {} was set by a judge and no longer accepts player reports",
                self.id
            )));
        }
        state.reports.insert(reporter, result);

        let opponent = self.players.opponent(reporter);
        let agreed = match opponent {
            None => true, // shouldn't happen for a non-bye, validated above
            Some(opp) => state.reports.get(&opp) == Some(&result),
        };
        if agreed {
            state.confirmed = Some(result);
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// A judge sets (or overrides) the confirmed result directly, bypassing
    /// the two-party agreement requirement. Returns whatever was previously
    /// confirmed, if anything, so the caller can roll back its effect on
    /// competitor standings before applying the new one.
    pub fn judge_set(&self, result: MatchResult) -> Result<Option<MatchResult>, TournamentError> {
        self.validate_result(&result)?;
        let mut state = self.state.lock().unwrap();
        let previous = state.confirmed;
        state.confirmed = Some(result);
        state.judge_overridden = true;
        Ok(previous)
    }
}
