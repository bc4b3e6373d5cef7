//! Competitors and their accumulated results.
//!
//! Each competitor owns a lock-guarded bundle of running totals (game
//! points, games played, match points) plus the matches it has been
//! assigned (and, where applicable, the opponent each one was against),
//! and `mwp()`/`gwp()` apply the regulation 1/3 floor.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::ids::{CompetitorId, MatchId};
use crate::rational::Rational;

/// A tiebreaker tuple, ordered lexicographically: match points first, then
/// opponents' match-win percentage, then the competitor's own game-win
/// percentage, then opponents' game-win percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct TieBreakInfo {
    pub match_points: u32,
    pub opponents_match_win_pct: Rational,
    pub game_win_pct: Rational,
    pub opponents_game_win_pct: Rational,
}

/// One competitor's running totals across a tournament.
///
/// `Competitor` is never shared behind an `Arc` directly by callers; it
/// lives inside [`crate::tournament::Tournament`]'s competitor map, each
/// entry wrapped in its own lock so match commits only ever need to hold
/// the locks of the two competitors actually involved.
#[derive(Debug)]
pub struct Competitor {
    id: CompetitorId,
    last_name: String,
    first_name: String,
    username: String,
    state: RwLock<CompetitorState>,
}

#[derive(Debug, Default)]
struct CompetitorState {
    match_points: u32,
    game_points: u32,
    games_played: u32,
    /// Every match this competitor has been assigned, mapped to the
    /// opponent it was against (`None` for a bye).
    pairings: HashMap<MatchId, Option<CompetitorId>>,
    dropped: bool,
}

impl Competitor {
    pub fn new(id: CompetitorId, last_name: impl Into<String>, first_name: impl Into<String>, username: impl Into<String>) -> Self {
        Competitor {
            id,
            last_name: last_name.into(),
            first_name: first_name.into(),
            username: username.into(),
            state: RwLock::new(CompetitorState::default()),
        }
    }

    pub fn id(&self) -> CompetitorId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `"{last}, {first}"`, or the username if either name part is blank
    /// (the case an online-only competitor's username exists for).
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() || self.first_name.is_empty() {
            return self.username.clone();
        }
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// `"Competitor ({display_name})"`, the canonical identifier used in
    /// error messages.
    pub fn error_string_id(&self) -> String {
        format!("Competitor ({})", self.display_name())
    }

    pub fn is_dropped(&self) -> bool {
        self.state.read().unwrap().dropped
    }

    pub fn set_dropped(&self, dropped: bool) {
        self.state.write().unwrap().dropped = dropped;
    }

    pub fn match_points(&self) -> u32 {
        self.state.read().unwrap().match_points
    }

    pub fn games_played(&self) -> u32 {
        self.state.read().unwrap().games_played
    }

    pub fn game_points(&self) -> u32 {
        self.state.read().unwrap().game_points
    }

    /// How many matches this competitor has been assigned (byes included).
    pub fn matches_played(&self) -> u32 {
        self.state.read().unwrap().pairings.len() as u32
    }

    /// Match-win percentage, floored at 1/3 per tournament regulation. A
    /// competitor with no matches yet hasn't had a chance to fall short of
    /// the floor, so this returns 1 rather than the floor itself.
    pub fn mwp(&self) -> Rational {
        let matches_played = self.matches_played();
        if matches_played == 0 {
            return Rational::ONE;
        }
        Rational::new(self.match_points() as u64, (matches_played * 3) as u64).clamp_floor(Rational::ONE_THIRD)
    }

    /// Game-win percentage, floored at 1/3 per tournament regulation.
    /// `game_points` accrues 3 per game won and 1 per game drawn, mirroring
    /// match points, so the percentage itself is `game_points / (games_played * 3)`.
    pub fn gwp(&self) -> Rational {
        let games_played = self.games_played();
        if games_played == 0 {
            return Rational::ONE;
        }
        Rational::new(self.game_points() as u64, (games_played * 3) as u64).clamp_floor(Rational::ONE_THIRD)
    }

    pub fn has_played(&self, opponent: CompetitorId) -> bool {
        self.state.read().unwrap().pairings.values().any(|&o| o == Some(opponent))
    }

    pub fn has_match(&self, match_id: MatchId) -> bool {
        self.state.read().unwrap().pairings.contains_key(&match_id)
    }

    pub fn record_pairing(&self, match_id: MatchId, opponent: Option<CompetitorId>) {
        self.state.write().unwrap().pairings.insert(match_id, opponent);
    }

    /// Applies the outcome of a confirmed match result to this competitor's
    /// running totals. `wins`/`losses`/`games_drawn` are games won, lost,
    /// and drawn by this competitor within the match; `draw` indicates the
    /// match itself ended in a draw (each side earns one match point).
    pub fn apply_result(&self, wins: u32, losses: u32, games_drawn: u32, draw: bool) {
        let mut state = self.state.write().unwrap();
        state.game_points += wins * 3 + games_drawn;
        state.games_played += wins + losses + games_drawn;
        state.match_points += if draw {
            1
        } else if wins > losses {
            3
        } else {
            0
        };
    }

    /// Reverses a previously applied result, used when a judge overturns an
    /// already-committed match.
    pub fn revert_result(&self, wins: u32, losses: u32, games_drawn: u32, draw: bool) {
        let mut state = self.state.write().unwrap();
        state.game_points -= wins * 3 + games_drawn;
        state.games_played -= wins + losses + games_drawn;
        state.match_points -= if draw {
            1
        } else if wins > losses {
            3
        } else {
            0
        };
    }

    /// A bye is a real 2-0 win per regulation, so it's just a win over a
    /// phantom opponent.
    pub fn apply_bye(&self) {
        self.apply_result(2, 0, 0, false);
    }

    pub fn revert_bye(&self) {
        self.revert_result(2, 0, 0, false);
    }

    /// Opponents this competitor has faced in Swiss play. Elimination
    /// bracket opponents are excluded: tiebreakers are a Swiss-standings
    /// concept and bracket results don't feed into them.
    pub fn opponents(&self) -> Vec<CompetitorId> {
        self.state
            .read()
            .unwrap()
            .pairings
            .iter()
            .filter(|(id, _)| id.is_swiss())
            .filter_map(|(_, opponent)| *opponent)
            .collect()
    }

    /// Computes this competitor's tiebreaker tuple. `opponent_mwp_gwp` looks
    /// up an opponent's `(mwp, gwp)` by id.
    ///
    /// An opponentless competitor (round one, or a bye-only record)
    /// defaults all three percentages — opponents' mwp, this competitor's
    /// own gwp, and opponents' gwp — to 1, rather than letting `gwp()`'s
    /// own zero-games floor leak through.
    pub fn compute_tiebreak(&self, opponent_mwp_gwp: impl Fn(CompetitorId) -> (Rational, Rational)) -> TieBreakInfo {
        let opponents = self.opponents();
        let (opp_mwp, opp_gwp, game_win_pct) = if opponents.is_empty() {
            (Rational::ONE, Rational::ONE, Rational::ONE)
        } else {
            let mut mwp_sum = Rational::ZERO;
            let mut gwp_sum = Rational::ZERO;
            for opponent in &opponents {
                let (mwp, gwp) = opponent_mwp_gwp(*opponent);
                mwp_sum = mwp_sum + mwp;
                gwp_sum = gwp_sum + gwp;
            }
            let count = Rational::new(opponents.len() as u64, 1);
            (
                mwp_sum.checked_div(count).unwrap(),
                gwp_sum.checked_div(count).unwrap(),
                self.gwp(),
            )
        };
        TieBreakInfo {
            match_points: self.match_points(),
            opponents_match_win_pct: opp_mwp,
            game_win_pct,
            opponents_game_win_pct: opp_gwp,
        }
    }
}
