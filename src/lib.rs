//! `tcg_tournament_core` runs the competitive core of a trading-card-game
//! tournament: competitor registration, Swiss pairing via exact maximum
//! matching, a two-party match result protocol with judge override, and
//! standings computed with exact rational tiebreakers.
//!
//! # Example
//! ```
//! use tcg_tournament_core::{BracketSize, CompetitorId, MatchId, MatchResult, Players, Tournament, TournamentOptions};
//!
//! let t = Tournament::new(TournamentOptions {
//!     swiss_rounds: 2,
//!     bracket: BracketSize::None,
//! });
//! for (id, name) in [(1, "Alex"), (2, "Bao"), (3, "Cy"), (4, "Dee")] {
//!     t.add_competitor(CompetitorId(id), name, name, name).unwrap();
//! }
//!
//! let round = t.pair_next_round().unwrap();
//! for id in [MatchId::new(round, 1), MatchId::new(round, 2)] {
//!     let m = t.get_match(id).unwrap();
//!     if let Players::Pairing(a, b) = m.players() {
//!         t.report_result(id, a, MatchResult::win(id, a, (2, 0), 0)).unwrap();
//!         t.report_result(id, b, MatchResult::win(id, a, (2, 0), 0)).unwrap();
//!     }
//! }
//!
//! let standings = t.generate_standings();
//! assert_eq!(standings[0].place, 1);
//! ```

#[warn(missing_docs)]
mod blossom;
#[warn(missing_docs)]
mod competitor;
#[warn(missing_docs)]
mod error;
#[warn(missing_docs)]
mod graph;
#[warn(missing_docs)]
mod ids;
#[warn(missing_docs)]
mod match_;
#[warn(missing_docs)]
mod pairing;
#[warn(missing_docs)]
mod rational;
#[warn(missing_docs)]
mod round;
#[warn(missing_docs)]
mod tournament;

#[doc(inline)]
pub use crate::competitor::{Competitor, TieBreakInfo};
#[doc(inline)]
pub use crate::error::TournamentError;
#[doc(inline)]
pub use crate::ids::{CompetitorId, MatchId};
#[doc(inline)]
pub use crate::match_::{Match, MatchResult, Players};
#[doc(inline)]
pub use crate::rational::Rational;
#[doc(inline)]
pub use crate::round::Round;
#[doc(inline)]
pub use crate::tournament::{BracketSize, StandingsEntry, Tournament, TournamentOptions};

/// Maximum matching on a general graph, exposed for callers who want to
/// seed or inspect pairings directly rather than go through
/// [`Tournament::pair_next_round`].
pub mod graph_api {
    pub use crate::blossom::blossom;
    pub use crate::graph::{seed_matching, Graph, Matching, NodeId};
}

pub type Result<T> = std::result::Result<T, TournamentError>;
