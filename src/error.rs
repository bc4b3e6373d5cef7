//! Error taxonomy for the tournament engine.
//!
//! Every fallible operation in this crate returns [`TournamentError`]. The
//! variants map directly onto the kinds a caller needs to distinguish:
//! "this thing doesn't exist" vs. "you asked for something malformed" vs.
//! "the system isn't in a state where this is allowed" vs. "that already
//! exists" vs. "this is a bug in us, not you".

use std::fmt;

use crate::ids::{CompetitorId, MatchId};

/// The structured error type returned by all fallible operations on
/// [`crate::tournament::Tournament`] and the entities it owns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TournamentError {
    /// The requested competitor, match, or round does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A malformed result, wrong match id, non-participant reporter, or an
    /// operation attempted on a bye.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reports disagree, the round isn't complete, or the tournament hasn't
    /// started.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// A competitor with this id is already registered.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// An invariant was violated. This represents a bug in the engine, not
    /// caller misuse.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TournamentError {
    pub fn not_found(msg: impl fmt::Display) -> Self {
        Self::NotFound(msg.to_string())
    }

    pub fn invalid_argument(msg: impl fmt::Display) -> Self {
        Self::InvalidArgument(msg.to_string())
    }

    pub fn failed_precondition(msg: impl fmt::Display) -> Self {
        Self::FailedPrecondition(msg.to_string())
    }

    pub fn already_exists(msg: impl fmt::Display) -> Self {
        Self::AlreadyExists(msg.to_string())
    }

    /// Builds an [`TournamentError::Internal`] and, in debug builds, panics
    /// immediately: invariant violations are bugs, and bugs should crash
    /// loudly in test builds rather than quietly surface as an error value.
    #[track_caller]
    pub fn internal(msg: impl fmt::Display) -> Self {
        let msg = msg.to_string();
        debug_assert!(false, "internal invariant violation: {msg}");
        Self::Internal(msg)
    }

    pub fn no_competitor(id: CompetitorId) -> Self {
        Self::not_found(format!("Competitor ({id})"))
    }

    pub fn no_match(id: MatchId) -> Self {
        Self::not_found(format!("Match ({id})"))
    }

    pub fn no_round(round: u8) -> Self {
        Self::not_found(format!("Round {round}"))
    }
}
