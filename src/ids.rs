//! Identity types: [`MatchId`] and [`CompetitorId`].
//!
//! Both are stable handles: equality and hashing are defined on the handle
//! itself, never on whatever data it currently resolves to.

use std::fmt;

/// The high bit of the packed round byte selects Swiss (0) vs. elimination
/// bracket (1) rounds.
const BRACKET_BIT: u8 = 1 << 7;
const ROUND_MASK: u8 = !BRACKET_BIT;

/// A (round, number) pair that uniquely identifies a match within a
/// tournament, packed into a `u32` such that the natural integer order
/// matches tournament chronology: round is the dominant field (so Swiss
/// rounds, all of which have the bracket bit clear, always sort before
/// elimination-bracket rounds), and match number ascends within a round.
///
/// Round, not match number, is the dominant field: this keeps natural
/// integer order matching tournament chronology, since every Swiss round's
/// matches sort before the next round's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct MatchId {
    pub round: u8,
    pub number: u32,
}

impl MatchId {
    /// `number` must fit in 24 bits; values above that are truncated.
    pub fn new(round: u8, number: u32) -> Self {
        MatchId {
            round,
            number: number & 0x00FF_FFFF,
        }
    }

    pub fn is_bracket(&self) -> bool {
        self.round & BRACKET_BIT != 0
    }

    pub fn is_swiss(&self) -> bool {
        !self.is_bracket()
    }

    /// Sets the bracket bit on a plain round number.
    pub fn bracket_round(round: u8) -> u8 {
        round | BRACKET_BIT
    }

    /// The round number with the bracket bit stripped, for display.
    pub fn round_number(&self) -> u8 {
        self.round & ROUND_MASK
    }

    /// Packs this id into a 32-bit integer with round as the dominant
    /// field (see type-level docs).
    pub fn as_u32(&self) -> u32 {
        ((self.round as u32) << 24) | (self.number & 0x00FF_FFFF)
    }

    pub fn from_u32(packed: u32) -> Self {
        MatchId {
            round: (packed >> 24) as u8,
            number: packed & 0x00FF_FFFF,
        }
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}M{}", self.round_number(), self.number)
    }
}

/// Opaque identifier for a competitor, assigned by the external identity
/// provider. The engine never interprets the bits; it only compares,
/// hashes, and orders them (for deterministic lock acquisition order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct CompetitorId(pub u64);

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CompetitorId {
    fn from(v: u64) -> Self {
        CompetitorId(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_dominates_ordering() {
        let r1m99 = MatchId::new(1, 99);
        let r2m1 = MatchId::new(2, 1);
        assert!(r1m99 < r2m1);
        assert!(r1m99.as_u32() < r2m1.as_u32());
    }

    #[test]
    fn swiss_sorts_before_bracket() {
        let swiss = MatchId::new(5, 1);
        let bracket = MatchId::new(MatchId::bracket_round(1), 1);
        assert!(swiss.is_swiss());
        assert!(bracket.is_bracket());
        assert!(swiss < bracket);
    }

    #[test]
    fn round_trip_through_u32() {
        let id = MatchId::new(MatchId::bracket_round(3), 12345);
        let packed = id.as_u32();
        assert_eq!(MatchId::from_u32(packed), id);
    }

    #[test]
    fn display_strips_bracket_bit() {
        let id = MatchId::new(MatchId::bracket_round(2), 4);
        assert_eq!(format!("{id}"), "R2M4");
    }
}
