//! Error types for timeline operations.
//!
//! Structural-invariant violations are rejected at the API boundary before
//! any mutation — the indexes are never left partially updated. "No snapshot
//! here" and "date uncovered by a rank period" are *not* errors; they come
//! back as `None` from the query methods.

use thiserror::Error;

use chronicle_types::{FilterChannel, GameDate, RulerId};

/// Errors that can occur while mutating the indexes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// A snapshot already exists at this (channel, date) slot.
    #[error("snapshot already exists for {channel} at {date}")]
    DuplicateDate {
        channel: FilterChannel,
        date: GameDate,
    },

    /// An interval with `start >= end`.
    #[error("empty or inverted interval [{start}, {end})")]
    InvalidInterval { start: GameDate, end: GameDate },

    /// The incoming reign overlaps an existing one.
    #[error("reign of {incoming:?} overlaps reign of {existing:?}")]
    ReignOverlap { incoming: RulerId, existing: RulerId },

    /// Two rank periods of one ruler overlap.
    #[error("rank periods {index} and {} of {ruler:?} overlap", index + 1)]
    RankOverlap { ruler: RulerId, index: usize },

    /// A ruler's rank periods leave a gap inside their span.
    #[error("gap between rank periods {index} and {} of {ruler:?}", index + 1)]
    RankGap { ruler: RulerId, index: usize },

    /// A rank period reaches outside its ruler's reign.
    #[error("rank periods of {ruler:?} fall outside the reign")]
    RankOutsideReign { ruler: RulerId },

    /// No ruler with this ID in the timeline.
    #[error("no ruler {0:?} in timeline")]
    UnknownRuler(RulerId),
}
