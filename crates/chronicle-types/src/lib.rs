//! Shared date, calendar, and record types for Chronicle.
//!
//! This crate is the relational foundation: typed IDs, game dates and
//! calendar policies, filter channels, snapshots, and rulers. It has **no
//! internal chronicle dependencies** — a pure leaf crate the index and
//! engine crates build on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! Campaign (CampaignId) ← one archived playthrough
//!     └── configured by CampaignConfig (speed, filter, fallback, calendar)
//!     └── contains Snapshot per (FilterChannel, GameDate)
//!     └── contains Ruler with RankPeriods
//!
//! Snapshot (SnapshotId) ← one dated map image on one channel
//!     └── dated by GameDate (ordinal-ordered)
//!     └── positioned by AlignOffset (optional, attached after alignment)
//!
//! Ruler (RulerId) ← one reign, a half-open date interval
//!     └── subdivided into contiguous RankPeriods
//! ```
//!
//! # Key Types
//!
//! | Type               | Purpose                                     |
//! |--------------------|---------------------------------------------|
//! | [`GameDate`]       | (year, month, day) + calendar tag           |
//! | [`CalendarKind`]   | Which ordinal scale a date lives on         |
//! | [`Calendar`]       | Conversion policy (Gregorian/NoLeap/Regnal) |
//! | [`FilterChannel`]  | Independent map view (political, …)         |
//! | [`Snapshot`]       | One dated image for one channel             |
//! | [`Ruler`]          | Reign interval + rank sub-periods           |
//! | [`RankPeriod`]     | Half-open rank interval inside a reign      |
//! | [`CampaignConfig`] | Playback and fallback configuration         |
//! | [`FallbackPolicy`] | What to show when no exact snapshot exists  |
//!
//! All cross-record date comparisons go through the integer ordinal — never
//! field-wise or string comparison — so ordering stays total regardless of
//! which calendar produced a date.

pub mod calendar;
pub mod channel;
pub mod config;
pub mod date;
pub mod ids;
pub mod ruler;
pub mod snapshot;

// Re-export primary types at crate root for convenience.
pub use calendar::{Calendar, CalendarError, EraTable};
pub use channel::FilterChannel;
pub use config::{CampaignConfig, FallbackPolicy};
pub use date::{CalendarKind, DateError, GameDate};
pub use ids::{CampaignId, RulerId, SnapshotId};
pub use ruler::{Rank, RankPeriod, Ruler};
pub use snapshot::{AlignOffset, Snapshot};

/// Current time as Unix milliseconds. Used for created/modified stamps.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
