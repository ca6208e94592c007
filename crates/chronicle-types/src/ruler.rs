//! Rulers, reigns, and rank periods.
//!
//! A reign is a half-open interval `[reign_start, reign_end)`. Rank periods
//! subdivide a reign: sorted, non-overlapping, contiguous, contained in the
//! reign. Those invariants belong to the ruler timeline — this module only
//! defines the records and the pure lookups on them.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::date::GameDate;
use crate::ids::RulerId;

/// Title tier a ruler held during a rank period.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Rank {
    Hegemony,
    Empire,
    Kingdom,
    Duchy,
    County,
    #[strum(serialize = "adventurer", serialize = "adventure")]
    Adventurer,
    /// Landless or unknown tier.
    #[default]
    None,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Hegemony => "hegemony",
            Rank::Empire => "empire",
            Rank::Kingdom => "kingdom",
            Rank::Duchy => "duchy",
            Rank::County => "county",
            Rank::Adventurer => "adventurer",
            Rank::None => "none",
        };
        write!(f, "{s}")
    }
}

/// Half-open interval `[start, end)` during which a ruler held one rank.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankPeriod {
    pub rank: Rank,
    /// Inclusive start.
    pub start: GameDate,
    /// Exclusive end.
    pub end: GameDate,
}

impl RankPeriod {
    pub fn new(rank: Rank, start: GameDate, end: GameDate) -> Self {
        Self { rank, start, end }
    }

    /// Whether the date falls inside `[start, end)`.
    pub fn contains(&self, date: GameDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// One ruler: a reign interval plus its rank subdivision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    pub id: RulerId,
    /// Full given name, always present.
    pub full_name: String,
    /// Byname like "the Conqueror"; wins display precedence when set.
    pub epithet: Option<String>,
    /// Name as crowned (may differ from the given name).
    pub regnal_name: Option<String>,
    pub born: Option<GameDate>,
    pub died: Option<GameDate>,
    /// Inclusive reign start.
    pub reign_start: GameDate,
    /// Exclusive reign end.
    pub reign_end: GameDate,
    /// Start of the player-controlled part of the reign, if any. Also the
    /// timeline's primary sort key (unset sorts before any concrete date).
    pub player_start: Option<GameDate>,
    /// Sorted, contiguous subdivision of the reign. Validated by the timeline.
    pub rank_periods: Vec<RankPeriod>,
}

impl Ruler {
    pub fn new(full_name: impl Into<String>, reign_start: GameDate, reign_end: GameDate) -> Self {
        Self {
            id: RulerId::new(),
            full_name: full_name.into(),
            epithet: None,
            regnal_name: None,
            born: None,
            died: None,
            reign_start,
            reign_end,
            player_start: None,
            rank_periods: Vec::new(),
        }
    }

    pub fn with_epithet(mut self, epithet: impl Into<String>) -> Self {
        self.epithet = Some(epithet.into());
        self
    }

    pub fn with_regnal_name(mut self, name: impl Into<String>) -> Self {
        self.regnal_name = Some(name.into());
        self
    }

    pub fn with_player_start(mut self, date: GameDate) -> Self {
        self.player_start = Some(date);
        self
    }

    pub fn with_rank_periods(mut self, periods: Vec<RankPeriod>) -> Self {
        self.rank_periods = periods;
        self
    }

    /// Display name: epithet, else regnal name, else full name.
    pub fn display_name(&self) -> &str {
        self.epithet
            .as_deref()
            .or(self.regnal_name.as_deref())
            .unwrap_or(&self.full_name)
    }

    /// Whether the date falls inside `[reign_start, reign_end)`.
    pub fn reign_contains(&self, date: GameDate) -> bool {
        self.reign_start <= date && date < self.reign_end
    }

    /// Rank held at the date, or `None` when the date is uncovered — which
    /// callers must keep distinct from "no ruler at all".
    ///
    /// Periods are sorted, so a boundary date resolves to the *later* period
    /// (start inclusive, end exclusive).
    pub fn rank_at(&self, date: GameDate) -> Option<Rank> {
        let idx = self.rank_periods.partition_point(|p| p.start <= date);
        let period = self.rank_periods.get(idx.checked_sub(1)?)?;
        period.contains(date).then_some(period.rank)
    }
}
