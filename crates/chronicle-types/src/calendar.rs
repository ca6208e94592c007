//! Calendar policies: how (year, month, day) maps to an ordinal.
//!
//! A [`Calendar`] is a tagged variant, dispatched by matching — adding a
//! calendar means adding a variant and its conversion arm, not a trait
//! hierarchy. `Gregorian` and `NoLeap` are pure scale choices; `Regnal`
//! resolves era-relative dates (era name + in-era year) to absolute
//! Gregorian dates through a lookup table, so a regnal date is never a third
//! ordinal scale of its own.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date::{CalendarKind, DateError, GameDate};

/// Errors from calendar resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The era name is not in the table.
    #[error("unknown era: {0:?}")]
    UnknownEra(String),

    /// The resolved (year, month, day) is not a valid date.
    #[error(transparent)]
    Date(#[from] DateError),
}

/// Era name → Gregorian start date of that era's year 1.
///
/// In-era years count from 1; "Era X, year 3" starts two calendar years after
/// the era's start year. Day-of-month validity follows Gregorian rules.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EraTable {
    eras: BTreeMap<String, GameDate>,
}

impl EraTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an era starting at the given Gregorian date.
    pub fn insert(&mut self, name: impl Into<String>, start: GameDate) {
        self.eras.insert(name.into(), start);
    }

    /// Look up an era's start date.
    pub fn get(&self, name: &str) -> Option<&GameDate> {
        self.eras.get(name)
    }

    /// Era names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.eras.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }
}

/// Date ↔ ordinal conversion policy for one campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "eras")]
pub enum Calendar {
    /// Standard proleptic Gregorian.
    Gregorian,
    /// Every year exactly 365 days.
    NoLeap,
    /// Era-relative input resolved to absolute Gregorian dates.
    Regnal(EraTable),
}

impl Default for Calendar {
    fn default() -> Self {
        Calendar::NoLeap
    }
}

impl Calendar {
    /// The ordinal scale dates under this policy carry.
    pub fn kind(&self) -> CalendarKind {
        match self {
            Calendar::Gregorian | Calendar::Regnal(_) => CalendarKind::Gregorian,
            Calendar::NoLeap => CalendarKind::NoLeap,
        }
    }

    /// Construct a date on this policy's scale.
    pub fn date(&self, year: i32, month: u8, day: u8) -> Result<GameDate, DateError> {
        GameDate::new(year, month, day, self.kind())
    }

    /// Parse a date string on this policy's scale.
    pub fn parse(&self, s: &str) -> Result<GameDate, DateError> {
        GameDate::parse(s, self.kind())
    }

    /// Reconstruct a date from an ordinal on this policy's scale.
    pub fn from_ordinal(&self, ordinal: i64) -> GameDate {
        GameDate::from_ordinal(ordinal, self.kind())
    }

    /// `date` plus `days`, expressed on this policy's scale.
    pub fn add_days(&self, date: GameDate, days: i64) -> GameDate {
        self.from_ordinal(date.ordinal() + days)
    }

    /// Signed day count from `b` to `a`.
    pub fn diff_days(&self, a: GameDate, b: GameDate) -> i64 {
        a.ordinal() - b.ordinal()
    }

    /// Resolve an era-relative date to an absolute date.
    ///
    /// Only meaningful for `Regnal`; the other policies have no era table and
    /// always fail with [`CalendarError::UnknownEra`].
    pub fn resolve_regnal(
        &self,
        era: &str,
        year_in_era: i32,
        month: u8,
        day: u8,
    ) -> Result<GameDate, CalendarError> {
        let Calendar::Regnal(table) = self else {
            return Err(CalendarError::UnknownEra(era.to_string()));
        };
        let start = table
            .get(era)
            .ok_or_else(|| CalendarError::UnknownEra(era.to_string()))?;
        // Year arithmetic in astronomical years so eras straddling 1 BCE/1 CE
        // stay off-by-one-free.
        let astro = if start.year() < 0 {
            i64::from(start.year()) + 1
        } else {
            i64::from(start.year())
        } + i64::from(year_in_era) - 1;
        let year = if astro < 1 { (astro - 1) as i32 } else { astro as i32 };
        Ok(GameDate::new(year, month, day, CalendarKind::Gregorian)?)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Calendar::Gregorian => write!(f, "gregorian"),
            Calendar::NoLeap => write!(f, "no_leap"),
            Calendar::Regnal(_) => write!(f, "regnal"),
        }
    }
}
