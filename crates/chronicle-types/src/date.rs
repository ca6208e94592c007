//! Game dates with arbitrary integer years and pluggable ordinal scales.
//!
//! A [`GameDate`] is a (year, month, day) triple tagged with the
//! [`CalendarKind`] whose ordinal scale it lives on. Years are historical:
//! year 0 does not exist, `-1` means 1 BCE (the astronomical shift happens
//! internally). Both scales anchor day 0 at 1970-01-01 so ordinals stay
//! comparable across kinds.
//!
//! - `Gregorian`: proleptic Gregorian via Hinnant's `days_from_civil` /
//!   `civil_from_days`, valid for the full i32 year range.
//! - `NoLeap`: every year is exactly 365 days, February is always 28 — the
//!   calendar most game worlds run on.
//!
//! Equality, ordering, and hashing go through the ordinal **only**. Two dates
//! are the same instant iff they land on the same day number; fields are
//! never compared directly.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::EnumString;
use thiserror::Error;

/// Month lengths in a common year. February's leap day is handled separately.
const MONTH_LENGTHS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Cumulative days before each month in a 365-day year (index 0 = before Jan).
const NO_LEAP_CUMULATIVE: [i64; 13] = [
    0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365,
];

/// Days from 0000-03-01 to 1970-01-01 in the proleptic Gregorian calendar.
const UNIX_EPOCH_SHIFT: i64 = 719_468;

/// Errors from date construction and parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Year 0 does not exist in historical year numbering.
    #[error("year 0 does not exist (use -1 for 1 BCE)")]
    YearZero,

    /// Month outside 1..=12.
    #[error("month must be 1..=12, got {0}")]
    InvalidMonth(u8),

    /// Day outside the valid range for its month (and calendar).
    #[error("day {day} out of range for {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },

    /// String did not look like a date.
    #[error("unrecognized date string: {0:?}")]
    Unparseable(String),
}

/// Which ordinal scale a date lives on.
///
/// This is the calendar *tag* a date carries; the full conversion policy
/// (including regnal era tables) is [`crate::Calendar`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum CalendarKind {
    /// Proleptic Gregorian with the standard leap rule.
    #[strum(serialize = "gregorian", serialize = "real")]
    Gregorian,
    /// Fixed 365-day years — the default for game-world timelines.
    #[default]
    #[strum(serialize = "no_leap", serialize = "noleap")]
    NoLeap,
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarKind::Gregorian => write!(f, "gregorian"),
            CalendarKind::NoLeap => write!(f, "no_leap"),
        }
    }
}

/// A validated game date. Immutable once constructed.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawDate", into = "RawDate")]
pub struct GameDate {
    year: i32,
    month: u8,
    day: u8,
    calendar: CalendarKind,
}

/// Unvalidated wire form for serde.
#[derive(Serialize, Deserialize)]
struct RawDate {
    year: i32,
    month: u8,
    day: u8,
    #[serde(default)]
    calendar: CalendarKind,
}

impl TryFrom<RawDate> for GameDate {
    type Error = DateError;

    fn try_from(raw: RawDate) -> Result<Self, DateError> {
        GameDate::new(raw.year, raw.month, raw.day, raw.calendar)
    }
}

impl From<GameDate> for RawDate {
    fn from(d: GameDate) -> Self {
        RawDate {
            year: d.year,
            month: d.month,
            day: d.day,
            calendar: d.calendar,
        }
    }
}

/// Historical year → astronomical year (1 BCE = -1 → 0).
fn astronomical(year: i32) -> i64 {
    if year < 0 { year as i64 + 1 } else { year as i64 }
}

/// Astronomical year → historical year (0 → -1).
fn historical(year: i64) -> i32 {
    if year < 1 { (year - 1) as i32 } else { year as i32 }
}

/// Leap-year test on a historical Gregorian year.
pub fn is_gregorian_leap(year: i32) -> bool {
    let y = astronomical(year);
    y % 4 == 0 && (y % 100 != 0 || y % 400 == 0)
}

/// Hinnant: civil (astronomical y, m, d) → days since 1970-01-01.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = y - i64::from(m <= 2);
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - UNIX_EPOCH_SHIFT
}

/// Hinnant: days since 1970-01-01 → civil (astronomical y, m, d).
fn civil_from_days(z: i64) -> (i64, i64, i64) {
    let z = z + UNIX_EPOCH_SHIFT;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (y + i64::from(m <= 2), m, d)
}

fn parse_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?\d{1,5})(?:[.\-/](\d{1,2})(?:[.\-/](\d{1,2}))?)?\s*$")
            .unwrap()
    })
}

fn compact_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([+-]?\d{1,5})(\d{2})(\d{2})$").unwrap())
}

impl GameDate {
    /// Construct a validated date on the given calendar scale.
    pub fn new(year: i32, month: u8, day: u8, calendar: CalendarKind) -> Result<Self, DateError> {
        if year == 0 {
            return Err(DateError::YearZero);
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        let max_day = month_length(year, month, calendar);
        if !(1..=max_day).contains(&day) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        Ok(Self {
            year,
            month,
            day,
            calendar,
        })
    }

    /// Shorthand for a proleptic-Gregorian date.
    pub fn gregorian(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        Self::new(year, month, day, CalendarKind::Gregorian)
    }

    /// Shorthand for a fixed-365-day-calendar date.
    pub fn no_leap(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        Self::new(year, month, day, CalendarKind::NoLeap)
    }

    /// Parse a date string: `YYYY-MM-DD` (also `.` or `/` separators),
    /// `YYYY-MM` / `YYYY` (missing parts default to 1), `YYYYMMDD`,
    /// optional leading sign on the year.
    pub fn parse(s: &str, calendar: CalendarKind) -> Result<Self, DateError> {
        let text = s.trim();
        if text.is_empty() {
            return Err(DateError::Unparseable(s.to_string()));
        }
        let (y, m, d) = if let Some(caps) = parse_regex().captures(text) {
            let y: i32 = caps[1]
                .parse()
                .map_err(|_| DateError::Unparseable(s.to_string()))?;
            let m = caps.get(2).map_or(Ok(1), |v| v.as_str().parse::<u8>())
                .map_err(|_| DateError::Unparseable(s.to_string()))?;
            let d = caps.get(3).map_or(Ok(1), |v| v.as_str().parse::<u8>())
                .map_err(|_| DateError::Unparseable(s.to_string()))?;
            (y, m, d)
        } else if let Some(caps) = compact_regex().captures(text) {
            let y: i32 = caps[1]
                .parse()
                .map_err(|_| DateError::Unparseable(s.to_string()))?;
            (y, caps[2].parse().unwrap_or(0), caps[3].parse().unwrap_or(0))
        } else {
            return Err(DateError::Unparseable(s.to_string()));
        };
        Self::new(y, m, d, calendar)
    }

    /// Historical year (never 0; negative = BCE).
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1..=12.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of month, 1-based.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// The ordinal scale this date lives on.
    pub fn calendar(&self) -> CalendarKind {
        self.calendar
    }

    /// Days since 1970-01-01 on this date's calendar scale.
    pub fn ordinal(&self) -> i64 {
        match self.calendar {
            CalendarKind::Gregorian => days_from_civil(
                astronomical(self.year),
                i64::from(self.month),
                i64::from(self.day),
            ),
            CalendarKind::NoLeap => {
                let doy = NO_LEAP_CUMULATIVE[self.month as usize - 1] + i64::from(self.day);
                (astronomical(self.year) - 1970) * 365 + doy - 1
            }
        }
    }

    /// Reconstruct a date from an ordinal. Total: every i64 that stays inside
    /// the i32 year range maps to a valid date.
    pub fn from_ordinal(ordinal: i64, calendar: CalendarKind) -> Self {
        match calendar {
            CalendarKind::Gregorian => {
                let (y, m, d) = civil_from_days(ordinal);
                Self {
                    year: historical(y),
                    month: m as u8,
                    day: d as u8,
                    calendar,
                }
            }
            CalendarKind::NoLeap => {
                let year = historical(1970 + ordinal.div_euclid(365));
                let doy = ordinal.rem_euclid(365) + 1;
                let month = NO_LEAP_CUMULATIVE
                    .iter()
                    .position(|&cum| doy <= cum)
                    .unwrap_or(12) as u8;
                let day = (doy - NO_LEAP_CUMULATIVE[month as usize - 1]) as u8;
                Self {
                    year,
                    month,
                    day,
                    calendar,
                }
            }
        }
    }

    /// This date plus `days` (which may be negative), on the same scale.
    pub fn add_days(&self, days: i64) -> Self {
        Self::from_ordinal(self.ordinal() + days, self.calendar)
    }

    /// Signed day count from `other` to `self`.
    pub fn diff_days(&self, other: &GameDate) -> i64 {
        self.ordinal() - other.ordinal()
    }
}

fn month_length(year: i32, month: u8, calendar: CalendarKind) -> u8 {
    if month == 2 && calendar == CalendarKind::Gregorian && is_gregorian_leap(year) {
        29
    } else {
        MONTH_LENGTHS[month as usize - 1]
    }
}

// Identity is the instant, not the field triple.
impl PartialEq for GameDate {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal() == other.ordinal()
    }
}

impl Eq for GameDate {}

impl PartialOrd for GameDate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameDate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl Hash for GameDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal().hash(state);
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.year < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{:04}-{:02}-{:02}",
            self.year.unsigned_abs(),
            self.month,
            self.day
        )
    }
}

impl fmt::Debug for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameDate({self} {})", self.calendar)
    }
}
