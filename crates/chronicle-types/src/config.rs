//! Campaign configuration: playback and fallback policy.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::calendar::Calendar;
use crate::channel::FilterChannel;

/// What to render when no exact snapshot exists for the requested date.
///
/// Consulted by the engine at frame time — the snapshot index itself only
/// answers exact/at-or-before/nearest queries.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum FallbackPolicy {
    /// Render nothing without an exact match.
    Blank,
    /// Hold the most recent earlier snapshot. The default: it matches how a
    /// map archive reads (borders stay as last observed until re-observed).
    #[default]
    Freeze,
    /// Use whichever neighbor is closer; ties go to the earlier one.
    Nearest,
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackPolicy::Blank => "blank",
            FallbackPolicy::Freeze => "freeze",
            FallbackPolicy::Nearest => "nearest",
        };
        write!(f, "{s}")
    }
}

/// Per-campaign playback configuration, persisted with the campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Playback speed in game days per wall-clock second.
    pub speed_days_per_second: f64,
    /// Channel shown when the campaign opens.
    pub default_filter: FilterChannel,
    /// Fallback when no exact snapshot exists for a date/channel.
    pub fallback: FallbackPolicy,
    /// Date ↔ ordinal policy for every date in this campaign.
    pub calendar: Calendar,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            speed_days_per_second: 365.0,
            default_filter: FilterChannel::Political,
            fallback: FallbackPolicy::Freeze,
            calendar: Calendar::NoLeap,
        }
    }
}
