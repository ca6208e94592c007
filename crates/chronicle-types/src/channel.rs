//! Filter channels — the parallel map views of one world.
//!
//! Each channel is an independent image series with its own snapshot dates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// An independent map view (political borders, religion, culture, …).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum FilterChannel {
    /// Realm / political borders.
    #[default]
    #[strum(serialize = "political", serialize = "realms")]
    Political,
    /// Religion / faith spread.
    #[strum(serialize = "religious", serialize = "faith")]
    Religious,
    /// Culture spread.
    #[strum(serialize = "cultural", serialize = "culture")]
    Cultural,
    /// Anything user-defined that doesn't fit the above.
    Custom,
}

impl FilterChannel {
    /// All channels, in display order.
    pub const ALL: [FilterChannel; 4] = [
        FilterChannel::Political,
        FilterChannel::Religious,
        FilterChannel::Cultural,
        FilterChannel::Custom,
    ];

    /// Stable lowercase name, also used as the on-disk directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterChannel::Political => "political",
            FilterChannel::Religious => "religious",
            FilterChannel::Cultural => "cultural",
            FilterChannel::Custom => "custom",
        }
    }
}

impl fmt::Display for FilterChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_str_with_aliases() {
        assert_eq!(
            FilterChannel::from_str("political").unwrap(),
            FilterChannel::Political
        );
        assert_eq!(
            FilterChannel::from_str("Realms").unwrap(),
            FilterChannel::Political
        );
        assert_eq!(
            FilterChannel::from_str("faith").unwrap(),
            FilterChannel::Religious
        );
        assert_eq!(
            FilterChannel::from_str("culture").unwrap(),
            FilterChannel::Cultural
        );
        assert!(FilterChannel::from_str("economic").is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for ch in FilterChannel::ALL {
            let json = serde_json::to_string(&ch).unwrap();
            assert_eq!(json, format!("\"{ch}\""));
        }
    }
}
