//! Application-level settings, persisted as RON.
//!
//! These are the defaults a new campaign starts from; each campaign then
//! carries its own config in its document. Default location is
//! `<config dir>/chronicle/settings.ron`; a missing file means defaults.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use chronicle_types::{Calendar, CampaignConfig, FallbackPolicy, FilterChannel};

use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game days per wall second for new campaigns.
    pub default_speed: f64,
    pub default_filter: FilterChannel,
    pub fallback: FallbackPolicy,
    /// New campaigns use the fixed 365-day calendar.
    pub no_leap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_speed: 365.0,
            default_filter: FilterChannel::Political,
            fallback: FallbackPolicy::Freeze,
            no_leap: true,
        }
    }
}

/// `<config dir>/chronicle/settings.ron`.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chronicle")
        .join("settings.ron")
}

impl Settings {
    /// Load from `path`; a missing file is not an error, just defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    pub fn load_default() -> Result<Self> {
        Self::load(&default_settings_path())
    }

    /// Write atomically, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.persist(path)
            .map_err(|e| crate::StoreError::Io(e.error))?;
        Ok(())
    }

    /// The campaign config a new campaign starts from.
    pub fn campaign_config(&self) -> CampaignConfig {
        CampaignConfig {
            speed_days_per_second: self.default_speed,
            default_filter: self.default_filter,
            fallback: self.fallback,
            calendar: if self.no_leap {
                Calendar::NoLeap
            } else {
                Calendar::Gregorian
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let s = Settings::load(&dir.path().join("settings.ron")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.ron");
        let s = Settings {
            default_speed: 30.0,
            default_filter: FilterChannel::Religious,
            fallback: FallbackPolicy::Nearest,
            no_leap: false,
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, "(default_speed: 90.0)").unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.default_speed, 90.0);
        assert_eq!(s.fallback, FallbackPolicy::Freeze);
    }

    #[test]
    fn test_campaign_config_mapping() {
        let cfg = Settings::default().campaign_config();
        assert_eq!(cfg.speed_days_per_second, 365.0);
        assert_eq!(cfg.calendar, Calendar::NoLeap);
    }
}
