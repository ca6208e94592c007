//! Campaign directory storage.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/
//! └── <campaign name>/
//!     ├── metadata.json        the CampaignDoc
//!     └── maps/
//!         ├── political/       imported images, one dir per channel
//!         ├── religious/
//!         └── ...
//! ```
//!
//! Metadata writes are atomic: the document lands in a temp file in the
//! campaign directory and is renamed over `metadata.json`, so a crash
//! mid-save leaves the previous document intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chronicle_engine::Campaign;
use chronicle_types::{CampaignConfig, FilterChannel};

use crate::document::CampaignDoc;
use crate::error::StoreError;
use crate::Result;

pub const METADATA_FILE: &str = "metadata.json";
pub const MAPS_DIR: &str = "maps";

/// A root directory holding campaigns.
#[derive(Clone, Debug)]
pub struct CampaignStore {
    root: PathBuf,
}

impl CampaignStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The platform-default store: `<data dir>/chronicle/campaigns`,
    /// created if missing.
    pub fn open_default() -> Result<Self> {
        let root = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chronicle")
            .join("campaigns");
        fs::create_dir_all(&root)?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn campaign_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Where channel images for a campaign live.
    pub fn maps_dir(&self, name: &str, channel: FilterChannel) -> PathBuf {
        self.campaign_dir(name).join(MAPS_DIR).join(channel.as_str())
    }

    /// Create a new campaign directory with its channel subdirectories and
    /// an initial metadata document.
    pub fn create_campaign(&self, name: &str, config: CampaignConfig) -> Result<Campaign> {
        let dir = self.campaign_dir(name);
        if dir.join(METADATA_FILE).exists() {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        for channel in FilterChannel::ALL {
            fs::create_dir_all(self.maps_dir(name, channel))?;
        }

        let campaign = Campaign::new(name, config);
        self.save_campaign(&campaign)?;
        tracing::info!(name, dir = %dir.display(), "created campaign");
        Ok(campaign)
    }

    /// Write the campaign document atomically.
    pub fn save_campaign(&self, campaign: &Campaign) -> Result<()> {
        let dir = self.campaign_dir(&campaign.name);
        fs::create_dir_all(&dir)?;

        let doc = CampaignDoc::from_campaign(campaign);
        let json = serde_json::to_string_pretty(&doc)?;

        // Same directory as the target so the rename cannot cross devices.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(dir.join(METADATA_FILE))
            .map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(name = %campaign.name, snapshots = campaign.archive.len(), "saved campaign");
        Ok(())
    }

    pub fn load_campaign(&self, name: &str) -> Result<Campaign> {
        let path = self.campaign_dir(name).join(METADATA_FILE);
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        let doc: CampaignDoc = serde_json::from_str(&json)?;
        doc.into_campaign()
    }

    /// Names of every campaign under the root (directories that carry a
    /// metadata document), sorted.
    pub fn list_campaigns(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if !self.root.exists() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().join(METADATA_FILE).is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!(?raw, "skipping non-UTF-8 campaign directory"),
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove a campaign directory and everything in it.
    pub fn delete_campaign(&self, name: &str) -> Result<()> {
        let dir = self.campaign_dir(name);
        if !dir.join(METADATA_FILE).exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        fs::remove_dir_all(&dir)?;
        tracing::info!(name, "deleted campaign");
        Ok(())
    }
}
