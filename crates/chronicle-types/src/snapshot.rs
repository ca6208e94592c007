//! Snapshots — one dated map image on one filter channel.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::channel::FilterChannel;
use crate::date::GameDate;
use crate::ids::SnapshotId;

/// 2D alignment of a snapshot against its channel's reference image.
///
/// Produced once at import time by the alignment collaborator; never
/// recomputed during playback.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignOffset {
    /// Horizontal shift in pixels.
    pub dx: f64,
    /// Vertical shift in pixels.
    pub dy: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Match confidence in 0..=1.
    pub confidence: f64,
}

impl Default for AlignOffset {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            scale: 1.0,
            confidence: 1.0,
        }
    }
}

/// One dated image for one filter channel.
///
/// Created at import, removed on explicit delete — the only field mutated
/// afterwards is `offset`, attached when alignment completes. Uniqueness per
/// (channel, date) is enforced by the snapshot index, not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Globally unique snapshot identifier.
    pub id: SnapshotId,
    /// The instant this image depicts.
    pub date: GameDate,
    /// Which map view this image belongs to.
    pub channel: FilterChannel,
    /// Image reference — opaque to the core; the store crate treats it as a
    /// path relative to the campaign root.
    pub image: PathBuf,
    /// Alignment against the channel reference, if alignment succeeded.
    pub offset: Option<AlignOffset>,
    /// Raw date string the extractor produced, kept for auditing.
    pub extracted: Option<String>,
}

impl Snapshot {
    /// Create a snapshot with a fresh ID and no offset.
    pub fn new(date: GameDate, channel: FilterChannel, image: impl Into<PathBuf>) -> Self {
        Self {
            id: SnapshotId::new(),
            date,
            channel,
            image: image.into(),
            offset: None,
            extracted: None,
        }
    }

    /// Record the raw extractor output alongside the accepted date.
    pub fn with_extracted(mut self, raw: impl Into<String>) -> Self {
        self.extracted = Some(raw.into());
        self
    }

    /// The image path.
    pub fn image(&self) -> &Path {
        &self.image
    }
}
