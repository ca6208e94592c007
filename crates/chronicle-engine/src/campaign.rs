//! Campaign aggregate: everything one archived playthrough owns.
//!
//! An explicit object passed around by reference — there is no process-wide
//! "current campaign". Mutation (imports, deletes, ruler edits) takes
//! `&mut`, so the borrow checker serializes it against playback reads;
//! callers sharing a campaign across threads put it behind their own lock.

use serde::{Deserialize, Serialize};

use chronicle_timeline::{RulerTimeline, SnapshotArchive};
use chronicle_types::{now_millis, CampaignConfig, CampaignId, GameDate};

/// One archived playthrough: config, snapshots, rulers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    /// Human-chosen name, also the on-disk directory name.
    pub name: String,
    pub config: CampaignConfig,
    pub archive: SnapshotArchive,
    pub timeline: RulerTimeline,
    pub notes: Option<String>,
    /// Unix millis.
    pub created_at: u64,
    /// Unix millis, bumped by [`Campaign::touch`].
    pub modified_at: u64,
}

impl Campaign {
    /// Create an empty campaign.
    pub fn new(name: impl Into<String>, config: CampaignConfig) -> Self {
        let now = now_millis();
        Self {
            id: CampaignId::new(),
            name: name.into(),
            config,
            archive: SnapshotArchive::new(),
            timeline: RulerTimeline::new(),
            notes: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Record a modification.
    pub fn touch(&mut self) {
        self.modified_at = now_millis();
    }

    /// Where playback opens: the earliest snapshot, else the earliest reign,
    /// else the calendar epoch.
    pub fn initial_date(&self) -> GameDate {
        self.archive
            .earliest_date()
            .or_else(|| self.timeline.earliest_reign_start())
            .unwrap_or_else(|| self.config.calendar.from_ordinal(0))
    }
}
