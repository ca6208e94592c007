//! The on-disk campaign document.
//!
//! A flat serde mirror of the in-memory aggregate: snapshots and rulers as
//! plain vectors, no index structure. Loading replays every record through
//! the validating index APIs, so the invariants hold after a load exactly as
//! they did before the save — a hand-edited document that violates them is
//! rejected as a whole.

use serde::{Deserialize, Serialize};

use chronicle_engine::Campaign;
use chronicle_timeline::{RulerTimeline, SnapshotArchive, TimelineError};
use chronicle_types::{CampaignConfig, CampaignId, Ruler, Snapshot};

use crate::error::StoreError;

/// Current document schema version.
pub const DOC_VERSION: u32 = 1;

/// Serialized form of a [`Campaign`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignDoc {
    pub version: u32,
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub config: CampaignConfig,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub rulers: Vec<Ruler>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: u64,
    pub modified_at: u64,
}

impl CampaignDoc {
    pub fn from_campaign(campaign: &Campaign) -> Self {
        Self {
            version: DOC_VERSION,
            id: campaign.id,
            name: campaign.name.clone(),
            config: campaign.config.clone(),
            snapshots: campaign.archive.snapshots().cloned().collect(),
            rulers: campaign.timeline.iter().cloned().collect(),
            notes: campaign.notes.clone(),
            created_at: campaign.created_at,
            modified_at: campaign.modified_at,
        }
    }

    /// Rebuild the aggregate, re-establishing every index invariant.
    ///
    /// A duplicate (channel, date) snapshot is dropped with a warning — old
    /// documents could carry them. A ruler that overlaps or has bad rank
    /// periods fails the whole load: silently dropping a reign would
    /// misattribute every frame inside it.
    pub fn into_campaign(self) -> Result<Campaign, StoreError> {
        if self.version > DOC_VERSION {
            return Err(StoreError::UnsupportedVersion(self.version));
        }

        let mut archive = SnapshotArchive::new();
        for snapshot in self.snapshots {
            if let Err(TimelineError::DuplicateDate { channel, date }) =
                archive.insert(snapshot)
            {
                tracing::warn!(%channel, %date, "dropping duplicate snapshot record");
            }
        }

        let mut timeline = RulerTimeline::new();
        for ruler in self.rulers {
            timeline.add_ruler(ruler)?;
        }

        let mut campaign = Campaign::new(self.name, self.config);
        campaign.id = self.id;
        campaign.archive = archive;
        campaign.timeline = timeline;
        campaign.notes = self.notes;
        campaign.created_at = self.created_at;
        campaign.modified_at = self.modified_at;
        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::{FilterChannel, GameDate};

    fn d(y: i32, m: u8, day: u8) -> GameDate {
        GameDate::no_leap(y, m, day).unwrap()
    }

    fn campaign() -> Campaign {
        let mut camp = Campaign::new("doc-test", CampaignConfig::default());
        camp.archive
            .insert(Snapshot::new(d(1444, 11, 11), FilterChannel::Political, "a.png"))
            .unwrap();
        camp.timeline
            .add_ruler(Ruler::new("Murad II", d(1444, 11, 11), d(1450, 1, 1)))
            .unwrap();
        camp.notes = Some("first session".into());
        camp
    }

    #[test]
    fn test_document_roundtrip() {
        let camp = campaign();
        let doc = CampaignDoc::from_campaign(&camp);
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: CampaignDoc = serde_json::from_str(&json).unwrap();
        let restored = parsed.into_campaign().unwrap();
        assert_eq!(camp, restored);
    }

    #[test]
    fn test_duplicate_snapshot_records_are_dropped() {
        let mut doc = CampaignDoc::from_campaign(&campaign());
        let mut dup = doc.snapshots[0].clone();
        dup.image = "b.png".into();
        doc.snapshots.push(dup);

        let restored = doc.into_campaign().unwrap();
        assert_eq!(restored.archive.len(), 1);
        // First record wins.
        assert_eq!(
            restored
                .archive
                .index(FilterChannel::Political)
                .unwrap()
                .query_exact(d(1444, 11, 11))
                .unwrap()
                .image()
                .to_str()
                .unwrap(),
            "a.png"
        );
    }

    #[test]
    fn test_newer_document_version_is_rejected() {
        let mut doc = CampaignDoc::from_campaign(&campaign());
        doc.version = DOC_VERSION + 1;
        assert!(matches!(
            doc.into_campaign(),
            Err(StoreError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_overlapping_reigns_fail_the_load() {
        let mut doc = CampaignDoc::from_campaign(&campaign());
        doc.rulers
            .push(Ruler::new("Pretender", d(1446, 1, 1), d(1448, 1, 1)));

        match doc.into_campaign() {
            Err(StoreError::Invalid(TimelineError::ReignOverlap { .. })) => {}
            other => panic!("expected ReignOverlap, got {other:?}"),
        }
    }
}
