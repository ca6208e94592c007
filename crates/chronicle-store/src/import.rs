//! The snapshot import pipeline.
//!
//! One call takes an image from anywhere on disk into the campaign:
//! resolve the date, copy the file under `maps/<channel>/`, align it
//! against the channel's previous snapshot, insert it into the archive,
//! save the document. Alignment failure is tolerated (the snapshot just
//! carries no offset); everything else aborts before the archive mutates.

use std::fs;
use std::path::Path;

use chronicle_engine::Campaign;
use chronicle_timeline::TimelineError;
use chronicle_types::{FilterChannel, GameDate, Snapshot};

use crate::extract::{Aligner, DateExtractor, FilenameDateExtractor, IdentityAligner};
use crate::storage::CampaignStore;
use crate::Result;

/// Import configuration: which collaborators resolve dates and offsets.
pub struct Importer {
    extractor: Box<dyn DateExtractor>,
    aligner: Box<dyn Aligner>,
}

impl Default for Importer {
    fn default() -> Self {
        Self {
            extractor: Box::new(FilenameDateExtractor),
            aligner: Box::new(IdentityAligner),
        }
    }
}

impl Importer {
    pub fn new(extractor: Box<dyn DateExtractor>, aligner: Box<dyn Aligner>) -> Self {
        Self { extractor, aligner }
    }

    /// Import one image into `channel` of `campaign` and save the document.
    ///
    /// The date comes from `date_override` when given, otherwise from the
    /// extractor; the calendar policy decides how the raw string parses.
    /// Returns the inserted snapshot.
    pub fn import_snapshot(
        &self,
        store: &CampaignStore,
        campaign: &mut Campaign,
        src: &Path,
        channel: FilterChannel,
        date_override: Option<GameDate>,
    ) -> Result<Snapshot> {
        let (date, raw) = match date_override {
            Some(date) => (date, None),
            None => {
                let raw = self.extractor.extract(src)?;
                (campaign.config.calendar.parse(&raw)?, Some(raw))
            }
        };

        // Check the date slot before copying anything, so a rejected import
        // leaves no stray file in the maps directory.
        if campaign
            .archive
            .index(channel)
            .is_some_and(|idx| idx.query_exact(date).is_some())
        {
            return Err(TimelineError::DuplicateDate { channel, date }.into());
        }

        let dest_rel = copy_into_maps(store, &campaign.name, channel, src, date)?;

        let mut snapshot = Snapshot::new(date, channel, dest_rel);
        if let Some(raw) = raw {
            snapshot = snapshot.with_extracted(raw);
        }

        // Align against the newest snapshot at or before this date; the
        // first image on a channel is its own reference.
        let campaign_dir = store.campaign_dir(&campaign.name);
        let reference = campaign
            .archive
            .index(channel)
            .and_then(|idx| idx.query_at_or_before(date))
            .map(|prev| campaign_dir.join(&prev.image));
        snapshot.offset = match reference {
            None => Some(Default::default()),
            Some(reference) => {
                match self.aligner.align(&reference, &campaign_dir.join(&snapshot.image)) {
                    Ok(offset) => Some(offset),
                    Err(err) => {
                        tracing::warn!(%date, %channel, %err, "alignment failed, keeping snapshot unaligned");
                        None
                    }
                }
            }
        };

        campaign.archive.insert(snapshot.clone())?;
        campaign.touch();
        store.save_campaign(campaign)?;
        tracing::info!(%date, %channel, src = %src.display(), "imported snapshot");
        Ok(snapshot)
    }
}

/// Copy `src` to `maps/<channel>/<date>[-N].<ext>` under the campaign
/// directory, suffixing on name collision. Returns the path relative to the
/// campaign directory, which is what the snapshot stores.
fn copy_into_maps(
    store: &CampaignStore,
    campaign_name: &str,
    channel: FilterChannel,
    src: &Path,
    date: GameDate,
) -> Result<std::path::PathBuf> {
    let maps = store.maps_dir(campaign_name, channel);
    fs::create_dir_all(&maps)?;
    let ext = src
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");

    let mut name = format!("{date}.{ext}");
    let mut n = 0u32;
    while maps.join(&name).exists() {
        n += 1;
        name = format!("{date}-{n}.{ext}");
    }

    fs::copy(src, maps.join(&name))?;
    Ok(Path::new(crate::storage::MAPS_DIR)
        .join(channel.as_str())
        .join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, StoreError};
    use chronicle_timeline::TimelineError;
    use chronicle_types::{AlignOffset, CampaignConfig};
    use tempfile::TempDir;

    fn d(y: i32, m: u8, day: u8) -> GameDate {
        GameDate::no_leap(y, m, day).unwrap()
    }

    /// A store, a campaign, and a scratch dir holding source images.
    fn setup() -> (TempDir, CampaignStore, Campaign) {
        let dir = TempDir::new().unwrap();
        let store = CampaignStore::new(dir.path().join("campaigns"));
        let campaign = store
            .create_campaign("ottomans", CampaignConfig::default())
            .unwrap();
        (dir, store, campaign)
    }

    fn touch(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"png bytes").unwrap();
        path
    }

    #[test]
    fn test_import_extracts_date_and_copies() {
        let (dir, store, mut camp) = setup();
        let src = touch(&dir, "1444-11-11.png");

        let importer = Importer::default();
        let snap = importer
            .import_snapshot(&store, &mut camp, &src, FilterChannel::Political, None)
            .unwrap();

        assert_eq!(snap.date, d(1444, 11, 11));
        assert_eq!(snap.extracted.as_deref(), Some("1444.11.11"));
        // First image on the channel aligns to itself.
        assert_eq!(snap.offset, Some(AlignOffset::default()));
        assert!(store.campaign_dir("ottomans").join(&snap.image).is_file());

        // The save happened: a fresh load sees the snapshot.
        let loaded = store.load_campaign("ottomans").unwrap();
        assert_eq!(loaded.archive.len(), 1);
    }

    #[test]
    fn test_date_override_skips_extraction() {
        let (dir, store, mut camp) = setup();
        let src = touch(&dir, "no-date-here.png");

        let snap = Importer::default()
            .import_snapshot(
                &store,
                &mut camp,
                &src,
                FilterChannel::Political,
                Some(d(1444, 11, 11)),
            )
            .unwrap();
        assert_eq!(snap.date, d(1444, 11, 11));
        assert!(snap.extracted.is_none());
    }

    #[test]
    fn test_unresolvable_date_aborts_import() {
        let (dir, store, mut camp) = setup();
        let src = touch(&dir, "screenshot.png");

        let err = Importer::default()
            .import_snapshot(&store, &mut camp, &src, FilterChannel::Political, None)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Extract(ExtractError::Unresolved { .. })
        ));
        assert!(camp.archive.is_empty());
    }

    #[test]
    fn test_duplicate_date_rejected_before_archive_changes() {
        let (dir, store, mut camp) = setup();
        let src = touch(&dir, "1444-11-11.png");
        let importer = Importer::default();
        importer
            .import_snapshot(&store, &mut camp, &src, FilterChannel::Political, None)
            .unwrap();

        let err = importer
            .import_snapshot(&store, &mut camp, &src, FilterChannel::Political, None)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invalid(TimelineError::DuplicateDate { .. })
        ));
        assert_eq!(camp.archive.len(), 1);
    }

    #[test]
    fn test_rejected_import_leaves_maps_dir_unchanged() {
        let (dir, store, mut camp) = setup();
        let src = touch(&dir, "1444-11-11.png");
        let importer = Importer::default();
        importer
            .import_snapshot(&store, &mut camp, &src, FilterChannel::Political, None)
            .unwrap();

        let maps_files = |store: &CampaignStore| {
            let mut names: Vec<_> = fs::read_dir(store.maps_dir("ottomans", FilterChannel::Political))
                .unwrap()
                .filter_map(|e| e.unwrap().file_name().into_string().ok())
                .collect();
            names.sort();
            names
        };
        let before = maps_files(&store);
        assert_eq!(before, vec!["1444-11-11.png"]);

        // Retried duplicates must not pile up orphaned copies.
        for _ in 0..3 {
            importer
                .import_snapshot(&store, &mut camp, &src, FilterChannel::Political, None)
                .unwrap_err();
        }
        assert_eq!(maps_files(&store), before);
    }

    #[test]
    fn test_same_date_different_channels_get_collision_suffix_free_names() {
        let (dir, store, mut camp) = setup();
        let importer = Importer::default();
        let src = touch(&dir, "1444-11-11.png");

        let political = importer
            .import_snapshot(&store, &mut camp, &src, FilterChannel::Political, None)
            .unwrap();
        let religious = importer
            .import_snapshot(&store, &mut camp, &src, FilterChannel::Religious, None)
            .unwrap();
        assert_ne!(political.image, religious.image);
        assert!(political.image.starts_with("maps/political"));
        assert!(religious.image.starts_with("maps/religious"));
    }

    #[test]
    fn test_alignment_failure_keeps_snapshot_unaligned() {
        struct FailingAligner;
        impl Aligner for FailingAligner {
            fn align(&self, _r: &Path, candidate: &Path) -> std::result::Result<AlignOffset, ExtractError> {
                Err(ExtractError::AlignmentFailed {
                    candidate: candidate.to_path_buf(),
                    reason: "not enough features".into(),
                })
            }
        }

        let (dir, store, mut camp) = setup();
        let importer = Importer::new(Box::new(FilenameDateExtractor), Box::new(FailingAligner));
        let first = touch(&dir, "1444-11-11.png");
        let second = touch(&dir, "1445-01-01.png");

        // First image never consults the aligner.
        let snap = importer
            .import_snapshot(&store, &mut camp, &first, FilterChannel::Political, None)
            .unwrap();
        assert_eq!(snap.offset, Some(AlignOffset::default()));

        // Second one does, fails, and is imported anyway.
        let snap = importer
            .import_snapshot(&store, &mut camp, &second, FilterChannel::Political, None)
            .unwrap();
        assert!(snap.offset.is_none());
        assert_eq!(camp.archive.len(), 2);
    }
}
