//! Date-extraction and alignment collaborators.
//!
//! Both are trait seams: playback and import only ever see the traits, so a
//! real OCR engine or feature matcher plugs in without touching the
//! pipeline. The implementations here are the built-in ones — filename
//! parsing for dates, identity for alignment.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use chronicle_types::AlignOffset;

use crate::error::ExtractError;

/// Pulls a raw date string out of an image file.
pub trait DateExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Computes the 2D offset of a candidate image against a channel reference.
pub trait Aligner {
    fn align(&self, reference: &Path, candidate: &Path) -> Result<AlignOffset, ExtractError>;
}

/// Reads the date out of the file name.
///
/// Screenshots named by their capture tooling usually carry the in-game
/// date (`ottomans_1444-11-11.png`, `1444.11.11 political.jpg`); this
/// matches the first `year sep month sep day` group in the stem. The raw
/// match is returned as-is and parsed by the import pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilenameDateExtractor;

fn date_in_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(-?\d{1,5})[.\-_/ ](\d{1,2})[.\-_/ ](\d{1,2})").unwrap()
    })
}

impl DateExtractor for FilenameDateExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ExtractError::Unresolved {
                path: path.to_path_buf(),
            })?;
        let caps = date_in_name()
            .captures(stem)
            .ok_or_else(|| ExtractError::Unresolved {
                path: path.to_path_buf(),
            })?;
        // Normalize the separators so the date parser sees one form.
        Ok(format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
    }
}

/// No-op aligner: every image is taken as already aligned.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityAligner;

impl Aligner for IdentityAligner {
    fn align(&self, _reference: &Path, _candidate: &Path) -> Result<AlignOffset, ExtractError> {
        Ok(AlignOffset::default())
    }
}
