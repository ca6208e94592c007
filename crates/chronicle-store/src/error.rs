//! Storage and import errors.

use std::path::PathBuf;

use thiserror::Error;

use chronicle_timeline::TimelineError;
use chronicle_types::DateError;

/// Errors from campaign storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad campaign document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad settings file: {0}")]
    Settings(#[from] ron::error::SpannedError),

    #[error("could not encode settings: {0}")]
    SettingsEncode(#[from] ron::Error),

    /// A loaded document violates an index invariant. The document is left
    /// on disk untouched; nothing partial is returned.
    #[error("campaign document is inconsistent: {0}")]
    Invalid(#[from] TimelineError),

    #[error(transparent)]
    Date(#[from] DateError),

    /// The document was written by a newer schema than this build knows.
    #[error("unsupported campaign document version {0}")]
    UnsupportedVersion(u32),

    #[error("no campaign named {0:?}")]
    NotFound(String),

    #[error("campaign {0:?} already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors from the date-extraction and alignment collaborators.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The extractor could not find a date. Import stops; the caller
    /// supplies a manual date and retries.
    #[error("no date found in {path:?}")]
    Unresolved { path: PathBuf },

    /// The aligner could not match the candidate against the reference.
    /// Import tolerates this: the snapshot keeps no offset.
    #[error("could not align {candidate:?}: {reason}")]
    AlignmentFailed { candidate: PathBuf, reason: String },
}
