//! chronicle-store: campaign persistence, import, and settings.
//!
//! The filesystem edge of the workspace. Everything below this crate is
//! pure in-memory; everything here reads or writes disk:
//!
//! ```text
//!   CampaignStore       <root>/<name>/metadata.json + maps/<channel>/
//!   CampaignDoc         flat serde mirror of the aggregate
//!   Importer            date extraction → copy → align → insert → save
//!   Settings            RON, <config dir>/chronicle/settings.ron
//! ```
//!
//! Date extraction and image alignment are trait seams ([`DateExtractor`],
//! [`Aligner`]); the built-ins parse filenames and return identity offsets.

pub mod document;
pub mod error;
pub mod extract;
pub mod import;
pub mod settings;
pub mod storage;

pub use document::{CampaignDoc, DOC_VERSION};
pub use error::{ExtractError, StoreError};
pub use extract::{Aligner, DateExtractor, FilenameDateExtractor, IdentityAligner};
pub use import::Importer;
pub use settings::{default_settings_path, Settings};
pub use storage::CampaignStore;

pub type Result<T> = std::result::Result<T, StoreError>;
