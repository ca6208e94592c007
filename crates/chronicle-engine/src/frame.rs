//! Frame descriptors — the engine's sole output.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use chronicle_types::{AlignOffset, Rank, RulerId};

/// What the presentation layer should currently render.
///
/// Every field is independently absent: no snapshot under a `Blank` policy,
/// no offset when alignment never ran, no ruler in an interregnum gap, no
/// rank when the reign has a data-entry gap at this date.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    /// Image to show, per the channel's fallback policy.
    pub image: Option<PathBuf>,
    /// Alignment of that image, if it was ever computed.
    pub offset: Option<AlignOffset>,
    /// Who rules at this instant.
    pub ruler: Option<RulerId>,
    /// Their display name (epithet > regnal name > full name).
    pub ruler_name: Option<String>,
    /// Rank held at this instant, when a rank period covers it.
    pub rank: Option<Rank>,
}

impl FrameDescriptor {
    /// A frame with nothing to show.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field carries anything.
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.ruler.is_none()
    }
}
