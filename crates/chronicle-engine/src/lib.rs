//! chronicle-engine: playback over an archived campaign.
//!
//! Sits on top of `chronicle-timeline`'s indexes and drives them with a
//! small state machine:
//!
//! ```text
//!   TemporalEngine
//!   ├── Campaign            aggregate: config + archive + ruler timeline
//!   ├── PlaybackState       current date, speed, filter, Stopped/Playing/Scrubbing
//!   └── frame resolution    (date, channel) → FrameDescriptor
//! ```
//!
//! Everything here is pure in-memory computation. Persistence and import
//! live in `chronicle-store`; this crate never touches the filesystem.

pub mod campaign;
pub mod frame;
pub mod playback;

pub use campaign::Campaign;
pub use frame::FrameDescriptor;
pub use playback::{PlayState, PlaybackState, StagedTick, TemporalEngine};

// Stepping direction is part of the transport surface.
pub use chronicle_timeline::Direction;
