//! Playback state machine.
//!
//! The engine is single-threaded cooperative: an external render loop calls
//! [`TemporalEngine::tick`] with elapsed wall seconds, and every call is a
//! pure in-memory state step — no I/O, no collaborator invocation, nothing
//! blocking. The one ordering hazard is a seek racing a tick computed from
//! pre-seek state; ticks therefore carry the generation counter they were
//! staged under, and a commit with a stale generation is discarded instead
//! of overwriting the user-intended position.

use serde::{Deserialize, Serialize};

use chronicle_timeline::Direction;
use chronicle_types::{FallbackPolicy, FilterChannel, GameDate};

use crate::campaign::Campaign;
use crate::frame::FrameDescriptor;

/// Playback mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    /// Not advancing.
    #[default]
    Stopped,
    /// Advancing on every tick.
    Playing,
    /// User is dragging the timeline; position updates come from scrubs.
    Scrubbing,
}

/// Mutable playback position for one open campaign.
///
/// Created when the campaign opens, discarded when it closes; never
/// persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    /// Current position on the timeline.
    pub current: GameDate,
    /// Sub-day remainder carried across ticks so fractional speeds
    /// accumulate exactly instead of truncating every step.
    fraction: f64,
    /// Game days per wall-clock second.
    pub speed: f64,
    /// Channel being viewed.
    pub filter: FilterChannel,
    pub state: PlayState,
    /// Bumped by every seek/scrub; stale staged ticks die against it.
    generation: u64,
}

/// A tick computed but not yet applied.
///
/// Lets a caller resolve the tick off the engine's current state, do other
/// work (a frame query, typically), and only then commit — with the
/// guarantee that an interleaved seek wins.
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use = "a staged tick does nothing until committed"]
pub struct StagedTick {
    generation: u64,
    date: GameDate,
    fraction: f64,
}

impl StagedTick {
    /// The position this tick would land on if committed.
    pub fn date(&self) -> GameDate {
        self.date
    }
}

/// The playback state machine for one campaign.
pub struct TemporalEngine {
    campaign: Campaign,
    playback: PlaybackState,
}

impl TemporalEngine {
    /// Open a campaign for playback, positioned at its initial date.
    pub fn new(campaign: Campaign) -> Self {
        let playback = PlaybackState {
            current: campaign.initial_date(),
            fraction: 0.0,
            speed: campaign.config.speed_days_per_second,
            filter: campaign.config.default_filter,
            state: PlayState::Stopped,
            generation: 0,
        };
        Self { campaign, playback }
    }

    // ── Transport controls ──────────────────────────────────────────────

    /// `Stopped`/`Scrubbing` → `Playing`. No-op when already playing.
    pub fn play(&mut self) {
        if self.playback.state != PlayState::Playing {
            tracing::debug!(from = ?self.playback.state, "play");
            self.playback.state = PlayState::Playing;
        }
    }

    /// `Playing` → `Stopped`. No-op otherwise.
    pub fn pause(&mut self) {
        if self.playback.state == PlayState::Playing {
            tracing::debug!("pause");
            self.playback.state = PlayState::Stopped;
        }
    }

    /// Jump to a date instantly. Lands in `Stopped` from any state and
    /// invalidates every staged tick.
    pub fn seek(&mut self, date: GameDate) {
        self.playback.current = date;
        self.playback.fraction = 0.0;
        self.playback.state = PlayState::Stopped;
        self.playback.generation += 1;
        tracing::debug!(%date, generation = self.playback.generation, "seek");
    }

    /// Timeline-drag position update: like [`TemporalEngine::seek`] but the
    /// machine stays in `Scrubbing` until the drag ends (`play` or `pause`).
    pub fn scrub(&mut self, date: GameDate) {
        self.playback.current = date;
        self.playback.fraction = 0.0;
        self.playback.state = PlayState::Scrubbing;
        self.playback.generation += 1;
    }

    /// Set playback speed in game days per wall second. Takes effect on the
    /// next tick; nothing is recomputed eagerly.
    pub fn set_speed(&mut self, days_per_second: f64) {
        self.playback.speed = days_per_second;
    }

    /// Switch the viewed channel. Takes effect on the next frame query.
    pub fn set_filter(&mut self, channel: FilterChannel) {
        self.playback.filter = channel;
    }

    // ── Time advance ────────────────────────────────────────────────────

    /// Advance by `speed * delta_secs` days. `None` unless `Playing`.
    pub fn tick(&mut self, delta_secs: f64) -> Option<GameDate> {
        let staged = self.stage_tick(delta_secs)?;
        self.commit_tick(staged).then_some(self.playback.current)
    }

    /// Compute a tick against current state without applying it.
    /// `None` unless `Playing`.
    pub fn stage_tick(&self, delta_secs: f64) -> Option<StagedTick> {
        if self.playback.state != PlayState::Playing {
            return None;
        }
        let total = self.playback.fraction + self.playback.speed * delta_secs;
        let whole = total.trunc();
        Some(StagedTick {
            generation: self.playback.generation,
            date: self.playback.current.add_days(whole as i64),
            fraction: total - whole,
        })
    }

    /// Apply a staged tick. Returns false — and changes nothing — when a
    /// seek or scrub happened since the stage, or playback stopped.
    pub fn commit_tick(&mut self, staged: StagedTick) -> bool {
        if staged.generation != self.playback.generation
            || self.playback.state != PlayState::Playing
        {
            tracing::debug!(
                staged = staged.generation,
                current = self.playback.generation,
                "discarding stale tick"
            );
            return false;
        }
        self.playback.current = staged.date;
        self.playback.fraction = staged.fraction;
        true
    }

    /// Seek to the adjacent stored snapshot date on the active channel.
    /// `None` at the index bound; the position is left untouched then.
    pub fn step_to_next_snapshot(&mut self, direction: Direction) -> Option<GameDate> {
        let date = self
            .campaign
            .archive
            .index(self.playback.filter)?
            .step_from(self.playback.current, direction)?
            .date;
        self.seek(date);
        Some(date)
    }

    // ── Frame resolution ────────────────────────────────────────────────

    /// Resolve what to render for the current position and channel.
    pub fn current_frame(&self) -> FrameDescriptor {
        self.frame_at(self.playback.current, self.playback.filter)
    }

    /// Resolve a frame for an arbitrary date and channel — a pure read of
    /// the indexes under the configured fallback policy.
    pub fn frame_at(&self, date: GameDate, channel: FilterChannel) -> FrameDescriptor {
        let snapshot = self.campaign.archive.index(channel).and_then(|idx| {
            match self.campaign.config.fallback {
                FallbackPolicy::Blank => idx.query_exact(date),
                FallbackPolicy::Freeze => idx.query_at_or_before(date),
                FallbackPolicy::Nearest => idx.query_nearest(date),
            }
        });
        let ruler = self.campaign.timeline.resolve_ruler_at(date);
        FrameDescriptor {
            image: snapshot.map(|s| s.image.clone()),
            offset: snapshot.and_then(|s| s.offset),
            ruler: ruler.map(|r| r.id),
            ruler_name: ruler.map(|r| r.display_name().to_string()),
            rank: ruler.and_then(|r| r.rank_at(date)),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn current_date(&self) -> GameDate {
        self.playback.current
    }

    pub fn state(&self) -> PlayState {
        self.playback.state
    }

    pub fn generation(&self) -> u64 {
        self.playback.generation
    }

    pub fn speed(&self) -> f64 {
        self.playback.speed
    }

    pub fn filter(&self) -> FilterChannel {
        self.playback.filter
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    /// Mutable access for imports/edits. Callers serialize this against
    /// playback themselves — pause first, or hold the engine under one lock.
    pub fn campaign_mut(&mut self) -> &mut Campaign {
        &mut self.campaign
    }

    /// Close playback and hand the campaign back.
    pub fn into_campaign(self) -> Campaign {
        self.campaign
    }
}
