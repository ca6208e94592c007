//! Non-overlapping interval index of reigns.
//!
//! Every structural edit re-validates the whole timeline before committing —
//! cheap at tens of rulers — and on failure the prior state is retained
//! unchanged. Two orders coexist:
//!
//! - *display order* (the `Vec` itself): `player_start` ascending with unset
//!   sorting before any concrete date, ties broken by reign start;
//! - *reign order* (a lookup table of indices sorted by reign start), which
//!   is what `resolve_ruler_at` binary-searches, since reigns are pairwise
//!   non-overlapping.

use serde::{Deserialize, Deserializer, Serialize};

use chronicle_types::{GameDate, Rank, RankPeriod, Ruler, RulerId};

use crate::error::TimelineError;
use crate::Result;

/// Ordered collection of rulers for one campaign.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RulerTimeline {
    rulers: Vec<Ruler>,
    /// Indices into `rulers`, sorted by reign start. Rebuilt on every edit.
    #[serde(skip)]
    by_reign: Vec<usize>,
}

// The lookup table is derived state; identity is the ruler list.
impl PartialEq for RulerTimeline {
    fn eq(&self, other: &Self) -> bool {
        self.rulers == other.rulers
    }
}

// Manual impl so the lookup table exists right after deserialization.
impl<'de> Deserialize<'de> for RulerTimeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            rulers: Vec<Ruler>,
        }
        let raw = Raw::deserialize(deserializer)?;
        let mut timeline = Self {
            rulers: raw.rulers,
            by_reign: Vec::new(),
        };
        timeline.reorder();
        Ok(timeline)
    }
}

impl RulerTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ruler. Fails if the reign is empty/inverted, overlaps an
    /// existing reign, or the ruler's own rank periods are invalid.
    pub fn add_ruler(&mut self, ruler: Ruler) -> Result<()> {
        check_interval(ruler.reign_start, ruler.reign_end)?;
        check_rank_periods(&ruler)?;
        self.check_reign_against_siblings(ruler.id, ruler.reign_start, ruler.reign_end)?;
        self.rulers.push(ruler);
        self.reorder();
        Ok(())
    }

    /// Remove a ruler, returning it.
    pub fn remove_ruler(&mut self, id: RulerId) -> Result<Ruler> {
        let at = self.position(id)?;
        let ruler = self.rulers.remove(at);
        self.reorder();
        Ok(ruler)
    }

    /// Change a ruler's reign interval. The ruler's existing rank periods
    /// must still fit inside the new interval.
    pub fn edit_reign(&mut self, id: RulerId, start: GameDate, end: GameDate) -> Result<()> {
        let at = self.position(id)?;
        check_interval(start, end)?;
        self.check_reign_against_siblings(id, start, end)?;
        // Validate containment against the *new* interval before touching it.
        let mut candidate = self.rulers[at].clone();
        candidate.reign_start = start;
        candidate.reign_end = end;
        check_rank_periods(&candidate)?;
        self.rulers[at] = candidate;
        self.reorder();
        Ok(())
    }

    /// Replace a ruler's rank periods wholesale.
    pub fn edit_rank_periods(&mut self, id: RulerId, periods: Vec<RankPeriod>) -> Result<()> {
        let at = self.position(id)?;
        let mut candidate = self.rulers[at].clone();
        candidate.rank_periods = periods;
        check_rank_periods(&candidate)?;
        self.rulers[at] = candidate;
        Ok(())
    }

    /// The unique ruler whose reign contains `date`, or `None` in a gap
    /// between reigns.
    pub fn resolve_ruler_at(&self, date: GameDate) -> Option<&Ruler> {
        let at = self
            .by_reign
            .partition_point(|&i| self.rulers[i].reign_start <= date);
        let ruler = &self.rulers[*self.by_reign.get(at.checked_sub(1)?)?];
        ruler.reign_contains(date).then_some(ruler)
    }

    /// Rank held by a known ruler at `date`. `Ok(None)` means the date is
    /// inside the reign but uncovered — a data-entry gap, distinct from
    /// "no ruler at all".
    pub fn resolve_rank_at(&self, id: RulerId, date: GameDate) -> Result<Option<Rank>> {
        Ok(self.get(id)?.rank_at(date))
    }

    pub fn get(&self, id: RulerId) -> Result<&Ruler> {
        self.rulers
            .iter()
            .find(|r| r.id == id)
            .ok_or(TimelineError::UnknownRuler(id))
    }

    /// Rulers in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Ruler> {
        self.rulers.iter()
    }

    pub fn len(&self) -> usize {
        self.rulers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rulers.is_empty()
    }

    /// Earliest reign start across all rulers.
    pub fn earliest_reign_start(&self) -> Option<GameDate> {
        self.by_reign.first().map(|&i| self.rulers[i].reign_start)
    }

    fn position(&self, id: RulerId) -> Result<usize> {
        self.rulers
            .iter()
            .position(|r| r.id == id)
            .ok_or(TimelineError::UnknownRuler(id))
    }

    fn check_reign_against_siblings(
        &self,
        id: RulerId,
        start: GameDate,
        end: GameDate,
    ) -> Result<()> {
        for other in self.rulers.iter().filter(|r| r.id != id) {
            // Half-open: touching endpoints do not overlap.
            if start < other.reign_end && other.reign_start < end {
                return Err(TimelineError::ReignOverlap {
                    incoming: id,
                    existing: other.id,
                });
            }
        }
        Ok(())
    }

    fn reorder(&mut self) {
        // Option<i64> ordering puts None first — exactly the unset-sorts-
        // before-any-date rule.
        self.rulers.sort_by_key(|r| {
            (
                r.player_start.map(|d| d.ordinal()),
                r.reign_start.ordinal(),
            )
        });
        self.by_reign = (0..self.rulers.len()).collect();
        self.by_reign
            .sort_by_key(|&i| self.rulers[i].reign_start.ordinal());
    }
}

fn check_interval(start: GameDate, end: GameDate) -> Result<()> {
    if start >= end {
        return Err(TimelineError::InvalidInterval { start, end });
    }
    Ok(())
}

/// Rank periods must be individually valid intervals, sorted, contiguous,
/// and contained in `[reign_start, reign_end)`. An empty list is fine.
fn check_rank_periods(ruler: &Ruler) -> Result<()> {
    let periods = &ruler.rank_periods;
    for p in periods {
        check_interval(p.start, p.end)?;
    }
    for (i, pair) in periods.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        if b.start < a.end {
            return Err(TimelineError::RankOverlap {
                ruler: ruler.id,
                index: i,
            });
        }
        if b.start > a.end {
            return Err(TimelineError::RankGap {
                ruler: ruler.id,
                index: i,
            });
        }
    }
    if let (Some(first), Some(last)) = (periods.first(), periods.last()) {
        if first.start < ruler.reign_start || last.end > ruler.reign_end {
            return Err(TimelineError::RankOutsideReign { ruler: ruler.id });
        }
    }
    Ok(())
}
