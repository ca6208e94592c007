//! Per-channel snapshot index and the multi-channel archive.
//!
//! Each [`SnapshotIndex`] keeps one channel's snapshots in a `Vec` sorted by
//! date ordinal, strictly increasing and unique. Queries are binary searches;
//! inserts shift (archives hold hundreds of snapshots, not millions). The
//! fallback policy is *not* applied here — the index answers exact,
//! at-or-before, and nearest queries, and the engine picks among them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use chronicle_types::{AlignOffset, FilterChannel, GameDate, Snapshot};

use crate::error::TimelineError;
use crate::Result;

/// Search direction for stepping between stored snapshot dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward later dates.
    Forward,
    /// Toward earlier dates.
    Backward,
}

/// Date-sorted collection of one channel's snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotIndex {
    entries: Vec<Snapshot>,
}

impl SnapshotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `date`: `Ok` = exact index, `Err` = insertion point.
    fn locate(&self, date: GameDate) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by(|s| s.date.cmp(&date))
    }

    /// Insert a snapshot; fails with [`TimelineError::DuplicateDate`] if the
    /// date slot is already taken. No mutation on failure.
    pub fn insert(&mut self, snapshot: Snapshot) -> Result<()> {
        match self.locate(snapshot.date) {
            Ok(_) => Err(TimelineError::DuplicateDate {
                channel: snapshot.channel,
                date: snapshot.date,
            }),
            Err(at) => {
                self.entries.insert(at, snapshot);
                debug_assert!(self.is_strictly_sorted());
                Ok(())
            }
        }
    }

    /// Insert, replacing any existing snapshot at the same date. Returns the
    /// replaced snapshot, if there was one.
    pub fn insert_or_replace(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        match self.locate(snapshot.date) {
            Ok(at) => Some(std::mem::replace(&mut self.entries[at], snapshot)),
            Err(at) => {
                self.entries.insert(at, snapshot);
                None
            }
        }
    }

    /// Remove the snapshot at `date`. `None` if absent — removal of a missing
    /// date is not an error.
    pub fn remove(&mut self, date: GameDate) -> Option<Snapshot> {
        let at = self.locate(date).ok()?;
        Some(self.entries.remove(at))
    }

    /// Attach an alignment offset to the snapshot at `date`. This is the only
    /// post-insert mutation a snapshot sees. Returns false if absent.
    pub fn set_offset(&mut self, date: GameDate, offset: AlignOffset) -> bool {
        match self.locate(date) {
            Ok(at) => {
                self.entries[at].offset = Some(offset);
                true
            }
            Err(_) => false,
        }
    }

    /// The snapshot at exactly `date`.
    pub fn query_exact(&self, date: GameDate) -> Option<&Snapshot> {
        self.locate(date).ok().map(|at| &self.entries[at])
    }

    /// The snapshot with the greatest date ≤ `date`.
    pub fn query_at_or_before(&self, date: GameDate) -> Option<&Snapshot> {
        match self.locate(date) {
            Ok(at) => Some(&self.entries[at]),
            Err(at) => self.entries.get(at.checked_sub(1)?),
        }
    }

    /// The ordinal-closest snapshot; on a tie the earlier one wins.
    pub fn query_nearest(&self, date: GameDate) -> Option<&Snapshot> {
        let at = match self.locate(date) {
            Ok(at) => return Some(&self.entries[at]),
            Err(at) => at,
        };
        let before = at.checked_sub(1).and_then(|i| self.entries.get(i));
        let after = self.entries.get(at);
        match (before, after) {
            (Some(b), Some(a)) => {
                let to_b = date.ordinal() - b.date.ordinal();
                let to_a = a.date.ordinal() - date.ordinal();
                // tie → earlier
                Some(if to_b <= to_a { b } else { a })
            }
            (b, a) => b.or(a),
        }
    }

    /// The stored snapshot strictly after/before `date`, or `None` at the
    /// index bound (no wraparound).
    pub fn step_from(&self, date: GameDate, direction: Direction) -> Option<&Snapshot> {
        match direction {
            Direction::Forward => {
                let at = match self.locate(date) {
                    Ok(at) => at + 1,
                    Err(at) => at,
                };
                self.entries.get(at)
            }
            Direction::Backward => {
                let at = match self.locate(date) {
                    Ok(at) | Err(at) => at,
                };
                self.entries.get(at.checked_sub(1)?)
            }
        }
    }

    pub fn first(&self) -> Option<&Snapshot> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshots in date order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    fn is_strictly_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].date.ordinal() < w[1].date.ordinal())
    }
}

/// All channels of one campaign, each with its own [`SnapshotIndex`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotArchive {
    channels: IndexMap<FilterChannel, SnapshotIndex>,
}

impl SnapshotArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a snapshot to its channel's index.
    pub fn insert(&mut self, snapshot: Snapshot) -> Result<()> {
        self.channels
            .entry(snapshot.channel)
            .or_default()
            .insert(snapshot)
    }

    /// Route with overwrite. Returns the replaced snapshot, if any.
    pub fn insert_or_replace(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        self.channels
            .entry(snapshot.channel)
            .or_default()
            .insert_or_replace(snapshot)
    }

    pub fn remove(&mut self, channel: FilterChannel, date: GameDate) -> Option<Snapshot> {
        self.channels.get_mut(&channel)?.remove(date)
    }

    pub fn set_offset(
        &mut self,
        channel: FilterChannel,
        date: GameDate,
        offset: AlignOffset,
    ) -> bool {
        self.channels
            .get_mut(&channel)
            .is_some_and(|idx| idx.set_offset(date, offset))
    }

    /// The index for one channel, if it has any snapshots.
    pub fn index(&self, channel: FilterChannel) -> Option<&SnapshotIndex> {
        self.channels.get(&channel)
    }

    /// Channels that have at least one snapshot, in first-import order.
    pub fn channels(&self) -> impl Iterator<Item = FilterChannel> + '_ {
        self.channels
            .iter()
            .filter(|(_, idx)| !idx.is_empty())
            .map(|(ch, _)| *ch)
    }

    /// Every snapshot across all channels, channel-major, date order within.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.channels.values().flat_map(SnapshotIndex::iter)
    }

    /// Earliest snapshot date across every channel.
    pub fn earliest_date(&self) -> Option<GameDate> {
        self.channels
            .values()
            .filter_map(|idx| idx.first())
            .map(|s| s.date)
            .min()
    }

    pub fn len(&self) -> usize {
        self.channels.values().map(SnapshotIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::CalendarKind;

    fn d(y: i32, m: u8, day: u8) -> GameDate {
        GameDate::no_leap(y, m, day).unwrap()
    }

    fn snap(y: i32, m: u8, day: u8) -> Snapshot {
        Snapshot::new(
            d(y, m, day),
            FilterChannel::Political,
            format!("political/{y}-{m:02}-{day:02}.png"),
        )
    }

    fn index(dates: &[(i32, u8, u8)]) -> SnapshotIndex {
        let mut idx = SnapshotIndex::new();
        for &(y, m, day) in dates {
            idx.insert(snap(y, m, day)).unwrap();
        }
        idx
    }

    #[test]
    fn test_inserts_stay_sorted_regardless_of_order() {
        let idx = index(&[(1450, 1, 1), (1444, 11, 11), (1448, 6, 1)]);
        let dates: Vec<_> = idx.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![d(1444, 11, 11), d(1448, 6, 1), d(1450, 1, 1)]);
    }

    #[test]
    fn test_duplicate_date_rejected_without_mutation() {
        let mut idx = index(&[(1444, 11, 11)]);
        let before = idx.clone();
        let err = idx.insert(snap(1444, 11, 11)).unwrap_err();
        assert!(matches!(err, TimelineError::DuplicateDate { .. }));
        assert_eq!(idx, before);
    }

    #[test]
    fn test_insert_or_replace_overwrites() {
        let mut idx = index(&[(1444, 11, 11)]);
        let replacement = snap(1444, 11, 11);
        let new_id = replacement.id;
        let old = idx.insert_or_replace(replacement).unwrap();
        assert_ne!(old.id, new_id);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.query_exact(d(1444, 11, 11)).unwrap().id, new_id);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut idx = index(&[(1444, 11, 11)]);
        assert!(idx.remove(d(1500, 1, 1)).is_none());
        assert_eq!(idx.len(), 1);
        assert!(idx.remove(d(1444, 11, 11)).is_some());
        assert!(idx.is_empty());
    }

    #[test]
    fn test_query_at_or_before_returns_greatest_le() {
        let idx = index(&[(1444, 11, 11), (1450, 1, 1)]);
        assert_eq!(
            idx.query_at_or_before(d(1447, 6, 1)).unwrap().date,
            d(1444, 11, 11)
        );
        assert_eq!(
            idx.query_at_or_before(d(1450, 1, 1)).unwrap().date,
            d(1450, 1, 1)
        );
        assert!(idx.query_at_or_before(d(1444, 11, 10)).is_none());
    }

    #[test]
    fn test_query_nearest_with_tie_toward_earlier() {
        let idx = index(&[(1444, 1, 1), (1444, 1, 11)]);
        assert_eq!(idx.query_nearest(d(1444, 1, 4)).unwrap().date, d(1444, 1, 1));
        assert_eq!(idx.query_nearest(d(1444, 1, 9)).unwrap().date, d(1444, 1, 11));
        // Equidistant: 1444-01-06 is 5 days from both.
        assert_eq!(idx.query_nearest(d(1444, 1, 6)).unwrap().date, d(1444, 1, 1));
        // Outside the range, the single neighbor wins.
        assert_eq!(idx.query_nearest(d(1400, 1, 1)).unwrap().date, d(1444, 1, 1));
        assert_eq!(idx.query_nearest(d(1500, 1, 1)).unwrap().date, d(1444, 1, 11));
    }

    #[test]
    fn test_step_from_is_strict_and_bounded() {
        let idx = index(&[(1444, 11, 11), (1450, 1, 1)]);
        assert_eq!(
            idx.step_from(d(1444, 11, 11), Direction::Forward).unwrap().date,
            d(1450, 1, 1)
        );
        assert!(idx.step_from(d(1450, 1, 1), Direction::Forward).is_none());
        assert_eq!(
            idx.step_from(d(1450, 1, 1), Direction::Backward).unwrap().date,
            d(1444, 11, 11)
        );
        assert!(idx.step_from(d(1444, 11, 11), Direction::Backward).is_none());
        // From between entries, both directions find the adjacent entry.
        assert_eq!(
            idx.step_from(d(1447, 1, 1), Direction::Forward).unwrap().date,
            d(1450, 1, 1)
        );
        assert_eq!(
            idx.step_from(d(1447, 1, 1), Direction::Backward).unwrap().date,
            d(1444, 11, 11)
        );
    }

    #[test]
    fn test_set_offset_is_the_only_mutation() {
        let mut idx = index(&[(1444, 11, 11)]);
        assert!(idx.set_offset(d(1444, 11, 11), AlignOffset::default()));
        assert!(idx.query_exact(d(1444, 11, 11)).unwrap().offset.is_some());
        assert!(!idx.set_offset(d(1500, 1, 1), AlignOffset::default()));
    }

    #[test]
    fn test_archive_routes_by_channel() {
        let mut archive = SnapshotArchive::new();
        archive.insert(snap(1444, 11, 11)).unwrap();
        archive
            .insert(Snapshot::new(
                d(1444, 11, 11),
                FilterChannel::Religious,
                "religious/1444-11-11.png",
            ))
            .unwrap();
        // Same date on different channels is not a duplicate.
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.index(FilterChannel::Political).unwrap().len(), 1);
        assert!(archive.index(FilterChannel::Cultural).is_none());
        assert_eq!(archive.channels().count(), 2);
        assert_eq!(archive.earliest_date(), Some(d(1444, 11, 11)));
    }

    #[test]
    fn test_archive_json_roundtrip() {
        let mut archive = SnapshotArchive::new();
        archive.insert(snap(1444, 11, 11)).unwrap();
        archive.insert(snap(1450, 1, 1)).unwrap();
        let json = serde_json::to_string(&archive).unwrap();
        let parsed: SnapshotArchive = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, archive);
    }

    #[test]
    fn test_mixed_calendar_dates_compare_by_ordinal() {
        // A Gregorian date lands in a NoLeap-indexed channel by ordinal.
        let mut idx = index(&[(1970, 1, 1), (1970, 3, 1)]);
        let g = GameDate::new(1970, 2, 1, CalendarKind::Gregorian).unwrap();
        assert_eq!(idx.query_at_or_before(g).unwrap().date, d(1970, 1, 1));
        assert!(idx.insert(Snapshot::new(g, FilterChannel::Political, "x.png")).is_ok());
        assert_eq!(idx.len(), 3);
    }
}
