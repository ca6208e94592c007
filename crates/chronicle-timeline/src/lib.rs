//! Snapshot and ruler interval indexes for Chronicle.
//!
//! Two parallel structures over the same date axis:
//!
//! - [`SnapshotIndex`] / [`SnapshotArchive`] — per-channel, date-sorted
//!   collections of map snapshots with exact / at-or-before / nearest /
//!   step queries.
//! - [`RulerTimeline`] — a non-overlapping interval index of reigns, each
//!   subdivided into contiguous rank periods.
//!
//! Both enforce their structural invariants at the mutation boundary:
//! violations are rejected *before* any state changes, so a failed insert or
//! edit leaves the index exactly as it was. All date comparisons inside go
//! through `GameDate`'s ordinal ordering.

mod error;
mod ruler_timeline;
mod snapshot_index;

pub use error::TimelineError;
pub use ruler_timeline::RulerTimeline;
pub use snapshot_index::{Direction, SnapshotArchive, SnapshotIndex};

/// Result type for timeline operations.
pub type Result<T> = std::result::Result<T, TimelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::{FilterChannel, GameDate, Rank, RankPeriod, Ruler, Snapshot};

    fn d(y: i32, m: u8, day: u8) -> GameDate {
        GameDate::no_leap(y, m, day).unwrap()
    }

    /// Random-ish insert orders keep the index sorted and at-or-before exact.
    #[test]
    fn test_sorted_invariant_under_arbitrary_insert_order() {
        let days = [400, 3, 77, 9000, 1, 250, 4999, 62];
        let mut idx = SnapshotIndex::new();
        for &n in &days {
            let date = d(1444, 1, 1).add_days(n);
            idx.insert(Snapshot::new(date, FilterChannel::Political, format!("{n}.png")))
                .unwrap();
        }
        let stored: Vec<i64> = idx.iter().map(|s| s.date.ordinal()).collect();
        let mut expected = stored.clone();
        expected.sort();
        expected.dedup();
        assert_eq!(stored, expected);

        for probe in [0, 2, 3, 80, 5000, 12000] {
            let target = d(1444, 1, 1).add_days(probe);
            let got = idx.query_at_or_before(target).map(|s| s.date.ordinal());
            let want = days
                .iter()
                .map(|&n| d(1444, 1, 1).add_days(n).ordinal())
                .filter(|&o| o <= target.ordinal())
                .max();
            assert_eq!(got, want, "probe +{probe}");
        }
    }

    /// The two indexes agree on the half-open boundary convention.
    #[test]
    fn test_succession_boundary_is_consistent() {
        let mut archive = SnapshotArchive::new();
        archive
            .insert(Snapshot::new(
                d(1450, 1, 1),
                FilterChannel::Political,
                "coronation.png",
            ))
            .unwrap();

        let mut tl = RulerTimeline::new();
        let old = Ruler::new("Murad", d(1444, 11, 11), d(1450, 1, 1)).with_rank_periods(vec![
            RankPeriod::new(Rank::Kingdom, d(1444, 11, 11), d(1450, 1, 1)),
        ]);
        let new = Ruler::new("Mehmed", d(1450, 1, 1), d(1460, 1, 1)).with_rank_periods(vec![
            RankPeriod::new(Rank::Kingdom, d(1450, 1, 1), d(1453, 5, 29)),
            RankPeriod::new(Rank::Empire, d(1453, 5, 29), d(1460, 1, 1)),
        ]);
        let new_id = new.id;
        tl.add_ruler(old).unwrap();
        tl.add_ruler(new).unwrap();

        // On succession day the snapshot, the ruler, and the rank all belong
        // to the incoming reign.
        let day = d(1450, 1, 1);
        assert!(archive.index(FilterChannel::Political).unwrap().query_exact(day).is_some());
        assert_eq!(tl.resolve_ruler_at(day).unwrap().id, new_id);
        assert_eq!(tl.resolve_rank_at(new_id, day).unwrap(), Some(Rank::Kingdom));
        // Rank boundary inside the reign also resolves to the later period.
        assert_eq!(
            tl.resolve_rank_at(new_id, d(1453, 5, 29)).unwrap(),
            Some(Rank::Empire)
        );
    }
}
