//! Retention policies and time windows for location records.
//!
//! Two count-based bounds apply to per-subject durable history, and they
//! are deliberately kept as two distinct named policies: they serve
//! different call sites with different enforcement timing. The direct
//! write path checks its bound synchronously before every insert; the
//! archival sweep defers enforcement until a subject passes a higher
//! trigger, so a sweep does not delete on every run.

use std::time::Duration;

/// Count-based retention bound for per-subject durable history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Record count at which enforcement engages.
    pub threshold: usize,
    /// Records retained once enforcement runs.
    pub keep: usize,
}

impl RetentionPolicy {
    /// Records to delete before inserting one more, so the subject ends at
    /// or below `threshold` after the insert while keeping `keep` existing
    /// records. Zero while the pre-insert count is below the threshold.
    ///
    /// Used by the direct write path, which enforces on every insert.
    pub const fn surplus_before_insert(&self, existing: usize) -> usize {
        if existing >= self.threshold {
            existing - self.keep
        } else {
            0
        }
    }

    /// Records above `keep` once the count strictly exceeds the threshold;
    /// zero otherwise.
    ///
    /// Used by the archival path, which enforces in deferred batches: no
    /// deletes happen until the count passes `threshold`, and enforcement
    /// then trims all the way down to `keep`.
    pub const fn excess(&self, count: usize) -> usize {
        if count > self.threshold {
            count - self.keep
        } else {
            0
        }
    }
}

/// Synchronous bound for direct durable writes: once a subject holds 10
/// records, the oldest are deleted so 9 remain before the new insert.
pub const DIRECT_WRITE: RetentionPolicy = RetentionPolicy {
    threshold: 10,
    keep: 9,
};

/// Deferred bound for the archival sweep: a subject is trimmed to its 30
/// most recent records only once it exceeds 35.
pub const ARCHIVE_SWEEP: RetentionPolicy = RetentionPolicy {
    threshold: 35,
    keep: 30,
};

/// Lifetime of a live cache entry, measured from its last write.
pub const LIVE_LOCATION_TTL: Duration = Duration::from_secs(600);

/// Age at or below which a live reading is reported as recent.
pub const RECENT_WINDOW: Duration = Duration::from_secs(300);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_direct_write_below_threshold_deletes_nothing() {
        for existing in 0..10 {
            assert_eq!(DIRECT_WRITE.surplus_before_insert(existing), 0);
        }
    }

    #[test]
    fn test_direct_write_at_threshold_makes_room_for_one() {
        // 10 existing: delete 1, keep 9, insert 1 -> 10 total.
        assert_eq!(DIRECT_WRITE.surplus_before_insert(10), 1);
        // 12 existing (e.g. the cap was raised historically): delete 3.
        assert_eq!(DIRECT_WRITE.surplus_before_insert(12), 3);
    }

    #[test]
    fn test_archive_sweep_trigger_is_strict() {
        assert_eq!(ARCHIVE_SWEEP.excess(35), 0);
        assert_eq!(ARCHIVE_SWEEP.excess(36), 6);
        assert_eq!(ARCHIVE_SWEEP.excess(40), 10);
    }

    #[test]
    fn test_policies_are_distinct() {
        assert_ne!(DIRECT_WRITE, ARCHIVE_SWEEP);
    }

    proptest! {
        #[test]
        fn prop_direct_insert_never_exceeds_threshold(existing in 0usize..1000) {
            let surplus = DIRECT_WRITE.surplus_before_insert(existing);
            let after_insert = existing - surplus + 1;
            prop_assert!(after_insert <= DIRECT_WRITE.threshold);
        }

        #[test]
        fn prop_archive_enforcement_lands_on_keep(count in 0usize..1000) {
            let excess = ARCHIVE_SWEEP.excess(count);
            let after = count - excess;
            if count > ARCHIVE_SWEEP.threshold {
                prop_assert_eq!(after, ARCHIVE_SWEEP.keep);
            } else {
                prop_assert_eq!(after, count);
            }
        }
    }
}
