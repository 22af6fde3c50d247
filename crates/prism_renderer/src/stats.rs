//! Ray counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by every ray the [`World`](crate::World) casts.
///
/// Relaxed atomics, shared by all render threads.
#[derive(Debug, Default)]
pub struct RayStats {
    primary: AtomicU64,
    hit_tests: AtomicU64,
    shadow_tests: AtomicU64,
}

/// A point-in-time copy of [`RayStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RayCounts {
    pub primary: u64,
    pub hit_tests: u64,
    pub shadow_tests: u64,
}

impl RayStats {
    pub(crate) fn record_primary(&self) {
        self.primary.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit_test(&self) {
        self.hit_tests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_shadow_test(&self) {
        self.shadow_tests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RayCounts {
        RayCounts {
            primary: self.primary.load(Ordering::Relaxed),
            hit_tests: self.hit_tests.load(Ordering::Relaxed),
            shadow_tests: self.shadow_tests.load(Ordering::Relaxed),
        }
    }
}

impl RayCounts {
    /// Counts accumulated since `earlier`. Counters never run backwards, so
    /// passing a later snapshot as `earlier` yields zeros.
    pub fn since(&self, earlier: &RayCounts) -> RayCounts {
        RayCounts {
            primary: self.primary.saturating_sub(earlier.primary),
            hit_tests: self.hit_tests.saturating_sub(earlier.hit_tests),
            shadow_tests: self.shadow_tests.saturating_sub(earlier.shadow_tests),
        }
    }
}
