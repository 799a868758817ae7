//! Debug-only structural version stamp.
//!
//! A map bumps its stamp on every structural change (insert, erase,
//! clear, rebuild). Cursors capture the stamp when they are created and
//! assert it on use, so a stale cursor panics in debug builds. In release
//! builds this compiles to a zero-sized no-op and stale cursors are not
//! detected.

/// Per-map version tracker.
#[derive(Clone, Debug)]
pub(crate) struct DebugStamp {
    #[cfg(debug_assertions)]
    version: u64,
}

/// Version captured by a cursor at creation time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct StampSnapshot {
    #[cfg(debug_assertions)]
    version: u64,
}

impl DebugStamp {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            version: 0,
        }
    }

    /// Record a structural change. Outstanding snapshots become stale.
    #[inline]
    pub(crate) fn bump(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.version = self.version.wrapping_add(1);
        }
    }

    #[inline]
    pub(crate) fn snapshot(&self) -> StampSnapshot {
        StampSnapshot {
            #[cfg(debug_assertions)]
            version: self.version,
        }
    }

    /// Panics in debug builds if `snap` predates the latest structural change.
    #[inline]
    #[cfg_attr(not(debug_assertions), allow(unused_variables))]
    pub(crate) fn check(&self, snap: StampSnapshot) {
        #[cfg(debug_assertions)]
        assert_eq!(
            snap.version, self.version,
            "stale cursor: map was modified after the cursor was created"
        );
    }
}

impl Default for DebugStamp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::DebugStamp;

    #[test]
    fn fresh_snapshot_passes() {
        let mut s = DebugStamp::new();
        s.bump();
        let snap = s.snapshot();
        s.check(snap);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn stale_snapshot_panics_in_debug() {
        let mut s = DebugStamp::new();
        let snap = s.snapshot();
        s.bump();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| s.check(snap)));
        assert!(res.is_err(), "expected stale snapshot to panic in debug builds");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn stale_snapshot_is_noop_in_release() {
        let mut s = DebugStamp::new();
        let snap = s.snapshot();
        s.bump();
        s.check(snap);
    }
}
