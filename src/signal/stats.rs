/*!
 * Lock-Free Signal Statistics
 * Atomic counters for zero-contention stats tracking in hot paths
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Signal statistics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalStats {
    pub total_connects: u64,
    pub total_disconnects: u64,
    pub total_dedup_hits: u64,
    pub total_emits: u64,
    pub total_invocations: u64,
    pub slots_connected: usize,
}

/// Atomic signal statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All counters use relaxed ordering
/// - Snapshot reads require no synchronization
#[repr(C, align(64))]
#[derive(Debug)]
pub struct AtomicSignalStats {
    total_connects: AtomicU64,
    total_disconnects: AtomicU64,
    total_dedup_hits: AtomicU64,
    total_emits: AtomicU64,
    total_invocations: AtomicU64,
    slots_connected: AtomicUsize,
}

impl AtomicSignalStats {
    /// Create new atomic stats
    #[inline]
    pub const fn new() -> Self {
        Self {
            total_connects: AtomicU64::new(0),
            total_disconnects: AtomicU64::new(0),
            total_dedup_hits: AtomicU64::new(0),
            total_emits: AtomicU64::new(0),
            total_invocations: AtomicU64::new(0),
            slots_connected: AtomicUsize::new(0),
        }
    }

    /// Increment connects (lock-free)
    #[inline(always)]
    pub fn inc_connects(&self) {
        self.total_connects.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment disconnects (lock-free)
    #[inline(always)]
    pub fn inc_disconnects(&self) {
        self.total_disconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment connect-time dedup hits (lock-free)
    #[inline(always)]
    pub fn inc_dedup_hits(&self) {
        self.total_dedup_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment emit passes (lock-free)
    ///
    /// # Performance
    /// Hot path - called on every emit
    #[inline(always)]
    pub fn inc_emits(&self) {
        self.total_emits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment slot invocations (lock-free)
    ///
    /// # Performance
    /// Hot path - called once per slot per emit
    #[inline(always)]
    pub fn inc_invocations(&self) {
        self.total_invocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the current live slot count
    #[inline(always)]
    pub fn set_connected(&self, count: usize) {
        self.slots_connected.store(count, Ordering::Relaxed);
    }

    /// Get a snapshot of current stats (no locks required)
    ///
    /// # Note
    /// Values may not be perfectly consistent with each other under
    /// concurrent updates, but each individual value is accurate. This is
    /// acceptable for monitoring.
    #[inline]
    pub fn snapshot(&self) -> SignalStats {
        SignalStats {
            total_connects: self.total_connects.load(Ordering::Relaxed),
            total_disconnects: self.total_disconnects.load(Ordering::Relaxed),
            total_dedup_hits: self.total_dedup_hits.load(Ordering::Relaxed),
            total_emits: self.total_emits.load(Ordering::Relaxed),
            total_invocations: self.total_invocations.load(Ordering::Relaxed),
            slots_connected: self.slots_connected.load(Ordering::Relaxed),
        }
    }
}

impl Default for AtomicSignalStats {
    fn default() -> Self {
        Self::new()
    }
}
