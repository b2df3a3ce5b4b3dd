/*!
 * Signal Control Block
 * Shared liveness token plus the slot table it guards
 */

use crate::core::types::{SlotId, SlotResult};
use crate::signal::stats::{AtomicSignalStats, SignalStats};
use crate::signal::traits::SlotSink;
use crate::slot::{SlotCell, SlotTable};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Control block created once per signal and shared, weakly, with every
/// connection the signal issues.
///
/// The `alive` flag is the liveness token of the connection protocol: the
/// signal stores `false` with Release ordering at the start of teardown,
/// before the table is cleared, and connections load it with Acquire
/// before touching the table. A single shared flag replaces any per-signal
/// list of outstanding connection handles.
pub(crate) struct SignalInner<A: 'static> {
    alive: AtomicBool,
    table: RwLock<SlotTable<A>>,
    stats: AtomicSignalStats,
}

impl<A: 'static> SignalInner<A> {
    pub(crate) fn new() -> Self {
        Self {
            alive: AtomicBool::new(true),
            table: RwLock::new(SlotTable::new()),
            stats: AtomicSignalStats::new(),
        }
    }

    /// Insert a cell, de-duplicating against live entries.
    ///
    /// Connecting a callable equal to an already-registered one aliases the
    /// existing slot instead of inserting a duplicate. Expired method slots
    /// are swept here, while the write lock is held anyway.
    pub(crate) fn attach(&self, cell: SlotCell<A>) -> SlotId {
        let mut table = self.table.write();

        let pruned = table.prune_expired();
        if pruned > 0 {
            debug!("pruned {} expired slots", pruned);
        }

        if let Some(existing) = table.find_match(&cell) {
            self.stats.inc_dedup_hits();
            self.stats.set_connected(table.len());
            debug!("callable already connected as slot {}, aliasing", existing);
            return existing;
        }

        let id = table.insert(cell);
        self.stats.inc_connects();
        self.stats.set_connected(table.len());
        info!("connected slot {}", id);
        id
    }

    /// Remove a slot by identity. Absent identities are a successful no-op.
    pub(crate) fn detach(&self, id: SlotId) -> bool {
        let mut table = self.table.write();
        let removed = table.remove(id);
        if removed {
            self.stats.inc_disconnects();
            self.stats.set_connected(table.len());
            info!("disconnected slot {}", id);
        }
        removed
    }

    /// Remove the slot whose cell equals `cell`, if any
    pub(crate) fn detach_matching(&self, cell: &SlotCell<A>) -> bool {
        let mut table = self.table.write();
        match table.find_match(cell) {
            Some(id) => {
                table.remove(id);
                self.stats.inc_disconnects();
                self.stats.set_connected(table.len());
                info!("disconnected slot {} by value", id);
                true
            }
            None => false,
        }
    }

    /// Fire every live slot once, in identity order, over a point-in-time
    /// snapshot.
    ///
    /// The read lock is held only while the snapshot is taken, so slots run
    /// lock-free: a slot may connect or disconnect on this same signal
    /// without deadlock, and its structural change is observed by the next
    /// pass, not this one. Fail-fast: the first slot error aborts the pass.
    pub(crate) fn emit(&self, args: &A) -> SlotResult<usize> {
        let snapshot = self.table.read().snapshot();
        self.stats.inc_emits();

        let mut invoked = 0;
        for entry in &snapshot {
            if entry.cell.is_expired() {
                debug!("slot {} receiver gone, skipping", entry.id);
                continue;
            }
            if let Err(err) = entry.cell.invoke(args) {
                warn!("slot {} failed, aborting pass: {}", entry.id, err);
                return Err(err);
            }
            invoked += 1;
            self.stats.inc_invocations();
        }

        debug!("emit reached {} of {} slots", invoked, snapshot.len());
        Ok(invoked)
    }

    pub(crate) fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Drop every slot; outstanding connections become inert
    pub(crate) fn clear(&self) -> usize {
        let mut table = self.table.write();
        let dropped = table.len();
        table.clear();
        self.stats.set_connected(0);
        if dropped > 0 {
            info!("cleared {} slots", dropped);
        }
        dropped
    }

    pub(crate) fn stats(&self) -> SignalStats {
        self.stats.snapshot()
    }

    /// Begin teardown: mark not-alive first, then drop the table contents.
    /// The Release store pairs with the Acquire load in [`SlotSink::alive`]
    /// so a racing disconnect observes the flag before the table goes away.
    pub(crate) fn shutdown(&self) {
        self.alive.store(false, Ordering::Release);
        let mut table = self.table.write();
        let dropped = table.len();
        table.clear();
        self.stats.set_connected(0);
        info!("signal shut down, {} slots dropped", dropped);
    }
}

impl<A: 'static> SlotSink for SignalInner<A> {
    fn alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    fn remove_slot(&self, id: SlotId) -> bool {
        self.detach(id)
    }

    fn contains_slot(&self, id: SlotId) -> bool {
        self.table.read().contains(id)
    }
}
