/*!
 * Connection Handle
 * Capability to disconnect one slot, safe across signal teardown
 */

use crate::core::types::SlotId;
use crate::signal::traits::SlotSink;
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

/// Handle returned by `connect`, used to later detach that slot.
///
/// A connection references the signal's control block weakly and never
/// keeps the signal alive. Every operation is infallible: disconnecting a
/// slot that is already gone, or a signal that has been destroyed, is an
/// expected terminal state, not an error.
///
/// Cloning duplicates the capability; clones detach the same slot and the
/// first to do so wins. Dropping a connection does not disconnect.
pub struct Connection {
    sink: Weak<dyn SlotSink>,
    id: SlotId,
    detached: AtomicBool,
}

impl Connection {
    pub(crate) fn new(sink: Weak<dyn SlotSink>, id: SlotId) -> Self {
        Self {
            sink,
            id,
            detached: AtomicBool::new(false),
        }
    }

    /// Identity of the slot this connection refers to
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Detach the referenced slot if it is still present.
    ///
    /// Idempotent: the handle goes permanently inert on the first call.
    /// When the signal has already been destroyed this is a quiet no-op.
    pub fn disconnect(&self) {
        if self.detached.swap(true, Ordering::AcqRel) {
            return;
        }

        match self.sink.upgrade() {
            Some(sink) if sink.alive() => {
                sink.remove_slot(self.id);
            }
            _ => {
                debug!("disconnect of slot {} after signal teardown", self.id);
            }
        }
    }

    /// True while the slot is still registered and the signal still exists
    pub fn is_connected(&self) -> bool {
        if self.detached.load(Ordering::Acquire) {
            return false;
        }

        // The identity check is needed on top of liveness: another clone of
        // this connection, or a by-value disconnect, may already have
        // removed the slot while the signal itself lives on.
        match self.sink.upgrade() {
            Some(sink) => sink.alive() && sink.contains_slot(self.id),
            None => false,
        }
    }
}

impl Clone for Connection {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            id: self.id,
            detached: AtomicBool::new(self.detached.load(Ordering::Acquire)),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}
