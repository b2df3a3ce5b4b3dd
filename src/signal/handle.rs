/*!
 * Signal Handle
 * Public registration and firing surface
 */

use crate::core::errors::SlotError;
use crate::core::types::SlotResult;
use crate::signal::connection::Connection;
use crate::signal::inner::SignalInner;
use crate::signal::stats::SignalStats;
use crate::signal::traits::SlotSink;
use crate::slot::{SlotCell, SlotKind};
use std::sync::{Arc, Weak};

/// Thread-safe signal: an identity-ordered set of slots fired together.
///
/// `A` is the argument payload handed by reference to every slot. The
/// signal is the sole owner of its slot table; connections reference it
/// weakly, so destruction order between signal and connections is free.
pub struct Signal<A: 'static> {
    inner: Arc<SignalInner<A>>,
}

impl<A: 'static> Signal<A> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner::new()),
        }
    }

    /// Connect a plain function.
    ///
    /// Connecting a function that is already registered aliases the
    /// existing slot: the table gains no entry and the returned connection
    /// refers to the prior registration.
    pub fn connect(&self, func: fn(&A) -> SlotResult<()>) -> Connection {
        self.attach(SlotCell::function(func))
    }

    /// Connect a method on a weakly-held receiver.
    ///
    /// Fails with [`SlotError::InvalidCallable`] when the receiver is
    /// already dead. The same (receiver, method) pair registered twice
    /// aliases the existing slot.
    pub fn connect_method<R>(
        &self,
        receiver: &Weak<R>,
        method: fn(&R, &A) -> SlotResult<()>,
    ) -> SlotResult<Connection>
    where
        R: Send + Sync + 'static,
    {
        Ok(self.attach(SlotCell::method(receiver, method)?))
    }

    /// Connect an arbitrary closure. Distinct closures never alias.
    pub fn connect_fn<F>(&self, func: F) -> Connection
    where
        F: Fn(&A) -> SlotResult<()> + Send + Sync + 'static,
    {
        self.attach(SlotCell::closure(func))
    }

    /// Connect a pre-built cell.
    ///
    /// Fails with [`SlotError::InvalidCallable`] for an empty cell; the
    /// table never holds a cell that cannot execute.
    pub fn connect_cell(&self, cell: SlotCell<A>) -> SlotResult<Connection> {
        if cell.kind() == SlotKind::Empty {
            return Err(SlotError::InvalidCallable(
                "an empty cell cannot be connected".to_string(),
            ));
        }
        Ok(self.attach(cell))
    }

    fn attach(&self, cell: SlotCell<A>) -> Connection {
        let id = self.inner.attach(cell);
        let sink: Arc<dyn SlotSink> = self.inner.clone();
        let sink: Weak<dyn SlotSink> = Arc::downgrade(&sink);
        Connection::new(sink, id)
    }

    /// Fire the signal.
    ///
    /// Every live slot runs once, in identity order, over a snapshot taken
    /// at the start of the pass; structural changes made by slots apply to
    /// the next pass. Returns the number of slots invoked. Fail-fast: the
    /// first slot error aborts the pass, skipping the slots after it, and
    /// surfaces to the caller.
    pub fn emit(&self, args: &A) -> SlotResult<usize> {
        self.inner.emit(args)
    }

    /// Remove the slot holding `func`, if any
    pub fn disconnect_fn(&self, func: fn(&A) -> SlotResult<()>) -> bool {
        self.inner.detach_matching(&SlotCell::function(func))
    }

    /// Remove the slot bound to (`receiver`, `method`), if any.
    ///
    /// A receiver that is already dead cannot be named this way; its slot
    /// is swept on the next connect instead.
    pub fn disconnect_method<R>(
        &self,
        receiver: &Weak<R>,
        method: fn(&R, &A) -> SlotResult<()>,
    ) -> bool
    where
        R: Send + Sync + 'static,
    {
        match SlotCell::method(receiver, method) {
            Ok(cell) => self.inner.detach_matching(&cell),
            Err(_) => false,
        }
    }

    /// Number of registered slots
    pub fn slot_count(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Drop every slot. Outstanding connections become inert.
    pub fn clear(&self) -> usize {
        self.inner.clear()
    }

    /// Get signal statistics
    pub fn stats(&self) -> SignalStats {
        self.inner.stats()
    }
}

impl<A: 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Drop for Signal<A> {
    fn drop(&mut self) {
        // Liveness goes first so connections racing this teardown observe
        // a dead signal before the table is torn down.
        self.inner.shutdown();
    }
}
