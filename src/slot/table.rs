/*!
 * Slot Table
 * Ordered, identity-addressable storage for registered slots
 */

use crate::core::id::SlotIdGenerator;
use crate::core::types::SlotId;
use crate::slot::cell::SlotCell;

/// One table entry: a slot identity and its callback cell
pub struct SlotEntry<A: 'static> {
    pub id: SlotId,
    pub cell: SlotCell<A>,
}

impl<A: 'static> Clone for SlotEntry<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: self.cell.clone(),
        }
    }
}

/// Slot storage kept sorted by identity.
///
/// Identities come from the table's own generator, so insertion order and
/// identity order coincide and a single key serves both lookup and firing
/// order. Removal never renumbers survivors.
pub struct SlotTable<A: 'static> {
    entries: Vec<SlotEntry<A>>,
    ids: SlotIdGenerator,
}

impl<A: 'static> SlotTable<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: SlotIdGenerator::new(),
        }
    }

    /// Insert a cell and return its new identity.
    ///
    /// Identities are monotonic, so the binary-search insertion point is in
    /// practice the tail; the search keeps the sorted invariant explicit.
    pub fn insert(&mut self, cell: SlotCell<A>) -> SlotId {
        let id = self.ids.next();
        let at = self.entries.partition_point(|entry| entry.id < id);
        self.entries.insert(at, SlotEntry { id, cell });
        id
    }

    /// Remove an entry by identity. Absent identities are a no-op, not an
    /// error: disconnection racing signal teardown is expected.
    pub fn remove(&mut self, id: SlotId) -> bool {
        match self.entries.binary_search_by_key(&id, |entry| entry.id) {
            Ok(at) => {
                self.entries.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    /// Whether an identity is still registered
    pub fn contains(&self, id: SlotId) -> bool {
        self.entries
            .binary_search_by_key(&id, |entry| entry.id)
            .is_ok()
    }

    /// Find a registered entry equal to `cell` (connect-time dedup)
    pub fn find_match(&self, cell: &SlotCell<A>) -> Option<SlotId> {
        self.entries
            .iter()
            .find(|entry| entry.cell == *cell)
            .map(|entry| entry.id)
    }

    /// Point-in-time copy of the table for a firing pass
    pub fn snapshot(&self) -> Vec<SlotEntry<A>> {
        self.entries.clone()
    }

    /// Drop entries whose method receiver has died
    pub fn prune_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.cell.is_expired());
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<A: 'static> Default for SlotTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SlotResult;

    fn noop(_args: &i32) -> SlotResult<()> {
        Ok(())
    }

    #[test]
    fn test_insert_assigns_increasing_identities() {
        let mut table = SlotTable::new();
        let a = table.insert(SlotCell::<i32>::closure(|_| Ok(())));
        let b = table.insert(SlotCell::closure(|_| Ok(())));
        let c = table.insert(SlotCell::closure(|_| Ok(())));

        assert!(a < b && b < c);
        assert_eq!(table.len(), 3);

        let order: Vec<_> = table.snapshot().iter().map(|entry| entry.id).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn test_remove_is_idempotent_and_keeps_order() {
        let mut table = SlotTable::new();
        let a = table.insert(SlotCell::<i32>::closure(|_| Ok(())));
        let b = table.insert(SlotCell::closure(|_| Ok(())));
        let c = table.insert(SlotCell::closure(|_| Ok(())));

        assert!(table.remove(b));
        assert!(!table.remove(b));
        assert!(!table.remove(999));

        let order: Vec<_> = table.snapshot().iter().map(|entry| entry.id).collect();
        assert_eq!(order, vec![a, c]);
        assert!(table.contains(a));
        assert!(!table.contains(b));
    }

    #[test]
    fn test_identities_are_never_reused() {
        let mut table = SlotTable::new();
        let a = table.insert(SlotCell::<i32>::function(noop));
        table.remove(a);
        let b = table.insert(SlotCell::function(noop));
        assert!(b > a);
    }

    #[test]
    fn test_find_match() {
        let mut table = SlotTable::new();
        let id = table.insert(SlotCell::function(noop));
        table.insert(SlotCell::closure(|_| Ok(())));

        assert_eq!(table.find_match(&SlotCell::function(noop)), Some(id));
        assert_eq!(table.find_match(&SlotCell::closure(|_| Ok(()))), None);
    }

    #[test]
    fn test_prune_expired() {
        use std::sync::{Arc, Mutex};

        struct Probe {
            hits: Mutex<u32>,
        }

        impl Probe {
            fn touch(&self, _args: &i32) -> SlotResult<()> {
                *self.hits.lock().unwrap() += 1;
                Ok(())
            }
        }

        let probe = Arc::new(Probe {
            hits: Mutex::new(0),
        });

        let mut table = SlotTable::new();
        table.insert(SlotCell::method(&Arc::downgrade(&probe), Probe::touch).unwrap());
        let kept = table.insert(SlotCell::function(noop));

        assert_eq!(table.prune_expired(), 0);

        drop(probe);
        assert_eq!(table.prune_expired(), 1);
        assert_eq!(table.len(), 1);
        assert!(table.contains(kept));
    }

    #[test]
    fn test_snapshot_is_isolated_from_mutation() {
        let mut table = SlotTable::new();
        let a = table.insert(SlotCell::<i32>::closure(|_| Ok(())));
        let snapshot = table.snapshot();

        table.insert(SlotCell::closure(|_| Ok(())));
        table.remove(a);

        let order: Vec<_> = snapshot.iter().map(|entry| entry.id).collect();
        assert_eq!(order, vec![a]);
    }
}
