/*!
 * Observable Container Tests
 * A collection announcing element changes, built purely on the public
 * connect/emit/connection surface
 */

use pretty_assertions::assert_eq;
use sigslot::{Signal, SlotResult};
use std::sync::{Arc, Mutex};

/// Vector that fires a signal for every element added or removed
struct ObservableVec<T: 'static> {
    items: Vec<T>,
    on_add: Signal<T>,
    on_remove: Signal<T>,
}

impl<T: PartialEq + 'static> ObservableVec<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            on_add: Signal::new(),
            on_remove: Signal::new(),
        }
    }

    fn push(&mut self, value: T) -> SlotResult<()> {
        self.items.push(value);
        let value = self.items.last().expect("just pushed");
        self.on_add.emit(value)?;
        Ok(())
    }

    fn remove(&mut self, value: &T) -> SlotResult<bool> {
        match self.items.iter().position(|item| item == value) {
            Some(at) => {
                let removed = self.items.remove(at);
                self.on_remove.emit(&removed)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

struct ChangeLog {
    added: Mutex<Vec<i32>>,
    removed: Mutex<Vec<i32>>,
}

impl ChangeLog {
    fn on_add(&self, value: &i32) -> SlotResult<()> {
        self.added.lock().unwrap().push(*value);
        Ok(())
    }

    fn on_remove(&self, value: &i32) -> SlotResult<()> {
        self.removed.lock().unwrap().push(*value);
        Ok(())
    }
}

#[test]
fn test_observer_sees_adds_and_removes() {
    let log = Arc::new(ChangeLog {
        added: Mutex::new(Vec::new()),
        removed: Mutex::new(Vec::new()),
    });

    let mut vec = ObservableVec::new();
    let weak = Arc::downgrade(&log);
    vec.on_add.connect_method(&weak, ChangeLog::on_add).unwrap();
    vec.on_remove
        .connect_method(&weak, ChangeLog::on_remove)
        .unwrap();

    vec.push(1).unwrap();
    vec.push(2).unwrap();
    vec.push(3).unwrap();
    assert!(vec.remove(&2).unwrap());
    assert!(!vec.remove(&9).unwrap());

    assert_eq!(*log.added.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(*log.removed.lock().unwrap(), vec![2]);
    assert_eq!(vec.len(), 2);
}

#[test]
fn test_observer_can_unsubscribe_mid_stream() {
    let log = Arc::new(ChangeLog {
        added: Mutex::new(Vec::new()),
        removed: Mutex::new(Vec::new()),
    });

    let mut vec = ObservableVec::new();
    let weak = Arc::downgrade(&log);
    let conn = vec.on_add.connect_method(&weak, ChangeLog::on_add).unwrap();

    vec.push(10).unwrap();
    conn.disconnect();
    vec.push(20).unwrap();

    assert_eq!(*log.added.lock().unwrap(), vec![10]);
}

#[test]
fn test_unsubscribe_by_value() {
    let log = Arc::new(ChangeLog {
        added: Mutex::new(Vec::new()),
        removed: Mutex::new(Vec::new()),
    });

    let mut vec = ObservableVec::new();
    let weak = Arc::downgrade(&log);
    vec.on_add.connect_method(&weak, ChangeLog::on_add).unwrap();

    vec.push(1).unwrap();
    assert!(vec.on_add.disconnect_method(&weak, ChangeLog::on_add));
    vec.push(2).unwrap();

    assert_eq!(*log.added.lock().unwrap(), vec![1]);
}

#[test]
fn test_container_outlives_dead_observer() {
    let mut vec = ObservableVec::new();

    let log = Arc::new(ChangeLog {
        added: Mutex::new(Vec::new()),
        removed: Mutex::new(Vec::new()),
    });
    vec.on_add
        .connect_method(&Arc::downgrade(&log), ChangeLog::on_add)
        .unwrap();

    vec.push(1).unwrap();
    drop(log);

    // A dead observer is skipped, not an error
    vec.push(2).unwrap();
    assert_eq!(vec.len(), 2);
}

#[test]
fn test_closure_observers_mix_with_method_observers() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::new(ChangeLog {
        added: Mutex::new(Vec::new()),
        removed: Mutex::new(Vec::new()),
    });

    let mut vec = ObservableVec::new();
    vec.on_add
        .connect_method(&Arc::downgrade(&log), ChangeLog::on_add)
        .unwrap();
    {
        let seen = seen.clone();
        vec.on_add.connect_fn(move |value: &i32| {
            seen.lock().unwrap().push(*value * 10);
            Ok(())
        });
    }

    vec.push(4).unwrap();
    assert_eq!(*log.added.lock().unwrap(), vec![4]);
    assert_eq!(*seen.lock().unwrap(), vec![40]);
}
