//! Fixed-capacity ring of element slots.
//!
//! The ring holds `C + 1` slots for a queue of capacity `C`. Slots are
//! addressed by an unbounded cursor value reduced modulo the slot count, so
//! callers never compute wrapped indices themselves.
//!
//! A vacant slot is `None`. Taking an element out of a slot leaves `None`
//! behind, so storage never keeps a reference to a dequeued value.
//!
//! Each slot has its own mutex. The cursor discipline in
//! [`IndexPair`](crate::cursor::IndexPair) guarantees that at most one side
//! touches a given slot at a time, so these locks are never contended.

use std::sync::Mutex;

use crate::sync::lock;

pub(crate) struct Ring<T> {
    slots: Box<[Mutex<Option<T>>]>,
}

impl<T> Ring<T> {
    /// Creates a ring with `len` vacant slots.
    pub(crate) fn new(len: usize) -> Self {
        assert!(len > 1, "ring needs at least two slots");
        Self {
            slots: (0..len).map(|_| Mutex::new(None)).collect(),
        }
    }

    /// Number of slots, including the one kept vacant.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` at `index mod len`.
    pub(crate) fn put(&self, index: usize, value: T) {
        let mut slot = lock(&self.slots[index % self.slots.len()]);
        assert!(slot.is_none(), "slot {index} overwritten while occupied");
        *slot = Some(value);
    }

    /// Moves the element out of `index mod len`, leaving the slot vacant.
    pub(crate) fn take(&self, index: usize) -> T {
        match lock(&self.slots[index % self.slots.len()]).take() {
            Some(value) => value,
            None => panic!("slot {index} read while vacant"),
        }
    }

    /// Drops every resident element. Returns how many were dropped.
    pub(crate) fn clear(&self) -> usize {
        self.slots
            .iter()
            .map(|slot| lock(slot).take())
            .filter(Option::is_some)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn put_take_wraps_modulo_len() {
        let ring = Ring::new(3);
        ring.put(4, "a");
        assert_eq!(ring.take(1), "a");

        ring.put(2, "b");
        assert_eq!(ring.take(5), "b");
    }

    #[test]
    fn take_releases_the_element() {
        let value = Rc::new(());
        let ring = Ring::new(2);

        ring.put(1, Rc::clone(&value));
        assert_eq!(Rc::strong_count(&value), 2);

        let taken = ring.take(1);
        drop(taken);
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn clear_drops_resident_elements() {
        let value = Rc::new(());
        let ring = Ring::new(4);
        ring.put(1, Rc::clone(&value));
        ring.put(2, Rc::clone(&value));

        assert_eq!(ring.clear(), 2);
        assert_eq!(Rc::strong_count(&value), 1);
        assert_eq!(ring.clear(), 0);
    }

    #[test]
    #[should_panic(expected = "overwritten while occupied")]
    fn put_into_occupied_slot_panics() {
        let ring = Ring::new(2);
        ring.put(0, 1);
        ring.put(2, 2);
    }

    #[test]
    #[should_panic(expected = "read while vacant")]
    fn take_from_vacant_slot_panics() {
        let ring: Ring<u8> = Ring::new(2);
        ring.take(0);
    }
}
