// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::ops::{
    Index,
    IndexMut,
};

use crate::errs::StrataError;

/// A stable handle into an [`Arena`]. Handles stay valid until the slot is
/// released; the engines never hand them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(u32);

impl SlotId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<u32> },
}

/// Flat slot storage for nodes and cells. Released slots are threaded onto an
/// intrusive free list so that releasing never allocates and later
/// allocations reuse them before the backing vector grows.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    live: usize,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Number of occupied slots, sentinels included.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Makes sure the next `additional` allocations cannot fail.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), StrataError> {
        let vacant = self.slots.len() - self.live;
        if additional <= vacant {
            return Ok(());
        }
        let needed = additional - vacant;
        if self.slots.len() + needed > u32::MAX as usize {
            return Err(StrataError::OutOfMemory);
        }
        self.slots.try_reserve(needed)?;
        Ok(())
    }

    pub(crate) fn alloc(&mut self, value: T) -> Result<SlotId, StrataError> {
        self.alloc_with(|_| value)
    }

    /// Allocates a value that needs to know its own handle, e.g. a sentinel
    /// linking to itself.
    pub(crate) fn alloc_with<F>(&mut self, build: F) -> Result<SlotId, StrataError>
    where
        F: FnOnce(SlotId) -> T, {
        if let Some(idx) = self.free_head {
            let value = build(SlotId(idx));
            let slot = &mut self.slots[idx as usize];
            self.free_head = match slot {
                | Slot::Vacant { next_free } => *next_free,
                | Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            };
            *slot = Slot::Occupied(value);
            self.live += 1;
            return Ok(SlotId(idx));
        }

        if self.slots.len() >= u32::MAX as usize {
            return Err(StrataError::OutOfMemory);
        }
        self.slots.try_reserve(1)?;
        let idx = self.slots.len() as u32;
        self.slots.push(Slot::Occupied(build(SlotId(idx))));
        self.live += 1;
        Ok(SlotId(idx))
    }

    /// Returns the slot to the free list and hands back its value.
    ///
    /// # Panics
    ///
    /// Releasing a vacant slot is a double free and panics.
    pub(crate) fn release(&mut self, id: SlotId) -> T {
        let slot = std::mem::replace(
            &mut self.slots[id.index()],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        match slot {
            | Slot::Occupied(value) => {
                self.free_head = Some(id.0);
                self.live -= 1;
                value
            },
            | Slot::Vacant { .. } => panic!("double release of slot {}", id.0),
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<SlotId> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: SlotId) -> &T {
        match &self.slots[id.index()] {
            | Slot::Occupied(value) => value,
            | Slot::Vacant { .. } => panic!("dangling handle to slot {}", id.0),
        }
    }
}

impl<T> IndexMut<SlotId> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match &mut self.slots[id.index()] {
            | Slot::Occupied(value) => value,
            | Slot::Vacant { .. } => panic!("dangling handle to slot {}", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;

    #[test]
    fn test_alloc_and_index() {
        let mut arena = Arena::new();
        let a = arena.alloc("a").unwrap();
        let b = arena.alloc("b").unwrap();
        assert_eq!(arena[a], "a");
        assert_eq!(arena[b], "b");
        assert_eq!(arena.live(), 2);

        arena[a] = "z";
        assert_eq!(arena[a], "z");
    }

    #[test]
    fn test_release_reuses_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc(1).unwrap();
        let b = arena.alloc(2).unwrap();
        assert_eq!(arena.release(a), 1);
        assert_eq!(arena.release(b), 2);
        assert_eq!(arena.live(), 0);

        // most recently released slot comes back first
        let c = arena.alloc(3).unwrap();
        let d = arena.alloc(4).unwrap();
        assert_eq!(c, b);
        assert_eq!(d, a);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn test_reserve_counts_vacant_slots() {
        let mut arena = Arena::new();
        let ids: Vec<_> = (0..8).map(|i| arena.alloc(i).unwrap()).collect();
        for id in ids {
            arena.release(id);
        }
        assert!(arena.reserve(8).is_ok());
        assert!(arena.reserve(64).is_ok());
    }

    #[test]
    fn test_alloc_with_sees_own_handle() {
        let mut arena = Arena::new();
        let a = arena.alloc_with(Some).unwrap();
        assert_eq!(arena[a], Some(a));

        arena.release(a);
        let b = arena.alloc_with(Some).unwrap();
        assert_eq!(b, a);
        assert_eq!(arena[b], Some(b));
    }

    #[test]
    #[should_panic]
    fn test_double_release_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1).unwrap();
        arena.release(a);
        arena.release(a);
    }

    #[test]
    #[should_panic]
    fn test_dangling_index_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1).unwrap();
        arena.release(a);
        let _value: i32 = arena[a];
    }
}
