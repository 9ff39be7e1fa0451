//! Entity pool with mark-and-compact removal
//!
//! Entities are never removed in the middle of a pass. Collision code marks
//! slots as doomed, keeps iterating over the same stable slot list, and calls
//! [`EntityPool::compact`] once the pass is over. A doomed slot is skipped by
//! every accessor, so a pair can't be resolved twice and removing one member of
//! a pair never shifts the other entities out from under the loop.

use serde::{Deserialize, Serialize};

/// Stable identifier handed out by a pool, unique for the pool's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone)]
struct Slot<T> {
    id: EntityId,
    doomed: bool,
    value: T,
}

/// Owning collection of one kind of movable entity
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    next_id: u32,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Append an entity. Index-based passes that captured `slot_count()`
    /// beforehand won't visit it until the next pass.
    pub fn add(&mut self, value: T) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            doomed: false,
            value,
        });
        id
    }

    /// Number of live (unmarked) entities
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.doomed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots including doomed ones; the bound for index-based passes
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Live entity in slot `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots
            .get(index)
            .filter(|s| !s.doomed)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots
            .get_mut(index)
            .filter(|s| !s.doomed)
            .map(|s| &mut s.value)
    }

    /// Mark slot `index` for removal at the next compaction.
    /// Returns false if the slot was already doomed or doesn't exist.
    pub fn mark(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if !slot.doomed => {
                slot.doomed = true;
                true
            }
            _ => false,
        }
    }

    /// Drop every doomed slot, preserving the order of survivors
    pub fn compact(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| !s.doomed);
        before - self.slots.len()
    }

    /// Mark every live entity matching `predicate`, then compact
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        for slot in self.slots.iter_mut().filter(|s| !s.doomed) {
            if predicate(&slot.value) {
                slot.doomed = true;
            }
        }
        self.compact()
    }

    pub fn for_each(&self, mut visitor: impl FnMut(EntityId, &T)) {
        for slot in self.slots.iter().filter(|s| !s.doomed) {
            visitor(slot.id, &slot.value);
        }
    }

    pub fn for_each_mut(&mut self, mut visitor: impl FnMut(EntityId, &mut T)) {
        for slot in self.slots.iter_mut().filter(|s| !s.doomed) {
            visitor(slot.id, &mut slot.value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| !s.doomed).map(|s| &s.value)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots
            .iter_mut()
            .filter(|s| !s.doomed)
            .map(|s| &mut s.value)
    }

    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    pub fn first_mut(&mut self) -> Option<&mut T> {
        self.iter_mut().next()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut pool = EntityPool::new();
        let a = pool.add('a');
        let b = pool.add('b');
        pool.remove_where(|c| *c == 'a');
        let c = pool.add('c');
        assert!(a < b && b < c);
        assert_eq!(pool.iter().copied().collect::<String>(), "bc");
    }

    #[test]
    fn test_marked_slots_are_invisible_until_compacted() {
        let mut pool = EntityPool::new();
        for n in 0..4 {
            pool.add(n);
        }
        assert!(pool.mark(1));
        assert!(!pool.mark(1), "double mark is refused");
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.slot_count(), 4);
        assert_eq!(pool.get(1), None);
        assert_eq!(pool.get(2), Some(&2));

        assert_eq!(pool.compact(), 1);
        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn test_removal_during_pass_visits_every_survivor_once() {
        // Removing adjacent elements mid-pass is exactly what skips entities
        // when splicing a vector in place.
        let mut pool = EntityPool::new();
        for n in 0..6 {
            pool.add(n);
        }
        let mut visited = Vec::new();
        for i in 0..pool.slot_count() {
            let Some(&n) = pool.get(i) else { continue };
            visited.push(n);
            if n % 2 == 0 {
                pool.mark(i);
                pool.mark(i + 1);
            }
        }
        pool.compact();
        assert_eq!(visited, vec![0, 2, 4]);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_entities_added_mid_pass_wait_for_next_pass() {
        let mut pool = EntityPool::new();
        pool.add(1);
        let count = pool.slot_count();
        let mut visits = 0;
        for i in 0..count {
            if pool.get(i).is_some() {
                visits += 1;
                pool.add(2);
            }
        }
        assert_eq!(visits, 1);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_for_each_mut_and_first() {
        let mut pool = EntityPool::new();
        pool.add(1);
        pool.add(2);
        pool.mark(0);
        pool.for_each_mut(|_, n| *n *= 10);
        assert_eq!(pool.first(), Some(&20));
        let mut seen = Vec::new();
        pool.for_each(|id, n| seen.push((id, *n)));
        assert_eq!(seen, vec![(EntityId(2), 20)]);
    }
}
