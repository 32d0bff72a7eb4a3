//! Free-list slot container
//!
//! Slots are addressed by stable index. Removing an entry only marks its slot
//! free; inserting scans for the first free slot before growing the backing
//! array by a fixed batch.

/// Slots added whenever every existing slot is occupied
pub const ARENA_GROWTH: usize = 10;

#[derive(Debug, Clone)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` in the lowest free slot, growing by a batch if none is free
    pub fn insert(&mut self, value: T) -> usize {
        let slot = match self.slots.iter().position(Option::is_none) {
            Some(slot) => slot,
            None => {
                let slot = self.slots.len();
                self.slots.resize_with(slot + ARENA_GROWTH, || None);
                slot
            }
        };
        self.slots[slot] = Some(value);
        slot
    }

    /// Mark a slot free. The backing array never shrinks.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Active entries with their slot index
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Number of active entries
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Total slots, active or not
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
