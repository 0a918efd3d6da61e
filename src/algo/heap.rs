//! Binary min-heap over vertex indices with decrease-key.
//!
//! Each item has at most one slot; a position map tracks where it sits.

const NOT_QUEUED: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Slot {
    key: f32,
    item: u32,
}

/// Min-heap keyed by `f32`, holding each item (`0..capacity`) at most once.
#[derive(Debug, Clone)]
pub(crate) struct IndexedMinHeap {
    slots: Vec<Slot>,
    position: Vec<u32>,
}

impl IndexedMinHeap {
    /// Create an empty heap able to hold items `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            position: vec![NOT_QUEUED; capacity],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn contains(&self, item: usize) -> bool {
        self.position[item] != NOT_QUEUED
    }

    /// Remove every queued item.
    pub fn clear(&mut self) {
        for slot in &self.slots {
            self.position[slot.item as usize] = NOT_QUEUED;
        }
        self.slots.clear();
    }

    /// Insert `item`, or update its key if it is already queued.
    pub fn push(&mut self, item: usize, key: f32) {
        if self.contains(item) {
            self.change_key(item, key);
            return;
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            key,
            item: item as u32,
        });
        self.position[item] = index as u32;
        self.sift_up(index);
    }

    /// Change the key of a queued item, moving it up or down as needed.
    pub fn change_key(&mut self, item: usize, key: f32) {
        let index = self.position[item];
        if index == NOT_QUEUED {
            return;
        }
        let index = index as usize;
        let old = self.slots[index].key;
        self.slots[index].key = key;
        if key < old {
            self.sift_up(index);
        } else {
            self.sift_down(index);
        }
    }

    /// Remove and return the item with the smallest key.
    pub fn pop(&mut self) -> Option<(usize, f32)> {
        let last = self.slots.pop()?;
        let top = if self.slots.is_empty() {
            last
        } else {
            let top = self.slots[0];
            self.slots[0] = last;
            self.position[last.item as usize] = 0;
            self.sift_down(0);
            top
        };
        self.position[top.item as usize] = NOT_QUEUED;
        Some((top.item as usize, top.key))
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[index].key < self.slots[parent].key {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.slots[left].key < self.slots[smallest].key {
                smallest = left;
            }
            if right < len && self.slots[right].key < self.slots[smallest].key {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.position[self.slots[a].item as usize] = a as u32;
        self.position[self.slots[b].item as usize] = b as u32;
    }
}
