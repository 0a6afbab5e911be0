/// Hands out texture unit indices for the active program.
///
/// Slots are allocated in increasing order starting at 0 and are never
/// freed individually: the whole allocator is reset when a new program
/// is activated, or rewound to an earlier mark when a draw wants to reuse
/// the same units for every mesh.
///
/// # Example
///
/// ```ignore
/// let mut slots = SlotAllocator::new(16);
/// let a = slots.alloc();   // Some(0)
/// let b = slots.alloc();   // Some(1)
/// slots.reset();
/// let c = slots.alloc();   // Some(0) again
/// ```
#[derive(Debug, Clone)]
pub struct SlotAllocator {
    next_id: u32,
    capacity: u32,
}

impl SlotAllocator {
    /// Create an allocator with `capacity` slots
    pub fn new(capacity: u32) -> Self {
        Self {
            next_id: 0,
            capacity,
        }
    }

    /// Allocate the next slot, or `None` when every slot is taken
    pub fn alloc(&mut self) -> Option<u32> {
        if self.next_id >= self.capacity {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        Some(id)
    }

    /// Release every slot; the next allocation returns 0
    pub fn reset(&mut self) {
        self.next_id = 0;
    }

    /// Release every slot allocated after `mark` (a previous `len()` value)
    pub fn rewind(&mut self, mark: u32) {
        debug_assert!(mark <= self.next_id, "rewinding forward: {} > {}", mark, self.next_id);
        self.next_id = self.next_id.min(mark);
    }

    /// Number of currently allocated slots (also the next slot index)
    pub fn len(&self) -> u32 {
        self.next_id
    }

    /// Whether no slots are currently allocated
    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }

    /// Total number of slots
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Slots still available
    pub fn remaining(&self) -> u32 {
        self.capacity - self.next_id
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
