use crate::log_warn;

/// Upper bound on stack slots the pool can manage.
pub const MAX_STACKS: usize = 32;

#[derive(Debug, Clone, Copy)]
struct StackSlot {
    owner: u32,
    free: bool,
}

const FREE_SLOT: StackSlot = StackSlot { owner: 0, free: true };

/// Fixed pool of per-process stacks. Slot `i` occupies
/// `region_base + i * slot_size`; a slot is owned by exactly one PID
/// from claim to release.
pub struct StackPool {
    base: u32,
    slot_size: u32,
    slot_count: usize,
    slots: [StackSlot; MAX_STACKS],
}

impl StackPool {
    pub fn new(base: u32, slot_size: u32, slot_count: usize) -> StackPool {
        StackPool {
            base,
            slot_size,
            slot_count: slot_count.min(MAX_STACKS),
            slots: [FREE_SLOT; MAX_STACKS],
        }
    }

    /// Claim the first free slot for `pid`. Returns the stack top (the
    /// address one past the slot; stacks grow downwards).
    pub fn alloc(&mut self, pid: u32) -> Option<u32> {
        for i in 0..self.slot_count {
            if self.slots[i].free {
                self.slots[i] = StackSlot { owner: pid, free: false };
                return Some(self.slot_top(i));
            }
        }
        log_warn!("[MEMORY] no free stack slot for pid {}", pid);
        None
    }

    /// Release the slot owned by `pid`. Unknown owners are a no-op.
    pub fn free(&mut self, pid: u32) -> bool {
        match self.slot_of(pid) {
            Some(i) => {
                self.slots[i] = FREE_SLOT;
                true
            }
            None => false,
        }
    }

    pub fn base_of(&self, pid: u32) -> Option<u32> {
        self.slot_of(pid).map(|i| self.slot_base(i))
    }

    pub fn top_of(&self, pid: u32) -> Option<u32> {
        self.slot_of(pid).map(|i| self.slot_top(i))
    }

    pub fn slot_size(&self) -> u32 {
        self.slot_size
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn in_use(&self) -> usize {
        self.slots[..self.slot_count].iter().filter(|s| !s.free).count()
    }

    fn slot_of(&self, pid: u32) -> Option<usize> {
        (0..self.slot_count).find(|&i| !self.slots[i].free && self.slots[i].owner == pid)
    }

    fn slot_base(&self, i: usize) -> u32 {
        self.base + i as u32 * self.slot_size
    }

    fn slot_top(&self, i: usize) -> u32 {
        self.slot_base(i) + self.slot_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u32 = 0x0200_0000;
    const SLOT: u32 = 0x4000;

    #[test]
    fn slots_are_handed_out_in_address_order() {
        let mut pool = StackPool::new(BASE, SLOT, 4);
        assert_eq!(pool.alloc(1), Some(BASE + SLOT));
        assert_eq!(pool.alloc(2), Some(BASE + 2 * SLOT));
        assert_eq!(pool.base_of(2), Some(BASE + SLOT));
        assert_eq!(pool.in_use(), 2);
    }

    #[test]
    fn released_slots_are_reused_lowest_first() {
        let mut pool = StackPool::new(BASE, SLOT, 4);
        pool.alloc(1);
        pool.alloc(2);
        pool.alloc(3);
        assert!(pool.free(2));
        assert_eq!(pool.alloc(9), Some(BASE + 2 * SLOT));
        assert_eq!(pool.top_of(9), Some(BASE + 2 * SLOT));
    }

    #[test]
    fn exhaustion_and_unknown_owner() {
        let mut pool = StackPool::new(BASE, SLOT, 2);
        pool.alloc(1);
        pool.alloc(2);
        assert_eq!(pool.alloc(3), None);
        assert!(!pool.free(42));
        assert_eq!(pool.base_of(42), None);
        assert_eq!(pool.in_use(), 2);
    }
}
