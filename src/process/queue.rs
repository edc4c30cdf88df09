//! Ready-queue list operations.
//!
//! The queue is a doubly-linked list threaded through the PCB arena by
//! slot index: sorted by non-increasing priority, FIFO within a level.
//! Links are meaningful only while a PCB is READY.

use alloc::vec::Vec;

use super::pcb::Priority;
use super::ProcessManager;

impl ProcessManager {
    /// Insert slot `idx` at its priority position: after every PCB of
    /// higher or equal priority, before the first strictly lower one.
    pub(crate) fn enqueue_ready(&mut self, idx: usize) {
        let prio = match self.priority_of(idx) {
            Some(p) => p,
            None => return,
        };
        if let Some(p) = self.slots[idx].as_mut() {
            p.prev = None;
            p.next = None;
        }

        match self.ready_head {
            None => {
                self.ready_head = Some(idx);
                self.ready_tail = Some(idx);
            }
            Some(head) if self.priority_of(head).map_or(false, |hp| prio > hp) => {
                if let Some(p) = self.slots[idx].as_mut() {
                    p.next = Some(head);
                }
                if let Some(h) = self.slots[head].as_mut() {
                    h.prev = Some(idx);
                }
                self.ready_head = Some(idx);
            }
            Some(head) => {
                // Walk to the last node whose priority is >= the new one.
                let mut cur = head;
                loop {
                    let next = self.slots[cur].as_ref().and_then(|p| p.next);
                    match next {
                        Some(n) if self.priority_of(n).map_or(false, |np| np >= prio) => cur = n,
                        _ => break,
                    }
                }
                let after = self.slots[cur].as_ref().and_then(|p| p.next);
                if let Some(p) = self.slots[idx].as_mut() {
                    p.prev = Some(cur);
                    p.next = after;
                }
                if let Some(c) = self.slots[cur].as_mut() {
                    c.next = Some(idx);
                }
                match after {
                    Some(a) => {
                        if let Some(n) = self.slots[a].as_mut() {
                            n.prev = Some(idx);
                        }
                    }
                    None => self.ready_tail = Some(idx),
                }
            }
        }
        self.ready_len += 1;
    }

    /// Remove slot `idx` from the queue. Caller guarantees it is linked.
    pub(crate) fn unlink_ready(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(p) => (p.prev, p.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(pcb) = self.slots[p].as_mut() {
                    pcb.next = next;
                }
            }
            None => self.ready_head = next,
        }
        match next {
            Some(n) => {
                if let Some(pcb) = self.slots[n].as_mut() {
                    pcb.prev = prev;
                }
            }
            None => self.ready_tail = prev,
        }
        if let Some(p) = self.slots[idx].as_mut() {
            p.prev = None;
            p.next = None;
        }
        self.ready_len -= 1;
    }

    /// PID at the head of the queue (highest priority, oldest arrival).
    pub fn peek_ready(&self) -> Option<u32> {
        self.ready_head
            .and_then(|i| self.slots[i].as_ref())
            .map(|p| p.pid)
    }

    pub fn ready_head_priority(&self) -> Option<Priority> {
        self.ready_head.and_then(|i| self.priority_of(i))
    }

    pub fn ready_len(&self) -> usize {
        self.ready_len
    }

    /// Queue contents in order, head first.
    pub fn ready_pids(&self) -> Vec<u32> {
        let mut pids = Vec::with_capacity(self.ready_len);
        let mut cur = self.ready_head;
        while let Some(i) = cur {
            match self.slots[i].as_ref() {
                Some(p) => {
                    pids.push(p.pid);
                    cur = p.next;
                }
                None => break,
            }
        }
        pids
    }

    fn priority_of(&self, idx: usize) -> Option<Priority> {
        self.slots[idx].as_ref().map(|p| p.priority)
    }
}
