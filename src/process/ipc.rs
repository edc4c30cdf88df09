//! Message-passing primitives.
//!
//! Each process owns a fixed 16-word FIFO mailbox inside its PCB. Send
//! never blocks (a full mailbox is an error); receive on an empty
//! mailbox suspends the caller until a sender wakes it.

use core::fmt;

use super::pcb::ProcessState;
use super::ProcessManager;
use crate::log_warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpcError {
    /// Destination PID not in the process table.
    UnknownPid,
    /// Destination mailbox already holds MSG_CAPACITY words.
    QueueFull,
    /// receive() called with no current process.
    NoCurrentProcess,
    /// Mailbox empty; the caller has been blocked and flagged.
    WouldBlock,
}

impl fmt::Display for IpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IpcError::UnknownPid => "unknown pid",
            IpcError::QueueFull => "message queue full",
            IpcError::NoCurrentProcess => "no current process",
            IpcError::WouldBlock => "would block",
        };
        f.write_str(s)
    }
}

impl ProcessManager {
    /// Append `word` to the destination mailbox. A destination parked
    /// in receive() is unblocked exactly once.
    pub fn send(&mut self, dest_pid: u32, word: u32) -> Result<(), IpcError> {
        let waiting = match self.get_mut(dest_pid) {
            Some(p) => {
                if !p.mailbox.push(word) {
                    log_warn!("[IPC] message queue full for pid {}", dest_pid);
                    return Err(IpcError::QueueFull);
                }
                let was_waiting = p.waiting_for_message;
                p.waiting_for_message = false;
                was_waiting
            }
            None => {
                log_warn!("[IPC] send to unknown pid {}", dest_pid);
                return Err(IpcError::UnknownPid);
            }
        };
        if waiting {
            self.unblock(dest_pid);
        }
        Ok(())
    }

    /// Pop the oldest word from the current process's mailbox. On an
    /// empty mailbox the caller is blocked with its waiting flag set
    /// and the call fails; the next send() makes it READY again.
    pub fn receive(&mut self) -> Result<u32, IpcError> {
        let pid = match self.current_mut() {
            Some(p) => {
                if let Some(word) = p.mailbox.pop() {
                    return Ok(word);
                }
                p.waiting_for_message = true;
                p.pid
            }
            None => {
                log_warn!("[IPC] receive with no current process");
                return Err(IpcError::NoCurrentProcess);
            }
        };
        self.set_state(pid, ProcessState::Blocked);
        Err(IpcError::WouldBlock)
    }

    pub fn has_message(&self, pid: u32) -> bool {
        self.get(pid).map_or(false, |p| !p.mailbox.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryLayout, MemoryManager};
    use crate::process::pcb::{Priority, MSG_CAPACITY};

    fn setup() -> (MemoryManager, ProcessManager) {
        let mem = MemoryManager::new(MemoryLayout {
            heap_base: 0x0020_0000,
            heap_size: 0x2_0000,
            stack_size: 0x400,
            stack_count: 8,
        });
        (mem, ProcessManager::new())
    }

    #[test]
    fn send_receive_round_trip_is_fifo() {
        let (mut mem, mut pm) = setup();
        let r = pm.create(&mut mem, "r", 0, Priority::Normal, 0, 0).unwrap();
        pm.set_state(r, ProcessState::Current);
        pm.send(r, 0xAA).unwrap();
        pm.send(r, 0xBB).unwrap();
        assert!(pm.has_message(r));
        assert_eq!(pm.receive(), Ok(0xAA));
        assert_eq!(pm.receive(), Ok(0xBB));
        assert!(!pm.has_message(r));
    }

    #[test]
    fn queue_fills_at_capacity_and_rejects_the_next_word() {
        let (mut mem, mut pm) = setup();
        let r = pm.create(&mut mem, "r", 0, Priority::Normal, 0, 0).unwrap();
        for i in 0..MSG_CAPACITY as u32 {
            pm.send(r, i).unwrap();
        }
        assert_eq!(pm.send(r, 99), Err(IpcError::QueueFull));
        assert_eq!(pm.get(r).unwrap().mailbox.len(), MSG_CAPACITY);
    }

    #[test]
    fn send_to_unknown_pid_fails() {
        let (_mem, mut pm) = setup();
        assert_eq!(pm.send(42, 1), Err(IpcError::UnknownPid));
    }

    #[test]
    fn receive_with_no_current_process_fails() {
        let (_mem, mut pm) = setup();
        assert_eq!(pm.receive(), Err(IpcError::NoCurrentProcess));
    }

    #[test]
    fn empty_receive_blocks_and_send_unblocks_once() {
        let (mut mem, mut pm) = setup();
        let r = pm.create(&mut mem, "r", 0, Priority::Normal, 0, 0).unwrap();
        pm.set_state(r, ProcessState::Current);

        assert_eq!(pm.receive(), Err(IpcError::WouldBlock));
        let p = pm.get(r).unwrap();
        assert_eq!(p.state, ProcessState::Blocked);
        assert!(p.waiting_for_message);
        assert_eq!(pm.current_pid(), None);

        pm.send(r, 0xDEADBEEF).unwrap();
        let p = pm.get(r).unwrap();
        assert_eq!(p.state, ProcessState::Ready);
        assert!(!p.waiting_for_message);
        assert_eq!(p.mailbox.len(), 1);

        // A second send must not "unblock" again or touch the state.
        pm.send(r, 0x1).unwrap();
        assert_eq!(pm.get(r).unwrap().state, ProcessState::Ready);
        assert_eq!(pm.ready_len(), 1);
    }
}
