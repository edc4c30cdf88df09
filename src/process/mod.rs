pub mod ipc;
pub mod pcb;
pub mod queue;

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use crate::memory::MemoryManager;
use crate::scheduler::context::CpuContext;
use crate::{log_info, log_warn, println};

pub use ipc::IpcError;
pub use pcb::{Mailbox, Pcb, Priority, ProcessState, IDLE_PID, MSG_CAPACITY, NAME_MAX};

/// Process table capacity.
pub const MAX_PROCESSES: usize = 32;

/// Entry point handed to processes created from the shell; the linker
/// places the demo payload there.
pub const DEFAULT_ENTRY_POINT: u32 = 0x0010_0000;

/// Per-state counters returned by `stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub total: usize,
    pub ready: usize,
    pub current: usize,
    pub blocked: usize,
    pub waiting: usize,
    pub sleeping: usize,
    pub total_cpu_time: u64,
    pub total_wait_time: u64,
}

/// Owns the PCB arena, the process table bookkeeping, and the ready
/// queue threaded through it. The scheduler mutates processes only
/// through these operations.
pub struct ProcessManager {
    pub(crate) slots: Vec<Option<Pcb>>,
    pub(crate) ready_head: Option<usize>,
    pub(crate) ready_tail: Option<usize>,
    pub(crate) ready_len: usize,
    current: Option<usize>,
    next_pid: u32,
}

impl ProcessManager {
    pub fn new() -> ProcessManager {
        ProcessManager::with_capacity(MAX_PROCESSES)
    }

    /// Reduced-capacity table for exercising the full-table path.
    pub fn with_capacity(capacity: usize) -> ProcessManager {
        let mut slots = Vec::new();
        slots.resize_with(capacity, || None);
        ProcessManager {
            slots,
            ready_head: None,
            ready_tail: None,
            ready_len: 0,
            current: None,
            next_pid: IDLE_PID + 1,
        }
    }

    /// Create a process: PCB storage from the heap, a stack slot, a
    /// table slot, then a ready-queue insert. Any failure unwinds the
    /// earlier claims and returns None.
    pub fn create(
        &mut self,
        mem: &mut MemoryManager,
        name: &str,
        entry_point: u32,
        priority: Priority,
        required_time: u32,
        now: u64,
    ) -> Option<u32> {
        let heap_block = match mem.allocate(mem::size_of::<Pcb>() as u32) {
            Some(b) => b,
            None => return None,
        };
        let pid = self.next_pid;

        let stack_top = match mem.stack_alloc(pid) {
            Some(t) => t,
            None => {
                mem.free(heap_block);
                return None;
            }
        };
        let stack_size = mem.stack_size();

        let idx = match self.slots.iter().position(|s| s.is_none()) {
            Some(i) => i,
            None => {
                log_warn!("[PROCESS] process table full, cannot create '{}'", name);
                mem.stack_free(pid);
                mem.free(heap_block);
                return None;
            }
        };

        let mut display = String::from(name);
        display.truncate(NAME_MAX);
        let quantum = priority.default_quantum();
        let parent = self.current_pid().unwrap_or(IDLE_PID);

        self.slots[idx] = Some(Pcb {
            pid,
            name: display,
            state: ProcessState::Ready,
            priority,
            age: 0,
            quantum,
            remaining_quantum: quantum,
            cpu_time: 0,
            wait_time: 0,
            creation_time: now,
            required_time,
            remaining_time: required_time,
            stack_base: stack_top - stack_size,
            stack_top,
            stack_size,
            context: CpuContext::new(entry_point, stack_top, pid),
            mailbox: Mailbox::new(),
            waiting_for_message: false,
            parent,
            exit_code: 0,
            heap_block,
            prev: None,
            next: None,
        });
        self.enqueue_ready(idx);
        self.next_pid += 1;

        log_info!(
            "[PROCESS] created '{}' (pid {}) priority {} quantum {}",
            self.slots[idx].as_ref().map(|p| p.name.as_str()).unwrap_or(""),
            pid,
            priority.as_str(),
            quantum
        );
        Some(pid)
    }

    /// Tear a process down: unlink, release its stack slot, clear the
    /// table slot, release the PCB block.
    pub fn terminate(&mut self, mem: &mut MemoryManager, pid: u32) -> bool {
        let idx = match self.slot_of(pid) {
            Some(i) => i,
            None => {
                log_warn!("[PROCESS] terminate: unknown pid {}", pid);
                return false;
            }
        };
        if let Some(p) = self.slots[idx].as_ref() {
            if p.state == ProcessState::Ready {
                self.unlink_ready(idx);
            }
        }
        if self.current == Some(idx) {
            self.current = None;
        }
        let heap_block = match self.slots[idx].as_mut() {
            Some(p) => {
                p.state = ProcessState::Terminated;
                p.heap_block
            }
            None => return false,
        };
        mem.stack_free(pid);
        self.slots[idx] = None;
        mem.free(heap_block);
        log_info!("[PROCESS] terminated pid {}", pid);
        true
    }

    /// Record the exit code of the current process and terminate it.
    pub fn exit(&mut self, mem: &mut MemoryManager, code: i32) -> bool {
        let pid = match self.current.and_then(|i| self.slots[i].as_mut()) {
            Some(p) => {
                p.exit_code = code;
                p.pid
            }
            None => return false,
        };
        log_info!("[PROCESS] pid {} exited with code {}", pid, code);
        self.terminate(mem, pid)
    }

    /// The single state-transition primitive. Keeps queue membership
    /// and the current-process pointer consistent with the state:
    /// leaving READY unlinks, entering READY inserts at the priority
    /// position, entering/leaving CURRENT maintains the pointer.
    pub fn set_state(&mut self, pid: u32, new_state: ProcessState) -> bool {
        let idx = match self.slot_of(pid) {
            Some(i) => i,
            None => return false,
        };
        let old_state = match self.slots[idx].as_ref() {
            Some(p) => p.state,
            None => return false,
        };
        if old_state == new_state {
            return true;
        }

        if old_state == ProcessState::Ready {
            self.unlink_ready(idx);
        }
        if old_state == ProcessState::Current && self.current == Some(idx) {
            self.current = None;
        }
        if let Some(p) = self.slots[idx].as_mut() {
            p.state = new_state;
        }
        if new_state == ProcessState::Ready {
            self.enqueue_ready(idx);
        }
        if new_state == ProcessState::Current {
            self.current = Some(idx);
        }
        true
    }

    pub fn block(&mut self, pid: u32) -> bool {
        self.set_state(pid, ProcessState::Blocked)
    }

    pub fn unblock(&mut self, pid: u32) -> bool {
        self.set_state(pid, ProcessState::Ready)
    }

    /// Blocking state change only; there is no timer-driven wake, so
    /// the duration is advisory and waking is `unblock`.
    pub fn sleep(&mut self, pid: u32, _ticks: u32) -> bool {
        self.set_state(pid, ProcessState::Sleeping)
    }

    /// Change priority; a READY process is re-inserted at its new
    /// position (after all equal-priority entries).
    pub fn set_priority(&mut self, pid: u32, priority: Priority) -> bool {
        let idx = match self.slot_of(pid) {
            Some(i) => i,
            None => return false,
        };
        let (old, is_ready) = match self.slots[idx].as_ref() {
            Some(p) => (p.priority, p.state == ProcessState::Ready),
            None => return false,
        };
        if old == priority {
            return true;
        }
        if is_ready {
            self.unlink_ready(idx);
        }
        if let Some(p) = self.slots[idx].as_mut() {
            p.priority = priority;
        }
        if is_ready {
            self.enqueue_ready(idx);
        }
        true
    }

    /// Raise priority one level, saturating at CRITICAL.
    pub fn boost_priority(&mut self, pid: u32) -> bool {
        match self.get(pid).map(|p| p.priority) {
            Some(p) => self.set_priority(pid, p.boosted()),
            None => false,
        }
    }

    pub fn reset_age(&mut self, pid: u32) -> bool {
        match self.get_mut(pid) {
            Some(p) => {
                p.age = 0;
                true
            }
            None => false,
        }
    }

    /// One wait tick for every READY process; called once per tick so
    /// wait accounting shares the scheduler's monotonic clock.
    pub fn charge_wait_ticks(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Some(p) = slot {
                if p.state == ProcessState::Ready {
                    p.wait_time += 1;
                }
            }
        }
    }

    pub fn get(&self, pid: u32) -> Option<&Pcb> {
        self.slot_of(pid).and_then(|i| self.slots[i].as_ref())
    }

    pub fn get_mut(&mut self, pid: u32) -> Option<&mut Pcb> {
        self.slot_of(pid).and_then(move |i| self.slots[i].as_mut())
    }

    pub fn current_pid(&self) -> Option<u32> {
        self.current
            .and_then(|i| self.slots[i].as_ref())
            .map(|p| p.pid)
    }

    pub fn current(&self) -> Option<&Pcb> {
        self.current.and_then(|i| self.slots[i].as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut Pcb> {
        match self.current {
            Some(i) => self.slots[i].as_mut(),
            None => None,
        }
    }

    /// Number of live processes.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn count_by_state(&self, state: ProcessState) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|p| p.state == state)
            .count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live PIDs in table order.
    pub fn pids(&self) -> Vec<u32> {
        self.slots.iter().flatten().map(|p| p.pid).collect()
    }

    /// Counters from a single table scan; no state is mutated.
    pub fn stats(&self) -> ProcessStats {
        let mut s = ProcessStats::default();
        for p in self.slots.iter().flatten() {
            s.total += 1;
            s.total_cpu_time += p.cpu_time as u64;
            s.total_wait_time += p.wait_time as u64;
            match p.state {
                ProcessState::Ready => s.ready += 1,
                ProcessState::Current => s.current += 1,
                ProcessState::Blocked => s.blocked += 1,
                ProcessState::Waiting => s.waiting += 1,
                ProcessState::Sleeping => s.sleeping += 1,
                ProcessState::Terminated => {}
            }
        }
        s
    }

    /// `ps` table body.
    pub fn print_table(&self) {
        println!("  PID  STATE       PRI       AGE    CPU   WAIT    REM  NAME");
        println!("  ---  ----------  --------  ----  -----  -----  -----  ----");
        for p in self.slots.iter().flatten() {
            println!(
                "  {:>3}  {:10}  {:8}  {:>4}  {:>5}  {:>5}  {:>5}  {}",
                p.pid,
                p.state.as_str(),
                p.priority.as_str(),
                p.age,
                p.cpu_time,
                p.wait_time,
                p.remaining_time,
                p.name
            );
        }
        println!("  {} process(es), {} ready", self.count(), self.ready_len);
    }

    /// `info <pid>` detail dump.
    pub fn print_info(&self, pid: u32) {
        let p = match self.get(pid) {
            Some(p) => p,
            None => {
                println!("info: no such process: {}", pid);
                return;
            }
        };
        println!("Process {} '{}'", p.pid, p.name);
        println!("  state         {}", p.state.as_str());
        println!("  priority      {}", p.priority.as_str());
        println!("  age           {}", p.age);
        println!("  quantum       {} ({} remaining)", p.quantum, p.remaining_quantum);
        println!("  cpu time      {} ticks", p.cpu_time);
        println!("  wait time     {} ticks", p.wait_time);
        println!("  created at    tick {}", p.creation_time);
        println!("  required      {} ({} remaining)", p.required_time, p.remaining_time);
        println!("  stack         {:08X}..{:08X} ({} bytes)", p.stack_base, p.stack_top, p.stack_size);
        println!("  context       eip={:08X} esp={:08X}", p.context.eip, p.context.esp);
        println!("  mailbox       {} message(s){}", p.mailbox.len(), if p.waiting_for_message { ", waiting" } else { "" });
        println!("  parent        {}", p.parent);
    }

    pub(crate) fn slot_of(&self, pid: u32) -> Option<usize> {
        if pid == IDLE_PID {
            return None;
        }
        self.slots
            .iter()
            .position(|s| s.as_ref().map_or(false, |p| p.pid == pid))
    }
}
