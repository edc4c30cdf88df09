use lazy_static::lazy_static;
use spin::Mutex;

use crate::log_info;
use crate::memory::{MemoryLayout, MemoryManager};
use crate::process::{IpcError, Priority, ProcessManager, DEFAULT_ENTRY_POINT};
use crate::scheduler::Scheduler;

/// The three core subsystems, brought up in fixed order at boot and
/// owned together so cross-subsystem operations have one borrow seam.
pub struct Kernel {
    pub mem: MemoryManager,
    pub procs: ProcessManager,
    pub sched: Scheduler,
}

impl Kernel {
    pub fn new() -> Kernel {
        Kernel::with_layout(MemoryLayout::kernel_default())
    }

    /// Boot order: memory, then processes, then the scheduler.
    pub fn with_layout(layout: MemoryLayout) -> Kernel {
        let mem = MemoryManager::new(layout);
        let procs = ProcessManager::new();
        log_info!("[PROCESS] process table ready ({} slots)", procs.capacity());
        let mut sched = Scheduler::new();
        sched.start();
        Kernel { mem, procs, sched }
    }

    /// Create a process and let the scheduler react: an idle CPU
    /// dispatches it immediately, a lower-priority current process is
    /// preempted.
    pub fn create_process(&mut self, name: &str, priority: Priority, required_time: u32) -> Option<u32> {
        let now = self.sched.total_ticks();
        let pid = self.procs.create(
            &mut self.mem,
            name,
            DEFAULT_ENTRY_POINT,
            priority,
            required_time,
            now,
        )?;
        self.sched.maybe_preempt(&mut self.procs);
        Some(pid)
    }

    /// Advance logical time by one tick.
    pub fn tick(&mut self) {
        self.sched.tick(&mut self.procs, &mut self.mem);
    }

    pub fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn terminate(&mut self, pid: u32) -> bool {
        self.procs.terminate(&mut self.mem, pid)
    }

    /// exit() from process context: record the code, tear down, move on.
    pub fn exit(&mut self, code: i32) -> bool {
        let ok = self.procs.exit(&mut self.mem, code);
        if ok {
            self.sched.schedule(&mut self.procs);
        }
        ok
    }

    /// yield() from process context.
    pub fn yield_now(&mut self) {
        self.sched.yield_now(&mut self.procs);
    }

    pub fn send(&mut self, dest_pid: u32, word: u32) -> Result<(), IpcError> {
        self.procs.send(dest_pid, word)
    }

    /// receive() from process context; an empty mailbox suspends the
    /// caller and hands the CPU to the next ready process.
    pub fn receive(&mut self) -> Result<u32, IpcError> {
        let result = self.procs.receive();
        if result == Err(IpcError::WouldBlock) {
            self.sched.schedule(&mut self.procs);
        }
        result
    }
}

lazy_static! {
    /// The live engine behind the shell. Single-CPU cooperative model:
    /// core operations are atomic units, so this one mutex is the only
    /// monitor (and the one a multithreaded port would have to keep).
    pub static ref KERNEL: Mutex<Kernel> = Mutex::new(Kernel::new());
}

/// Force construction at a well-defined point during boot.
pub fn init() {
    let _ = KERNEL.lock();
    log_info!("[SCHEDULER] kernel core initialized");
}
