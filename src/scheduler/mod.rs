pub mod context;
pub mod policy;

use crate::memory::MemoryManager;
use crate::process::{Priority, ProcessManager, ProcessState};
use crate::{log_info, println};
use context::CpuContext;
pub use policy::SchedPolicy;

/// Bounds for every quantum value accepted at runtime.
pub const MIN_QUANTUM: u32 = 10;
pub const MAX_QUANTUM: u32 = 1000;

/// Runtime-mutable scheduling parameters.
#[derive(Debug, Clone, Copy)]
pub struct SchedConfig {
    pub policy: SchedPolicy,
    pub default_quantum: u32,
    pub aging_enabled: bool,
    pub aging_threshold: u32,
    pub aging_boost_interval: u32,
    pub preemption_enabled: bool,
}

impl Default for SchedConfig {
    fn default() -> SchedConfig {
        SchedConfig {
            policy: SchedPolicy::Priority,
            default_quantum: 100,
            aging_enabled: true,
            aging_threshold: 100,
            aging_boost_interval: 50,
            preemption_enabled: true,
        }
    }
}

/// Monotonic counters; only `reset_stats` may move them backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedStats {
    pub total_ticks: u64,
    pub idle_ticks: u64,
    pub context_switches: u64,
    pub preemptions: u64,
    pub voluntary_yields: u64,
    pub aging_boosts: u64,
}

/// Tick-driven scheduler: quantum accounting, policy selection,
/// context-switch bookkeeping and priority aging. All process and
/// queue mutation goes through the process manager's operations.
pub struct Scheduler {
    running: bool,
    time_slice_remaining: u32,
    /// Simulated live register file; save/restore move records between
    /// here and the PCBs.
    cpu: CpuContext,
    config: SchedConfig,
    stats: SchedStats,
}

impl Scheduler {
    pub fn new() -> Scheduler {
        Scheduler {
            running: false,
            time_slice_remaining: 0,
            cpu: CpuContext::empty(),
            config: SchedConfig::default(),
            stats: SchedStats::default(),
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        log_info!(
            "[SCHEDULER] started: policy {}, preemption {}, aging {}",
            self.config.policy.as_str(),
            if self.config.preemption_enabled { "on" } else { "off" },
            if self.config.aging_enabled { "on" } else { "off" }
        );
    }

    pub fn stop(&mut self) {
        self.running = false;
        log_info!("[SCHEDULER] stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One logical tick. Order is fixed: CPU accounting, completion
    /// check, quantum decrement, preemption decision, periodic aging.
    pub fn tick(&mut self, procs: &mut ProcessManager, mem: &mut MemoryManager) {
        if !self.running {
            return;
        }
        self.stats.total_ticks += 1;
        procs.charge_wait_ticks();

        let billed = match procs.current_mut() {
            Some(p) => {
                p.cpu_time += 1;
                if p.required_time > 0 {
                    p.remaining_time = p.remaining_time.saturating_sub(1);
                }
                Some((p.pid, p.required_time > 0 && p.cpu_time >= p.required_time))
            }
            None => None,
        };
        let (pid, completed) = match billed {
            Some(v) => v,
            None => {
                self.stats.idle_ticks += 1;
                self.schedule(procs);
                return;
            }
        };

        if completed {
            if let Some(p) = procs.get(pid) {
                log_info!(
                    "[SCHEDULER] process '{}' (pid {}) completed after {} ticks",
                    p.name,
                    pid,
                    p.cpu_time
                );
            }
            procs.terminate(mem, pid);
            self.schedule(procs);
            return;
        }

        if self.time_slice_remaining > 0 {
            self.time_slice_remaining -= 1;
            if let Some(p) = procs.current_mut() {
                p.remaining_quantum = self.time_slice_remaining;
            }
            if self.config.preemption_enabled && self.time_slice_remaining == 0 {
                self.stats.preemptions += 1;
                self.schedule(procs);
                return;
            }
        }

        if self.config.aging_enabled
            && self.stats.total_ticks % self.config.aging_boost_interval as u64 == 0
        {
            self.check_aging(procs);
        }
    }

    /// Return the current process to the ready queue (the sole path
    /// back), pick the next one per policy, and do the context-switch
    /// bookkeeping.
    pub fn schedule(&mut self, procs: &mut ProcessManager) {
        if !self.running {
            return;
        }
        let prev = procs.current_pid();
        if let Some(prev_pid) = prev {
            if procs
                .get(prev_pid)
                .map_or(false, |p| p.state == ProcessState::Current)
            {
                procs.set_state(prev_pid, ProcessState::Ready);
            }
        }

        let next = match self.select_next(procs) {
            Some(n) => n,
            None => {
                if prev.is_some() {
                    log_info!("[SCHEDULER] ready queue empty, cpu going idle");
                }
                return;
            }
        };

        procs.set_state(next, ProcessState::Current);
        let quantum = procs
            .get(next)
            .map(|p| p.quantum)
            .unwrap_or(self.config.default_quantum);
        self.time_slice_remaining = quantum;
        if let Some(p) = procs.get_mut(next) {
            p.remaining_quantum = quantum;
        }
        self.stats.context_switches += 1;

        if prev != Some(next) {
            if let Some(prev_pid) = prev {
                if let Some(p) = procs.get_mut(prev_pid) {
                    context::save_context(&mut p.context, &self.cpu);
                }
            }
            if let Some(p) = procs.get(next) {
                context::restore_context(&mut self.cpu, &p.context);
            }
        }
    }

    /// Dispatch immediately when the CPU is idle; preempt when a new
    /// arrival outranks the current process.
    pub fn maybe_preempt(&mut self, procs: &mut ProcessManager) {
        if !self.running {
            return;
        }
        match procs.current().map(|p| p.priority) {
            None => {
                if procs.ready_len() > 0 {
                    self.schedule(procs);
                }
            }
            Some(current_prio) => {
                if !self.config.preemption_enabled {
                    return;
                }
                if let Some(head_prio) = procs.ready_head_priority() {
                    if head_prio > current_prio {
                        self.stats.preemptions += 1;
                        self.schedule(procs);
                    }
                }
            }
        }
    }

    /// Voluntary yield from the current process.
    pub fn yield_now(&mut self, procs: &mut ProcessManager) {
        if !self.running {
            return;
        }
        self.stats.voluntary_yields += 1;
        self.schedule(procs);
    }

    /// Age every READY process; on reaching the threshold, boost one
    /// level (re-inserted after its new peers) and reset the age.
    fn check_aging(&mut self, procs: &mut ProcessManager) {
        for pid in procs.pids() {
            let due = match procs.get_mut(pid) {
                Some(p) if p.state == ProcessState::Ready => {
                    p.age += 1;
                    p.age >= self.config.aging_threshold && p.priority < Priority::Critical
                }
                _ => false,
            };
            if due {
                procs.boost_priority(pid);
                procs.reset_age(pid);
                self.stats.aging_boosts += 1;
                if let Some(p) = procs.get(pid) {
                    log_info!(
                        "[SCHEDULER] aging boost: pid {} raised to {}",
                        pid,
                        p.priority.as_str()
                    );
                }
            }
        }
    }

    fn select_next(&self, procs: &ProcessManager) -> Option<u32> {
        // All policies drain the queue head: the ready queue already
        // encodes priority order and FIFO within a level.
        match self.config.policy {
            SchedPolicy::RoundRobin
            | SchedPolicy::Priority
            | SchedPolicy::PriorityRr
            | SchedPolicy::Fcfs => procs.peek_ready(),
        }
    }

    pub fn set_policy(&mut self, policy: SchedPolicy) {
        self.config.policy = policy;
        log_info!("[SCHEDULER] policy set to {}", policy.as_str());
    }

    pub fn set_default_quantum(&mut self, quantum: u32) {
        let clamped = quantum.clamp(MIN_QUANTUM, MAX_QUANTUM);
        self.config.default_quantum = clamped;
        log_info!("[SCHEDULER] default quantum set to {}", clamped);
    }

    pub fn set_preemption(&mut self, enabled: bool) {
        self.config.preemption_enabled = enabled;
        log_info!("[SCHEDULER] preemption {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn set_aging(&mut self, enabled: bool) {
        self.config.aging_enabled = enabled;
        log_info!("[SCHEDULER] aging {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn set_aging_threshold(&mut self, threshold: u32) {
        self.config.aging_threshold = threshold.max(1);
        log_info!("[SCHEDULER] aging threshold set to {}", self.config.aging_threshold);
    }

    pub fn set_aging_interval(&mut self, interval: u32) {
        self.config.aging_boost_interval = interval.max(1);
        log_info!("[SCHEDULER] aging interval set to {}", self.config.aging_boost_interval);
    }

    /// Per-process quantum override; takes effect on the next dispatch.
    pub fn set_process_quantum(&mut self, procs: &mut ProcessManager, pid: u32, quantum: u32) -> bool {
        let clamped = quantum.clamp(MIN_QUANTUM, MAX_QUANTUM);
        match procs.get_mut(pid) {
            Some(p) => {
                p.quantum = clamped;
                p.remaining_quantum = p.remaining_quantum.min(clamped);
                log_info!("[SCHEDULER] pid {} quantum set to {}", pid, clamped);
                true
            }
            None => false,
        }
    }

    pub fn config(&self) -> SchedConfig {
        self.config
    }

    pub fn stats(&self) -> SchedStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SchedStats::default();
        log_info!("[SCHEDULER] statistics reset");
    }

    pub fn total_ticks(&self) -> u64 {
        self.stats.total_ticks
    }

    pub fn time_slice_remaining(&self) -> u32 {
        self.time_slice_remaining
    }

    /// `schedstats` report.
    pub fn print_stats(&self) {
        println!("Scheduler statistics:");
        println!("  total ticks       {:>10}", self.stats.total_ticks);
        println!("  idle ticks        {:>10}", self.stats.idle_ticks);
        println!("  context switches  {:>10}", self.stats.context_switches);
        println!("  preemptions       {:>10}", self.stats.preemptions);
        println!("  voluntary yields  {:>10}", self.stats.voluntary_yields);
        println!("  aging boosts      {:>10}", self.stats.aging_boosts);
    }

    /// `schedconf` report.
    pub fn print_config(&self) {
        println!("Scheduler configuration:");
        println!("  policy            {}", self.config.policy.as_str());
        println!("  default quantum   {} (min {}, max {})", self.config.default_quantum, MIN_QUANTUM, MAX_QUANTUM);
        println!("  preemption        {}", if self.config.preemption_enabled { "on" } else { "off" });
        println!("  aging             {}", if self.config.aging_enabled { "on" } else { "off" });
        println!("  aging threshold   {}", self.config.aging_threshold);
        println!("  aging interval    {}", self.config.aging_boost_interval);
    }

    /// One-line status for `ps`.
    pub fn print_status(&self, procs: &ProcessManager) {
        println!(
            "Scheduler: {} | policy {} | tick {} | current pid {} | slice {}",
            if self.running { "running" } else { "stopped" },
            self.config.policy.as_str(),
            self.stats.total_ticks,
            procs.current_pid().unwrap_or(crate::process::IDLE_PID),
            self.time_slice_remaining
        );
    }
}
