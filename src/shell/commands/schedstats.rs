/// schedstats — scheduler counters.
pub fn run(_args: &str) {
    crate::kernel::KERNEL.lock().sched.print_stats();
}
