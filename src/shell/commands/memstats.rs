/// memstats — heap and stack pool counters.
pub fn run(_args: &str) {
    crate::kernel::KERNEL.lock().mem.print_stats();
}
