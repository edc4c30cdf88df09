/// ps — process table plus one-line scheduler status.
pub fn run(_args: &str) {
    let kernel = crate::kernel::KERNEL.lock();
    kernel.procs.print_table();
    kernel.sched.print_status(&kernel.procs);
}
