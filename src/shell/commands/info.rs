use crate::println;

/// info <pid> — process detail dump.
pub fn run(args: &str) {
    let pid_str = args.trim();
    if pid_str.is_empty() {
        println!("info: usage: info <pid>");
        return;
    }

    let pid: u32 = match pid_str.parse() {
        Ok(v) => v,
        Err(_) => {
            println!("info: invalid pid: {}", pid_str);
            return;
        }
    };

    crate::kernel::KERNEL.lock().procs.print_info(pid);
}
