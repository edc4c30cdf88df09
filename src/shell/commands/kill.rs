use crate::println;

/// kill <pid> — terminate a process.
pub fn run(args: &str) {
    let pid_str = args.trim();
    if pid_str.is_empty() {
        println!("kill: usage: kill <pid>");
        return;
    }

    let pid: u32 = match pid_str.parse() {
        Ok(v) => v,
        Err(_) => {
            println!("kill: invalid pid: {}", pid_str);
            return;
        }
    };

    if pid == crate::process::IDLE_PID {
        println!("kill: cannot kill pid 0 (idle/none)");
        return;
    }

    let mut kernel = crate::kernel::KERNEL.lock();
    if kernel.terminate(pid) {
        println!("Terminated pid {}", pid);
    } else {
        println!("kill: no such process: {}", pid);
    }
}
