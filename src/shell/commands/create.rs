use crate::println;
use crate::process::Priority;

/// create <name> <priority> <ticks> — create a process with a run
/// budget (<ticks> = 0 means unbounded).
pub fn run(args: &str) {
    let mut parts = args.split_whitespace();
    let (name, prio_tok, ticks_tok) = match (parts.next(), parts.next(), parts.next()) {
        (Some(n), Some(p), Some(t)) => (n, p, t),
        _ => {
            println!("create: usage: create <name> <priority> <ticks>");
            return;
        }
    };

    let priority = match Priority::parse(prio_tok) {
        Some(p) => p,
        None => {
            println!("create: invalid priority: {} (critical|high|normal|low or 0-3)", prio_tok);
            return;
        }
    };
    let required_time: u32 = match ticks_tok.parse() {
        Ok(v) => v,
        Err(_) => {
            println!("create: invalid tick count: {}", ticks_tok);
            return;
        }
    };

    let mut kernel = crate::kernel::KERNEL.lock();
    match kernel.create_process(name, priority, required_time) {
        Some(pid) => println!(
            "Created '{}' (pid {}) priority {} run budget {}",
            name,
            pid,
            priority.as_str(),
            required_time
        ),
        None => println!("create: failed (process table, stack pool or heap exhausted)"),
    }
}
