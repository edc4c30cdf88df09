use crate::println;
use crate::scheduler::SchedPolicy;

/// schedconf — print the scheduler configuration, or change one
/// parameter: schedconf <policy|quantum|preemption|aging|threshold|interval> <value>
pub fn run(args: &str) {
    let mut parts = args.split_whitespace();
    let (param, value) = match (parts.next(), parts.next()) {
        (None, _) => {
            crate::kernel::KERNEL.lock().sched.print_config();
            return;
        }
        (Some(p), Some(v)) => (p, v),
        (Some(_), None) => {
            usage();
            return;
        }
    };

    let mut kernel = crate::kernel::KERNEL.lock();
    match param {
        "policy" => match SchedPolicy::parse(value) {
            Some(p) => kernel.sched.set_policy(p),
            None => println!("schedconf: unknown policy: {} (round_robin|priority|priority_rr|fcfs)", value),
        },
        "quantum" => match value.parse() {
            Ok(q) => kernel.sched.set_default_quantum(q),
            Err(_) => println!("schedconf: invalid quantum: {}", value),
        },
        "preemption" => match parse_bool(value) {
            Some(on) => kernel.sched.set_preemption(on),
            None => println!("schedconf: expected on|off, got: {}", value),
        },
        "aging" => match parse_bool(value) {
            Some(on) => kernel.sched.set_aging(on),
            None => println!("schedconf: expected on|off, got: {}", value),
        },
        "threshold" => match value.parse() {
            Ok(t) => kernel.sched.set_aging_threshold(t),
            Err(_) => println!("schedconf: invalid threshold: {}", value),
        },
        "interval" => match value.parse() {
            Ok(i) => kernel.sched.set_aging_interval(i),
            Err(_) => println!("schedconf: invalid interval: {}", value),
        },
        _ => usage(),
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "on" | "1" | "true" => Some(true),
        "off" | "0" | "false" => Some(false),
        _ => None,
    }
}

fn usage() {
    println!("schedconf: usage: schedconf [<param> <value>]");
    println!("  params: policy quantum preemption aging threshold interval");
}
