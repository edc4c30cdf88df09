use crate::println;

pub fn run(_args: &str) {
    println!("TickOS Shell - Available commands:");
    println!("");
    println!("  help                            Show this help message");
    println!("  clear                           Clear the screen");
    println!("");
    println!("  memstats                        Print heap and stack pool counters");
    println!("  memtest                         Run built-in memory scenarios");
    println!("");
    println!("  ps                              Print process table + scheduler status");
    println!("  create <name> <priority> <ticks> Create a process with a run budget");
    println!("                                  (priority: critical|high|normal|low, 0-3)");
    println!("  kill <pid>                      Terminate a process");
    println!("  info <pid>                      Print process detail");
    println!("  proctest                        Run built-in process scenarios");
    println!("");
    println!("  tick [n]                        Advance the scheduler n ticks (default 1)");
    println!("  schedstats                      Print scheduler counters");
    println!("  schedconf [<param> <value>]     Print or change scheduler configuration");
}
