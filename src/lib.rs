#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod console;
pub mod kernel;
pub mod memory;
pub mod process;
pub mod scheduler;
pub mod shell;

pub use kernel::Kernel;

/// Bring the core up in boot order. The boot stub calls this once
/// (after installing its console sink), then hands the input device to
/// `shell::repl`.
pub fn init() {
    console::init();
    kernel::init();
    log_info!("TickOS core started.");
}
