pub mod commands;

use alloc::string::String;
use alloc::vec::Vec;

use crate::console::ByteSource;
use crate::{print, println};

/// Parse input line into command + arguments, then dispatch.
pub fn exec_command(input: &str) {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return;
    }

    // Split by whitespace: first token = command, rest = args
    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0];
    let args = if parts.len() > 1 { parts[1] } else { "" };

    match cmd {
        "help"       => commands::help::run(args),
        "memstats"   => commands::memstats::run(args),
        "memtest"    => commands::memtest::run(args),
        "ps"         => commands::ps::run(args),
        "proctest"   => commands::proctest::run(args),
        "create"     => commands::create::run(args),
        "tick"       => commands::tick::run(args),
        "kill"       => commands::kill::run(args),
        "info"       => commands::info::run(args),
        "schedstats" => commands::schedstats::run(args),
        "schedconf"  => commands::schedconf::run(args),
        "clear"      => commands::clear::run(args),
        _            => println!("{}: command not found (try 'help')", cmd),
    }
}

const LINE_MAX: usize = 256;

/// Minimal line-oriented REPL over the blocking input device: echo,
/// backspace, dispatch on newline. The boot wiring parks here forever.
pub fn repl(input: &mut dyn ByteSource) -> ! {
    let mut line = String::new();
    print!("tickos> ");
    loop {
        let byte = input.get_byte();
        match byte {
            b'\r' | b'\n' => {
                println!();
                exec_command(&line);
                line.clear();
                print!("tickos> ");
            }
            0x08 | 0x7F => {
                if line.pop().is_some() {
                    print!("\x08 \x08");
                }
            }
            0x20..=0x7E => {
                if line.len() < LINE_MAX {
                    line.push(byte as char);
                    print!("{}", byte as char);
                }
            }
            _ => {}
        }
    }
}
