use crate::print;

/// clear — ANSI clear screen + cursor home.
pub fn run(_args: &str) {
    print!("\x1b[2J\x1b[H");
}
