use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use bit_field::BitField;
use lazy_static::lazy_static;
use spin::Mutex;

/// Byte-oriented output device. The boot wiring installs a real serial
/// port here; the default sink discards everything.
pub trait ByteSink: Send {
    fn put_byte(&mut self, b: u8);
}

/// Blocking byte-oriented input device (shell keyboard/serial input).
pub trait ByteSource: Send {
    fn get_byte(&mut self) -> u8;
}

/// Sink used until a device is installed.
struct NullSink;

impl ByteSink for NullSink {
    fn put_byte(&mut self, _b: u8) {}
}

/// Capture sink that appends every byte to a shared buffer.
/// Handy for memtest-style inspection and host-side harnesses.
pub struct BufferSink(pub Arc<Mutex<Vec<u8>>>);

impl ByteSink for BufferSink {
    fn put_byte(&mut self, b: u8) {
        self.0.lock().push(b);
    }
}

pub struct Console {
    sink: Box<dyn ByteSink>,
}

impl Console {
    pub fn new() -> Console {
        Console { sink: Box::new(NullSink) }
    }

    /// Install the output device. Replaces the previous sink.
    pub fn set_sink(&mut self, sink: Box<dyn ByteSink>) {
        self.sink = sink;
    }

    pub fn put_byte(&mut self, b: u8) {
        self.sink.put_byte(b);
    }

    pub fn put_string(&mut self, s: &str) {
        for byte in s.bytes() {
            self.put_byte(byte);
        }
    }

    /// 8-digit uppercase hex, no prefix (diagnostic address dumps).
    pub fn put_hex_u32(&mut self, v: u32) {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
        for i in (0..8).rev() {
            let nibble = v.get_bits(i * 4..i * 4 + 4) as usize;
            self.put_byte(DIGITS[nibble]);
        }
    }

    pub fn put_decimal_u32(&mut self, v: u32) {
        let mut digits = [0u8; 10];
        let mut n = v;
        let mut len = 0;
        loop {
            digits[len] = b'0' + (n % 10) as u8;
            n /= 10;
            len += 1;
            if n == 0 {
                break;
            }
        }
        while len > 0 {
            len -= 1;
            self.put_byte(digits[len]);
        }
    }
}

impl core::fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.put_string(s);
        Ok(())
    }
}

lazy_static! {
    pub static ref CONSOLE: Mutex<Console> = Mutex::new(Console::new());
}

#[doc(hidden)]
pub fn _print(args: ::core::fmt::Arguments) {
    use core::fmt::Write;
    let _ = CONSOLE.lock().write_fmt(args);
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::console::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::console::_print(format_args!("[INFO] "));
        $crate::console::_print(format_args!($($arg)*));
        $crate::console::_print(format_args!("\n"));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::console::_print(format_args!("[WARN] "));
        $crate::console::_print(format_args!($($arg)*));
        $crate::console::_print(format_args!("\n"));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::console::_print(format_args!("[ERROR] "));
        $crate::console::_print(format_args!($($arg)*));
        $crate::console::_print(format_args!("\n"));
    };
}

pub fn init() {
    let _ = CONSOLE.lock();
}
