// rv_trapio/src/console.rs

//! # Console Output
//!
//! Text output over the board UART and the `print!` family of macros.
//!
//! Output takes no lock. A trap taken in the middle of a main-flow `println!`
//! interleaves its diagnostic line with it, but can never deadlock on it.

use crate::config::PLATFORM;
use crate::drivers::uart::Uart;
use crate::mmio::Mmio;
use core::fmt::{self, Write};

/// The board UART.
// SAFETY: the platform UART base is a device block, and this is the only
// handle created for it.
pub static CONSOLE: Uart = Uart::new(unsafe { Mmio::new(PLATFORM.uart_base) });

/// A [`fmt::Write`] sink over [`CONSOLE`].
#[derive(Debug, Default, Copy, Clone)]
pub struct Console;

impl Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        cfg_if::cfg_if! {
            if #[cfg(test)] {
                std::print!("{}", s);
            } else {
                CONSOLE.write_bytes(s.as_bytes());
            }
        }
        Ok(())
    }
}

/// Formatting entry point of the print macros.
pub fn print(args: fmt::Arguments) {
    let _ = Console.write_fmt(args);
}

/// Writes a string as-is.
pub fn print_str(s: &str) {
    let _ = Console.write_str(s);
}

/// Formatted output.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::console::print(format_args!($($arg)*))
    };
}

/// Formatted output with a trailing newline.
#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {
        $crate::print!("{}\n", format_args!($($arg)*))
    };
}

/// Output prefixed with the source location.
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {{
        $crate::print!("[{}:{}] ", file!(), line!());
        $crate::println!($($arg)*);
    }};
}

/// Red error output.
#[macro_export]
macro_rules! error_print {
    ($($arg:tt)*) => {{
        $crate::print!("\x1b[31m[ERROR] ");
        $crate::print!($($arg)*);
        $crate::print!("\x1b[0m\n");
    }};
}

/// Yellow warning output.
#[macro_export]
macro_rules! warn_print {
    ($($arg:tt)*) => {{
        $crate::print!("\x1b[33m[WARN] ");
        $crate::print!($($arg)*);
        $crate::print!("\x1b[0m\n");
    }};
}

/// Green informational output.
#[macro_export]
macro_rules! info_print {
    ($($arg:tt)*) => {{
        $crate::print!("\x1b[32m[INFO] ");
        $crate::print!($($arg)*);
        $crate::print!("\x1b[0m\n");
    }};
}
