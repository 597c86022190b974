// rv_trapio/src/logger.rs

//! # Console Logger
//!
//! Routes the `log` facade to the console, with the same coloured level
//! prefixes as the `*_print!` macros.

use crate::console::Console;
use core::fmt::{self, Write};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

const RESET: &str = "\x1b[0m";

fn prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m[ERROR] ",
        Level::Warn => "\x1b[33m[WARN] ",
        Level::Info => "\x1b[32m[INFO] ",
        Level::Debug => "\x1b[36m[DEBUG] ",
        Level::Trace => "\x1b[90m[TRACE] ",
    }
}

/// Formats one record as a single console line.
fn write_record<W: Write + ?Sized>(
    sink: &mut W,
    level: Level,
    target: &str,
    args: &fmt::Arguments<'_>,
) -> fmt::Result {
    sink.write_str(prefix(level))?;
    if level >= Level::Debug {
        write!(sink, "{}: ", target)?;
    }
    writeln!(sink, "{}{}", args, RESET)
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = write_record(&mut Console, record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger with `level` as the maximum level.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
