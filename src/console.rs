//! Kernel Console
//!
//! Byte-oriented console output shared by `kprint!`, `kprintln!` and the
//! `log` facade. The platform registers its output device once with
//! [`init_console`]; until then all output is discarded.
//!
//! # Concurrency
//! - The device reference is published through `spin::Once`
//! - Whole lines are written under one spinlock so concurrent contexts
//!   never interleave inside a line

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};
use spin::{Mutex, Once};

/// An output device for kernel messages (UART, SBI console, host buffer).
pub trait Console: Sync {
    /// Emit a single byte.
    fn put_char(&self, c: u8);
}

/// The registered output device.
static CONSOLE: Once<&'static dyn Console> = Once::new();

/// Serializes writers so a formatted line reaches the device in one piece.
static WRITER: Mutex<Writer> = Mutex::new(Writer);

struct Writer;

impl Write for Writer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(console) = CONSOLE.get() {
            for byte in s.bytes() {
                console.put_char(byte);
            }
        }
        Ok(())
    }
}

/// Register the console device and install it as the `log` backend.
///
/// Only the first registration takes effect.
pub fn init_console(console: &'static dyn Console) {
    CONSOLE.call_once(|| console);
    // A second call finds the logger already installed; nothing to do.
    let _ = log::set_logger(&LOGGER);
    set_log_level(crate::param::LOG_LEVEL);
}

/// Set the maximum log level from its textual name.
///
/// Unknown or missing names fall back to `warn`, which keeps syscall
/// denial diagnostics visible.
pub fn set_log_level(level: Option<&str>) {
    let filter = level
        .and_then(|name| name.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    log::set_max_level(filter);
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    let _ = WRITER.lock().write_fmt(args);
}

/// Print macro for kernel output
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {
        $crate::console::_print(format_args!($($arg)*))
    };
}

/// Println macro for kernel output
#[macro_export]
macro_rules! kprintln {
    () => {
        $crate::kprint!("\n")
    };
    ($($arg:tt)*) => {
        $crate::console::_print(format_args!("{}\n", format_args!($($arg)*)))
    };
}

struct Logger;

static LOGGER: Logger = Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        crate::kprintln!("[{:>5}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_and_logger() {
        capture::install();

        crate::kprintln!("boot {}", 42);
        assert!(capture::output().contains("boot 42\n"));

        set_log_level(Some("info"));
        log::info!("clone ready");
        assert!(capture::output().contains("[ INFO] clone ready\n"));

        set_log_level(Some("chatty"));
        assert_eq!(log::max_level(), LevelFilter::Warn);
        log::debug!("hidden line");
        assert!(!capture::output().contains("hidden line"));
    }
}
