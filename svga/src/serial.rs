//! Serial log sink (COM1 @ 0x3F8)
//!
//! Minimal polled serial output backing the `log` facade.
//! No buffering, no interrupts.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::error::{Result, SvgaError};
use crate::pio::{PortIo, X86Pio};

pub const COM1: u16 = 0x3F8;
pub const COM1_LSR: u16 = COM1 + 5;
pub const LSR_TX_EMPTY: u8 = 0x20;

/// Byte writer for COM1 over any port accessor.
pub struct SerialWriter<P: PortIo> {
    io: P,
}

impl<P: PortIo> SerialWriter<P> {
    pub const fn new(io: P) -> Self {
        Self { io }
    }

    /// Write byte to COM1. Bounded wait, gives up after ~100 spins.
    #[inline]
    pub fn putc(&mut self, b: u8) {
        for _ in 0..100 {
            if self.io.inb(COM1_LSR) & LSR_TX_EMPTY != 0 {
                self.io.outb(COM1, b);
                return;
            }
            core::hint::spin_loop();
        }
    }
}

impl<P: PortIo> Write for SerialWriter<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            self.putc(b);
        }
        Ok(())
    }
}

/// Write one record as `[SVGA] LEVEL message`.
fn write_record<P: PortIo>(out: &mut SerialWriter<P>, record: &Record<'_>) {
    let _ = writeln!(out, "[SVGA] {:<5} {}", record.level(), record.args());
}

/// `log` backend writing to COM1.
pub struct SerialLogger {
    out: Mutex<SerialWriter<X86Pio>>,
}

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            write_record(&mut self.out.lock(), record);
        }
    }

    fn flush(&self) {}
}

// Safety: only reachable after `init`, whose caller vouches for port access.
static LOGGER: SerialLogger = SerialLogger {
    out: Mutex::new(SerialWriter::new(unsafe { X86Pio::new() })),
};

/// Install the COM1 logger.
///
/// # Safety
/// The caller must be allowed to issue port I/O for the rest of the
/// program's life.
pub unsafe fn init(level: LevelFilter) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|_| SvgaError::LoggerAlreadySet)?;
    log::set_max_level(level);
    Ok(())
}
