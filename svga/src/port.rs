//! Indexed register access.
//!
//! Every adapter register is reached through two ports: the register index
//! is written to the index port, then the value port is read or written.
//! The pair is a shared, non-reentrant resource, so each index/value
//! transaction runs under the port lock.

use spin::Mutex;

use crate::error::{Result, SvgaError};
use crate::pio::PortIo;
use crate::regs::{pci, ports};

/// The adapter's index and value port numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterPortPair {
    /// Port receiving the register index.
    pub index: u16,
    /// Port carrying the register value.
    pub value: u16,
}

impl RegisterPortPair {
    pub const fn new(index: u16, value: u16) -> Self {
        Self { index, value }
    }

    /// Derive the pair from the adapter's PCI identity.
    ///
    /// SVGA II exposes the pair through BAR0 (index at +0, value at +1).
    /// The legacy adapter always sits at a fixed base with dword-spaced
    /// ports and ignores BAR0.
    pub fn from_pci(device_id: u16, bar0: u32) -> Result<Self> {
        match device_id {
            pci::DEVICE_SVGA2 => {
                if bar0 & ports::BAR_IO_SPACE == 0 {
                    return Err(SvgaError::NotIoBar);
                }
                let base = (bar0 & ports::BAR_IO_MASK) as u16;
                Ok(Self::new(
                    base + ports::INDEX_OFFSET,
                    base + ports::VALUE_OFFSET,
                ))
            }
            pci::DEVICE_SVGA_LEGACY => Ok(Self::new(
                ports::LEGACY_BASE + ports::INDEX_OFFSET * ports::LEGACY_STRIDE,
                ports::LEGACY_BASE + ports::VALUE_OFFSET * ports::LEGACY_STRIDE,
            )),
            other => Err(SvgaError::UnsupportedPciDevice { device_id: other }),
        }
    }
}

/// Register port with lock-scoped transactions.
pub struct RegisterPort<P: PortIo> {
    pair: RegisterPortPair,
    io: Mutex<P>,
}

impl<P: PortIo> RegisterPort<P> {
    pub fn new(pair: RegisterPortPair, io: P) -> Self {
        Self {
            pair,
            io: Mutex::new(io),
        }
    }

    pub fn pair(&self) -> RegisterPortPair {
        self.pair
    }

    /// Read register `index`.
    ///
    /// Cannot fail: an absent or misbehaving adapter just returns garbage.
    pub fn read(&self, index: u32) -> u32 {
        let mut io = self.io.lock();
        io.outl(self.pair.index, index);
        io.inl(self.pair.value)
    }

    /// Write `value` to register `index`.
    pub fn write(&self, index: u32, value: u32) {
        let mut io = self.io.lock();
        io.outl(self.pair.index, index);
        io.outl(self.pair.value, value);
    }
}
