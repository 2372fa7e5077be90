//! SVGA error types

use core::fmt;

pub type Result<T> = core::result::Result<T, SvgaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgaError {
    /// Version negotiation found no mutually supported ID.
    UnsupportedDevice {
        /// Last value read back from the ID register.
        id: u32,
    },
    /// PCI device ID is not a known SVGA adapter.
    UnsupportedPciDevice {
        device_id: u16,
    },
    /// BAR0 does not describe I/O space.
    NotIoBar,
    /// FIFO control words describe an impossible ring.
    InvalidFifoBounds {
        min: u32,
        max: u32,
        len: usize,
    },
    /// FIFO region cannot hold the control words plus one command word.
    FifoTooSmall,
    /// Adapter stayed busy for the whole bounded drain.
    DrainTimeout {
        polls: u32,
    },
    /// Rectangle corners out of order.
    InvalidRect,
    /// Host parameter name not recognized.
    UnknownParameter,
    /// Host parameter carried the wrong number of values.
    InvalidParameterCount {
        expected: usize,
        got: usize,
    },
    /// A global logger is already installed.
    LoggerAlreadySet,
}

impl fmt::Display for SvgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDevice { id } => {
                write!(f, "no supported SVGA protocol version (ID register {:#010x})", id)
            }
            Self::UnsupportedPciDevice { device_id } => {
                write!(f, "unsupported SVGA PCI device {:#06x}", device_id)
            }
            Self::NotIoBar => write!(f, "BAR0 is not an I/O BAR"),
            Self::InvalidFifoBounds { min, max, len } => write!(
                f,
                "invalid FIFO bounds: min={:#x} max={:#x} region={:#x}",
                min, max, len
            ),
            Self::FifoTooSmall => write!(f, "FIFO region too small"),
            Self::DrainTimeout { polls } => {
                write!(f, "adapter still busy after {} polls", polls)
            }
            Self::InvalidRect => write!(f, "invalid rectangle"),
            Self::UnknownParameter => write!(f, "unknown parameter"),
            Self::InvalidParameterCount { expected, got } => {
                write!(f, "expected {} parameter values, got {}", expected, got)
            }
            Self::LoggerAlreadySet => write!(f, "logger already installed"),
        }
    }
}
