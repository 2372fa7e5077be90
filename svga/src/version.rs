//! Protocol version negotiation.
//!
//! Adapters initialize the ID register to V0. A V0 adapter ignores writes
//! to it; a V1 adapter accepts V0 or V1 and answers anything higher with
//! its own ceiling; a V2 adapter accepts V0 through V2. Probing from the
//! highest candidate down therefore lands on the adapter's true ceiling.

use log::debug;

use crate::pio::PortIo;
use crate::port::RegisterPort;
use crate::regs::{id, reg};

/// Protocol level agreed with the adapter. Ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceProtocolVersion {
    Unsupported,
    V0,
    V1,
    V2,
}

impl DeviceProtocolVersion {
    /// Value of the ID register for this version.
    pub const fn id(self) -> u32 {
        match self {
            Self::V0 => id::V0,
            Self::V1 => id::V1,
            Self::V2 => id::V2,
            Self::Unsupported => id::INVALID,
        }
    }

    pub const fn from_id(raw: u32) -> Self {
        match raw {
            id::V0 => Self::V0,
            id::V1 => Self::V1,
            id::V2 => Self::V2,
            _ => Self::Unsupported,
        }
    }

    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

/// Negotiate the highest mutually supported version.
pub fn negotiate<P: PortIo>(regs: &RegisterPort<P>) -> DeviceProtocolVersion {
    probe(regs).0
}

/// Negotiate, also returning the last ID read back.
///
/// The V0 fallback reuses the V1 read-back; no V0 write is issued.
pub fn probe<P: PortIo>(regs: &RegisterPort<P>) -> (DeviceProtocolVersion, u32) {
    regs.write(reg::ID, id::V2);
    let read = regs.read(reg::ID);
    debug!("SVGA: read ID {:#010x}", read);
    if read == id::V2 {
        return (DeviceProtocolVersion::V2, read);
    }

    regs.write(reg::ID, id::V1);
    let read = regs.read(reg::ID);
    debug!("SVGA: read ID {:#010x}", read);
    if read == id::V1 {
        return (DeviceProtocolVersion::V1, read);
    }

    if read == id::V0 {
        return (DeviceProtocolVersion::V0, read);
    }

    (DeviceProtocolVersion::Unsupported, read)
}
