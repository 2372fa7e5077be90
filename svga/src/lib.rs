//! VMware SVGA Protocol Core
//!
//! Register and command-FIFO plumbing for the VMware virtual SVGA adapter.
//! Mode selection, pixel-format bookkeeping and the driver lifecycle live
//! in the host framework and call into this crate.
//!
//! # Architecture
//!
//! ```text
//!   host display framework
//!            │
//!   FramebufferDisplay ◄── VmwareFb          (driver)
//!                             │
//!                          SvgaCore          (device)
//!                          │      │
//!   negotiate ─► RegisterPort   FifoQueue ─► MappedFifo
//!                     │             │
//!                  PortIo      SYNC / BUSY
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vmwarefb_svga::{
//!     DrainPolicy, MappedFifo, RegisterPortPair, SvgaConfig, SvgaCore, VmwareFb, X86Pio,
//! };
//!
//! let pair = RegisterPortPair::from_pci(device_id, bar0)?;
//! let fifo = unsafe { MappedFifo::new(fifo_virt, fifo_len) };
//! let core = SvgaCore::attach(pair, unsafe { X86Pio::new() }, fifo, DrainPolicy::default())?;
//!
//! let mut fb = VmwareFb::new(core, SvgaConfig::from_table(config_entries));
//! fb.update_full_screen()?;
//! ```
//!
//! # Concurrency
//!
//! Single producer. Each register transaction holds the port lock; FIFO
//! writes need `&mut`, so sharing a core across threads means wrapping it
//! in one coarse lock. The adapter is the only consumer of the ring.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod fifo;
pub mod mask;
pub mod pio;
pub mod port;
pub mod regs;
pub mod serial;
pub mod types;
pub mod version;

#[cfg(test)]
mod sim;

// ═══════════════════════════════════════════════════════════════════════════
// CORE RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use device::SvgaCore;
pub use error::{Result, SvgaError};
pub use pio::{PortIo, X86Pio};
pub use port::{RegisterPort, RegisterPortPair};
pub use version::{negotiate, DeviceProtocolVersion};

// ═══════════════════════════════════════════════════════════════════════════
// FIFO RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use fifo::{
    request_sync, wait_until_drained, DrainPolicy, FifoMemory, FifoQueue, FifoStats, MappedFifo,
    WORD_SIZE,
};

// ═══════════════════════════════════════════════════════════════════════════
// DISPLAY RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{Acceleration, SvgaConfig};
pub use driver::{FramebufferDisplay, VmwareFb};
pub use mask::{calculate_weight, PixelMasks};
pub use regs::Capabilities;
pub use types::{ModeInfo, Rect};
