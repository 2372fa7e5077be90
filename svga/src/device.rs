//! SVGA protocol core.
//!
//! [`SvgaCore`] owns the register port and the producer side of the FIFO
//! for one adapter. It knows nothing about the host display framework;
//! see [`crate::driver`] for that.
//!
//! # Attach sequence
//!
//! ```text
//! negotiate ID ──► Unsupported? ──► UnsupportedDevice
//!      │
//!      ▼
//! read CAPABILITIES (V1+)
//!      │
//!      ▼
//! lay out FIFO ring ──► CONFIG_DONE = 1
//! ```

use log::{info, warn};

use crate::error::{Result, SvgaError};
use crate::fifo::{DrainPolicy, FifoMemory, FifoQueue, FifoStats};
use crate::mask::PixelMasks;
use crate::pio::PortIo;
use crate::port::{RegisterPort, RegisterPortPair};
use crate::regs::{cmd, reg, Capabilities};
use crate::types::{ModeInfo, Rect};
use crate::version::{self, DeviceProtocolVersion};

/// Register port plus command FIFO for one adapter.
pub struct SvgaCore<P: PortIo, M: FifoMemory> {
    regs: RegisterPort<P>,
    fifo: FifoQueue<M>,
    version: DeviceProtocolVersion,
    capabilities: Capabilities,
}

impl<P: PortIo, M: FifoMemory> SvgaCore<P, M> {
    /// Negotiate with the adapter and bring up its command FIFO.
    ///
    /// The negotiated version is cached for the life of the core.
    pub fn attach(pair: RegisterPortPair, io: P, fifo_mem: M, drain: DrainPolicy) -> Result<Self> {
        let regs = RegisterPort::new(pair, io);

        let (version, raw_id) = version::probe(&regs);
        if !version.is_supported() {
            warn!("SVGA: no supported protocol version (ID {:#010x})", raw_id);
            return Err(SvgaError::UnsupportedDevice { id: raw_id });
        }

        let capabilities = if version >= DeviceProtocolVersion::V1 {
            Capabilities::from_bits_truncate(regs.read(reg::CAPABILITIES))
        } else {
            Capabilities::empty()
        };

        let fifo = FifoQueue::init(fifo_mem, drain)?;
        regs.write(reg::CONFIG_DONE, 1);

        info!(
            "SVGA: attached {:?} (index={:#x} value={:#x}) caps={:#x} fifo=[{:#x}, {:#x})",
            version,
            pair.index,
            pair.value,
            capabilities.bits(),
            fifo.min(),
            fifo.max()
        );

        Ok(Self {
            regs,
            fifo,
            version,
            capabilities,
        })
    }

    pub fn version(&self) -> DeviceProtocolVersion {
        self.version
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn ports(&self) -> RegisterPortPair {
        self.regs.pair()
    }

    pub fn fifo(&self) -> &FifoQueue<M> {
        &self.fifo
    }

    pub fn fifo_stats(&self) -> FifoStats {
        self.fifo.stats()
    }

    pub fn set_drain_policy(&mut self, drain: DrainPolicy) {
        self.fifo.set_drain_policy(drain);
    }

    pub fn read_register(&self, index: u32) -> u32 {
        self.regs.read(index)
    }

    pub fn write_register(&self, index: u32, value: u32) {
        self.regs.write(index, value);
    }

    /// Append one word to the command FIFO.
    pub fn write_word(&mut self, value: u32) -> Result<()> {
        self.fifo.write_word(&self.regs, value)
    }

    /// Queue an UPDATE for `rect`.
    pub fn update_rect(&mut self, rect: Rect) -> Result<()> {
        let [x, y, width, height] = rect.to_words();
        self.fifo
            .write_words(&self.regs, &[cmd::UPDATE, x, y, width, height])
    }

    /// Queue an UPDATE covering the current mode.
    pub fn update_full_screen(&mut self) -> Result<()> {
        let width = self.regs.read(reg::WIDTH);
        let height = self.regs.read(reg::HEIGHT);
        self.update_rect(Rect::new(0, 0, width, height))
    }

    /// Have the adapter process everything queued so far.
    pub fn sync(&mut self) -> Result<()> {
        self.fifo.sync(&self.regs).map(|_| ())
    }

    /// Read back the current display mode.
    pub fn mode(&self) -> ModeInfo {
        ModeInfo {
            width: self.regs.read(reg::WIDTH),
            height: self.regs.read(reg::HEIGHT),
            bits_per_pixel: self.regs.read(reg::BITS_PER_PIXEL),
            bytes_per_line: self.regs.read(reg::BYTES_PER_LINE),
            fb_offset: self.regs.read(reg::FB_OFFSET),
        }
    }

    /// Channel masks. V0 adapters do not report them.
    pub fn pixel_masks(&self) -> Option<PixelMasks> {
        if self.version < DeviceProtocolVersion::V1 {
            return None;
        }
        Some(PixelMasks::new(
            self.regs.read(reg::RED_MASK),
            self.regs.read(reg::GREEN_MASK),
            self.regs.read(reg::BLUE_MASK),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fifo::RING_START;
    use crate::regs::id;
    use crate::sim::{Access, SimAdapter, SimFifo};

    type SimCore = SvgaCore<SimAdapter, SimFifo>;

    fn attach(ceiling: u32, fifo_bytes: usize) -> (SimAdapter, SimFifo, Result<SimCore>) {
        let ring = SimFifo::new(fifo_bytes);
        let sim = SimAdapter::new(ceiling).with_fifo(&ring);
        sim.set_reg(reg::CAPABILITIES, 0x0000_0063);
        let core = SvgaCore::attach(
            SimAdapter::PAIR,
            sim.clone(),
            ring.clone(),
            DrainPolicy::default(),
        );
        (sim, ring, core)
    }

    #[test]
    fn test_attach_v2_reads_caps_and_enables_fifo() {
        let (sim, ring, core) = attach(id::V2, 1024);
        let core = core.unwrap();

        assert_eq!(core.version(), DeviceProtocolVersion::V2);
        assert!(core.capabilities().contains(Capabilities::RECT_COPY | Capabilities::CURSOR));
        assert_eq!(ring.min(), RING_START);
        assert_eq!(ring.max(), 1024);
        assert_eq!(sim.reg(reg::CONFIG_DONE), 1);
        assert_eq!(sim.journal().last(), Some(&Access::Write(reg::CONFIG_DONE, 1)));
    }

    #[test]
    fn test_attach_v0_skips_capabilities() {
        let (sim, _ring, core) = attach(id::V0, 1024);
        let core = core.unwrap();

        assert_eq!(core.version(), DeviceProtocolVersion::V0);
        assert!(core.capabilities().is_empty());
        assert!(!sim.journal().contains(&Access::Read(reg::CAPABILITIES)));
        assert_eq!(core.pixel_masks(), None);
    }

    #[test]
    fn test_attach_rejects_absent_adapter() {
        let ring = SimFifo::new(1024);
        let result = SvgaCore::attach(
            SimAdapter::PAIR,
            SimAdapter::absent(),
            ring.clone(),
            DrainPolicy::default(),
        );
        assert!(matches!(result, Err(SvgaError::UnsupportedDevice { id: id::INVALID })));
        // FIFO left untouched.
        assert_eq!(ring.max(), 0);
    }

    #[test]
    fn test_attach_rejects_tiny_fifo() {
        let (_sim, _ring, core) = attach(id::V1, 16);
        assert!(matches!(core, Err(SvgaError::FifoTooSmall)));
    }

    #[test]
    fn test_update_rect_queues_opcode_and_operands() {
        let (sim, ring, core) = attach(id::V2, 1024);
        let mut core = core.unwrap();

        core.update_rect(Rect::new(8, 16, 320, 200)).unwrap();

        let base = (RING_START / 4) as usize;
        let queued: Vec<u32> = (base..base + 5).map(|i| ring.word(i)).collect();
        assert_eq!(queued, [cmd::UPDATE, 8, 16, 320, 200]);
        assert_eq!(ring.next_cmd(), RING_START + 20);

        core.sync().unwrap();
        assert_eq!(sim.consumed(), [cmd::UPDATE, 8, 16, 320, 200]);
        assert_eq!(core.fifo_stats().words, 5);
    }

    #[test]
    fn test_update_full_screen_uses_current_mode() {
        let (sim, _ring, core) = attach(id::V2, 1024);
        let mut core = core.unwrap();
        sim.set_reg(reg::WIDTH, 800);
        sim.set_reg(reg::HEIGHT, 600);

        core.update_full_screen().unwrap();
        core.sync().unwrap();

        assert_eq!(sim.consumed(), [cmd::UPDATE, 0, 0, 800, 600]);
    }

    #[test]
    fn test_mode_and_masks() {
        let (sim, _ring, core) = attach(id::V1, 1024);
        let core = core.unwrap();
        sim.set_reg(reg::WIDTH, 1024);
        sim.set_reg(reg::HEIGHT, 768);
        sim.set_reg(reg::BITS_PER_PIXEL, 16);
        sim.set_reg(reg::BYTES_PER_LINE, 2048);
        sim.set_reg(reg::RED_MASK, 0xF800);
        sim.set_reg(reg::GREEN_MASK, 0x07E0);
        sim.set_reg(reg::BLUE_MASK, 0x001F);

        let mode = core.mode();
        assert!(mode.is_valid());
        assert_eq!((mode.width, mode.height, mode.bytes_per_line), (1024, 768, 2048));

        let masks = core.pixel_masks().unwrap();
        assert!(masks.is_valid());
        assert_eq!(masks.depth(), 16);
    }

    #[test]
    fn test_long_command_stream_wraps_safely() {
        // Ring of 16 words; each update is 5.
        let (sim, ring, core) = attach(id::V2, RING_START as usize + 64);
        let mut core = core.unwrap();
        sim.set_drain_rate(3);

        for i in 0..20 {
            core.update_rect(Rect::new(i, i, 1, 1)).unwrap();
        }
        core.sync().unwrap();

        let consumed = sim.consumed();
        assert_eq!(consumed.len(), 100);
        for (i, chunk) in consumed.chunks(5).enumerate() {
            let i = i as u32;
            assert_eq!(chunk, [cmd::UPDATE, i, i, 1, 1]);
        }
        assert_eq!(ring.stop(), ring.next_cmd());
    }
}
