//! VMware SVGA register map and constants.
//!
//! Values match the adapter's published register layout (svga_reg.h).
//! Register indices are written to the index port; the value port then
//! reads or writes the selected register.

use bitflags::bitflags;

/// PCI identification.
pub mod pci {
    /// VMware PCI vendor ID.
    pub const VENDOR_VMWARE: u16 = 0x15AD;
    /// SVGA II adapter (BAR0 = I/O port pair).
    pub const DEVICE_SVGA2: u16 = 0x0405;
    /// First-generation SVGA adapter (fixed legacy ports).
    pub const DEVICE_SVGA_LEGACY: u16 = 0x0710;
}

/// I/O port layout.
pub mod ports {
    /// Index port offset from BAR0 (SVGA II).
    pub const INDEX_OFFSET: u16 = 0;
    /// Value port offset from BAR0 (SVGA II).
    pub const VALUE_OFFSET: u16 = 1;
    /// Fixed base of the legacy adapter's port pair.
    pub const LEGACY_BASE: u16 = 0x4560;
    /// Legacy ports are spaced one dword apart.
    pub const LEGACY_STRIDE: u16 = 4;
    /// BAR bit 0 set = I/O space.
    pub const BAR_IO_SPACE: u32 = 0x1;
    /// Mask applied to an I/O BAR to get the port base.
    pub const BAR_IO_MASK: u32 = !0x3;
}

/// Register indices (written to the index port).
pub mod reg {
    pub const ID: u32 = 0;
    pub const ENABLE: u32 = 1;
    pub const WIDTH: u32 = 2;
    pub const HEIGHT: u32 = 3;
    pub const MAX_WIDTH: u32 = 4;
    pub const MAX_HEIGHT: u32 = 5;
    pub const DEPTH: u32 = 6;
    pub const BITS_PER_PIXEL: u32 = 7;
    pub const PSEUDOCOLOR: u32 = 8;
    pub const RED_MASK: u32 = 9;
    pub const GREEN_MASK: u32 = 10;
    pub const BLUE_MASK: u32 = 11;
    pub const BYTES_PER_LINE: u32 = 12;
    pub const FB_START: u32 = 13;
    pub const FB_OFFSET: u32 = 14;
    pub const VRAM_SIZE: u32 = 15;
    pub const FB_SIZE: u32 = 16;
    pub const CAPABILITIES: u32 = 17;
    pub const MEM_START: u32 = 18;
    pub const MEM_SIZE: u32 = 19;
    /// Write 1 once the FIFO control words are set up.
    pub const CONFIG_DONE: u32 = 20;
    /// Write 1 to ask the adapter to process the FIFO.
    pub const SYNC: u32 = 21;
    /// Non-zero while the adapter is still processing the FIFO.
    pub const BUSY: u32 = 22;
}

/// Protocol version IDs (values of the ID register).
pub mod id {
    pub const MAGIC: u32 = 0x0090_0000;
    pub const V0: u32 = MAGIC;
    pub const V1: u32 = MAGIC | 1;
    pub const V2: u32 = MAGIC | 2;
    pub const INVALID: u32 = 0xFFFF_FFFF;
}

/// FIFO control slots, as word indices into the FIFO region.
pub mod fifo {
    /// First byte offset of the command ring.
    pub const MIN: usize = 0;
    /// One past the last byte offset of the command ring.
    pub const MAX: usize = 1;
    /// Producer (driver) write offset.
    pub const NEXT_CMD: usize = 2;
    /// Consumer (adapter) read offset.
    pub const STOP: usize = 3;
    /// Number of control words preceding the ring.
    pub const NUM_REGS: usize = 4;
}

/// FIFO command opcodes.
pub mod cmd {
    /// UPDATE x, y, width, height
    pub const UPDATE: u32 = 1;
    /// RECT_FILL color, x, y, width, height
    pub const RECT_FILL: u32 = 2;
    /// RECT_COPY src_x, src_y, dst_x, dst_y, width, height
    pub const RECT_COPY: u32 = 3;

    /// Operand count of UPDATE.
    pub const UPDATE_ARGS: usize = 4;
}

bitflags! {
    /// Adapter capabilities (SVGA_REG_CAPABILITIES).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u32 {
        const RECT_FILL = 1 << 0;
        const RECT_COPY = 1 << 1;
        const RECT_PAT_FILL = 1 << 2;
        const LEGACY_OFFSCREEN = 1 << 3;
        const RASTER_OP = 1 << 4;
        const CURSOR = 1 << 5;
        const CURSOR_BYPASS = 1 << 6;
        const CURSOR_BYPASS_2 = 1 << 7;
        const EIGHT_BIT_EMULATION = 1 << 8;
        const ALPHA_CURSOR = 1 << 9;
        const GLYPH = 1 << 10;
        const GLYPH_CLIPPING = 1 << 11;
        const OFFSCREEN_1 = 1 << 12;
        const ALPHA_BLEND = 1 << 13;
        const THREE_D = 1 << 14;
        const EXTENDED_FIFO = 1 << 15;
    }
}

impl Capabilities {
    /// Any hardware cursor support.
    pub fn has_cursor(&self) -> bool {
        self.intersects(Self::CURSOR | Self::ALPHA_CURSOR)
    }
}
