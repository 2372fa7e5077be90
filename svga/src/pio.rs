//! Port I/O.
//!
//! The adapter's registers live in the x86 I/O port space. Everything above
//! this module talks to ports through [`PortIo`] so a simulated adapter can
//! stand in for the hardware in tests.
//!
//! # Safety
//! Constructing [`X86Pio`] is unsafe: the caller asserts it runs with I/O
//! privilege (CPL 0 or a permissive IOPL/bitmap). After that, individual
//! accesses are treated as infallible, matching the device contract.

/// 32-bit and 8-bit port access.
pub trait PortIo {
    /// Write a dword to `port`.
    fn outl(&mut self, port: u16, value: u32);

    /// Read a dword from `port`.
    fn inl(&mut self, port: u16) -> u32;

    /// Write a byte to `port`.
    fn outb(&mut self, port: u16, value: u8);

    /// Read a byte from `port`.
    fn inb(&mut self, port: u16) -> u8;
}

/// Port I/O through the `in`/`out` instructions.
#[derive(Debug)]
pub struct X86Pio {
    _private: (),
}

impl X86Pio {
    /// Create the instruction-backed accessor.
    ///
    /// # Safety
    /// The current execution context must be allowed to issue `in`/`out`.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(target_arch = "x86_64")]
impl PortIo for X86Pio {
    #[inline]
    fn outl(&mut self, port: u16, value: u32) {
        unsafe {
            core::arch::asm!(
                "out dx, eax",
                in("dx") port,
                in("eax") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }

    #[inline]
    fn inl(&mut self, port: u16) -> u32 {
        let value: u32;
        unsafe {
            core::arch::asm!(
                "in eax, dx",
                in("dx") port,
                out("eax") value,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }

    #[inline]
    fn outb(&mut self, port: u16, value: u8) {
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") port,
                in("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }

    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        let value: u8;
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") port,
                out("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }
}

/// Stub for non-x86_64 targets: writes are dropped, reads float high.
#[cfg(not(target_arch = "x86_64"))]
impl PortIo for X86Pio {
    #[inline]
    fn outl(&mut self, _port: u16, _value: u32) {}

    #[inline]
    fn inl(&mut self, _port: u16) -> u32 {
        0xFFFF_FFFF
    }

    #[inline]
    fn outb(&mut self, _port: u16, _value: u8) {}

    #[inline]
    fn inb(&mut self, _port: u16) -> u8 {
        0xFF
    }
}
