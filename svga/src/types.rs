//! Display value types.

use crate::error::{Result, SvgaError};

/// Screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning [x1, x2) x [y1, y2).
    pub fn from_corners(x1: u32, y1: u32, x2: u32, y2: u32) -> Result<Self> {
        if x2 < x1 || y2 < y1 {
            return Err(SvgaError::InvalidRect);
        }
        Ok(Self::new(x1, y1, x2 - x1, y2 - y1))
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Operands of the UPDATE command.
    pub const fn to_words(&self) -> [u32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// Current display mode as read from the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeInfo {
    /// Visible width in pixels.
    pub width: u32,
    /// Visible height in pixels.
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Stride in bytes.
    pub bytes_per_line: u32,
    /// Offset of the visible frame inside the framebuffer BAR.
    pub fb_offset: u32,
}

impl ModeInfo {
    /// Check if the adapter reported a usable mode.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.bits_per_pixel > 0 && self.bytes_per_line > 0
    }

    pub const fn full_screen(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}
