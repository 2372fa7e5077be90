//! Pixel channel masks.

/// Number of set bits in `mask`.
#[inline]
pub const fn calculate_weight(mask: u32) -> u32 {
    mask.count_ones()
}

/// Red/green/blue channel masks as reported by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl PixelMasks {
    pub const fn new(red: u32, green: u32, blue: u32) -> Self {
        Self { red, green, blue }
    }

    /// Color depth: total bits across the three channels.
    pub const fn depth(&self) -> u32 {
        calculate_weight(self.red) + calculate_weight(self.green) + calculate_weight(self.blue)
    }

    /// Bit position of each channel's least significant bit.
    pub const fn shifts(&self) -> (u32, u32, u32) {
        (
            self.red.trailing_zeros(),
            self.green.trailing_zeros(),
            self.blue.trailing_zeros(),
        )
    }

    /// Every channel present, contiguous, and not overlapping another.
    pub fn is_valid(&self) -> bool {
        is_contiguous(self.red)
            && is_contiguous(self.green)
            && is_contiguous(self.blue)
            && self.red & self.green == 0
            && self.red & self.blue == 0
            && self.green & self.blue == 0
    }
}

/// Non-zero run of adjacent set bits.
fn is_contiguous(mask: u32) -> bool {
    if mask == 0 {
        return false;
    }
    let run = mask >> mask.trailing_zeros();
    run & run.wrapping_add(1) == 0
}
