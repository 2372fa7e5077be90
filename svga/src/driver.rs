//! Host display framework adapter.
//!
//! The host framework talks to display drivers through
//! [`FramebufferDisplay`]. [`VmwareFb`] satisfies it by delegating to an
//! [`SvgaCore`], keeping the adapter protocol out of the host ABI.

use log::debug;

use crate::config::SvgaConfig;
use crate::device::SvgaCore;
use crate::error::{Result, SvgaError};
use crate::fifo::FifoMemory;
use crate::pio::PortIo;
use crate::types::{ModeInfo, Rect};

/// Host parameter carrying an update request as x1, y1, x2, y2.
pub const UPDATE_SCREEN_PARAM: &str = "VMWareUpdateScreen";

/// Display driver interface expected by the host framework.
pub trait FramebufferDisplay {
    /// Human-readable driver name.
    fn name(&self) -> &str;

    /// Current mode as reported by the hardware.
    fn mode(&self) -> ModeInfo;

    /// Tell the display a screen region changed.
    fn update_rect(&mut self, rect: Rect) -> Result<()>;

    /// Tell the display the whole screen changed.
    fn update_full_screen(&mut self) -> Result<()>;

    /// Wait until queued updates have been processed.
    fn sync(&mut self) -> Result<()>;

    /// Integer parameter hook (`setIntValues:forParameter:count:` in the host ABI).
    fn set_int_values(&mut self, parameter: &str, values: &[u32]) -> Result<()>;
}

/// VMware SVGA display driver.
pub struct VmwareFb<P: PortIo, M: FifoMemory> {
    core: SvgaCore<P, M>,
    config: SvgaConfig,
}

impl<P: PortIo, M: FifoMemory> VmwareFb<P, M> {
    pub fn new(mut core: SvgaCore<P, M>, config: SvgaConfig) -> Self {
        core.set_drain_policy(config.drain);
        debug!(
            "SVGA: display adapter up, acceleration={}",
            config.acceleration.as_str()
        );
        Self { core, config }
    }

    pub fn config(&self) -> &SvgaConfig {
        &self.config
    }

    pub fn core(&self) -> &SvgaCore<P, M> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut SvgaCore<P, M> {
        &mut self.core
    }

    pub fn into_core(self) -> SvgaCore<P, M> {
        self.core
    }
}

impl<P: PortIo, M: FifoMemory> FramebufferDisplay for VmwareFb<P, M> {
    fn name(&self) -> &str {
        "VMWareFB"
    }

    fn mode(&self) -> ModeInfo {
        self.core.mode()
    }

    fn update_rect(&mut self, rect: Rect) -> Result<()> {
        if !self.config.acceleration.uses_fifo() || rect.is_empty() {
            return Ok(());
        }
        self.core.update_rect(rect)
    }

    fn update_full_screen(&mut self) -> Result<()> {
        if !self.config.acceleration.uses_fifo() {
            return Ok(());
        }
        self.core.update_full_screen()
    }

    fn sync(&mut self) -> Result<()> {
        if !self.config.acceleration.uses_fifo() {
            return Ok(());
        }
        self.core.sync()
    }

    fn set_int_values(&mut self, parameter: &str, values: &[u32]) -> Result<()> {
        if parameter != UPDATE_SCREEN_PARAM {
            return Err(SvgaError::UnknownParameter);
        }
        match *values {
            [x1, y1, x2, y2] => self.update_rect(Rect::from_corners(x1, y1, x2, y2)?),
            _ => Err(SvgaError::InvalidParameterCount {
                expected: 4,
                got: values.len(),
            }),
        }
    }
}
