//! Driver configuration.
//!
//! The host passes configuration as string key/value pairs from the
//! driver's config table; [`SvgaConfig::from_table`] picks out what the
//! SVGA core cares about.

use crate::fifo::DrainPolicy;

/// Config table key selecting the acceleration mode.
pub const ACCELERATION_KEY: &str = "VMWare Acceleration";

/// How much of the adapter's command path the driver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acceleration {
    /// Plain framebuffer; no FIFO update commands.
    None,
    /// Screen updates go through the FIFO.
    #[default]
    Default,
    /// As `Default`, and the host may use the hardware cursor.
    Cursor,
}

impl Acceleration {
    /// Parse a config table value. Unknown values select `Default`.
    pub fn from_config_value(value: &str) -> Self {
        match value.trim() {
            "None" => Self::None,
            "Cursor" => Self::Cursor,
            _ => Self::Default,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Default => "Default",
            Self::Cursor => "Cursor",
        }
    }

    /// Whether screen updates are queued to the adapter.
    pub const fn uses_fifo(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// SVGA driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgaConfig {
    pub acceleration: Acceleration,
    /// Wait policy when the FIFO fills up.
    pub drain: DrainPolicy,
}

impl SvgaConfig {
    /// Build from config table entries; missing keys keep their defaults.
    pub fn from_table<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in entries {
            if key == ACCELERATION_KEY {
                config.acceleration = Acceleration::from_config_value(value);
            }
        }
        config
    }

    pub const fn with_drain(mut self, drain: DrainPolicy) -> Self {
        self.drain = drain;
        self
    }
}
