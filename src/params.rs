//! Strongly typed parameter enumerations for the HDC1080 driver.
//!
//! These enums map directly to the configuration register field encodings
//! and carry the resolution policy: each resolution knows its register code,
//! its output width, and how many ticks the device needs to convert at it.
//!
//! Unsupported widths never fail. [`HumidityResolution::from_bits`] and
//! [`TemperatureResolution::from_bits`] resolve anything outside the legal set
//! to the 14-bit default, since callers may pass through unchecked widths.
//!
//! # Examples
//!
//! ```rust
//! use hdc1080::params::{HumidityResolution, TemperatureResolution};
//!
//! assert_eq!(HumidityResolution::from_bits(8), HumidityResolution::Bits8);
//! assert_eq!(HumidityResolution::from_bits(12), HumidityResolution::Bits14);
//! assert_eq!(TemperatureResolution::from_bits(11).register_code(), 0b1);
//! ```

use modular_bitfield::prelude::Specifier;

/// Humidity measurement resolution (`CONFIGURATION.HRES`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum HumidityResolution {
    /// 14-bit conversion, ~6.50 ms.
    Bits14 = 0b00,
    /// 11-bit conversion, ~3.85 ms.
    Bits11 = 0b01,
    /// 8-bit conversion, ~2.50 ms.
    Bits8 = 0b10,
}

impl HumidityResolution {
    /// Resolves a raw bit width, falling back to 14 bits for anything unsupported.
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            8 => Self::Bits8,
            11 => Self::Bits11,
            _ => Self::Bits14,
        }
    }

    /// Number of significant bits published for this resolution.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits11 => 11,
            Self::Bits14 => 14,
        }
    }

    /// Two-bit `HRES` code written into the configuration register.
    pub const fn register_code(self) -> u8 {
        self as u8
    }

    /// Ticks the device needs to finish a humidity conversion at `tick_rate`.
    pub const fn conversion_ticks(self, tick_rate: u32) -> u32 {
        match self {
            Self::Bits8 => tick_rate / 400,
            Self::Bits11 => tick_rate / 259,
            Self::Bits14 => tick_rate / 153,
        }
    }
}

impl Default for HumidityResolution {
    fn default() -> Self {
        Self::Bits14
    }
}

/// Temperature measurement resolution (`CONFIGURATION.TRES`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum TemperatureResolution {
    /// 14-bit conversion, ~6.35 ms.
    Bits14 = 0,
    /// 11-bit conversion, ~3.65 ms.
    Bits11 = 1,
}

impl TemperatureResolution {
    /// Resolves a raw bit width, falling back to 14 bits for anything unsupported.
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            11 => Self::Bits11,
            _ => Self::Bits14,
        }
    }

    /// Number of significant bits published for this resolution.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits11 => 11,
            Self::Bits14 => 14,
        }
    }

    /// One-bit `TRES` code written into the configuration register.
    pub const fn register_code(self) -> u8 {
        self as u8
    }

    /// Ticks the device needs to finish a temperature conversion at `tick_rate`.
    pub const fn conversion_ticks(self, tick_rate: u32) -> u32 {
        match self {
            Self::Bits11 => tick_rate / 273,
            Self::Bits14 => tick_rate / 157,
        }
    }
}

impl Default for TemperatureResolution {
    fn default() -> Self {
        Self::Bits14
    }
}

/// Acquisition mode bit (`CONFIGURATION.MODE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum AcquisitionMode {
    /// Temperature or humidity is acquired, depending on the pointer.
    Single = 0,
    /// Temperature and humidity are acquired in sequence, temperature first.
    Sequential = 1,
}
