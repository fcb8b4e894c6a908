//! Register map definitions for the HDC1080 humidity and temperature sensor.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AcquisitionMode, HumidityResolution, TemperatureResolution};

/// Fixed 7-bit bus address of the HDC1080.
pub const DEVICE_ADDRESS: u8 = 0x40;

/// Register address of `TEMPERATURE`; pointing here triggers a measurement.
pub const REG_TEMPERATURE: u8 = 0x00;
/// Register address of `HUMIDITY`.
pub const REG_HUMIDITY: u8 = 0x01;
/// Register address of `CONFIGURATION`.
pub const REG_CONFIGURATION: u8 = 0x02;
/// Register address of the first `SERIAL_ID` word.
pub const REG_SERIAL_ID: u8 = 0xFB;
/// Register address of `MANUFACTURER_ID`.
pub const REG_MANUFACTURER_ID: u8 = 0xFE;
/// Register address of `DEVICE_ID`.
pub const REG_DEVICE_ID: u8 = 0xFF;

/// Expected contents of `MANUFACTURER_ID` ("TI").
pub const EXPECTED_MANUFACTURER_ID: u16 = 0x5449;
/// Expected contents of `DEVICE_ID`.
pub const EXPECTED_DEVICE_ID: u16 = 0x1050;

/// Low byte of `CONFIGURATION`; reserved, must be written as zero.
pub const CONFIGURATION_LOW: u8 = 0x00;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `CONFIGURATION` high byte (address `0x02`, bits 15:8).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    // Humidity resolution (bits 9:8).
    pub humidity_resolution: HumidityResolution,
    // Temperature resolution (bit 10).
    pub temperature_resolution: TemperatureResolution,
    // Supply below 2.8 V (bit 11, read-only).
    pub battery_low: bool,
    // Acquisition mode (bit 12).
    pub mode: AcquisitionMode,
    // Heater enable (bit 13).
    pub heater: bool,
    #[skip]
    __: B1,
    // Software reset, self-clearing (bit 15).
    pub software_reset: bool,
}

impl Configuration {
    /// Builds the acquisition byte written during configuration: sequential
    /// mode, heater off, with the requested resolutions.
    pub fn acquisition(
        humidity: HumidityResolution,
        temperature: TemperatureResolution,
    ) -> Self {
        Self::new()
            .with_mode(AcquisitionMode::Sequential)
            .with_temperature_resolution(temperature)
            .with_humidity_resolution(humidity)
    }
}

impl From<u8> for Configuration {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Configuration> for u8 {
    fn from(value: Configuration) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for Configuration {
    type Raw = u8;
    const ADDRESS: u8 = REG_CONFIGURATION;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x10);
}
