//! Timing and register constants derived once from a [`Config`].

use crate::config::Config;
use crate::registers::Configuration;

/// Divisor applied to the tick rate for the power-up delay (100 ms).
const POWER_UP_DIVISOR: u32 = 10;

/// Read-only constants the acquisition state machine works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Ticks spent in power-up before the first bus access.
    pub power_up_ticks: u32,
    /// Ticks the device needs for a humidity conversion.
    pub humidity_ticks: u32,
    /// Ticks the device needs for a temperature conversion.
    pub temperature_ticks: u32,
    /// High byte written to the configuration register.
    pub configuration: u8,
}

impl Timing {
    /// Derives the timing and register constants for `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            power_up_ticks: config.tick_rate / POWER_UP_DIVISOR,
            humidity_ticks: config.humidity.conversion_ticks(config.tick_rate),
            temperature_ticks: config.temperature.conversion_ticks(config.tick_rate),
            configuration: u8::from(Configuration::acquisition(
                config.humidity,
                config.temperature,
            )),
        }
    }

    /// Total ticks to wait after triggering a sequential measurement.
    pub const fn measurement_ticks(&self) -> u32 {
        self.humidity_ticks.saturating_add(self.temperature_ticks)
    }
}
