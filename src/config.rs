//! Configuration primitives for the HDC1080 driver.

use crate::params::{HumidityResolution, TemperatureResolution};

/// Default controller tick rate in hertz.
pub const DEFAULT_TICK_RATE: u32 = 50_000_000;

/// User-facing configuration for the acquisition controller.
///
/// Fixed for the lifetime of a [`Hdc1080`](crate::device::Hdc1080); every
/// derived wait and register value is computed from it once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Humidity measurement resolution.
    pub humidity: HumidityResolution,
    /// Temperature measurement resolution.
    pub temperature: TemperatureResolution,
    /// Rate at which [`Hdc1080::tick`](crate::device::Hdc1080::tick) is called, in hertz.
    pub tick_rate: u32,
    /// Ticks a bus transaction may go without a busy edge before the
    /// controller abandons it and returns to power-up. `None` waits forever.
    pub stall_timeout: Option<u32>,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the humidity resolution.
    pub fn humidity(mut self, resolution: HumidityResolution) -> Self {
        self.config.humidity = resolution;
        self
    }

    /// Overrides the humidity resolution from a raw width; unsupported widths select 14 bits.
    pub fn humidity_bits(self, bits: u8) -> Self {
        self.humidity(HumidityResolution::from_bits(bits))
    }

    /// Overrides the temperature resolution.
    pub fn temperature(mut self, resolution: TemperatureResolution) -> Self {
        self.config.temperature = resolution;
        self
    }

    /// Overrides the temperature resolution from a raw width; unsupported widths select 14 bits.
    pub fn temperature_bits(self, bits: u8) -> Self {
        self.temperature(TemperatureResolution::from_bits(bits))
    }

    /// Sets the controller tick rate in hertz.
    pub fn tick_rate(mut self, tick_rate: u32) -> Self {
        self.config.tick_rate = tick_rate;
        self
    }

    /// Enables the stall watchdog with the given budget in ticks.
    pub fn stall_timeout(mut self, ticks: u32) -> Self {
        self.config.stall_timeout = Some(ticks);
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            humidity: HumidityResolution::Bits14,
            temperature: TemperatureResolution::Bits14,
            tick_rate: DEFAULT_TICK_RATE,
            stall_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_overrides() {
        let config = Config::new()
            .humidity_bits(8)
            .temperature_bits(11)
            .tick_rate(1_000_000)
            .stall_timeout(500)
            .build();

        assert_eq!(config.humidity, HumidityResolution::Bits8);
        assert_eq!(config.temperature, TemperatureResolution::Bits11);
        assert_eq!(config.tick_rate, 1_000_000);
        assert_eq!(config.stall_timeout, Some(500));
    }

    #[test]
    fn builder_accepts_unsupported_widths_silently() {
        let config = Config::new().humidity_bits(12).temperature_bits(8).build();
        assert_eq!(config, Config::default());
    }
}
