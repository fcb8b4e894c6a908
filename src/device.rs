//! High-level HDC1080 acquisition controller.
//!
//! [`Hdc1080`] is a tick-driven state machine. Each call to
//! [`tick`](Hdc1080::tick) samples the bus engine, advances at most one
//! state-machine step, and hands the resulting request back to the engine.
//! Nothing blocks: waiting is expressed as staying in a state across ticks.
//!
//! ```text
//! Start -> Configure -> Initiate -> Pause -> Read -> Output
//!                          ^                           |
//!                          +---------------------------+
//! ```
//!
//! Configuration is written once per reset; every later cycle goes straight
//! from `Output` back to `Initiate`.

use crate::buffer::{top_bits, MeasurementBuffer, MEASUREMENT_BYTES};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::i2c::I2cEngine;
use crate::interface::{BusEngine, BusRequest, BusStatus};
use crate::registers::{Configuration, Register, CONFIGURATION_LOW, DEVICE_ADDRESS, REG_TEMPERATURE};
use crate::step::{Edge, StepCounter};
use crate::timing::Timing;
use embedded_hal::i2c::I2c;

/// Acquisition state machine states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting out the power-up delay.
    #[default]
    Start,
    /// Writing the configuration register.
    Configure,
    /// Pointing at the temperature register to trigger a measurement.
    Initiate,
    /// Waiting for the conversions to finish.
    Pause,
    /// Reading the four measurement bytes.
    Read,
    /// Publishing the readings.
    Output,
}

/// Published readings together with the widths they were sliced to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measurement {
    /// Top `temperature_bits` of the raw temperature word.
    pub temperature: u16,
    /// Top `humidity_bits` of the raw humidity word.
    pub humidity: u16,
    /// Temperature resolution in bits.
    pub temperature_bits: u8,
    /// Humidity resolution in bits.
    pub humidity_bits: u8,
}

impl Measurement {
    #[inline]
    const fn widen(value: u16, bits: u8) -> u16 {
        if bits == 0 || bits >= 16 {
            value
        } else {
            value << (16 - bits)
        }
    }

    /// Temperature reading re-expanded to the device's 16-bit scale.
    pub const fn temperature_raw(&self) -> u16 {
        Self::widen(self.temperature, self.temperature_bits)
    }

    /// Humidity reading re-expanded to the device's 16-bit scale.
    pub const fn humidity_raw(&self) -> u16 {
        Self::widen(self.humidity, self.humidity_bits)
    }

    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        f32::from(self.temperature_raw()) / 65_536.0 * 165.0 - 40.0
    }

    /// Relative humidity in percent.
    pub fn relative_humidity(&self) -> f32 {
        f32::from(self.humidity_raw()) / 65_536.0 * 100.0
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Measurement {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Measurement {{ temperature: {=u16:#x} ({} bits), humidity: {=u16:#x} ({} bits) }}",
            self.temperature,
            self.temperature_bits,
            self.humidity,
            self.humidity_bits
        );
    }
}

/// Tick-driven acquisition controller for the HDC1080.
pub struct Hdc1080<ENGINE> {
    engine: ENGINE,
    config: Config,
    timing: Timing,
    state: State,
    steps: StepCounter,
    // Power-up and conversion wait; cleared on every state entry.
    ticks: u32,
    // Ticks since the last busy edge, for the stall watchdog.
    idle_ticks: u32,
    buffer: MeasurementBuffer,
    request: BusRequest,
    temperature: u16,
    humidity: u16,
    in_reset: bool,
}

impl<ENGINE> Hdc1080<ENGINE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a controller in `Start`, as if reset had just been released.
    pub fn new(engine: ENGINE, config: Config) -> Self {
        Self {
            engine,
            timing: Timing::from_config(&config),
            config,
            state: State::Start,
            steps: StepCounter::new(),
            ticks: 0,
            idle_ticks: 0,
            buffer: MeasurementBuffer::new(),
            request: BusRequest::idle(DEVICE_ADDRESS),
            temperature: 0,
            humidity: 0,
            in_reset: false,
        }
    }

    /// Consumes the controller and returns the owned engine.
    pub fn release(self) -> (ENGINE, Config) {
        (self.engine, self.config)
    }

    /// Provides shared access to the underlying engine.
    pub fn engine(&self) -> &ENGINE {
        &self.engine
    }

    /// Provides mutable access to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut ENGINE {
        &mut self.engine
    }

    // ==================================================================
    // == Configuration & Observation ===================================
    // ==================================================================
    /// Returns the configuration fixed at construction.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the constants derived from the configuration.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Sub-steps latched so far in the transaction in flight.
    pub fn step(&self) -> u8 {
        self.steps.step()
    }

    /// Request currently presented to the engine.
    pub fn request(&self) -> BusRequest {
        self.request
    }

    // ==================================================================
    // == Readings ======================================================
    // ==================================================================
    /// Last published temperature, `temperature_bits` wide. Zero until the first cycle.
    pub fn temperature(&self) -> u16 {
        self.temperature
    }

    /// Last published humidity, `humidity_bits` wide. Zero until the first cycle.
    pub fn humidity(&self) -> u16 {
        self.humidity
    }

    /// Last published readings with their widths.
    pub fn measurement(&self) -> Measurement {
        Measurement {
            temperature: self.temperature,
            humidity: self.humidity,
            temperature_bits: self.config.temperature.bits(),
            humidity_bits: self.config.humidity.bits(),
        }
    }

    // ==================================================================
    // == Reset =========================================================
    // ==================================================================
    /// Drives the active-low reset input.
    ///
    /// Asserting (`false`) takes effect immediately: the controller returns
    /// to `Start`, drops enable, and clears every counter and both readings.
    /// While held, [`tick`](Self::tick) only keeps the engine clocked.
    pub fn set_reset(&mut self, reset_n: bool) {
        if !reset_n {
            if !self.in_reset {
                info!("hdc1080: reset asserted in {}", self.state);
            }
            self.clear();
        }
        self.in_reset = !reset_n;
    }

    /// Pulses reset.
    pub fn reset(&mut self) {
        self.set_reset(false);
        self.set_reset(true);
    }

    fn clear(&mut self) {
        self.state = State::Start;
        self.steps.reset();
        self.ticks = 0;
        self.idle_ticks = 0;
        self.buffer.clear();
        self.request = BusRequest::idle(DEVICE_ADDRESS);
        self.temperature = 0;
        self.humidity = 0;
    }
}

impl<I2C> Hdc1080<I2cEngine<I2C>>
where
    I2C: I2c,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for blocking I2C buses.
    pub fn new_i2c(i2c: I2C, config: Config) -> Self {
        Self::new(I2cEngine::new(i2c), config)
    }

    /// Releases the controller, returning the I2C bus and configuration.
    pub fn release_i2c(self) -> (I2C, Config) {
        let (engine, config) = self.release();
        (engine.release(), config)
    }
}

impl<ENGINE> Hdc1080<ENGINE>
where
    ENGINE: BusEngine,
{
    // ==================================================================
    // == Control Loop ==================================================
    // ==================================================================
    /// Advances the controller by one tick.
    pub fn tick(&mut self) {
        if !self.in_reset {
            let status = self.engine.status();
            self.advance(status);
        }
        self.engine.clock(&self.request);
    }

    /// Acknowledge-error level of the engine, passed through unmodified.
    pub fn ack_error(&self) -> bool {
        self.engine.status().ack_error
    }

    /// Ticks until the next measurement is published and returns it.
    ///
    /// Fails with [`Error::Timeout`] after `max_ticks` without a publish, or
    /// with [`Error::Bus`] as soon as the engine reports a fault.
    pub fn poll_measurement(&mut self, max_ticks: u32) -> Result<Measurement, ENGINE::Error> {
        for _ in 0..max_ticks {
            let publishing = self.state == State::Output && !self.in_reset;
            self.tick();

            if let Some(err) = self.engine.take_error() {
                return Err(Error::from(err));
            }
            if publishing {
                return Ok(self.measurement());
            }
        }

        Err(Error::Timeout)
    }

    // ==================================================================
    // == State Handlers ================================================
    // ==================================================================
    fn advance(&mut self, status: BusStatus) {
        match self.state {
            State::Start => {
                // A transaction cut short by reset or the watchdog must drain
                // first, or its busy level reads as Configure's first step.
                if self.count_to(self.timing.power_up_ticks) && !status.busy {
                    self.enter(State::Configure);
                }
            }
            State::Configure => {
                let payload = [
                    Configuration::ADDRESS,
                    self.timing.configuration,
                    CONFIGURATION_LOW,
                ];
                self.drive_write(status, &payload, State::Initiate);
            }
            State::Initiate => self.drive_write(status, &[REG_TEMPERATURE], State::Pause),
            State::Pause => {
                if self.count_to(self.timing.measurement_ticks()) {
                    self.enter(State::Read);
                }
            }
            State::Read => self.drive_read(status),
            State::Output => {
                self.publish();
                self.enter(State::Initiate);
            }
        }
    }

    fn count_to(&mut self, target: u32) -> bool {
        self.ticks = self.ticks.saturating_add(1);
        self.ticks >= target
    }

    /// Presents `payload[step]` until every byte has been latched, then drops
    /// enable and moves to `next` once the engine goes idle.
    fn drive_write(&mut self, status: BusStatus, payload: &[u8], next: State) {
        let edge = self.steps.sample(status.busy);
        if self.watchdog_expired(edge) {
            return;
        }

        match payload.get(usize::from(self.steps.step())) {
            Some(&byte) => self.request = BusRequest::write(DEVICE_ADDRESS, byte),
            None => {
                self.request.enable = false;
                if !status.busy {
                    self.enter(next);
                }
            }
        }
    }

    /// Holds a read open for four sub-steps, capturing each byte as its
    /// sub-step goes idle.
    fn drive_read(&mut self, status: BusStatus) {
        let edge = self.steps.sample(status.busy);
        if self.watchdog_expired(edge) {
            return;
        }

        let step = usize::from(self.steps.step());
        if step == 0 {
            self.request = BusRequest::read(DEVICE_ADDRESS);
            return;
        }
        if step >= MEASUREMENT_BYTES {
            self.request.enable = false;
        }

        if edge == Edge::Falling && self.buffer.capture(status.data) == MEASUREMENT_BYTES {
            self.enter(State::Output);
        }
    }

    fn publish(&mut self) {
        if let (Some(temperature), Some(humidity)) = (self.buffer.temperature(), self.buffer.humidity()) {
            self.temperature = top_bits(temperature, self.config.temperature.bits());
            self.humidity = top_bits(humidity, self.config.humidity.bits());
            trace!(
                "hdc1080: published temperature {=u16:#x} humidity {=u16:#x}",
                self.temperature,
                self.humidity
            );
        }
    }

    fn watchdog_expired(&mut self, edge: Edge) -> bool {
        let Some(limit) = self.config.stall_timeout else {
            return false;
        };

        if edge == Edge::None {
            self.idle_ticks = self.idle_ticks.saturating_add(1);
        } else {
            self.idle_ticks = 0;
        }
        if self.idle_ticks <= limit {
            return false;
        }

        warn!(
            "hdc1080: bus stalled in {} at step {}, restarting",
            self.state,
            self.steps.step()
        );
        self.request.enable = false;
        self.enter(State::Start);
        true
    }

    fn enter(&mut self, next: State) {
        debug!("hdc1080: {} -> {}", self.state, next);
        self.state = next;
        self.ticks = 0;
        self.idle_ticks = 0;
        self.steps.reset();
        if next == State::Read {
            self.buffer.clear();
        }
    }
}
