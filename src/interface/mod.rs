//! Bus transaction engine abstraction for the HDC1080 controller.
//!
//! The controller never touches bus timing itself. It hands a
//! [`BusRequest`] to a [`BusEngine`] every tick and watches the engine's
//! [`BusStatus`] to learn when each byte-level sub-step has been latched and
//! completed.

pub mod i2c;

#[cfg(test)]
pub(crate) mod fake;

/// Transfer direction, encoded as the R/W bit of the address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    /// Controller writes to the device.
    Write = 0,
    /// Controller reads from the device.
    Read = 1,
}

/// Command the controller presents to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusRequest {
    /// Held high for the duration of a transaction.
    pub enable: bool,
    /// 7-bit target address.
    pub address: u8,
    /// Transfer direction.
    pub direction: Direction,
    /// Byte to send when writing.
    pub data: u8,
}

impl BusRequest {
    /// Request with enable deasserted.
    pub const fn idle(address: u8) -> Self {
        Self {
            enable: false,
            address,
            direction: Direction::Write,
            data: 0,
        }
    }

    /// Enabled write of `data`.
    pub const fn write(address: u8, data: u8) -> Self {
        Self {
            enable: true,
            address,
            direction: Direction::Write,
            data,
        }
    }

    /// Enabled read.
    pub const fn read(address: u8) -> Self {
        Self {
            enable: true,
            address,
            direction: Direction::Read,
            data: 0,
        }
    }
}

/// Levels the engine exposes back to the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStatus {
    /// High while a sub-step is in flight.
    pub busy: bool,
    /// Last byte read; valid as `busy` falls after a read sub-step.
    pub data: u8,
    /// The device failed to acknowledge.
    pub ack_error: bool,
}

/// Abstraction over the engine that executes bus transactions byte by byte.
///
/// An engine runs at most one transaction at a time. A transaction starts
/// when `enable` is first seen high and ends once the engine sees it low
/// between sub-steps. Each sub-step raises `busy` when the request's command
/// is latched and drops it when the byte has been transferred.
pub trait BusEngine {
    /// Fault type for failures other than a plain non-acknowledge.
    type Error;

    /// Advances the engine by one tick with the controller's current request.
    fn clock(&mut self, request: &BusRequest);

    /// Current output levels.
    fn status(&self) -> BusStatus;

    /// Takes the most recent bus fault, if one occurred.
    fn take_error(&mut self) -> Option<Self::Error>;
}
