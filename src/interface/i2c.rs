//! Blocking bus engine built on top of `embedded-hal` `I2c`.
//!
//! `embedded-hal` only offers whole transactions, so the byte-level protocol
//! the controller speaks is emulated: written bytes are buffered and sent as
//! one `write` once enable drops, and the first read sub-step fetches a full
//! measurement burst that later sub-steps hand out one byte at a time. Every
//! sub-step is busy for exactly one tick.

use embedded_hal::i2c::{Error as _, ErrorKind, ErrorType, I2c};

use super::{BusEngine, BusRequest, BusStatus, Direction};
use crate::buffer::MEASUREMENT_BYTES;

// Longest write the controller issues is pointer + two configuration bytes.
const WRITE_CAPACITY: usize = 4;
// Value handed out for read sub-steps past the fetched burst or after a
// failed read, matching a released bus.
const IDLE_BUS_BYTE: u8 = 0xFF;

#[derive(Debug, Clone, Copy)]
struct Active {
    address: u8,
    direction: Direction,
}

/// [`BusEngine`] implementation over a blocking I2C bus.
pub struct I2cEngine<I2C: ErrorType> {
    i2c: I2C,
    status: BusStatus,
    active: Option<Active>,
    pending: u8,
    write_buf: [u8; WRITE_CAPACITY],
    write_len: usize,
    read_buf: [u8; MEASUREMENT_BYTES],
    read_index: usize,
    error: Option<I2C::Error>,
}

impl<I2C> I2cEngine<I2C>
where
    I2C: I2c,
{
    /// Creates a new engine from the provided I2C bus abstraction.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            status: BusStatus::default(),
            active: None,
            pending: 0,
            write_buf: [0; WRITE_CAPACITY],
            write_len: 0,
            read_buf: [0; MEASUREMENT_BYTES],
            read_index: 0,
            error: None,
        }
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the engine and returns the owned I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn begin(&mut self, request: &BusRequest) {
        self.active = Some(Active {
            address: request.address,
            direction: request.direction,
        });
        self.status.ack_error = false;
        self.write_len = 0;
        self.read_index = 0;
    }

    fn latch(&mut self, active: Active, request: &BusRequest) {
        match active.direction {
            Direction::Write => {
                if let Some(slot) = self.write_buf.get_mut(self.write_len) {
                    *slot = request.data;
                    self.write_len += 1;
                } else {
                    warn!("i2c: write buffer full, dropping {=u8:#x}", request.data);
                }
            }
            Direction::Read => {
                if self.read_index == 0 {
                    let result = self.i2c.read(active.address, &mut self.read_buf);
                    if result.is_err() {
                        self.read_buf = [IDLE_BUS_BYTE; MEASUREMENT_BYTES];
                    }
                    self.record(result);
                }
                self.pending = self
                    .read_buf
                    .get(self.read_index)
                    .copied()
                    .unwrap_or(IDLE_BUS_BYTE);
                self.read_index += 1;
            }
        }
        self.status.busy = true;
    }

    fn finish(&mut self, active: Active) {
        if matches!(active.direction, Direction::Write) && self.write_len > 0 {
            let result = self
                .i2c
                .write(active.address, &self.write_buf[..self.write_len]);
            self.record(result);
        }
        self.active = None;
        self.write_len = 0;
        self.read_index = 0;
    }

    fn record(&mut self, result: core::result::Result<(), I2C::Error>) {
        if let Err(err) = result {
            if matches!(err.kind(), ErrorKind::NoAcknowledge(_)) {
                self.status.ack_error = true;
            } else {
                warn!("i2c: bus fault");
                self.error = Some(err);
            }
        }
    }
}

impl<I2C> BusEngine for I2cEngine<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn clock(&mut self, request: &BusRequest) {
        if self.status.busy {
            self.status.busy = false;
            self.status.data = self.pending;
            return;
        }

        match (self.active, request.enable) {
            (None, true) => {
                self.begin(request);
                if let Some(active) = self.active {
                    self.latch(active, request);
                }
            }
            (Some(active), true) => self.latch(active, request),
            (Some(active), false) => self.finish(active),
            (None, false) => {}
        }
    }

    fn status(&self) -> BusStatus {
        self.status
    }

    fn take_error(&mut self) -> Option<Self::Error> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::I2cEngine;
    use crate::interface::{BusEngine, BusRequest};
    use crate::registers::DEVICE_ADDRESS;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    type Engine = I2cEngine<I2cMock>;

    fn write_sub_steps(engine: &mut Engine, bytes: &[u8]) {
        for &byte in bytes {
            let request = BusRequest::write(DEVICE_ADDRESS, byte);
            engine.clock(&request);
            assert!(engine.status().busy, "sub-step must latch");
            engine.clock(&request);
            assert!(!engine.status().busy, "sub-step must complete");
        }
        engine.clock(&BusRequest::idle(DEVICE_ADDRESS));
    }

    fn read_sub_steps(engine: &mut Engine, count: usize) -> Vec<u8> {
        let request = BusRequest::read(DEVICE_ADDRESS);
        let mut bytes = Vec::new();
        for _ in 0..count {
            engine.clock(&request);
            assert!(engine.status().busy);
            engine.clock(&request);
            assert!(!engine.status().busy);
            bytes.push(engine.status().data);
        }
        engine.clock(&BusRequest::idle(DEVICE_ADDRESS));
        bytes
    }

    #[test]
    fn write_sub_steps_flush_as_one_transaction() {
        let expectations = [I2cTransaction::write(DEVICE_ADDRESS, vec![0x02, 0x10, 0x00])];
        let mut engine = I2cEngine::new(I2cMock::new(&expectations));

        write_sub_steps(&mut engine, &[0x02, 0x10, 0x00]);

        assert!(!engine.status().ack_error);
        assert!(engine.take_error().is_none());
        engine.release().done();
    }

    #[test]
    fn read_sub_steps_hand_out_burst_in_order() {
        let expectations = [I2cTransaction::read(DEVICE_ADDRESS, vec![0x66, 0x64, 0x80, 0x00])];
        let mut engine = I2cEngine::new(I2cMock::new(&expectations));

        assert_eq!(read_sub_steps(&mut engine, 4), [0x66, 0x64, 0x80, 0x00]);
        engine.release().done();
    }

    #[test]
    fn idle_request_without_transaction_touches_nothing() {
        let expectations: [I2cTransaction; 0] = [];
        let mut engine = I2cEngine::new(I2cMock::new(&expectations));

        for _ in 0..5 {
            engine.clock(&BusRequest::idle(DEVICE_ADDRESS));
        }
        assert!(!engine.status().busy);
        engine.release().done();
    }

    #[test]
    fn nack_sets_ack_error_until_next_transaction() {
        let expectations = [
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x00])
                .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x00]),
        ];
        let mut engine = I2cEngine::new(I2cMock::new(&expectations));

        write_sub_steps(&mut engine, &[0x00]);
        assert!(engine.status().ack_error);
        assert!(engine.take_error().is_none());

        engine.clock(&BusRequest::write(DEVICE_ADDRESS, 0x00));
        assert!(!engine.status().ack_error);
        engine.clock(&BusRequest::write(DEVICE_ADDRESS, 0x00));
        engine.clock(&BusRequest::idle(DEVICE_ADDRESS));
        assert!(!engine.status().ack_error);
        engine.release().done();
    }

    #[test]
    fn other_faults_are_reported_through_take_error() {
        let expectations = [I2cTransaction::read(DEVICE_ADDRESS, vec![0; 4])
            .with_error(ErrorKind::ArbitrationLoss)];
        let mut engine = I2cEngine::new(I2cMock::new(&expectations));

        assert_eq!(read_sub_steps(&mut engine, 4), [0xFF; 4]);
        assert!(!engine.status().ack_error);
        assert_eq!(engine.take_error(), Some(ErrorKind::ArbitrationLoss));
        assert_eq!(engine.take_error(), None);
        engine.release().done();
    }

    #[test]
    fn nacked_read_hands_out_idle_bus_bytes() {
        let expectations = [I2cTransaction::read(DEVICE_ADDRESS, vec![0; 4])
            .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))];
        let mut engine = I2cEngine::new(I2cMock::new(&expectations));

        assert_eq!(read_sub_steps(&mut engine, 4), [0xFF; 4]);
        assert!(engine.status().ack_error);
        assert!(engine.take_error().is_none());
        engine.release().done();
    }

    #[test]
    fn reads_past_the_burst_return_idle_bus() {
        let expectations = [I2cTransaction::read(DEVICE_ADDRESS, vec![1, 2, 3, 4])];
        let mut engine = I2cEngine::new(I2cMock::new(&expectations));

        assert_eq!(read_sub_steps(&mut engine, 5), [1, 2, 3, 4, 0xFF]);
        engine.release().done();
    }
}
