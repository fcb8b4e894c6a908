//! Scripted bus engine used by the controller tests.

use core::convert::Infallible;

use super::{BusEngine, BusRequest, BusStatus, Direction};

/// One transaction as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub address: u8,
    pub direction: Direction,
    /// Bytes written, or bytes handed out for reads.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle { waited: u32 },
    Busy { remaining: u32 },
}

/// Engine whose sub-step timing is scripted: it waits `latency` ticks with
/// enable high before latching, then stays busy for `busy_ticks`.
pub struct FakeEngine {
    latency: u32,
    busy_ticks: u32,
    read_bytes: Vec<u8>,
    read_cursor: usize,
    status: BusStatus,
    phase: Phase,
    pending: u8,
    current: Option<Recorded>,
    pub transactions: Vec<Recorded>,
    /// Never completes a sub-step while set.
    pub stalled: bool,
}

impl FakeEngine {
    pub fn new(latency: u32, busy_ticks: u32) -> Self {
        assert!(busy_ticks > 0, "a sub-step must be busy for at least one tick");
        Self {
            latency,
            busy_ticks,
            read_bytes: Vec::new(),
            read_cursor: 0,
            status: BusStatus::default(),
            phase: Phase::Idle { waited: 0 },
            pending: 0,
            current: None,
            transactions: Vec::new(),
            stalled: false,
        }
    }

    /// Bytes returned by read sub-steps, cycled.
    pub fn with_read_bytes(mut self, bytes: &[u8]) -> Self {
        self.read_bytes = bytes.to_vec();
        self
    }

    pub fn set_read_bytes(&mut self, bytes: &[u8]) {
        self.read_bytes = bytes.to_vec();
        self.read_cursor = 0;
    }

    pub fn set_ack_error(&mut self, ack_error: bool) {
        self.status.ack_error = ack_error;
    }

    /// Transactions that have been closed by enable dropping.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.transactions
            .iter()
            .filter(|t| t.direction == Direction::Write)
            .map(|t| t.bytes.clone())
            .collect()
    }

    fn next_read_byte(&mut self) -> u8 {
        if self.read_bytes.is_empty() {
            return 0;
        }
        let byte = self.read_bytes[self.read_cursor % self.read_bytes.len()];
        self.read_cursor += 1;
        byte
    }

    fn latch(&mut self, request: &BusRequest) {
        let current = self.current.get_or_insert_with(|| Recorded {
            address: request.address,
            direction: request.direction,
            bytes: Vec::new(),
        });
        let direction = current.direction;
        let byte = match direction {
            Direction::Write => request.data,
            Direction::Read => {
                let byte = self.next_read_byte();
                self.pending = byte;
                byte
            }
        };
        if let Some(current) = self.current.as_mut() {
            current.bytes.push(byte);
        }
        self.status.busy = true;
        self.phase = Phase::Busy {
            remaining: self.busy_ticks,
        };
    }
}

impl BusEngine for FakeEngine {
    type Error = Infallible;

    fn clock(&mut self, request: &BusRequest) {
        match self.phase {
            Phase::Busy { remaining } => {
                if self.stalled {
                    return;
                }
                if remaining > 1 {
                    self.phase = Phase::Busy {
                        remaining: remaining - 1,
                    };
                } else {
                    self.status.busy = false;
                    self.status.data = self.pending;
                    self.phase = Phase::Idle { waited: 0 };
                }
            }
            Phase::Idle { waited } => {
                if request.enable {
                    if waited >= self.latency {
                        self.latch(request);
                    } else {
                        self.phase = Phase::Idle { waited: waited + 1 };
                    }
                } else {
                    self.phase = Phase::Idle { waited: 0 };
                    if let Some(done) = self.current.take() {
                        self.transactions.push(done);
                    }
                }
            }
        }
    }

    fn status(&self) -> BusStatus {
        self.status
    }

    fn take_error(&mut self) -> Option<Self::Error> {
        None
    }
}
