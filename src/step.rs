//! Busy-edge step counting.
//!
//! The bus engine only exposes a busy level. [`StepCounter`] compares it with
//! the level seen on the previous tick to turn it into events: idle to busy
//! means the engine latched the next sub-step's command, busy to idle means
//! that sub-step's result is valid this tick.

/// Busy-level transition observed on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// No change since the previous tick.
    None,
    /// Idle to busy; the step index was just incremented.
    Rising,
    /// Busy to idle; the current step's result is valid.
    Falling,
}

/// Counts sub-steps of the transaction in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounter {
    previous_busy: bool,
    step: u8,
}

impl StepCounter {
    /// Creates a counter at step 0 with the engine assumed idle.
    pub const fn new() -> Self {
        Self {
            previous_busy: false,
            step: 0,
        }
    }

    /// Samples the busy level for this tick and reports the transition, if any.
    pub fn sample(&mut self, busy: bool) -> Edge {
        let edge = match (self.previous_busy, busy) {
            (false, true) => {
                self.step = self.step.saturating_add(1);
                Edge::Rising
            }
            (true, false) => Edge::Falling,
            _ => Edge::None,
        };
        self.previous_busy = busy;
        edge
    }

    /// Number of commands the engine has latched in this transaction.
    pub const fn step(&self) -> u8 {
        self.step
    }

    /// Returns to step 0 ahead of a fresh transaction.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
