//! Error handling primitives for the HDC1080 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
///
/// The tick-driven core never fails; these only surface from the blocking
/// helpers layered on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A fault reported by the bus engine other than a plain non-acknowledge.
    Bus(E),
    /// No measurement was published within the allotted number of ticks.
    Timeout,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Bus(err)
    }
}
