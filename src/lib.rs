#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod buffer;
pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod registers;
pub mod step;
pub mod timing;

pub use crate::device::{Hdc1080, Measurement, State};
pub use crate::error::{Error, Result};
