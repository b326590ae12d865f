//! Test doubles for the HAL interfaces. Only compiled off-target.

pub mod error;
pub mod gpio;
pub mod serial;
pub mod spi;
pub mod time;
