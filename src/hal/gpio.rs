//! # Simple GPIO interface
//!
//! Separate interfaces to Input and Output line roles. The lens link
//! reads the handshake line through an `InputPin` and pulls it down
//! through an `OutputPin`; any open collector stage between the pin
//! and the wire belongs to the pin implementation, so levels here are
//! always the levels seen on the wire itself.
//!
//! Pin mode setup (pull-ups, output drivers, alternate functions) is
//! the port layer's responsibility. Drivers receive pins that are
//! already configured.

/// Interface to a writable pin.
pub trait OutputPin {
    fn set_low(&mut self);
    fn set_high(&mut self);
}

/// Interface to a readable pin.
pub trait InputPin {
    fn is_high(&self) -> bool;
    fn is_low(&self) -> bool;
}
