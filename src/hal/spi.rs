//! Traits for Serial Peripheral Interface implementation.
//!
//! Besides the word-by-word [`FullDuplex`] exchange, this module
//! covers the configuration surface a protocol driver needs to claim
//! before talking to its peripheral: bit order, clock mode and the
//! baud rate divider, applied through the [`Configure`] lifecycle.

// Allows the transmission and reception of a word in full duplex.
pub trait FullDuplex<WORD> {
    type Error;

    fn transmit(&mut self, word: Option<WORD>) -> nb::Result<(), Self::Error>;
    // Must be called after transmit (full duplex operation)
    fn receive(&mut self) -> nb::Result<WORD, Self::Error>;
}

/// Which end of each word goes on the wire first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Clock polarity and phase, numbered the usual way. `Zero` is
/// idle-low/sample-on-first-edge, `Three` is idle-high with data
/// valid on the rising edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Zero,
    One,
    Two,
    Three,
}

/// Power-of-two baud rate divider applied to the peripheral clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Divider {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

impl Divider {
    pub const fn ratio(self) -> u32 {
        match self {
            Divider::Div2 => 2,
            Divider::Div4 => 4,
            Divider::Div8 => 8,
            Divider::Div16 => 16,
            Divider::Div32 => 32,
            Divider::Div64 => 64,
            Divider::Div128 => 128,
            Divider::Div256 => 256,
        }
    }
}

/// Full configuration of the serial engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bit_order: BitOrder,
    pub mode: Mode,
    pub divider: Divider,
}

/// Lifecycle of a configurable serial engine.
pub trait Configure {
    type Error;

    /// Applies the configuration and starts the engine.
    fn enable(&mut self, config: Config) -> Result<(), Self::Error>;
    /// Stops the engine. Pins retain whatever state they last held.
    fn disable(&mut self);
}
