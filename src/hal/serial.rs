//! Abstract serial interface used for error reporting.

/// Serial write half
pub trait Write<Word> {
    type Error;

    /// Writes a single word
    fn write(&mut self, word: Word) -> nb::Result<(), Self::Error>;
}

/// Prints to an abstract serial device
#[macro_export]
macro_rules! uprint {
    ($serial:expr, $arg:tt) => {
        $arg.as_bytes().iter().for_each(|&b| nb::block!($serial.write(b)).unwrap());
    };
}

/// Prints to an abstract serial device, with newline
#[macro_export]
macro_rules! uprintln {
    ($serial:expr, $arg:tt) => {
        uprint!($serial, $arg);
        uprint!($serial, "\n");
    };
}
