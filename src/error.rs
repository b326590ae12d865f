//! Error type for the lens link crate as a whole.
use core::fmt::Debug;
use crate::{drivers::nikon::f_mount_lens, hal::serial::Write, uprint, uprintln};

/// Top level error type, meant for the application layer. Unlike the
/// driver's own error, this one carries textual descriptions of the
/// problem so it can be reported directly through a serial device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Error caused by a low level peripheral driver
    DriverError(&'static str),
    /// Error caused by a faulty configuration
    ConfigurationError(&'static str),
    /// Error caused by the lens itself
    DeviceError(&'static str),
}

impl From<f_mount_lens::Error> for Error {
    fn from(error: f_mount_lens::Error) -> Self {
        match error {
            f_mount_lens::Error::TimeOut => {
                Error::DeviceError("Lens did not answer the handshake in time")
            }
            f_mount_lens::Error::SpiError => {
                Error::DriverError("Serial engine failed during a byte exchange")
            }
            f_mount_lens::Error::UnsupportedClockRate => {
                Error::ConfigurationError("No divider setting reaches the lens bus window")
            }
        }
    }
}

/// Exposes a report_unwrap() method that behaves like
/// unwrap(), but also reports any errors via serial before panicking.
pub trait ReportOnUnwrap<T, S: Write<u8>> {
    fn report_unwrap(self, serial: &mut S) -> T;
}

impl<T, S: Write<u8>> ReportOnUnwrap<T, S> for Result<T, Error>
where
    S::Error: Debug,
{
    fn report_unwrap(self, serial: &mut S) -> T {
        match self {
            Ok(value) => value,
            Err(error) => {
                error.report(serial);
                panic!();
            }
        }
    }
}

impl Error {
    /// Reports error via abstract serial device
    pub fn report<S: Write<u8>>(&self, serial: &mut S)
    where
        S::Error: Debug,
    {
        match self {
            Error::DriverError(text) => {
                uprint!(serial, "[DriverError] -> ");
                uprintln!(serial, text);
            },
            Error::ConfigurationError(text) => {
                uprint!(serial, "[ConfigurationError] -> ");
                uprintln!(serial, text);
            },
            Error::DeviceError(text) => {
                uprint!(serial, "[DeviceError] -> ");
                uprintln!(serial, text);
            },
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hal::doubles::{error::FakeError, serial::MockSerial};

    #[test]
    fn driver_errors_convert_with_readable_descriptions() {
        assert_eq!(
            Error::from(f_mount_lens::Error::TimeOut),
            Error::DeviceError("Lens did not answer the handshake in time")
        );
        assert_eq!(
            Error::from(f_mount_lens::Error::UnsupportedClockRate),
            Error::ConfigurationError("No divider setting reaches the lens bus window")
        );
    }

    #[test]
    fn reporting_prefixes_the_error_category() {
        // Given
        let mut serial = MockSerial::default();
        let error: Error = f_mount_lens::Error::TimeOut.into();

        // When
        error.report(&mut serial);

        // Then
        assert_eq!(
            serial.write_record,
            b"[DeviceError] -> Lens did not answer the handshake in time\n"
        );
    }

    #[test]
    fn fake_errors_convert_for_testing() {
        assert_eq!(
            Error::from(FakeError),
            Error::DeviceError("A fake error occurred [TESTING ONLY]")
        );
    }
}
