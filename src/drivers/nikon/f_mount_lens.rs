//! Device driver for Nikon F-mount lenses.
//!
//! F-mount lenses speak a modified SPI. Data travels least significant
//! bit first, the clock idles high with data valid on the rising edge,
//! and a bidirectional handshake (H/S) line gates every byte phase of
//! an exchange: the body opens a command with a short low pulse on H/S,
//! then each byte (command, response, payload) waits for the lens to
//! pull H/S low and is finished once the lens lets it float high again.
//! Every byte the body puts on the wire is bitwise inverted; bytes the
//! lens answers with are taken as-is.
//!
//! Electrically, the body side drives both the data line and H/S
//! through open collector stages, so the pins handed to this driver
//! must already be configured accordingly: `handshake_in` as an input
//! reading the wire level (pulled up, low means asserted) and
//! `handshake_out` as an output whose low level pulls the wire down.
//!
//! Bodies start talking at 96 kHz and renegotiate up to 156 kHz, so
//! the bus is run at the slowest divider setting that still lands in
//! that window. A 16 MHz peripheral clock divides down to 125 kHz.

use crate::hal::{
    gpio::{InputPin, OutputPin},
    spi::{BitOrder, Config, Configure, Divider, FullDuplex, Mode},
    time::{self, DelayUs, Hertz, Microseconds},
};
use nb::block;
use static_assertions::const_assert;

/// Bus rates the lens accepts.
const LENS_BUS_MIN: Hertz = Hertz(96_000);
const LENS_BUS_MAX: Hertz = Hertz(156_000);
const_assert!(LENS_BUS_MIN.0 < LENS_BUS_MAX.0);

/// How long the H/S line is held low to open an exchange.
const HANDSHAKE_PULSE: Microseconds = Microseconds(100);

/// F-mount lens driver, generic over a full duplex serial engine, the
/// two handshake line roles, and a time source for the bounded waits.
pub struct NikonFMount<SPI, IN, OUT, DELAY, NOW>
where
    SPI: FullDuplex<u8> + Configure,
    IN: InputPin,
    OUT: OutputPin,
    DELAY: DelayUs,
    NOW: time::Now,
{
    spi: SPI,
    handshake_in: IN,
    handshake_out: OUT,
    delay: DELAY,
    timeout: Option<(time::Milliseconds, NOW)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    TimeOut,
    SpiError,
    UnsupportedClockRate,
}

impl<SPI, IN, OUT, DELAY, NOW> NikonFMount<SPI, IN, OUT, DELAY, NOW>
where
    SPI: FullDuplex<u8> + Configure,
    IN: InputPin,
    OUT: OutputPin,
    DELAY: DelayUs,
    NOW: time::Now,
{
    /// Claims the serial engine and handshake lines for lens use.
    ///
    /// The engine is configured LSB first, mode 3, at the slowest rate
    /// inside the lens bus window for the given peripheral clock.
    /// Fails with `UnsupportedClockRate` when no divider setting can
    /// reach that window.
    ///
    /// Handshake waits are unbounded in this mode: a lens that never
    /// answers hangs the caller. Use [`Self::with_timeout`] to bound
    /// them.
    pub fn new(
        spi: SPI,
        handshake_in: IN,
        mut handshake_out: OUT,
        delay: DELAY,
        peripheral_clock: Hertz,
    ) -> Result<Self, Error> {
        let divider = Self::divider_for(peripheral_clock)?;
        handshake_out.set_high();
        let mut link = Self { spi, handshake_in, handshake_out, delay, timeout: None };
        link.spi
            .enable(Config { bit_order: BitOrder::LsbFirst, mode: Mode::Three, divider })
            .map_err(|_| Error::SpiError)?;
        Ok(link)
    }

    /// Same as [`Self::new`], but every handshake wait is bounded by
    /// `timeout` as measured through `ticker`, failing with `TimeOut`
    /// on expiry.
    pub fn with_timeout(
        spi: SPI,
        handshake_in: IN,
        handshake_out: OUT,
        delay: DELAY,
        peripheral_clock: Hertz,
        timeout: time::Milliseconds,
        ticker: NOW,
    ) -> Result<Self, Error> {
        let mut link = Self::new(spi, handshake_in, handshake_out, delay, peripheral_clock)?;
        link.timeout = Some((timeout, ticker));
        Ok(link)
    }

    /// Sends command `command` to the lens, reading `response` then
    /// writing `payload`.
    ///
    /// Either slice may be empty if the command carries no data in
    /// that direction. Received bytes are stored in `response` exactly
    /// as they arrived; `payload` bytes are inverted on their way to
    /// the wire, as the protocol demands. Blocks for the whole
    /// exchange.
    pub fn send_command(
        &mut self,
        command: u8,
        response: &mut [u8],
        payload: &[u8],
    ) -> Result<(), Error> {
        self.pulse_handshake(HANDSHAKE_PULSE);
        self.wait_for_handshake(true)?;
        self.transfer(!command)?;
        self.wait_for_handshake(false)?;

        // Receive data from lens, if any
        for slot in response.iter_mut() {
            self.wait_for_handshake(true)?;
            *slot = self.transfer(0x00)?;
            self.wait_for_handshake(false)?;
        }

        // Send data to lens, if any
        for &byte in payload {
            self.wait_for_handshake(true)?;
            self.transfer(!byte)?;
            self.wait_for_handshake(false)?;
        }

        Ok(())
    }

    /// Stops the serial engine and hands the hardware back. The
    /// handshake lines keep whatever level they last held.
    pub fn release(mut self) -> (SPI, IN, OUT, DELAY) {
        self.spi.disable();
        (self.spi, self.handshake_in, self.handshake_out, self.delay)
    }

    /// Slowest divider setting that still lands in the lens bus window.
    fn divider_for(peripheral_clock: Hertz) -> Result<Divider, Error> {
        const SLOWEST_FIRST: [Divider; 8] = [
            Divider::Div256,
            Divider::Div128,
            Divider::Div64,
            Divider::Div32,
            Divider::Div16,
            Divider::Div8,
            Divider::Div4,
            Divider::Div2,
        ];
        for divider in SLOWEST_FIRST {
            let bus = Hertz(peripheral_clock.0 / divider.ratio());
            if bus >= LENS_BUS_MIN {
                return if bus <= LENS_BUS_MAX {
                    Ok(divider)
                } else {
                    Err(Error::UnsupportedClockRate)
                };
            }
        }
        Err(Error::UnsupportedClockRate)
    }

    /// Holds the H/S line low for the given duration. Blocks.
    fn pulse_handshake(&mut self, duration: Microseconds) {
        self.handshake_out.set_low();
        self.delay.delay_us(duration);
        self.handshake_out.set_high();
    }

    fn handshake_asserted(&self) -> bool { self.handshake_in.is_low() }

    /// Spins until H/S reaches the requested state, bounded by the
    /// configured timeout if there is one.
    fn wait_for_handshake(&self, asserted: bool) -> Result<(), Error> {
        if let Some((timeout, ticker)) = &self.timeout {
            let start = ticker.now();
            while self.handshake_asserted() != asserted {
                if ticker.now() - start > *timeout {
                    return Err(Error::TimeOut);
                }
            }
        } else {
            while self.handshake_asserted() != asserted {}
        }
        Ok(())
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, Error> {
        block!(self.spi.transmit(Some(byte))).map_err(|_| Error::SpiError)?;
        block!(self.spi.receive()).map_err(|_| Error::SpiError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hal::{
        doubles::{gpio::*, spi::*, time::*},
        time::{Milliseconds, U32Ext},
    };

    type LinkToTest = NikonFMount<MockSpi<u8>, MockInputPin, MockPin, MockDelay, MockSysTick>;

    const PERIPHERAL_CLOCK: Hertz = Hertz(16_000_000);

    fn link_to_test() -> LinkToTest {
        NikonFMount::new(
            MockSpi::new(),
            MockInputPin::default(),
            MockPin::default(),
            MockDelay::default(),
            PERIPHERAL_CLOCK,
        )
        .unwrap()
    }

    /// Queues one full assert-then-release H/S cycle per expected phase.
    fn script_handshake_cycles(link: &LinkToTest, cycles: usize) {
        for _ in 0..cycles {
            link.handshake_in.script(&[false, true]);
        }
    }

    #[test]
    fn initialisation_configures_engine_for_lens_bus() {
        // When
        let link = link_to_test();

        // Then
        assert!(link.spi.enabled);
        assert_eq!(
            link.spi.config,
            Some(Config {
                bit_order: BitOrder::LsbFirst,
                mode: Mode::Three,
                divider: Divider::Div128,
            })
        );
        // H/S out released on claim
        assert_eq!(link.handshake_out.changes, [true]);
    }

    #[test]
    fn divider_selection_prefers_slowest_rate_inside_lens_window() {
        assert_eq!(LinkToTest::divider_for(16_u32.mhz().into()), Ok(Divider::Div128));
        assert_eq!(LinkToTest::divider_for(25_u32.mhz().into()), Ok(Divider::Div256));
        assert_eq!(LinkToTest::divider_for(8_u32.mhz().into()), Ok(Divider::Div64));
    }

    #[test]
    fn initialisation_rejects_clock_rates_outside_lens_window() {
        // 20 MHz straddles the window: /128 overshoots, /256 undershoots
        let unsupported: [Hertz; 3] =
            [20_u32.mhz().into(), 200_u32.mhz().into(), 100_u32.khz().into()];
        for clock in unsupported {
            assert_eq!(
                LinkToTest::new(
                    MockSpi::new(),
                    MockInputPin::default(),
                    MockPin::default(),
                    MockDelay::default(),
                    clock,
                )
                .err(),
                Some(Error::UnsupportedClockRate)
            );
        }
    }

    #[test]
    fn command_byte_travels_inverted() {
        // Given
        let mut link = link_to_test();
        script_handshake_cycles(&link, 1);

        // When
        link.send_command(0x3A, &mut [], &[]).unwrap();

        // Then
        assert_eq!(link.spi.sent, [0xC5]);
        assert!(link.handshake_in.is_exhausted());
    }

    #[test]
    fn exchange_opens_with_a_single_pulse_on_handshake_out() {
        // Given
        let mut link = link_to_test();
        script_handshake_cycles(&link, 1);

        // When
        link.send_command(0x3A, &mut [], &[]).unwrap();

        // Then (released on claim, then asserted and released once)
        assert_eq!(link.handshake_out.changes, [true, false, true]);
        assert_eq!(link.delay.pauses, [Microseconds(100)]);
    }

    #[test]
    fn read_phases_store_bus_bytes_uninverted() {
        // Given
        let mut link = link_to_test();
        let mut response = [0u8; 2];
        // One byte clocked back per phase: command echo, then data
        link.spi.to_receive.extend([0xFF, 0x10, 0x20]);
        script_handshake_cycles(&link, 3);

        // When
        link.send_command(0x01, &mut response, &[]).unwrap();

        // Then (dummy zeros drive the read phases)
        assert_eq!(response, [0x10, 0x20]);
        assert_eq!(link.spi.sent, [0xFE, 0x00, 0x00]);
        assert!(link.handshake_in.is_exhausted());
    }

    #[test]
    fn write_phases_invert_payload_bytes() {
        // Given
        let mut link = link_to_test();
        script_handshake_cycles(&link, 2);

        // When
        link.send_command(0x01, &mut [], &[0x55]).unwrap();

        // Then
        assert_eq!(link.spi.sent, [0xFE, 0xAA]);
        assert!(link.handshake_in.is_exhausted());
    }

    #[test]
    fn read_phases_complete_before_write_phases() {
        // Given
        let mut link = link_to_test();
        let mut response = [0u8; 2];
        script_handshake_cycles(&link, 5);

        // When
        link.send_command(0x05, &mut response, &[0x55, 0xAA]).unwrap();

        // Then (both dummy zeros precede the inverted payload)
        assert_eq!(link.spi.sent, [0xFA, 0x00, 0x00, 0xAA, 0x55]);
        assert!(link.handshake_in.is_exhausted());
    }

    #[test]
    fn silent_lens_times_out_when_waits_are_bounded() {
        // Given (H/S never leaves its pull-up)
        let mut link = LinkToTest::with_timeout(
            MockSpi::new(),
            MockInputPin::default(),
            MockPin::default(),
            MockDelay::default(),
            PERIPHERAL_CLOCK,
            Milliseconds(5),
            MockSysTick::new(Milliseconds(1)),
        )
        .unwrap();

        // Then
        assert_eq!(link.send_command(0x3A, &mut [], &[]), Err(Error::TimeOut));
    }

    #[test]
    fn responsive_lens_is_unaffected_by_bounded_waits() {
        // Given
        let mut link = LinkToTest::with_timeout(
            MockSpi::new(),
            MockInputPin::default(),
            MockPin::default(),
            MockDelay::default(),
            PERIPHERAL_CLOCK,
            Milliseconds(5),
            MockSysTick::new(Milliseconds(1)),
        )
        .unwrap();
        script_handshake_cycles(&link, 1);

        // Then
        assert_eq!(link.send_command(0x3A, &mut [], &[]), Ok(()));
        assert_eq!(link.spi.sent, [0xC5]);
    }

    #[test]
    fn release_stops_engine_and_returns_hardware() {
        // Given
        let link = link_to_test();

        // When
        let (spi, _handshake_in, handshake_out, _delay) = link.release();

        // Then
        assert!(!spi.enabled);
        // H/S out untouched by release
        assert_eq!(handshake_out.changes, [true]);
    }
}
