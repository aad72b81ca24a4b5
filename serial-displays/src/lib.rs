#![cfg_attr(not(test), no_std)]

mod buffer;
mod bus;
mod digits;
pub mod font;
mod keys;
mod on_off;

#[cfg(test)]
mod testing;

use core::fmt;

pub use buffer::*;
pub use bus::*;
pub use digits::*;
pub use keys::*;
pub use on_off::*;

/// Mistakes in the arguments passed to the display.  These indicate a bug at the call site; the
/// display contents are left unchanged when one is returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A digit outside `0..=9`
    InvalidDigit(u8),

    /// A digit position outside `0..=3`
    InvalidPosition(u8),

    /// A value too large to show on four digits
    ValueOutOfRange(u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDigit(digit) => write!(f, "digit {digit} is not in 0..=9"),
            Error::InvalidPosition(position) => {
                write!(f, "digit position {position} is not in 0..=3")
            }
            Error::ValueOutOfRange(value) => {
                write!(f, "{value} does not fit on {DIGIT_COUNT} digits")
            }
        }
    }
}

pub struct SerialDisplaysBuilder;

impl SerialDisplaysBuilder {
    /// Use an arbitrary [`BusDriver`] implementation
    pub fn with_bus_driver<D: BusDriver>(self, driver: D) -> SerialDisplaysBuilder2<D> {
        SerialDisplaysBuilder2 { driver }
    }

    /// Use the bit-banging driver on any three `embedded-hal` output pins: serial data (DIO),
    /// shift clock (SCLK) and register clock (RCLK), in that order
    pub fn with_pins<Data, Clock, Latch>(
        self,
        data: Data,
        clock: Clock,
        latch: Latch,
    ) -> SerialDisplaysBuilder1<Data, Clock, Latch>
    where
        Data: embedded_hal_1::digital::OutputPin,
        Clock: embedded_hal_1::digital::OutputPin<Error = Data::Error>,
        Latch: embedded_hal_1::digital::OutputPin<Error = Data::Error>,
    {
        SerialDisplaysBuilder1 { data, clock, latch }
    }

    /// Use a bit-banging driver talking to the specified Embassy RP HAL pins
    #[cfg(feature = "embassy-rp")]
    pub fn with_embassy_rp_pins<
        'a,
        DioPin: embassy_rp::gpio::Pin,
        SclkPin: embassy_rp::gpio::Pin,
        RclkPin: embassy_rp::gpio::Pin,
    >(
        self,
        dio: DioPin,
        sclk: SclkPin,
        rclk: RclkPin,
    ) -> SerialDisplaysBuilder1<
        embassy_rp::gpio::Output<'a, DioPin>,
        embassy_rp::gpio::Output<'a, SclkPin>,
        embassy_rp::gpio::Output<'a, RclkPin>,
    > {
        let (dio, sclk, rclk) = embassy_rp_outputs(dio, sclk, rclk);
        self.with_pins(dio, sclk, rclk)
    }
}

pub struct SerialDisplaysBuilder1<Data, Clock, Latch> {
    data: Data,
    clock: Clock,
    latch: Latch,
}

impl<Data, Clock, Latch> SerialDisplaysBuilder1<Data, Clock, Latch>
where
    Data: embedded_hal_1::digital::OutputPin,
    Clock: embedded_hal_1::digital::OutputPin<Error = Data::Error>,
    Latch: embedded_hal_1::digital::OutputPin<Error = Data::Error>,
{
    /// Construct the [`SerialDisplays`] instance using the bit-banging driver.
    ///
    /// This is fallible if the underlying pin implementation is.
    pub fn build(
        self,
        buffer: &DisplayBuffer,
    ) -> Result<SerialDisplays<'_, BitBangingBusDriver<Data, Clock, Latch>>, Data::Error> {
        let driver = BitBangingBusDriver::new(self.data, self.clock, self.latch)?;
        Ok(SerialDisplays::new(driver, buffer))
    }
}

pub struct SerialDisplaysBuilder2<D: BusDriver> {
    driver: D,
}

impl<D: BusDriver> SerialDisplaysBuilder2<D> {
    /// Construct the [`SerialDisplays`] instance using the selected driver.
    pub fn build(self, buffer: &DisplayBuffer) -> SerialDisplays<'_, D> {
        SerialDisplays::new(self.driver, buffer)
    }
}

/// Driver for a 4-digit multiplexed 7-segment display behind a pair of 74HC595 shift registers.
///
/// The first byte shifted into the chain selects the segments, the second selects which of the
/// four digits is powered.  Only one digit is lit at a time, so [`Self::update_displays`] has to
/// be called periodically, typically from a timer interrupt, cycling through all four digits
/// quickly enough that the eye sees them all lit at once.
///
/// What is displayed lives in a [`DisplayBuffer`] that this driver borrows.  Application code can
/// change it through the same buffer (or through the delegating methods here) while the refresh
/// cycle runs elsewhere; each refresh works from a consistent snapshot.
///
/// The most straightforward way to instantiate this driver is using [`Self::builder`]. For
/// example, with the `embassy-rp` HAL:
///
/// ```
/// # #[cfg(feature = "embassy-rp")]
/// # {
/// let p = embassy_rp::init(Default::default());
/// static BUFFER: serial_displays::DisplayBuffer = serial_displays::DisplayBuffer::new();
/// let mut display = serial_displays::SerialDisplays::builder()
///     .with_embassy_rp_pins(p.PIN_7, p.PIN_8, p.PIN_9)
///     .build(&BUFFER)
///     .unwrap();
/// display.write_word(2222).unwrap();
/// display.update_displays().unwrap();
/// # }
/// ```
pub struct SerialDisplays<'a, Driver> {
    driver: Driver,
    buffer: &'a DisplayBuffer,
}

impl SerialDisplays<'_, ()> {
    /// Return a builder pattern implementation to ease some of the type parameter complexity
    /// around creating the bus driver.
    pub fn builder() -> SerialDisplaysBuilder {
        SerialDisplaysBuilder
    }
}

impl<'a, Driver: BusDriver> SerialDisplays<'a, Driver> {
    /// Take over `buffer` for this display, blanking it
    pub fn new(driver: Driver, buffer: &'a DisplayBuffer) -> Self {
        buffer.clear_displays();

        Self { driver, buffer }
    }

    /// The buffer this driver displays
    pub fn buffer(&self) -> &'a DisplayBuffer {
        self.buffer
    }

    /// Give the bus driver back
    pub fn release(self) -> Driver {
        self.driver
    }

    /// Show `digit` at `position`; see [`Digits::write_nibble`]
    pub fn write_nibble(&self, digit: u8, position: u8) -> Result<(), Error> {
        self.buffer.write_nibble(digit, position)
    }

    /// Show a 4-digit decimal value; see [`Digits::write_word`]
    pub fn write_word(&self, value: u16) -> Result<(), Error> {
        self.buffer.write_word(value)
    }

    pub fn clear_displays(&self) {
        self.buffer.clear_displays()
    }

    pub fn show_zeros_left(&self) {
        self.buffer.show_zeros_left()
    }

    pub fn hide_zeros_left(&self) {
        self.buffer.hide_zeros_left()
    }

    /// Run one full multiplexing cycle.
    ///
    /// For each position from 0 to 3: shift out its segment pattern, then its one-hot digit
    /// select byte, then pulse the register clock so both appear on the outputs together.  This
    /// never blocks, so it is safe to call from an interrupt handler.
    pub fn update_displays(&mut self) -> Result<(), Driver::Error> {
        let patterns = self.buffer.snapshot().patterns();

        #[cfg(feature = "defmt")]
        defmt::trace!("refresh patterns = {=[u8]:x}", &patterns[..]);

        for position in Position::ALL {
            self.driver.shift_out(patterns[position.index()])?;
            self.driver.shift_out(position.select_strobe())?;
            self.driver.latch()?;
        }

        Ok(())
    }
}
