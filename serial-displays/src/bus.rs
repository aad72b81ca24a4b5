//! Module describing the [`BusDriver`] trait and the bit-banging implementation that drives a
//! chain of 74HC595 shift registers.

use embedded_hal_1::digital::{OutputPin, PinState};

/// This trait represents the low-level implementation of the serial bus feeding the shift
/// register chain behind the display.
///
/// The 74HC595 has three inputs that matter here: serial data (DIO), the shift clock (SCLK),
/// which shifts the data bit in on its rising edge, and the register clock (RCLK), which copies
/// everything shifted in so far to the output pins on its rising edge.
///
/// The methods are synchronous because the refresh cycle runs from a timer interrupt.  There is
/// no acknowledgement on this bus, so the only errors are those of the underlying pins.
pub trait BusDriver {
    type Error;

    /// Shift one byte into the chain, most significant bit first
    fn shift_out(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Pulse the register clock low then high, presenting everything shifted in so far on the
    /// shift register outputs at once
    fn latch(&mut self) -> Result<(), Self::Error>;
}

/// Implementation of [`BusDriver`] that toggles three GPIO output pins directly.
///
/// Unlike a bidirectional bus, the 74HC595 only ever needs outputs, so this works with any
/// `embedded-hal` 1.0 [`OutputPin`] implementation, as long as all three pins report the same
/// error type.  No delays are inserted between edges; the 74HC595 latches comfortably faster
/// than a Cortex-M0+ can toggle a GPIO.
pub struct BitBangingBusDriver<Data, Clock, Latch> {
    data: Data,
    clock: Clock,
    latch: Latch,
}

impl<Data, Clock, Latch> BitBangingBusDriver<Data, Clock, Latch>
where
    Data: OutputPin,
    Clock: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
{
    /// Take ownership of the pins and put them in their idle state: both clocks high, data low.
    pub fn new(data: Data, clock: Clock, latch: Latch) -> Result<Self, Data::Error> {
        let mut me = Self { data, clock, latch };

        me.data.set_low()?;
        me.clock.set_high()?;
        me.latch.set_high()?;

        Ok(me)
    }

    /// Give the pins back
    pub fn release(self) -> (Data, Clock, Latch) {
        (self.data, self.clock, self.latch)
    }
}

impl<Data, Clock, Latch> BusDriver for BitBangingBusDriver<Data, Clock, Latch>
where
    Data: OutputPin,
    Clock: OutputPin<Error = Data::Error>,
    Latch: OutputPin<Error = Data::Error>,
{
    type Error = Data::Error;

    fn shift_out(&mut self, mut byte: u8) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("byte = {=u8:x}", byte);

        for _ in 0..8 {
            self.data
                .set_state(PinState::from(byte & 0b1000_0000 != 0))?;

            // The chip samples DIO on the rising edge
            self.clock.set_low()?;
            self.clock.set_high()?;

            byte <<= 1;
        }

        Ok(())
    }

    fn latch(&mut self) -> Result<(), Self::Error> {
        self.latch.set_low()?;
        self.latch.set_high()
    }
}

#[cfg(feature = "embassy-rp")]
mod embassy_rp_pins {
    use embassy_rp::gpio::{self, Level, Output};

    /// [`super::BitBangingBusDriver`] on three Embassy RP HAL output pins
    pub type EmbassyRpBusDriver<'a, DioPin, SclkPin, RclkPin> =
        super::BitBangingBusDriver<Output<'a, DioPin>, Output<'a, SclkPin>, Output<'a, RclkPin>>;

    /// Configure the three pins as outputs, already at their idle levels
    pub fn embassy_rp_outputs<'a, DioPin: gpio::Pin, SclkPin: gpio::Pin, RclkPin: gpio::Pin>(
        dio: DioPin,
        sclk: SclkPin,
        rclk: RclkPin,
    ) -> (
        Output<'a, DioPin>,
        Output<'a, SclkPin>,
        Output<'a, RclkPin>,
    ) {
        (
            Output::new(dio, Level::Low),
            Output::new(sclk, Level::High),
            Output::new(rclk, Level::High),
        )
    }
}

#[cfg(feature = "embassy-rp")]
pub use embassy_rp_pins::{embassy_rp_outputs, EmbassyRpBusDriver};
