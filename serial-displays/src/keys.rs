use embedded_hal_1::digital::InputPin;

/// The push buttons on the front panel of the unit, apart from ON/OFF which is tracked on its own
/// by [`crate::OnOff`].
///
/// Each key is wired between its GPIO and ground, with the pull-up resistor enabled, so a pressed
/// key reads low.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Sleep,
    /// Lowers the setpoint
    Decrement,
    /// Restores the default setpoint
    Reset,
}

impl Key {
    /// The bit for this key in the [`Keys`] bitmask
    pub fn bit(self) -> u8 {
        match self {
            Self::Sleep => 0b001,
            Self::Decrement => 0b010,
            Self::Reset => 0b100,
        }
    }

    fn from_bit_index(bit: u32) -> Option<Self> {
        match bit {
            0 => Some(Self::Sleep),
            1 => Some(Self::Decrement),
            2 => Some(Self::Reset),
            _ => None,
        }
    }
}

/// The state of the keys at the moment they were read with [`KeyPad::read_keys`].
///
/// You can get the pressed key information in a few ways:
///
/// - [`Self::is_pressed`] tests one specific key.
/// - [`Self::any_pressed`] tells if anything at all is pressed, for example to wake the display.
/// - [`Self::newly_pressed`] keeps only the keys that went down since an earlier read.
/// - The struct implements [`Iterator`], yielding each pressed key once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keys(u8);

const KEY_MASK: u8 = 0b111;

impl Keys {
    pub(crate) fn new(bitmask: u8) -> Self {
        Self(bitmask)
    }

    pub fn any_pressed(&self) -> bool {
        self.0 & KEY_MASK != 0
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    /// One bit per pressed key; see [`Key::bit`]
    pub fn bitmask(&self) -> u8 {
        self.0 & KEY_MASK
    }

    /// The keys pressed now that were not pressed in `previous`, so holding a key down acts on
    /// it once
    pub fn newly_pressed(&self, previous: &Keys) -> Keys {
        Keys(self.0 & !previous.0 & KEY_MASK)
    }

    /// If at least one key is pressed, return it and clear it from this struct.
    ///
    /// Keys come out in [`Key::bit`] order.
    fn pop_key(&mut self) -> Option<Key> {
        let pressed = self.0 & KEY_MASK;
        if pressed == 0 {
            return None;
        }

        let bit = pressed.trailing_zeros();
        self.0 &= !(1 << bit);

        Key::from_bit_index(bit)
    }
}

/// Allows to iterate over all pressed keys one at a time.  As keys are yielded from the iterator,
/// they are cleared from the struct
impl Iterator for Keys {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop_key()
    }
}

/// The SLEEP, DECREMENT and RESET keys, read as one unit
pub struct KeyPad<SleepPin, DecPin, RstPin> {
    sleep: SleepPin,
    dec: DecPin,
    rst: RstPin,
}

impl<SleepPin, DecPin, RstPin> KeyPad<SleepPin, DecPin, RstPin>
where
    SleepPin: InputPin,
    DecPin: InputPin<Error = SleepPin::Error>,
    RstPin: InputPin<Error = SleepPin::Error>,
{
    /// The pins must already be configured as inputs with their pull-ups enabled
    pub fn new(sleep: SleepPin, dec: DecPin, rst: RstPin) -> Self {
        Self {
            sleep,
            dec,
            rst,
        }
    }

    /// Sample every key
    pub fn read_keys(&mut self) -> Result<Keys, SleepPin::Error> {
        let mut bitmask = 0u8;

        for (pressed, key) in [
            (self.sleep.is_low()?, Key::Sleep),
            (self.dec.is_low()?, Key::Decrement),
            (self.rst.is_low()?, Key::Reset),
        ] {
            if pressed {
                bitmask |= key.bit();
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("keys = {=u8:b}", bitmask);

        Ok(Keys::new(bitmask))
    }

    pub fn release(self) -> (SleepPin, DecPin, RstPin) {
        (self.sleep, self.dec, self.rst)
    }
}
