//! The contents of the four digit positions, independent of how they are shared with the refresh
//! cycle or shifted out to the hardware.

use crate::font::{self, BLANK_PATTERN, DECIMAL_POINT_MASK, ZERO_PATTERN};
use crate::Error;

/// The number of digit positions on the display
pub const DIGIT_COUNT: usize = 4;

/// The largest value [`Digits::write_word`] can show
pub const MAX_WORD: u16 = 9999;

/// One of the four digit positions.  `0` is the least significant (right-most) digit, `3` the
/// most significant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position(u8);

impl Position {
    pub const UNITS: Self = Self(0);
    pub const TENS: Self = Self(1);
    pub const HUNDREDS: Self = Self(2);
    pub const THOUSANDS: Self = Self(3);

    /// All positions, in the order the refresh cycle drives them
    pub const ALL: [Self; DIGIT_COUNT] = [Self::UNITS, Self::TENS, Self::HUNDREDS, Self::THOUSANDS];

    pub fn new(position: u8) -> Result<Self, Error> {
        if (position as usize) < DIGIT_COUNT {
            Ok(Self(position))
        } else {
            Err(Error::InvalidPosition(position))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The digit-select byte shifted out after this position's segments.  Exactly one bit is
    /// set: bit 0 for position 0 through bit 3 for position 3.
    pub fn select_strobe(self) -> u8 {
        1 << self.0
    }
}

impl TryFrom<u8> for Position {
    type Error = Error;

    fn try_from(position: u8) -> Result<Self, Self::Error> {
        Self::new(position)
    }
}

/// What a single position is showing.
///
/// A zero that only pads a number out to four digits is kept apart from a zero the application
/// asked for, so that [`Digits::hide_zeros_left`] never blanks a significant digit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitState {
    /// Nothing lit
    #[default]
    Blank,

    /// A leading zero, shown only to pad the display
    Zero,

    /// A significant digit in `0..=9`
    Digit(u8),
}

impl DigitState {
    /// The segment pattern for this state, without the decimal point
    pub fn pattern(self) -> u8 {
        match self {
            DigitState::Blank => BLANK_PATTERN,
            DigitState::Zero => ZERO_PATTERN,
            DigitState::Digit(digit) => {
                #[cfg(feature = "defmt")]
                defmt::debug_assert!(digit <= 9);
                font::encode_digit(digit).unwrap_or(BLANK_PATTERN)
            }
        }
    }

    /// The decimal value shown, if any
    pub fn value(self) -> Option<u8> {
        match self {
            DigitState::Blank => None,
            DigitState::Zero => Some(0),
            DigitState::Digit(digit) => Some(digit),
        }
    }
}

/// The full contents of the display.
///
/// This is a small `Copy` value so the refresh cycle can take a consistent snapshot of it; see
/// [`crate::DisplayBuffer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digits {
    cells: [DigitState; DIGIT_COUNT],
    decimal_points: u8,
}

/// How [`Digits::write_number`] treats zeros to the left of the most significant digit
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LeadingZeros {
    /// `0042`
    Show,
    /// `  42`
    Hide,
}

impl Default for Digits {
    fn default() -> Self {
        Self::new()
    }
}

impl Digits {
    /// All positions blank, no decimal points lit
    pub const fn new() -> Self {
        Self {
            cells: [DigitState::Blank; DIGIT_COUNT],
            decimal_points: 0,
        }
    }

    /// Blank every position and turn off every decimal point
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Show `digit` at `position`.
    ///
    /// Nothing is modified if either argument is out of range.
    pub fn write_nibble(&mut self, digit: u8, position: u8) -> Result<(), Error> {
        let position = Position::new(position)?;
        font::encode_digit(digit)?;

        self.cells[position.index()] = DigitState::Digit(digit);

        Ok(())
    }

    /// Show `value` across all four positions, thousands in position 3 down to units in position
    /// 0.
    ///
    /// Zeros to the left of the most significant non-zero digit are stored as
    /// [`DigitState::Zero`], so they are visible until [`Self::hide_zeros_left`] is called.
    /// Position 0 is always a significant digit, so `0` is shown as a single `0` once leading
    /// zeros are hidden.
    pub fn write_word(&mut self, value: u16) -> Result<(), Error> {
        if value > MAX_WORD {
            return Err(Error::ValueOutOfRange(value));
        }

        let thousands = value / 1000;
        let hundreds = (value % 1000) / 100;
        let tens = (value % 100) / 10;
        let units = value % 10;

        let mut leading = true;
        for (position, digit) in [(3, thousands), (2, hundreds), (1, tens), (0, units)] {
            let digit = digit as u8;

            self.cells[position] = if leading && digit == 0 && position != 0 {
                DigitState::Zero
            } else {
                leading = false;
                DigitState::Digit(digit)
            };
        }

        Ok(())
    }

    /// [`Self::write_word`] followed by the requested leading zero policy
    pub fn write_number(&mut self, value: u16, leading_zeros: LeadingZeros) -> Result<(), Error> {
        self.write_word(value)?;

        match leading_zeros {
            LeadingZeros::Show => self.show_zeros_left(),
            LeadingZeros::Hide => self.hide_zeros_left(),
        }

        Ok(())
    }

    /// Turn off every segment at `position`
    pub fn blank_position(&mut self, position: Position) {
        self.cells[position.index()] = DigitState::Blank;
    }

    /// Light or turn off the decimal point at `position`
    pub fn set_decimal_point(&mut self, position: Position, on: bool) {
        let mask = 1 << position.index();

        if on {
            self.decimal_points |= mask;
        } else {
            self.decimal_points &= !mask;
        }
    }

    pub fn decimal_point(&self, position: Position) -> bool {
        self.decimal_points & (1 << position.index()) != 0
    }

    /// Fill blank positions with zeros, starting from position 3 and moving right.
    ///
    /// The cascade stops at the first position that isn't blank.  Position 0 is never touched.
    pub fn show_zeros_left(&mut self) {
        self.cascade_left(DigitState::Blank, DigitState::Zero);
    }

    /// Blank leading zeros, starting from position 3 and moving right.
    ///
    /// The cascade stops at the first position that isn't a leading zero, so significant zeros
    /// (such as those written with [`Self::write_nibble`]) are never blanked.  Position 0 is
    /// never touched.
    pub fn hide_zeros_left(&mut self) {
        self.cascade_left(DigitState::Zero, DigitState::Blank);
    }

    fn cascade_left(&mut self, from: DigitState, to: DigitState) {
        for position in [Position::THOUSANDS, Position::HUNDREDS, Position::TENS] {
            let cell = &mut self.cells[position.index()];

            if *cell != from {
                break;
            }

            *cell = to;
        }
    }

    pub fn cell(&self, position: Position) -> DigitState {
        self.cells[position.index()]
    }

    /// The segment pattern for `position`, including its decimal point
    pub fn pattern(&self, position: Position) -> u8 {
        let pattern = self.cell(position).pattern();

        if self.decimal_point(position) {
            pattern & !DECIMAL_POINT_MASK
        } else {
            pattern
        }
    }

    /// The segment patterns for all positions, indexed by position
    pub fn patterns(&self) -> [u8; DIGIT_COUNT] {
        Position::ALL.map(|position| self.pattern(position))
    }
}
