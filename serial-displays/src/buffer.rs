//! The display contents shared between application code and the refresh cycle.
//!
//! The refresh cycle typically runs from a timer interrupt, preempting the application code that
//! changes what is displayed.  Every access to the shared [`Digits`] happens inside a critical
//! section, and the refresh cycle works from a copy taken in one go, so it never shifts out half
//! of an old value and half of a new one.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::{Digits, Error, LeadingZeros, Position};

pub struct DisplayBuffer {
    digits: Mutex<CriticalSectionRawMutex, Cell<Digits>>,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBuffer {
    /// A buffer with every position blank.  Usable in `static` and `StaticCell` initializers.
    pub const fn new() -> Self {
        Self {
            digits: Mutex::new(Cell::new(Digits::new())),
        }
    }

    /// Copy the current contents out
    pub fn snapshot(&self) -> Digits {
        self.digits.lock(|digits| digits.get())
    }

    /// Apply an arbitrary edit to the contents in a single critical section.
    ///
    /// Useful when several changes have to become visible together, for example clearing the
    /// display and then writing a value.  Keep `f` short; interrupts are masked while it runs.
    pub fn update<R>(&self, f: impl FnOnce(&mut Digits) -> R) -> R {
        self.digits.lock(|cell| {
            let mut digits = cell.get();
            let result = f(&mut digits);
            cell.set(digits);
            result
        })
    }

    /// See [`Digits::write_nibble`]
    pub fn write_nibble(&self, digit: u8, position: u8) -> Result<(), Error> {
        self.update(|digits| digits.write_nibble(digit, position))
    }

    /// See [`Digits::write_word`]
    pub fn write_word(&self, value: u16) -> Result<(), Error> {
        self.update(|digits| digits.write_word(value))
    }

    /// See [`Digits::write_number`]
    pub fn write_number(&self, value: u16, leading_zeros: LeadingZeros) -> Result<(), Error> {
        self.update(|digits| digits.write_number(value, leading_zeros))
    }

    /// Blank all four positions
    pub fn clear_displays(&self) {
        self.update(Digits::clear)
    }

    /// See [`Digits::show_zeros_left`]
    pub fn show_zeros_left(&self) {
        self.update(Digits::show_zeros_left)
    }

    /// See [`Digits::hide_zeros_left`]
    pub fn hide_zeros_left(&self) {
        self.update(Digits::hide_zeros_left)
    }

    pub fn set_decimal_point(&self, position: Position, on: bool) {
        self.update(|digits| digits.set_decimal_point(position, on))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{encode_digit, BLANK_PATTERN, ZERO_PATTERN};
    use crate::DigitState;

    #[test]
    fn starts_blank() {
        let buffer = DisplayBuffer::new();
        assert_eq!([BLANK_PATTERN; 4], buffer.snapshot().patterns());
    }

    #[test]
    fn mutators_are_visible_in_snapshot() {
        let buffer = DisplayBuffer::new();

        buffer.write_word(7).unwrap();
        assert_eq!(
            [encode_digit(7).unwrap(), ZERO_PATTERN, ZERO_PATTERN, ZERO_PATTERN],
            buffer.snapshot().patterns()
        );

        buffer.hide_zeros_left();
        assert_eq!(
            [encode_digit(7).unwrap(), BLANK_PATTERN, BLANK_PATTERN, BLANK_PATTERN],
            buffer.snapshot().patterns()
        );

        buffer.show_zeros_left();
        assert_eq!(DigitState::Zero, buffer.snapshot().cell(Position::THOUSANDS));

        buffer.write_nibble(3, 3).unwrap();
        assert_eq!(DigitState::Digit(3), buffer.snapshot().cell(Position::THOUSANDS));

        buffer.clear_displays();
        assert_eq!(Digits::new(), buffer.snapshot());
    }

    #[test]
    fn errors_leave_contents_alone() {
        let buffer = DisplayBuffer::new();
        buffer.write_word(1234).unwrap();
        let before = buffer.snapshot();

        assert_eq!(Err(Error::ValueOutOfRange(10_000)), buffer.write_word(10_000));
        assert_eq!(Err(Error::InvalidPosition(9)), buffer.write_nibble(1, 9));
        assert_eq!(Err(Error::InvalidDigit(12)), buffer.write_nibble(12, 1));
        assert_eq!(before, buffer.snapshot());
    }

    #[test]
    fn update_is_applied_as_a_whole() {
        let buffer = DisplayBuffer::new();

        let result = buffer.update(|digits| {
            digits.clear();
            digits.write_number(56, LeadingZeros::Hide)?;
            digits.set_decimal_point(Position::TENS, true);
            Ok::<_, Error>(digits.cell(Position::TENS))
        });

        assert_eq!(Ok(DigitState::Digit(5)), result);

        let snapshot = buffer.snapshot();
        assert!(snapshot.decimal_point(Position::TENS));
        assert_eq!(DigitState::Blank, snapshot.cell(Position::HUNDREDS));
    }

    #[test]
    fn usable_as_static() {
        static BUFFER: DisplayBuffer = DisplayBuffer::new();

        BUFFER.write_word(2222).unwrap();
        assert_eq!([encode_digit(2).unwrap(); 4], BUFFER.snapshot().patterns());
    }
}
