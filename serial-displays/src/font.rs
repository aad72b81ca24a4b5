//! The fixed font that maps decimal digits to segment patterns for the common-anode 7 segment
//! displays driven through the 74HC595 chain.
//!
//! Segments are active low: a `0` bit lights the segment, a `1` bit turns it off.  Bit 7 is the
//! decimal point, bits 6..0 are segments G..A.
//!
//! ```text
//!           A
//!          ===
//!      F ||   || B
//!          =G=
//!      E ||   || C
//!          ===
//!           D
//! ```

use crate::Error;

/// Every segment off, including the decimal point
pub const BLANK_PATTERN: u8 = 0xFF;

/// The pattern for a literal `0`
pub const ZERO_PATTERN: u8 = DIGIT_PATTERNS[0];

/// The decimal point bit.  Clearing it lights the point.
pub const DECIMAL_POINT_MASK: u8 = 0b1000_0000;

/// Segment patterns for the digits `0` through `9`, indexed by the digit
pub const DIGIT_PATTERNS: [u8; 10] = [
    //.GFE_DCBA
    0b1100_0000, // 0
    0b1111_1001, // 1
    0b1010_0100, // 2
    0b1011_0000, // 3
    0b1001_1001, // 4
    0b1001_0010, // 5
    0b1000_0010, // 6
    0b1111_1000, // 7
    0b1000_0000, // 8
    0b1001_0000, // 9
];

/// Look up the segment pattern for the decimal digit `digit`.
///
/// Fails with [`Error::InvalidDigit`] if `digit` is not in `0..=9`.
pub fn encode_digit(digit: u8) -> Result<u8, Error> {
    DIGIT_PATTERNS
        .get(digit as usize)
        .copied()
        .ok_or(Error::InvalidDigit(digit))
}

/// Reverse of [`encode_digit`].  The decimal point bit is ignored.
///
/// Returns `None` for the blank pattern and for any byte that isn't one of the digit patterns.
pub fn decode_pattern(pattern: u8) -> Option<u8> {
    let pattern = pattern | DECIMAL_POINT_MASK;

    DIGIT_PATTERNS
        .iter()
        .position(|candidate| *candidate == pattern)
        .map(|digit| digit as u8)
}
