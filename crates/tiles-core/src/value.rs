#![forbid(unsafe_code)]

//! Tile magnitudes.
//!
//! [`CellValue`] enumerates every value a cell can hold, from `Empty`
//! through 2^15. The discriminant doubles as the base-2 exponent, so
//! [`CellValue::next`] is a single increment.

use std::fmt;

/// A cell's content: empty, or a power of two from 2 to 32768.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum CellValue {
    #[default]
    Empty = 0,
    V2 = 1,
    V4 = 2,
    V8 = 3,
    V16 = 4,
    V32 = 5,
    V64 = 6,
    V128 = 7,
    V256 = 8,
    V512 = 9,
    V1024 = 10,
    V2048 = 11,
    V4096 = 12,
    V8192 = 13,
    V16384 = 14,
    V32768 = 15,
}

impl CellValue {
    /// Every value in ascending order, indexed by exponent.
    pub const ALL: [CellValue; 16] = [
        CellValue::Empty,
        CellValue::V2,
        CellValue::V4,
        CellValue::V8,
        CellValue::V16,
        CellValue::V32,
        CellValue::V64,
        CellValue::V128,
        CellValue::V256,
        CellValue::V512,
        CellValue::V1024,
        CellValue::V2048,
        CellValue::V4096,
        CellValue::V8192,
        CellValue::V16384,
        CellValue::V32768,
    ];

    /// The largest tile. It cannot merge any further.
    pub const MAX: CellValue = CellValue::V32768;

    /// Base-2 exponent of the magnitude (`0` for empty).
    #[inline]
    #[must_use]
    pub const fn exponent(self) -> u8 {
        self as u8
    }

    /// Value for a given exponent, or `None` above 15.
    #[inline]
    #[must_use]
    pub const fn from_exponent(exponent: u8) -> Option<Self> {
        if (exponent as usize) < Self::ALL.len() {
            Some(Self::ALL[exponent as usize])
        } else {
            None
        }
    }

    /// Numeric magnitude shown on the tile. Empty cells count as zero.
    #[inline]
    #[must_use]
    pub const fn magnitude(self) -> u32 {
        match self {
            CellValue::Empty => 0,
            v => 1 << (v as u8),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The value two of these tiles fuse into.
    ///
    /// # Panics
    ///
    /// Panics on `Empty` and on [`CellValue::MAX`]; neither can take part in
    /// a merge, so reaching this is a logic error in the caller.
    #[must_use]
    pub fn next(self) -> Self {
        match self.checked_next() {
            Some(next) => next,
            None => panic!("CellValue::next called on {self:?}, which cannot merge"),
        }
    }

    /// Like [`next`](Self::next), but `None` instead of panicking.
    #[inline]
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self {
            CellValue::Empty | CellValue::V32768 => None,
            v => Self::from_exponent(v as u8 + 1),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => f.pad("."),
            v => f.pad(&v.magnitude().to_string()),
        }
    }
}

/// A number that is not zero or a power of two in `2..=32768`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMagnitude(pub u32);

impl fmt::Display for InvalidMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is not a tile magnitude (expected 0 or a power of two from 2 to {})",
            self.0,
            CellValue::MAX.magnitude()
        )
    }
}

impl std::error::Error for InvalidMagnitude {}

impl TryFrom<u32> for CellValue {
    type Error = InvalidMagnitude;

    /// Map a magnitude back to its value; `0` is empty.
    fn try_from(magnitude: u32) -> Result<Self, Self::Error> {
        if magnitude == 0 {
            return Ok(CellValue::Empty);
        }
        if !magnitude.is_power_of_two() || magnitude == 1 {
            return Err(InvalidMagnitude(magnitude));
        }
        u8::try_from(magnitude.trailing_zeros())
            .ok()
            .and_then(Self::from_exponent)
            .ok_or(InvalidMagnitude(magnitude))
    }
}

impl From<CellValue> for u32 {
    fn from(value: CellValue) -> Self {
        value.magnitude()
    }
}
