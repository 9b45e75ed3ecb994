//! Presence bitmap
//!
//! Bit *n* (1-indexed, most-significant bit first) is set iff field *n* is
//! present. Bit 1 announces a secondary bitmap covering fields 65..=128; it is
//! never chosen directly and only turns on when such a field is set.

use std::fmt;

use super::{BITMAP_HEX_LEN, Error, MAX_BITMAP_FIELD, Result};

const BITS_PER_MAP: u8 = 64;

/// Primary bitmap plus an optional secondary bitmap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitmap {
    primary: u64,
    secondary: u64,
}

impl Bitmap {
    /// Empty bitmap
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary: 0,
            secondary: 0,
        }
    }

    /// Build a bitmap from field numbers in `2..=128`, in any order.
    ///
    /// Field 1 is rejected: it is derived, never selected.
    pub fn from_fields<I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut bitmap = Self::new();
        for number in fields {
            bitmap.set(number)?;
        }
        Ok(bitmap)
    }

    /// Mark a field present
    pub fn set(&mut self, number: u8) -> Result<()> {
        match number {
            1 => return Err(Error::ReservedField { number }),
            2..=BITS_PER_MAP => self.primary |= mask(number),
            n @ 65..=MAX_BITMAP_FIELD => {
                self.secondary |= mask(n - BITS_PER_MAP);
                self.primary |= mask(1);
            }
            _ => return Err(Error::UnknownField { number }),
        }
        Ok(())
    }

    /// Check whether bit `number` is set (bit 1 reports the secondary indicator)
    #[must_use]
    pub const fn contains(&self, number: u8) -> bool {
        match number {
            1..=BITS_PER_MAP => self.primary & mask(number) != 0,
            n @ 65..=MAX_BITMAP_FIELD => self.secondary & mask(n - BITS_PER_MAP) != 0,
            _ => false,
        }
    }

    /// Secondary bitmap is present (bit 1 set)
    #[must_use]
    pub const fn has_secondary(&self) -> bool {
        self.contains(1)
    }

    /// Raw primary bitmap
    #[must_use]
    pub const fn primary(&self) -> u64 {
        self.primary
    }

    /// Raw secondary bitmap, if announced
    #[must_use]
    pub const fn secondary(&self) -> Option<u64> {
        if self.has_secondary() {
            Some(self.secondary)
        } else {
            None
        }
    }

    /// Present data fields in ascending order, excluding the indicator bit
    pub fn fields(&self) -> impl Iterator<Item = u8> + '_ {
        (2..=MAX_BITMAP_FIELD).filter(|&n| self.contains(n))
    }

    /// Render as uppercase hex: 16 digits, or 32 when a secondary bitmap is present
    #[must_use]
    pub fn to_hex(&self) -> String {
        match self.secondary() {
            Some(secondary) => format!("{:016X}{secondary:016X}", self.primary),
            None => format!("{:016X}", self.primary),
        }
    }

    /// Parse a 16- or 32-digit hex rendering.
    ///
    /// Returns `None` when the text is malformed or the secondary indicator
    /// disagrees with the text length.
    #[must_use]
    pub fn from_hex(text: &str) -> Option<Self> {
        let parse = |chunk: &str| u64::from_str_radix(chunk, 16).ok();
        if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let bitmap = match text.len() {
            BITMAP_HEX_LEN => Self {
                primary: parse(text)?,
                secondary: 0,
            },
            len if len == 2 * BITMAP_HEX_LEN => Self {
                primary: parse(&text[..BITMAP_HEX_LEN])?,
                secondary: parse(&text[BITMAP_HEX_LEN..])?,
            },
            _ => return None,
        };
        let announced = bitmap.primary & mask(1) != 0;
        (announced == (text.len() > BITMAP_HEX_LEN)).then_some(bitmap)
    }
}

impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

const fn mask(position: u8) -> u64 {
    1 << (BITS_PER_MAP - position)
}
