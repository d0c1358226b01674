//! Typed argument list.
//!
//! Replaces C variadic extraction with an explicit slice of [`FormatArg`]
//! values walked by a forward-only [`ArgList`] cursor. Each extraction
//! consumes exactly one slot; `*` widths and precisions take their own slot
//! ahead of the value they apply to.

use core::cell::Cell;
use core::ffi::CStr;

use crate::spec::LengthMod;

/// Typed argument value.
#[derive(Debug, Clone, Copy)]
pub enum FormatArg<'a> {
    Int(i64),
    Uint(u64),
    Char(u8),
    Float(f64),
    /// Text for `%s`. Output stops at the first NUL or at the slice end.
    Str(&'a [u8]),
    /// Address for `%p`.
    Ptr(usize),
    /// Target for `%n`: receives the number of bytes emitted so far.
    Count(&'a Cell<usize>),
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            #[inline]
            fn from(value: $t) -> Self {
                FormatArg::Int(value as i64)
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            #[inline]
            fn from(value: $t) -> Self {
                FormatArg::Uint(value as u64)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for FormatArg<'_> {
    fn from(value: bool) -> Self {
        FormatArg::Int(i64::from(value))
    }
}

impl From<f32> for FormatArg<'_> {
    fn from(value: f32) -> Self {
        FormatArg::Float(f64::from(value))
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

/// Only the low byte of the code point is kept, as `%c` would.
impl From<char> for FormatArg<'_> {
    fn from(value: char) -> Self {
        FormatArg::Char(value as u32 as u8)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(value: &'a str) -> Self {
        FormatArg::Str(value.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(value: &'a [u8]) -> Self {
        FormatArg::Str(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FormatArg<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        FormatArg::Str(value)
    }
}

impl<'a> From<&'a CStr> for FormatArg<'a> {
    fn from(value: &'a CStr) -> Self {
        FormatArg::Str(value.to_bytes())
    }
}

impl<T> From<*const T> for FormatArg<'_> {
    fn from(value: *const T) -> Self {
        FormatArg::Ptr(value as usize)
    }
}

impl<T> From<*mut T> for FormatArg<'_> {
    fn from(value: *mut T) -> Self {
        FormatArg::Ptr(value as usize)
    }
}

impl<'a> From<&'a Cell<usize>> for FormatArg<'a> {
    fn from(value: &'a Cell<usize>) -> Self {
        FormatArg::Count(value)
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Forward-only cursor over an argument slice.
///
/// Extraction methods return `None` when the list is exhausted or the slot
/// holds an incompatible kind; the slot is consumed either way.
#[derive(Debug, Clone)]
pub struct ArgList<'a> {
    args: &'a [FormatArg<'a>],
    pos: usize,
}

impl<'a> ArgList<'a> {
    #[must_use]
    pub const fn new(args: &'a [FormatArg<'a>]) -> Self {
        Self { args, pos: 0 }
    }

    /// Number of slots consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.args.len().saturating_sub(self.pos)
    }

    fn next_arg(&mut self) -> Option<FormatArg<'a>> {
        let arg = self.args.get(self.pos).copied()?;
        self.pos += 1;
        Some(arg)
    }

    /// Raw 64-bit pattern of an integer-family argument.
    fn next_bits(&mut self) -> Option<u64> {
        match self.next_arg()? {
            FormatArg::Int(v) => Some(v as u64),
            FormatArg::Uint(v) => Some(v),
            FormatArg::Char(c) => Some(u64::from(c)),
            FormatArg::Ptr(p) => Some(p as u64),
            _ => None,
        }
    }

    /// Next argument as a signed integer of the width `length` selects.
    ///
    /// `hh` → 8 bits, `h` → 16, none/`L` → 32, `l`/`ll`/`j`/`z`/`t` → 64.
    pub fn next_signed(&mut self, length: LengthMod) -> Option<i64> {
        let raw = self.next_bits()?;
        Some(match length {
            LengthMod::Hh => i64::from(raw as i8),
            LengthMod::H => i64::from(raw as i16),
            LengthMod::None | LengthMod::BigL => i64::from(raw as i32),
            LengthMod::L | LengthMod::Ll | LengthMod::J | LengthMod::Z | LengthMod::T => {
                raw as i64
            }
        })
    }

    /// Next argument as an unsigned integer of the width `length` selects.
    pub fn next_unsigned(&mut self, length: LengthMod) -> Option<u64> {
        let raw = self.next_bits()?;
        Some(match length {
            LengthMod::Hh => u64::from(raw as u8),
            LengthMod::H => u64::from(raw as u16),
            LengthMod::None | LengthMod::BigL => u64::from(raw as u32),
            LengthMod::L | LengthMod::Ll | LengthMod::J | LengthMod::Z | LengthMod::T => raw,
        })
    }

    /// Next argument as a float. Integers convert by value.
    pub fn next_float(&mut self) -> Option<f64> {
        match self.next_arg()? {
            FormatArg::Float(v) => Some(v),
            FormatArg::Int(v) => Some(v as f64),
            FormatArg::Uint(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn next_str(&mut self) -> Option<&'a [u8]> {
        match self.next_arg()? {
            FormatArg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Next argument as an address. Integers are taken as the address.
    pub fn next_pointer(&mut self) -> Option<usize> {
        self.next_bits().map(|bits| bits as usize)
    }

    pub fn next_count(&mut self) -> Option<&'a Cell<usize>> {
        match self.next_arg()? {
            FormatArg::Count(cell) => Some(cell),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
