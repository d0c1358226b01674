//! # nanofmt-core
//!
//! Allocation-free `printf`-style formatting for freestanding targets.
//!
//! A format string and a slice of typed [`FormatArg`]s are turned into bytes
//! and pushed one at a time into a [`Sink`]. Nothing here allocates, holds
//! global state, or panics on any input; a full sink simply stops output.
//!
//! Two entry points cover the usual cases:
//!
//! - [`format_to_buffer`] / [`snprintf!`] write into a fixed `&mut [u8]`,
//!   truncating as needed, and return the length the full output would have.
//! - [`format_to_sink`] / [`pprintf!`] drive any [`Sink`] and return the
//!   number of bytes it accepted.
//!
//! Both counts include the terminating NUL the engine writes at the end.
//!
//! Cargo features select how much of the C conversion set is understood:
//! `float-specifiers` (`%f %e %g` and friends) and `c99-specifiers` (`hh ll j
//! z t` lengths and `%a`). Both are on by default.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod arg;
pub mod engine;
#[cfg(feature = "float-specifiers")]
pub mod float;
mod render;
pub mod sink;
pub mod spec;

pub use arg::{ArgList, FormatArg};
pub use engine::format;
pub use sink::{
    BoundedBuffer, Counter, EOF, Eof, FnSink, PutcSink, Sink, StackBuf, TruncatingBuffer,
    Unterminated,
};
pub use spec::{
    Case, Conversion, FormatFlags, FormatSpec, LengthMod, MAX_FIELD, Precision, Width,
    parse_format_spec,
};

/// Format into a fixed buffer.
///
/// Returns the length of the complete output including its NUL, which can be
/// larger than `buf.len()`. When it is, `buf` holds the first `buf.len() - 1`
/// bytes followed by a NUL. An empty `buf` is left untouched.
pub fn format_to_buffer(buf: &mut [u8], fmt: impl AsRef<[u8]>, args: &[FormatArg<'_>]) -> usize {
    let mut sink = TruncatingBuffer::new(buf);
    engine::format(&mut sink, fmt.as_ref(), args);
    sink.finish()
}

/// Format into an arbitrary sink.
///
/// Returns the number of bytes the sink accepted, terminator included.
/// Output stops at the first byte the sink refuses.
pub fn format_to_sink<S: Sink + ?Sized>(
    sink: &mut S,
    fmt: impl AsRef<[u8]>,
    args: &[FormatArg<'_>],
) -> usize {
    engine::format(sink, fmt.as_ref(), args)
}

/// `snprintf`-style formatting into a byte buffer.
///
/// ```
/// let mut buf = [0u8; 16];
/// let n = nanofmt_core::snprintf!(&mut buf, "%s=%04d", "id", 7);
/// assert_eq!(n, 8);
/// assert_eq!(&buf[..n], b"id=0007\0");
/// ```
#[macro_export]
macro_rules! snprintf {
    ($buf:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format_to_buffer($buf, $fmt, &[$($crate::FormatArg::from($arg)),*])
    };
}

/// Formatting into any [`Sink`].
///
/// ```
/// use nanofmt_core::StackBuf;
///
/// let mut out = StackBuf::<32>::new();
/// nanofmt_core::pprintf!(&mut out, "%x|%-3c|", 255u32, 'k');
/// assert_eq!(out.as_str(), "ff|k  |");
/// ```
#[macro_export]
macro_rules! pprintf {
    ($sink:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format_to_sink($sink, $fmt, &[$($crate::FormatArg::from($arg)),*])
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
