//! Character sinks.
//!
//! The engine pushes formatted output one byte at a time into a [`Sink`].
//! A sink either accepts the byte or answers [`Eof`], at which point the
//! engine stops immediately.
//!
//! Design: every buffer-backed sink owns its cursor, and the cursor never
//! passes the capacity of the memory it was handed. No sink allocates.

use thiserror::Error;

/// C-style end-of-file sentinel for `putc`-shaped callbacks.
///
/// Distinct from every byte value (`0..=255`).
pub const EOF: i32 = -1;

/// Returned by a sink that cannot take another byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sink is full")]
pub struct Eof;

/// A push-based single-byte consumer.
pub trait Sink {
    /// Write one byte. Returns the byte on success.
    fn put(&mut self, byte: u8) -> Result<u8, Eof>;

    /// Called once after the whole format string has been written.
    ///
    /// The default writes a literal NUL byte. Sinks over streams with no
    /// terminator convention may override this with a no-op.
    fn terminate(&mut self) -> Result<(), Eof> {
        self.put(0).map(|_| ())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        (**self).put(byte)
    }

    #[inline]
    fn terminate(&mut self) -> Result<(), Eof> {
        (**self).terminate()
    }
}

// ---------------------------------------------------------------------------
// Buffer-backed sinks
// ---------------------------------------------------------------------------

/// Writes into caller-owned memory and reports [`Eof`] once it is full.
///
/// Invariant: `cur <= dst.len()`. A write at capacity leaves `dst` untouched.
#[derive(Debug)]
pub struct BoundedBuffer<'a> {
    dst: &'a mut [u8],
    cur: usize,
}

impl<'a> BoundedBuffer<'a> {
    pub fn new(dst: &'a mut [u8]) -> Self {
        Self { dst, cur: 0 }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.dst.len()
    }

    /// Bytes accepted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cur
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cur == 0
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.dst.len() - self.cur
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.dst[..self.cur]
    }
}

impl Sink for BoundedBuffer<'_> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        let slot = self.dst.get_mut(self.cur).ok_or(Eof)?;
        *slot = byte;
        self.cur += 1;
        Ok(byte)
    }
}

/// Stores what fits, drops the rest, and never reports [`Eof`].
///
/// Used by the buffer entry points so the engine can finish counting the
/// would-be length after the destination is full. [`TruncatingBuffer::finish`]
/// then NUL-terminates a truncated result in the last slot.
#[derive(Debug)]
pub struct TruncatingBuffer<'a> {
    dst: &'a mut [u8],
    cur: usize,
    total: usize,
}

impl<'a> TruncatingBuffer<'a> {
    pub fn new(dst: &'a mut [u8]) -> Self {
        Self {
            dst,
            cur: 0,
            total: 0,
        }
    }

    /// Bytes offered so far, stored or not.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn truncated(&self) -> bool {
        self.total > self.dst.len()
    }

    /// Terminate a truncated result in place: with capacity `N > 0` the
    /// buffer ends up holding `N - 1` content bytes and a NUL at `N - 1`.
    pub fn finish(self) -> usize {
        if self.truncated() {
            if let Some(last) = self.dst.last_mut() {
                *last = 0;
            }
        }
        self.total
    }
}

impl Sink for TruncatingBuffer<'_> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        if let Some(slot) = self.dst.get_mut(self.cur) {
            *slot = byte;
            self.cur += 1;
        }
        self.total += 1;
        Ok(byte)
    }
}

/// Owned fixed-size output buffer. Reports [`Eof`] once `N` bytes are in.
#[derive(Debug, Clone)]
pub struct StackBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> StackBuf<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
        }
    }

    /// Everything written, terminator included.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Written bytes up to (not including) the first NUL.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        let bytes = self.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        &bytes[..end]
    }

    /// [`StackBuf::text`] as UTF-8, or `""` if it is not valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.text()).unwrap_or("")
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const N: usize> Default for StackBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Sink for StackBuf<N> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        let slot = self.buf.get_mut(self.len).ok_or(Eof)?;
        *slot = byte;
        self.len += 1;
        Ok(byte)
    }
}

/// Counts bytes without storing them. Never full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub count: usize,
}

impl Sink for Counter {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        self.count += 1;
        Ok(byte)
    }
}

// ---------------------------------------------------------------------------
// Callback sinks
// ---------------------------------------------------------------------------

/// Sink backed by a closure.
pub struct FnSink<F>(pub F);

impl<F> Sink for FnSink<F>
where
    F: FnMut(u8) -> Result<u8, Eof>,
{
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        (self.0)(byte)
    }
}

/// Sink backed by a `putc(c, ctx)`-shaped function and its state.
///
/// The function returns the character on success or [`EOF`] when full.
pub struct PutcSink<'a, C: ?Sized> {
    putc: fn(i32, &mut C) -> i32,
    ctx: &'a mut C,
}

impl<'a, C: ?Sized> PutcSink<'a, C> {
    pub fn new(putc: fn(i32, &mut C) -> i32, ctx: &'a mut C) -> Self {
        Self { putc, ctx }
    }
}

impl<C: ?Sized> Sink for PutcSink<'_, C> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        if (self.putc)(i32::from(byte), self.ctx) == EOF {
            Err(Eof)
        } else {
            Ok(byte)
        }
    }
}

/// Wraps a sink so the end-of-output terminator is not written.
///
/// The terminator still counts toward the engine's return value.
pub struct Unterminated<S>(pub S);

impl<S: Sink> Sink for Unterminated<S> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<u8, Eof> {
        self.0.put(byte)
    }

    #[inline]
    fn terminate(&mut self) -> Result<(), Eof> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
