//! Floating-point conversions: `%f %F %e %E %g %G %a %A`.
//!
//! Decimal digits come from `core::fmt`, which expands binary floats exactly
//! and rounds to the requested precision without allocating. Its output is
//! streamed through [`Shaper`], which rewrites the exponent into C form
//! (`e+05`), drops trailing zeros for `%g`, and forces the decimal point
//! under `#`. Hex floats are built directly from the IEEE-754 bits.
//!
//! Each directive is generated twice: once into a [`Counter`] to size the
//! field, then into the real sink.

use core::fmt::{self, Write};

use crate::render::{DIGIT_BUF, Out, render_digits, sign_byte};
use crate::sink::{Counter, Eof, Sink};
use crate::spec::{Conversion, FormatSpec};

/// Precision used when a directive gives none (`%f`, `%e`, `%g`).
pub const DEFAULT_PRECISION: usize = 6;

const MANTISSA_BITS: u32 = 52;
const MANTISSA_MASK: u64 = (1 << MANTISSA_BITS) - 1;
/// Hex digits in an f64 fraction.
const MANTISSA_NIBBLES: usize = 13;
/// Largest precision handed to `core::fmt`, which rejects anything above
/// `u16::MAX`. Every f64 expands exactly in fewer fraction digits than this,
/// so further digits are zeros and are written directly.
const FMT_PRECISION_LIMIT: usize = 1100;

/// Render a floating-point value according to `spec`.
pub(crate) fn format_float<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    value: f64,
    spec: &FormatSpec,
) -> Result<(), Eof> {
    let sign = sign_byte(value.is_sign_negative(), spec);
    let left = spec.flags.left_justify;

    if !value.is_finite() {
        let text: &[u8] = match (value.is_nan(), spec.is_upper()) {
            (true, false) => b"nan",
            (true, true) => b"NAN",
            (false, false) => b"inf",
            (false, true) => b"INF",
        };
        // Never zero-padded.
        let pad_total = spec
            .field_width()
            .saturating_sub(sign.is_some() as usize + text.len());
        if !left {
            out.pad(b' ', pad_total)?;
        }
        if let Some(s) = sign {
            out.put(s)?;
        }
        out.put_all(text)?;
        if left {
            out.pad(b' ', pad_total)?;
        }
        return Ok(());
    }

    let abs = value.abs();
    let body = Body::resolve(abs, spec);
    let prefix = body.prefix();

    let mut counter = Counter::default();
    body.emit(&mut Out::new(&mut counter), abs)?;

    let content_len = sign.is_some() as usize + prefix.len() + counter.count;
    let mut pad_total = spec.field_width().saturating_sub(content_len);
    let mut zero_count = 0;
    if spec.flags.zero_pad {
        zero_count = pad_total;
        pad_total = 0;
    }

    if !left {
        out.pad(b' ', pad_total)?;
    }
    if let Some(s) = sign {
        out.put(s)?;
    }
    out.put_all(prefix)?;
    out.pad(b'0', zero_count)?;
    body.emit(out, abs)?;
    if left {
        out.pad(b' ', pad_total)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Layout of the magnitude once conversion and precision are settled.
///
/// `strip` drops trailing fraction zeros (`%g` without `#`); `point` keeps
/// the decimal point even with no fraction digits (`#`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Fixed {
        precision: usize,
        strip: bool,
        point: bool,
    },
    Exponent {
        precision: usize,
        strip: bool,
        point: bool,
        upper: bool,
    },
    Hex {
        precision: Option<usize>,
        point: bool,
        upper: bool,
    },
}

impl Body {
    fn resolve(abs: f64, spec: &FormatSpec) -> Self {
        let point = spec.flags.alt_form;
        let upper = spec.is_upper();
        let precision = spec.precision_value();

        match spec.conversion {
            Conversion::FloatExponent => Body::Exponent {
                precision: precision.unwrap_or(DEFAULT_PRECISION),
                strip: false,
                point,
                upper,
            },
            Conversion::FloatDynamic => {
                // P significant digits; an explicit 0 means 1.
                let p = match precision {
                    None => DEFAULT_PRECISION,
                    Some(0) => 1,
                    Some(p) => p,
                };
                // X: decimal exponent after rounding to P digits.
                let x = decimal_exponent(abs, p - 1);
                if x < -4 || x >= p as i64 {
                    Body::Exponent {
                        precision: p - 1,
                        strip: !point,
                        point,
                        upper,
                    }
                } else {
                    Body::Fixed {
                        precision: (p as i64 - 1 - x) as usize,
                        strip: !point,
                        point,
                    }
                }
            }
            Conversion::FloatHex => Body::Hex {
                precision,
                point,
                upper,
            },
            _ => Body::Fixed {
                precision: precision.unwrap_or(DEFAULT_PRECISION),
                strip: false,
                point,
            },
        }
    }

    /// Bytes that zero padding goes after.
    fn prefix(&self) -> &'static [u8] {
        match *self {
            Body::Hex { upper: true, .. } => b"0X",
            Body::Hex { upper: false, .. } => b"0x",
            _ => b"",
        }
    }

    fn emit<S: Sink + ?Sized>(&self, out: &mut Out<'_, S>, abs: f64) -> Result<(), Eof> {
        match *self {
            Body::Fixed {
                precision,
                strip,
                point,
            } => {
                let (precision, tail) = split_precision(precision, strip);
                let mut shaper = Shaper::new(out, strip, point, None, tail);
                let result = write!(shaper, "{abs:.precision$}");
                shaper.finish(result)
            }
            Body::Exponent {
                precision,
                strip,
                point,
                upper,
            } => {
                let marker = if upper { b'E' } else { b'e' };
                let (precision, tail) = split_precision(precision, strip);
                let mut shaper = Shaper::new(out, strip, point, Some(marker), tail);
                let result = write!(shaper, "{abs:.precision$e}");
                shaper.finish(result)
            }
            Body::Hex {
                precision,
                point,
                upper,
            } => emit_hex(out, abs, precision, point, upper),
        }
    }
}

/// Precision for `core::fmt` plus the zeros to append after its digits.
fn split_precision(precision: usize, strip: bool) -> (usize, usize) {
    let clamped = precision.min(FMT_PRECISION_LIMIT);
    let tail = if strip { 0 } else { precision - clamped };
    (clamped, tail)
}

/// Decimal exponent of `abs` once rounded to `precision + 1` significant digits.
fn decimal_exponent(abs: f64, precision: usize) -> i64 {
    let precision = precision.min(FMT_PRECISION_LIMIT);
    let mut probe = ExponentProbe::default();
    // ExponentProbe never fails.
    let _ = write!(probe, "{abs:.precision$e}");
    if probe.negative { -probe.value } else { probe.value }
}

#[derive(Default)]
struct ExponentProbe {
    in_exponent: bool,
    negative: bool,
    value: i64,
}

impl Write for ExponentProbe {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if !self.in_exponent {
                self.in_exponent = b == b'e';
            } else if b == b'-' {
                self.negative = true;
            } else if b.is_ascii_digit() {
                self.value = self.value * 10 + i64::from(b - b'0');
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shaper: core::fmt output -> C layout
// ---------------------------------------------------------------------------

/// Streams `core::fmt` float output into an [`Out`], reshaping it on the fly.
///
/// Trailing fraction zeros (and a bare point) are held back while `strip`
/// is set and only released when a non-zero digit follows them.
struct Shaper<'o, 's, S: Sink + ?Sized> {
    out: &'o mut Out<'s, S>,
    strip: bool,
    point: bool,
    /// Exponent letter to emit, for exponent layouts.
    marker: Option<u8>,
    /// Fraction zeros past what `core::fmt` was asked for.
    tail_zeros: usize,
    seen_point: bool,
    pending_point: bool,
    pending_zeros: usize,
    in_exponent: bool,
    exponent_negative: bool,
    exponent: u64,
    full: bool,
}

impl<'o, 's, S: Sink + ?Sized> Shaper<'o, 's, S> {
    fn new(
        out: &'o mut Out<'s, S>,
        strip: bool,
        point: bool,
        marker: Option<u8>,
        tail_zeros: usize,
    ) -> Self {
        Self {
            out,
            strip,
            point,
            marker,
            tail_zeros,
            seen_point: false,
            pending_point: false,
            pending_zeros: 0,
            in_exponent: false,
            exponent_negative: false,
            exponent: 0,
            full: false,
        }
    }

    fn byte(&mut self, b: u8) -> Result<(), Eof> {
        if self.in_exponent {
            match b {
                b'-' => self.exponent_negative = true,
                b'0'..=b'9' => self.exponent = self.exponent * 10 + u64::from(b - b'0'),
                _ => {}
            }
            return Ok(());
        }
        match b {
            b'e' | b'E' => {
                self.end_mantissa()?;
                self.in_exponent = true;
            }
            b'.' => {
                self.seen_point = true;
                if self.strip {
                    self.pending_point = true;
                } else {
                    self.out.put(b'.')?;
                }
            }
            b'0' if self.strip && self.seen_point => self.pending_zeros += 1,
            _ => {
                self.release_pending()?;
                self.out.put(b)?;
            }
        }
        Ok(())
    }

    fn release_pending(&mut self) -> Result<(), Eof> {
        if self.pending_point {
            self.pending_point = false;
            self.out.put(b'.')?;
        }
        let zeros = core::mem::take(&mut self.pending_zeros);
        self.out.pad(b'0', zeros)
    }

    /// Drop held-back zeros; add the point `#` asks for and any tail zeros.
    fn end_mantissa(&mut self) -> Result<(), Eof> {
        self.pending_point = false;
        self.pending_zeros = 0;
        if self.point && !self.seen_point {
            self.out.put(b'.')?;
        }
        let tail = core::mem::take(&mut self.tail_zeros);
        self.out.pad(b'0', tail)
    }

    fn finish(mut self, result: fmt::Result) -> Result<(), Eof> {
        if self.full || result.is_err() {
            return Err(Eof);
        }
        if !self.in_exponent {
            self.end_mantissa()?;
        }
        if let Some(marker) = self.marker {
            self.out.put(marker)?;
            self.out.put(if self.exponent_negative { b'-' } else { b'+' })?;
            // At least two exponent digits.
            if self.exponent < 10 {
                self.out.put(b'0')?;
            }
            let mut digits = [0u8; DIGIT_BUF];
            let count = render_digits(self.exponent, 10, false, &mut digits);
            self.out.put_all(&digits[DIGIT_BUF - count..])?;
        }
        Ok(())
    }
}

impl<S: Sink + ?Sized> Write for Shaper<'_, '_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if self.byte(b).is_err() {
                self.full = true;
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Hex float
// ---------------------------------------------------------------------------

/// `%a` body after the `0x` prefix: `h.hhhp±d`.
///
/// Without a precision the fraction is the shortest exact one; with a
/// precision it is rounded half-to-even on the dropped nibbles.
fn emit_hex<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    abs: f64,
    precision: Option<usize>,
    point: bool,
    upper: bool,
) -> Result<(), Eof> {
    let bits = abs.to_bits();
    let biased = (bits >> MANTISSA_BITS) as i64;
    let mut mantissa = bits & MANTISSA_MASK;
    let (mut lead, exponent): (u64, i64) = match (biased, mantissa) {
        (0, 0) => (0, 0),
        (0, _) => (0, -1022), // subnormal
        _ => (1, biased - 1023),
    };

    let mut nibbles = MANTISSA_NIBBLES;
    match precision {
        Some(p) if p < MANTISSA_NIBBLES => {
            let shift = (MANTISSA_NIBBLES - p) * 4;
            let rem = mantissa & ((1u64 << shift) - 1);
            let half = 1u64 << (shift - 1);
            mantissa >>= shift;
            let odd = if p == 0 { lead & 1 == 1 } else { mantissa & 1 == 1 };
            if rem > half || (rem == half && odd) {
                mantissa += 1;
                if mantissa >> (p * 4) != 0 {
                    mantissa &= (1u64 << (p * 4)) - 1;
                    lead += 1;
                }
            }
            nibbles = p;
        }
        Some(_) => {}
        None => {
            while nibbles > 0 && mantissa & 0xf == 0 {
                mantissa >>= 4;
                nibbles -= 1;
            }
        }
    }
    let extra_zeros = precision.map_or(0, |p| p.saturating_sub(MANTISSA_NIBBLES));

    let alpha = if upper { b'A' } else { b'a' };
    out.put(b'0' + lead as u8)?;
    if nibbles > 0 || extra_zeros > 0 || point {
        out.put(b'.')?;
    }
    for i in (0..nibbles).rev() {
        let digit = ((mantissa >> (i * 4)) & 0xf) as u8;
        out.put(if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        })?;
    }
    out.pad(b'0', extra_zeros)?;

    out.put(if upper { b'P' } else { b'p' })?;
    out.put(if exponent < 0 { b'-' } else { b'+' })?;
    let mut digits = [0u8; DIGIT_BUF];
    let count = render_digits(exponent.unsigned_abs(), 10, false, &mut digits);
    out.put_all(&digits[DIGIT_BUF - count..])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
