//! Renderers for integer, character, string and pointer conversions.
//!
//! Every renderer writes straight into the sink through [`Out`]; the only
//! scratch space is a fixed digit buffer on the stack. A full sink surfaces
//! as `Err(Eof)` and unwinds the whole directive with `?`.

use crate::sink::{Eof, Sink};
use crate::spec::{Conversion, FormatSpec};

/// Digit scratch size: a 64-bit value needs at most 22 octal digits.
pub(crate) const DIGIT_BUF: usize = 24;

// ---------------------------------------------------------------------------
// Output cursor
// ---------------------------------------------------------------------------

/// Counting front end over a sink.
pub(crate) struct Out<'s, S: Sink + ?Sized> {
    sink: &'s mut S,
    written: usize,
}

impl<'s, S: Sink + ?Sized> Out<'s, S> {
    pub(crate) fn new(sink: &'s mut S) -> Self {
        Self { sink, written: 0 }
    }

    /// Bytes the sink has accepted so far.
    pub(crate) fn written(&self) -> usize {
        self.written
    }

    #[inline]
    pub(crate) fn put(&mut self, byte: u8) -> Result<(), Eof> {
        self.sink.put(byte)?;
        self.written += 1;
        Ok(())
    }

    pub(crate) fn put_all(&mut self, bytes: &[u8]) -> Result<(), Eof> {
        for &b in bytes {
            self.put(b)?;
        }
        Ok(())
    }

    pub(crate) fn pad(&mut self, byte: u8, count: usize) -> Result<(), Eof> {
        for _ in 0..count {
            self.put(byte)?;
        }
        Ok(())
    }

    pub(crate) fn terminate(&mut self) -> Result<(), Eof> {
        self.sink.terminate()?;
        self.written += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Render a signed integer (`%d`, `%i`).
pub(crate) fn format_signed<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    value: i64,
    spec: &FormatSpec,
) -> Result<(), Eof> {
    // unsigned_abs keeps i64::MIN intact.
    let sign = sign_byte(value < 0, spec);
    format_integer(out, sign, value.unsigned_abs(), spec)
}

/// Render an unsigned integer (`%u`, `%o`, `%x`, `%X`).
pub(crate) fn format_unsigned<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    value: u64,
    spec: &FormatSpec,
) -> Result<(), Eof> {
    format_integer(out, None, value, spec)
}

/// Render a character (`%c`).
pub(crate) fn format_char<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    c: u8,
    spec: &FormatSpec,
) -> Result<(), Eof> {
    pad_around(out, &[c], spec)
}

/// Render a string (`%s`).
///
/// Stops at the first NUL; precision caps the byte count.
pub(crate) fn format_str<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    s: &[u8],
    spec: &FormatSpec,
) -> Result<(), Eof> {
    let max_len = spec.precision_value().unwrap_or(usize::MAX);
    let terminated = s.iter().position(|&b| b == 0).unwrap_or(s.len());
    let effective = &s[..terminated.min(max_len)];
    pad_around(out, effective, spec)
}

/// Render a pointer (`%p`) as `0x...` hex, or `(nil)` for null.
pub(crate) fn format_pointer<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    addr: usize,
    spec: &FormatSpec,
) -> Result<(), Eof> {
    if addr == 0 {
        return pad_around(out, b"(nil)", spec);
    }

    let mut digits = [0u8; DIGIT_BUF];
    let count = render_digits(addr as u64, 16, false, &mut digits);
    let digit_slice = &digits[DIGIT_BUF - count..];
    let pad_total = spec.field_width().saturating_sub(2 + count);

    if !spec.flags.left_justify {
        out.pad(b' ', pad_total)?;
    }
    out.put_all(b"0x")?;
    out.put_all(digit_slice)?;
    if spec.flags.left_justify {
        out.pad(b' ', pad_total)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Sign character for a signed conversion, if any.
pub(crate) fn sign_byte(negative: bool, spec: &FormatSpec) -> Option<u8> {
    if negative {
        Some(b'-')
    } else if spec.flags.force_sign {
        Some(b'+')
    } else if spec.flags.space_sign {
        Some(b' ')
    } else {
        None
    }
}

/// Shared integer layout: `[spaces][sign][prefix][zeros][digits][spaces]`.
fn format_integer<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    sign: Option<u8>,
    value: u64,
    spec: &FormatSpec,
) -> Result<(), Eof> {
    let (base, uppercase) = int_base(spec);
    let precision = spec.precision_value();

    // Explicit precision 0 with value 0: no digits at all.
    let mut digits = [0u8; DIGIT_BUF];
    let digit_count = if value == 0 && precision == Some(0) {
        0
    } else {
        render_digits(value, base, uppercase, &mut digits)
    };
    let digit_slice = &digits[DIGIT_BUF - digit_count..];

    // Precision: minimum digits (pad with zeros).
    let mut zero_count = precision.unwrap_or(1).saturating_sub(digit_count);

    let prefix: &[u8] = if !spec.flags.alt_form {
        b""
    } else {
        match spec.conversion {
            // '#' with 'o' forces the first digit to be a zero.
            Conversion::Octal if zero_count == 0 && digit_slice.first() != Some(&b'0') => b"0",
            Conversion::Hex if value != 0 && uppercase => b"0X",
            Conversion::Hex if value != 0 => b"0x",
            _ => b"",
        }
    };

    let content_len = sign.is_some() as usize + prefix.len() + zero_count + digit_count;
    let mut pad_total = spec.field_width().saturating_sub(content_len);

    // '0' is ignored for integers once a precision is given.
    if spec.flags.zero_pad && precision.is_none() {
        zero_count += pad_total;
        pad_total = 0;
    }

    if !spec.flags.left_justify {
        out.pad(b' ', pad_total)?;
    }
    if let Some(s) = sign {
        out.put(s)?;
    }
    out.put_all(prefix)?;
    out.pad(b'0', zero_count)?;
    out.put_all(digit_slice)?;
    if spec.flags.left_justify {
        out.pad(b' ', pad_total)?;
    }
    Ok(())
}

/// Space-pad `body` to the field width on the side `-` selects.
pub(crate) fn pad_around<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    body: &[u8],
    spec: &FormatSpec,
) -> Result<(), Eof> {
    let pad_total = spec.field_width().saturating_sub(body.len());
    if !spec.flags.left_justify {
        out.pad(b' ', pad_total)?;
    }
    out.put_all(body)?;
    if spec.flags.left_justify {
        out.pad(b' ', pad_total)?;
    }
    Ok(())
}

fn int_base(spec: &FormatSpec) -> (u64, bool) {
    match spec.conversion {
        Conversion::Octal => (8, false),
        Conversion::Hex => (16, spec.is_upper()),
        _ => (10, false),
    }
}

/// Render `value` in the given `base` into the END of `buf`.
/// Returns the number of digits written. Digits are placed right-aligned.
pub(crate) fn render_digits(
    mut value: u64,
    base: u64,
    uppercase: bool,
    buf: &mut [u8; DIGIT_BUF],
) -> usize {
    if value == 0 {
        buf[DIGIT_BUF - 1] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = DIGIT_BUF;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    DIGIT_BUF - pos
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
