//! Formatting engine.
//!
//! Walks a format string left to right, copying literal bytes and expanding
//! each directive with the next argument(s), all pushed one byte at a time
//! into a [`Sink`].
//!
//! Failure policy:
//! - a malformed directive is written out literally, starting with its '%';
//! - a sink that reports [`Eof`] stops formatting at once, and the count of
//!   bytes it accepted is returned;
//! - a missing or mismatched argument makes its directive print nothing.
//!
//! After the format string the sink's terminator is written and counted.

use crate::arg::{ArgList, FormatArg};
use crate::render::{self, Out};
use crate::sink::{Eof, Sink};
use crate::spec::{Conversion, FormatSpec, LengthMod, MAX_FIELD, Precision, Width, parse_format_spec};

/// Format `fmt` with `args` into `sink`.
///
/// The format string ends at the slice end or at its first NUL byte.
/// Returns the number of bytes the sink accepted, terminator included.
pub fn format<S: Sink + ?Sized>(sink: &mut S, fmt: &[u8], args: &[FormatArg<'_>]) -> usize {
    let mut out = Out::new(sink);
    let mut args = ArgList::new(args);
    // Err only means the sink filled up; the count says how far we got.
    let _ = run(&mut out, fmt, &mut args);
    out.written()
}

fn run<S: Sink + ?Sized>(out: &mut Out<'_, S>, fmt: &[u8], args: &mut ArgList<'_>) -> Result<(), Eof> {
    let mut pos = 0;
    while let Some(&byte) = fmt.get(pos) {
        if byte == 0 {
            break;
        }
        if byte != b'%' {
            out.put(byte)?;
            pos += 1;
            continue;
        }
        match parse_format_spec(&fmt[pos..]) {
            Some((spec, consumed)) => {
                convert(out, &spec, args)?;
                pos += consumed;
            }
            None => {
                // Malformed: the '%' goes out as-is, scanning resumes after it.
                out.put(b'%')?;
                pos += 1;
            }
        }
    }
    out.terminate()
}

/// Expand one directive.
fn convert<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    spec: &FormatSpec,
    args: &mut ArgList<'_>,
) -> Result<(), Eof> {
    let resolved = resolve_star_args(spec, args);
    let length = resolved.length;

    match resolved.conversion {
        Conversion::Percent => out.put(b'%'),
        Conversion::Char => match args.next_unsigned(LengthMod::None) {
            Some(c) => render::format_char(out, c as u8, &resolved),
            None => Ok(()),
        },
        Conversion::Str => match args.next_str() {
            Some(s) => render::format_str(out, s, &resolved),
            None => Ok(()),
        },
        Conversion::Signed => match args.next_signed(length) {
            Some(v) => render::format_signed(out, v, &resolved),
            None => Ok(()),
        },
        Conversion::Octal | Conversion::Hex | Conversion::Unsigned => {
            match args.next_unsigned(length) {
                Some(v) => render::format_unsigned(out, v, &resolved),
                None => Ok(()),
            }
        }
        Conversion::CharsWritten => {
            if let Some(cell) = args.next_count() {
                cell.set(out.written());
            }
            Ok(())
        }
        Conversion::Pointer => match args.next_pointer() {
            Some(addr) => render::format_pointer(out, addr, &resolved),
            None => Ok(()),
        },
        Conversion::FloatDecimal
        | Conversion::FloatExponent
        | Conversion::FloatDynamic
        | Conversion::FloatHex => convert_float(out, &resolved, args),
    }
}

#[cfg(feature = "float-specifiers")]
fn convert_float<S: Sink + ?Sized>(
    out: &mut Out<'_, S>,
    spec: &FormatSpec,
    args: &mut ArgList<'_>,
) -> Result<(), Eof> {
    match args.next_float() {
        Some(v) => crate::float::format_float(out, v, spec),
        None => Ok(()),
    }
}

/// The parser never yields float conversions without the feature.
#[cfg(not(feature = "float-specifiers"))]
fn convert_float<S: Sink + ?Sized>(
    _out: &mut Out<'_, S>,
    _spec: &FormatSpec,
    _args: &mut ArgList<'_>,
) -> Result<(), Eof> {
    Ok(())
}

/// Pull `*` width and `.*` precision from the argument list, in that order.
///
/// A negative width means left-justify with its magnitude; a negative
/// precision means no precision. A missing argument leaves the field unset.
fn resolve_star_args(spec: &FormatSpec, args: &mut ArgList<'_>) -> FormatSpec {
    let mut resolved = *spec;
    if matches!(spec.width, Width::FromArg) {
        resolved.width = match args.next_signed(LengthMod::None) {
            Some(w) => {
                if w < 0 {
                    resolved.flags.left_justify = true;
                    resolved.flags.zero_pad = false;
                }
                Width::Fixed((w.unsigned_abs() as usize).min(MAX_FIELD))
            }
            None => Width::None,
        };
    }
    if matches!(spec.precision, Precision::FromArg) {
        resolved.precision = match args.next_signed(LengthMod::None) {
            Some(p) if p >= 0 => Precision::Fixed((p as usize).min(MAX_FIELD)),
            _ => Precision::None,
        };
    }
    resolved
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
