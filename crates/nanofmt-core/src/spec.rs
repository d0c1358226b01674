//! Format directive parser.
//!
//! Decodes a single `%`-introduced directive into a [`FormatSpec`]. The
//! grammar follows ISO C11 7.21.6.1: flags, field width, precision, length
//! modifier, conversion specifier, in that order.
//!
//! Reference: POSIX.1-2024 fprintf, ISO C11 7.21.6.1
//!
//! Design invariant: parsing is pure. The same input bytes always produce
//! the same descriptor and consumed length, and nothing outside the returned
//! value is touched.

/// Upper bound for literal widths and precisions (C `INT_MAX`).
///
/// Decimal accumulation saturates here instead of wrapping.
pub const MAX_FIELD: usize = i32::MAX as usize;

const C99: bool = cfg!(feature = "c99-specifiers");
const FLOAT: bool = cfg!(feature = "float-specifiers");

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Flags parsed from a format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Precision specification.
///
/// `Fixed(0)` (a bare `.`) and `None` are distinct: integers print no digit
/// for zero under `Fixed(0)`, floats drop the fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Length modifier.
///
/// `Hh`, `Ll`, `J`, `Z` and `T` are only produced when the
/// `c99-specifiers` feature is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    H,    // 'h'
    L,    // 'l'
    BigL, // 'L'
    Hh,   // 'hh'
    Ll,   // 'll'
    J,    // 'j'
    Z,    // 'z'
    T,    // 't'
}

/// Conversion requested by a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Percent,       // '%'
    Char,          // 'c'
    Str,           // 's'
    Signed,        // 'd', 'i'
    Octal,         // 'o'
    Hex,           // 'x', 'X'
    Unsigned,      // 'u'
    CharsWritten,  // 'n'
    Pointer,       // 'p'
    FloatDecimal,  // 'f', 'F'
    FloatExponent, // 'e', 'E'
    FloatDynamic,  // 'g', 'G'
    FloatHex,      // 'a', 'A'
}

impl Conversion {
    /// Whether this conversion consumes a floating-point argument.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(
            self,
            Conversion::FloatDecimal
                | Conversion::FloatExponent
                | Conversion::FloatDynamic
                | Conversion::FloatHex
        )
    }
}

/// Letter case of a conversion (hex digits, exponent markers, inf/nan).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Case {
    #[default]
    None,
    Lower,
    Upper,
}

/// A parsed format directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: Conversion,
    pub case: Case,
}

impl FormatSpec {
    /// A directive with no flags, width, precision or length modifier.
    #[must_use]
    pub const fn plain(conversion: Conversion, case: Case) -> Self {
        Self {
            flags: FormatFlags {
                left_justify: false,
                force_sign: false,
                space_sign: false,
                alt_form: false,
                zero_pad: false,
            },
            width: Width::None,
            precision: Precision::None,
            length: LengthMod::None,
            conversion,
            case,
        }
    }

    /// Literal field width, or 0 when unset or still pending a `*` argument.
    #[must_use]
    pub fn field_width(&self) -> usize {
        match self.width {
            Width::Fixed(w) => w,
            _ => 0,
        }
    }

    /// Literal precision, or `None` when unset or still pending a `.*` argument.
    #[must_use]
    pub fn precision_value(&self) -> Option<usize> {
        match self.precision {
            Precision::Fixed(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_upper(&self) -> bool {
        self.case == Case::Upper
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single format directive starting AT the '%' character.
///
/// Returns `(spec, bytes_consumed)` where `bytes_consumed` includes the
/// leading '%'. Returns `None` if `fmt` does not start with '%' or the
/// directive is malformed; the caller then emits the '%' literally.
///
/// A NUL byte terminates the input the same way the slice end does.
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    if at(fmt, 0) != b'%' {
        return None;
    }
    let mut pos = 1;

    // --- flags ---
    let mut flags = FormatFlags::default();
    loop {
        match at(fmt, pos) {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    // '+' overrides ' '; '-' overrides '0', whatever order they came in.
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    // --- width ---
    let width = if at(fmt, pos) == b'*' {
        pos += 1;
        Width::FromArg
    } else {
        match parse_decimal(fmt, &mut pos) {
            Some(w) => Width::Fixed(w),
            None => Width::None,
        }
    };

    // --- precision ---
    let precision = if at(fmt, pos) == b'.' {
        pos += 1;
        if at(fmt, pos) == b'*' {
            pos += 1;
            Precision::FromArg
        } else {
            Precision::Fixed(parse_decimal(fmt, &mut pos).unwrap_or(0))
        }
    } else {
        Precision::None
    };

    // --- length modifier ---
    let length = match at(fmt, pos) {
        b'h' => {
            pos += 1;
            if C99 && at(fmt, pos) == b'h' {
                pos += 1;
                LengthMod::Hh
            } else {
                LengthMod::H
            }
        }
        b'l' => {
            pos += 1;
            if C99 && at(fmt, pos) == b'l' {
                pos += 1;
                LengthMod::Ll
            } else {
                LengthMod::L
            }
        }
        b'L' => {
            pos += 1;
            LengthMod::BigL
        }
        b'j' if C99 => {
            pos += 1;
            LengthMod::J
        }
        b'z' if C99 => {
            pos += 1;
            LengthMod::Z
        }
        b't' if C99 => {
            pos += 1;
            LengthMod::T
        }
        _ => LengthMod::None,
    };

    // --- conversion specifier ---
    let (conversion, case) = match at(fmt, pos) {
        b'%' => (Conversion::Percent, Case::None),
        b'c' => (Conversion::Char, Case::None),
        b's' => (Conversion::Str, Case::None),
        b'd' | b'i' => (Conversion::Signed, Case::None),
        b'o' => (Conversion::Octal, Case::None),
        b'x' => (Conversion::Hex, Case::Lower),
        b'X' => (Conversion::Hex, Case::Upper),
        b'u' => (Conversion::Unsigned, Case::None),
        b'n' => (Conversion::CharsWritten, Case::None),
        b'p' => (Conversion::Pointer, Case::None),
        b'f' if FLOAT => (Conversion::FloatDecimal, Case::Lower),
        b'F' if FLOAT => (Conversion::FloatDecimal, Case::Upper),
        b'e' if FLOAT => (Conversion::FloatExponent, Case::Lower),
        b'E' if FLOAT => (Conversion::FloatExponent, Case::Upper),
        b'g' if FLOAT => (Conversion::FloatDynamic, Case::Lower),
        b'G' if FLOAT => (Conversion::FloatDynamic, Case::Upper),
        b'a' if FLOAT && C99 => (Conversion::FloatHex, Case::Lower),
        b'A' if FLOAT && C99 => (Conversion::FloatHex, Case::Upper),
        _ => return None,
    };
    pos += 1;

    Some((
        FormatSpec {
            flags,
            width,
            precision,
            length,
            conversion,
            case,
        },
        pos,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Byte at `pos`, with the slice end reading as NUL.
#[inline]
fn at(fmt: &[u8], pos: usize) -> u8 {
    fmt.get(pos).copied().unwrap_or(0)
}

/// Accumulate a run of decimal digits at `*pos`, saturating at [`MAX_FIELD`].
///
/// Returns `None` (and leaves `*pos` alone) if there is no digit.
fn parse_decimal(fmt: &[u8], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    let mut result = 0_usize;
    while at(fmt, *pos).is_ascii_digit() {
        result = result
            .saturating_mul(10)
            .saturating_add((at(fmt, *pos) - b'0') as usize)
            .min(MAX_FIELD);
        *pos += 1;
    }
    (*pos > start).then_some(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_int() {
        let (spec, consumed) = parse_format_spec(b"%d").unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(spec.conversion, Conversion::Signed);
        assert_eq!(spec.width, Width::None);
        assert_eq!(spec.precision, Precision::None);
        assert_eq!(spec.length, LengthMod::None);
    }

    #[test]
    fn test_requires_leading_percent() {
        assert!(parse_format_spec(b"d").is_none());
        assert!(parse_format_spec(b"").is_none());
    }

    #[test]
    fn test_parse_width_precision() {
        let (spec, consumed) = parse_format_spec(b"%10.5d").unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(spec.width, Width::Fixed(10));
        assert_eq!(spec.precision, Precision::Fixed(5));
    }

    #[test]
    fn test_bare_dot_is_precision_zero() {
        let (spec, consumed) = parse_format_spec(b"%.x").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(spec.precision, Precision::Fixed(0));
        assert_eq!(spec.case, Case::Lower);
    }

    #[test]
    fn test_parse_flags() {
        let (spec, _) = parse_format_spec(b"%-+#010d").unwrap();
        assert!(spec.flags.left_justify);
        assert!(spec.flags.force_sign);
        assert!(spec.flags.alt_form);
        assert!(!spec.flags.zero_pad); // overridden by '-'
        assert_eq!(spec.width, Width::Fixed(10));
    }

    #[test]
    fn test_flag_overrides_ignore_order() {
        let (spec, _) = parse_format_spec(b"%0-5d").unwrap();
        assert!(spec.flags.left_justify);
        assert!(!spec.flags.zero_pad);

        let (spec, _) = parse_format_spec(b"%+ d").unwrap();
        assert!(spec.flags.force_sign);
        assert!(!spec.flags.space_sign);

        let (spec, _) = parse_format_spec(b"% +d").unwrap();
        assert!(spec.flags.force_sign);
        assert!(!spec.flags.space_sign);
    }

    #[test]
    fn test_repeated_flags() {
        let (spec, consumed) = parse_format_spec(b"%  ##u").unwrap();
        assert_eq!(consumed, 6);
        assert!(spec.flags.space_sign);
        assert!(spec.flags.alt_form);
    }

    #[test]
    fn test_parse_star_width() {
        let (spec, consumed) = parse_format_spec(b"%*d").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(spec.width, Width::FromArg);
    }

    #[test]
    fn test_parse_star_precision() {
        let (spec, consumed) = parse_format_spec(b"%.*s").unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(spec.precision, Precision::FromArg);
    }

    #[test]
    fn test_width_saturates() {
        let (spec, _) = parse_format_spec(b"%99999999999999999999999d").unwrap();
        assert_eq!(spec.width, Width::Fixed(MAX_FIELD));
        let (spec, _) = parse_format_spec(b"%.4294967296d").unwrap();
        assert_eq!(spec.precision, Precision::Fixed(MAX_FIELD));
    }

    #[test]
    fn test_single_letter_lengths() {
        assert_eq!(parse_format_spec(b"%hd").unwrap().0.length, LengthMod::H);
        assert_eq!(parse_format_spec(b"%lu").unwrap().0.length, LengthMod::L);
        let (spec, consumed) = parse_format_spec(b"%Lx").unwrap();
        assert_eq!(spec.length, LengthMod::BigL);
        assert_eq!(consumed, 3);
    }

    #[cfg(feature = "c99-specifiers")]
    #[test]
    fn test_parse_c99_lengths() {
        assert_eq!(parse_format_spec(b"%hhd").unwrap(), (spec_with_len(LengthMod::Hh), 4));
        assert_eq!(parse_format_spec(b"%lld").unwrap(), (spec_with_len(LengthMod::Ll), 4));
        assert_eq!(parse_format_spec(b"%jd").unwrap(), (spec_with_len(LengthMod::J), 3));
        assert_eq!(parse_format_spec(b"%zd").unwrap(), (spec_with_len(LengthMod::Z), 3));
        assert_eq!(parse_format_spec(b"%td").unwrap(), (spec_with_len(LengthMod::T), 3));
    }

    #[cfg(feature = "c99-specifiers")]
    fn spec_with_len(length: LengthMod) -> FormatSpec {
        FormatSpec {
            length,
            ..FormatSpec::plain(Conversion::Signed, Case::None)
        }
    }

    #[cfg(not(feature = "c99-specifiers"))]
    #[test]
    fn test_c99_lengths_rejected_without_feature() {
        // 'h' is consumed, then 'h' is not a conversion.
        assert!(parse_format_spec(b"%hhd").is_none());
        assert!(parse_format_spec(b"%zu").is_none());
    }

    #[test]
    fn test_conversion_letters() {
        let cases: &[(&[u8], Conversion, Case)] = &[
            (b"%%", Conversion::Percent, Case::None),
            (b"%c", Conversion::Char, Case::None),
            (b"%s", Conversion::Str, Case::None),
            (b"%i", Conversion::Signed, Case::None),
            (b"%o", Conversion::Octal, Case::None),
            (b"%X", Conversion::Hex, Case::Upper),
            (b"%u", Conversion::Unsigned, Case::None),
            (b"%n", Conversion::CharsWritten, Case::None),
            (b"%p", Conversion::Pointer, Case::None),
        ];
        for &(text, conversion, case) in cases {
            let (spec, consumed) = parse_format_spec(text).unwrap();
            assert_eq!(consumed, 2);
            assert_eq!(spec.conversion, conversion);
            assert_eq!(spec.case, case);
        }
    }

    #[cfg(feature = "float-specifiers")]
    #[test]
    fn test_float_conversions() {
        let (spec, consumed) = parse_format_spec(b"%10.3Lf").unwrap();
        assert_eq!(consumed, 7);
        assert_eq!(spec.conversion, Conversion::FloatDecimal);
        assert_eq!(spec.length, LengthMod::BigL);
        assert_eq!(parse_format_spec(b"%E").unwrap().0.case, Case::Upper);
        assert_eq!(
            parse_format_spec(b"%g").unwrap().0.conversion,
            Conversion::FloatDynamic
        );
        assert!(parse_format_spec(b"%G").unwrap().0.conversion.is_float());
    }

    #[cfg(all(feature = "float-specifiers", feature = "c99-specifiers"))]
    #[test]
    fn test_hex_float_conversion() {
        let (spec, _) = parse_format_spec(b"%A").unwrap();
        assert_eq!(spec.conversion, Conversion::FloatHex);
        assert_eq!(spec.case, Case::Upper);
    }

    #[test]
    fn test_unknown_conversion_fails() {
        assert!(parse_format_spec(b"%q").is_none());
        assert!(parse_format_spec(b"%5.2k").is_none());
        assert!(parse_format_spec(b"%").is_none());
        assert!(parse_format_spec(b"%-").is_none());
    }

    #[test]
    fn test_nul_terminates_directive() {
        assert!(parse_format_spec(b"%\0d").is_none());
        assert!(parse_format_spec(b"%5\0").is_none());
    }

    #[test]
    fn test_trailing_bytes_not_consumed() {
        let (spec, consumed) = parse_format_spec(b"%-8sxyz").unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(spec.conversion, Conversion::Str);
        assert_eq!(spec.width, Width::Fixed(8));
    }

    #[test]
    fn test_reparse_is_identical() {
        let text = b"%+08.3hd";
        let first = parse_format_spec(text);
        let second = parse_format_spec(text);
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
