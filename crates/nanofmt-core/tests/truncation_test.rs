//! Integration test: bounded output.
//!
//! Validates that:
//! 1. `format_to_buffer` keeps `N - 1` bytes plus a NUL and reports the full
//!    length whenever the output does not fit.
//! 2. A zero-length buffer is never written.
//! 3. Sinks that refuse bytes stop the engine at once, and the return value
//!    is exactly the number of bytes they accepted.
//! 4. Directive parsing is pure and re-parsing yields the same descriptor.
//!
//! Run: cargo test -p nanofmt-core --test truncation_test

use nanofmt_core::{
    BoundedBuffer, Counter, EOF, FormatArg, PutcSink, StackBuf, format_to_buffer, format_to_sink,
    parse_format_spec, snprintf,
};

const FMT: &str = "%s:%05d:%-4x|";

fn args() -> [FormatArg<'static>; 3] {
    [
        FormatArg::from("key"),
        FormatArg::Int(-42),
        FormatArg::Uint(0xab),
    ]
}

fn full_text() -> &'static [u8] {
    b"key:-0042:ab  |"
}

#[test]
fn every_capacity_truncates_consistently() {
    let full = full_text();
    for cap in 0..=full.len() + 4 {
        let mut buf = vec![0xEEu8; cap];
        let n = format_to_buffer(&mut buf, FMT, &args());
        assert_eq!(n, full.len() + 1, "capacity {cap}");

        if cap == 0 {
            continue;
        }
        let kept = (cap - 1).min(full.len());
        assert_eq!(&buf[..kept], &full[..kept], "capacity {cap}");
        assert_eq!(buf[kept], 0, "capacity {cap} must be NUL-terminated");
        for &b in &buf[kept + 1..] {
            assert_eq!(b, 0xEE, "capacity {cap} wrote past the output");
        }
    }
}

#[test]
fn zero_capacity_reports_length_only() {
    let mut empty: Vec<u8> = Vec::new();
    assert_eq!(format_to_buffer(&mut empty, "abc%d", &[FormatArg::Int(12)]), 6);
    assert!(empty.is_empty());
}

#[test]
fn counter_matches_buffer_length() {
    let mut counter = Counter::default();
    let n = format_to_sink(&mut counter, FMT, &args());
    assert_eq!(n, counter.count);
    let mut buf = [0u8; 4];
    assert_eq!(format_to_buffer(&mut buf, FMT, &args()), counter.count);
}

#[test]
fn bounded_sink_stops_at_capacity() {
    let mut mem = [0u8; 3];
    let mut sink = BoundedBuffer::new(&mut mem);
    assert_eq!(format_to_sink(&mut sink, "abcdef", &[]), 3);
    assert_eq!(sink.as_bytes(), b"abc");
}

#[test]
fn bounded_sink_every_capacity() {
    let full = full_text();
    for cap in 0..full.len() {
        let mut mem = vec![0u8; cap];
        let mut sink = BoundedBuffer::new(&mut mem);
        let n = format_to_sink(&mut sink, FMT, &args());
        assert_eq!(n, cap);
        assert_eq!(sink.as_bytes(), &full[..cap]);
    }
}

#[test]
fn stack_buf_keeps_prefix() {
    let mut out = StackBuf::<6>::new();
    let n = format_to_sink(&mut out, "%d-%d", &[FormatArg::Int(1234), FormatArg::Int(5678)]);
    assert_eq!(n, 6);
    assert_eq!(out.as_bytes(), b"1234-5");
}

struct Tty {
    line: Vec<u8>,
    limit: usize,
}

fn tty_putc(c: i32, tty: &mut Tty) -> i32 {
    if tty.line.len() >= tty.limit {
        return EOF;
    }
    tty.line.push(c as u8);
    c
}

#[test]
fn putc_callback_sees_eof() {
    let mut tty = Tty {
        line: Vec::new(),
        limit: 5,
    };
    let n = format_to_sink(
        &mut PutcSink::new(tty_putc, &mut tty),
        "[%s]",
        &[FormatArg::from("overflow")],
    );
    assert_eq!(n, 5);
    assert_eq!(tty.line, b"[over");
}

#[test]
fn snprintf_reports_would_be_length() {
    let mut buf = [0u8; 8];
    let n = snprintf!(&mut buf, "%s and %s", "this", "that");
    assert_eq!(n, 14);
    assert_eq!(&buf, b"this an\0");
}

#[cfg(all(feature = "c99-specifiers", feature = "float-specifiers"))]
#[test]
fn parse_is_pure() {
    let inputs: &[&[u8]] = &[
        b"%d",
        b"%-+ #012.5lld",
        b"%*.*s",
        b"%.x",
        b"%hhn",
        b"%Lf",
        b"%5%",
        b"%zu trailing",
    ];
    for &input in inputs {
        let first = parse_format_spec(input).expect("well-formed directive");
        let second = parse_format_spec(input).expect("well-formed directive");
        assert_eq!(first, second);
        let (_, consumed) = first;
        assert!(consumed >= 2 && consumed <= input.len());
        let again = parse_format_spec(&input[..consumed]).expect("prefix re-parses");
        assert_eq!(again, first);
    }
}

#[test]
fn malformed_directives_reject() {
    let inputs: [&[u8]; 6] = [b"%", b"%-", b"%5.3", b"%y", b"%h\0d", b"x%d"];
    for input in inputs {
        assert_eq!(parse_format_spec(input), None, "{input:?}");
    }
}
