//! Differential test: nanofmt against the host C library's `snprintf`.
//!
//! The engine counts the NUL in its return value; `snprintf` does not, so
//! every row checks `ours == host + 1` alongside byte-identical output.
//!
//! Run: cargo test -p nanofmt-harness --test host_libc_parity_test
#![cfg(all(target_os = "linux", target_env = "gnu"))]
#![allow(unsafe_code)]

use std::ffi::CStr;

use nanofmt_core::{FormatArg, format_to_buffer};

const CAP: usize = 256;

fn ours(fmt: &CStr, args: &[FormatArg<'_>]) -> (Vec<u8>, usize) {
    let mut buf = [0u8; CAP];
    let n = format_to_buffer(&mut buf, fmt.to_bytes(), args);
    let end = buf.iter().position(|&b| b == 0).unwrap_or(CAP);
    (buf[..end].to_vec(), n)
}

fn host_output(buf: &[u8; CAP], n: libc::c_int) -> (Vec<u8>, usize) {
    let n = usize::try_from(n).expect("host snprintf failed");
    let end = buf.iter().position(|&b| b == 0).unwrap_or(CAP);
    (buf[..end].to_vec(), n)
}

fn assert_parity(fmt: &CStr, ours: (Vec<u8>, usize), host: (Vec<u8>, usize)) {
    assert_eq!(
        String::from_utf8_lossy(&ours.0),
        String::from_utf8_lossy(&host.0),
        "output differs for {fmt:?}"
    );
    assert_eq!(ours.1, host.1 + 1, "return value differs for {fmt:?}");
}

fn host_int(fmt: &CStr, v: libc::c_int) -> (Vec<u8>, usize) {
    let mut buf = [0u8; CAP];
    // SAFETY: buffer and length match; every format consumes one int.
    let n = unsafe { libc::snprintf(buf.as_mut_ptr().cast(), CAP, fmt.as_ptr(), v) };
    host_output(&buf, n)
}

fn host_long(fmt: &CStr, v: libc::c_long) -> (Vec<u8>, usize) {
    let mut buf = [0u8; CAP];
    // SAFETY: buffer and length match; every format consumes one long.
    let n = unsafe { libc::snprintf(buf.as_mut_ptr().cast(), CAP, fmt.as_ptr(), v) };
    host_output(&buf, n)
}

fn host_double(fmt: &CStr, v: f64) -> (Vec<u8>, usize) {
    let mut buf = [0u8; CAP];
    // SAFETY: buffer and length match; every format consumes one double.
    let n = unsafe { libc::snprintf(buf.as_mut_ptr().cast(), CAP, fmt.as_ptr(), v) };
    host_output(&buf, n)
}

fn host_str(fmt: &CStr, s: &CStr) -> (Vec<u8>, usize) {
    let mut buf = [0u8; CAP];
    // SAFETY: buffer and length match; every format consumes one NUL-terminated string.
    let n = unsafe { libc::snprintf(buf.as_mut_ptr().cast(), CAP, fmt.as_ptr(), s.as_ptr()) };
    host_output(&buf, n)
}

#[test]
fn int_conversions_match_host() {
    let formats: [&CStr; 14] = [
        c"%d", c"%i", c"%5d|", c"%-5d|", c"%05d", c"%+d", c"% d", c"%.3d", c"%8.3d", c"%.0d",
        c"%u", c"%#o", c"%#x", c"%#010X",
    ];
    let values = [0, 1, -1, 7, 42, -42, 255, i32::MAX, i32::MIN];
    for fmt in formats {
        for v in values {
            let arg = [FormatArg::Int(i64::from(v))];
            assert_parity(fmt, ours(fmt, &arg), host_int(fmt, v));
        }
    }
}

#[test]
fn long_conversions_match_host() {
    let formats: [&CStr; 5] = [c"%ld", c"%lu", c"%lx", c"%lo", c"%+20ld|"];
    let values = [0, -1, i64::MIN, i64::MAX, 0x1234_5678_9abc];
    for fmt in formats {
        for v in values {
            let arg = [FormatArg::Int(v)];
            assert_parity(fmt, ours(fmt, &arg), host_long(fmt, v as libc::c_long));
        }
    }
}

#[test]
fn string_conversions_match_host() {
    let formats: [&CStr; 4] = [c"%s", c"%10s|", c"%-10s|", c"%.2s"];
    let values: [&CStr; 3] = [c"", c"a", c"hello world"];
    for fmt in formats {
        for s in values {
            let arg = [FormatArg::Str(s.to_bytes())];
            assert_parity(fmt, ours(fmt, &arg), host_str(fmt, s));
        }
    }
}

#[cfg(feature = "float-specifiers")]
#[test]
fn float_conversions_match_host() {
    let formats: [&CStr; 14] = [
        c"%f", c"%.0f", c"%#.0f", c"%10.3f|", c"%-10.2f|", c"%+f", c"%e", c"%.2E", c"%g",
        c"%G", c"%.3g", c"%#g", c"%012.4f", c"% e",
    ];
    let values = [
        0.0,
        -0.0,
        0.5,
        1.5,
        2.5,
        -3.14159,
        1e-5,
        123_456.789,
        1e21,
        9.999_999e-5,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ];
    for fmt in formats {
        for v in values {
            let arg = [FormatArg::Float(v)];
            assert_parity(fmt, ours(fmt, &arg), host_double(fmt, v));
        }
    }
}

#[cfg(all(feature = "float-specifiers", feature = "c99-specifiers"))]
#[test]
fn hex_float_matches_host() {
    let formats: [&CStr; 4] = [c"%a", c"%A", c"%.3a", c"%#a"];
    let values = [1.0, -2.0, 0.1, 255.0, 1e300];
    for fmt in formats {
        for v in values {
            let arg = [FormatArg::Float(v)];
            assert_parity(fmt, ours(fmt, &arg), host_double(fmt, v));
        }
    }
}
