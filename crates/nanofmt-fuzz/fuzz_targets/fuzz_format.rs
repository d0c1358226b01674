#![no_main]
use std::cell::Cell;

use libfuzzer_sys::fuzz_target;
use nanofmt_core::{BoundedBuffer, Counter, FormatArg, format_to_buffer, format_to_sink};

// Arbitrary format strings against a fixed mixed argument list: the engine
// must never panic, never write past the buffer, and agree with itself on
// the output length across sinks.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let cap = usize::from(data[0]);
    let fmt = &data[1..];

    let count = Cell::new(0);
    let args = [
        FormatArg::Int(-7),
        FormatArg::Uint(0xfeed),
        FormatArg::from("fuzz"),
        FormatArg::Float(-1.25e-3),
        FormatArg::Char(b'q'),
        FormatArg::Ptr(0x1000),
        FormatArg::Count(&count),
        FormatArg::Int(3),
    ];

    let mut counter = Counter::default();
    let total = format_to_sink(&mut counter, fmt, &args);
    assert_eq!(total, counter.count);

    let mut buf = vec![0xA5u8; cap + 8];
    let n = format_to_buffer(&mut buf[..cap], fmt, &args);
    assert_eq!(n, total);
    assert!(buf[cap..].iter().all(|&b| b == 0xA5));
    if cap > 0 {
        assert!(buf[..cap].contains(&0));
    }

    let mut bounded = vec![0u8; cap];
    let accepted = format_to_sink(&mut BoundedBuffer::new(&mut bounded), fmt, &args);
    assert_eq!(accepted, total.min(cap));
});
