#![no_main]
use libfuzzer_sys::fuzz_target;
use nanofmt_core::parse_format_spec;

fuzz_target!(|data: &[u8]| {
    if let Some((spec, consumed)) = parse_format_spec(data) {
        assert!(consumed >= 2 && consumed <= data.len());
        assert_eq!(data[0], b'%');
        // Parsing only the consumed prefix yields the same descriptor.
        assert_eq!(parse_format_spec(&data[..consumed]), Some((spec, consumed)));
        assert!(!(spec.flags.left_justify && spec.flags.zero_pad));
        assert!(!(spec.flags.force_sign && spec.flags.space_sign));
    }
});
