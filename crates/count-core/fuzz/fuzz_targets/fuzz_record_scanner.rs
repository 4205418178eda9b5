//! Fuzz test for record terminator scanning
//!
//! Compares the scanner against a byte-by-byte count.

#![no_main]

use count_core::{count_records, RecordScanner};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, u16, &[u8])| {
    let (terminator, start, data) = input;
    let start = (start as usize).min(data.len());

    let expected = data[start..]
        .iter()
        .filter(|&&b| b == terminator || b == 0)
        .count() as u64;
    assert_eq!(count_records(data, start, terminator), expected);

    // Offsets are absolute, increasing and point at terminators
    let mut last = None;
    for offset in RecordScanner::new(data, start, terminator) {
        assert!(offset >= start);
        assert!(last.is_none_or(|l| offset > l));
        assert!(data[offset] == terminator || data[offset] == 0);
        last = Some(offset);
    }
});
