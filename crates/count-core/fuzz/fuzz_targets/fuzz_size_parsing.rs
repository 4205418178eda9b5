//! Fuzz test for size string parsing
//!
//! Tests that size parsing handles arbitrary inputs safely.

#![no_main]

use libfuzzer_sys::fuzz_target;

use count_core::{parse_bounded_size, parse_size, MAX_BLOCK_SIZE};

fuzz_target!(|data: &str| {
    // Should never panic, only return Ok/Err
    let parsed = parse_size(data);

    // A bounded parse agrees with the plain one below the bound
    match parse_bounded_size(data, MAX_BLOCK_SIZE as u64) {
        Ok(size) => {
            assert!(size <= MAX_BLOCK_SIZE as u64);
            assert_eq!(parsed.as_ref().ok(), Some(&size));
        }
        Err(_) => {
            if let Ok(size) = parsed {
                assert!(size > MAX_BLOCK_SIZE as u64);
            }
        }
    }

    // Test with common suffixes appended
    for suffix in ["", "B", "K", "KB", "KiB", "M", "MiB", "G", "T", "k", "m", "g", "b"] {
        let test_input = format!("{}{}", data.trim(), suffix);
        let _ = parse_size(&test_input);
    }

    // Test with leading/trailing whitespace
    let whitespace_input = format!("  {}  ", data);
    assert_eq!(parse_size(&whitespace_input).ok(), parse_size(data.trim()).ok());
});
