//! Fuzz test for settings TOML parsing
//!
//! Tests that settings deserialization and the parsed accessors handle
//! arbitrary TOML safely.

#![no_main]

use count_core::{DisplaySettings, IoSettings, Settings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(settings) = toml::from_str::<Settings>(data) {
        // Should be able to serialize without panicking
        let _ = settings.to_toml();

        // Parsed accessors only ever fail with an error
        let _ = settings.io.input_block_size();
        let _ = settings.io.output_block_size();
        let _ = settings.display.final_status();
        let _ = settings.display.interval();
    }

    // Test parsing individual sections
    let _: Result<IoSettings, _> = toml::from_str(data);
    let _: Result<DisplaySettings, _> = toml::from_str(data);

    // Test with table wrappers (how they appear in full config)
    let wrapped = format!("[io]\n{}", data);
    let _: Result<Settings, _> = toml::from_str(&wrapped);

    let wrapped = format!("[display]\n{}", data);
    let _: Result<Settings, _> = toml::from_str(&wrapped);
});
