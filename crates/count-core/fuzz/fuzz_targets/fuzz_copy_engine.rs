//! Fuzz test for the copy engine
//!
//! Whatever the chunking of the input and the reshape sizes, the output must
//! equal the input and the counters must match it.

#![no_main]

use arbitrary::Arbitrary;
use count_core::{CopyEngine, CountConfig, CountMode};
use libfuzzer_sys::fuzz_target;
use std::io::{self, Read};

#[derive(Debug, Arbitrary)]
struct Input {
    data: Vec<u8>,
    chunks: Vec<u8>,
    block_size: Option<u16>,
    nul_records: bool,
    input_chunk: u16,
    output_block: u16,
}

/// Reader returning reads of fuzzer-chosen lengths
struct ChunkedReader<'a> {
    data: &'a [u8],
    chunks: &'a [u8],
    next: usize,
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = self
            .chunks
            .get(self.next)
            .map_or(buf.len(), |&c| c as usize + 1);
        self.next += 1;
        let n = want.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fuzz_target!(|input: Input| {
    let block_size = input.block_size.map(usize::from);
    let Ok(mode) = CountMode::from_block_size(block_size, input.nul_records) else {
        return;
    };
    let config = CountConfig::new(mode)
        .input_chunk(input.input_chunk as usize)
        .output_block(input.output_block as usize);
    let Ok(mut engine) = CopyEngine::new(config) else {
        return;
    };

    let reader = ChunkedReader {
        data: &input.data,
        chunks: &input.chunks,
        next: 0,
    };
    let mut output = Vec::new();
    let snapshot = engine.run(reader, &mut output).unwrap();

    assert_eq!(output, input.data);
    assert_eq!(snapshot.total, input.data.len() as u64);
    match mode.terminator() {
        Some(t) => {
            let records = input.data.iter().filter(|&&b| b == t || b == 0).count();
            assert_eq!(snapshot.count, records as u64);
        }
        None => {
            let divisor = mode.divisor().unwrap();
            assert_eq!(snapshot.count, snapshot.total / divisor);
        }
    }
});
