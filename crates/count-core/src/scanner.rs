//! Record terminator scanning
//!
//! NUL always ends a record, whatever the configured terminator is: in line
//! mode an embedded NUL byte counts as a record boundary just like `\n`.

use memchr::{Memchr, Memchr2};

/// Lazy sequence of terminator offsets within a buffer
///
/// Offsets are absolute positions in the scanned buffer. The scan covers
/// `start..buf.len()` once; the next scan should start at the current
/// `buf.len()` so no byte is looked at twice.
pub struct RecordScanner<'a> {
    start: usize,
    hits: Hits<'a>,
}

enum Hits<'a> {
    Nul(Memchr<'a>),
    WithNul(Memchr2<'a>),
}

impl<'a> RecordScanner<'a> {
    /// Scan `buf` from `start` for `terminator` (and NUL)
    pub fn new(buf: &'a [u8], start: usize, terminator: u8) -> Self {
        let start = start.min(buf.len());
        let region = &buf[start..];
        let hits = if terminator == 0 {
            Hits::Nul(memchr::memchr_iter(0, region))
        } else {
            Hits::WithNul(memchr::memchr2_iter(terminator, 0, region))
        };
        Self { start, hits }
    }
}

impl Iterator for RecordScanner<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let hit = match &mut self.hits {
            Hits::Nul(it) => it.next(),
            Hits::WithNul(it) => it.next(),
        };
        hit.map(|pos| self.start + pos)
    }
}

/// Number of record terminators in `buf[start..]`
pub fn count_records(buf: &[u8], start: usize, terminator: u8) -> u64 {
    RecordScanner::new(buf, start, terminator).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_reports_absolute_offsets() {
        let buf = b"a\nb\nc\n";
        let offsets: Vec<usize> = RecordScanner::new(buf, 0, b'\n').collect();
        assert_eq!(offsets, vec![1, 3, 5]);

        let offsets: Vec<usize> = RecordScanner::new(buf, 2, b'\n').collect();
        assert_eq!(offsets, vec![3, 5]);
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_records(b"a\nb\nc\n", 0, b'\n'), 3);
        assert_eq!(count_records(b"no newline", 0, b'\n'), 0);
        assert_eq!(count_records(b"", 0, b'\n'), 0);
        assert_eq!(count_records(b"\n\n\n\n", 0, b'\n'), 4);
    }

    #[test]
    fn test_nul_terminates_in_line_mode() {
        let buf = b"one\0two\nthree\0";
        assert_eq!(count_records(buf, 0, b'\n'), 3);
        let offsets: Vec<usize> = RecordScanner::new(buf, 0, b'\n').collect();
        assert_eq!(offsets, vec![3, 7, 13]);
    }

    #[test]
    fn test_nul_mode_ignores_newlines() {
        let buf = b"a\nb\0c\nd\0";
        assert_eq!(count_records(buf, 0, 0), 2);
        assert_eq!(count_records(&[0u8; 64], 0, 0), 64);
    }

    #[test]
    fn test_incremental_scans_do_not_overlap() {
        let buf = b"x\ny\nz\n";
        let first = count_records(&buf[..3], 0, b'\n');
        let second = count_records(buf, 3, b'\n');
        assert_eq!(first + second, 3);
    }

    #[test]
    fn test_start_past_end_is_empty() {
        assert_eq!(count_records(b"a\n", 10, b'\n'), 0);
        assert_eq!(RecordScanner::new(b"a\n", 2, b'\n').next(), None);
    }

    #[test]
    fn test_other_terminators() {
        assert_eq!(count_records(b"a;b;c", 0, b';'), 2);
        assert_eq!(count_records(b"a;b\0c", 0, b';'), 2);
    }
}
