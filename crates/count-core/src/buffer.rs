//! Growable byte buffer between the input and the output

use std::io::{self, Read, Write};

/// Bytes read from the input but not yet written to the output
///
/// Buffered data lives in `data[start..end]`. Everything past `end` is
/// already initialized spare room, so a fill only zeroes bytes the buffer
/// has never held before.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    data: Vec<u8>,
    start: usize,
    end: usize,
}

impl StreamBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The buffered bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    /// Append at most `max` bytes with a single read from `reader`
    ///
    /// Returns the number of bytes appended; 0 means end-of-stream.
    /// Reads interrupted by a signal are reissued.
    pub fn fill_from<R: Read + ?Sized>(&mut self, reader: &mut R, max: usize) -> io::Result<usize> {
        self.compact();

        let want = self.end + max;
        if self.data.len() < want {
            self.data.resize(want, 0);
        }

        loop {
            match reader.read(&mut self.data[self.end..want]) {
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Write the first `n` buffered bytes to `writer` and drop them
    ///
    /// The bytes stay buffered if the write fails.
    pub fn drain_to<W: Write + ?Sized>(&mut self, writer: &mut W, n: usize) -> io::Result<()> {
        let n = n.min(self.len());
        writer.write_all(&self.data[self.start..self.start + n])?;
        self.start += n;
        Ok(())
    }

    /// Move buffered bytes to the front, keeping the spare room
    fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        self.data.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
    }
}
