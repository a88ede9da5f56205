//! The 32 KiB sliding history window DEFLATE back-references read from.
//!
//! All decoded output passes through here before it ever reaches the
//! caller's sink: literals are appended one at a time, length/distance
//! matches are expanded by copying from earlier in the same buffer. The
//! buffer is circular rather than ever-growing, so addressing a
//! back-reference after a wrap requires modulo arithmetic — see
//! `write_copy` below.

use crate::io::ByteSink;

pub(crate) const WINDOW_SIZE: usize = 32 * 1024;

pub(crate) struct HistoryWindow {
    buf: Box<[u8; WINDOW_SIZE]>,
    write_pos: usize,
    read_pos: usize,
    /// Bytes written but not yet drained. `write_pos == read_pos` is
    /// ambiguous between "empty" and "full" on its own, so fullness is
    /// tracked explicitly here rather than inferred from the cursors.
    pending: usize,
    wrapped: bool,
}

impl HistoryWindow {
    pub fn new() -> Self {
        HistoryWindow {
            buf: Box::new([0u8; WINDOW_SIZE]),
            write_pos: 0,
            read_pos: 0,
            pending: 0,
            wrapped: false,
        }
    }

    pub fn reset(&mut self) {
        self.write_pos = 0;
        self.read_pos = 0;
        self.pending = 0;
        self.wrapped = false;
    }

    /// Bytes the caller can still append before the window fills up.
    pub fn write_available(&self) -> usize {
        WINDOW_SIZE - self.pending
    }

    /// Bytes of valid history currently retained behind `write_pos` —
    /// the farthest a back-reference is allowed to reach.
    pub fn history_size(&self) -> usize {
        if self.wrapped {
            WINDOW_SIZE
        } else {
            self.write_pos
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    pub fn write(&mut self, byte: u8) {
        debug_assert!(self.write_available() > 0);
        self.buf[self.write_pos] = byte;
        self.advance_write(1);
    }

    /// Copy `len` bytes from `dist` bytes behind the current write cursor,
    /// self-overlap included (`dist < len` is the common run-length case).
    /// Returns the number of bytes actually copied, which may be less than
    /// `len` if the window fills up first — the caller resumes the copy
    /// on the next call.
    ///
    /// `src` must wrap independently of `write_pos`: immediately after a
    /// wrap, `write_pos` can be 0 while a valid `dist` of up to `WINDOW_SIZE`
    /// still refers to a byte near the end of the buffer, so a plain
    /// `write_pos - dist` underflows. Indexing `(write_pos + WINDOW_SIZE -
    /// dist) % WINDOW_SIZE` instead finds the right byte regardless of
    /// where either cursor currently sits.
    pub fn write_copy(&mut self, dist: usize, len: usize) -> usize {
        debug_assert!(dist > 0 && dist <= WINDOW_SIZE);
        let mut src = (self.write_pos + WINDOW_SIZE - dist) % WINDOW_SIZE;
        let n = len.min(self.write_available());
        for _ in 0..n {
            self.buf[self.write_pos] = self.buf[src];
            self.write_pos += 1;
            src += 1;
            if self.write_pos == WINDOW_SIZE {
                self.write_pos = 0;
                self.wrapped = true;
            }
            if src == WINDOW_SIZE {
                src = 0;
            }
        }
        self.pending += n;
        n
    }

    /// Bulk copy from a raw byte slice (stored blocks bypass Huffman coding
    /// and the back-reference machinery entirely).
    pub fn write_from(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.write_available());
        for &b in &src[..n] {
            self.buf[self.write_pos] = b;
            self.write_pos += 1;
            if self.write_pos == WINDOW_SIZE {
                self.write_pos = 0;
                self.wrapped = true;
            }
        }
        self.pending += n;
        n
    }

    /// Drain as much pending output as `out` has room for.
    pub fn write_to<O: ByteSink + ?Sized>(&mut self, out: &mut O) -> bool {
        while self.pending > 0 {
            let start = self.read_pos;
            let chunk_len = self.pending.min(WINDOW_SIZE - start);
            let end = start + chunk_len;
            let n = out.write_from(&self.buf[start..end]);
            self.read_pos = if start + n == WINDOW_SIZE { 0 } else { start + n };
            self.pending -= n;
            if n < chunk_len {
                return false;
            }
        }
        true
    }

    fn advance_write(&mut self, n: usize) {
        self.write_pos += n;
        if self.write_pos == WINDOW_SIZE {
            self.write_pos = 0;
            self.wrapped = true;
        }
        self.pending += n;
    }
}
