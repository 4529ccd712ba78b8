//! Bounded byte stream with separate write and read capabilities.
//!
//! A [`ByteStream`] holds at most `capacity` bytes that have been pushed
//! but not yet popped. The write side is described by [`Writer`] and the
//! read side by [`Reader`]; code that should only see one role takes the
//! matching trait.

use alloc::vec::Vec;

/// Write side of a bounded stream.
pub trait Writer {
    /// Appends as much of `data` as fits.
    ///
    /// Returns the number of bytes accepted. A closed stream accepts nothing.
    fn push(&mut self, data: &[u8]) -> usize;

    /// Signals that no more bytes will be pushed.
    fn close(&mut self);

    /// Raises the sticky error flag seen by the reader.
    fn set_error(&mut self);

    /// Returns true once `close` has been called.
    fn is_closed(&self) -> bool;

    /// Returns how many more bytes can be pushed right now.
    fn available_capacity(&self) -> u64;

    /// Returns the total number of bytes ever accepted.
    fn bytes_pushed(&self) -> u64;
}

/// Read side of a bounded stream.
pub trait Reader {
    /// Returns the buffered bytes that have not been popped yet.
    fn peek(&self) -> &[u8];

    /// Removes up to `len` bytes from the front of the buffer.
    fn pop(&mut self, len: u64);

    /// Returns true if the writer closed and every byte has been popped.
    fn is_finished(&self) -> bool;

    /// Returns true if the writer raised the error flag.
    fn has_error(&self) -> bool;

    /// Returns the number of bytes currently buffered.
    fn bytes_buffered(&self) -> u64;

    /// Returns the total number of bytes ever popped.
    fn bytes_popped(&self) -> u64;

    /// Moves up to `len` buffered bytes into `out`.
    ///
    /// Returns the number of bytes moved.
    fn read_into(&mut self, len: u64, out: &mut Vec<u8>) -> usize {
        let buffered = self.peek();
        let take = core::cmp::min(len, buffered.len() as u64) as usize;
        out.extend_from_slice(&buffered[..take]);
        self.pop(take as u64);
        take
    }
}

/// A fixed-capacity FIFO byte buffer.
///
/// Bytes live in a `Vec` with a read head; popped bytes are reclaimed
/// lazily so `peek` can always hand out one contiguous slice.
#[derive(Debug, Clone)]
pub struct ByteStream {
    /// Backing storage, valid from `head` to the end.
    buffer: Vec<u8>,

    /// Offset of the first unread byte in `buffer`.
    head: usize,

    /// Maximum bytes pushed but not popped.
    capacity: u64,

    /// Bytes ever pushed.
    pushed: u64,

    /// Bytes ever popped.
    popped: u64,

    /// Writer has finished.
    closed: bool,

    /// Sticky error flag.
    error: bool,
}

impl ByteStream {
    /// Creates an empty open stream with the given capacity.
    pub fn new(capacity: u64) -> Self {
        Self {
            buffer: Vec::new(),
            head: 0,
            capacity,
            pushed: 0,
            popped: 0,
            closed: false,
            error: false,
        }
    }

    /// Returns the fixed capacity.
    #[inline]
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Drops already-read bytes from the front of the storage once they
    /// make up at least half of it.
    fn compact(&mut self) {
        if self.head == self.buffer.len() {
            self.buffer.clear();
            self.head = 0;
        } else if self.head >= self.buffer.len() / 2 {
            self.buffer.drain(..self.head);
            self.head = 0;
        }
    }
}

impl Writer for ByteStream {
    fn push(&mut self, data: &[u8]) -> usize {
        if self.closed {
            return 0;
        }

        let to_write = core::cmp::min(self.available_capacity(), data.len() as u64) as usize;
        if to_write == 0 {
            return 0;
        }

        self.buffer.extend_from_slice(&data[..to_write]);
        self.pushed += to_write as u64;

        to_write
    }

    fn close(&mut self) {
        if !self.closed {
            log::debug!("Stream closed after {} bytes", self.pushed);
        }
        self.closed = true;
    }

    fn set_error(&mut self) {
        if !self.error {
            log::debug!("Stream error flag raised at byte {}", self.pushed);
        }
        self.error = true;
    }

    #[inline]
    fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    fn available_capacity(&self) -> u64 {
        self.capacity - (self.pushed - self.popped)
    }

    #[inline]
    fn bytes_pushed(&self) -> u64 {
        self.pushed
    }
}

impl Reader for ByteStream {
    #[inline]
    fn peek(&self) -> &[u8] {
        &self.buffer[self.head..]
    }

    fn pop(&mut self, len: u64) {
        let to_pop = core::cmp::min(len, self.bytes_buffered());
        if to_pop == 0 {
            return;
        }

        self.head += to_pop as usize;
        self.popped += to_pop;
        self.compact();
    }

    #[inline]
    fn is_finished(&self) -> bool {
        self.closed && self.popped == self.pushed
    }

    #[inline]
    fn has_error(&self) -> bool {
        self.error
    }

    #[inline]
    fn bytes_buffered(&self) -> u64 {
        self.pushed - self.popped
    }

    #[inline]
    fn bytes_popped(&self) -> u64 {
        self.popped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_push_pop() {
        let mut stream = ByteStream::new(64);

        let written = stream.push(b"Hello");
        assert_eq!(written, 5);
        assert_eq!(stream.bytes_buffered(), 5);
        assert_eq!(stream.available_capacity(), 59);
        assert_eq!(stream.peek(), b"Hello");

        stream.pop(5);
        assert_eq!(stream.bytes_popped(), 5);
        assert_eq!(stream.bytes_buffered(), 0);
        assert_eq!(stream.available_capacity(), 64);
        assert!(stream.peek().is_empty());
    }

    #[test]
    fn test_push_truncates_to_capacity() {
        let mut stream = ByteStream::new(4);

        assert_eq!(stream.push(b"abcdef"), 4);
        assert_eq!(stream.peek(), b"abcd");
        assert_eq!(stream.available_capacity(), 0);

        // Full stream accepts nothing
        assert_eq!(stream.push(b"g"), 0);
        assert_eq!(stream.bytes_pushed(), 4);

        // Room frees up after a pop
        stream.pop(2);
        assert_eq!(stream.push(b"xyz"), 2);
        assert_eq!(stream.peek(), b"cdxy");
    }

    #[test]
    fn test_zero_capacity() {
        let mut stream = ByteStream::new(0);
        assert_eq!(stream.push(b"data"), 0);
        assert_eq!(stream.bytes_pushed(), 0);
        stream.close();
        assert!(stream.is_finished());
    }

    #[test]
    fn test_pop_is_clamped() {
        let mut stream = ByteStream::new(16);
        stream.push(b"abc");
        stream.pop(100);
        assert_eq!(stream.bytes_popped(), 3);
        assert_eq!(stream.bytes_buffered(), 0);

        stream.pop(1);
        assert_eq!(stream.bytes_popped(), 3);
    }

    #[test]
    fn test_close_keeps_buffered_bytes() {
        let mut stream = ByteStream::new(16);
        stream.push(b"tail");
        stream.close();
        stream.close();

        assert!(stream.is_closed());
        assert!(!stream.is_finished());
        assert_eq!(stream.push(b"more"), 0);
        assert_eq!(stream.peek(), b"tail");

        stream.pop(4);
        assert!(stream.is_finished());
    }

    #[test]
    fn test_error_is_sticky_and_passive() {
        let mut stream = ByteStream::new(8);
        stream.push(b"ok");
        stream.set_error();
        stream.set_error();

        assert!(stream.has_error());
        assert_eq!(stream.peek(), b"ok");
        assert_eq!(stream.bytes_pushed(), 2);
        assert!(!stream.is_closed());
    }

    #[test]
    fn test_peek_stays_contiguous_across_compaction() {
        let mut stream = ByteStream::new(8);

        stream.push(b"12345678");
        stream.pop(5);
        assert_eq!(stream.peek(), b"678");

        stream.push(b"ABCDE");
        assert_eq!(stream.peek(), b"678ABCDE");

        stream.pop(1);
        assert_eq!(stream.peek(), b"78ABCDE");
        assert_eq!(stream.bytes_pushed(), 13);
        assert_eq!(stream.bytes_popped(), 6);
    }

    #[test]
    fn test_read_into() {
        let mut stream = ByteStream::new(16);
        stream.push(b"Hello, World");

        let mut out = Vec::new();
        assert_eq!(stream.read_into(5, &mut out), 5);
        assert_eq!(out, b"Hello");

        assert_eq!(stream.read_into(100, &mut out), 7);
        assert_eq!(out, b"Hello, World");
        assert_eq!(stream.bytes_buffered(), 0);
    }
}
