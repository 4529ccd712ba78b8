//! `std::io` adapters for [`ByteStream`].
//!
//! Writing pushes into the stream and reading pops from it, so a stream can
//! sit behind code that expects ordinary readers and writers.

use crate::buffer::{ByteStream, Reader, Writer};
use crate::error::{Error, ErrorKind};

impl std::io::Write for ByteStream {
    /// Pushes as much of `buf` as fits. A full stream returns `Ok(0)`.
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if Writer::is_closed(self) {
            return Err(Error::new(ErrorKind::StreamClosed).into());
        }
        Ok(self.push(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl std::io::Read for ByteStream {
    /// Pops buffered bytes into `buf`.
    ///
    /// Returns `Ok(0)` once the stream is finished, and a `WouldBlock`
    /// error while it is empty but still open.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.has_error() {
            return Err(Error::new(ErrorKind::StreamErrored).into());
        }
        if buf.is_empty() || self.is_finished() {
            return Ok(0);
        }

        let buffered = self.peek();
        if buffered.is_empty() {
            return Err(Error::new(ErrorKind::WouldBlock).into());
        }

        let n = core::cmp::min(buf.len(), buffered.len());
        buf[..n].copy_from_slice(&buffered[..n]);
        self.pop(n as u64);
        Ok(n)
    }
}
