//! Byte-range reassembly for out-of-order stream data.
//!
//! This module turns arbitrary `(offset, bytes, is_last)` inserts into the
//! exactly-once, in-order pushes a [`Writer`] expects. Ranges that arrive
//! early are parked until the gap in front of them is filled; duplicate and
//! overlapping bytes are trimmed away; anything outside the window the
//! stream can currently absorb is dropped.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::buffer::{ByteStream, Reader, Writer};
use crate::config::StreamConfig;
use crate::core::Segment;

/// Stream reassembler.
///
/// Owns the stream it writes into. The receive path calls [`insert`];
/// the application drains bytes through [`reader`].
///
/// [`insert`]: Reassembler::insert
/// [`reader`]: Reassembler::reader
#[derive(Debug)]
pub struct Reassembler<W = ByteStream> {
    /// Stream receiving the in-order bytes.
    output: W,

    /// Absolute index of the next byte the stream needs.
    next_index: u64,

    /// Parked ranges keyed by start index; never overlapping.
    pending: BTreeMap<u64, Vec<u8>>,

    /// Sum of the lengths in `pending`.
    pending_bytes: u64,

    /// Some insert carried the last byte of the stream.
    end_requested: bool,
}

impl Reassembler<ByteStream> {
    /// Creates a reassembler over a fresh stream sized by `config`.
    pub fn with_config(config: &StreamConfig) -> Self {
        Self::new(ByteStream::new(config.capacity))
    }
}

impl<W: Writer> Reassembler<W> {
    /// Creates a reassembler that takes ownership of `output`.
    pub fn new(output: W) -> Self {
        Self {
            output,
            next_index: 0,
            pending: BTreeMap::new(),
            pending_bytes: 0,
            end_requested: false,
        }
    }

    /// Inserts `data` whose first byte sits at absolute index `first_index`.
    ///
    /// Bytes already delivered, bytes beyond the current window, and bytes
    /// already parked are silently dropped, as is everything once the stream
    /// has been closed. Whatever becomes contiguous is pushed into the stream
    /// before returning. The stream is closed once the last byte has been
    /// announced and nothing is left pending.
    pub fn insert(&mut self, first_index: u64, data: &[u8], is_last: bool) {
        if is_last && !self.end_requested {
            log::debug!(
                "End of stream announced by range [{}, {})",
                first_index,
                first_index.saturating_add(data.len() as u64)
            );
            self.end_requested = true;
        }

        let available = self.output.available_capacity();
        let window_end = self.next_index.saturating_add(available);
        let data_end = first_index.saturating_add(data.len() as u64);

        if data.is_empty()
            || self.output.is_closed()
            || available == 0
            || first_index >= window_end
            || data_end <= self.next_index
        {
            log::trace!(
                "Dropped range [{}, {}), window [{}, {})",
                first_index,
                data_end,
                self.next_index,
                window_end
            );
            self.close_if_done();
            return;
        }

        // Clip to [next_index, window_end)
        let start = core::cmp::max(first_index, self.next_index);
        let end = core::cmp::min(data_end, window_end);
        let clipped = &data[(start - first_index) as usize..(end - first_index) as usize];

        self.store(start, clipped);
        self.drain();
        self.close_if_done();
    }

    /// Inserts a parsed segment.
    pub fn insert_segment(&mut self, segment: &Segment) {
        self.insert(segment.offset, &segment.payload, segment.is_last);
    }

    /// Returns the number of bytes parked waiting for a gap to fill.
    #[inline]
    pub const fn bytes_pending(&self) -> u64 {
        self.pending_bytes
    }

    /// Returns the absolute index of the next byte the stream needs.
    #[inline]
    pub const fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Returns true once the last byte has been announced and everything
    /// up to it has been delivered.
    #[inline]
    pub const fn is_closed(&self) -> bool {
        self.end_requested && self.pending_bytes == 0
    }

    /// Read-only view of the write side, for backpressure checks.
    #[inline]
    pub fn writer(&self) -> &W {
        &self.output
    }

    /// Flags an upstream protocol violation on the stream.
    pub fn set_error(&mut self) {
        self.output.set_error();
    }

    /// Consumes the reassembler, returning the stream.
    pub fn into_inner(self) -> W {
        self.output
    }

    /// Merges `data` starting at `start` into the pending map.
    ///
    /// `start` must lie at or after `next_index`.
    fn store(&mut self, start: u64, data: &[u8]) {
        let end = start + data.len() as u64;
        let mut new_start = start;

        // Disjoint ranges: only the nearest predecessor can reach `start`.
        if let Some((&prev_start, prev)) = self.pending.range(..start).next_back() {
            let prev_end = prev_start + prev.len() as u64;
            if prev_end >= end {
                log::trace!("Range [{}, {}) already pending", start, end);
                return;
            }
            if prev_end > start {
                new_start = prev_end;
            }
        }

        loop {
            let next = self.pending.range(new_start..end).next().map(|(&key, _)| key);
            let Some(key) = next else {
                break;
            };
            let Some(mut existing) = self.pending.remove(&key) else {
                break;
            };
            let existing_end = key + existing.len() as u64;

            if existing_end <= end {
                self.pending_bytes -= existing.len() as u64;
            } else {
                let overlap = (end - key) as usize;
                let tail = existing.split_off(overlap);
                self.pending_bytes -= overlap as u64;
                self.pending.insert(end, tail);
            }
        }

        let residual = &data[(new_start - start) as usize..];
        if !residual.is_empty() {
            log::trace!("Parked range [{}, {})", new_start, end);
            self.pending_bytes += residual.len() as u64;
            self.pending.insert(new_start, residual.to_vec());
        }
    }

    /// Pushes parked ranges into the stream while they are contiguous.
    fn drain(&mut self) {
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() != self.next_index {
                break;
            }

            let mut data = entry.remove();
            let accepted = self.output.push(&data);
            self.next_index += accepted as u64;
            self.pending_bytes -= accepted as u64;

            if accepted < data.len() {
                // Stream is full: keep the rest for later.
                let rest = data.split_off(accepted);
                log::trace!(
                    "Stream accepted {} of {} bytes, {} left at {}",
                    accepted,
                    accepted + rest.len(),
                    rest.len(),
                    self.next_index
                );
                self.pending.insert(self.next_index, rest);
                break;
            }

            log::trace!("Delivered {} bytes, next index {}", accepted, self.next_index);
        }
    }

    fn close_if_done(&mut self) {
        if self.is_closed() && !self.output.is_closed() {
            self.output.close();
        }
    }
}

impl<W: Writer + Reader> Reassembler<W> {
    /// Read side of the owned stream.
    ///
    /// The returned view exposes only reader operations.
    pub fn reader(&mut self) -> &mut (dyn Reader + '_) {
        &mut self.output
    }
}
