//! Receive-path side of a channel.

use crate::buffer::Writer;
use crate::core::Segment;

use super::Shared;

/// Handle used by the receive path to feed byte ranges.
///
/// Cloning yields another handle onto the same stream.
#[derive(Debug, Clone)]
pub struct Inbound {
    shared: Shared,
}

impl Inbound {
    pub(super) fn new(shared: Shared) -> Self {
        Self { shared }
    }

    /// Inserts a byte range; see [`Reassembler::insert`].
    ///
    /// [`Reassembler::insert`]: crate::reliable::Reassembler::insert
    pub fn insert(&self, first_index: u64, data: &[u8], is_last: bool) {
        self.shared.lock().insert(first_index, data, is_last);
    }

    /// Inserts a parsed segment.
    pub fn insert_segment(&self, segment: &Segment) {
        self.shared.lock().insert_segment(segment);
    }

    /// Returns the number of bytes parked waiting for a gap to fill.
    pub fn bytes_pending(&self) -> u64 {
        self.shared.lock().bytes_pending()
    }

    /// Returns the index of the next byte the stream is waiting for.
    pub fn next_index(&self) -> u64 {
        self.shared.lock().next_index()
    }

    /// Returns true once the whole stream has been delivered.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().is_closed()
    }

    /// Returns the free room in the stream.
    pub fn available_capacity(&self) -> u64 {
        self.shared.lock().writer().available_capacity()
    }

    /// Returns the stream's fixed capacity.
    pub fn capacity(&self) -> u64 {
        self.shared.lock().writer().capacity()
    }

    /// Returns the total number of bytes pushed into the stream.
    pub fn bytes_pushed(&self) -> u64 {
        self.shared.lock().writer().bytes_pushed()
    }

    /// Flags an upstream protocol violation.
    pub fn set_error(&self) {
        self.shared.lock().set_error();
    }
}
