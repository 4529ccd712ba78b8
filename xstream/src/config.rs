use crate::error::{Error, ErrorKind, Result};
use crate::{DEFAULT_CAPACITY, DEFAULT_MAX_SEGMENT_SIZE};

/// Construction-time settings for a stream and its reassembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Maximum bytes held written but not yet read.
    pub capacity: u64,
    /// Largest payload produced when cutting a byte sequence into segments.
    pub max_segment_size: usize,
}

impl StreamConfig {
    /// Creates a config with the crate defaults.
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_segment_size: DEFAULT_MAX_SEGMENT_SIZE,
        }
    }

    /// Sets the stream capacity in bytes.
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the segment payload limit.
    pub fn with_max_segment_size(mut self, size: usize) -> Self {
        self.max_segment_size = size;
        self
    }

    /// Checks that the capacity is addressable in memory and that segments
    /// are non-empty.
    ///
    /// A zero capacity is legal: such a stream accepts nothing.
    pub fn validate(&self) -> Result<()> {
        if usize::try_from(self.capacity).is_err() {
            return Err(Error::new(ErrorKind::InvalidCapacity));
        }
        if self.max_segment_size == 0 {
            return Err(Error::new(ErrorKind::InvalidSegmentSize));
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new()
    }
}
