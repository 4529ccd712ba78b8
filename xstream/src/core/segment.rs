//! Segment definition for the receive path.
//!
//! A segment is one already-parsed piece of the stream: the absolute index
//! of its first byte, its payload, and whether it carries the final byte.
//! Segments may be duplicated, reordered or overlap each other; the
//! reassembler sorts that out.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{Error, ErrorKind, Result};

/// Flag marking a segment that carries the last byte of the stream.
pub const LAST_FLAG: &str = "F";

/// Flag marking any other segment.
pub const MORE_FLAG: &str = "-";

/// A byte range of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Absolute index of the first payload byte.
    pub offset: u64,

    /// Segment payload.
    pub payload: Vec<u8>,

    /// Whether the payload ends the stream.
    pub is_last: bool,
}

impl Segment {
    /// Creates a new segment.
    pub fn new(offset: u64, payload: Vec<u8>, is_last: bool) -> Self {
        Self {
            offset,
            payload,
            is_last,
        }
    }

    /// Returns the index one past the last payload byte, saturating at
    /// `u64::MAX`.
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.payload.len() as u64)
    }

    /// Returns the payload length.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Parses a trace line of the form `<offset> <flag> <payload>`.
    ///
    /// The flag is `-` or `F`. Everything after the second space is the
    /// payload, taken byte for byte; it may be empty, and the space in
    /// front of an empty payload may be omitted.
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut fields = line.splitn(3, ' ');

        let offset = fields
            .next()
            .filter(|field| !field.is_empty())
            .ok_or(Error::new(ErrorKind::MissingField))?
            .parse::<u64>()
            .map_err(|_| Error::new(ErrorKind::InvalidOffset))?;

        let is_last = match fields.next() {
            Some(LAST_FLAG) => true,
            Some(MORE_FLAG) => false,
            Some(_) => return Err(Error::new(ErrorKind::InvalidFlag)),
            None => return Err(Error::new(ErrorKind::MissingField)),
        };

        let payload = fields.next().unwrap_or("").as_bytes().to_vec();

        Ok(Self::new(offset, payload, is_last))
    }

    /// Formats the segment as a trace line.
    ///
    /// Returns None if the payload is not UTF-8 or spans several lines.
    pub fn to_line(&self) -> Option<String> {
        let payload = core::str::from_utf8(&self.payload).ok()?;
        if payload.contains(['\n', '\r']) {
            return None;
        }
        let flag = if self.is_last { LAST_FLAG } else { MORE_FLAG };
        Some(format!("{} {} {}", self.offset, flag, payload))
    }
}

/// Cuts `data` into consecutive segments of at most `max_segment_size`
/// bytes, starting at index 0. The final segment is marked last.
///
/// Empty input yields a single empty last segment.
pub fn segment_stream(data: &[u8], max_segment_size: usize) -> Vec<Segment> {
    if data.is_empty() || max_segment_size == 0 {
        return alloc::vec![Segment::new(0, Vec::new(), true)];
    }

    let count = data.len().div_ceil(max_segment_size);
    data.chunks(max_segment_size)
        .enumerate()
        .map(|(i, chunk)| {
            Segment::new(
                (i * max_segment_size) as u64,
                chunk.to_vec(),
                i + 1 == count,
            )
        })
        .collect()
}
