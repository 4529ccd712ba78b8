//! Core data structures for the receive path.
//!
//! - Segment: an already-parsed `(offset, payload, is_last)` range
//! - Trace lines: the text form segments take in replay files

mod segment;

pub use segment::{LAST_FLAG, MORE_FLAG, Segment, segment_stream};
