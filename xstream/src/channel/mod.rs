//! Thread-safe handles over one reassembler and its stream.
//!
//! [`channel`] splits a stream into an [`Inbound`] handle for the receive
//! path and an [`Outbound`] handle for the application. Both share one
//! lock, so every insert, together with the pushes it performs, is atomic
//! with respect to other inserts and to reads.

mod inbound;
mod outbound;

use alloc::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::ByteStream;
use crate::config::StreamConfig;
use crate::reliable::Reassembler;

pub use inbound::Inbound;
pub use outbound::Outbound;

/// Lifecycle of a channel as seen by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// More bytes may still arrive.
    Open,

    /// The writer is done but bytes are still buffered.
    Closed,

    /// Every byte has been read.
    Finished,
}

type Shared = Arc<Mutex<Reassembler<ByteStream>>>;

/// Creates a connected pair of handles over a fresh stream.
pub fn channel(config: &StreamConfig) -> (Inbound, Outbound) {
    let shared: Shared = Arc::new(Mutex::new(Reassembler::with_config(config)));
    log::debug!("Channel created with capacity {}", config.capacity);
    (Inbound::new(shared.clone()), Outbound::new(shared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::segment_stream;
    use alloc::vec::Vec;

    #[test]
    fn test_channel_roundtrip() {
        let (inbound, outbound) = channel(&StreamConfig::new().with_capacity(64));

        inbound.insert(6, b"World", true);
        assert_eq!(outbound.state(), ChannelState::Open);
        assert_eq!(inbound.bytes_pending(), 5);

        inbound.insert(0, b"Hello ", false);
        assert!(inbound.is_closed());
        assert_eq!(outbound.state(), ChannelState::Closed);
        assert_eq!(outbound.bytes_buffered(), 11);

        assert_eq!(outbound.read(5), b"Hello");
        assert_eq!(outbound.read(100), b" World");
        assert_eq!(outbound.state(), ChannelState::Finished);
        assert_eq!(outbound.bytes_popped(), 11);
    }

    #[test]
    fn test_backpressure_visible_to_inbound() {
        let (inbound, outbound) = channel(&StreamConfig::new().with_capacity(4));

        inbound.insert(0, b"abcdef", false);
        assert_eq!(inbound.capacity(), 4);
        assert_eq!(inbound.available_capacity(), 0);

        assert_eq!(outbound.read(2), b"ab");
        assert_eq!(inbound.available_capacity(), 2);

        // Window is now [4, 6)
        assert_eq!(inbound.next_index(), 4);
        inbound.insert(4, b"ef", true);
        assert_eq!(inbound.next_index(), 6);
        assert_eq!(outbound.read(10), b"cdef");
        assert!(outbound.is_finished());
    }

    #[test]
    fn test_error_flag() {
        let (inbound, outbound) = channel(&StreamConfig::default());
        assert!(!outbound.has_error());
        inbound.set_error();
        assert!(outbound.has_error());
    }

    #[test]
    fn test_concurrent_inserts() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        let segments = segment_stream(&data, 64);
        let (inbound, outbound) = channel(&StreamConfig::new().with_capacity(8192));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let inbound = inbound.clone();
                let segments = segments.clone();
                std::thread::spawn(move || {
                    // Every worker delivers every fourth segment, back to front
                    for segment in segments.iter().rev().skip(worker).step_by(4) {
                        inbound.insert_segment(segment);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(inbound.is_closed());
        assert_eq!(outbound.read(usize::MAX), data);
        assert!(outbound.is_finished());
    }
}
