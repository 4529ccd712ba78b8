//! # XStream - In-Order Delivery Buffer
//!
//! XStream is a `no_std` compatible receive buffer for reliable byte-stream
//! transports. It provides:
//!
//! - **Bounded byte stream**: One fixed capacity shared by a writer role and a reader role
//! - **Out-of-order reassembly**: Byte ranges arriving in any order are delivered once, in order
//! - **Overlap trimming**: Duplicate and overlapping ranges contribute only their new bytes
//! - **Hard memory ceiling**: Nothing outside the stream's free window is ever kept
//! - **Shared handles**: Lock-protected receive/application handles (requires `std`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Receive Path                         │
//! │            insert(offset, bytes, is_last)                │
//! ├─────────────────────────────────────────────────────────┤
//! │                      Reassembler                         │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────┐   │
//! │  │   Window    │ │  Overlap    │ │   Contiguous    │   │
//! │  │  Clipping   │ │   Merging   │ │     Drain       │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────┘   │
//! ├─────────────────────────────────────────────────────────┤
//! │                      ByteStream                          │
//! │  ┌──────────────────────┐   ┌──────────────────────┐    │
//! │  │ Writer: push/close   │   │ Reader: peek/pop     │    │
//! │  └──────────────────────┘   └──────────────────────┘    │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Application Layer                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use xstream::{ByteStream, Reader, Reassembler};
//!
//! let mut reassembler = Reassembler::new(ByteStream::new(64));
//!
//! reassembler.insert(6, b"World", true);
//! reassembler.insert(0, b"Hello ", false);
//!
//! assert_eq!(reassembler.reader().peek(), b"Hello World");
//! assert!(reassembler.is_closed());
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod buffer;
pub mod config;
pub mod core;
pub mod error;
pub mod reliable;

#[cfg(feature = "std")]
pub mod channel;
#[cfg(feature = "std")]
pub mod io;

// Re-export commonly used types
pub use buffer::{ByteStream, Reader, Writer};
pub use config::StreamConfig;
pub use self::core::{Segment, segment_stream};
pub use error::{Error, ErrorKind, Result};
pub use reliable::Reassembler;

#[cfg(feature = "std")]
pub use channel::{ChannelState, Inbound, Outbound, channel};

/// Default stream capacity in bytes
pub const DEFAULT_CAPACITY: u64 = 64 * 1024;

/// Default maximum segment payload size
pub const DEFAULT_MAX_SEGMENT_SIZE: usize = 1024;
