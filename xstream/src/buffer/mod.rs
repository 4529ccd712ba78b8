//! Buffer management for the receive path.
//!
//! This module provides the bounded byte stream and its two roles:
//! - ByteStream: Fixed-capacity FIFO shared by one writer and one reader
//! - Writer: Push/close/error side, driven by the reassembler
//! - Reader: Peek/pop side, driven by the application

mod stream;

pub use stream::{ByteStream, Reader, Writer};
