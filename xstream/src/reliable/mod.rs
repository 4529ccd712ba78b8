//! Reliable delivery mechanisms.
//!
//! This module provides:
//! - Reassembler: Out-of-order byte range reassembly into a bounded stream

mod reassembler;

pub use reassembler::Reassembler;
