//! Application side of a channel.

use alloc::vec::Vec;

use crate::buffer::{Reader, Writer};

use super::{ChannelState, Shared};

/// Handle used by the application to drain delivered bytes.
#[derive(Debug)]
pub struct Outbound {
    shared: Shared,
}

impl Outbound {
    pub(super) fn new(shared: Shared) -> Self {
        Self { shared }
    }

    /// Takes up to `max` buffered bytes.
    ///
    /// Returns an empty vector when nothing is buffered.
    pub fn read(&self, max: usize) -> Vec<u8> {
        let mut guard = self.shared.lock();
        let mut out = Vec::new();
        guard.reader().read_into(max as u64, &mut out);
        out
    }

    /// Returns the number of bytes ready to read.
    pub fn bytes_buffered(&self) -> u64 {
        self.shared.lock().reader().bytes_buffered()
    }

    /// Returns the total number of bytes read so far.
    pub fn bytes_popped(&self) -> u64 {
        self.shared.lock().reader().bytes_popped()
    }

    /// Returns true once every byte of a closed stream has been read.
    pub fn is_finished(&self) -> bool {
        self.shared.lock().reader().is_finished()
    }

    /// Returns true if the receive path flagged an error.
    pub fn has_error(&self) -> bool {
        self.shared.lock().reader().has_error()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ChannelState {
        let mut guard = self.shared.lock();
        if guard.reader().is_finished() {
            ChannelState::Finished
        } else if guard.writer().is_closed() {
            ChannelState::Closed
        } else {
            ChannelState::Open
        }
    }
}
