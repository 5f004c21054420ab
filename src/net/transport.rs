//! Raw Ethernet frame transport seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::MacAddress;

/// Largest Ethernet frame (without FCS) the transports accept.
pub const MAX_FRAME_SIZE: usize = 1514;

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Socket or device I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame exceeds the link MTU.
    #[error("frame of {len} bytes exceeds the {max}-byte limit")]
    FrameTooLarge {
        /// Frame length.
        len: usize,
        /// Accepted maximum.
        max: usize,
    },

    /// Interface lookup or setup failed.
    #[error("interface {interface}: {message}")]
    Interface {
        /// Interface name.
        interface: String,
        /// What went wrong.
        message: String,
    },

    /// The transport has been shut down.
    #[error("transport closed")]
    Closed,

    /// Injected failure (used by test doubles).
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Sends and receives raw Ethernet frames on one interface.
///
/// Implementations deliver frames addressed to the AVDECC multicast group or
/// to [`local_mac`](Self::local_mac) carrying EtherType `0x22F0`; other
/// traffic may be delivered too and is filtered by the protocol layer.
#[async_trait]
pub trait TransportPort: Send {
    /// Transmit one complete Ethernet frame.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the frame could not be queued.
    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Wait up to `timeout` for the next frame; `Ok(None)` on timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the underlying device failed.
    async fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;

    /// MAC address of the bound interface.
    fn local_mac(&self) -> MacAddress;
}

pub(crate) fn check_frame_len(frame: &[u8]) -> Result<(), TransportError> {
    if frame.len() > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge {
            len: frame.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(())
}
