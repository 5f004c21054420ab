use std::io;
use thiserror::Error;

use crate::entity::StorageError;
use crate::net::TransportError;
use crate::protocol::aem::TreeError;
use crate::protocol::codec::CodecError;
use crate::types::ConfigError;

/// Errors that can occur while running an AVDECC entity
#[derive(Debug, Error)]
pub enum AvdeccError {
    // ===== Wire Errors =====
    /// Frame encoding/decoding failed
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    // ===== Transport Errors =====
    /// Sending or receiving a frame failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    // ===== Persistence Errors =====
    /// Loading or saving the available index failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    // ===== Setup Errors =====
    /// Configuration is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Descriptor tree is inconsistent
    #[error("descriptor tree error: {0}")]
    Tree(#[from] TreeError),

    // ===== I/O Errors =====
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Interface has no usable MAC address
    #[error("no MAC address for interface {interface}")]
    NoMacAddress {
        /// Interface name
        interface: String,
    },
}

impl AvdeccError {
    /// Check if the entity can keep running after this error
    ///
    /// Decode failures, transport hiccups and persistence failures degrade
    /// behaviour but never stop the entity; setup errors do.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Codec(_)
                | Self::Storage(_)
                | Self::Transport(TransportError::Io(_) | TransportError::SendFailed(_))
        )
    }
}

/// Result type alias for AVDECC operations
pub type Result<T> = std::result::Result<T, AvdeccError>;
