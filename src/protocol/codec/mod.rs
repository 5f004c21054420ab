//! Wire codec primitives shared by every AVDECC protocol.
//!
//! All multi-byte protocol fields are big-endian. Byte-order conversion
//! happens only in this module ([`WireReader`] and [`WireWriter`]); the
//! protocol message types build on top of it and never index raw buffers
//! with hand-rolled shifts of their own.
//!
//! ## Frame layout
//!
//! ```text
//! +-------------------+-----------------------------+------------------+
//! | Ethernet (14)     | AVTP control header (12)    | protocol payload |
//! | dst | src | 22F0  | st | sv/ver/mt | vt/cdl | id |                  |
//! +-------------------+-----------------------------+------------------+
//! ```

pub mod avtp;
pub mod ethernet;
pub mod reader;


pub use avtp::{
    AVTP_VERSION, AvtpControlHeader, AvtpSubtype, ControlWord, MAX_CONTROL_DATA_LENGTH,
    MAX_STATUS, classify_frame, pack_control_word, pack_status_length, unpack_control_word,
    unpack_status_length,
};
pub use ethernet::{AVDECC_MULTICAST_MAC, ETHERTYPE_AVTP, EthernetHeader};
pub use reader::{WireReader, WireWriter};

/// Errors produced while decoding wire bytes.
///
/// Every variant is recovered locally by dropping the frame; AVDECC shares
/// its multicast group with arbitrary traffic, so none of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Buffer is shorter than the fixed minimum for the structure.
    #[error("malformed {structure}: need {needed} bytes, have {have}")]
    MalformedFrame {
        /// Structure being decoded.
        structure: &'static str,
        /// Minimum bytes needed.
        needed: usize,
        /// Bytes actually available.
        have: usize,
    },

    /// Ethernet frame does not carry AVTP.
    #[error("unexpected EtherType: 0x{0:04X}")]
    UnexpectedEtherType(u16),

    /// AVTP subtype is not the one the decoder expects.
    #[error("unexpected AVTP subtype: 0x{0:02X}")]
    UnexpectedSubtype(u8),

    /// Message type nibble is not defined for the protocol.
    #[error("unknown {protocol} message type: {value}")]
    UnknownMessageType {
        /// Protocol being decoded.
        protocol: &'static str,
        /// Raw message type.
        value: u8,
    },

    /// Descriptor type has no decoder.
    #[error("unsupported descriptor type: 0x{0:04X}")]
    UnsupportedDescriptor(u16),

    /// Descriptor index is not allowed for its type.
    #[error("invalid index {index} for descriptor type 0x{descriptor_type:04X}")]
    InvalidDescriptorIndex {
        /// Descriptor type of the record.
        descriptor_type: u16,
        /// Index carried in the record.
        index: u16,
    },

    /// Descriptor record failed checksum verification.
    #[error("checksum mismatch: stored 0x{stored:08X}, computed 0x{computed:08X}")]
    ChecksumMismatch {
        /// Checksum carried in the record.
        stored: u32,
        /// Checksum computed over the record.
        computed: u32,
    },

    /// Fixed-width string field is not valid UTF-8.
    #[error("invalid UTF-8 in {field}")]
    InvalidString {
        /// Field being decoded.
        field: &'static str,
    },
}

impl CodecError {
    /// Shorthand for a [`CodecError::MalformedFrame`].
    #[must_use]
    pub fn too_short(structure: &'static str, needed: usize, have: usize) -> Self {
        Self::MalformedFrame {
            structure,
            needed,
            have,
        }
    }
}
