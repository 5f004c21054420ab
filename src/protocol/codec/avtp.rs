//! IEEE 1722 AVTP control header.
//!
//! ```text
//!  byte 0      byte 1            byte 2           byte 3
//! +-+-------+-+-----+-------+---------+-----------------------+
//! |c|subtype|s| ver | msg   | status  | control_data_length   |
//! |d|  (7)  |v| (3) | type  |   (5)   |         (11)          |
//! +-+-------+-+-----+-------+---------+-----------------------+
//! |            stream_id / entity_id (64)                     |
//! +-----------------------------------------------------------+
//! ```
//!
//! For ADP the 5-bit status field carries `valid_time` in 2-second units.

use super::{CodecError, EthernetHeader, WireReader, WireWriter};

/// AVTP version carried by every AVDECC control frame.
pub const AVTP_VERSION: u8 = 0;

/// Control-data (`cd`) flag in the subtype byte.
pub const CONTROL_DATA_BIT: u8 = 0x80;

/// Largest value of the 5-bit status field.
pub const MAX_STATUS: u8 = 0x1F;

/// Largest value of the 11-bit `control_data_length` field.
pub const MAX_CONTROL_DATA_LENGTH: u16 = 0x07FF;

/// AVTP control subtypes used by AVDECC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AvtpSubtype {
    /// AVDECC Discovery Protocol.
    Adp = 0x7A,
    /// AVDECC Enumeration and Control Protocol.
    Aecp = 0x7B,
    /// AVDECC Connection Management Protocol.
    Acmp = 0x7C,
    /// MAC Address Acquisition Protocol.
    Maap = 0x7E,
}

impl AvtpSubtype {
    /// Parse the on-wire subtype byte (with the `cd` bit set).
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte & CONTROL_DATA_BIT == 0 {
            return None;
        }
        match byte & !CONTROL_DATA_BIT {
            0x7A => Some(Self::Adp),
            0x7B => Some(Self::Aecp),
            0x7C => Some(Self::Acmp),
            0x7E => Some(Self::Maap),
            _ => None,
        }
    }

    /// On-wire subtype byte (with the `cd` bit set).
    #[must_use]
    pub fn to_byte(self) -> u8 {
        CONTROL_DATA_BIT | self as u8
    }
}

impl std::fmt::Display for AvtpSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adp => write!(f, "ADP"),
            Self::Aecp => write!(f, "AECP"),
            Self::Acmp => write!(f, "ACMP"),
            Self::Maap => write!(f, "MAAP"),
        }
    }
}

/// Pack the 5-bit status and 11-bit control-data length into 16 bits.
///
/// Out-of-range inputs are masked to their field width.
#[must_use]
pub fn pack_status_length(status: u8, control_data_length: u16) -> u16 {
    (u16::from(status & MAX_STATUS) << 11) | (control_data_length & MAX_CONTROL_DATA_LENGTH)
}

/// Inverse of [`pack_status_length`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn unpack_status_length(word: u16) -> (u8, u16) {
    ((word >> 11) as u8, word & MAX_CONTROL_DATA_LENGTH)
}

/// Pack the 24 bits that follow the subtype byte.
///
/// Layout (MSB first): `sv:1 | version:3 | message_type:4 | status:5 | control_data_length:11`.
#[must_use]
pub fn pack_control_word(
    stream_valid: bool,
    version: u8,
    message_type: u8,
    status: u8,
    control_data_length: u16,
) -> [u8; 3] {
    let first = (u8::from(stream_valid) << 7) | ((version & 0x07) << 4) | (message_type & 0x0F);
    let [high, low] = pack_status_length(status, control_data_length).to_be_bytes();
    [first, high, low]
}

/// Unpacked form of the 24-bit control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWord {
    /// `sv` flag.
    pub stream_valid: bool,
    /// AVTP version.
    pub version: u8,
    /// Protocol-specific message type.
    pub message_type: u8,
    /// Status (or ADP `valid_time`).
    pub status: u8,
    /// Octets following the stream/entity id.
    pub control_data_length: u16,
}

/// Inverse of [`pack_control_word`].
#[must_use]
pub fn unpack_control_word(bytes: [u8; 3]) -> ControlWord {
    let (status, control_data_length) = unpack_status_length(u16::from_be_bytes([bytes[1], bytes[2]]));
    ControlWord {
        stream_valid: bytes[0] & 0x80 != 0,
        version: (bytes[0] >> 4) & 0x07,
        message_type: bytes[0] & 0x0F,
        status,
        control_data_length,
    }
}

/// The 12-byte common control header shared by ADP, AECP and ACMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvtpControlHeader {
    /// Protocol subtype.
    pub subtype: AvtpSubtype,
    /// `sv` flag.
    pub stream_valid: bool,
    /// AVTP version.
    pub version: u8,
    /// Protocol-specific message type (4 bits).
    pub message_type: u8,
    /// Status (5 bits); `valid_time` for ADP.
    pub status: u8,
    /// Octets following the 64-bit id field.
    pub control_data_length: u16,
    /// Entity id (ADP), target entity id (AECP) or stream id (ACMP).
    pub stream_id: u64,
}

impl AvtpControlHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 12;

    /// Header with AVTP version 0 and `sv` clear.
    #[must_use]
    pub fn new(
        subtype: AvtpSubtype,
        message_type: u8,
        status: u8,
        control_data_length: u16,
        stream_id: u64,
    ) -> Self {
        Self {
            subtype,
            stream_valid: false,
            version: AVTP_VERSION,
            message_type,
            status,
            control_data_length,
            stream_id,
        }
    }

    /// Append the header to a writer.
    pub fn write(&self, w: &mut WireWriter) {
        w.put_u8(self.subtype.to_byte());
        w.put_slice(&pack_control_word(
            self.stream_valid,
            self.version,
            self.message_type,
            self.status,
            self.control_data_length,
        ));
        w.put_u64(self.stream_id);
    }

    /// Read the header, requiring `expected` as the subtype.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] for short input and
    /// [`CodecError::UnexpectedSubtype`] when the subtype differs.
    pub fn read(r: &mut WireReader<'_>, expected: AvtpSubtype) -> Result<Self, CodecError> {
        let subtype_byte = r.read_u8()?;
        if AvtpSubtype::from_byte(subtype_byte) != Some(expected) {
            return Err(CodecError::UnexpectedSubtype(subtype_byte));
        }
        let word = unpack_control_word(r.read_array()?);
        let stream_id = r.read_u64()?;
        Ok(Self {
            subtype: expected,
            stream_valid: word.stream_valid,
            version: word.version,
            message_type: word.message_type,
            status: word.status,
            control_data_length: word.control_data_length,
            stream_id,
        })
    }
}

/// Classify a raw frame by EtherType and AVTP subtype.
///
/// Returns the Ethernet header and the subtype byte, or `None` for the
/// subtype when the frame is AVTP but not an AVDECC control subtype.
///
/// # Errors
///
/// Returns [`CodecError::MalformedFrame`] for frames too short to carry a
/// subtype and [`CodecError::UnexpectedEtherType`] for non-AVTP frames.
pub fn classify_frame(frame: &[u8]) -> Result<(EthernetHeader, Option<AvtpSubtype>), CodecError> {
    let (ethernet, payload) = EthernetHeader::decode_avtp(frame)?;
    let subtype_byte = *payload.first().ok_or_else(|| {
        CodecError::too_short("AVTP subtype", EthernetHeader::SIZE + 1, frame.len())
    })?;
    Ok((ethernet, AvtpSubtype::from_byte(subtype_byte)))
}
