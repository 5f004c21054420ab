//! ADP PDU format (IEEE 1722.1 clause 6.2.1).
//!
//! The ADPDU is a fixed 68 bytes: the 12-byte AVTP control header (with
//! `valid_time` in the status field and the entity id in the stream id
//! field) followed by 56 bytes of control data.

use crate::protocol::aem::{
    Capabilities, ControllerCapabilities, EntityCapabilities, ListenerCapabilities,
    TalkerCapabilities,
};
use crate::protocol::codec::{
    AVDECC_MULTICAST_MAC, AvtpControlHeader, AvtpSubtype, CodecError, EthernetHeader, MAX_STATUS,
    WireReader, WireWriter,
};
use crate::types::MacAddress;

/// ADP message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AdpMessageType {
    /// Periodic or solicited presence advertisement.
    EntityAvailable = 0,
    /// The entity is leaving the network.
    EntityDeparting = 1,
    /// Request for entities to advertise.
    EntityDiscover = 2,
}

impl AdpMessageType {
    /// Parse from the message type nibble.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownMessageType`] for undefined values.
    pub fn from_nibble(value: u8) -> Result<Self, CodecError> {
        match value & 0x0F {
            0 => Ok(Self::EntityAvailable),
            1 => Ok(Self::EntityDeparting),
            2 => Ok(Self::EntityDiscover),
            other => Err(CodecError::UnknownMessageType {
                protocol: "ADP",
                value: other,
            }),
        }
    }
}

impl std::fmt::Display for AdpMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityAvailable => write!(f, "ENTITY_AVAILABLE"),
            Self::EntityDeparting => write!(f, "ENTITY_DEPARTING"),
            Self::EntityDiscover => write!(f, "ENTITY_DISCOVER"),
        }
    }
}

/// Convert a validity period in seconds to the 5-bit `valid_time` field.
///
/// The field counts 2-second units, so 62 seconds is the maximum.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn valid_time_from_secs(seconds: u64) -> u8 {
    (seconds / 2).min(u64::from(MAX_STATUS)) as u8
}

/// A decoded or to-be-encoded ADPDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdpPdu {
    /// Message type.
    pub message_type: AdpMessageType,
    /// Validity in 2-second units.
    pub valid_time: u8,
    /// Advertised (or, for discover, requested) entity id.
    pub entity_id: u64,
    /// Entity model id.
    pub entity_model_id: u64,
    /// Capability bitfields.
    pub capabilities: Capabilities,
    /// Number of stream outputs.
    pub talker_stream_sources: u16,
    /// Number of stream inputs.
    pub listener_stream_sinks: u16,
    /// Available index.
    pub available_index: u32,
    /// gPTP grandmaster id.
    pub gptp_grandmaster_id: u64,
    /// gPTP domain number.
    pub gptp_domain_number: u8,
    /// CONTROL descriptor used for identify.
    pub identify_control_index: u16,
    /// AVB_INTERFACE the advertisement was sent on.
    pub interface_index: u16,
    /// Association id.
    pub association_id: u64,
}

impl AdpPdu {
    /// Fixed ADPDU size in bytes.
    pub const SIZE: usize = 68;

    /// `control_data_length` of every ADPDU.
    pub const CONTROL_DATA_LENGTH: u16 = 56;

    /// An ENTITY_DISCOVER for `entity_id` (0 = all entities).
    #[must_use]
    pub fn discover(entity_id: u64) -> Self {
        Self {
            message_type: AdpMessageType::EntityDiscover,
            valid_time: 0,
            entity_id,
            entity_model_id: 0,
            capabilities: Capabilities::default(),
            talker_stream_sources: 0,
            listener_stream_sinks: 0,
            available_index: 0,
            gptp_grandmaster_id: 0,
            gptp_domain_number: 0,
            identify_control_index: 0,
            interface_index: 0,
            association_id: 0,
        }
    }

    /// Encode the 68-byte PDU.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(Self::SIZE);
        self.write(&mut w);
        w.into_inner()
    }

    /// Encode a complete Ethernet frame to the AVDECC multicast address.
    #[must_use]
    pub fn encode_frame(&self, source: MacAddress) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(EthernetHeader::SIZE + Self::SIZE);
        EthernetHeader::avtp(AVDECC_MULTICAST_MAC, source).write(&mut w);
        self.write(&mut w);
        w.into_inner()
    }

    fn write(&self, w: &mut WireWriter) {
        AvtpControlHeader::new(
            AvtpSubtype::Adp,
            self.message_type as u8,
            self.valid_time,
            Self::CONTROL_DATA_LENGTH,
            self.entity_id,
        )
        .write(w);
        w.put_u64(self.entity_model_id);
        w.put_u32(self.capabilities.entity.raw());
        w.put_u16(self.talker_stream_sources);
        w.put_u16(self.capabilities.talker.raw());
        w.put_u16(self.listener_stream_sinks);
        w.put_u16(self.capabilities.listener.raw());
        w.put_u32(self.capabilities.controller.raw());
        w.put_u32(self.available_index);
        w.put_u64(self.gptp_grandmaster_id);
        w.put_u8(self.gptp_domain_number);
        w.put_zeros(3);
        w.put_u16(self.identify_control_index);
        w.put_u16(self.interface_index);
        w.put_u64(self.association_id);
        w.put_zeros(4);
    }

    /// Decode a PDU (starting at the subtype byte).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when shorter than 68 bytes,
    /// [`CodecError::UnexpectedSubtype`] for non-ADP input and
    /// [`CodecError::UnknownMessageType`] for undefined message types.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = WireReader::new("ADPDU", data);
        r.require(Self::SIZE)?;
        let header = AvtpControlHeader::read(&mut r, AvtpSubtype::Adp)?;
        let message_type = AdpMessageType::from_nibble(header.message_type)?;
        let entity_model_id = r.read_u64()?;
        let entity = EntityCapabilities::from_raw(r.read_u32()?);
        let talker_stream_sources = r.read_u16()?;
        let talker = TalkerCapabilities::from_raw(r.read_u16()?);
        let listener_stream_sinks = r.read_u16()?;
        let listener = ListenerCapabilities::from_raw(r.read_u16()?);
        let controller = ControllerCapabilities::from_raw(r.read_u32()?);
        let available_index = r.read_u32()?;
        let gptp_grandmaster_id = r.read_u64()?;
        let gptp_domain_number = r.read_u8()?;
        r.skip(3)?;
        let identify_control_index = r.read_u16()?;
        let interface_index = r.read_u16()?;
        let association_id = r.read_u64()?;
        Ok(Self {
            message_type,
            valid_time: header.status,
            entity_id: header.stream_id,
            entity_model_id,
            capabilities: Capabilities {
                entity,
                talker,
                listener,
                controller,
            },
            talker_stream_sources,
            listener_stream_sinks,
            available_index,
            gptp_grandmaster_id,
            gptp_domain_number,
            identify_control_index,
            interface_index,
            association_id,
        })
    }

    /// Decode a complete Ethernet frame.
    ///
    /// # Errors
    ///
    /// As [`EthernetHeader::decode_avtp`] and [`AdpPdu::decode`].
    pub fn decode_frame(frame: &[u8]) -> Result<(EthernetHeader, Self), CodecError> {
        let (ethernet, payload) = EthernetHeader::decode_avtp(frame)?;
        Ok((ethernet, Self::decode(payload)?))
    }
}
