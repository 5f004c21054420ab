//! AECP PDU format (IEEE 1722.1 clause 9.2) and the AEM command tables.
//!
//! ```text
//! | AVTP control header (12)              | controller_entity_id (8) |
//! | sequence_id (2) | u | command_type(15) | command specific data    |
//! ```
//!
//! `control_data_length` counts everything after `target_entity_id`, so it
//! bounds the command payload even when the frame carries Ethernet padding.

use crate::protocol::aem::DescriptorType;
use crate::protocol::codec::{
    AvtpControlHeader, AvtpSubtype, CodecError, EthernetHeader, MAX_CONTROL_DATA_LENGTH,
    WireReader, WireWriter,
};
use crate::types::MacAddress;

/// AECP message types (IEEE 1722.1 Table 9.1).
///
/// Odd values are responses; a response type is its command type plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AecpMessageType {
    /// AEM command.
    AemCommand = 0,
    /// AEM response.
    AemResponse = 1,
    /// Address access command.
    AddressAccessCommand = 2,
    /// Address access response.
    AddressAccessResponse = 3,
    /// Legacy AV/C command.
    AvcCommand = 4,
    /// Legacy AV/C response.
    AvcResponse = 5,
    /// Vendor unique command.
    VendorUniqueCommand = 6,
    /// Vendor unique response.
    VendorUniqueResponse = 7,
    /// HDCP AEM command.
    HdcpAemCommand = 8,
    /// HDCP AEM response.
    HdcpAemResponse = 9,
    /// Extended command.
    ExtendedCommand = 14,
    /// Extended response.
    ExtendedResponse = 15,
}

impl AecpMessageType {
    /// Parse from the message type nibble.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownMessageType`] for reserved values.
    pub fn from_nibble(value: u8) -> Result<Self, CodecError> {
        match value & 0x0F {
            0 => Ok(Self::AemCommand),
            1 => Ok(Self::AemResponse),
            2 => Ok(Self::AddressAccessCommand),
            3 => Ok(Self::AddressAccessResponse),
            4 => Ok(Self::AvcCommand),
            5 => Ok(Self::AvcResponse),
            6 => Ok(Self::VendorUniqueCommand),
            7 => Ok(Self::VendorUniqueResponse),
            8 => Ok(Self::HdcpAemCommand),
            9 => Ok(Self::HdcpAemResponse),
            14 => Ok(Self::ExtendedCommand),
            15 => Ok(Self::ExtendedResponse),
            other => Err(CodecError::UnknownMessageType {
                protocol: "AECP",
                value: other,
            }),
        }
    }

    /// Whether the response bit is set.
    #[must_use]
    pub fn is_response(self) -> bool {
        self as u8 & 0x01 != 0
    }

    /// The response type matching this command type.
    #[must_use]
    pub fn response(self) -> Self {
        match self {
            Self::AemCommand | Self::AemResponse => Self::AemResponse,
            Self::AddressAccessCommand | Self::AddressAccessResponse => Self::AddressAccessResponse,
            Self::AvcCommand | Self::AvcResponse => Self::AvcResponse,
            Self::VendorUniqueCommand | Self::VendorUniqueResponse => Self::VendorUniqueResponse,
            Self::HdcpAemCommand | Self::HdcpAemResponse => Self::HdcpAemResponse,
            Self::ExtendedCommand | Self::ExtendedResponse => Self::ExtendedResponse,
        }
    }
}

/// AECP status codes (IEEE 1722.1 Table 7.126).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AecpStatus(pub u8);

impl AecpStatus {
    /// The command completed.
    pub const SUCCESS: Self = Self(0);
    /// The command is not implemented.
    pub const NOT_IMPLEMENTED: Self = Self(1);
    /// The addressed descriptor does not exist.
    pub const NO_SUCH_DESCRIPTOR: Self = Self(2);
    /// The entity is locked by another controller.
    pub const ENTITY_LOCKED: Self = Self(3);
    /// The entity is acquired by another controller.
    pub const ENTITY_ACQUIRED: Self = Self(4);
    /// The controller is not authenticated.
    pub const NOT_AUTHENTICATED: Self = Self(5);
    /// Authentication is disabled.
    pub const AUTHENTICATION_DISABLED: Self = Self(6);
    /// One or more arguments are invalid.
    pub const BAD_ARGUMENTS: Self = Self(7);
    /// Resources are exhausted.
    pub const NO_RESOURCES: Self = Self(8);
    /// The command is still being processed.
    pub const IN_PROGRESS: Self = Self(9);
    /// The entity encountered an internal error.
    pub const ENTITY_MISBEHAVING: Self = Self(10);
    /// The command is implemented but not for this object.
    pub const NOT_SUPPORTED: Self = Self(11);
    /// The stream is running.
    pub const STREAM_IS_RUNNING: Self = Self(12);

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "SUCCESS",
            1 => "NOT_IMPLEMENTED",
            2 => "NO_SUCH_DESCRIPTOR",
            3 => "ENTITY_LOCKED",
            4 => "ENTITY_ACQUIRED",
            5 => "NOT_AUTHENTICATED",
            6 => "AUTHENTICATION_DISABLED",
            7 => "BAD_ARGUMENTS",
            8 => "NO_RESOURCES",
            9 => "IN_PROGRESS",
            10 => "ENTITY_MISBEHAVING",
            11 => "NOT_SUPPORTED",
            12 => "STREAM_IS_RUNNING",
            _ => "RESERVED",
        }
    }
}

impl std::fmt::Display for AecpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// AEM command types (IEEE 1722.1 Table 7.125).
///
/// This is the single table of command codes in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AemCommandType(pub u16);

impl AemCommandType {
    /// ACQUIRE_ENTITY.
    pub const ACQUIRE_ENTITY: Self = Self(0x0000);
    /// LOCK_ENTITY.
    pub const LOCK_ENTITY: Self = Self(0x0001);
    /// ENTITY_AVAILABLE.
    pub const ENTITY_AVAILABLE: Self = Self(0x0002);
    /// CONTROLLER_AVAILABLE.
    pub const CONTROLLER_AVAILABLE: Self = Self(0x0003);
    /// READ_DESCRIPTOR.
    pub const READ_DESCRIPTOR: Self = Self(0x0004);
    /// WRITE_DESCRIPTOR.
    pub const WRITE_DESCRIPTOR: Self = Self(0x0005);
    /// SET_CONFIGURATION.
    pub const SET_CONFIGURATION: Self = Self(0x0006);
    /// GET_CONFIGURATION.
    pub const GET_CONFIGURATION: Self = Self(0x0007);
    /// SET_STREAM_FORMAT.
    pub const SET_STREAM_FORMAT: Self = Self(0x0008);
    /// GET_STREAM_FORMAT.
    pub const GET_STREAM_FORMAT: Self = Self(0x0009);
    /// SET_VIDEO_FORMAT.
    pub const SET_VIDEO_FORMAT: Self = Self(0x000A);
    /// GET_VIDEO_FORMAT.
    pub const GET_VIDEO_FORMAT: Self = Self(0x000B);
    /// SET_SENSOR_FORMAT.
    pub const SET_SENSOR_FORMAT: Self = Self(0x000C);
    /// GET_SENSOR_FORMAT.
    pub const GET_SENSOR_FORMAT: Self = Self(0x000D);
    /// SET_STREAM_INFO.
    pub const SET_STREAM_INFO: Self = Self(0x000E);
    /// GET_STREAM_INFO.
    pub const GET_STREAM_INFO: Self = Self(0x000F);
    /// SET_NAME.
    pub const SET_NAME: Self = Self(0x0010);
    /// GET_NAME.
    pub const GET_NAME: Self = Self(0x0011);
    /// SET_ASSOCIATION_ID.
    pub const SET_ASSOCIATION_ID: Self = Self(0x0012);
    /// GET_ASSOCIATION_ID.
    pub const GET_ASSOCIATION_ID: Self = Self(0x0013);
    /// SET_SAMPLING_RATE.
    pub const SET_SAMPLING_RATE: Self = Self(0x0014);
    /// GET_SAMPLING_RATE.
    pub const GET_SAMPLING_RATE: Self = Self(0x0015);
    /// SET_CLOCK_SOURCE.
    pub const SET_CLOCK_SOURCE: Self = Self(0x0016);
    /// GET_CLOCK_SOURCE.
    pub const GET_CLOCK_SOURCE: Self = Self(0x0017);
    /// SET_CONTROL.
    pub const SET_CONTROL: Self = Self(0x0018);
    /// GET_CONTROL.
    pub const GET_CONTROL: Self = Self(0x0019);
    /// INCREMENT_CONTROL.
    pub const INCREMENT_CONTROL: Self = Self(0x001A);
    /// DECREMENT_CONTROL.
    pub const DECREMENT_CONTROL: Self = Self(0x001B);
    /// SET_SIGNAL_SELECTOR.
    pub const SET_SIGNAL_SELECTOR: Self = Self(0x001C);
    /// GET_SIGNAL_SELECTOR.
    pub const GET_SIGNAL_SELECTOR: Self = Self(0x001D);
    /// SET_MIXER.
    pub const SET_MIXER: Self = Self(0x001E);
    /// GET_MIXER.
    pub const GET_MIXER: Self = Self(0x001F);
    /// SET_MATRIX.
    pub const SET_MATRIX: Self = Self(0x0020);
    /// GET_MATRIX.
    pub const GET_MATRIX: Self = Self(0x0021);
    /// START_STREAMING.
    pub const START_STREAMING: Self = Self(0x0022);
    /// STOP_STREAMING.
    pub const STOP_STREAMING: Self = Self(0x0023);
    /// REGISTER_UNSOLICITED_NOTIFICATION.
    pub const REGISTER_UNSOLICITED_NOTIFICATION: Self = Self(0x0024);
    /// DEREGISTER_UNSOLICITED_NOTIFICATION.
    pub const DEREGISTER_UNSOLICITED_NOTIFICATION: Self = Self(0x0025);
    /// IDENTIFY_NOTIFICATION.
    pub const IDENTIFY_NOTIFICATION: Self = Self(0x0026);
    /// GET_AVB_INFO.
    pub const GET_AVB_INFO: Self = Self(0x0027);
    /// GET_AS_PATH.
    pub const GET_AS_PATH: Self = Self(0x0028);
    /// GET_COUNTERS.
    pub const GET_COUNTERS: Self = Self(0x0029);
    /// REBOOT.
    pub const REBOOT: Self = Self(0x002A);
    /// GET_AUDIO_MAP.
    pub const GET_AUDIO_MAP: Self = Self(0x002B);
    /// ADD_AUDIO_MAPPINGS.
    pub const ADD_AUDIO_MAPPINGS: Self = Self(0x002C);
    /// REMOVE_AUDIO_MAPPINGS.
    pub const REMOVE_AUDIO_MAPPINGS: Self = Self(0x002D);
    /// GET_VIDEO_MAP.
    pub const GET_VIDEO_MAP: Self = Self(0x002E);
    /// ADD_VIDEO_MAPPINGS.
    pub const ADD_VIDEO_MAPPINGS: Self = Self(0x002F);
    /// REMOVE_VIDEO_MAPPINGS.
    pub const REMOVE_VIDEO_MAPPINGS: Self = Self(0x0030);
    /// GET_SENSOR_MAP.
    pub const GET_SENSOR_MAP: Self = Self(0x0031);
    /// ADD_SENSOR_MAPPINGS.
    pub const ADD_SENSOR_MAPPINGS: Self = Self(0x0032);
    /// REMOVE_SENSOR_MAPPINGS.
    pub const REMOVE_SENSOR_MAPPINGS: Self = Self(0x0033);
    /// START_OPERATION.
    pub const START_OPERATION: Self = Self(0x0034);
    /// ABORT_OPERATION.
    pub const ABORT_OPERATION: Self = Self(0x0035);
    /// OPERATION_STATUS.
    pub const OPERATION_STATUS: Self = Self(0x0036);
    /// AUTH_ADD_KEY.
    pub const AUTH_ADD_KEY: Self = Self(0x0037);
    /// AUTH_DELETE_KEY.
    pub const AUTH_DELETE_KEY: Self = Self(0x0038);
    /// AUTH_GET_KEY_LIST.
    pub const AUTH_GET_KEY_LIST: Self = Self(0x0039);
    /// AUTH_GET_KEY.
    pub const AUTH_GET_KEY: Self = Self(0x003A);
    /// AUTH_ADD_KEY_TO_CHAIN.
    pub const AUTH_ADD_KEY_TO_CHAIN: Self = Self(0x003B);
    /// AUTH_DELETE_KEY_FROM_CHAIN.
    pub const AUTH_DELETE_KEY_FROM_CHAIN: Self = Self(0x003C);
    /// AUTH_GET_KEYCHAIN_LIST.
    pub const AUTH_GET_KEYCHAIN_LIST: Self = Self(0x003D);
    /// AUTH_GET_IDENTITY.
    pub const AUTH_GET_IDENTITY: Self = Self(0x003E);
    /// AUTH_ADD_TOKEN.
    pub const AUTH_ADD_TOKEN: Self = Self(0x003F);
    /// AUTH_DELETE_TOKEN.
    pub const AUTH_DELETE_TOKEN: Self = Self(0x0040);
    /// AUTHENTICATE.
    pub const AUTHENTICATE: Self = Self(0x0041);
    /// DEAUTHENTICATE.
    pub const DEAUTHENTICATE: Self = Self(0x0042);
    /// ENABLE_TRANSPORT_SECURITY.
    pub const ENABLE_TRANSPORT_SECURITY: Self = Self(0x0043);
    /// DISABLE_TRANSPORT_SECURITY.
    pub const DISABLE_TRANSPORT_SECURITY: Self = Self(0x0044);
    /// ENABLE_STREAM_ENCRYPTION.
    pub const ENABLE_STREAM_ENCRYPTION: Self = Self(0x0045);
    /// DISABLE_STREAM_ENCRYPTION.
    pub const DISABLE_STREAM_ENCRYPTION: Self = Self(0x0046);
    /// SET_MEMORY_OBJECT_LENGTH.
    pub const SET_MEMORY_OBJECT_LENGTH: Self = Self(0x0047);
    /// GET_MEMORY_OBJECT_LENGTH.
    pub const GET_MEMORY_OBJECT_LENGTH: Self = Self(0x0048);
    /// SET_STREAM_BACKUP.
    pub const SET_STREAM_BACKUP: Self = Self(0x0049);
    /// GET_STREAM_BACKUP.
    pub const GET_STREAM_BACKUP: Self = Self(0x004A);
    /// EXPANSION.
    pub const EXPANSION: Self = Self(0x7FFF);

    const NAMES: [&'static str; 0x4B] = [
        "ACQUIRE_ENTITY",
        "LOCK_ENTITY",
        "ENTITY_AVAILABLE",
        "CONTROLLER_AVAILABLE",
        "READ_DESCRIPTOR",
        "WRITE_DESCRIPTOR",
        "SET_CONFIGURATION",
        "GET_CONFIGURATION",
        "SET_STREAM_FORMAT",
        "GET_STREAM_FORMAT",
        "SET_VIDEO_FORMAT",
        "GET_VIDEO_FORMAT",
        "SET_SENSOR_FORMAT",
        "GET_SENSOR_FORMAT",
        "SET_STREAM_INFO",
        "GET_STREAM_INFO",
        "SET_NAME",
        "GET_NAME",
        "SET_ASSOCIATION_ID",
        "GET_ASSOCIATION_ID",
        "SET_SAMPLING_RATE",
        "GET_SAMPLING_RATE",
        "SET_CLOCK_SOURCE",
        "GET_CLOCK_SOURCE",
        "SET_CONTROL",
        "GET_CONTROL",
        "INCREMENT_CONTROL",
        "DECREMENT_CONTROL",
        "SET_SIGNAL_SELECTOR",
        "GET_SIGNAL_SELECTOR",
        "SET_MIXER",
        "GET_MIXER",
        "SET_MATRIX",
        "GET_MATRIX",
        "START_STREAMING",
        "STOP_STREAMING",
        "REGISTER_UNSOLICITED_NOTIFICATION",
        "DEREGISTER_UNSOLICITED_NOTIFICATION",
        "IDENTIFY_NOTIFICATION",
        "GET_AVB_INFO",
        "GET_AS_PATH",
        "GET_COUNTERS",
        "REBOOT",
        "GET_AUDIO_MAP",
        "ADD_AUDIO_MAPPINGS",
        "REMOVE_AUDIO_MAPPINGS",
        "GET_VIDEO_MAP",
        "ADD_VIDEO_MAPPINGS",
        "REMOVE_VIDEO_MAPPINGS",
        "GET_SENSOR_MAP",
        "ADD_SENSOR_MAPPINGS",
        "REMOVE_SENSOR_MAPPINGS",
        "START_OPERATION",
        "ABORT_OPERATION",
        "OPERATION_STATUS",
        "AUTH_ADD_KEY",
        "AUTH_DELETE_KEY",
        "AUTH_GET_KEY_LIST",
        "AUTH_GET_KEY",
        "AUTH_ADD_KEY_TO_CHAIN",
        "AUTH_DELETE_KEY_FROM_CHAIN",
        "AUTH_GET_KEYCHAIN_LIST",
        "AUTH_GET_IDENTITY",
        "AUTH_ADD_TOKEN",
        "AUTH_DELETE_TOKEN",
        "AUTHENTICATE",
        "DEAUTHENTICATE",
        "ENABLE_TRANSPORT_SECURITY",
        "DISABLE_TRANSPORT_SECURITY",
        "ENABLE_STREAM_ENCRYPTION",
        "DISABLE_STREAM_ENCRYPTION",
        "SET_MEMORY_OBJECT_LENGTH",
        "GET_MEMORY_OBJECT_LENGTH",
        "SET_STREAM_BACKUP",
        "GET_STREAM_BACKUP",
    ];

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::EXPANSION => "EXPANSION",
            Self(code) => Self::NAMES
                .get(usize::from(code))
                .copied()
                .unwrap_or("RESERVED"),
        }
    }
}

impl std::fmt::Display for AemCommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(0x{:04X})", self.name(), self.0)
    }
}

/// Common AECP header: AVTP control header plus controller id and sequence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AecpHeader {
    /// Message type.
    pub message_type: AecpMessageType,
    /// Status.
    pub status: AecpStatus,
    /// Octets following `target_entity_id`.
    pub control_data_length: u16,
    /// Entity the message is addressed to (or that responds).
    pub target_entity_id: u64,
    /// Controller that issued the command.
    pub controller_entity_id: u64,
    /// Controller-chosen sequence id, echoed in the response.
    pub sequence_id: u16,
}

impl AecpHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 22;

    /// Bytes of the header counted by `control_data_length`.
    pub const COUNTED_HEADER: u16 = 10;

    /// Decode the header (starting at the subtype byte).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when shorter than 22 bytes,
    /// [`CodecError::UnexpectedSubtype`] for non-AECP input and
    /// [`CodecError::UnknownMessageType`] for reserved message types.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = WireReader::new("AECP header", data);
        Self::read(&mut r)
    }

    fn read(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        r.require(Self::SIZE)?;
        let avtp = AvtpControlHeader::read(r, AvtpSubtype::Aecp)?;
        Ok(Self {
            message_type: AecpMessageType::from_nibble(avtp.message_type)?,
            status: AecpStatus(avtp.status),
            control_data_length: avtp.control_data_length,
            target_entity_id: avtp.stream_id,
            controller_entity_id: r.read_u64()?,
            sequence_id: r.read_u16()?,
        })
    }

    fn write(&self, w: &mut WireWriter) {
        AvtpControlHeader::new(
            AvtpSubtype::Aecp,
            self.message_type as u8,
            self.status.0,
            self.control_data_length,
            self.target_entity_id,
        )
        .write(w);
        w.put_u64(self.controller_entity_id);
        w.put_u16(self.sequence_id);
    }
}

/// Unsolicited-response flag in the `command_type` field.
pub const UNSOLICITED_BIT: u16 = 0x8000;

/// An AECP PDU: header plus the message-type-specific data.
///
/// For AEM message types the first two bytes of `payload` are not part of
/// it: they are decoded into `unsolicited` and `command_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AecpPdu {
    /// Common header.
    pub header: AecpHeader,
    /// AEM `u` flag.
    pub unsolicited: bool,
    /// AEM command type (`None` for non-AEM message types).
    pub command_type: Option<AemCommandType>,
    /// Command specific data.
    pub payload: Vec<u8>,
}

impl AecpPdu {
    /// Smallest AEM PDU (header plus command type).
    pub const AEM_MIN_SIZE: usize = AecpHeader::SIZE + 2;

    /// Build an AEM command.
    #[must_use]
    pub fn aem_command(
        target_entity_id: u64,
        controller_entity_id: u64,
        sequence_id: u16,
        command_type: AemCommandType,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            header: AecpHeader {
                message_type: AecpMessageType::AemCommand,
                status: AecpStatus::SUCCESS,
                control_data_length: 0,
                target_entity_id,
                controller_entity_id,
                sequence_id,
            },
            unsolicited: false,
            command_type: Some(command_type),
            payload,
        }
    }

    /// Build the response to `command`.
    ///
    /// Entity ids keep their roles, the sequence id is copied verbatim and
    /// the message type gets its response bit.
    #[must_use]
    pub fn response_to(command: &Self, status: AecpStatus, payload: Vec<u8>) -> Self {
        Self {
            header: AecpHeader {
                message_type: command.header.message_type.response(),
                status,
                control_data_length: 0,
                target_entity_id: command.header.target_entity_id,
                controller_entity_id: command.header.controller_entity_id,
                sequence_id: command.header.sequence_id,
            },
            unsolicited: false,
            command_type: command.command_type,
            payload,
        }
    }

    /// Whether the message type is an AEM command or response.
    #[must_use]
    pub fn is_aem(&self) -> bool {
        matches!(
            self.header.message_type,
            AecpMessageType::AemCommand | AecpMessageType::AemResponse
        )
    }

    fn counted_len(&self) -> u16 {
        let command_field = if self.command_type.is_some() { 2 } else { 0 };
        let len = usize::from(AecpHeader::COUNTED_HEADER) + command_field + self.payload.len();
        u16::try_from(len).unwrap_or(MAX_CONTROL_DATA_LENGTH)
    }

    /// Encode the PDU (starting at the subtype byte).
    ///
    /// `control_data_length` is derived from the payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(Self::AEM_MIN_SIZE + self.payload.len());
        self.write(&mut w);
        w.into_inner()
    }

    /// Encode a complete Ethernet frame.
    #[must_use]
    pub fn encode_frame(&self, destination: MacAddress, source: MacAddress) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(
            EthernetHeader::SIZE + Self::AEM_MIN_SIZE + self.payload.len(),
        );
        EthernetHeader::avtp(destination, source).write(&mut w);
        self.write(&mut w);
        w.into_inner()
    }

    fn write(&self, w: &mut WireWriter) {
        let header = AecpHeader {
            control_data_length: self.counted_len(),
            ..self.header
        };
        header.write(w);
        if let Some(command_type) = self.command_type {
            let unsolicited = if self.unsolicited { UNSOLICITED_BIT } else { 0 };
            w.put_u16(unsolicited | (command_type.0 & !UNSOLICITED_BIT));
        }
        w.put_slice(&self.payload);
    }

    /// Decode a PDU (starting at the subtype byte).
    ///
    /// The payload is bounded by `control_data_length`; trailing padding is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is shorter than
    /// the header or than `control_data_length` claims, plus the errors of
    /// [`AecpHeader::decode`].
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = WireReader::new("AECPDU", data);
        let header = AecpHeader::read(&mut r)?;
        let counted = usize::from(header.control_data_length);
        let total = AvtpControlHeader::SIZE + counted;
        if counted < usize::from(AecpHeader::COUNTED_HEADER) {
            return Err(CodecError::too_short(
                "AECPDU control data",
                usize::from(AecpHeader::COUNTED_HEADER),
                counted,
            ));
        }
        r.require(total)?;

        let is_aem = matches!(
            header.message_type,
            AecpMessageType::AemCommand | AecpMessageType::AemResponse
        );
        let (unsolicited, command_type) = if is_aem {
            if total < Self::AEM_MIN_SIZE {
                return Err(CodecError::too_short("AEM command type", Self::AEM_MIN_SIZE, total));
            }
            let raw = r.read_u16()?;
            (
                raw & UNSOLICITED_BIT != 0,
                Some(AemCommandType(raw & !UNSOLICITED_BIT)),
            )
        } else {
            (false, None)
        };

        let payload = data[r.position()..total].to_vec();
        Ok(Self {
            header,
            unsolicited,
            command_type,
            payload,
        })
    }

    /// Decode a complete Ethernet frame.
    ///
    /// # Errors
    ///
    /// As [`EthernetHeader::decode_avtp`] and [`AecpPdu::decode`].
    pub fn decode_frame(frame: &[u8]) -> Result<(EthernetHeader, Self), CodecError> {
        let (ethernet, payload) = EthernetHeader::decode_avtp(frame)?;
        Ok((ethernet, Self::decode(payload)?))
    }
}

/// READ_DESCRIPTOR command data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadDescriptorCommand {
    /// Configuration the descriptor belongs to.
    pub configuration_index: u16,
    /// Requested descriptor type.
    pub descriptor_type: DescriptorType,
    /// Requested descriptor index.
    pub descriptor_index: u16,
}

impl ReadDescriptorCommand {
    /// Command data size.
    pub const SIZE: usize = 8;

    /// Encode the 8-byte command data.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(Self::SIZE);
        w.put_u16(self.configuration_index);
        w.put_u16(0);
        w.put_u16(self.descriptor_type.0);
        w.put_u16(self.descriptor_index);
        w.into_inner()
    }

    /// Decode the command data of a READ_DESCRIPTOR command.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when shorter than 8 bytes.
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let mut r = WireReader::new("READ_DESCRIPTOR command", payload);
        r.require(Self::SIZE)?;
        let configuration_index = r.read_u16()?;
        r.skip(2)?;
        Ok(Self {
            configuration_index,
            descriptor_type: DescriptorType(r.read_u16()?),
            descriptor_index: r.read_u16()?,
        })
    }
}

/// Build the data of a successful READ_DESCRIPTOR response.
#[must_use]
pub fn read_descriptor_response_payload(configuration_index: u16, record: &[u8]) -> Vec<u8> {
    let mut w = WireWriter::with_capacity(4 + record.len());
    w.put_u16(configuration_index);
    w.put_u16(0);
    w.put_slice(record);
    w.into_inner()
}

/// Split the data of a READ_DESCRIPTOR response into configuration index and record.
///
/// # Errors
///
/// Returns [`CodecError::MalformedFrame`] when shorter than 4 bytes.
pub fn split_read_descriptor_response(payload: &[u8]) -> Result<(u16, &[u8]), CodecError> {
    let mut r = WireReader::new("READ_DESCRIPTOR response", payload);
    let configuration_index = r.read_u16()?;
    r.skip(2)?;
    Ok((configuration_index, r.rest()))
}
