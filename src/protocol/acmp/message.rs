//! ACMP PDU format (IEEE 1722.1 clause 8.2.1).

use crate::protocol::codec::{
    AVDECC_MULTICAST_MAC, AvtpControlHeader, AvtpSubtype, CodecError, EthernetHeader, WireReader,
    WireWriter,
};
use crate::types::MacAddress;

/// ACMP message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AcmpMessageType {
    /// Controller asks a talker to add a listener.
    ConnectTxCommand = 0,
    /// Talker's answer to CONNECT_TX.
    ConnectTxResponse = 1,
    /// Controller asks a talker to drop a listener.
    DisconnectTxCommand = 2,
    /// Talker's answer to DISCONNECT_TX.
    DisconnectTxResponse = 3,
    /// Query a talker stream's state.
    GetTxStateCommand = 4,
    /// Answer to GET_TX_STATE.
    GetTxStateResponse = 5,
    /// Controller asks a listener to connect.
    ConnectRxCommand = 6,
    /// Listener's answer to CONNECT_RX.
    ConnectRxResponse = 7,
    /// Controller asks a listener to disconnect.
    DisconnectRxCommand = 8,
    /// Listener's answer to DISCONNECT_RX.
    DisconnectRxResponse = 9,
    /// Query a listener stream's state.
    GetRxStateCommand = 10,
    /// Answer to GET_RX_STATE.
    GetRxStateResponse = 11,
    /// Query one of a talker's connections.
    GetTxConnectionCommand = 12,
    /// Answer to GET_TX_CONNECTION.
    GetTxConnectionResponse = 13,
}

impl AcmpMessageType {
    /// Parse from the message type nibble.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownMessageType`] for values above 13.
    pub fn from_nibble(value: u8) -> Result<Self, CodecError> {
        Ok(match value & 0x0F {
            0 => Self::ConnectTxCommand,
            1 => Self::ConnectTxResponse,
            2 => Self::DisconnectTxCommand,
            3 => Self::DisconnectTxResponse,
            4 => Self::GetTxStateCommand,
            5 => Self::GetTxStateResponse,
            6 => Self::ConnectRxCommand,
            7 => Self::ConnectRxResponse,
            8 => Self::DisconnectRxCommand,
            9 => Self::DisconnectRxResponse,
            10 => Self::GetRxStateCommand,
            11 => Self::GetRxStateResponse,
            12 => Self::GetTxConnectionCommand,
            13 => Self::GetTxConnectionResponse,
            other => {
                return Err(CodecError::UnknownMessageType {
                    protocol: "ACMP",
                    value: other,
                });
            }
        })
    }

    /// Whether this is a response.
    #[must_use]
    pub fn is_response(self) -> bool {
        self as u8 & 0x01 != 0
    }

    /// Commands a talker answers.
    #[must_use]
    pub fn is_talker_command(self) -> bool {
        matches!(
            self,
            Self::ConnectTxCommand
                | Self::DisconnectTxCommand
                | Self::GetTxStateCommand
                | Self::GetTxConnectionCommand
        )
    }

    /// Commands a listener answers.
    #[must_use]
    pub fn is_listener_command(self) -> bool {
        matches!(
            self,
            Self::ConnectRxCommand | Self::DisconnectRxCommand | Self::GetRxStateCommand
        )
    }

    /// Response type for a command (identity for responses).
    #[must_use]
    pub fn response(self) -> Self {
        match self {
            Self::ConnectTxCommand => Self::ConnectTxResponse,
            Self::DisconnectTxCommand => Self::DisconnectTxResponse,
            Self::GetTxStateCommand => Self::GetTxStateResponse,
            Self::ConnectRxCommand => Self::ConnectRxResponse,
            Self::DisconnectRxCommand => Self::DisconnectRxResponse,
            Self::GetRxStateCommand => Self::GetRxStateResponse,
            Self::GetTxConnectionCommand => Self::GetTxConnectionResponse,
            response => response,
        }
    }
}

impl std::fmt::Display for AcmpMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ConnectTxCommand => "CONNECT_TX_COMMAND",
            Self::ConnectTxResponse => "CONNECT_TX_RESPONSE",
            Self::DisconnectTxCommand => "DISCONNECT_TX_COMMAND",
            Self::DisconnectTxResponse => "DISCONNECT_TX_RESPONSE",
            Self::GetTxStateCommand => "GET_TX_STATE_COMMAND",
            Self::GetTxStateResponse => "GET_TX_STATE_RESPONSE",
            Self::ConnectRxCommand => "CONNECT_RX_COMMAND",
            Self::ConnectRxResponse => "CONNECT_RX_RESPONSE",
            Self::DisconnectRxCommand => "DISCONNECT_RX_COMMAND",
            Self::DisconnectRxResponse => "DISCONNECT_RX_RESPONSE",
            Self::GetRxStateCommand => "GET_RX_STATE_COMMAND",
            Self::GetRxStateResponse => "GET_RX_STATE_RESPONSE",
            Self::GetTxConnectionCommand => "GET_TX_CONNECTION_COMMAND",
            Self::GetTxConnectionResponse => "GET_TX_CONNECTION_RESPONSE",
        };
        f.write_str(name)
    }
}

/// ACMP status codes (IEEE 1722.1 Table 8.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcmpStatus(pub u8);

impl AcmpStatus {
    /// Command succeeded.
    pub const SUCCESS: Self = Self(0);
    /// Listener does not have the listener unique id.
    pub const LISTENER_UNKNOWN_ID: Self = Self(1);
    /// Talker does not have the talker unique id.
    pub const TALKER_UNKNOWN_ID: Self = Self(2);
    /// Talker could not allocate a destination MAC.
    pub const TALKER_DEST_MAC_FAIL: Self = Self(3);
    /// Talker could not allocate a stream index.
    pub const TALKER_NO_STREAM_INDEX: Self = Self(4);
    /// Talker could not reserve bandwidth.
    pub const TALKER_NO_BANDWIDTH: Self = Self(5);
    /// Talker already has an exclusive connection.
    pub const TALKER_EXCLUSIVE: Self = Self(6);
    /// Listener timed out waiting for the talker.
    pub const LISTENER_TALKER_TIMEOUT: Self = Self(7);
    /// Listener already has an exclusive connection.
    pub const LISTENER_EXCLUSIVE: Self = Self(8);
    /// State is temporarily unavailable.
    pub const STATE_UNAVAILABLE: Self = Self(9);
    /// Stream is not connected.
    pub const NOT_CONNECTED: Self = Self(10);
    /// No such connection.
    pub const NO_SUCH_CONNECTION: Self = Self(11);
    /// Listener could not send to the talker.
    pub const COULD_NOT_SEND_MESSAGE: Self = Self(12);
    /// Talker misbehaved.
    pub const TALKER_MISBEHAVING: Self = Self(13);
    /// Listener misbehaved.
    pub const LISTENER_MISBEHAVING: Self = Self(14);
    /// Controller is not authorized.
    pub const CONTROLLER_NOT_AUTHORIZED: Self = Self(16);
    /// Request is incompatible with the current state.
    pub const INCOMPATIBLE_REQUEST: Self = Self(17);
    /// Command is not supported.
    pub const NOT_SUPPORTED: Self = Self(31);
}

impl std::fmt::Display for AcmpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match *self {
            Self::SUCCESS => "SUCCESS",
            Self::LISTENER_UNKNOWN_ID => "LISTENER_UNKNOWN_ID",
            Self::TALKER_UNKNOWN_ID => "TALKER_UNKNOWN_ID",
            Self::TALKER_DEST_MAC_FAIL => "TALKER_DEST_MAC_FAIL",
            Self::TALKER_NO_STREAM_INDEX => "TALKER_NO_STREAM_INDEX",
            Self::TALKER_NO_BANDWIDTH => "TALKER_NO_BANDWIDTH",
            Self::TALKER_EXCLUSIVE => "TALKER_EXCLUSIVE",
            Self::LISTENER_TALKER_TIMEOUT => "LISTENER_TALKER_TIMEOUT",
            Self::LISTENER_EXCLUSIVE => "LISTENER_EXCLUSIVE",
            Self::STATE_UNAVAILABLE => "STATE_UNAVAILABLE",
            Self::NOT_CONNECTED => "NOT_CONNECTED",
            Self::NO_SUCH_CONNECTION => "NO_SUCH_CONNECTION",
            Self::COULD_NOT_SEND_MESSAGE => "COULD_NOT_SEND_MESSAGE",
            Self::TALKER_MISBEHAVING => "TALKER_MISBEHAVING",
            Self::LISTENER_MISBEHAVING => "LISTENER_MISBEHAVING",
            Self::CONTROLLER_NOT_AUTHORIZED => "CONTROLLER_NOT_AUTHORIZED",
            Self::INCOMPATIBLE_REQUEST => "INCOMPATIBLE_REQUEST",
            Self::NOT_SUPPORTED => "NOT_SUPPORTED",
            _ => "RESERVED",
        };
        f.write_str(name)
    }
}

/// A decoded or to-be-encoded ACMPDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcmpPdu {
    /// Message type.
    pub message_type: AcmpMessageType,
    /// Status.
    pub status: AcmpStatus,
    /// Stream id.
    pub stream_id: u64,
    /// Issuing controller.
    pub controller_entity_id: u64,
    /// Talker entity.
    pub talker_entity_id: u64,
    /// Listener entity.
    pub listener_entity_id: u64,
    /// Talker stream (STREAM_OUTPUT index).
    pub talker_unique_id: u16,
    /// Listener stream (STREAM_INPUT index).
    pub listener_unique_id: u16,
    /// Stream destination MAC.
    pub stream_dest_mac: MacAddress,
    /// Connection count.
    pub connection_count: u16,
    /// Sequence id.
    pub sequence_id: u16,
    /// Flags.
    pub flags: u16,
    /// Stream VLAN id.
    pub stream_vlan_id: u16,
}

impl AcmpPdu {
    /// Fixed ACMPDU size.
    pub const SIZE: usize = 56;

    /// `control_data_length` of every ACMPDU.
    pub const CONTROL_DATA_LENGTH: u16 = 44;

    /// Encode the PDU (starting at the subtype byte).
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(Self::SIZE);
        self.write(&mut w);
        w.into_inner()
    }

    /// Encode a complete frame to the AVDECC multicast address.
    #[must_use]
    pub fn encode_frame(&self, source: MacAddress) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(EthernetHeader::SIZE + Self::SIZE);
        EthernetHeader::avtp(AVDECC_MULTICAST_MAC, source).write(&mut w);
        self.write(&mut w);
        w.into_inner()
    }

    fn write(&self, w: &mut WireWriter) {
        AvtpControlHeader::new(
            AvtpSubtype::Acmp,
            self.message_type as u8,
            self.status.0,
            Self::CONTROL_DATA_LENGTH,
            self.stream_id,
        )
        .write(w);
        w.put_u64(self.controller_entity_id);
        w.put_u64(self.talker_entity_id);
        w.put_u64(self.listener_entity_id);
        w.put_u16(self.talker_unique_id);
        w.put_u16(self.listener_unique_id);
        w.put_slice(self.stream_dest_mac.as_bytes());
        w.put_u16(self.connection_count);
        w.put_u16(self.sequence_id);
        w.put_u16(self.flags);
        w.put_u16(self.stream_vlan_id);
        w.put_zeros(2);
    }

    /// Decode a PDU (starting at the subtype byte).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when shorter than 56 bytes,
    /// [`CodecError::UnexpectedSubtype`] for non-ACMP input and
    /// [`CodecError::UnknownMessageType`] for reserved message types.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = WireReader::new("ACMPDU", data);
        r.require(Self::SIZE)?;
        let header = AvtpControlHeader::read(&mut r, AvtpSubtype::Acmp)?;
        Ok(Self {
            message_type: AcmpMessageType::from_nibble(header.message_type)?,
            status: AcmpStatus(header.status),
            stream_id: header.stream_id,
            controller_entity_id: r.read_u64()?,
            talker_entity_id: r.read_u64()?,
            listener_entity_id: r.read_u64()?,
            talker_unique_id: r.read_u16()?,
            listener_unique_id: r.read_u16()?,
            stream_dest_mac: MacAddress::new(r.read_array()?),
            connection_count: r.read_u16()?,
            sequence_id: r.read_u16()?,
            flags: r.read_u16()?,
            stream_vlan_id: r.read_u16()?,
        })
    }
}
