use proptest::prelude::*;

use crate::protocol::acmp::{AcmpMessageType, AcmpPdu, AcmpStatus};
use crate::protocol::codec::{AVDECC_MULTICAST_MAC, CodecError, EthernetHeader};
use crate::types::MacAddress;

fn connect_rx() -> AcmpPdu {
    AcmpPdu {
        message_type: AcmpMessageType::ConnectRxCommand,
        status: AcmpStatus::SUCCESS,
        stream_id: 0x0011_2233_4455_0000,
        controller_entity_id: 0x0200_00FF_FEAA_BBCC,
        talker_entity_id: 0x0011_22FF_FE33_4455,
        listener_entity_id: 0x001B_21FF_FE12_3456,
        talker_unique_id: 1,
        listener_unique_id: 2,
        stream_dest_mac: MacAddress::new([0x91, 0xE0, 0xF0, 0x00, 0x12, 0x34]),
        connection_count: 3,
        sequence_id: 0xBEEF,
        flags: 0x0008,
        stream_vlan_id: 2,
    }
}

#[test]
fn test_encode_layout() {
    let bytes = connect_rx().encode();
    assert_eq!(bytes.len(), AcmpPdu::SIZE);
    assert_eq!(&bytes[..4], &[0xFC, 0x06, 0x00, 0x2C]);
    assert_eq!(&bytes[4..12], &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x00, 0x00]);
    assert_eq!(&bytes[12..20], &[0x02, 0x00, 0x00, 0xFF, 0xFE, 0xAA, 0xBB, 0xCC]);
    assert_eq!(&bytes[28..36], &[0x00, 0x1B, 0x21, 0xFF, 0xFE, 0x12, 0x34, 0x56]);
    assert_eq!(&bytes[36..40], &[0x00, 0x01, 0x00, 0x02]);
    assert_eq!(&bytes[40..46], &[0x91, 0xE0, 0xF0, 0x00, 0x12, 0x34]);
    // connection_count, sequence_id, flags, stream_vlan_id, reserved
    assert_eq!(
        &bytes[46..56],
        &[0x00, 0x03, 0xBE, 0xEF, 0x00, 0x08, 0x00, 0x02, 0x00, 0x00]
    );
}

#[test]
fn test_decode_layout() {
    let pdu = connect_rx();
    assert_eq!(AcmpPdu::decode(&pdu.encode()).unwrap(), pdu);
}

#[test]
fn test_decode_ignores_padding() {
    let mut bytes = connect_rx().encode();
    bytes.extend_from_slice(&[0xFF; 8]);
    assert_eq!(AcmpPdu::decode(&bytes).unwrap(), connect_rx());
}

#[test]
fn test_frame_is_multicast() {
    let source = MacAddress::new([0x00, 0x1B, 0x21, 0x12, 0x34, 0x56]);
    let frame = connect_rx().encode_frame(source);
    assert_eq!(frame.len(), EthernetHeader::SIZE + AcmpPdu::SIZE);

    let ethernet = EthernetHeader::decode(&frame).unwrap();
    assert_eq!(ethernet.destination, AVDECC_MULTICAST_MAC);
    assert_eq!(ethernet.source, source);
}

#[test]
fn test_decode_short() {
    let bytes = connect_rx().encode();
    assert_eq!(
        AcmpPdu::decode(&bytes[..40]).unwrap_err(),
        CodecError::too_short("ACMPDU", 56, 40)
    );
}

#[test]
fn test_decode_reserved_message_type() {
    let mut bytes = connect_rx().encode();
    bytes[1] = 0x0E;
    assert_eq!(
        AcmpPdu::decode(&bytes).unwrap_err(),
        CodecError::UnknownMessageType {
            protocol: "ACMP",
            value: 14
        }
    );
}

#[test]
fn test_decode_wrong_subtype() {
    let mut bytes = connect_rx().encode();
    bytes[0] = 0xFB;
    assert_eq!(
        AcmpPdu::decode(&bytes).unwrap_err(),
        CodecError::UnexpectedSubtype(0xFB)
    );
}

#[test]
fn test_talker_and_listener_commands() {
    let talker = [
        AcmpMessageType::ConnectTxCommand,
        AcmpMessageType::DisconnectTxCommand,
        AcmpMessageType::GetTxStateCommand,
        AcmpMessageType::GetTxConnectionCommand,
    ];
    let listener = [
        AcmpMessageType::ConnectRxCommand,
        AcmpMessageType::DisconnectRxCommand,
        AcmpMessageType::GetRxStateCommand,
    ];

    for message_type in talker {
        assert!(message_type.is_talker_command());
        assert!(!message_type.is_listener_command());
        assert!(!message_type.is_response());
    }
    for message_type in listener {
        assert!(message_type.is_listener_command());
        assert!(!message_type.is_talker_command());
    }
    for message_type in talker.into_iter().chain(listener) {
        let response = message_type.response();
        assert!(response.is_response());
        assert_eq!(response as u8, message_type as u8 + 1);
        assert_eq!(response.response(), response);
        assert!(!response.is_talker_command() && !response.is_listener_command());
    }
}

#[test]
fn test_display_names() {
    assert_eq!(
        AcmpMessageType::GetTxConnectionResponse.to_string(),
        "GET_TX_CONNECTION_RESPONSE"
    );
    assert_eq!(AcmpStatus::NOT_SUPPORTED.to_string(), "NOT_SUPPORTED");
    assert_eq!(AcmpStatus(15).to_string(), "RESERVED");
}

proptest! {
    #[test]
    fn test_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..72)) {
        let _ = AcmpPdu::decode(&bytes);
    }

    #[test]
    fn test_encode_is_fixed_size(sequence_id in any::<u16>(), status in 0u8..32, stream_id in any::<u64>()) {
        let pdu = AcmpPdu {
            sequence_id,
            status: AcmpStatus(status),
            stream_id,
            ..connect_rx()
        };
        let bytes = pdu.encode();
        prop_assert_eq!(bytes.len(), AcmpPdu::SIZE);
        prop_assert_eq!(AcmpPdu::decode(&bytes).unwrap(), pdu);
    }
}
