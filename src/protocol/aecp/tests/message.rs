use proptest::prelude::*;

use crate::protocol::aecp::{
    AecpHeader, AecpMessageType, AecpPdu, AecpStatus, AemCommandType, ReadDescriptorCommand,
    read_descriptor_response_payload, split_read_descriptor_response,
};
use crate::protocol::aem::DescriptorType;
use crate::protocol::codec::CodecError;
use crate::types::MacAddress;

const TARGET: u64 = 0x001B_21FF_FE12_3456;
const CONTROLLER: u64 = 0x0200_00FF_FEAA_BBCC;

fn read_entity_command() -> AecpPdu {
    let request = ReadDescriptorCommand {
        configuration_index: 0,
        descriptor_type: DescriptorType::ENTITY,
        descriptor_index: 0,
    };
    AecpPdu::aem_command(
        TARGET,
        CONTROLLER,
        0x1234,
        AemCommandType::READ_DESCRIPTOR,
        request.encode(),
    )
}

#[rustfmt::skip]
const READ_ENTITY_DUMP: [u8; 32] = [
    // subtype, AEM_COMMAND, status 0 | cdl 20
    0xFB, 0x00, 0x00, 0x14,
    // target_entity_id
    0x00, 0x1B, 0x21, 0xFF, 0xFE, 0x12, 0x34, 0x56,
    // controller_entity_id
    0x02, 0x00, 0x00, 0xFF, 0xFE, 0xAA, 0xBB, 0xCC,
    // sequence_id, u | command_type
    0x12, 0x34, 0x00, 0x04,
    // configuration_index, reserved, descriptor_type, descriptor_index
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// ===== Layout =====

#[test]
fn test_read_descriptor_byte_dump() {
    assert_eq!(read_entity_command().encode(), READ_ENTITY_DUMP.to_vec());
}

#[test]
fn test_decode_byte_dump() {
    let pdu = AecpPdu::decode(&READ_ENTITY_DUMP).unwrap();
    assert_eq!(pdu.header.control_data_length, 20);
    assert_eq!(pdu.header.sequence_id, 0x1234);
    assert_eq!(pdu.command_type, Some(AemCommandType::READ_DESCRIPTOR));
    assert!(!pdu.unsolicited);
    assert_eq!(pdu.payload, vec![0u8; 8]);
    assert!(pdu.is_aem());
}

#[test]
fn test_decode_ignores_ethernet_padding() {
    let mut padded = READ_ENTITY_DUMP.to_vec();
    padded.extend_from_slice(&[0u8; 14]);
    let pdu = AecpPdu::decode(&padded).unwrap();
    assert_eq!(pdu.payload.len(), ReadDescriptorCommand::SIZE);
}

#[test]
fn test_decode_truncated_payload() {
    let err = AecpPdu::decode(&READ_ENTITY_DUMP[..28]).unwrap_err();
    assert_eq!(err, CodecError::too_short("AECPDU", 32, 28));
}

#[test]
fn test_decode_short_header() {
    let err = AecpPdu::decode(&READ_ENTITY_DUMP[..12]).unwrap_err();
    assert!(matches!(err, CodecError::MalformedFrame { needed: 22, .. }));
}

#[test]
fn test_decode_cdl_below_header() {
    let mut bytes = READ_ENTITY_DUMP;
    bytes[3] = 0x04;
    assert!(matches!(
        AecpPdu::decode(&bytes),
        Err(CodecError::MalformedFrame { structure: "AECPDU control data", .. })
    ));
}

#[test]
fn test_decode_aem_without_command_type() {
    let mut bytes = READ_ENTITY_DUMP;
    bytes[3] = 0x0A;
    assert!(matches!(
        AecpPdu::decode(&bytes),
        Err(CodecError::MalformedFrame { structure: "AEM command type", .. })
    ));
}

#[test]
fn test_unsolicited_bit() {
    let mut bytes = READ_ENTITY_DUMP;
    bytes[1] = 0x01;
    bytes[22] = 0x80;
    let pdu = AecpPdu::decode(&bytes).unwrap();
    assert!(pdu.unsolicited);
    assert_eq!(pdu.header.message_type, AecpMessageType::AemResponse);
    assert_eq!(pdu.command_type, Some(AemCommandType::READ_DESCRIPTOR));
}

#[test]
fn test_non_aem_has_no_command_type() {
    let mut bytes = READ_ENTITY_DUMP;
    bytes[1] = 0x06;
    let pdu = AecpPdu::decode(&bytes).unwrap();
    assert_eq!(pdu.header.message_type, AecpMessageType::VendorUniqueCommand);
    assert_eq!(pdu.command_type, None);
    assert_eq!(pdu.payload.len(), 10);
    assert!(!pdu.is_aem());
    // Re-encoding keeps the cdl.
    assert_eq!(pdu.encode(), bytes.to_vec());
}

#[test]
fn test_header_decode() {
    let header = AecpHeader::decode(&READ_ENTITY_DUMP).unwrap();
    assert_eq!(header.target_entity_id, TARGET);
    assert_eq!(header.controller_entity_id, CONTROLLER);
    assert_eq!(header.status, AecpStatus::SUCCESS);
}

#[test]
fn test_reserved_message_type() {
    let mut bytes = READ_ENTITY_DUMP;
    bytes[1] = 0x0A;
    assert_eq!(
        AecpPdu::decode(&bytes).unwrap_err(),
        CodecError::UnknownMessageType {
            protocol: "AECP",
            value: 10
        }
    );
}

// ===== Responses =====

#[test]
fn test_response_keeps_roles_and_sequence() {
    let command = read_entity_command();
    let response = AecpPdu::response_to(&command, AecpStatus::NO_SUCH_DESCRIPTOR, vec![1, 2]);
    assert_eq!(response.header.message_type, AecpMessageType::AemResponse);
    assert_eq!(response.header.status, AecpStatus::NO_SUCH_DESCRIPTOR);
    assert_eq!(response.header.target_entity_id, TARGET);
    assert_eq!(response.header.controller_entity_id, CONTROLLER);
    assert_eq!(response.header.sequence_id, 0x1234);
    assert_eq!(response.command_type, command.command_type);

    let bytes = response.encode();
    // status 2 | cdl 14
    assert_eq!(&bytes[1..4], &[0x01, 0x10, 0x0E]);
}

#[test]
fn test_encode_frame_addressing() {
    let dest = MacAddress::new([0x02, 0, 0, 0xAA, 0xBB, 0xCC]);
    let src = MacAddress::new([0x00, 0x1B, 0x21, 0x12, 0x34, 0x56]);
    let frame = read_entity_command().encode_frame(dest, src);
    let (ethernet, pdu) = AecpPdu::decode_frame(&frame).unwrap();
    assert_eq!(ethernet.destination, dest);
    assert_eq!(ethernet.source, src);
    assert_eq!(pdu.header.target_entity_id, TARGET);
}

#[test]
fn test_message_type_response_pairs() {
    for (command, response) in [
        (AecpMessageType::AemCommand, AecpMessageType::AemResponse),
        (AecpMessageType::AddressAccessCommand, AecpMessageType::AddressAccessResponse),
        (AecpMessageType::AvcCommand, AecpMessageType::AvcResponse),
        (AecpMessageType::VendorUniqueCommand, AecpMessageType::VendorUniqueResponse),
        (AecpMessageType::HdcpAemCommand, AecpMessageType::HdcpAemResponse),
        (AecpMessageType::ExtendedCommand, AecpMessageType::ExtendedResponse),
    ] {
        assert!(!command.is_response());
        assert!(response.is_response());
        assert_eq!(command.response(), response);
        assert_eq!(command as u8 + 1, response as u8);
    }
}

// ===== READ_DESCRIPTOR data =====

#[test]
fn test_read_descriptor_command_decode() {
    let request = ReadDescriptorCommand::decode(&[0x00, 0x00, 0xFF, 0xFF, 0x00, 0x09, 0x00, 0x02])
        .unwrap();
    assert_eq!(request.configuration_index, 0);
    assert_eq!(request.descriptor_type, DescriptorType::AVB_INTERFACE);
    assert_eq!(request.descriptor_index, 2);
    // Reserved bytes are normalized on encode.
    assert_eq!(request.encode(), vec![0, 0, 0, 0, 0, 9, 0, 2]);
}

#[test]
fn test_read_descriptor_command_short() {
    assert!(ReadDescriptorCommand::decode(&[0, 0, 0, 1]).is_err());
}

#[test]
fn test_read_descriptor_response_split() {
    let payload = read_descriptor_response_payload(3, &[0xAA, 0xBB]);
    assert_eq!(payload, vec![0x00, 0x03, 0x00, 0x00, 0xAA, 0xBB]);
    let (configuration, record) = split_read_descriptor_response(&payload).unwrap();
    assert_eq!(configuration, 3);
    assert_eq!(record, &[0xAA, 0xBB]);
    assert!(split_read_descriptor_response(&[0]).is_err());
}

// ===== Tables =====

#[test]
fn test_command_type_names() {
    assert_eq!(AemCommandType::READ_DESCRIPTOR.name(), "READ_DESCRIPTOR");
    assert_eq!(AemCommandType::GET_STREAM_BACKUP.name(), "GET_STREAM_BACKUP");
    assert_eq!(AemCommandType::EXPANSION.name(), "EXPANSION");
    assert_eq!(AemCommandType(0x0100).name(), "RESERVED");
    assert_eq!(
        AemCommandType::ACQUIRE_ENTITY.to_string(),
        "ACQUIRE_ENTITY(0x0000)"
    );
}

#[test]
fn test_command_type_table_is_complete() {
    for code in 0..=0x004A_u16 {
        assert_ne!(AemCommandType(code).name(), "RESERVED", "code 0x{code:04X}");
    }
}

#[test]
fn test_status_names() {
    assert_eq!(AecpStatus::NOT_IMPLEMENTED.name(), "NOT_IMPLEMENTED");
    assert_eq!(AecpStatus::BAD_ARGUMENTS.to_string(), "BAD_ARGUMENTS");
}

proptest! {
    #[test]
    fn test_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..80)) {
        let _ = AecpPdu::decode(&bytes);
    }

    #[test]
    fn test_payload_survives_encoding(
        sequence_id in any::<u16>(),
        command in 0u16..0x7FFF,
        payload in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let pdu = AecpPdu::aem_command(TARGET, CONTROLLER, sequence_id, AemCommandType(command), payload);
        let decoded = AecpPdu::decode(&pdu.encode()).unwrap();
        prop_assert_eq!(decoded.header.sequence_id, sequence_id);
        prop_assert_eq!(decoded.command_type, pdu.command_type);
        prop_assert_eq!(decoded.payload, pdu.payload);
    }
}
