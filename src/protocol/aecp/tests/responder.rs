use proptest::prelude::*;

use crate::entity::{EntityState, MemoryIndexStore};
use crate::protocol::aecp::{
    AecpHeader, AecpMessageType, AecpPdu, AecpResponder, AecpStatus, AemCommandType, DropReason,
    HandleOutcome, UNCONDITIONAL_SUCCESS, split_read_descriptor_response,
};
use crate::protocol::aem::{Descriptor, DescriptorType};
use crate::protocol::codec::{CodecError, EthernetHeader};
use crate::testing::frames;
use crate::testing::{CONTROLLER_ENTITY_ID, CONTROLLER_MAC, ENTITY_MAC, entity_config, entity_state};

const ENTITY_ID: u64 = 0x001B_21FF_FE12_3456;

async fn entity() -> EntityState {
    entity_state(&entity_config(), MemoryIndexStore::with_index(41))
        .await
        .unwrap()
}

fn respond(frame: &[u8], entity: &EntityState) -> (EthernetHeader, AecpPdu) {
    match AecpResponder::new().handle(frame, entity) {
        HandleOutcome::Responded(bytes) => AecpPdu::decode_frame(&bytes).unwrap(),
        HandleOutcome::Dropped(reason) => panic!("frame dropped: {reason}"),
    }
}

fn dropped(frame: &[u8], entity: &EntityState) -> DropReason {
    match AecpResponder::new().handle(frame, entity) {
        HandleOutcome::Dropped(reason) => reason,
        HandleOutcome::Responded(bytes) => panic!("unexpected response: {bytes:02X?}"),
    }
}

// ===== Addressing =====

#[tokio::test]
async fn test_response_is_unicast_to_controller() {
    let entity = entity().await;
    let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 7, DescriptorType::ENTITY, 0);

    let (ethernet, response) = respond(&frame, &entity);
    assert_eq!(ethernet.destination, CONTROLLER_MAC);
    assert_eq!(ethernet.source, ENTITY_MAC);
    assert_eq!(response.header.target_entity_id, ENTITY_ID);
    assert_eq!(response.header.controller_entity_id, CONTROLLER_ENTITY_ID);
    assert_eq!(response.header.sequence_id, 7);
    assert_eq!(response.header.message_type, AecpMessageType::AemResponse);
}

// ===== READ_DESCRIPTOR =====

#[tokio::test]
async fn test_read_entity_descriptor() {
    let entity = entity().await;
    let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 1, DescriptorType::ENTITY, 0);

    let (_, response) = respond(&frame, &entity);
    assert_eq!(response.header.status, AecpStatus::SUCCESS);
    assert_eq!(response.command_type, Some(AemCommandType::READ_DESCRIPTOR));

    let (configuration, record) = split_read_descriptor_response(&response.payload).unwrap();
    assert_eq!(configuration, 0);
    let Descriptor::Entity(descriptor) = Descriptor::decode(record).unwrap() else {
        panic!("expected ENTITY descriptor");
    };
    assert_eq!(descriptor.entity_id, ENTITY_ID);
    assert_eq!(descriptor.entity_name, "Test entity");
    assert_eq!(descriptor.serial_number, "TEST-0001");
    assert_eq!(descriptor.available_index, 42);
    assert_eq!(descriptor.configurations_count, 1);
}

#[tokio::test]
async fn test_entity_descriptor_tracks_available_index() {
    let mut entity = entity().await;
    entity.next_available_index();
    entity.next_available_index();

    let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 2, DescriptorType::ENTITY, 0);
    let (_, response) = respond(&frame, &entity);
    let (_, record) = split_read_descriptor_response(&response.payload).unwrap();
    let Descriptor::Entity(descriptor) = Descriptor::decode(record).unwrap() else {
        panic!("expected ENTITY descriptor");
    };
    assert_eq!(descriptor.available_index, 44);
}

#[tokio::test]
async fn test_read_avb_interface_descriptor() {
    let entity = entity().await;
    let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 3, DescriptorType::AVB_INTERFACE, 0);

    let (_, response) = respond(&frame, &entity);
    assert_eq!(response.header.status, AecpStatus::SUCCESS);
    let (_, record) = split_read_descriptor_response(&response.payload).unwrap();
    let Descriptor::AvbInterface(descriptor) = Descriptor::decode(record).unwrap() else {
        panic!("expected AVB_INTERFACE descriptor");
    };
    assert_eq!(descriptor.mac_address, ENTITY_MAC);
    assert_eq!(descriptor.clock_identity, 0x001B_21FF_FE12_3456);
}

#[tokio::test]
async fn test_read_every_configured_descriptor() {
    let entity = entity().await;
    for (seq, descriptor_type) in [
        DescriptorType::ENTITY,
        DescriptorType::CONFIGURATION,
        DescriptorType::STREAM_INPUT,
        DescriptorType::STREAM_OUTPUT,
        DescriptorType::AVB_INTERFACE,
    ]
    .into_iter()
    .enumerate()
    {
        let seq = u16::try_from(seq).unwrap();
        let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, seq, descriptor_type, 0);
        let (_, response) = respond(&frame, &entity);
        assert_eq!(response.header.status, AecpStatus::SUCCESS, "{descriptor_type}");
        let (_, record) = split_read_descriptor_response(&response.payload).unwrap();
        let decoded = Descriptor::decode(record).unwrap();
        assert_eq!(decoded.descriptor_type(), descriptor_type);
        assert_eq!(decoded.descriptor_index(), 0);
    }
}

#[tokio::test]
async fn test_no_such_descriptor_echoes_request() {
    let entity = entity().await;
    let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 9, DescriptorType::STREAM_INPUT, 5);

    let (_, response) = respond(&frame, &entity);
    assert_eq!(response.header.status, AecpStatus::NO_SUCH_DESCRIPTOR);
    assert_eq!(response.payload, vec![0, 0, 0, 0, 0x00, 0x05, 0x00, 0x05]);
}

#[tokio::test]
async fn test_unknown_descriptor_type() {
    let entity = entity().await;
    let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 9, DescriptorType::LOCALE, 0);

    let (_, response) = respond(&frame, &entity);
    assert_eq!(response.header.status, AecpStatus::NO_SUCH_DESCRIPTOR);
    assert_eq!(response.payload.len(), 8);
}

#[tokio::test]
async fn test_short_read_descriptor_is_bad_arguments() {
    let entity = entity().await;
    let frame = frames::aem_command(
        ENTITY_MAC,
        ENTITY_ID,
        4,
        AemCommandType::READ_DESCRIPTOR,
        vec![0, 0, 0],
    );

    let (_, response) = respond(&frame, &entity);
    assert_eq!(response.header.status, AecpStatus::BAD_ARGUMENTS);
    assert_eq!(response.payload, vec![0, 0, 0]);
    assert_eq!(response.header.sequence_id, 4);
}

// ===== Other AEM commands =====

#[tokio::test]
async fn test_unconditional_success_commands() {
    let entity = entity().await;
    for command_type in UNCONDITIONAL_SUCCESS {
        let payload = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let frame = frames::aem_command(ENTITY_MAC, ENTITY_ID, 11, command_type, payload.clone());
        let (_, response) = respond(&frame, &entity);
        assert_eq!(response.header.status, AecpStatus::SUCCESS, "{command_type}");
        assert_eq!(response.command_type, Some(command_type));
        assert_eq!(response.payload, payload);
    }
}

#[tokio::test]
async fn test_unhandled_command_not_implemented() {
    let entity = entity().await;
    let payload = vec![0x00, 0x05, 0x00, 0x00, 0x12, 0x34];
    let frame = frames::aem_command(
        ENTITY_MAC,
        ENTITY_ID,
        12,
        AemCommandType::SET_STREAM_FORMAT,
        payload.clone(),
    );

    let (_, response) = respond(&frame, &entity);
    assert_eq!(response.header.status, AecpStatus::NOT_IMPLEMENTED);
    assert_eq!(response.command_type, Some(AemCommandType::SET_STREAM_FORMAT));
    assert_eq!(response.payload, payload);
}

#[tokio::test]
async fn test_non_aem_command_not_implemented() {
    let entity = entity().await;
    let mut command = AecpPdu::aem_command(
        ENTITY_ID,
        CONTROLLER_ENTITY_ID,
        13,
        AemCommandType::ACQUIRE_ENTITY,
        Vec::new(),
    );
    command.header.message_type = AecpMessageType::AddressAccessCommand;
    command.command_type = None;
    command.payload = vec![0x00, 0x01, 0x02, 0x03];
    let frame = command.encode_frame(ENTITY_MAC, CONTROLLER_MAC);

    let (_, response) = respond(&frame, &entity);
    assert_eq!(response.header.message_type, AecpMessageType::AddressAccessResponse);
    assert_eq!(response.header.status, AecpStatus::NOT_IMPLEMENTED);
    assert_eq!(response.command_type, None);
    assert_eq!(response.payload, vec![0x00, 0x01, 0x02, 0x03]);
}

// ===== Dropped frames =====

#[tokio::test]
async fn test_command_for_other_entity_dropped() {
    let entity = entity().await;
    let frame = frames::read_descriptor(ENTITY_MAC, 0x1111, 1, DescriptorType::ENTITY, 0);

    assert_eq!(
        dropped(&frame, &entity),
        DropReason::NotAddressedToUs {
            target_entity_id: 0x1111
        }
    );
}

#[tokio::test]
async fn test_response_dropped() {
    let entity = entity().await;
    let command = AecpPdu::aem_command(
        ENTITY_ID,
        CONTROLLER_ENTITY_ID,
        1,
        AemCommandType::READ_DESCRIPTOR,
        Vec::new(),
    );
    let response = AecpPdu::response_to(&command, AecpStatus::SUCCESS, Vec::new());
    let frame = response.encode_frame(ENTITY_MAC, CONTROLLER_MAC);

    assert_eq!(dropped(&frame, &entity), DropReason::NotACommand);
}

#[tokio::test]
async fn test_truncated_command_dropped() {
    let entity = entity().await;
    let frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 1, DescriptorType::ENTITY, 0);

    let reason = dropped(&frame[..frame.len() - 4], &entity);
    assert!(matches!(
        reason,
        DropReason::Malformed(CodecError::MalformedFrame { .. })
    ));
}

#[tokio::test]
async fn test_wrong_ether_type_dropped() {
    let entity = entity().await;
    let mut frame = frames::read_descriptor(ENTITY_MAC, ENTITY_ID, 1, DescriptorType::ENTITY, 0);
    frame[12] = 0x08;
    frame[13] = 0x00;

    assert_eq!(dropped(&frame, &entity), DropReason::WrongEtherType(0x0800));
}

#[tokio::test]
async fn test_other_subtype_dropped() {
    let entity = entity().await;
    let frame = frames::discover(0);

    assert_eq!(dropped(&frame, &entity), DropReason::NotAecp);
}

#[test]
fn test_drop_reason_display() {
    assert_eq!(
        DropReason::NotAddressedToUs {
            target_entity_id: 0x1B
        }
        .to_string(),
        "addressed to 0x000000000000001B"
    );
    assert_eq!(DropReason::WrongEtherType(0x86DD).to_string(), "EtherType 0x86DD");
}

// ===== Properties =====

const MESSAGE_TYPES: [AecpMessageType; 12] = [
    AecpMessageType::AemCommand,
    AecpMessageType::AemResponse,
    AecpMessageType::AddressAccessCommand,
    AecpMessageType::AddressAccessResponse,
    AecpMessageType::AvcCommand,
    AecpMessageType::AvcResponse,
    AecpMessageType::VendorUniqueCommand,
    AecpMessageType::VendorUniqueResponse,
    AecpMessageType::HdcpAemCommand,
    AecpMessageType::HdcpAemResponse,
    AecpMessageType::ExtendedCommand,
    AecpMessageType::ExtendedResponse,
];

fn blocking_entity() -> EntityState {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(entity())
}

proptest! {
    #[test]
    fn test_responds_only_to_commands_for_us(
        target in prop_oneof![Just(ENTITY_ID), any::<u64>()],
        message_type in proptest::sample::select(MESSAGE_TYPES.to_vec()),
        sequence_id in any::<u16>(),
        command_type in 0u16..0x8000,
        payload in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let entity = blocking_entity();
        let aem = matches!(
            message_type,
            AecpMessageType::AemCommand | AecpMessageType::AemResponse
        );
        let command = AecpPdu {
            header: AecpHeader {
                message_type,
                status: AecpStatus::SUCCESS,
                control_data_length: 0,
                target_entity_id: target,
                controller_entity_id: CONTROLLER_ENTITY_ID,
                sequence_id,
            },
            unsolicited: false,
            command_type: aem.then_some(AemCommandType(command_type)),
            payload,
        };
        let frame = command.encode_frame(ENTITY_MAC, CONTROLLER_MAC);

        let expect_response = target == ENTITY_ID && !message_type.is_response();
        match AecpResponder::new().handle(&frame, &entity) {
            HandleOutcome::Responded(bytes) => {
                prop_assert!(expect_response);
                let (ethernet, response) = AecpPdu::decode_frame(&bytes).unwrap();
                prop_assert_eq!(ethernet.destination, CONTROLLER_MAC);
                prop_assert_eq!(response.header.sequence_id, sequence_id);
                prop_assert_eq!(response.header.target_entity_id, ENTITY_ID);
                prop_assert_eq!(response.header.controller_entity_id, CONTROLLER_ENTITY_ID);
                prop_assert_eq!(response.header.message_type, message_type.response());
            }
            HandleOutcome::Dropped(reason) => {
                prop_assert!(!expect_response, "dropped: {}", reason);
            }
        }
    }
}
