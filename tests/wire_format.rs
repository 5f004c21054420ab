//! Byte-exact frames emitted by a test entity.

use std::time::Duration;

use avdecc::entity::MemoryIndexStore;
use avdecc::protocol::aem::DescriptorType;
use avdecc::testing::{self, ENTITY_MAC, ManualClock, MockTransport, frames};
use avdecc::{Orchestrator, OrchestratorConfig};

const ENTITY_ID: u64 = 0x001B_21FF_FE12_3456;

async fn entity(store: MemoryIndexStore) -> (Orchestrator<MockTransport, ManualClock>, MockTransport, ManualClock) {
    let config = testing::entity_config();
    let state = testing::entity_state(&config, store).await.unwrap();
    let transport = MockTransport::new(ENTITY_MAC);
    let clock = ManualClock::new(0);
    let orchestrator = Orchestrator::new(
        state,
        transport.clone(),
        clock.clone(),
        OrchestratorConfig::from(&config),
    );
    (orchestrator, transport, clock)
}

#[rustfmt::skip]
const ADVERTISEMENT: [u8; 82] = [
    // destination (AVDECC multicast), source, EtherType
    0x91, 0xE0, 0xF0, 0x01, 0x00, 0x00,
    0x00, 0x1B, 0x21, 0x12, 0x34, 0x56,
    0x22, 0xF0,
    // ADP, ENTITY_AVAILABLE, valid_time 31, cdl 56
    0xFA, 0x00, 0xF8, 0x38,
    // entity_id
    0x00, 0x1B, 0x21, 0xFF, 0xFE, 0x12, 0x34, 0x56,
    // entity_model_id
    0x00, 0x1B, 0x21, 0x00, 0x00, 0x00, 0x00, 0x01,
    // entity_capabilities
    0x00, 0x00, 0x85, 0x08,
    // talker_stream_sources, talker_capabilities
    0x00, 0x01, 0x40, 0x01,
    // listener_stream_sinks, listener_capabilities
    0x00, 0x01, 0x40, 0x01,
    // controller_capabilities
    0x00, 0x00, 0x00, 0x00,
    // available_index
    0x00, 0x00, 0x00, 0x2B,
    // gptp_grandmaster_id
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // gptp_domain_number, reserved, identify_control_index, interface_index
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // association_id
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // reserved
    0x00, 0x00, 0x00, 0x00,
];

#[tokio::test(start_paused = true)]
async fn test_advertisement_bytes() {
    let (mut entity, transport, clock) = entity(MemoryIndexStore::with_index(41)).await;

    entity.step().await.unwrap();
    clock.advance(Duration::from_secs(2));
    entity.step().await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], ADVERTISEMENT.to_vec());
}

#[rustfmt::skip]
const NO_SUCH_DESCRIPTOR: [u8; 46] = [
    // destination (controller), source, EtherType
    0x02, 0x00, 0x00, 0xAA, 0xBB, 0xCC,
    0x00, 0x1B, 0x21, 0x12, 0x34, 0x56,
    0x22, 0xF0,
    // AECP, AEM_RESPONSE, NO_SUCH_DESCRIPTOR, cdl 20
    0xFB, 0x01, 0x10, 0x14,
    // target_entity_id
    0x00, 0x1B, 0x21, 0xFF, 0xFE, 0x12, 0x34, 0x56,
    // controller_entity_id
    0x02, 0x00, 0x00, 0xFF, 0xFE, 0xAA, 0xBB, 0xCC,
    // sequence_id, READ_DESCRIPTOR
    0x00, 0x2A, 0x00, 0x04,
    // configuration_index, reserved, STREAM_INPUT, index 99
    0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00, 0x63,
];

#[tokio::test(start_paused = true)]
async fn test_no_such_descriptor_bytes() {
    let (mut entity, transport, _clock) = entity(MemoryIndexStore::new()).await;

    transport.push_inbound(frames::read_descriptor(
        ENTITY_MAC,
        ENTITY_ID,
        42,
        DescriptorType::STREAM_INPUT,
        99,
    ));
    entity.step().await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], NO_SUCH_DESCRIPTOR.to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_read_entity_response_header() {
    let (mut entity, transport, _clock) = entity(MemoryIndexStore::new()).await;

    transport.push_inbound(frames::read_descriptor(
        ENTITY_MAC,
        ENTITY_ID,
        7,
        DescriptorType::ENTITY,
        0,
    ));
    entity.step().await.unwrap();

    let frame = &transport.sent()[0];
    // 14 Ethernet + 24 AEM header + 4 configuration + 312 body + 4 checksum
    assert_eq!(frame.len(), 358);
    // AEM_RESPONSE, SUCCESS, cdl = 358 - 14 - 12
    assert_eq!(&frame[14..18], &[0xFB, 0x01, 0x01, 0x4C]);
    assert_eq!(&frame[34..38], &[0x00, 0x07, 0x00, 0x04]);
    // Descriptor type and index at the start of the record
    assert_eq!(&frame[42..46], &[0x00, 0x00, 0x00, 0x00]);
}
