//! Controller-side frame builders.
//!
//! Each function returns a complete Ethernet frame as a controller would put
//! it on the wire, sourced from [`CONTROLLER_MAC`](super::CONTROLLER_MAC).

use crate::protocol::acmp::{AcmpMessageType, AcmpPdu, AcmpStatus};
use crate::protocol::adp::AdpPdu;
use crate::protocol::aecp::{AecpPdu, AemCommandType, ReadDescriptorCommand};
use crate::protocol::aem::DescriptorType;
use crate::types::MacAddress;

use super::{CONTROLLER_ENTITY_ID, CONTROLLER_MAC};

/// ENTITY_DISCOVER for `entity_id` (0 = everyone).
#[must_use]
pub fn discover(entity_id: u64) -> Vec<u8> {
    AdpPdu::discover(entity_id).encode_frame(CONTROLLER_MAC)
}

/// AEM command with an arbitrary payload, unicast to `entity_mac`.
#[must_use]
pub fn aem_command(
    entity_mac: MacAddress,
    target_entity_id: u64,
    sequence_id: u16,
    command_type: AemCommandType,
    payload: Vec<u8>,
) -> Vec<u8> {
    AecpPdu::aem_command(
        target_entity_id,
        CONTROLLER_ENTITY_ID,
        sequence_id,
        command_type,
        payload,
    )
    .encode_frame(entity_mac, CONTROLLER_MAC)
}

/// READ_DESCRIPTOR for configuration 0.
#[must_use]
pub fn read_descriptor(
    entity_mac: MacAddress,
    target_entity_id: u64,
    sequence_id: u16,
    descriptor_type: DescriptorType,
    descriptor_index: u16,
) -> Vec<u8> {
    let command = ReadDescriptorCommand {
        configuration_index: 0,
        descriptor_type,
        descriptor_index,
    };
    aem_command(
        entity_mac,
        target_entity_id,
        sequence_id,
        AemCommandType::READ_DESCRIPTOR,
        command.encode(),
    )
}

/// ACMP command naming `entity_id` as both talker and listener.
#[must_use]
pub fn acmp_command(message_type: AcmpMessageType, entity_id: u64, sequence_id: u16) -> Vec<u8> {
    AcmpPdu {
        message_type,
        status: AcmpStatus::SUCCESS,
        stream_id: 0,
        controller_entity_id: CONTROLLER_ENTITY_ID,
        talker_entity_id: entity_id,
        listener_entity_id: entity_id,
        talker_unique_id: 0,
        listener_unique_id: 0,
        stream_dest_mac: MacAddress::ZERO,
        connection_count: 0,
        sequence_id,
        flags: 0,
        stream_vlan_id: 0,
    }
    .encode_frame(CONTROLLER_MAC)
}
