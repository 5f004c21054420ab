//! Entity-side AECP command handling.
//!
//! Stateless per command: every inbound frame yields at most one response,
//! built before the next frame is looked at.

use super::message::{
    AecpMessageType, AecpPdu, AecpStatus, AemCommandType, ReadDescriptorCommand,
    read_descriptor_response_payload,
};
use crate::entity::EntityState;
use crate::protocol::codec::{AvtpSubtype, CodecError, EthernetHeader, classify_frame};

/// Commands answered with SUCCESS without tracking any state.
///
/// Acquire and lock ownership is not modelled; every controller is told it
/// holds the entity.
pub const UNCONDITIONAL_SUCCESS: [AemCommandType; 6] = [
    AemCommandType::ACQUIRE_ENTITY,
    AemCommandType::LOCK_ENTITY,
    AemCommandType::ENTITY_AVAILABLE,
    AemCommandType::CONTROLLER_AVAILABLE,
    AemCommandType::REGISTER_UNSOLICITED_NOTIFICATION,
    AemCommandType::DEREGISTER_UNSOLICITED_NOTIFICATION,
];

/// Why a frame produced no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Frame or PDU failed to decode.
    Malformed(CodecError),
    /// Not an AVTP frame.
    WrongEtherType(u16),
    /// AVTP, but not AECP.
    NotAecp,
    /// Command for another entity.
    NotAddressedToUs {
        /// Target in the frame.
        target_entity_id: u64,
    },
    /// A response (or other non-command message).
    NotACommand,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed: {e}"),
            Self::WrongEtherType(t) => write!(f, "EtherType 0x{t:04X}"),
            Self::NotAecp => f.write_str("not AECP"),
            Self::NotAddressedToUs { target_entity_id } => {
                write!(f, "addressed to 0x{target_entity_id:016X}")
            }
            Self::NotACommand => f.write_str("not a command"),
        }
    }
}

/// Result of [`AecpResponder::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Complete Ethernet frame to transmit.
    Responded(Vec<u8>),
    /// Nothing to send.
    Dropped(DropReason),
}

/// Answers AECP commands addressed to this entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AecpResponder;

impl AecpResponder {
    /// Create a responder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Handle one raw Ethernet frame.
    ///
    /// Produces a response frame, unicast to the sender, if and only if the
    /// frame is a well-formed AECP command whose `target_entity_id` is ours.
    #[must_use]
    pub fn handle(&self, frame: &[u8], entity: &EntityState) -> HandleOutcome {
        let (ethernet, subtype) = match classify_frame(frame) {
            Ok(classified) => classified,
            Err(CodecError::UnexpectedEtherType(ether_type)) => {
                return HandleOutcome::Dropped(DropReason::WrongEtherType(ether_type));
            }
            Err(e) => {
                tracing::debug!("Dropping malformed frame: {}", e);
                return HandleOutcome::Dropped(DropReason::Malformed(e));
            }
        };
        if subtype != Some(AvtpSubtype::Aecp) {
            return HandleOutcome::Dropped(DropReason::NotAecp);
        }

        let command = match AecpPdu::decode(&frame[EthernetHeader::SIZE..]) {
            Ok(pdu) => pdu,
            Err(e) => {
                tracing::debug!("Dropping malformed AECPDU from {}: {}", ethernet.source, e);
                return HandleOutcome::Dropped(DropReason::Malformed(e));
            }
        };

        let target_entity_id = command.header.target_entity_id;
        if target_entity_id != entity.entity_id() {
            tracing::trace!("AECP command for 0x{:016X}, not us", target_entity_id);
            return HandleOutcome::Dropped(DropReason::NotAddressedToUs { target_entity_id });
        }
        if command.header.message_type.is_response() {
            return HandleOutcome::Dropped(DropReason::NotACommand);
        }

        let response = self.respond(&command, entity);
        tracing::debug!(
            sequence_id = command.header.sequence_id,
            status = %response.header.status,
            "AECP {:?} {} from controller 0x{:016X}",
            command.header.message_type,
            command
                .command_type
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
            command.header.controller_entity_id
        );
        HandleOutcome::Responded(response.encode_frame(ethernet.source, entity.mac()))
    }

    /// Build the response PDU for a command already known to be ours.
    #[must_use]
    pub fn respond(&self, command: &AecpPdu, entity: &EntityState) -> AecpPdu {
        if command.header.message_type != AecpMessageType::AemCommand {
            return AecpPdu::response_to(command, AecpStatus::NOT_IMPLEMENTED, command.payload.clone());
        }

        let (status, payload) = match command.command_type {
            Some(AemCommandType::READ_DESCRIPTOR) => read_descriptor(&command.payload, entity),
            Some(command_type) if UNCONDITIONAL_SUCCESS.contains(&command_type) => {
                (AecpStatus::SUCCESS, command.payload.clone())
            }
            _ => (AecpStatus::NOT_IMPLEMENTED, command.payload.clone()),
        };
        AecpPdu::response_to(command, status, payload)
    }
}

fn read_descriptor(payload: &[u8], entity: &EntityState) -> (AecpStatus, Vec<u8>) {
    let request = match ReadDescriptorCommand::decode(payload) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("READ_DESCRIPTOR with bad arguments: {}", e);
            return (AecpStatus::BAD_ARGUMENTS, payload.to_vec());
        }
    };

    match entity.find_descriptor(request.descriptor_type, request.descriptor_index) {
        Some(descriptor) => {
            let record = descriptor.encode();
            (
                AecpStatus::SUCCESS,
                read_descriptor_response_payload(request.configuration_index, &record),
            )
        }
        None => {
            tracing::debug!(
                "READ_DESCRIPTOR {} index {}: no such descriptor",
                request.descriptor_type,
                request.descriptor_index
            );
            (AecpStatus::NO_SUCH_DESCRIPTOR, request.encode())
        }
    }
}
