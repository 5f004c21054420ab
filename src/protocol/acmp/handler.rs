//! Connection management extension point.
//!
//! Recognizes ACMP commands addressed to this entity and answers them with
//! NOT_SUPPORTED; no stream connection state is kept.

use super::message::{AcmpPdu, AcmpStatus};
use crate::entity::EntityState;
use crate::protocol::codec::{AvtpSubtype, CodecError, EthernetHeader, classify_frame};

/// What [`AcmpHandler::handle`] did with a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcmpOutcome {
    /// Response frame to transmit (multicast).
    Responded(Vec<u8>),
    /// Malformed ACMP traffic.
    Malformed(CodecError),
    /// Not an ACMP frame.
    NotAcmp,
    /// Well-formed ACMP that this entity does not answer.
    Ignored,
}

/// Answers ACMP commands with NOT_SUPPORTED.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcmpHandler;

impl AcmpHandler {
    /// Create a handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Handle one raw Ethernet frame.
    #[must_use]
    pub fn handle(&self, frame: &[u8], entity: &EntityState) -> AcmpOutcome {
        match classify_frame(frame) {
            Ok((_, Some(AvtpSubtype::Acmp))) => {}
            Ok(_) | Err(CodecError::UnexpectedEtherType(_)) => return AcmpOutcome::NotAcmp,
            Err(e) => return AcmpOutcome::Malformed(e),
        }

        let command = match AcmpPdu::decode(&frame[EthernetHeader::SIZE..]) {
            Ok(pdu) => pdu,
            Err(e) => {
                tracing::debug!("Dropping malformed ACMPDU: {}", e);
                return AcmpOutcome::Malformed(e);
            }
        };

        let entity_id = entity.entity_id();
        let ours = (command.message_type.is_talker_command() && command.talker_entity_id == entity_id)
            || (command.message_type.is_listener_command() && command.listener_entity_id == entity_id);
        if !ours {
            tracing::trace!("Ignoring ACMP {}", command.message_type);
            return AcmpOutcome::Ignored;
        }

        tracing::debug!(
            sequence_id = command.sequence_id,
            "ACMP {} from controller 0x{:016X}: not supported",
            command.message_type,
            command.controller_entity_id
        );
        let response = AcmpPdu {
            message_type: command.message_type.response(),
            status: AcmpStatus::NOT_SUPPORTED,
            ..command
        };
        AcmpOutcome::Responded(response.encode_frame(entity.mac()))
    }
}
