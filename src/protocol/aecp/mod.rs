//! AVDECC Enumeration and Control Protocol (IEEE 1722.1 clause 9).

pub mod message;
pub mod responder;

#[cfg(test)]
mod tests;

pub use message::{
    AecpHeader, AecpMessageType, AecpPdu, AecpStatus, AemCommandType, ReadDescriptorCommand,
    UNSOLICITED_BIT, read_descriptor_response_payload, split_read_descriptor_response,
};
pub use responder::{AecpResponder, DropReason, HandleOutcome, UNCONDITIONAL_SUCCESS};
