//! AVDECC Connection Management Protocol (IEEE 1722.1 clause 8).

pub mod handler;
pub mod message;

#[cfg(test)]
mod tests;

pub use handler::{AcmpHandler, AcmpOutcome};
pub use message::{AcmpMessageType, AcmpPdu, AcmpStatus};
