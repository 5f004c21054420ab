//! AVDECC Discovery Protocol (IEEE 1722.1 clause 6).
//!
//! Entities announce themselves with ENTITY_AVAILABLE every couple of
//! seconds, leave with ENTITY_DEPARTING and answer ENTITY_DISCOVER.

pub mod announcer;
pub mod message;


pub use announcer::{AdpAnnouncer, AdpEvent, AnnounceOutcome, AnnouncerState};
pub use message::{AdpMessageType, AdpPdu, valid_time_from_secs};
