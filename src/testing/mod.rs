//! Test doubles for driving an entity without a network.
//!
//! [`MockTransport`] stands in for the raw socket, [`ManualClock`] for the
//! monotonic clock, and [`frames`] builds the controller side of each
//! conversation.

pub mod clock;
pub mod frames;
pub mod mock_transport;

pub use clock::ManualClock;
pub use mock_transport::MockTransport;

use crate::entity::{EntityState, MemoryIndexStore};
use crate::protocol::aem::TreeError;
use crate::types::{EntityConfig, MacAddress};

/// MAC used by test entities.
pub const ENTITY_MAC: MacAddress = MacAddress::new([0x00, 0x1B, 0x21, 0x12, 0x34, 0x56]);

/// MAC used by simulated controllers.
pub const CONTROLLER_MAC: MacAddress = MacAddress::new([0x02, 0x00, 0x00, 0xAA, 0xBB, 0xCC]);

/// Entity id used by simulated controllers.
pub const CONTROLLER_ENTITY_ID: u64 = 0x0200_00FF_FEAA_BBCC;

/// Entity config with fixed names and the [`ENTITY_MAC`] address.
#[must_use]
pub fn entity_config() -> EntityConfig {
    EntityConfig {
        interface: "test0".to_string(),
        mac_address: Some(ENTITY_MAC),
        entity_name: "Test entity".to_string(),
        firmware_version: "1.0.0".to_string(),
        serial_number: "TEST-0001".to_string(),
        ..EntityConfig::default()
    }
}

/// Entity for `config` backed by `store`.
///
/// # Errors
///
/// Returns [`TreeError`] if `config` describes an inconsistent tree.
pub async fn entity_state(
    config: &EntityConfig,
    store: MemoryIndexStore,
) -> Result<EntityState, TreeError> {
    EntityState::with_store(config, ENTITY_MAC, Box::new(store)).await
}
