//! Entity identity.

use crate::types::{EntityConfig, MacAddress};

/// Derive an entity id from a vendor OUI and an interface MAC.
///
/// EUI-64 mapping with the OUI substituted for the MAC's own:
/// `OUI[0..3] ++ FF FE ++ MAC[3..6]`.
#[must_use]
pub fn derive_entity_id(vendor_oui: u32, mac: MacAddress) -> u64 {
    let nic = mac.nic_specific();
    (u64::from(vendor_oui & 0x00FF_FFFF) << 40)
        | (0xFFFE_u64 << 24)
        | (u64::from(nic[0]) << 16)
        | (u64::from(nic[1]) << 8)
        | u64::from(nic[2])
}

/// EUI-64 of a MAC address (used as the default gPTP clock identity).
#[must_use]
pub fn mac_to_eui64(mac: MacAddress) -> u64 {
    let m = mac.as_bytes();
    u64::from_be_bytes([m[0], m[1], m[2], 0xFF, 0xFE, m[3], m[4], m[5]])
}

/// Who this entity is; fixed after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityIdentity {
    entity_id: u64,
    entity_model_id: u64,
    mac: MacAddress,
}

impl EntityIdentity {
    /// Identity with an explicit entity id.
    #[must_use]
    pub fn new(entity_id: u64, entity_model_id: u64, mac: MacAddress) -> Self {
        Self {
            entity_id,
            entity_model_id,
            mac,
        }
    }

    /// Identity for `config` on the interface with address `mac`.
    ///
    /// An explicit `entity_id` in the config wins over derivation.
    #[must_use]
    pub fn from_config(config: &EntityConfig, mac: MacAddress) -> Self {
        let entity_id = config
            .entity_id
            .unwrap_or_else(|| derive_entity_id(config.vendor_oui, mac));
        Self::new(entity_id, config.entity_model_id, mac)
    }

    /// Entity id.
    #[must_use]
    pub fn entity_id(&self) -> u64 {
        self.entity_id
    }

    /// Entity model id.
    #[must_use]
    pub fn entity_model_id(&self) -> u64 {
        self.entity_model_id
    }

    /// Interface MAC used as the source of every frame.
    #[must_use]
    pub fn mac(&self) -> MacAddress {
        self.mac
    }
}

impl std::fmt::Display for EntityIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:016X} ({})", self.entity_id, self.mac)
    }
}
