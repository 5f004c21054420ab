//! The entity's authoritative in-memory state.

use crate::protocol::adp::{AdpMessageType, AdpPdu};
use crate::protocol::aem::{
    AvbInterfaceDescriptor, BackupTalker, Capabilities, ConfigurationDescriptor, Descriptor,
    DescriptorCount, DescriptorTree, DescriptorType, EntityDescriptor, NO_STRING,
    StreamDescriptor, TreeError, stream_flags,
};
use crate::types::{EntityConfig, MacAddress, StreamConfig};

use super::identity::{EntityIdentity, mac_to_eui64};
use super::storage::{FileIndexStore, IndexStore, MemoryIndexStore, StorageError};

/// Identity, capabilities, available index and descriptor tree of this entity.
///
/// Owned by a single task; nothing in here is shared.
pub struct EntityState {
    identity: EntityIdentity,
    capabilities: Capabilities,
    available_index: u32,
    tree: DescriptorTree,
    gptp_grandmaster_id: u64,
    gptp_domain_number: u8,
    association_id: u64,
    store: Box<dyn IndexStore>,
}

impl std::fmt::Debug for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityState")
            .field("identity", &self.identity)
            .field("available_index", &self.available_index)
            .field("descriptors", &self.tree.len())
            .finish_non_exhaustive()
    }
}

impl EntityState {
    /// Build the entity for `config` on the interface with address `mac`.
    ///
    /// The available index is read from `config.available_index_path` (or
    /// kept in memory when unset). A missing or unreadable file falls back
    /// to a baseline of zero; either way the loaded value is incremented
    /// once so a restart never repeats an index.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] if the descriptor tree built from `config` is
    /// inconsistent.
    pub async fn load_or_create(config: &EntityConfig, mac: MacAddress) -> Result<Self, TreeError> {
        let store: Box<dyn IndexStore> = match &config.available_index_path {
            Some(path) => Box::new(FileIndexStore::new(path.clone())),
            None => Box::new(MemoryIndexStore::new()),
        };
        Self::with_store(config, mac, store).await
    }

    /// As [`load_or_create`](Self::load_or_create) with an explicit store.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] if the descriptor tree is inconsistent.
    pub async fn with_store(
        config: &EntityConfig,
        mac: MacAddress,
        store: Box<dyn IndexStore>,
    ) -> Result<Self, TreeError> {
        let identity = EntityIdentity::from_config(config, mac);
        let capabilities = config.effective_capabilities();
        let tree = build_tree(config, &identity, capabilities);
        tree.validate()?;

        let loaded = match store.load().await {
            Ok(Some(index)) => index,
            Ok(None) => {
                tracing::info!("No stored available index, starting from baseline");
                0
            }
            Err(e) => {
                tracing::warn!("Failed to load available index, starting from baseline: {}", e);
                0
            }
        };
        let available_index = loaded.wrapping_add(1);

        tracing::info!(
            entity_id = format_args!("0x{:016X}", identity.entity_id()),
            available_index,
            "Entity state ready for {}",
            identity
        );

        Ok(Self {
            identity,
            capabilities,
            available_index,
            tree,
            gptp_grandmaster_id: config.gptp_grandmaster_id,
            gptp_domain_number: config.gptp_domain_number,
            association_id: config.association_id,
            store,
        })
    }

    /// Identity.
    #[must_use]
    pub fn identity(&self) -> &EntityIdentity {
        &self.identity
    }

    /// Entity id.
    #[must_use]
    pub fn entity_id(&self) -> u64 {
        self.identity.entity_id()
    }

    /// Interface MAC.
    #[must_use]
    pub fn mac(&self) -> MacAddress {
        self.identity.mac()
    }

    /// Capabilities.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Current available index.
    #[must_use]
    pub fn available_index(&self) -> u32 {
        self.available_index
    }

    /// Advance the available index and return the new value.
    ///
    /// Call exactly once per advertisement actually built.
    pub fn next_available_index(&mut self) -> u32 {
        let next = self.available_index.wrapping_add(1);
        if next < self.available_index {
            tracing::warn!("Available index wrapped around to {}", next);
        }
        self.available_index = next;
        next
    }

    /// Write the current available index to the store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store rejects the write.
    pub async fn persist(&mut self) -> Result<(), StorageError> {
        self.store.save(self.available_index).await?;
        tracing::debug!("Persisted available index {}", self.available_index);
        Ok(())
    }

    /// Descriptor tree.
    #[must_use]
    pub fn tree(&self) -> &DescriptorTree {
        &self.tree
    }

    /// Look up a descriptor for a READ_DESCRIPTOR response.
    ///
    /// The ENTITY descriptor carries the current available index.
    #[must_use]
    pub fn find_descriptor(&self, descriptor_type: DescriptorType, index: u16) -> Option<Descriptor> {
        match self.tree.get(descriptor_type, index)? {
            Descriptor::Entity(entity) => Some(Descriptor::Entity(EntityDescriptor {
                available_index: self.available_index,
                ..entity.clone()
            })),
            other => Some(other.clone()),
        }
    }

    /// ADPDU describing this entity.
    #[must_use]
    pub fn adp_pdu(&self, message_type: AdpMessageType, valid_time: u8, available_index: u32) -> AdpPdu {
        AdpPdu {
            message_type,
            valid_time,
            entity_id: self.identity.entity_id(),
            entity_model_id: self.identity.entity_model_id(),
            capabilities: self.capabilities,
            talker_stream_sources: self.tree.count(DescriptorType::STREAM_OUTPUT),
            listener_stream_sinks: self.tree.count(DescriptorType::STREAM_INPUT),
            available_index,
            gptp_grandmaster_id: self.gptp_grandmaster_id,
            gptp_domain_number: self.gptp_domain_number,
            identify_control_index: 0,
            interface_index: 0,
            association_id: self.association_id,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn build_tree(config: &EntityConfig, identity: &EntityIdentity, capabilities: Capabilities) -> DescriptorTree {
    let inputs = config.stream_inputs.len() as u16;
    let outputs = config.stream_outputs.len() as u16;
    let interfaces = config.avb_interfaces.len() as u16;

    let mut tree = DescriptorTree::new();
    tree.insert(Descriptor::Entity(EntityDescriptor {
        entity_id: identity.entity_id(),
        entity_model_id: identity.entity_model_id(),
        entity_capabilities: capabilities.entity,
        talker_stream_sources: outputs,
        talker_capabilities: capabilities.talker,
        listener_stream_sinks: inputs,
        listener_capabilities: capabilities.listener,
        controller_capabilities: capabilities.controller,
        available_index: 0,
        association_id: config.association_id,
        entity_name: config.entity_name.clone(),
        vendor_name_string: NO_STRING,
        model_name_string: NO_STRING,
        firmware_version: config.firmware_version.clone(),
        group_name: config.group_name.clone(),
        serial_number: config.serial_number.clone(),
        configurations_count: 1,
        current_configuration: 0,
    }));

    let descriptor_counts = [
        (DescriptorType::STREAM_INPUT, inputs),
        (DescriptorType::STREAM_OUTPUT, outputs),
        (DescriptorType::AVB_INTERFACE, interfaces),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(descriptor_type, count)| DescriptorCount {
        descriptor_type,
        count,
    })
    .collect();
    tree.insert(Descriptor::Configuration(ConfigurationDescriptor {
        descriptor_index: 0,
        object_name: "Default".to_string(),
        localized_description: NO_STRING,
        descriptor_counts,
    }));

    for (index, stream) in (0u16..).zip(&config.stream_inputs) {
        tree.insert(Descriptor::StreamInput(stream_descriptor(index, stream)));
    }
    for (index, stream) in (0u16..).zip(&config.stream_outputs) {
        tree.insert(Descriptor::StreamOutput(stream_descriptor(index, stream)));
    }

    for (index, interface) in (0u16..).zip(&config.avb_interfaces) {
        let mac = interface.mac_address.unwrap_or_else(|| identity.mac());
        tree.insert(Descriptor::AvbInterface(AvbInterfaceDescriptor {
            descriptor_index: index,
            object_name: interface.name.clone(),
            localized_description: NO_STRING,
            mac_address: mac,
            interface_flags: AvbInterfaceDescriptor::FLAG_GPTP_SUPPORTED
                | AvbInterfaceDescriptor::FLAG_SRP_SUPPORTED,
            clock_identity: interface.clock_identity.unwrap_or_else(|| mac_to_eui64(mac)),
            priority1: 248,
            clock_class: 248,
            offset_scaled_log_variance: 0x436A,
            clock_accuracy: 0xFE,
            priority2: 248,
            domain_number: config.gptp_domain_number,
            log_sync_interval: -3,
            log_announce_interval: 0,
            log_pdelay_interval: 0,
            port_number: interface.port_number,
        }));
    }

    tree
}

fn stream_descriptor(index: u16, stream: &StreamConfig) -> StreamDescriptor {
    StreamDescriptor {
        descriptor_index: index,
        object_name: stream.name.clone(),
        localized_description: NO_STRING,
        clock_domain_index: 0,
        stream_flags: stream_flags::CLASS_A,
        current_format: stream.format,
        formats: stream.all_formats(),
        backup_talkers: [BackupTalker::default(); 3],
        backedup_talker: BackupTalker::default(),
        avb_interface_index: 0,
        buffer_length: stream.buffer_length_ns,
    }
}
