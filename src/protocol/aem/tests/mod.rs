
use crate::protocol::aem::{
    AvbInterfaceDescriptor, BackupTalker, Capabilities, ConfigurationDescriptor, Descriptor,
    DescriptorCount, DescriptorType, EntityDescriptor, NO_STRING, StreamDescriptor, stream_flags,
};
use crate::types::MacAddress;

fn sample_entity() -> EntityDescriptor {
    let caps = Capabilities::audio_endpoint(true, true);
    EntityDescriptor {
        entity_id: 0x001B_21FF_FE12_3456,
        entity_model_id: 0x001B_2100_0000_0001,
        entity_capabilities: caps.entity,
        talker_stream_sources: 1,
        talker_capabilities: caps.talker,
        listener_stream_sinks: 1,
        listener_capabilities: caps.listener,
        controller_capabilities: caps.controller,
        available_index: 7,
        association_id: 0,
        entity_name: "Stage box".to_string(),
        vendor_name_string: NO_STRING,
        model_name_string: NO_STRING,
        firmware_version: "1.0.0".to_string(),
        group_name: String::new(),
        serial_number: "SN-0001".to_string(),
        configurations_count: 1,
        current_configuration: 0,
    }
}

fn sample_configuration() -> ConfigurationDescriptor {
    ConfigurationDescriptor {
        descriptor_index: 0,
        object_name: "Default".to_string(),
        localized_description: NO_STRING,
        descriptor_counts: vec![
            DescriptorCount {
                descriptor_type: DescriptorType::STREAM_INPUT,
                count: 1,
            },
            DescriptorCount {
                descriptor_type: DescriptorType::STREAM_OUTPUT,
                count: 1,
            },
            DescriptorCount {
                descriptor_type: DescriptorType::AVB_INTERFACE,
                count: 1,
            },
        ],
    }
}

fn sample_stream(index: u16) -> StreamDescriptor {
    StreamDescriptor {
        descriptor_index: index,
        object_name: format!("Stream {index}"),
        localized_description: NO_STRING,
        clock_domain_index: 0,
        stream_flags: stream_flags::CLASS_A,
        current_format: 0x0205_0220_0040_0800,
        formats: vec![0x0205_0220_0040_0800, 0x0205_0220_0020_0800],
        backup_talkers: [BackupTalker::default(); 3],
        backedup_talker: BackupTalker::default(),
        avb_interface_index: 0,
        buffer_length: 2_000_000,
    }
}

fn sample_avb_interface() -> AvbInterfaceDescriptor {
    AvbInterfaceDescriptor {
        descriptor_index: 0,
        object_name: "eth0".to_string(),
        localized_description: NO_STRING,
        mac_address: MacAddress::new([0x00, 0x1B, 0x21, 0x12, 0x34, 0x56]),
        interface_flags: AvbInterfaceDescriptor::FLAG_GPTP_SUPPORTED
            | AvbInterfaceDescriptor::FLAG_SRP_SUPPORTED,
        clock_identity: 0x001B_21FF_FE12_3456,
        priority1: 248,
        clock_class: 248,
        offset_scaled_log_variance: 0x4100,
        clock_accuracy: 0xFE,
        priority2: 248,
        domain_number: 0,
        log_sync_interval: -3,
        log_announce_interval: 0,
        log_pdelay_interval: 0,
        port_number: 1,
    }
}

fn sample_tree() -> crate::protocol::aem::DescriptorTree {
    let mut tree = crate::protocol::aem::DescriptorTree::new();
    tree.insert(Descriptor::Entity(sample_entity()));
    tree.insert(Descriptor::Configuration(sample_configuration()));
    tree.insert(Descriptor::StreamInput(sample_stream(0)));
    tree.insert(Descriptor::StreamOutput(sample_stream(0)));
    tree.insert(Descriptor::AvbInterface(sample_avb_interface()));
    tree
}
