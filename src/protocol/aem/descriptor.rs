//! AEM descriptor records and their wire encoding.
//!
//! Each record is the IEEE 1722.1 descriptor body followed by a 32-bit
//! checksum (see [`super::checksum`]). Name fields are 64-byte NUL-padded
//! UTF-8.

use super::capabilities::{
    ControllerCapabilities, EntityCapabilities, ListenerCapabilities, TalkerCapabilities,
};
use super::checksum::{self, CHECKSUM_SIZE};
use crate::protocol::codec::{CodecError, WireReader, WireWriter};
use crate::types::MacAddress;

/// Size of every name field in a descriptor.
pub const NAME_LENGTH: usize = 64;

/// Localized string reference meaning "no string".
pub const NO_STRING: u16 = 0xFFFF;

/// AEM descriptor type code (IEEE 1722.1 Table 7.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorType(pub u16);

impl DescriptorType {
    /// ENTITY.
    pub const ENTITY: Self = Self(0x0000);
    /// CONFIGURATION.
    pub const CONFIGURATION: Self = Self(0x0001);
    /// AUDIO_UNIT.
    pub const AUDIO_UNIT: Self = Self(0x0002);
    /// VIDEO_UNIT.
    pub const VIDEO_UNIT: Self = Self(0x0003);
    /// SENSOR_UNIT.
    pub const SENSOR_UNIT: Self = Self(0x0004);
    /// STREAM_INPUT.
    pub const STREAM_INPUT: Self = Self(0x0005);
    /// STREAM_OUTPUT.
    pub const STREAM_OUTPUT: Self = Self(0x0006);
    /// JACK_INPUT.
    pub const JACK_INPUT: Self = Self(0x0007);
    /// JACK_OUTPUT.
    pub const JACK_OUTPUT: Self = Self(0x0008);
    /// AVB_INTERFACE.
    pub const AVB_INTERFACE: Self = Self(0x0009);
    /// CLOCK_SOURCE.
    pub const CLOCK_SOURCE: Self = Self(0x000A);
    /// MEMORY_OBJECT.
    pub const MEMORY_OBJECT: Self = Self(0x000B);
    /// LOCALE.
    pub const LOCALE: Self = Self(0x000C);
    /// STRINGS.
    pub const STRINGS: Self = Self(0x000D);
    /// STREAM_PORT_INPUT.
    pub const STREAM_PORT_INPUT: Self = Self(0x000E);
    /// STREAM_PORT_OUTPUT.
    pub const STREAM_PORT_OUTPUT: Self = Self(0x000F);
    /// EXTERNAL_PORT_INPUT.
    pub const EXTERNAL_PORT_INPUT: Self = Self(0x0010);
    /// EXTERNAL_PORT_OUTPUT.
    pub const EXTERNAL_PORT_OUTPUT: Self = Self(0x0011);
    /// INTERNAL_PORT_INPUT.
    pub const INTERNAL_PORT_INPUT: Self = Self(0x0012);
    /// INTERNAL_PORT_OUTPUT.
    pub const INTERNAL_PORT_OUTPUT: Self = Self(0x0013);
    /// AUDIO_CLUSTER.
    pub const AUDIO_CLUSTER: Self = Self(0x0014);
    /// VIDEO_CLUSTER.
    pub const VIDEO_CLUSTER: Self = Self(0x0015);
    /// SENSOR_CLUSTER.
    pub const SENSOR_CLUSTER: Self = Self(0x0016);
    /// AUDIO_MAP.
    pub const AUDIO_MAP: Self = Self(0x0017);
    /// VIDEO_MAP.
    pub const VIDEO_MAP: Self = Self(0x0018);
    /// SENSOR_MAP.
    pub const SENSOR_MAP: Self = Self(0x0019);
    /// CONTROL.
    pub const CONTROL: Self = Self(0x001A);
    /// SIGNAL_SELECTOR.
    pub const SIGNAL_SELECTOR: Self = Self(0x001B);
    /// MIXER.
    pub const MIXER: Self = Self(0x001C);
    /// MATRIX.
    pub const MATRIX: Self = Self(0x001D);
    /// MATRIX_SIGNAL.
    pub const MATRIX_SIGNAL: Self = Self(0x001E);
    /// SIGNAL_SPLITTER.
    pub const SIGNAL_SPLITTER: Self = Self(0x001F);
    /// SIGNAL_COMBINER.
    pub const SIGNAL_COMBINER: Self = Self(0x0020);
    /// SIGNAL_DEMULTIPLEXER.
    pub const SIGNAL_DEMULTIPLEXER: Self = Self(0x0021);
    /// SIGNAL_MULTIPLEXER.
    pub const SIGNAL_MULTIPLEXER: Self = Self(0x0022);
    /// SIGNAL_TRANSCODER.
    pub const SIGNAL_TRANSCODER: Self = Self(0x0023);
    /// CLOCK_DOMAIN.
    pub const CLOCK_DOMAIN: Self = Self(0x0024);
    /// CONTROL_BLOCK.
    pub const CONTROL_BLOCK: Self = Self(0x0025);
    /// INVALID.
    pub const INVALID: Self = Self(0xFFFF);

    /// Name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self.0 {
            0x0000 => "ENTITY",
            0x0001 => "CONFIGURATION",
            0x0002 => "AUDIO_UNIT",
            0x0003 => "VIDEO_UNIT",
            0x0004 => "SENSOR_UNIT",
            0x0005 => "STREAM_INPUT",
            0x0006 => "STREAM_OUTPUT",
            0x0007 => "JACK_INPUT",
            0x0008 => "JACK_OUTPUT",
            0x0009 => "AVB_INTERFACE",
            0x000A => "CLOCK_SOURCE",
            0x000B => "MEMORY_OBJECT",
            0x000C => "LOCALE",
            0x000D => "STRINGS",
            0x000E => "STREAM_PORT_INPUT",
            0x000F => "STREAM_PORT_OUTPUT",
            0x0010 => "EXTERNAL_PORT_INPUT",
            0x0011 => "EXTERNAL_PORT_OUTPUT",
            0x0012 => "INTERNAL_PORT_INPUT",
            0x0013 => "INTERNAL_PORT_OUTPUT",
            0x0014 => "AUDIO_CLUSTER",
            0x0015 => "VIDEO_CLUSTER",
            0x0016 => "SENSOR_CLUSTER",
            0x0017 => "AUDIO_MAP",
            0x0018 => "VIDEO_MAP",
            0x0019 => "SENSOR_MAP",
            0x001A => "CONTROL",
            0x001B => "SIGNAL_SELECTOR",
            0x001C => "MIXER",
            0x001D => "MATRIX",
            0x001E => "MATRIX_SIGNAL",
            0x001F => "SIGNAL_SPLITTER",
            0x0020 => "SIGNAL_COMBINER",
            0x0021 => "SIGNAL_DEMULTIPLEXER",
            0x0022 => "SIGNAL_MULTIPLEXER",
            0x0023 => "SIGNAL_TRANSCODER",
            0x0024 => "CLOCK_DOMAIN",
            0x0025 => "CONTROL_BLOCK",
            0xFFFF => "INVALID",
            _ => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DescriptorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(0x{:04X})", self.name(), self.0)
    }
}

/// ENTITY descriptor (IEEE 1722.1 clause 7.2.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Entity id.
    pub entity_id: u64,
    /// Entity model id.
    pub entity_model_id: u64,
    /// Entity capabilities.
    pub entity_capabilities: EntityCapabilities,
    /// Number of stream outputs.
    pub talker_stream_sources: u16,
    /// Talker capabilities.
    pub talker_capabilities: TalkerCapabilities,
    /// Number of stream inputs.
    pub listener_stream_sinks: u16,
    /// Listener capabilities.
    pub listener_capabilities: ListenerCapabilities,
    /// Controller capabilities.
    pub controller_capabilities: ControllerCapabilities,
    /// Current available index.
    pub available_index: u32,
    /// Association id.
    pub association_id: u64,
    /// Entity name.
    pub entity_name: String,
    /// Localized string reference for the vendor name.
    pub vendor_name_string: u16,
    /// Localized string reference for the model name.
    pub model_name_string: u16,
    /// Firmware version.
    pub firmware_version: String,
    /// Group name.
    pub group_name: String,
    /// Serial number.
    pub serial_number: String,
    /// Number of CONFIGURATION descriptors.
    pub configurations_count: u16,
    /// Index of the active configuration.
    pub current_configuration: u16,
}

impl EntityDescriptor {
    /// Body size without checksum.
    pub const BODY_SIZE: usize = 312;

    fn write_body(&self, w: &mut WireWriter) {
        w.put_u16(DescriptorType::ENTITY.0);
        w.put_u16(0);
        w.put_u64(self.entity_id);
        w.put_u64(self.entity_model_id);
        w.put_u32(self.entity_capabilities.raw());
        w.put_u16(self.talker_stream_sources);
        w.put_u16(self.talker_capabilities.raw());
        w.put_u16(self.listener_stream_sinks);
        w.put_u16(self.listener_capabilities.raw());
        w.put_u32(self.controller_capabilities.raw());
        w.put_u32(self.available_index);
        w.put_u64(self.association_id);
        w.put_fixed_str(&self.entity_name, NAME_LENGTH);
        w.put_u16(self.vendor_name_string);
        w.put_u16(self.model_name_string);
        w.put_fixed_str(&self.firmware_version, NAME_LENGTH);
        w.put_fixed_str(&self.group_name, NAME_LENGTH);
        w.put_fixed_str(&self.serial_number, NAME_LENGTH);
        w.put_u16(self.configurations_count);
        w.put_u16(self.current_configuration);
    }

    fn read_body(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        r.require(Self::BODY_SIZE)?;
        Ok(Self {
            entity_id: r.read_u64()?,
            entity_model_id: r.read_u64()?,
            entity_capabilities: EntityCapabilities::from_raw(r.read_u32()?),
            talker_stream_sources: r.read_u16()?,
            talker_capabilities: TalkerCapabilities::from_raw(r.read_u16()?),
            listener_stream_sinks: r.read_u16()?,
            listener_capabilities: ListenerCapabilities::from_raw(r.read_u16()?),
            controller_capabilities: ControllerCapabilities::from_raw(r.read_u32()?),
            available_index: r.read_u32()?,
            association_id: r.read_u64()?,
            entity_name: r.read_fixed_str("entity_name", NAME_LENGTH)?,
            vendor_name_string: r.read_u16()?,
            model_name_string: r.read_u16()?,
            firmware_version: r.read_fixed_str("firmware_version", NAME_LENGTH)?,
            group_name: r.read_fixed_str("group_name", NAME_LENGTH)?,
            serial_number: r.read_fixed_str("serial_number", NAME_LENGTH)?,
            configurations_count: r.read_u16()?,
            current_configuration: r.read_u16()?,
        })
    }
}

/// One row of a CONFIGURATION descriptor's count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorCount {
    /// Descriptor type being counted.
    pub descriptor_type: DescriptorType,
    /// Number of descriptors of that type in the configuration.
    pub count: u16,
}

/// CONFIGURATION descriptor (IEEE 1722.1 clause 7.2.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationDescriptor {
    /// Descriptor index.
    pub descriptor_index: u16,
    /// Configuration name.
    pub object_name: String,
    /// Localized description reference.
    pub localized_description: u16,
    /// Top-level descriptor counts.
    pub descriptor_counts: Vec<DescriptorCount>,
}

impl ConfigurationDescriptor {
    /// Offset of the count table from the start of the record.
    pub const COUNTS_OFFSET: u16 = 74;

    fn write_body(&self, w: &mut WireWriter) {
        w.put_u16(DescriptorType::CONFIGURATION.0);
        w.put_u16(self.descriptor_index);
        w.put_fixed_str(&self.object_name, NAME_LENGTH);
        w.put_u16(self.localized_description);
        w.put_u16(len_u16(self.descriptor_counts.len()));
        w.put_u16(Self::COUNTS_OFFSET);
        for row in &self.descriptor_counts {
            w.put_u16(row.descriptor_type.0);
            w.put_u16(row.count);
        }
    }

    fn read_body(r: &mut WireReader<'_>, descriptor_index: u16) -> Result<Self, CodecError> {
        r.require(usize::from(Self::COUNTS_OFFSET))?;
        let object_name = r.read_fixed_str("object_name", NAME_LENGTH)?;
        let localized_description = r.read_u16()?;
        let count = r.read_u16()?;
        let offset = r.read_u16()?;
        seek_to(r, offset)?;
        let descriptor_counts = (0..count)
            .map(|_| {
                Ok(DescriptorCount {
                    descriptor_type: DescriptorType(r.read_u16()?),
                    count: r.read_u16()?,
                })
            })
            .collect::<Result<Vec<_>, CodecError>>()?;
        Ok(Self {
            descriptor_index,
            object_name,
            localized_description,
            descriptor_counts,
        })
    }

    /// Count recorded for `descriptor_type`, zero when absent.
    #[must_use]
    pub fn count_of(&self, descriptor_type: DescriptorType) -> u16 {
        self.descriptor_counts
            .iter()
            .filter(|row| row.descriptor_type == descriptor_type)
            .map(|row| row.count)
            .sum()
    }
}

/// `stream_flags` bits of a STREAM_INPUT/STREAM_OUTPUT descriptor.
pub mod stream_flags {
    /// Stream can be used as a clock synchronization source.
    pub const CLOCK_SYNC_SOURCE: u16 = 0x0001;
    /// Supports SR class A.
    pub const CLASS_A: u16 = 0x0002;
    /// Supports SR class B.
    pub const CLASS_B: u16 = 0x0004;
    /// Supports encrypted streams.
    pub const SUPPORTS_ENCRYPTED: u16 = 0x0008;
    /// Primary backup talker fields are supported.
    pub const PRIMARY_BACKUP_SUPPORTED: u16 = 0x0010;
    /// Primary backup talker fields are valid.
    pub const PRIMARY_BACKUP_VALID: u16 = 0x0020;
}

/// Backup talker reference inside a stream descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackupTalker {
    /// Talker entity id.
    pub entity_id: u64,
    /// Talker unique (stream) id.
    pub unique_id: u16,
}

/// STREAM_INPUT / STREAM_OUTPUT descriptor (IEEE 1722.1 clause 7.2.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Descriptor index.
    pub descriptor_index: u16,
    /// Stream name.
    pub object_name: String,
    /// Localized description reference.
    pub localized_description: u16,
    /// CLOCK_DOMAIN descriptor this stream belongs to.
    pub clock_domain_index: u16,
    /// See [`stream_flags`].
    pub stream_flags: u16,
    /// Current stream format.
    pub current_format: u64,
    /// Supported stream formats.
    pub formats: Vec<u64>,
    /// Backup talkers 0-2.
    pub backup_talkers: [BackupTalker; 3],
    /// Talker this stream is a backup of.
    pub backedup_talker: BackupTalker,
    /// AVB_INTERFACE descriptor the stream is carried on.
    pub avb_interface_index: u16,
    /// Buffer length in nanoseconds.
    pub buffer_length: u32,
}

impl StreamDescriptor {
    /// Offset of the format table from the start of the record.
    pub const FORMATS_OFFSET: u16 = 132;

    fn write_body(&self, w: &mut WireWriter, descriptor_type: DescriptorType) {
        w.put_u16(descriptor_type.0);
        w.put_u16(self.descriptor_index);
        w.put_fixed_str(&self.object_name, NAME_LENGTH);
        w.put_u16(self.localized_description);
        w.put_u16(self.clock_domain_index);
        w.put_u16(self.stream_flags);
        w.put_u64(self.current_format);
        w.put_u16(Self::FORMATS_OFFSET);
        w.put_u16(len_u16(self.formats.len()));
        for talker in self.backup_talkers.iter().chain(std::iter::once(&self.backedup_talker)) {
            w.put_u64(talker.entity_id);
            w.put_u16(talker.unique_id);
        }
        w.put_u16(self.avb_interface_index);
        w.put_u32(self.buffer_length);
        for format in &self.formats {
            w.put_u64(*format);
        }
    }

    fn read_body(r: &mut WireReader<'_>, descriptor_index: u16) -> Result<Self, CodecError> {
        r.require(usize::from(Self::FORMATS_OFFSET))?;
        let object_name = r.read_fixed_str("object_name", NAME_LENGTH)?;
        let localized_description = r.read_u16()?;
        let clock_domain_index = r.read_u16()?;
        let stream_flags = r.read_u16()?;
        let current_format = r.read_u64()?;
        let formats_offset = r.read_u16()?;
        let number_of_formats = r.read_u16()?;
        let mut talkers = [BackupTalker::default(); 4];
        for talker in &mut talkers {
            talker.entity_id = r.read_u64()?;
            talker.unique_id = r.read_u16()?;
        }
        let avb_interface_index = r.read_u16()?;
        let buffer_length = r.read_u32()?;
        seek_to(r, formats_offset)?;
        let formats = (0..number_of_formats)
            .map(|_| r.read_u64())
            .collect::<Result<Vec<_>, CodecError>>()?;
        Ok(Self {
            descriptor_index,
            object_name,
            localized_description,
            clock_domain_index,
            stream_flags,
            current_format,
            formats,
            backup_talkers: [talkers[0], talkers[1], talkers[2]],
            backedup_talker: talkers[3],
            avb_interface_index,
            buffer_length,
        })
    }
}

/// AVB_INTERFACE descriptor (IEEE 1722.1 clause 7.2.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvbInterfaceDescriptor {
    /// Descriptor index.
    pub descriptor_index: u16,
    /// Interface name.
    pub object_name: String,
    /// Localized description reference.
    pub localized_description: u16,
    /// Interface MAC address.
    pub mac_address: MacAddress,
    /// Interface flags.
    pub interface_flags: u16,
    /// gPTP clock identity of the interface.
    pub clock_identity: u64,
    /// gPTP priority1.
    pub priority1: u8,
    /// gPTP clock class.
    pub clock_class: u8,
    /// gPTP offset scaled log variance.
    pub offset_scaled_log_variance: u16,
    /// gPTP clock accuracy.
    pub clock_accuracy: u8,
    /// gPTP priority2.
    pub priority2: u8,
    /// gPTP domain number.
    pub domain_number: u8,
    /// Log2 of the sync interval.
    pub log_sync_interval: i8,
    /// Log2 of the announce interval.
    pub log_announce_interval: i8,
    /// Log2 of the pdelay interval.
    pub log_pdelay_interval: i8,
    /// gPTP port number.
    pub port_number: u16,
}

impl AvbInterfaceDescriptor {
    /// Body size without checksum.
    pub const BODY_SIZE: usize = 98;

    /// `interface_flags`: gPTP grandmaster is supported.
    pub const FLAG_GPTP_GRANDMASTER_SUPPORTED: u16 = 0x0001;
    /// `interface_flags`: gPTP is supported.
    pub const FLAG_GPTP_SUPPORTED: u16 = 0x0002;
    /// `interface_flags`: SRP is supported.
    pub const FLAG_SRP_SUPPORTED: u16 = 0x0004;

    #[allow(clippy::cast_sign_loss)]
    fn write_body(&self, w: &mut WireWriter) {
        w.put_u16(DescriptorType::AVB_INTERFACE.0);
        w.put_u16(self.descriptor_index);
        w.put_fixed_str(&self.object_name, NAME_LENGTH);
        w.put_u16(self.localized_description);
        w.put_slice(self.mac_address.as_bytes());
        w.put_u16(self.interface_flags);
        w.put_u64(self.clock_identity);
        w.put_u8(self.priority1);
        w.put_u8(self.clock_class);
        w.put_u16(self.offset_scaled_log_variance);
        w.put_u8(self.clock_accuracy);
        w.put_u8(self.priority2);
        w.put_u8(self.domain_number);
        w.put_u8(self.log_sync_interval as u8);
        w.put_u8(self.log_announce_interval as u8);
        w.put_u8(self.log_pdelay_interval as u8);
        w.put_u16(self.port_number);
    }

    #[allow(clippy::cast_possible_wrap)]
    fn read_body(r: &mut WireReader<'_>, descriptor_index: u16) -> Result<Self, CodecError> {
        r.require(Self::BODY_SIZE)?;
        Ok(Self {
            descriptor_index,
            object_name: r.read_fixed_str("object_name", NAME_LENGTH)?,
            localized_description: r.read_u16()?,
            mac_address: MacAddress::new(r.read_array()?),
            interface_flags: r.read_u16()?,
            clock_identity: r.read_u64()?,
            priority1: r.read_u8()?,
            clock_class: r.read_u8()?,
            offset_scaled_log_variance: r.read_u16()?,
            clock_accuracy: r.read_u8()?,
            priority2: r.read_u8()?,
            domain_number: r.read_u8()?,
            log_sync_interval: r.read_u8()? as i8,
            log_announce_interval: r.read_u8()? as i8,
            log_pdelay_interval: r.read_u8()? as i8,
            port_number: r.read_u16()?,
        })
    }
}

/// A descriptor of one of the kinds this entity publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// The single ENTITY descriptor.
    Entity(EntityDescriptor),
    /// A CONFIGURATION descriptor.
    Configuration(ConfigurationDescriptor),
    /// A STREAM_INPUT descriptor.
    StreamInput(StreamDescriptor),
    /// A STREAM_OUTPUT descriptor.
    StreamOutput(StreamDescriptor),
    /// An AVB_INTERFACE descriptor.
    AvbInterface(AvbInterfaceDescriptor),
}

impl Descriptor {
    /// Descriptor type code.
    #[must_use]
    pub fn descriptor_type(&self) -> DescriptorType {
        match self {
            Self::Entity(_) => DescriptorType::ENTITY,
            Self::Configuration(_) => DescriptorType::CONFIGURATION,
            Self::StreamInput(_) => DescriptorType::STREAM_INPUT,
            Self::StreamOutput(_) => DescriptorType::STREAM_OUTPUT,
            Self::AvbInterface(_) => DescriptorType::AVB_INTERFACE,
        }
    }

    /// Descriptor index within its type.
    #[must_use]
    pub fn descriptor_index(&self) -> u16 {
        match self {
            Self::Entity(_) => 0,
            Self::Configuration(d) => d.descriptor_index,
            Self::StreamInput(d) | Self::StreamOutput(d) => d.descriptor_index,
            Self::AvbInterface(d) => d.descriptor_index,
        }
    }

    /// Encode the record, including its trailing checksum.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(EntityDescriptor::BODY_SIZE + CHECKSUM_SIZE);
        match self {
            Self::Entity(d) => d.write_body(&mut w),
            Self::Configuration(d) => d.write_body(&mut w),
            Self::StreamInput(d) => d.write_body(&mut w, DescriptorType::STREAM_INPUT),
            Self::StreamOutput(d) => d.write_body(&mut w, DescriptorType::STREAM_OUTPUT),
            Self::AvbInterface(d) => d.write_body(&mut w),
        }
        w.put_zeros(CHECKSUM_SIZE);
        let mut record = w.into_inner();
        checksum::seal(&mut record);
        record
    }

    /// Decode a record and verify its checksum.
    ///
    /// Bytes after the checksum are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] for truncated records,
    /// [`CodecError::UnsupportedDescriptor`] for kinds without a decoder,
    /// [`CodecError::InvalidDescriptorIndex`] for an ENTITY record not at
    /// index 0 and
    /// [`CodecError::ChecksumMismatch`] when the checksum does not verify.
    pub fn decode(record: &[u8]) -> Result<Self, CodecError> {
        let mut r = WireReader::new("descriptor", record);
        let descriptor_type = DescriptorType(r.read_u16()?);
        let descriptor_index = r.read_u16()?;
        let descriptor = match descriptor_type {
            DescriptorType::ENTITY => {
                if descriptor_index != 0 {
                    return Err(CodecError::InvalidDescriptorIndex {
                        descriptor_type: descriptor_type.0,
                        index: descriptor_index,
                    });
                }
                Self::Entity(EntityDescriptor::read_body(&mut r)?)
            }
            DescriptorType::CONFIGURATION => {
                Self::Configuration(ConfigurationDescriptor::read_body(&mut r, descriptor_index)?)
            }
            DescriptorType::STREAM_INPUT => {
                Self::StreamInput(StreamDescriptor::read_body(&mut r, descriptor_index)?)
            }
            DescriptorType::STREAM_OUTPUT => {
                Self::StreamOutput(StreamDescriptor::read_body(&mut r, descriptor_index)?)
            }
            DescriptorType::AVB_INTERFACE => {
                Self::AvbInterface(AvbInterfaceDescriptor::read_body(&mut r, descriptor_index)?)
            }
            other => return Err(CodecError::UnsupportedDescriptor(other.0)),
        };

        let record_len = r.position() + CHECKSUM_SIZE;
        r.skip(CHECKSUM_SIZE)?;
        let record = &record[..record_len];
        let computed = checksum::compute_checksum(record);
        let stored = checksum::stored_checksum(record).unwrap_or_default();
        if stored != computed {
            return Err(CodecError::ChecksumMismatch { stored, computed });
        }
        Ok(descriptor)
    }
}

fn seek_to(r: &mut WireReader<'_>, offset: u16) -> Result<(), CodecError> {
    let offset = usize::from(offset);
    let position = r.position();
    if offset < position {
        return Err(CodecError::too_short("descriptor table offset", position, offset));
    }
    r.skip(offset - position)
}

#[allow(clippy::cast_possible_truncation)]
fn len_u16(len: usize) -> u16 {
    len.min(usize::from(u16::MAX)) as u16
}
