use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::aem::{Capabilities, NAME_LENGTH};
use crate::protocol::codec::reader::truncate_utf8;
use crate::types::MacAddress;

/// Longest validity an ADP advertisement can carry.
pub const MAX_VALID_TIME: Duration = Duration::from_secs(62);

/// Default vendor OUI used for entity id derivation.
pub const DEFAULT_VENDOR_OUI: u32 = 0x00_1B_21;

/// AAF PCM 48 kHz, 8 channels, 32-bit samples (a common Milan base format).
pub const DEFAULT_STREAM_FORMAT: u64 = 0x0205_0220_0040_0800;

/// Most formats a single stream may list.
pub const MAX_STREAM_FORMATS: usize = 64;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `valid_time` is zero, odd, or above 62 seconds.
    #[error("valid time must be an even number of seconds in 2..=62, got {0:?}")]
    InvalidValidTime(Duration),

    /// `advertise_interval` is zero.
    #[error("advertise interval must be non-zero")]
    ZeroInterval,

    /// `poll_timeout` is not shorter than `advertise_interval`.
    #[error("poll timeout {poll:?} must be shorter than the advertise interval {interval:?}")]
    PollTimeout {
        /// Configured poll timeout.
        poll: Duration,
        /// Configured advertise interval.
        interval: Duration,
    },

    /// `persist_interval` is zero.
    #[error("persist interval must be non-zero when set")]
    ZeroPersistInterval,

    /// Vendor OUI does not fit in 24 bits.
    #[error("vendor OUI 0x{0:X} does not fit in 24 bits")]
    InvalidOui(u32),

    /// No AVB interface is configured.
    #[error("at least one AVB interface is required")]
    NoAvbInterface,

    /// Too many streams for a 16-bit count.
    #[error("too many {kind} streams: {count}")]
    TooManyStreams {
        /// `input` or `output`.
        kind: &'static str,
        /// Configured count.
        count: usize,
    },

    /// A stream lists more formats than fit in one READ_DESCRIPTOR response.
    #[error("stream {name:?} lists {count} formats, at most {MAX_STREAM_FORMATS} allowed")]
    TooManyFormats {
        /// Stream name.
        name: String,
        /// Number of formats.
        count: usize,
    },

    /// Reading or writing the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for this schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stream input or output exposed by the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Stream name (at most 64 bytes on the wire).
    pub name: String,
    /// Current stream format.
    pub format: u64,
    /// Additional supported formats.
    #[serde(default)]
    pub alternate_formats: Vec<u64>,
    /// Buffer length in nanoseconds.
    #[serde(default = "default_buffer_length")]
    pub buffer_length_ns: u32,
}

fn default_buffer_length() -> u32 {
    2_000_000
}

impl StreamConfig {
    /// A stream with the default format.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: DEFAULT_STREAM_FORMAT,
            alternate_formats: Vec::new(),
            buffer_length_ns: default_buffer_length(),
        }
    }

    /// Every format the stream supports, current one first.
    #[must_use]
    pub fn all_formats(&self) -> Vec<u64> {
        let mut formats = vec![self.format];
        formats.extend(self.alternate_formats.iter().filter(|f| **f != self.format));
        formats
    }
}

/// An AVB interface of the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvbInterfaceConfig {
    /// Interface name as shown to controllers.
    pub name: String,
    /// Hardware address; defaults to the transport's MAC.
    #[serde(default)]
    pub mac_address: Option<MacAddress>,
    /// gPTP clock identity; defaults to the EUI-64 of the MAC.
    #[serde(default)]
    pub clock_identity: Option<u64>,
    /// gPTP port number.
    #[serde(default = "default_port_number")]
    pub port_number: u16,
}

fn default_port_number() -> u16 {
    1
}

impl AvbInterfaceConfig {
    /// An interface that inherits MAC and clock identity from the entity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mac_address: None,
            clock_identity: None,
            port_number: default_port_number(),
        }
    }
}

/// Configuration of an AVDECC entity.
///
/// Serialized as JSON; durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Network interface to bind (e.g. `eth0`).
    pub interface: String,

    /// Override for the interface MAC (otherwise read from the transport).
    pub mac_address: Option<MacAddress>,

    /// 24-bit vendor OUI placed in the top of the entity id.
    pub vendor_oui: u32,

    /// Explicit entity id, bypassing derivation from OUI and MAC.
    pub entity_id: Option<u64>,

    /// Entity model id (default: `0x001B_2100_0000_0001`)
    pub entity_model_id: u64,

    /// Entity name (default: host name)
    pub entity_name: String,

    /// Firmware version string.
    pub firmware_version: String,

    /// Group name.
    pub group_name: String,

    /// Serial number.
    pub serial_number: String,

    /// Capabilities; derived from the stream lists when absent.
    pub capabilities: Option<Capabilities>,

    /// Stream inputs (listener sinks).
    pub stream_inputs: Vec<StreamConfig>,

    /// Stream outputs (talker sources).
    pub stream_outputs: Vec<StreamConfig>,

    /// AVB interfaces; at least one.
    pub avb_interfaces: Vec<AvbInterfaceConfig>,

    /// gPTP grandmaster id advertised in ADP.
    pub gptp_grandmaster_id: u64,

    /// gPTP domain number.
    pub gptp_domain_number: u8,

    /// Association id.
    pub association_id: u64,

    /// Interval between ENTITY_AVAILABLE advertisements (default: 2 seconds)
    #[serde(with = "duration_ms")]
    pub advertise_interval: Duration,

    /// Validity carried in advertisements (default: 62 seconds)
    #[serde(with = "duration_ms")]
    pub valid_time: Duration,

    /// Receive timeout per loop iteration (default: 100ms)
    #[serde(with = "duration_ms")]
    pub poll_timeout: Duration,

    /// Interval for persisting the available index (None = shutdown only)
    #[serde(with = "option_duration_ms")]
    pub persist_interval: Option<Duration>,

    /// File holding the last available index (None = in memory only)
    pub available_index_path: Option<PathBuf>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            interface: "eth0".to_string(),
            mac_address: None,
            vendor_oui: DEFAULT_VENDOR_OUI,
            entity_id: None,
            entity_model_id: 0x001B_2100_0000_0001,
            entity_name: default_entity_name(),
            firmware_version: env!("CARGO_PKG_VERSION").to_string(),
            group_name: String::new(),
            serial_number: String::new(),
            capabilities: None,
            stream_inputs: vec![StreamConfig::new("Input 1")],
            stream_outputs: vec![StreamConfig::new("Output 1")],
            avb_interfaces: vec![AvbInterfaceConfig::new("AVB Interface")],
            gptp_grandmaster_id: 0,
            gptp_domain_number: 0,
            association_id: 0,
            advertise_interval: Duration::from_secs(2),
            valid_time: MAX_VALID_TIME,
            poll_timeout: Duration::from_millis(100),
            persist_interval: None,
            available_index_path: None,
        }
    }
}

fn default_entity_name() -> String {
    hostname::get().map_or_else(
        |_| "avdecc-entity".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}

impl EntityConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> EntityConfigBuilder {
        EntityConfigBuilder::default()
    }

    /// Load a config from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// the content fails validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validated()
    }

    /// Write the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if serialization or the write fails.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Capabilities to advertise.
    #[must_use]
    pub fn effective_capabilities(&self) -> Capabilities {
        self.capabilities.unwrap_or_else(|| {
            Capabilities::audio_endpoint(
                !self.stream_outputs.is_empty(),
                !self.stream_inputs.is_empty(),
            )
        })
    }

    /// Check ranges and truncate over-long names at a character boundary.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.valid_time.is_zero()
            || self.valid_time > MAX_VALID_TIME
            || self.valid_time.subsec_nanos() != 0
            || self.valid_time.as_secs() % 2 != 0
        {
            return Err(ConfigError::InvalidValidTime(self.valid_time));
        }
        if self.advertise_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.poll_timeout >= self.advertise_interval {
            return Err(ConfigError::PollTimeout {
                poll: self.poll_timeout,
                interval: self.advertise_interval,
            });
        }
        if self.persist_interval.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::ZeroPersistInterval);
        }
        if self.vendor_oui > 0x00FF_FFFF {
            return Err(ConfigError::InvalidOui(self.vendor_oui));
        }
        if self.avb_interfaces.is_empty() {
            return Err(ConfigError::NoAvbInterface);
        }
        for (kind, count) in [
            ("input", self.stream_inputs.len()),
            ("output", self.stream_outputs.len()),
        ] {
            if u16::try_from(count).is_err() {
                return Err(ConfigError::TooManyStreams { kind, count });
            }
        }
        for stream in self.stream_inputs.iter().chain(&self.stream_outputs) {
            let count = stream.all_formats().len();
            if count > MAX_STREAM_FORMATS {
                return Err(ConfigError::TooManyFormats {
                    name: stream.name.clone(),
                    count,
                });
            }
        }

        for name in [
            &mut self.entity_name,
            &mut self.firmware_version,
            &mut self.group_name,
            &mut self.serial_number,
        ] {
            truncate_name(name);
        }
        for stream in self.stream_inputs.iter_mut().chain(&mut self.stream_outputs) {
            truncate_name(&mut stream.name);
        }
        for interface in &mut self.avb_interfaces {
            truncate_name(&mut interface.name);
        }
        Ok(self)
    }
}

fn truncate_name(name: &mut String) {
    let len = truncate_utf8(name, NAME_LENGTH).len();
    name.truncate(len);
}

/// Builder for `EntityConfig`
#[derive(Debug, Clone, Default)]
pub struct EntityConfigBuilder {
    config: EntityConfig,
}

impl EntityConfigBuilder {
    /// Set the network interface
    #[must_use]
    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.config.interface = interface.into();
        self
    }

    /// Override the interface MAC address
    #[must_use]
    pub fn mac_address(mut self, mac: MacAddress) -> Self {
        self.config.mac_address = Some(mac);
        self
    }

    /// Set the vendor OUI used for entity id derivation
    #[must_use]
    pub fn vendor_oui(mut self, oui: u32) -> Self {
        self.config.vendor_oui = oui;
        self
    }

    /// Use an explicit entity id
    #[must_use]
    pub fn entity_id(mut self, entity_id: u64) -> Self {
        self.config.entity_id = Some(entity_id);
        self
    }

    /// Set the entity model id
    #[must_use]
    pub fn entity_model_id(mut self, model_id: u64) -> Self {
        self.config.entity_model_id = model_id;
        self
    }

    /// Set the entity name
    #[must_use]
    pub fn entity_name(mut self, name: impl Into<String>) -> Self {
        self.config.entity_name = name.into();
        self
    }

    /// Set the firmware version
    #[must_use]
    pub fn firmware_version(mut self, version: impl Into<String>) -> Self {
        self.config.firmware_version = version.into();
        self
    }

    /// Set the group name
    #[must_use]
    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.config.group_name = name.into();
        self
    }

    /// Set the serial number
    #[must_use]
    pub fn serial_number(mut self, serial: impl Into<String>) -> Self {
        self.config.serial_number = serial.into();
        self
    }

    /// Set explicit capabilities
    #[must_use]
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.config.capabilities = Some(capabilities);
        self
    }

    /// Replace the stream inputs
    #[must_use]
    pub fn stream_inputs(mut self, streams: Vec<StreamConfig>) -> Self {
        self.config.stream_inputs = streams;
        self
    }

    /// Replace the stream outputs
    #[must_use]
    pub fn stream_outputs(mut self, streams: Vec<StreamConfig>) -> Self {
        self.config.stream_outputs = streams;
        self
    }

    /// Replace the AVB interfaces
    #[must_use]
    pub fn avb_interfaces(mut self, interfaces: Vec<AvbInterfaceConfig>) -> Self {
        self.config.avb_interfaces = interfaces;
        self
    }

    /// Set the gPTP grandmaster id and domain
    #[must_use]
    pub fn gptp(mut self, grandmaster_id: u64, domain_number: u8) -> Self {
        self.config.gptp_grandmaster_id = grandmaster_id;
        self.config.gptp_domain_number = domain_number;
        self
    }

    /// Set the advertisement interval
    #[must_use]
    pub fn advertise_interval(mut self, interval: Duration) -> Self {
        self.config.advertise_interval = interval;
        self
    }

    /// Set the advertised validity
    #[must_use]
    pub fn valid_time(mut self, valid_time: Duration) -> Self {
        self.config.valid_time = valid_time;
        self
    }

    /// Set the receive poll timeout
    #[must_use]
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.config.poll_timeout = timeout;
        self
    }

    /// Persist the available index periodically
    #[must_use]
    pub fn persist_interval(mut self, interval: Duration) -> Self {
        self.config.persist_interval = Some(interval);
        self
    }

    /// Set the available index file
    #[must_use]
    pub fn available_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.available_index_path = Some(path.into());
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is out of range.
    pub fn build(self) -> Result<EntityConfig, ConfigError> {
        self.config.validated()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod option_duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation, clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|v| v.map(Duration::from_millis))
    }
}
