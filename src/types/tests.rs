use super::*;
use std::time::Duration;

use tempfile::TempDir;

use crate::types::config::{DEFAULT_STREAM_FORMAT, DEFAULT_VENDOR_OUI, MAX_STREAM_FORMATS};

// --- config.rs tests ---

#[test]
fn test_config_defaults() {
    let config = EntityConfig::default();

    assert_eq!(config.interface, "eth0");
    assert_eq!(config.vendor_oui, DEFAULT_VENDOR_OUI);
    assert_eq!(config.advertise_interval, Duration::from_secs(2));
    assert_eq!(config.valid_time, Duration::from_secs(62));
    assert_eq!(config.poll_timeout, Duration::from_millis(100));
    assert!(config.persist_interval.is_none());
    assert!(config.available_index_path.is_none());
    assert_eq!(config.stream_inputs.len(), 1);
    assert_eq!(config.stream_outputs.len(), 1);
    assert_eq!(config.avb_interfaces.len(), 1);
    assert!(!config.entity_name.is_empty());
    assert!(config.clone().validated().is_ok());
}

#[test]
fn test_config_builder() {
    let path = std::path::PathBuf::from("/var/lib/avdecc/index");
    let config = EntityConfig::builder()
        .interface("enp3s0")
        .entity_name("Stage box")
        .serial_number("SB-17")
        .entity_id(0x0011_2233_4455_6677)
        .gptp(0x0011_22FF_FE33_4455, 1)
        .advertise_interval(Duration::from_secs(4))
        .valid_time(Duration::from_secs(20))
        .poll_timeout(Duration::from_millis(50))
        .persist_interval(Duration::from_secs(30))
        .available_index_path(path.clone())
        .build()
        .unwrap();

    assert_eq!(config.interface, "enp3s0");
    assert_eq!(config.entity_name, "Stage box");
    assert_eq!(config.serial_number, "SB-17");
    assert_eq!(config.entity_id, Some(0x0011_2233_4455_6677));
    assert_eq!(config.gptp_grandmaster_id, 0x0011_22FF_FE33_4455);
    assert_eq!(config.gptp_domain_number, 1);
    assert_eq!(config.advertise_interval, Duration::from_secs(4));
    assert_eq!(config.valid_time, Duration::from_secs(20));
    assert_eq!(config.persist_interval, Some(Duration::from_secs(30)));
    assert_eq!(config.available_index_path, Some(path));
}

#[test]
fn test_valid_time_bounds() {
    for secs in [0, 3, 64] {
        let result = EntityConfig::builder()
            .valid_time(Duration::from_secs(secs))
            .build();
        assert!(
            matches!(result, Err(ConfigError::InvalidValidTime(_))),
            "{secs} s accepted"
        );
    }

    let fractional = EntityConfig::builder()
        .valid_time(Duration::from_millis(2500))
        .build();
    assert!(matches!(fractional, Err(ConfigError::InvalidValidTime(_))));

    for secs in [2, 10, 62] {
        assert!(
            EntityConfig::builder()
                .valid_time(Duration::from_secs(secs))
                .build()
                .is_ok()
        );
    }
}

#[test]
fn test_interval_validation() {
    assert!(matches!(
        EntityConfig::builder()
            .advertise_interval(Duration::ZERO)
            .build(),
        Err(ConfigError::ZeroInterval)
    ));
    assert!(matches!(
        EntityConfig::builder()
            .advertise_interval(Duration::from_millis(100))
            .poll_timeout(Duration::from_millis(100))
            .build(),
        Err(ConfigError::PollTimeout { .. })
    ));
    assert!(matches!(
        EntityConfig::builder()
            .persist_interval(Duration::ZERO)
            .build(),
        Err(ConfigError::ZeroPersistInterval)
    ));
}

#[test]
fn test_oui_and_interface_validation() {
    assert!(matches!(
        EntityConfig::builder().vendor_oui(0x0100_0000).build(),
        Err(ConfigError::InvalidOui(0x0100_0000))
    ));
    assert!(matches!(
        EntityConfig::builder().avb_interfaces(Vec::new()).build(),
        Err(ConfigError::NoAvbInterface)
    ));
}

#[test]
fn test_too_many_formats() {
    let mut stream = StreamConfig::new("Wide");
    stream.alternate_formats = (1..=MAX_STREAM_FORMATS as u64).collect();
    let result = EntityConfig::builder()
        .stream_inputs(vec![stream])
        .build();
    assert!(matches!(
        result,
        Err(ConfigError::TooManyFormats { ref name, count }) if name == "Wide" && count == MAX_STREAM_FORMATS + 1
    ));
}

#[test]
fn test_long_names_truncated_on_char_boundary() {
    // 63 ASCII bytes followed by a two-byte character.
    let name = format!("{}é", "a".repeat(63));
    let config = EntityConfig::builder()
        .entity_name(name)
        .stream_outputs(vec![StreamConfig::new("x".repeat(80))])
        .build()
        .unwrap();

    assert_eq!(config.entity_name, "a".repeat(63));
    assert_eq!(config.stream_outputs[0].name.len(), 64);
}

#[test]
fn test_effective_capabilities_follow_streams() {
    let listener_only = EntityConfig {
        stream_outputs: Vec::new(),
        ..EntityConfig::default()
    };
    let both = EntityConfig::default();

    assert_ne!(
        listener_only.effective_capabilities(),
        both.effective_capabilities()
    );
    assert_eq!(
        both.effective_capabilities(),
        crate::protocol::aem::Capabilities::audio_endpoint(true, true)
    );
}

#[test]
fn test_stream_formats() {
    let mut stream = StreamConfig::new("In");
    assert_eq!(stream.all_formats(), vec![DEFAULT_STREAM_FORMAT]);

    stream.alternate_formats = vec![1, DEFAULT_STREAM_FORMAT, 2];
    assert_eq!(stream.all_formats(), vec![DEFAULT_STREAM_FORMAT, 1, 2]);
}

#[test]
fn test_json_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entity.json");
    let config = EntityConfig::builder()
        .interface("eth1")
        .mac_address(MacAddress::new([0x00, 0x1B, 0x21, 0x01, 0x02, 0x03]))
        .entity_name("Round trip")
        .persist_interval(Duration::from_secs(15))
        .build()
        .unwrap();

    config.to_json_file(&path).unwrap();
    let loaded = EntityConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_partial_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entity.json");
    std::fs::write(
        &path,
        r#"{
            "interface": "eth2",
            "mac_address": "02:00:00:00:00:01",
            "entity_name": "Partial",
            "advertise_interval": 5000,
            "persist_interval": 60000
        }"#,
    )
    .unwrap();

    let config = EntityConfig::from_json_file(&path).unwrap();
    assert_eq!(config.interface, "eth2");
    assert_eq!(
        config.mac_address,
        Some(MacAddress::new([0x02, 0, 0, 0, 0, 0x01]))
    );
    assert_eq!(config.advertise_interval, Duration::from_secs(5));
    assert_eq!(config.persist_interval, Some(Duration::from_secs(60)));
    assert_eq!(config.valid_time, Duration::from_secs(62));
    assert_eq!(config.avb_interfaces.len(), 1);
}

#[test]
fn test_json_invalid_values_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entity.json");
    std::fs::write(&path, r#"{ "valid_time": 63000 }"#).unwrap();
    assert!(matches!(
        EntityConfig::from_json_file(&path),
        Err(ConfigError::InvalidValidTime(_))
    ));

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        EntityConfig::from_json_file(&path),
        Err(ConfigError::Json(_))
    ));

    assert!(matches!(
        EntityConfig::from_json_file(dir.path().join("missing.json")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_config_error_display() {
    assert_eq!(
        ConfigError::ZeroInterval.to_string(),
        "advertise interval must be non-zero"
    );
    assert_eq!(
        ConfigError::InvalidOui(0x0100_0000).to_string(),
        "vendor OUI 0x1000000 does not fit in 24 bits"
    );
}
