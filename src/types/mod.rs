//! Core types module

pub mod config;
pub mod mac;

#[cfg(test)]
mod tests;

pub use config::{AvbInterfaceConfig, ConfigError, EntityConfig, EntityConfigBuilder, StreamConfig};
pub use mac::{MacAddress, MacParseError};
