//! 48-bit MAC addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error parsing a textual MAC address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MAC address: {0}")]
pub struct MacParseError(pub String);

/// A 48-bit IEEE 802 MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The all-zero address.
    pub const ZERO: Self = Self([0; 6]);

    /// Wrap six raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Raw bytes in transmission order.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Whether the group (multicast) bit is set.
    #[must_use]
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// The 24 bits following the OUI.
    #[must_use]
    pub const fn nic_specific(&self) -> [u8; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(MacParseError(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            if part.len() != 2 {
                return Err(MacParseError(s.to_string()));
            }
            bytes[i] = u8::from_str_radix(part, 16).map_err(|_| MacParseError(s.to_string()))?;
        }

        Ok(Self(bytes))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Read the hardware address of `interface` from sysfs.
///
/// # Errors
///
/// Returns an error if the interface does not exist or reports a
/// malformed address.
#[cfg(target_os = "linux")]
pub fn interface_mac(interface: &str) -> std::io::Result<MacAddress> {
    let path = std::path::Path::new("/sys/class/net").join(interface).join("address");
    let text = std::fs::read_to_string(path)?;
    text.parse()
        .map_err(|e: MacParseError| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
