//! Ethernet II framing for AVTP control traffic.

use super::{CodecError, WireReader, WireWriter};
use crate::types::MacAddress;

/// EtherType assigned to IEEE 1722 AVTP.
pub const ETHERTYPE_AVTP: u16 = 0x22F0;

/// Multicast group used for ADP advertisements and ACMP messages.
pub const AVDECC_MULTICAST_MAC: MacAddress = MacAddress::new([0x91, 0xE0, 0xF0, 0x01, 0x00, 0x00]);

/// Untagged Ethernet II header (14 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    /// Destination MAC address.
    pub destination: MacAddress,
    /// Source MAC address.
    pub source: MacAddress,
    /// EtherType.
    pub ether_type: u16,
}

impl EthernetHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 14;

    /// Header for an AVTP frame from `source` to `destination`.
    #[must_use]
    pub fn avtp(destination: MacAddress, source: MacAddress) -> Self {
        Self {
            destination,
            source,
            ether_type: ETHERTYPE_AVTP,
        }
    }

    /// Encode to 14 bytes.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut w = WireWriter::with_capacity(Self::SIZE);
        self.write(&mut w);
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(w.as_slice());
        out
    }

    /// Append the header to a writer.
    pub fn write(&self, w: &mut WireWriter) {
        w.put_slice(self.destination.as_bytes());
        w.put_slice(self.source.as_bytes());
        w.put_u16(self.ether_type);
    }

    /// Decode the first 14 bytes of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] if `data` is shorter than 14 bytes.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = WireReader::new("ethernet header", data);
        r.require(Self::SIZE)?;
        Ok(Self {
            destination: MacAddress::new(r.read_array()?),
            source: MacAddress::new(r.read_array()?),
            ether_type: r.read_u16()?,
        })
    }

    /// Decode the header and require the AVTP EtherType.
    ///
    /// Returns the header and the AVTP payload that follows it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] for short buffers and
    /// [`CodecError::UnexpectedEtherType`] for non-AVTP frames.
    pub fn decode_avtp(data: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let header = Self::decode(data)?;
        if header.ether_type != ETHERTYPE_AVTP {
            return Err(CodecError::UnexpectedEtherType(header.ether_type));
        }
        Ok((header, &data[Self::SIZE..]))
    }
}
