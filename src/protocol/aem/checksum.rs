//! AEM descriptor record checksum.
//!
//! Every descriptor record ends with a 32-bit big-endian checksum. It is a
//! CRC-32 (ISO-HDLC) over the whole record with the checksum field zeroed.

use crc::{CRC_32_ISO_HDLC, Crc};

/// Size of the trailing checksum field.
pub const CHECKSUM_SIZE: usize = 4;

const AEM_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Compute the checksum of `record` (which includes the trailing field).
///
/// Records shorter than the checksum field are treated as all-checksum.
#[must_use]
pub fn compute_checksum(record: &[u8]) -> u32 {
    let body_len = record.len().saturating_sub(CHECKSUM_SIZE);
    let mut digest = AEM_CRC.digest();
    digest.update(&record[..body_len]);
    digest.update(&[0u8; CHECKSUM_SIZE]);
    digest.finalize()
}

/// Recompute and store the checksum in the last four bytes of `record`.
pub fn seal(record: &mut [u8]) {
    if record.len() < CHECKSUM_SIZE {
        return;
    }
    let checksum = compute_checksum(record);
    let at = record.len() - CHECKSUM_SIZE;
    record[at..].copy_from_slice(&checksum.to_be_bytes());
}

/// Checksum stored in the last four bytes of `record`.
#[must_use]
pub fn stored_checksum(record: &[u8]) -> Option<u32> {
    let at = record.len().checked_sub(CHECKSUM_SIZE)?;
    let mut bytes = [0u8; CHECKSUM_SIZE];
    bytes.copy_from_slice(&record[at..]);
    Some(u32::from_be_bytes(bytes))
}

/// Whether the stored checksum matches the record contents.
#[must_use]
pub fn verify_checksum(record: &[u8]) -> bool {
    stored_checksum(record).is_some_and(|stored| stored == compute_checksum(record))
}
