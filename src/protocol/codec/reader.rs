//! Bounds-checked big-endian field access.

use byteorder::{BigEndian, ByteOrder};
use bytes::BufMut;

use super::CodecError;

/// Sequential big-endian reader over a borrowed buffer.
///
/// Every read is bounds-checked against the provided slice and reports
/// [`CodecError::MalformedFrame`] instead of panicking.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
    structure: &'static str,
}

impl<'a> WireReader<'a> {
    /// Start reading `data` as the named structure.
    #[must_use]
    pub fn new(structure: &'static str, data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            structure,
        }
    }

    /// Fail early unless the whole buffer holds at least `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is shorter.
    pub fn require(&self, len: usize) -> Result<(), CodecError> {
        if self.data.len() < len {
            return Err(CodecError::too_short(self.structure, len, self.data.len()));
        }
        Ok(())
    }

    /// Current offset from the start of the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current offset.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Unread tail of the buffer.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos + len;
        if end > self.data.len() {
            return Err(CodecError::too_short(self.structure, end, self.data.len()));
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Skip `len` reserved bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is exhausted.
    pub fn skip(&mut self, len: usize) -> Result<(), CodecError> {
        self.take(len).map(|_| ())
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is exhausted.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is exhausted.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Read a big-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is exhausted.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Read a big-endian `u64` as two 32-bit halves (high word first).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is exhausted.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let high = self.read_u32()?;
        let low = self.read_u32()?;
        Ok(join_u64(high, low))
    }

    /// Read a fixed-size byte array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is exhausted.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a NUL-padded UTF-8 string occupying exactly `len` bytes.
    ///
    /// The string ends at the first NUL or at the end of the field when it
    /// fills all `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedFrame`] when the buffer is exhausted, or
    /// [`CodecError::InvalidString`] when the content is not UTF-8.
    pub fn read_fixed_str(&mut self, field: &'static str, len: usize) -> Result<String, CodecError> {
        let raw = self.take(len)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        std::str::from_utf8(&raw[..end])
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidString { field })
    }
}

/// Growable big-endian writer backed by a `Vec<u8>`.
#[derive(Debug, Clone, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    /// Create a writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append one byte.
    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Append a big-endian `u16`.
    pub fn put_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    /// Append a big-endian `u32`.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    /// Append a big-endian `u64` as two 32-bit halves (high word first).
    pub fn put_u64(&mut self, value: u64) {
        let (high, low) = split_u64(value);
        self.buf.put_u32(high);
        self.buf.put_u32(low);
    }

    /// Append raw bytes.
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Append `len` zero bytes.
    pub fn put_zeros(&mut self, len: usize) {
        self.buf.put_bytes(0, len);
    }

    /// Append `value` as a NUL-padded field of exactly `len` bytes.
    ///
    /// Content longer than the field is cut at the last char boundary that fits.
    pub fn put_fixed_str(&mut self, value: &str, len: usize) {
        let bytes = truncate_utf8(value, len).as_bytes();
        self.buf.put_slice(bytes);
        self.buf.put_bytes(0, len - bytes.len());
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Finish writing and return the buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Split a 64-bit value into (high, low) 32-bit halves.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn split_u64(value: u64) -> (u32, u32) {
    ((value >> 32) as u32, value as u32)
}

/// Join (high, low) 32-bit halves into a 64-bit value.
#[must_use]
pub fn join_u64(high: u32, low: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}

/// Longest prefix of `value` that fits in `max` bytes without splitting a char.
#[must_use]
pub fn truncate_utf8(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
