//! Unknown/opaque record type handling.

use crate::error::Result;
use crate::wire::MessageEncoder;
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unknown record type - preserves raw RDATA.
///
/// Record types without explicit parsing support keep their raw bytes so
/// they serialize back to the wire unchanged.
///
/// Per RFC 3597, unknown record types render as `\# <length> <hex-data>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unknown {
    /// The record type code.
    type_code: u16,
    /// The raw RDATA bytes.
    data: Vec<u8>,
}

impl Unknown {
    /// Creates a new unknown record payload.
    pub fn new(type_code: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            type_code,
            data: data.into(),
        }
    }

    /// Returns the record type code.
    #[inline]
    pub const fn type_code(&self) -> u16 {
        self.type_code
    }

    /// Returns the raw RDATA.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the wire length.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.data.len()
    }

    /// Writes the raw bytes to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_bytes(&self.data);
        Ok(())
    }
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // RFC 3597 format: \# <length> <hex>
        write!(f, "\\# {} {}", self.data.len(), HEXLOWER.encode(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_record() {
        let unknown = Unknown::new(65534, vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(unknown.type_code(), 65534);
        assert_eq!(unknown.data(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_unknown_display() {
        let unknown = Unknown::new(65534, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(unknown.to_string(), "\\# 4 deadbeef");
    }

    #[test]
    fn test_unknown_roundtrip() {
        let original = Unknown::new(12345, vec![0x01, 0x02, 0x03]);
        let mut enc = MessageEncoder::new(3);
        original.encode(&mut enc).unwrap();
        assert_eq!(enc.as_bytes(), &[0x01, 0x02, 0x03]);
    }
}
