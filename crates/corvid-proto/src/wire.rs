//! Wire format utilities.
//!
//! Big-endian read helpers for parsing and the message encoder, which owns
//! the output buffer and the call-scoped name-compression table.

use crate::error::{Error, Result};
use crate::name::Name;
use crate::rtype::RecordType;
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::HashMap;

/// Reads a big-endian u16 at `offset`.
#[inline]
pub fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    if offset + 2 > data.len() {
        return Err(Error::unexpected_eof(offset + 2));
    }
    Ok(u16::from_be_bytes([data[offset], data[offset + 1]]))
}

/// Reads a big-endian u32 at `offset`.
#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    if offset + 4 > data.len() {
        return Err(Error::unexpected_eof(offset + 4));
    }
    let bytes: [u8; 4] = data[offset..offset + 4]
        .try_into()
        .map_err(|_| Error::unexpected_eof(offset + 4))?;
    Ok(u32::from_be_bytes(bytes))
}

/// Compression pointers can only reference the first 16 KiB of a message.
const MAX_POINTER_TARGET: usize = 0x3FFF;

/// An encoder for DNS wire format.
///
/// The encoder owns the output buffer and a compression table that maps each
/// name suffix to the offset of its first occurrence. The table lives only
/// for one message; compression state never leaks across encode calls.
///
/// In canonical mode (used for deterministic byte output, e.g. signature
/// input), compression is disabled and labels are lowercased on the way out.
#[derive(Debug)]
pub struct MessageEncoder {
    /// The output buffer.
    buf: BytesMut,
    /// First-occurrence offsets of name suffixes written so far.
    table: HashMap<Name, u16>,
    /// Whether names may be compressed.
    compress: bool,
    /// Whether labels are lowercased on write.
    lowercase: bool,
}

impl MessageEncoder {
    /// Creates an encoder with compression enabled.
    ///
    /// `capacity` should be the message's `max_len()` so section writers
    /// never reallocate.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            table: HashMap::new(),
            compress: true,
            lowercase: false,
        }
    }

    /// Creates an encoder in canonical mode: no compression, lowercase
    /// labels, deterministic output.
    pub fn canonical(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            table: HashMap::new(),
            compress: false,
            lowercase: true,
        }
    }

    /// Returns the number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the bytes written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the encoder and returns the encoded message.
    #[inline]
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Writes a big-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    /// Writes a big-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    /// Writes a slice of bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Patches a big-endian u16 at an earlier offset.
    ///
    /// Used to fill in RDLENGTH after record data has been written. The
    /// offset must refer to bytes already written.
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        debug_assert!(offset + 2 <= self.buf.len());
        if offset + 2 <= self.buf.len() {
            self.buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
        }
    }

    /// Writes a domain name, compressing against earlier occurrences when
    /// compression is enabled.
    ///
    /// For each suffix of the name, longest first: if the suffix was already
    /// written, a two-byte pointer to its first occurrence is emitted and the
    /// name is complete. Otherwise the suffix's leading label is written, the
    /// current offset is registered for that suffix, and the walk continues
    /// with the parent. The root is a single zero byte.
    pub fn write_name(&mut self, name: &Name) -> Result<()> {
        let mut suffix = name.clone();

        loop {
            if suffix.is_root() {
                self.buf.put_u8(0);
                return Ok(());
            }

            if self.compress {
                if let Some(&offset) = self.table.get(&suffix) {
                    self.buf.put_u16(0xC000 | offset);
                    return Ok(());
                }
            }

            let here = self.buf.len();
            if self.compress && here <= MAX_POINTER_TARGET {
                self.table.insert(suffix.clone(), here as u16);
            }

            let label = suffix
                .label(0)
                .ok_or_else(|| Error::invalid_data(here, "empty non-root name"))?;
            label.check_encodable()?;

            self.buf.put_u8(label.len() as u8);
            if self.lowercase {
                self.buf
                    .extend(label.as_bytes().iter().map(u8::to_ascii_lowercase));
            } else {
                self.buf.put_slice(label.as_bytes());
            }

            suffix = match suffix.parent() {
                Some(parent) => parent,
                None => {
                    self.buf.put_u8(0);
                    return Ok(());
                }
            };
        }
    }

    /// Writes a domain name without consulting or updating the compression
    /// table.
    ///
    /// Used for record data of types that are not permitted to compress
    /// their embedded names (RFC 3597).
    pub fn write_name_uncompressed(&mut self, name: &Name) -> Result<()> {
        name.write_uncompressed(&mut self.buf, self.lowercase)
    }

    /// Writes a name that appears inside record data of type `rtype`.
    ///
    /// [`RecordType::allows_rdata_compression`] decides whether the name is
    /// offered to the compressor or written verbatim.
    pub fn write_rdata_name(&mut self, name: &Name, rtype: RecordType) -> Result<()> {
        if rtype.allows_rdata_compression() {
            self.write_name(name)
        } else {
            self.write_name_uncompressed(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::NameParser;
    use std::str::FromStr;

    #[test]
    fn test_read_helpers() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A];
        assert_eq!(read_u16(&data, 0).unwrap(), 0x1234);
        assert_eq!(read_u32(&data, 1).unwrap(), 0x3456789A);
        assert!(read_u16(&data, 4).is_err());
        assert!(read_u32(&data, 2).is_err());
    }

    #[test]
    fn test_scalar_writes_and_patch() {
        let mut enc = MessageEncoder::new(16);
        enc.write_u8(0x12);
        enc.write_u16(0x0000);
        enc.write_u32(0x789A_BCDE);
        enc.patch_u16(1, 0x3456);

        assert_eq!(
            enc.as_bytes(),
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE]
        );
    }

    #[test]
    fn test_name_compression() {
        let mut enc = MessageEncoder::new(64);

        let zone = Name::from_str("example.com").unwrap();
        let host = Name::from_str("www.example.com").unwrap();

        enc.write_name(&zone).unwrap();
        enc.write_name(&host).unwrap();

        // First name is written in full (13 bytes); the second becomes the
        // "www" label plus a pointer to offset 0.
        let bytes = enc.as_bytes();
        assert_eq!(bytes.len(), 13 + 4 + 2);
        assert_eq!(&bytes[13..], &[3, b'w', b'w', b'w', 0xC0, 0x00]);

        let parser = NameParser::new(bytes);
        assert_eq!(parser.parse(0).unwrap(), zone);
        assert_eq!(parser.parse(13).unwrap(), host);
    }

    #[test]
    fn test_compression_is_case_insensitive() {
        let mut enc = MessageEncoder::new(64);

        enc.write_name(&Name::from_str("Example.COM").unwrap()).unwrap();
        enc.write_name(&Name::from_str("www.example.com").unwrap())
            .unwrap();

        // The second name compresses against the differently-cased first
        let bytes = enc.as_bytes();
        assert_eq!(&bytes[bytes.len() - 2..], &[0xC0, 0x00]);
    }

    #[test]
    fn test_identical_name_is_a_single_pointer() {
        let name = Name::from_str("example.com").unwrap();
        let mut enc = MessageEncoder::new(64);
        enc.write_name(&name).unwrap();
        let first_len = enc.len();
        enc.write_name(&name).unwrap();
        assert_eq!(enc.len(), first_len + 2);
    }

    #[test]
    fn test_canonical_mode_lowercases_and_never_compresses() {
        let name = Name::from_str("WWW.Example.COM").unwrap();

        let mut enc = MessageEncoder::canonical(64);
        enc.write_name(&name).unwrap();
        enc.write_name(&name).unwrap();

        let expected = [
            3, b'w', b'w', b'w', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm',
            0,
        ];
        let bytes = enc.as_bytes();
        assert_eq!(&bytes[..17], &expected);
        assert_eq!(&bytes[17..], &expected);
    }

    #[test]
    fn test_canonical_mode_is_deterministic() {
        let name = Name::from_str("a.b.example.org").unwrap();

        let encode = || {
            let mut enc = MessageEncoder::canonical(64);
            enc.write_name(&name).unwrap();
            enc.freeze()
        };

        assert_eq!(encode(), encode());
    }

    #[test]
    fn test_root_name_is_single_zero_byte() {
        let mut enc = MessageEncoder::new(8);
        enc.write_name(&Name::root()).unwrap();
        assert_eq!(enc.as_bytes(), &[0]);
    }

    #[test]
    fn test_uncompressed_write_skips_table() {
        let name = Name::from_str("example.com").unwrap();
        let mut enc = MessageEncoder::new(64);

        enc.write_name_uncompressed(&name).unwrap();
        enc.write_name(&name).unwrap();

        // The second write cannot point at the first occurrence because the
        // uncompressed write did not register it.
        assert_eq!(enc.len(), 13 + 13);
    }
}
