//! DNS resource records.
//!
//! A resource record (RR) is the fundamental unit of DNS data,
//! containing a name, type, class, TTL, and record-specific data.

use crate::class::{Class, RecordClass};
use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rdata::RData;
use crate::rtype::{RecordType, Type};
use crate::wire::{self, MessageEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS resource record.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                      NAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     CLASS                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TTL                      |
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   RDLENGTH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RDATA                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// The domain name this record is for.
    name: Name,
    /// The record type.
    rtype: Type,
    /// The record class.
    rclass: Class,
    /// Time to live in seconds.
    ttl: u32,
    /// The record data.
    rdata: RData,
}

impl ResourceRecord {
    /// Creates a new resource record.
    pub fn new(name: Name, rtype: Type, rclass: Class, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        }
    }

    /// Creates a new resource record with known type and class.
    pub fn new_known(
        name: Name,
        rtype: RecordType,
        rclass: RecordClass,
        ttl: u32,
        rdata: RData,
    ) -> Self {
        Self::new(name, Type::Known(rtype), Class::Known(rclass), ttl, rdata)
    }

    /// Creates an A record.
    pub fn a(name: Name, ttl: u32, addr: std::net::Ipv4Addr) -> Self {
        Self::new_known(
            name,
            RecordType::A,
            RecordClass::IN,
            ttl,
            RData::A(crate::rdata::A::new(addr)),
        )
    }

    /// Creates an AAAA record.
    pub fn aaaa(name: Name, ttl: u32, addr: std::net::Ipv6Addr) -> Self {
        Self::new_known(
            name,
            RecordType::AAAA,
            RecordClass::IN,
            ttl,
            RData::AAAA(crate::rdata::AAAA::new(addr)),
        )
    }

    /// Creates a CNAME record.
    pub fn cname(name: Name, ttl: u32, target: Name) -> Self {
        Self::new_known(
            name,
            RecordType::CNAME,
            RecordClass::IN,
            ttl,
            RData::CNAME(crate::rdata::CNAME::new(target)),
        )
    }

    /// Creates an MX record.
    pub fn mx(name: Name, ttl: u32, preference: u16, exchange: Name) -> Self {
        Self::new_known(
            name,
            RecordType::MX,
            RecordClass::IN,
            ttl,
            RData::MX(crate::rdata::MX::new(preference, exchange)),
        )
    }

    /// Creates a TXT record.
    pub fn txt(name: Name, ttl: u32, text: impl Into<Vec<u8>>) -> Self {
        Self::new_known(
            name,
            RecordType::TXT,
            RecordClass::IN,
            ttl,
            RData::TXT(crate::rdata::TXT::from_string(text)),
        )
    }

    /// Returns the record name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record type.
    #[inline]
    pub fn rtype(&self) -> Type {
        self.rtype
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.rtype.as_known()
    }

    /// Returns the record class.
    #[inline]
    pub fn rclass(&self) -> Class {
        self.rclass
    }

    /// Returns the TTL in seconds.
    #[inline]
    pub const fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the record data.
    #[inline]
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    /// Returns true if this is an SOA record.
    #[inline]
    pub fn is_soa(&self) -> bool {
        matches!(self.rtype, Type::Known(RecordType::SOA))
    }

    /// Parses a resource record from wire format.
    ///
    /// Returns the record and the number of bytes consumed. The record data
    /// must consume exactly RDLENGTH bytes.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(data);
        let (name, name_len) = parser.parse_name(offset)?;

        let fixed = offset + name_len;
        let rtype = Type::from_u16(wire::read_u16(data, fixed)?);
        let rclass = Class::from_u16(wire::read_u16(data, fixed + 2)?);
        let ttl = wire::read_u32(data, fixed + 4)?;
        let rdlength = wire::read_u16(data, fixed + 8)?;

        let rdata_start = fixed + 10;
        if rdata_start + rdlength as usize > data.len() {
            return Err(Error::buffer_too_short(
                rdata_start + rdlength as usize,
                data.len(),
            ));
        }

        let rdata = RData::parse(rtype, data, rdata_start, rdlength)?;

        Ok((
            Self {
                name,
                rtype,
                rclass,
                ttl,
                rdata,
            },
            name_len + 10 + rdlength as usize,
        ))
    }

    /// Returns the maximum number of octets this record occupies on the
    /// wire: the uncompressed owner name, the 10-byte fixed part, and the
    /// record data's upper bound.
    pub fn max_len(&self) -> usize {
        self.name.max_encoded_len() + 10 + self.rdata.max_len()
    }

    /// Writes the record to the encoder.
    ///
    /// A two-byte RDLENGTH placeholder is reserved, the record data written,
    /// and the placeholder patched with the actual length, which may be
    /// shorter than the upper bound when embedded names compress.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_name(&self.name)?;
        enc.write_u16(self.rtype.to_u16());
        enc.write_u16(self.rclass.to_u16());
        enc.write_u32(self.ttl);

        let len_at = enc.len();
        enc.write_u16(0); // RDLENGTH placeholder
        self.rdata.encode(enc)?;
        let rdlength = enc.len() - len_at - 2;
        enc.patch_u16(len_at, rdlength as u16);

        Ok(())
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.rclass, self.rtype, self.rdata
        )
    }
}

/// Parser for resource record sections.
#[derive(Debug)]
pub struct RecordParser<'a> {
    /// The message data.
    data: &'a [u8],
    /// Current offset in the message.
    offset: usize,
    /// Number of records remaining.
    remaining: u16,
}

impl<'a> RecordParser<'a> {
    /// Creates a new record parser.
    #[inline]
    pub const fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        Self {
            data,
            offset,
            remaining: count,
        }
    }

    /// Returns the current offset.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Parses the next record.
    pub fn next(&mut self) -> Result<Option<ResourceRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let (record, consumed) = ResourceRecord::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    #[test]
    fn test_resource_record_a() {
        let name = Name::from_str("example.com").unwrap();
        let rr = ResourceRecord::a(name.clone(), 300, Ipv4Addr::new(192, 0, 2, 1));

        assert_eq!(rr.name(), &name);
        assert_eq!(rr.record_type(), Some(RecordType::A));
        assert_eq!(rr.ttl(), 300);
        assert_eq!(rr.rdata().as_a(), Some(Ipv4Addr::new(192, 0, 2, 1)));
    }

    #[test]
    fn test_resource_record_roundtrip() {
        let name = Name::from_str("www.example.com").unwrap();
        let original = ResourceRecord::a(name, 3600, Ipv4Addr::new(10, 0, 0, 1));

        let mut enc = MessageEncoder::new(original.max_len());
        original.encode(&mut enc).unwrap();
        let wire = enc.freeze();

        let (parsed, consumed) = ResourceRecord::parse(&wire, 0).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_rdlength_is_patched() {
        let original = ResourceRecord::mx(
            Name::from_str("example.com").unwrap(),
            300,
            10,
            Name::from_str("mail.example.com").unwrap(),
        );

        let mut enc = MessageEncoder::new(original.max_len());
        original.encode(&mut enc).unwrap();
        let wire = enc.freeze();

        // name compresses inside RDATA, so RDLENGTH must be smaller than
        // the uncompressed upper bound
        let rdlength = wire::read_u16(&wire, 13 + 8).unwrap();
        assert!(usize::from(rdlength) < original.rdata().max_len());

        let (parsed, consumed) = ResourceRecord::parse(&wire, 0).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_rdata_must_fill_rdlength() {
        // A record whose RDLENGTH claims 5 bytes of RDATA
        let mut data = Vec::new();
        data.extend_from_slice(&[3, b'f', b'o', b'o', 0]); // foo.
        data.extend_from_slice(&1u16.to_be_bytes()); // TYPE = A
        data.extend_from_slice(&1u16.to_be_bytes()); // CLASS = IN
        data.extend_from_slice(&300u32.to_be_bytes()); // TTL
        data.extend_from_slice(&5u16.to_be_bytes()); // RDLENGTH = 5
        data.extend_from_slice(&[192, 0, 2, 1, 0]); // 5 bytes

        assert!(matches!(
            ResourceRecord::parse(&data, 0),
            Err(Error::RDataLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_ns_rdata_shorter_than_rdlength_rejected() {
        // NS whose name ends before RDLENGTH runs out
        let mut data = Vec::new();
        data.extend_from_slice(&[3, b'f', b'o', b'o', 0]);
        data.extend_from_slice(&2u16.to_be_bytes()); // TYPE = NS
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&300u32.to_be_bytes());
        data.extend_from_slice(&4u16.to_be_bytes()); // RDLENGTH = 4
        data.extend_from_slice(&[1, b'a', 0, 0xFF]); // name uses 3 of 4 bytes

        assert!(matches!(
            ResourceRecord::parse(&data, 0),
            Err(Error::RDataLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_type_preserved() {
        let mut data = Vec::new();
        data.extend_from_slice(&[3, b'f', b'o', b'o', 0]);
        data.extend_from_slice(&999u16.to_be_bytes());
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&60u32.to_be_bytes());
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let (record, consumed) = ResourceRecord::parse(&data, 0).unwrap();
        assert_eq!(consumed, data.len());
        assert_eq!(record.rtype(), Type::Unknown(999));

        let mut enc = MessageEncoder::new(record.max_len());
        record.encode(&mut enc).unwrap();
        assert_eq!(enc.as_bytes(), &data[..]);
    }

    #[test]
    fn test_record_display() {
        let name = Name::from_str("example.com").unwrap();
        let rr = ResourceRecord::a(name, 300, Ipv4Addr::new(192, 0, 2, 1));

        let display = rr.to_string();
        assert!(display.contains("example.com"));
        assert!(display.contains("300"));
        assert!(display.contains("IN"));
        assert!(display.contains('A'));
        assert!(display.contains("192.0.2.1"));
    }
}
