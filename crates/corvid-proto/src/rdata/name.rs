//! Name-based record types (NS, CNAME, PTR, MX, SRV).
//!
//! These records embed domain names in their data. Whether an embedded name
//! may compress is decided by [`RecordType::allows_rdata_compression`]: the
//! RFC 1035 well-known types (NS, CNAME, PTR, MX) qualify, SRV does not
//! (RFC 2782 requires an uncompressed target).

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::RecordType;
use crate::wire::{self, MessageEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// NS record - Name server (RFC 1035).
///
/// Specifies an authoritative name server for the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NS {
    /// The name server domain name.
    nsdname: Name,
}

impl NS {
    /// Creates a new NS record.
    #[inline]
    pub fn new(nsdname: Name) -> Self {
        Self { nsdname }
    }

    /// Returns the name server name.
    #[inline]
    pub fn nsdname(&self) -> &Name {
        &self.nsdname
    }

    /// Parses an NS record; returns it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (nsdname, used) = NameParser::new(message).parse_name(offset)?;
        Ok((Self { nsdname }, used))
    }

    /// Returns the maximum wire length.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.nsdname.max_encoded_len()
    }

    /// Writes the NS record to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_rdata_name(&self.nsdname, RecordType::NS)
    }
}

impl fmt::Display for NS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nsdname)
    }
}

/// CNAME record - Canonical name (RFC 1035).
///
/// Marks the owner name as an alias for the canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CNAME {
    /// The canonical domain name.
    cname: Name,
}

impl CNAME {
    /// Creates a new CNAME record.
    #[inline]
    pub fn new(cname: Name) -> Self {
        Self { cname }
    }

    /// Returns the canonical name (target).
    #[inline]
    pub fn target(&self) -> &Name {
        &self.cname
    }

    /// Parses a CNAME record; returns it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (cname, used) = NameParser::new(message).parse_name(offset)?;
        Ok((Self { cname }, used))
    }

    /// Returns the maximum wire length.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.cname.max_encoded_len()
    }

    /// Writes the CNAME record to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_rdata_name(&self.cname, RecordType::CNAME)
    }
}

impl fmt::Display for CNAME {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cname)
    }
}

/// PTR record - Pointer (RFC 1035).
///
/// Used for reverse DNS lookups, mapping an address back to a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PTR {
    /// The pointed-to domain name.
    ptrdname: Name,
}

impl PTR {
    /// Creates a new PTR record.
    #[inline]
    pub fn new(ptrdname: Name) -> Self {
        Self { ptrdname }
    }

    /// Returns the pointed-to name.
    #[inline]
    pub fn ptrdname(&self) -> &Name {
        &self.ptrdname
    }

    /// Parses a PTR record; returns it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (ptrdname, used) = NameParser::new(message).parse_name(offset)?;
        Ok((Self { ptrdname }, used))
    }

    /// Returns the maximum wire length.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.ptrdname.max_encoded_len()
    }

    /// Writes the PTR record to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_rdata_name(&self.ptrdname, RecordType::PTR)
    }
}

impl fmt::Display for PTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ptrdname)
    }
}

/// MX record - Mail exchange (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MX {
    /// Preference value (lower is preferred).
    preference: u16,
    /// The mail exchange host.
    exchange: Name,
}

impl MX {
    /// Creates a new MX record.
    #[inline]
    pub fn new(preference: u16, exchange: Name) -> Self {
        Self {
            preference,
            exchange,
        }
    }

    /// Returns the preference value.
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the mail exchange host.
    #[inline]
    pub fn exchange(&self) -> &Name {
        &self.exchange
    }

    /// Parses an MX record; returns it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let preference = wire::read_u16(message, offset)?;
        let (exchange, used) = NameParser::new(message).parse_name(offset + 2)?;
        Ok((
            Self {
                preference,
                exchange,
            },
            2 + used,
        ))
    }

    /// Returns the maximum wire length.
    #[inline]
    pub fn max_len(&self) -> usize {
        2 + self.exchange.max_encoded_len()
    }

    /// Writes the MX record to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_u16(self.preference);
        enc.write_rdata_name(&self.exchange, RecordType::MX)
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

/// SRV record - Service location (RFC 2782).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SRV {
    /// Priority (lower is preferred).
    priority: u16,
    /// Weight for entries with equal priority.
    weight: u16,
    /// Service port.
    port: u16,
    /// Target host.
    target: Name,
}

impl SRV {
    /// Creates a new SRV record.
    #[inline]
    pub fn new(priority: u16, weight: u16, port: u16, target: Name) -> Self {
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// Returns the priority.
    #[inline]
    pub const fn priority(&self) -> u16 {
        self.priority
    }

    /// Returns the weight.
    #[inline]
    pub const fn weight(&self) -> u16 {
        self.weight
    }

    /// Returns the port.
    #[inline]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the target host.
    #[inline]
    pub fn target(&self) -> &Name {
        &self.target
    }

    /// Parses an SRV record; returns it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let priority = wire::read_u16(message, offset)?;
        let weight = wire::read_u16(message, offset + 2)?;
        let port = wire::read_u16(message, offset + 4)?;
        let (target, used) = NameParser::new(message).parse_name(offset + 6)?;
        Ok((
            Self {
                priority,
                weight,
                port,
                target,
            },
            6 + used,
        ))
    }

    /// Returns the maximum wire length.
    #[inline]
    pub fn max_len(&self) -> usize {
        6 + self.target.max_encoded_len()
    }

    /// Writes the SRV record to the encoder. The target never compresses.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_u16(self.priority);
        enc.write_u16(self.weight);
        enc.write_u16(self.port);
        enc.write_rdata_name(&self.target, RecordType::SRV)
    }
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ns_roundtrip() {
        let original = NS::new(Name::from_str("ns1.example.com").unwrap());

        let mut enc = MessageEncoder::new(original.max_len());
        original.encode(&mut enc).unwrap();
        let wire = enc.freeze();

        let (parsed, used) = NS::parse(&wire, 0).unwrap();
        assert_eq!(used, wire.len());
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_mx_roundtrip() {
        let original = MX::new(10, Name::from_str("mail.example.com").unwrap());

        let mut enc = MessageEncoder::new(original.max_len());
        original.encode(&mut enc).unwrap();
        let wire = enc.freeze();

        let (parsed, used) = MX::parse(&wire, 0).unwrap();
        assert_eq!(used, wire.len());
        assert_eq!(parsed.preference(), 10);
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_srv_roundtrip() {
        let original = SRV::new(0, 5, 5060, Name::from_str("sip.example.com").unwrap());

        let mut enc = MessageEncoder::new(original.max_len());
        original.encode(&mut enc).unwrap();
        let wire = enc.freeze();

        let (parsed, used) = SRV::parse(&wire, 0).unwrap();
        assert_eq!(used, wire.len());
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_srv_target_never_compresses() {
        let name = Name::from_str("example.com").unwrap();
        let srv = SRV::new(1, 2, 3, name.clone());

        let mut enc = MessageEncoder::new(64);
        enc.write_name(&name).unwrap();
        srv.encode(&mut enc).unwrap();

        // 13 bytes for the standalone name, 6 fixed SRV bytes, then the
        // target written in full rather than as a pointer
        assert_eq!(enc.len(), 13 + 6 + 13);
    }

    #[test]
    fn test_display() {
        let mx = MX::new(10, Name::from_str("mail.example.com").unwrap());
        assert_eq!(mx.to_string(), "10 mail.example.com.");

        let srv = SRV::new(0, 5, 443, Name::from_str("www.example.com").unwrap());
        assert_eq!(srv.to_string(), "0 5 443 www.example.com.");
    }
}
