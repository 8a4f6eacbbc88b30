//! DNS record types.
//!
//! Record types from RFC 1035 plus the query-only types the transport layer
//! needs to recognize (zone transfers, ANY).

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type.
///
/// This enum covers the record types this crate parses natively plus the
/// QTYPEs that influence query handling. See RFC 1035 Section 3.2.2 and the
/// IANA registry. Values outside this set are carried through [`Type::Unknown`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 address - RFC 1035
    A = 1,

    /// Authoritative name server - RFC 1035
    NS = 2,

    /// Canonical name (alias) - RFC 1035
    CNAME = 5,

    /// Start of authority - RFC 1035
    SOA = 6,

    /// Null record - RFC 1035
    NULL = 10,

    /// Domain name pointer - RFC 1035
    PTR = 12,

    /// Mail exchange - RFC 1035
    MX = 15,

    /// Text strings - RFC 1035
    TXT = 16,

    /// IPv6 address - RFC 3596
    AAAA = 28,

    /// Server selection - RFC 2782
    SRV = 33,

    /// EDNS(0) option pseudo-record - RFC 6891
    OPT = 41,

    /// Incremental zone transfer - RFC 1995
    IXFR = 251,

    /// Full zone transfer - RFC 5936
    AXFR = 252,

    /// Any record type - RFC 1035, RFC 8482
    ANY = 255,
}

impl RecordType {
    /// Returns the numeric value of the record type.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a record type from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns true if this is a query-only type (QTYPE).
    #[inline]
    pub const fn is_query_type(self) -> bool {
        matches!(self, Self::AXFR | Self::IXFR | Self::ANY)
    }

    /// Returns true if this is a zone-transfer query type.
    ///
    /// Transfer responses may span several messages on a TCP stream.
    #[inline]
    pub const fn is_transfer(self) -> bool {
        matches!(self, Self::AXFR | Self::IXFR)
    }

    /// Returns true if record data of this type may compress the domain
    /// names it embeds.
    ///
    /// Only the RFC 1035 "well-known" types qualify; everything else writes
    /// embedded names uncompressed per RFC 3597.
    #[inline]
    pub const fn allows_rdata_compression(self) -> bool {
        matches!(
            self,
            Self::NS | Self::CNAME | Self::SOA | Self::PTR | Self::MX
        )
    }

    /// Returns the human-readable name of the record type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::NULL => "NULL",
            Self::PTR => "PTR",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::AAAA => "AAAA",
            Self::SRV => "SRV",
            Self::OPT => "OPT",
            Self::IXFR => "IXFR",
            Self::AXFR => "AXFR",
            Self::ANY => "ANY",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

/// A type value that can represent both standard types and unknown values.
///
/// Unknown values survive parse/encode unchanged, which matters for forward
/// compatibility: a resolver must relay records it does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// A known, standard record type.
    Known(RecordType),
    /// An unknown type value (TYPE#### format per RFC 3597).
    Unknown(u16),
}

impl Type {
    /// Creates a type from a u16 value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordType::from_u16(value)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(value))
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(t) => t.to_u16(),
            Self::Unknown(v) => v,
        }
    }

    /// Returns the standard type if known.
    #[inline]
    pub const fn as_known(self) -> Option<RecordType> {
        match self {
            Self::Known(t) => Some(t),
            Self::Unknown(_) => None,
        }
    }

    /// Returns true if this is a zone-transfer query type.
    #[inline]
    pub const fn is_transfer(self) -> bool {
        matches!(self, Self::Known(t) if t.is_transfer())
    }
}

impl From<RecordType> for Type {
    fn from(t: RecordType) -> Self {
        Self::Known(t)
    }
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{t}"),
            Self::Unknown(v) => write!(f, "TYPE{v}"),
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::Known(RecordType::A)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtype_values() {
        assert_eq!(RecordType::A.to_u16(), 1);
        assert_eq!(RecordType::AAAA.to_u16(), 28);
        assert_eq!(RecordType::AXFR.to_u16(), 252);
        assert_eq!(RecordType::ANY.to_u16(), 255);
    }

    #[test]
    fn test_rtype_from_u16() {
        assert_eq!(RecordType::from_u16(1), Some(RecordType::A));
        assert_eq!(RecordType::from_u16(33), Some(RecordType::SRV));
        assert_eq!(RecordType::from_u16(65534), None);
    }

    #[test]
    fn test_rtype_predicates() {
        assert!(RecordType::AXFR.is_query_type());
        assert!(RecordType::AXFR.is_transfer());
        assert!(RecordType::IXFR.is_transfer());
        assert!(!RecordType::A.is_transfer());

        assert!(RecordType::NS.allows_rdata_compression());
        assert!(RecordType::SOA.allows_rdata_compression());
        assert!(!RecordType::SRV.allows_rdata_compression());
        assert!(!RecordType::A.allows_rdata_compression());
    }

    #[test]
    fn test_generic_type() {
        let t = Type::from_u16(1);
        assert_eq!(t.as_known(), Some(RecordType::A));

        let t = Type::from_u16(65534);
        assert_eq!(t.as_known(), None);
        assert_eq!(t.to_u16(), 65534);
        assert_eq!(t.to_string(), "TYPE65534");
    }
}
