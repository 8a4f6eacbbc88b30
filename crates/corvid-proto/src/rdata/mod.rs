//! DNS record data (RDATA) types.
//!
//! Record data is a tagged sum keyed by record type. The registry lives in
//! [`RData::parse`] / [`RData::encode`] / [`RData::max_len`]: each record
//! type maps to a parser that receives the whole message buffer (so embedded
//! names can follow compression pointers), an encoder that knows whether its
//! names may be compressed, and an upper-bound length for buffer sizing.
//! Types without explicit support fall through to [`Unknown`], which
//! preserves the raw bytes for round-trip fidelity.

pub mod address;
pub mod authority;
pub mod name;
pub mod text;
pub mod unknown;

pub use address::{A, AAAA};
pub use authority::SOA;
pub use name::{CNAME, MX, NS, PTR, SRV};
pub use text::TXT;
pub use unknown::Unknown;

use crate::error::{Error, Result};
use crate::name::Name;
use crate::rtype::{RecordType, Type};
use crate::wire::MessageEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// DNS record data.
///
/// Parsed data for the record types this crate understands; anything else is
/// carried as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RData {
    /// IPv4 address (A record)
    A(A),

    /// IPv6 address (AAAA record)
    AAAA(AAAA),

    /// Name server (NS record)
    NS(NS),

    /// Canonical name (CNAME record)
    CNAME(CNAME),

    /// Pointer (PTR record)
    PTR(PTR),

    /// Mail exchange (MX record)
    MX(MX),

    /// Start of authority (SOA record)
    SOA(SOA),

    /// Text (TXT record)
    TXT(TXT),

    /// Service location (SRV record)
    SRV(SRV),

    /// Unknown or unsupported record type (preserved as raw bytes)
    Unknown(Unknown),
}

impl RData {
    /// Parses RDATA from wire format.
    ///
    /// `message` is the complete message buffer and `offset` the start of
    /// the RDATA; name-bearing types need the full buffer for compression
    /// pointers. Parsing must consume exactly `rdlength` bytes; anything
    /// else is a length-mismatch error.
    pub fn parse(rtype: Type, message: &[u8], offset: usize, rdlength: u16) -> Result<Self> {
        let rdlength = rdlength as usize;
        let rdata_slice = message
            .get(offset..offset + rdlength)
            .ok_or_else(|| Error::buffer_too_short(offset + rdlength, message.len()))?;

        let Some(known) = rtype.as_known() else {
            return Ok(Self::Unknown(Unknown::new(rtype.to_u16(), rdata_slice)));
        };

        let (rdata, consumed) = match known {
            RecordType::A => (Self::A(A::parse(rdata_slice)?), rdlength),
            RecordType::AAAA => (Self::AAAA(AAAA::parse(rdata_slice)?), rdlength),
            RecordType::NS => {
                let (rr, used) = NS::parse(message, offset)?;
                (Self::NS(rr), used)
            }
            RecordType::CNAME => {
                let (rr, used) = CNAME::parse(message, offset)?;
                (Self::CNAME(rr), used)
            }
            RecordType::PTR => {
                let (rr, used) = PTR::parse(message, offset)?;
                (Self::PTR(rr), used)
            }
            RecordType::MX => {
                let (rr, used) = MX::parse(message, offset)?;
                (Self::MX(rr), used)
            }
            RecordType::SOA => {
                let (rr, used) = SOA::parse(message, offset)?;
                (Self::SOA(rr), used)
            }
            RecordType::SRV => {
                let (rr, used) = SRV::parse(message, offset)?;
                (Self::SRV(rr), used)
            }
            RecordType::TXT => (Self::TXT(TXT::parse(rdata_slice)?), rdlength),
            _ => (
                Self::Unknown(Unknown::new(known.to_u16(), rdata_slice)),
                rdlength,
            ),
        };

        if consumed != rdlength {
            return Err(Error::RDataLengthMismatch {
                rtype: known.name().to_string(),
                expected: rdlength,
                actual: consumed,
            });
        }

        Ok(rdata)
    }

    /// Returns the type value for this RDATA.
    pub fn record_type(&self) -> Type {
        match self {
            Self::A(_) => Type::Known(RecordType::A),
            Self::AAAA(_) => Type::Known(RecordType::AAAA),
            Self::NS(_) => Type::Known(RecordType::NS),
            Self::CNAME(_) => Type::Known(RecordType::CNAME),
            Self::PTR(_) => Type::Known(RecordType::PTR),
            Self::MX(_) => Type::Known(RecordType::MX),
            Self::SOA(_) => Type::Known(RecordType::SOA),
            Self::TXT(_) => Type::Known(RecordType::TXT),
            Self::SRV(_) => Type::Known(RecordType::SRV),
            Self::Unknown(u) => Type::from_u16(u.type_code()),
        }
    }

    /// Returns the maximum number of octets this RDATA occupies on the wire.
    ///
    /// An upper bound: encoding may compress embedded names and come out
    /// shorter.
    pub fn max_len(&self) -> usize {
        match self {
            Self::A(r) => r.max_len(),
            Self::AAAA(r) => r.max_len(),
            Self::NS(r) => r.max_len(),
            Self::CNAME(r) => r.max_len(),
            Self::PTR(r) => r.max_len(),
            Self::MX(r) => r.max_len(),
            Self::SOA(r) => r.max_len(),
            Self::TXT(r) => r.max_len(),
            Self::SRV(r) => r.max_len(),
            Self::Unknown(r) => r.max_len(),
        }
    }

    /// Writes this RDATA to the encoder.
    ///
    /// Only RFC 1035 well-known types offer their embedded names to the
    /// compressor; everything else writes them verbatim.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        match self {
            Self::A(r) => r.encode(enc),
            Self::AAAA(r) => r.encode(enc),
            Self::NS(r) => r.encode(enc),
            Self::CNAME(r) => r.encode(enc),
            Self::PTR(r) => r.encode(enc),
            Self::MX(r) => r.encode(enc),
            Self::SOA(r) => r.encode(enc),
            Self::TXT(r) => r.encode(enc),
            Self::SRV(r) => r.encode(enc),
            Self::Unknown(r) => r.encode(enc),
        }
    }

    /// Returns the IPv4 address if this is an A record.
    pub fn as_a(&self) -> Option<Ipv4Addr> {
        match self {
            Self::A(a) => Some(a.address()),
            _ => None,
        }
    }

    /// Returns the IPv6 address if this is an AAAA record.
    pub fn as_aaaa(&self) -> Option<Ipv6Addr> {
        match self {
            Self::AAAA(aaaa) => Some(aaaa.address()),
            _ => None,
        }
    }

    /// Returns the target name if this is a CNAME record.
    pub fn as_cname(&self) -> Option<&Name> {
        match self {
            Self::CNAME(cname) => Some(cname.target()),
            _ => None,
        }
    }

    /// Returns the SOA payload if this is an SOA record.
    pub fn as_soa(&self) -> Option<&SOA> {
        match self {
            Self::SOA(soa) => Some(soa),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(r) => write!(f, "{r}"),
            Self::AAAA(r) => write!(f, "{r}"),
            Self::NS(r) => write!(f, "{r}"),
            Self::CNAME(r) => write!(f, "{r}"),
            Self::PTR(r) => write!(f, "{r}"),
            Self::MX(r) => write!(f, "{r}"),
            Self::SOA(r) => write!(f, "{r}"),
            Self::TXT(r) => write!(f, "{r}"),
            Self::SRV(r) => write!(f, "{r}"),
            Self::Unknown(r) => write!(f, "{r}"),
        }
    }
}
