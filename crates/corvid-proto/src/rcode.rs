//! DNS response codes (RCODEs).
//!
//! Response codes indicate the status of a DNS operation.
//! Defined in RFC 1035 Section 4.1.1 with extensions from subsequent RFCs.

use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS response code.
///
/// The RCODE field occupies the low four bits of the header flags word.
/// Unassigned values are preserved in [`ResponseCode::Unassigned`] so that
/// responses round-trip bit-exactly. Response codes are data, not errors:
/// SERVFAIL and NXDOMAIN responses are delivered to the caller in the parsed
/// message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    FromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum ResponseCode {
    /// No error condition - RFC 1035
    NoError = 0,

    /// Format error: the server could not interpret the query - RFC 1035
    FormErr = 1,

    /// Server failure - RFC 1035
    ServFail = 2,

    /// Name error: the queried domain does not exist - RFC 1035
    NXDomain = 3,

    /// Not implemented - RFC 1035
    NotImp = 4,

    /// Query refused for policy reasons - RFC 1035
    Refused = 5,

    /// Name exists when it should not - RFC 2136
    YXDomain = 6,

    /// RR set exists when it should not - RFC 2136
    YXRRSet = 7,

    /// RR set that should exist does not - RFC 2136
    NXRRSet = 8,

    /// Server not authoritative for zone / not authorized - RFC 2136, RFC 8945
    NotAuth = 9,

    /// Name not contained in zone - RFC 2136
    NotZone = 10,

    /// Any value without an assigned meaning, preserved as-is.
    #[num_enum(catch_all)]
    Unassigned(u8),
}

impl ResponseCode {
    /// Returns the 4-bit value for the header RCODE field.
    #[inline]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::NoError => 0,
            Self::FormErr => 1,
            Self::ServFail => 2,
            Self::NXDomain => 3,
            Self::NotImp => 4,
            Self::Refused => 5,
            Self::YXDomain => 6,
            Self::YXRRSet => 7,
            Self::NXRRSet => 8,
            Self::NotAuth => 9,
            Self::NotZone => 10,
            Self::Unassigned(v) => v,
        }
    }

    /// Creates a response code from its 4-bit header value.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        Self::from_primitive(value & 0x0F)
    }

    /// Returns true if this response indicates success.
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::NoError)
    }

    /// Returns true if this response indicates the name does not exist.
    #[inline]
    pub const fn is_nxdomain(self) -> bool {
        matches!(self, Self::NXDomain)
    }

    /// Returns true if this response indicates a server error.
    #[inline]
    pub const fn is_server_error(self) -> bool {
        matches!(self, Self::ServFail)
    }

    /// Returns the human-readable name of the response code.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NXDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::YXDomain => "YXDOMAIN",
            Self::YXRRSet => "YXRRSET",
            Self::NXRRSet => "NXRRSET",
            Self::NotAuth => "NOTAUTH",
            Self::NotZone => "NOTZONE",
            Self::Unassigned(_) => "UNASSIGNED",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned(v) => write!(f, "RCODE{v}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl Default for ResponseCode {
    fn default() -> Self {
        Self::NoError
    }
}
