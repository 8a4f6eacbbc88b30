//! DNS operation codes (OpCodes).
//!
//! OpCodes specify the kind of query in a DNS message header.
//! Defined in RFC 1035 Section 4.1.1 with extensions from subsequent RFCs.

use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS operation code.
///
/// The OpCode field occupies bits 11-14 of the header flags word. Values
/// without an assigned meaning are preserved in [`OpCode::Unassigned`] so
/// that messages round-trip bit-exactly.
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
pub enum OpCode {
    /// Standard query - RFC 1035
    Query = 0,

    /// Inverse query (obsolete) - RFC 3425
    IQuery = 1,

    /// Server status request - RFC 1035
    Status = 2,

    /// Zone change notification - RFC 1996
    Notify = 4,

    /// Dynamic update - RFC 2136
    Update = 5,

    /// Any value without an assigned meaning, preserved as-is.
    #[num_enum(catch_all)]
    Unassigned(u8),
}

impl OpCode {
    /// Returns the numeric value of the opcode.
    #[inline]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Query => 0,
            Self::IQuery => 1,
            Self::Status => 2,
            Self::Notify => 4,
            Self::Update => 5,
            Self::Unassigned(v) => v,
        }
    }

    /// Creates an opcode from its numeric value.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        Self::from_primitive(value)
    }

    /// Returns the human-readable name of the opcode.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::IQuery => "IQUERY",
            Self::Status => "STATUS",
            Self::Notify => "NOTIFY",
            Self::Update => "UPDATE",
            Self::Unassigned(_) => "UNASSIGNED",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned(v) => write!(f, "OPCODE{v}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl Default for OpCode {
    fn default() -> Self {
        Self::Query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(OpCode::Query.to_u8(), 0);
        assert_eq!(OpCode::Update.to_u8(), 5);
    }

    #[test]
    fn test_unassigned_preserved() {
        let op = OpCode::from_u8(9);
        assert_eq!(op, OpCode::Unassigned(9));
        assert_eq!(op.to_u8(), 9);
        assert_eq!(op.to_string(), "OPCODE9");
    }

    #[test]
    fn test_roundtrip() {
        for value in 0u8..16 {
            assert_eq!(OpCode::from_u8(value).to_u8(), value);
        }
    }
}
