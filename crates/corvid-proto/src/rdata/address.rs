//! Address record types (A, AAAA).

use crate::error::{Error, Result};
use crate::wire::MessageEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A record - IPv4 address (RFC 1035).
///
/// # Wire Format
///
/// The RDATA is exactly 4 bytes containing the address in network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A {
    /// The IPv4 address.
    address: Ipv4Addr,
}

impl A {
    /// Creates a new A record.
    #[inline]
    pub const fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }

    /// Returns the IPv4 address.
    #[inline]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Parses an A record from its RDATA bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let octets: [u8; 4] = data.try_into().map_err(|_| Error::RDataLengthMismatch {
            rtype: "A".to_string(),
            expected: 4,
            actual: data.len(),
        })?;
        Ok(Self {
            address: Ipv4Addr::from(octets),
        })
    }

    /// Returns the wire length (always 4).
    #[inline]
    pub const fn max_len(&self) -> usize {
        4
    }

    /// Writes the A record to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_bytes(&self.address.octets());
        Ok(())
    }
}

impl From<Ipv4Addr> for A {
    fn from(address: Ipv4Addr) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// AAAA record - IPv6 address (RFC 3596).
///
/// # Wire Format
///
/// The RDATA is exactly 16 bytes containing the address in network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AAAA {
    /// The IPv6 address.
    address: Ipv6Addr,
}

impl AAAA {
    /// Creates a new AAAA record.
    #[inline]
    pub const fn new(address: Ipv6Addr) -> Self {
        Self { address }
    }

    /// Returns the IPv6 address.
    #[inline]
    pub const fn address(&self) -> Ipv6Addr {
        self.address
    }

    /// Parses an AAAA record from its RDATA bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let octets: [u8; 16] = data.try_into().map_err(|_| Error::RDataLengthMismatch {
            rtype: "AAAA".to_string(),
            expected: 16,
            actual: data.len(),
        })?;
        Ok(Self {
            address: Ipv6Addr::from(octets),
        })
    }

    /// Returns the wire length (always 16).
    #[inline]
    pub const fn max_len(&self) -> usize {
        16
    }

    /// Writes the AAAA record to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_bytes(&self.address.octets());
        Ok(())
    }
}

impl From<Ipv6Addr> for AAAA {
    fn from(address: Ipv6Addr) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_record() {
        let a = A::new(Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(a.address(), Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(a.max_len(), 4);
        assert_eq!(a.to_string(), "192.0.2.1");
    }

    #[test]
    fn test_a_roundtrip() {
        let original = A::new(Ipv4Addr::new(93, 184, 216, 34));
        let mut enc = MessageEncoder::new(4);
        original.encode(&mut enc).unwrap();
        let parsed = A::parse(enc.as_bytes()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_a_wrong_length() {
        assert!(matches!(
            A::parse(&[1, 2, 3]),
            Err(Error::RDataLengthMismatch { .. })
        ));
        assert!(A::parse(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_aaaa_roundtrip() {
        let original = AAAA::new(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));
        let mut enc = MessageEncoder::new(16);
        original.encode(&mut enc).unwrap();
        let parsed = AAAA::parse(enc.as_bytes()).unwrap();
        assert_eq!(original, parsed);
        assert_eq!(parsed.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_aaaa_wrong_length() {
        assert!(matches!(
            AAAA::parse(&[0; 15]),
            Err(Error::RDataLengthMismatch { .. })
        ));
    }
}
