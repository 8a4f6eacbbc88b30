//! Authority record types (SOA).

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::RecordType;
use crate::wire::{self, MessageEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SOA record - Start of Authority (RFC 1035).
///
/// Marks the start of a zone of authority. Zone transfers are bracketed by
/// SOA records: a transfer stream opens and closes with the zone's SOA.
///
/// # Wire Format
///
/// ```text
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     MNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    SERIAL                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    REFRESH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     RETRY                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    EXPIRE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    MINIMUM                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SOA {
    /// Primary name server for the zone.
    mname: Name,
    /// Mailbox of the responsible person (@ replaced with .).
    rname: Name,
    /// Zone serial number.
    serial: u32,
    /// Refresh interval (seconds).
    refresh: u32,
    /// Retry interval (seconds).
    retry: u32,
    /// Expire time (seconds).
    expire: u32,
    /// Minimum TTL / negative caching TTL (seconds).
    minimum: u32,
}

impl SOA {
    /// Creates a new SOA record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    ) -> Self {
        Self {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        }
    }

    /// Returns the primary name server.
    #[inline]
    pub fn mname(&self) -> &Name {
        &self.mname
    }

    /// Returns the responsible person's mailbox (in DNS name form).
    #[inline]
    pub fn rname(&self) -> &Name {
        &self.rname
    }

    /// Returns the zone serial number.
    #[inline]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    /// Returns the refresh interval in seconds.
    #[inline]
    pub const fn refresh(&self) -> u32 {
        self.refresh
    }

    /// Returns the retry interval in seconds.
    #[inline]
    pub const fn retry(&self) -> u32 {
        self.retry
    }

    /// Returns the expire time in seconds.
    #[inline]
    pub const fn expire(&self) -> u32 {
        self.expire
    }

    /// Returns the minimum TTL (negative caching TTL) in seconds.
    #[inline]
    pub const fn minimum(&self) -> u32 {
        self.minimum
    }

    /// Parses an SOA record; returns it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(message);

        let (mname, mname_len) = parser.parse_name(offset)?;
        let (rname, rname_len) = parser.parse_name(offset + mname_len)?;

        let fixed = offset + mname_len + rname_len;
        let serial = wire::read_u32(message, fixed)?;
        let refresh = wire::read_u32(message, fixed + 4)?;
        let retry = wire::read_u32(message, fixed + 8)?;
        let expire = wire::read_u32(message, fixed + 12)?;
        let minimum = wire::read_u32(message, fixed + 16)?;

        Ok((
            Self {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            },
            mname_len + rname_len + 20,
        ))
    }

    /// Returns the maximum wire length.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.mname.max_encoded_len() + self.rname.max_encoded_len() + 20
    }

    /// Writes the SOA record to the encoder.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_rdata_name(&self.mname, RecordType::SOA)?;
        enc.write_rdata_name(&self.rname, RecordType::SOA)?;
        enc.write_u32(self.serial);
        enc.write_u32(self.refresh);
        enc.write_u32(self.retry);
        enc.write_u32(self.expire);
        enc.write_u32(self.minimum);
        Ok(())
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire, self.minimum
        )
    }
}
