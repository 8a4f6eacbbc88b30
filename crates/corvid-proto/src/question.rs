//! DNS question section.
//!
//! The question section contains queries for information.
//! Each question has a domain name, query type, and query class.

use crate::class::{Class, RecordClass};
use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};
use crate::wire::{self, MessageEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS question.
///
/// A typical query has exactly one question, though the wire format allows
/// several.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     QNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QTYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QCLASS                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    /// The domain name being queried.
    pub qname: Name,

    /// The type of record being requested.
    pub qtype: Type,

    /// The class of the query (usually IN for Internet).
    pub qclass: Class,
}

impl Question {
    /// Creates a new question.
    #[inline]
    pub fn new(qname: Name, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            qname,
            qtype: Type::Known(qtype),
            qclass: Class::Known(qclass),
        }
    }

    /// Creates a new question with generic type and class.
    #[inline]
    pub fn new_generic(qname: Name, qtype: Type, qclass: Class) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// Creates a question for an A record lookup.
    #[inline]
    pub fn a(name: Name) -> Self {
        Self::new(name, RecordType::A, RecordClass::IN)
    }

    /// Creates a question for an AAAA record lookup.
    #[inline]
    pub fn aaaa(name: Name) -> Self {
        Self::new(name, RecordType::AAAA, RecordClass::IN)
    }

    /// Creates a question for a TXT record lookup.
    #[inline]
    pub fn txt(name: Name) -> Self {
        Self::new(name, RecordType::TXT, RecordClass::IN)
    }

    /// Creates a question for a PTR (reverse DNS) lookup.
    #[inline]
    pub fn ptr(name: Name) -> Self {
        Self::new(name, RecordType::PTR, RecordClass::IN)
    }

    /// Creates a question requesting a full zone transfer.
    #[inline]
    pub fn axfr(name: Name) -> Self {
        Self::new(name, RecordType::AXFR, RecordClass::IN)
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.qtype.as_known()
    }

    /// Returns true if this question requests a zone transfer.
    #[inline]
    pub fn is_transfer(&self) -> bool {
        self.qtype.is_transfer()
    }

    /// Parses a question from wire format.
    ///
    /// Returns the question and the number of bytes consumed.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(data);
        let (qname, name_len) = parser.parse_name(offset)?;

        let fixed = offset + name_len;
        let qtype = Type::from_u16(wire::read_u16(data, fixed)?);
        let qclass = Class::from_u16(wire::read_u16(data, fixed + 2)?);

        Ok((
            Self {
                qname,
                qtype,
                qclass,
            },
            name_len + 4,
        ))
    }

    /// Returns the maximum number of octets this question occupies on the
    /// wire: the uncompressed name plus two bytes each of type and class.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.qname.max_encoded_len() + 4
    }

    /// Writes the question to an encoder. The name participates in
    /// compression.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        enc.write_name(&self.qname)?;
        enc.write_u16(self.qtype.to_u16());
        enc.write_u16(self.qclass.to_u16());
        Ok(())
    }

    /// Returns true if this question matches another.
    ///
    /// Matching is case-insensitive for the name, exact for type and class.
    /// Used to pair responses with the query they answer.
    pub fn matches(&self, other: &Question) -> bool {
        self.qname == other.qname && self.qtype == other.qtype && self.qclass == other.qclass
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.qname, self.qclass, self.qtype)
    }
}

/// Parser for the question section.
#[derive(Debug)]
pub struct QuestionParser<'a> {
    /// The message data.
    data: &'a [u8],
    /// Current offset in the message.
    offset: usize,
    /// Number of questions remaining.
    remaining: u16,
}

impl<'a> QuestionParser<'a> {
    /// Creates a new question parser.
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

    /// Parses the next question.
    pub fn next(&mut self) -> Result<Option<Question>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let (question, consumed) = Question::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;

        Ok(Some(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_question_creation() {
        let name = Name::from_str("example.com").unwrap();
        let q = Question::a(name.clone());

        assert_eq!(q.qname, name);
        assert_eq!(q.qtype, Type::Known(RecordType::A));
        assert_eq!(q.qclass, Class::Known(RecordClass::IN));
    }

    #[test]
    fn test_question_wire_bytes() {
        let q = Question::a(Name::from_str("example.com").unwrap());

        let mut enc = MessageEncoder::new(q.max_len());
        q.encode(&mut enc).unwrap();

        let expected = [
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0, // QNAME
            0x00, 0x01, // QTYPE = A
            0x00, 0x01, // QCLASS = IN
        ];
        assert_eq!(enc.as_bytes(), &expected);
    }

    #[test]
    fn test_question_roundtrip() {
        let original = Question::aaaa(Name::from_str("www.example.com").unwrap());

        let mut enc = MessageEncoder::new(original.max_len());
        original.encode(&mut enc).unwrap();
        let wire = enc.freeze();

        let (parsed, consumed) = Question::parse(&wire, 0).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_question_matching() {
        let name = Name::from_str("example.com").unwrap();
        let q1 = Question::a(name.clone());
        let q2 = Question::a(Name::from_str("EXAMPLE.COM").unwrap());
        let q3 = Question::aaaa(name);

        assert!(q1.matches(&q2)); // case insensitive
        assert!(!q1.matches(&q3)); // different type
    }

    #[test]
    fn test_max_len_is_upper_bound() {
        let q = Question::a(Name::from_str("www.example.com").unwrap());
        let mut enc = MessageEncoder::new(q.max_len());
        q.encode(&mut enc).unwrap();
        assert!(enc.len() <= q.max_len());
    }
}
