//! DNS message representation.
//!
//! A DNS message consists of a header, question section, and three
//! resource record sections (answer, authority, additional).

use crate::error::{Error, Result};
use crate::header::{Header, HEADER_SIZE};
use crate::name::Name;
use crate::question::{Question, QuestionParser};
use crate::rcode::ResponseCode;
use crate::rdata::SOA;
use crate::record::{RecordParser, ResourceRecord};
use crate::rtype::RecordType;
use crate::wire::MessageEncoder;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete DNS message.
///
/// DNS messages consist of:
/// - A fixed 12-byte header
/// - A question section (queries)
/// - An answer section (responses to queries)
/// - An authority section (NS/SOA records for referrals)
/// - An additional section (related records)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The message header.
    header: Header,
    /// The question section.
    questions: Vec<Question>,
    /// The answer section.
    answers: Vec<ResourceRecord>,
    /// The authority section.
    authority: Vec<ResourceRecord>,
    /// The additional section.
    additional: Vec<ResourceRecord>,
}

impl Message {
    /// Creates a new empty message with the given header.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Creates a query message with a random transaction ID and recursion
    /// requested.
    pub fn query(question: Question) -> Self {
        let header = Header::query();
        Self {
            header,
            questions: vec![question],
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    // =========================================================================
    // Header accessors
    // =========================================================================

    /// Returns the message header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns a mutable reference to the header.
    #[inline]
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Returns the transaction ID.
    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Sets the transaction ID.
    #[inline]
    pub fn set_id(&mut self, id: u16) {
        self.header.id = id;
    }

    /// Returns the response code.
    #[inline]
    pub fn rcode(&self) -> ResponseCode {
        self.header.rcode
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        self.header.is_query()
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.header.is_response()
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.header.is_truncated()
    }

    // =========================================================================
    // Section accessors
    // =========================================================================

    /// Returns the question section.
    #[inline]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns the first question if present.
    #[inline]
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Returns the answer section.
    #[inline]
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Returns the authority section.
    #[inline]
    pub fn authority(&self) -> &[ResourceRecord] {
        &self.authority
    }

    /// Returns the additional section.
    #[inline]
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    // =========================================================================
    // Section mutators
    // =========================================================================

    /// Adds a question.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
        self.header.qd_count = self.questions.len() as u16;
    }

    /// Adds an answer record.
    pub fn add_answer(&mut self, record: ResourceRecord) {
        self.answers.push(record);
        self.header.an_count = self.answers.len() as u16;
    }

    /// Adds multiple answer records.
    pub fn add_answers(&mut self, records: impl IntoIterator<Item = ResourceRecord>) {
        self.answers.extend(records);
        self.header.an_count = self.answers.len() as u16;
    }

    /// Adds an authority record.
    pub fn add_authority(&mut self, record: ResourceRecord) {
        self.authority.push(record);
        self.header.ns_count = self.authority.len() as u16;
    }

    /// Adds multiple authority records.
    pub fn add_authority_records(&mut self, records: impl IntoIterator<Item = ResourceRecord>) {
        self.authority.extend(records);
        self.header.ns_count = self.authority.len() as u16;
    }

    /// Adds an additional record.
    pub fn add_additional(&mut self, record: ResourceRecord) {
        self.additional.push(record);
        self.header.ar_count = self.additional.len() as u16;
    }

    /// Adds multiple additional records.
    pub fn add_additional_records(&mut self, records: impl IntoIterator<Item = ResourceRecord>) {
        self.additional.extend(records);
        self.header.ar_count = self.additional.len() as u16;
    }

    /// Absorbs the record sections of a continuation message.
    ///
    /// Zone-transfer responses arrive as several messages on one TCP
    /// stream; the engine folds each continuation into the first message.
    pub fn absorb(&mut self, continuation: Message) {
        self.add_answers(continuation.answers);
        self.add_authority_records(continuation.authority);
        self.add_additional_records(continuation.additional);
    }

    // =========================================================================
    // Response helpers
    // =========================================================================

    /// Returns true if this is an NXDOMAIN response.
    pub fn is_nxdomain(&self) -> bool {
        self.rcode().is_nxdomain()
    }

    /// Returns answer records of a specific type.
    pub fn answers_of_type(&self, rtype: RecordType) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .filter(move |r| r.record_type() == Some(rtype))
    }

    /// Returns A record addresses from the answers.
    pub fn a_records(&self) -> impl Iterator<Item = std::net::Ipv4Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_a())
    }

    /// Returns AAAA record addresses from the answers.
    pub fn aaaa_records(&self) -> impl Iterator<Item = std::net::Ipv6Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_aaaa())
    }

    /// Returns the first CNAME target in the answers.
    pub fn cname_target(&self) -> Option<&Name> {
        self.answers.iter().find_map(|r| r.rdata().as_cname())
    }

    /// Returns the first SOA payload in the answer or authority section.
    pub fn soa(&self) -> Option<&SOA> {
        self.answers
            .iter()
            .chain(&self.authority)
            .find_map(|r| r.rdata().as_soa())
    }

    /// Returns true if more messages of the same logical response are
    /// expected on the stream.
    ///
    /// Zone-transfer responses are bracketed by the zone's SOA record: the
    /// stream opens with it and a second occurrence closes it. For any
    /// other question, a single message is the whole response. Error
    /// responses end a stream immediately.
    pub fn next_message_pending(&self) -> bool {
        let Some(question) = self.question() else {
            return false;
        };
        if !question.is_transfer() || !self.rcode().is_success() {
            return false;
        }

        let soa_count = self
            .answers
            .iter()
            .filter(|r| r.record_type() == Some(RecordType::SOA))
            .count();

        match soa_count {
            // A transfer stream opens with the zone's SOA; without one there
            // is nothing to continue
            0 => false,
            1 => true,
            _ => !self.answers.last().is_some_and(ResourceRecord::is_soa),
        }
    }

    // =========================================================================
    // Wire format
    // =========================================================================

    /// Parses a DNS message from wire format.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::buffer_too_short(HEADER_SIZE, data.len()));
        }

        let header = Header::parse(data)?;

        // Header counts are attacker-controlled; cap the preallocation by
        // what the buffer could actually hold (a record is at least 11
        // bytes, a question at least 5)
        let cap = |count: u16, min_size: usize| (count as usize).min(data.len() / min_size + 1);

        let mut offset = HEADER_SIZE;
        let mut questions = Vec::with_capacity(cap(header.qd_count, 5));
        let mut answers = Vec::with_capacity(cap(header.an_count, 11));
        let mut authority = Vec::with_capacity(cap(header.ns_count, 11));
        let mut additional = Vec::with_capacity(cap(header.ar_count, 11));

        let mut q_parser = QuestionParser::new(data, offset, header.qd_count);
        while let Some(q) = q_parser.next()? {
            questions.push(q);
        }
        offset = q_parser.offset();

        let mut an_parser = RecordParser::new(data, offset, header.an_count);
        while let Some(r) = an_parser.next()? {
            answers.push(r);
        }
        offset = an_parser.offset();

        let mut ns_parser = RecordParser::new(data, offset, header.ns_count);
        while let Some(r) = ns_parser.next()? {
            authority.push(r);
        }
        offset = ns_parser.offset();

        let mut ar_parser = RecordParser::new(data, offset, header.ar_count);
        while let Some(r) = ar_parser.next()? {
            additional.push(r);
        }

        Ok(Self {
            header,
            questions,
            answers,
            authority,
            additional,
        })
    }

    /// Returns the maximum number of octets this message occupies on the
    /// wire, without compression.
    ///
    /// An upper bound suitable for sizing the encode buffer; the actual
    /// encoding may be shorter.
    pub fn max_len(&self) -> usize {
        HEADER_SIZE
            + self.questions.iter().map(Question::max_len).sum::<usize>()
            + self
                .answers
                .iter()
                .chain(&self.authority)
                .chain(&self.additional)
                .map(ResourceRecord::max_len)
                .sum::<usize>()
    }

    /// Writes the message through the given encoder.
    fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        let mut header = self.header.clone();
        header.qd_count = self.questions.len() as u16;
        header.an_count = self.answers.len() as u16;
        header.ns_count = self.authority.len() as u16;
        header.ar_count = self.additional.len() as u16;
        header.encode(enc);

        for q in &self.questions {
            q.encode(enc)?;
        }
        for r in self
            .answers
            .iter()
            .chain(&self.authority)
            .chain(&self.additional)
        {
            r.encode(enc)?;
        }

        Ok(())
    }

    /// Serializes the message to wire format with name compression.
    pub fn to_wire(&self) -> Result<Bytes> {
        let mut enc = MessageEncoder::new(self.max_len());
        self.encode(&mut enc)?;
        Ok(enc.freeze())
    }

    /// Serializes the message in canonical form: compression off, labels
    /// lowercased. Identical messages always produce identical bytes.
    pub fn to_wire_canonical(&self) -> Result<Bytes> {
        let mut enc = MessageEncoder::canonical(self.max_len());
        self.encode(&mut enc)?;
        Ok(enc.freeze())
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new(Header::default())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; ->>HEADER<<- {}", self.header)?;

        writeln!(f, "\n;; QUESTION SECTION:")?;
        for q in &self.questions {
            writeln!(f, ";{q}")?;
        }

        if !self.answers.is_empty() {
            writeln!(f, "\n;; ANSWER SECTION:")?;
            for r in &self.answers {
                writeln!(f, "{r}")?;
            }
        }

        if !self.authority.is_empty() {
            writeln!(f, "\n;; AUTHORITY SECTION:")?;
            for r in &self.authority {
                writeln!(f, "{r}")?;
            }
        }

        if !self.additional.is_empty() {
            writeln!(f, "\n;; ADDITIONAL SECTION:")?;
            for r in &self.additional {
                writeln!(f, "{r}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::RecordClass;
    use crate::name::Name;
    use crate::rdata::{RData, NS, SOA};
    use crate::rtype::Type;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn soa_record(zone: &Name) -> ResourceRecord {
        ResourceRecord::new_known(
            zone.clone(),
            RecordType::SOA,
            RecordClass::IN,
            3600,
            RData::SOA(SOA::new(
                Name::from_str("ns1.example.com").unwrap(),
                Name::from_str("hostmaster.example.com").unwrap(),
                1,
                7200,
                3600,
                1_209_600,
                300,
            )),
        )
    }

    #[test]
    fn test_query_creation() {
        let q = Question::a(Name::from_str("example.com").unwrap());
        let msg = Message::query(q);

        assert!(msg.is_query());
        assert!(!msg.is_response());
        assert_eq!(msg.questions().len(), 1);
        assert!(msg.header().recursion_desired());
    }

    #[test]
    fn test_query_wire_bytes() {
        // Concrete scenario: example.com A IN, ID=0x1234, RD=1
        let mut msg = Message::query(Question::a(Name::from_str("example.com").unwrap()));
        msg.set_id(0x1234);

        let wire = msg.to_wire().unwrap();
        let expected = [
            0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // header
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0, // QNAME
            0x00, 0x01, // QTYPE = A
            0x00, 0x01, // QCLASS = IN
        ];
        assert_eq!(&wire[..], &expected);
    }

    #[test]
    fn test_message_roundtrip() {
        let mut original = Message::query(Question::a(Name::from_str("example.com").unwrap()));
        original.set_id(0x1234);
        original.add_answer(ResourceRecord::a(
            Name::from_str("example.com").unwrap(),
            300,
            Ipv4Addr::new(192, 0, 2, 1),
        ));
        original.add_authority(ResourceRecord::new_known(
            Name::from_str("example.com").unwrap(),
            RecordType::NS,
            RecordClass::IN,
            86400,
            RData::NS(NS::new(Name::from_str("ns1.example.com").unwrap())),
        ));

        let wire = original.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();

        assert_eq!(original, parsed);
        assert_eq!(parsed.answers_of_type(RecordType::A).count(), 1);
        assert_eq!(parsed.a_records().count(), 1);
        assert_eq!(parsed.aaaa_records().count(), 0);
        assert!(!parsed.is_nxdomain());
    }

    #[test]
    fn test_compressed_and_uncompressed_parse_equal() {
        let mut msg = Message::query(Question::a(Name::from_str("www.example.com").unwrap()));
        msg.set_id(7);
        msg.add_answer(ResourceRecord::cname(
            Name::from_str("www.example.com").unwrap(),
            60,
            Name::from_str("example.com").unwrap(),
        ));

        let compressed = msg.to_wire().unwrap();
        let canonical = msg.to_wire_canonical().unwrap();
        assert!(compressed.len() < canonical.len());

        let a = Message::parse(&compressed).unwrap();
        let b = Message::parse(&canonical).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.cname_target(),
            Some(&Name::from_str("example.com").unwrap())
        );
    }

    #[test]
    fn test_compressed_ns_pointing_at_qname() {
        // Response whose NS RDATA is a bare pointer back to the QNAME at
        // offset 12
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0xAB, 0xCD, 0x80, 0x00, // ID, QR=1
            0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        ]);
        data.extend_from_slice(&[7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0]);
        data.extend_from_slice(&[0x00, 0x02, 0x00, 0x01]); // NS IN
        data.extend_from_slice(&[0xC0, 0x0C]); // owner: ptr to QNAME
        data.extend_from_slice(&[0x00, 0x02, 0x00, 0x01]); // NS IN
        data.extend_from_slice(&86400u32.to_be_bytes());
        data.extend_from_slice(&2u16.to_be_bytes()); // RDLENGTH
        data.extend_from_slice(&[0xC0, 0x0C]); // NSDNAME: ptr to QNAME

        let msg = Message::parse(&data).unwrap();
        let expected = Name::from_str("example.com").unwrap();
        assert_eq!(msg.question().unwrap().qname, expected);

        let RData::NS(ns) = msg.answers()[0].rdata() else {
            panic!("expected NS rdata");
        };
        assert_eq!(ns.nsdname(), &expected);
    }

    #[test]
    fn test_counts_follow_sections() {
        let mut msg = Message::query(Question::a(Name::from_str("example.com").unwrap()));
        msg.add_answer(ResourceRecord::a(
            Name::from_str("example.com").unwrap(),
            300,
            Ipv4Addr::new(192, 0, 2, 1),
        ));

        let wire = msg.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();
        assert_eq!(parsed.header().qd_count, 1);
        assert_eq!(parsed.header().an_count, 1);
        assert_eq!(parsed.header().ns_count, 0);
        assert_eq!(parsed.header().ar_count, 0);
    }

    #[test]
    fn test_parse_garbage_fails_cleanly() {
        assert!(Message::parse(&[]).is_err());
        assert!(Message::parse(&[0; 11]).is_err());

        // Header claims a question that is not there
        let data = [0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0];
        assert!(Message::parse(&data).is_err());
    }

    #[test]
    fn test_next_message_pending_non_transfer() {
        let mut msg = Message::query(Question::a(Name::from_str("example.com").unwrap()));
        msg.header_mut().set_response(true);
        assert!(!msg.next_message_pending());
    }

    #[test]
    fn test_next_message_pending_axfr() {
        let zone = Name::from_str("example.com").unwrap();
        let mut msg = Message::query(Question::axfr(zone.clone()));
        msg.header_mut().set_response(true);

        // Opening SOA only: more to come
        msg.add_answer(soa_record(&zone));
        assert!(msg.next_message_pending());

        // Intermediate records keep the stream open
        msg.add_answer(ResourceRecord::a(
            Name::from_str("www.example.com").unwrap(),
            300,
            Ipv4Addr::new(192, 0, 2, 1),
        ));
        assert!(msg.next_message_pending());

        // Closing SOA ends the stream
        msg.add_answer(soa_record(&zone));
        assert!(!msg.next_message_pending());
    }

    #[test]
    fn test_next_message_pending_error_response() {
        let zone = Name::from_str("example.com").unwrap();
        let mut msg = Message::query(Question::axfr(zone));
        msg.header_mut().set_response(true);
        msg.header_mut().rcode = ResponseCode::Refused;
        assert!(!msg.next_message_pending());
    }

    #[test]
    fn test_absorb_merges_sections() {
        let zone = Name::from_str("example.com").unwrap();
        let mut first = Message::query(Question::axfr(zone.clone()));
        first.header_mut().set_response(true);
        first.add_answer(soa_record(&zone));

        let mut second = Message::new(Header::new(first.id()));
        second.add_answer(ResourceRecord::a(
            Name::from_str("www.example.com").unwrap(),
            300,
            Ipv4Addr::new(192, 0, 2, 1),
        ));
        second.add_answer(soa_record(&zone));

        first.absorb(second);
        assert_eq!(first.answers().len(), 3);
        assert_eq!(first.header().an_count, 3);
        assert!(!first.next_message_pending());
        assert_eq!(first.soa().map(SOA::serial), Some(1));
    }

    #[test]
    fn test_max_len_is_upper_bound() {
        let mut msg = Message::query(Question::a(Name::from_str("www.example.com").unwrap()));
        msg.add_answer(ResourceRecord::cname(
            Name::from_str("www.example.com").unwrap(),
            60,
            Name::from_str("example.com").unwrap(),
        ));

        let wire = msg.to_wire().unwrap();
        assert!(wire.len() <= msg.max_len());
    }

    #[test]
    fn test_unknown_qtype_roundtrip() {
        let q = Question::new_generic(
            Name::from_str("example.com").unwrap(),
            Type::Unknown(61000),
            crate::class::Class::Known(RecordClass::IN),
        );
        let mut msg = Message::query(q);
        msg.set_id(1);

        let wire = msg.to_wire().unwrap();
        let parsed = Message::parse(&wire).unwrap();
        assert_eq!(msg, parsed);
    }
}
