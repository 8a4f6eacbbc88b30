//! # Corvid DNS Protocol Library
//!
//! This crate provides the DNS wire-format types, parsing, and serialization
//! used by the corvid stub-resolver client, following RFC 1035 and its
//! clarifications.
//!
//! ## Features
//!
//! - **Byte-exact RFC 1035 codec** for headers, questions, and resource records
//! - **Name compression** on encode (call-scoped table) and decode (pointer
//!   chasing with strict backward-progress enforcement)
//! - **Historical binary EDNS label form** (RFC 2673) recognized on decode
//! - **Unknown record types** preserved as opaque bytes for round-trip fidelity
//! - **Canonical encoding** (compression off, lowercased labels) for
//!   deterministic byte output
//!
//! ## Example
//!
//! ```rust
//! use corvid_proto::{Message, Name, Question, RecordClass, RecordType};
//! use std::str::FromStr;
//!
//! let question = Question::new(
//!     Name::from_str("example.com.").unwrap(),
//!     RecordType::A,
//!     RecordClass::IN,
//! );
//! let query = Message::query(question);
//!
//! let wire = query.to_wire().unwrap();
//! let parsed = Message::parse(&wire).unwrap();
//! assert_eq!(query.id(), parsed.id());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod class;
pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod opcode;
pub mod question;
pub mod rcode;
pub mod rdata;
pub mod record;
pub mod rtype;
pub mod wire;

// Re-exports for convenience
pub use class::{Class, RecordClass};
pub use error::{Error, Result};
pub use header::Header;
pub use message::Message;
pub use name::Name;
pub use opcode::OpCode;
pub use question::Question;
pub use rcode::ResponseCode;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};

/// Maximum length of a DNS label (63 bytes per RFC 1035).
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name in wire format (255 bytes per RFC 1035).
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum number of labels in a single domain name.
pub const MAX_LABELS: usize = 127;

/// Maximum size of a UDP DNS message without EDNS0 (512 bytes per RFC 1035).
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// DNS port (53).
pub const DNS_PORT: u16 = 53;
