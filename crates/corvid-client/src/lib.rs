//! # Corvid DNS Client
//!
//! A DNS stub-resolver client: given resolver addresses and a query, it
//! obtains an answer message over UDP and/or TCP, honoring timeouts and
//! cancellation.
//!
//! ## Features
//!
//! - **Ordered server fallback** with a fair share of the time budget per
//!   server
//! - **UDP first, TCP on truncation** against the same server, per RFC 1035
//! - **Multi-message TCP streams** (zone transfers) folded into one response
//! - **Cancellation** via `tokio_util::sync::CancellationToken`, combined
//!   with deadlines in every suspending call
//! - **Unpredictable transaction IDs**, regenerated per server attempt
//!
//! DNS response codes are data, not errors: NXDOMAIN and SERVFAIL responses
//! are returned in the parsed [`corvid_proto::Message`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use corvid_client::DnsClient;
//! use corvid_proto::{Name, RecordClass, RecordType};
//! use std::str::FromStr;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> corvid_client::Result<()> {
//! let client = DnsClient::new(
//!     vec!["9.9.9.9:53".parse().unwrap(), "149.112.112.112:53".parse().unwrap()],
//!     Duration::from_secs(5),
//! );
//!
//! let response = client
//!     .resolve_async(
//!         Name::from_str("example.com")?,
//!         RecordType::A,
//!         RecordClass::IN,
//!         Default::default(),
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//!
//! println!("{response}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod exchange;
mod transport;

pub use client::{DnsClient, QueryOptions};
pub use error::{Error, Result};
pub use exchange::ExchangeConfig;

// Protocol types most callers need alongside the client
pub use corvid_proto as proto;
