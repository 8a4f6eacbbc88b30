//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the DNS client.
///
/// DNS response codes (NXDOMAIN, SERVFAIL, ...) are not errors: they are
/// delivered in the parsed [`corvid_proto::Message`] for the caller to
/// interpret.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller violated the API contract; raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The wire bytes violate DNS framing or label rules.
    #[error("malformed DNS message: {0}")]
    Format(#[from] corvid_proto::Error),

    /// A socket operation failed.
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),

    /// A message exceeds the UDP payload limit and TCP is unavailable to
    /// carry it.
    #[error("message exceeds the UDP payload limit and TCP is disabled")]
    Truncated,

    /// The global or per-attempt deadline elapsed.
    #[error("query timed out")]
    Timeout,

    /// The caller's cancellation signal fired.
    #[error("query was cancelled")]
    Cancelled,

    /// Every configured server was tried without obtaining a usable reply.
    #[error("no server returned a usable response")]
    NoResponse {
        /// The last underlying per-server failure, if any attempt got far
        /// enough to produce one.
        #[source]
        source: Option<Box<Error>>,
    },
}

impl Error {
    /// Returns true if this error must propagate immediately instead of
    /// falling through to the next server.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::InvalidArgument(_))
    }

    /// Returns true for the extended-label decode failure the protocol layer
    /// distinguishes.
    pub fn is_unsupported_label(&self) -> bool {
        matches!(self, Self::Format(e) if e.is_unsupported_label())
    }
}
