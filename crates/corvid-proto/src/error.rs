//! DNS protocol error types.
//!
//! Errors raised while parsing or serializing DNS wire-format data.

use thiserror::Error;

/// Result type alias for DNS protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// DNS protocol errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Wire Format Parsing Errors
    // =========================================================================
    /// Buffer is too short to contain the expected data.
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Expected minimum size.
        expected: usize,
        /// Actual buffer size.
        actual: usize,
    },

    /// Unexpected end of data while parsing.
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof {
        /// Byte offset where EOF was encountered.
        offset: usize,
    },

    /// Invalid data encountered during parsing.
    #[error("invalid data at offset {offset}: {message}")]
    InvalidData {
        /// Byte offset of the invalid data.
        offset: usize,
        /// Description of the error.
        message: String,
    },

    // =========================================================================
    // Domain Name Errors
    // =========================================================================
    /// Label exceeds maximum length of 63 bytes.
    #[error("label too long: {length} bytes exceeds maximum of 63")]
    LabelTooLong {
        /// Actual label length.
        length: usize,
    },

    /// Domain name exceeds maximum length of 255 bytes.
    #[error("name too long: {length} bytes exceeds maximum of 255")]
    NameTooLong {
        /// Actual name length in wire format.
        length: usize,
    },

    /// Domain name has more labels than the decoder permits.
    #[error("too many labels in name (>{max})")]
    TooManyLabels {
        /// Maximum allowed label count.
        max: usize,
    },

    /// Invalid label character in presentation form.
    #[error("invalid character '{character}' in label at position {position}")]
    InvalidLabelChar {
        /// The invalid character.
        character: char,
        /// Position in the label.
        position: usize,
    },

    /// Invalid compression pointer.
    ///
    /// Pointers must target an offset strictly below the position where they
    /// appear, otherwise decoding could loop.
    #[error("invalid compression pointer at offset {offset}: points to {target}")]
    InvalidCompressionPointer {
        /// Offset of the pointer.
        offset: usize,
        /// Target offset the pointer references.
        target: usize,
    },

    /// Too many compression pointer jumps.
    #[error("too many compression pointer jumps (>{max_jumps})")]
    TooManyPointerJumps {
        /// Maximum allowed jumps.
        max_jumps: usize,
    },

    /// Extended label type other than the historical binary form.
    #[error("unsupported extended label type 0x{label_type:02X} at offset {offset}")]
    UnsupportedLabelType {
        /// The first byte of the label.
        label_type: u8,
        /// Byte offset of the label.
        offset: usize,
    },

    // =========================================================================
    // RDATA Errors
    // =========================================================================
    /// RDATA length mismatch.
    #[error("RDATA length mismatch for {rtype}: expected {expected}, got {actual}")]
    RDataLengthMismatch {
        /// Record type.
        rtype: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Invalid RDATA content.
    #[error("invalid RDATA for {rtype}: {message}")]
    InvalidRData {
        /// Record type.
        rtype: String,
        /// Error description.
        message: String,
    },
}

impl Error {
    /// Creates a new `BufferTooShort` error.
    #[inline]
    pub fn buffer_too_short(expected: usize, actual: usize) -> Self {
        Self::BufferTooShort { expected, actual }
    }

    /// Creates a new `UnexpectedEof` error.
    #[inline]
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::UnexpectedEof { offset }
    }

    /// Creates a new `InvalidData` error.
    #[inline]
    pub fn invalid_data(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidData {
            offset,
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRData` error.
    #[inline]
    pub fn invalid_rdata(rtype: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRData {
            rtype: rtype.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error came from an extended label type the
    /// decoder does not support.
    #[inline]
    pub fn is_unsupported_label(&self) -> bool {
        matches!(self, Self::UnsupportedLabelType { .. })
    }

    /// Returns true if this error indicates malformed wire data.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::BufferTooShort { .. }
                | Self::UnexpectedEof { .. }
                | Self::InvalidData { .. }
                | Self::InvalidCompressionPointer { .. }
                | Self::TooManyPointerJumps { .. }
                | Self::TooManyLabels { .. }
                | Self::RDataLengthMismatch { .. }
                | Self::InvalidRData { .. }
        )
    }
}
