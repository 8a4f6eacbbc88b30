//! DNS label handling.
//!
//! A label is a single component of a domain name, at most 63 bytes on the
//! wire. Labels own their bytes so that decoded names outlive the message
//! buffer they came from.

use crate::error::{Error, Result};
use crate::MAX_LABEL_LENGTH;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single DNS label (component of a domain name).
///
/// Labels are the individual parts of a domain name separated by dots.
/// In `www.example.com`, the labels are `www`, `example`, and `com`.
///
/// Labels compare case-insensitively per RFC 1035, and hash on their
/// lowercase form so that they can key compression tables.
#[derive(Clone)]
pub struct Label {
    /// The raw bytes of the label (without length prefix).
    bytes: SmallVec<[u8; 16]>,
    /// True for the presentation-form rendering of a bit-string label.
    /// Rendered labels display verbatim and have no wire form.
    rendered: bool,
}

impl Label {
    /// Creates a label from a byte slice, enforcing the wire-format limit.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid_data(0, "empty label"));
        }
        if bytes.len() > MAX_LABEL_LENGTH {
            return Err(Error::LabelTooLong { length: bytes.len() });
        }
        Ok(Self {
            bytes: SmallVec::from_slice(bytes),
            rendered: false,
        })
    }

    /// Creates the rendered form of a historical bit-string label.
    ///
    /// The bytes already carry presentation syntax (`\[x<hex>/<bits>]`), so
    /// display is verbatim and the label is decode-only: writing it to the
    /// wire fails.
    pub(crate) fn from_rendered(bytes: Vec<u8>) -> Self {
        Self {
            bytes: SmallVec::from_vec(bytes),
            rendered: true,
        }
    }

    /// Returns the raw bytes of the label.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the length of the label in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the label is empty.
    ///
    /// Constructed labels are never empty; this exists for completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns true if this label can be written in wire format.
    #[inline]
    pub fn is_encodable(&self) -> bool {
        !self.rendered && !self.bytes.is_empty() && self.bytes.len() <= MAX_LABEL_LENGTH
    }

    /// Checks that the label has a wire form.
    pub(crate) fn check_encodable(&self) -> Result<()> {
        if self.rendered {
            return Err(Error::invalid_data(0, "bit-string label has no wire form"));
        }
        if self.bytes.len() > MAX_LABEL_LENGTH {
            return Err(Error::LabelTooLong {
                length: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Returns the label as a string, if it is valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Returns a lowercase copy of the label.
    #[must_use]
    pub fn to_lowercase(&self) -> Self {
        Self {
            bytes: self.bytes.iter().map(u8::to_ascii_lowercase).collect(),
            rendered: self.rendered,
        }
    }

    /// Case-insensitive comparison with another label.
    #[inline]
    pub fn eq_ignore_ascii_case(&self, other: &Label) -> bool {
        self.bytes.eq_ignore_ascii_case(&other.bytes)
    }

    /// Canonical comparison per RFC 4034: lowercase octets; with a common
    /// prefix, the shorter label sorts first.
    pub fn cmp_canonical(&self, other: &Label) -> Ordering {
        for (a, b) in self.bytes.iter().zip(other.bytes.iter()) {
            match a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.len().cmp(&other.len())
    }

    /// Returns true if this is the wildcard label `*`.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.bytes.as_slice() == b"*"
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rendered {
            // Already presentation syntax
            for &byte in self.bytes.iter() {
                write!(f, "{}", byte as char)?;
            }
            return Ok(());
        }

        for &byte in self.bytes.iter() {
            if byte == b'.' || byte == b'\\' {
                write!(f, "\\{}", byte as char)?;
            } else if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                // Escape non-printable characters as \DDD
                write!(f, "\\{byte:03}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label(\"{self}\")")
    }
}

impl PartialEq for Label {
    /// Case-insensitive equality per DNS semantics.
    fn eq(&self, other: &Self) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.bytes.iter() {
            byte.to_ascii_lowercase().hash(state);
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_canonical(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_basics() {
        let label = Label::new(b"example").unwrap();
        assert_eq!(label.len(), 7);
        assert_eq!(label.as_str(), Some("example"));
        assert_eq!(label.to_string(), "example");
        assert!(label.is_encodable());
    }

    #[test]
    fn test_label_limits() {
        assert!(Label::new(b"").is_err());
        assert!(Label::new(&[b'a'; 63]).is_ok());
        assert!(matches!(
            Label::new(&[b'a'; 64]),
            Err(Error::LabelTooLong { length: 64 })
        ));
    }

    #[test]
    fn test_case_insensitive_comparison() {
        let lower = Label::new(b"example").unwrap();
        let upper = Label::new(b"EXAMPLE").unwrap();
        let mixed = Label::new(b"ExAmPlE").unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn test_escaped_display() {
        let label = Label::new(&[b'a', b'.', b'b', 0x07]).unwrap();
        assert_eq!(label.to_string(), "a\\.b\\007");
    }

    #[test]
    fn test_canonical_ordering() {
        let a = Label::new(b"a").unwrap();
        let b = Label::new(b"B").unwrap();
        let aa = Label::new(b"aa").unwrap();

        // Single chars compare case-insensitively
        assert!(a < b);

        // With a common prefix, the shorter label sorts first
        assert!(a < aa);
    }

    #[test]
    fn test_wildcard() {
        assert!(Label::new(b"*").unwrap().is_wildcard());
        assert!(!Label::new(b"www").unwrap().is_wildcard());
    }

    #[test]
    fn test_rendered_label_displays_verbatim() {
        let rendered = Label::from_rendered(b"\\[xf0/4]".to_vec());
        assert_eq!(rendered.to_string(), "\\[xf0/4]");
    }

    #[test]
    fn test_rendered_label_not_encodable() {
        let rendered = Label::from_rendered(b"\\[xf0/4]".to_vec());
        assert!(!rendered.is_encodable());
        assert!(rendered.check_encodable().is_err());
    }
}
