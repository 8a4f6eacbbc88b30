//! DNS domain name representation and operations.
//!
//! This module implements DNS domain names per RFC 1035 and RFC 2181:
//!
//! - Label-vector storage with inline allocation for typical names
//! - Case-insensitive comparison per DNS semantics
//! - Parent derivation and concatenation
//! - Conversion to/from presentation form
//! - Upper-bound encoded-length computation for buffer sizing

mod label;
mod parse;

pub use label::Label;
pub use parse::NameParser;

use crate::error::{Error, Result};
use crate::{MAX_LABELS, MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A DNS domain name.
///
/// A name is an ordered sequence of labels; the empty sequence is the root.
/// Each label holds 1-63 octets and the whole name encodes to at most 255
/// octets including length prefixes and the terminating zero.
///
/// # Wire Format
///
/// Each label is prefixed by its length, and the sequence is terminated by a
/// zero-length root label. `www.example.com.` encodes as:
///
/// ```text
/// 03 'w' 'w' 'w' 07 'e' 'x' 'a' 'm' 'p' 'l' 'e' 03 'c' 'o' 'm' 00
/// ```
///
/// Messages may replace a trailing suffix of a name with a two-byte
/// compression pointer; decoding resolves pointers, so a `Name` value always
/// holds the fully expanded label sequence.
///
/// # Comparison Semantics
///
/// Names compare case-insensitively per RFC 1035; `Hash` matches by hashing
/// the lowercase form. `Ord` follows RFC 4034 canonical ordering.
///
/// # Example
///
/// ```rust
/// use corvid_proto::Name;
/// use std::str::FromStr;
///
/// let name = Name::from_str("www.example.com.").unwrap();
/// assert_eq!(name.label_count(), 3);
/// assert_eq!(Name::from_str("WWW.EXAMPLE.COM.").unwrap(), name);
/// assert_eq!(name.parent().unwrap().to_string(), "example.com.");
/// ```
#[derive(Clone, Default)]
pub struct Name {
    /// The labels, leftmost first. Empty for the root name.
    labels: SmallVec<[Label; 5]>,
}

impl Name {
    /// Creates the root domain name.
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self {
            labels: SmallVec::new(),
        }
    }

    /// Creates a name from a sequence of labels.
    pub fn from_labels(labels: impl IntoIterator<Item = Label>) -> Result<Self> {
        let labels: SmallVec<[Label; 5]> = labels.into_iter().collect();
        let name = Self { labels };
        name.check_limits()?;
        Ok(name)
    }

    /// Validates the label-count and encoded-length limits.
    fn check_limits(&self) -> Result<()> {
        if self.labels.len() > MAX_LABELS {
            return Err(Error::TooManyLabels { max: MAX_LABELS });
        }
        let encoded = self.max_encoded_len();
        if encoded > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong { length: encoded });
        }
        Ok(())
    }

    /// Returns the labels of this name, leftmost first.
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// Returns the label at the given index (0 = leftmost).
    #[inline]
    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Returns the number of labels (the root name has zero).
    #[inline]
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if this is the root domain.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the maximum number of octets this name occupies on the wire.
    ///
    /// This is `sum(1 + label_len) + 1` for the terminating root byte. It is
    /// an upper bound: compression may shorten the actual encoding.
    #[inline]
    pub fn max_encoded_len(&self) -> usize {
        self.labels.iter().map(|l| 1 + l.len()).sum::<usize>() + 1
    }

    /// Returns the parent domain (the name with its leftmost label removed).
    ///
    /// Returns `None` for the root domain.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            labels: self.labels[1..].iter().cloned().collect(),
        })
    }

    /// Returns the concatenation of this name and `suffix`.
    pub fn concat(&self, suffix: &Name) -> Result<Self> {
        let labels: SmallVec<[Label; 5]> = self
            .labels
            .iter()
            .chain(suffix.labels.iter())
            .cloned()
            .collect();
        let name = Self { labels };
        name.check_limits()?;
        Ok(name)
    }

    /// Returns true if this name equals `other` or is below it in the tree.
    pub fn is_subdomain_of(&self, other: &Name) -> bool {
        if self.label_count() < other.label_count() {
            return false;
        }
        self.labels
            .iter()
            .rev()
            .zip(other.labels.iter().rev())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Returns a lowercased copy of the name (the canonical form used for
    /// signatures and deterministic encoding).
    #[must_use]
    pub fn lowercased(&self) -> Self {
        Self {
            labels: self.labels.iter().map(Label::to_lowercase).collect(),
        }
    }

    /// Returns true if every label can be written in wire format.
    ///
    /// False only for names holding the rendered form of a historical binary
    /// label, which is decode-only.
    pub fn is_encodable(&self) -> bool {
        self.labels.iter().all(Label::is_encodable)
    }

    /// Appends the uncompressed wire form of this name to `out`.
    pub(crate) fn write_uncompressed(&self, out: &mut bytes::BytesMut, lowercase: bool) -> Result<()> {
        use bytes::BufMut;
        for label in &self.labels {
            label.check_encodable()?;
            out.put_u8(label.len() as u8);
            if lowercase {
                out.extend(label.as_bytes().iter().map(u8::to_ascii_lowercase));
            } else {
                out.put_slice(label.as_bytes());
            }
        }
        out.put_u8(0);
        Ok(())
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses a domain name from presentation form.
    ///
    /// A trailing dot marks a fully-qualified name; if absent, one is
    /// implied. `""` and `"."` both parse to the root.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let s = s.strip_suffix('.').unwrap_or(s);
        let mut labels = SmallVec::new();

        for part in s.split('.') {
            if part.is_empty() {
                return Err(Error::invalid_data(0, "empty label in name"));
            }
            if part.len() > MAX_LABEL_LENGTH {
                return Err(Error::LabelTooLong { length: part.len() });
            }

            // Allow alphanumerics, hyphen, underscore, and the wildcard star
            for (i, c) in part.chars().enumerate() {
                if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '*' {
                    return Err(Error::InvalidLabelChar {
                        character: c,
                        position: i,
                    });
                }
            }

            labels.push(Label::new(part.as_bytes())?);
        }

        let name = Self { labels };
        name.check_limits()?;
        Ok(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        for label in &self.labels {
            write!(f, "{label}.")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{self}\")")
    }
}

impl PartialEq for Name {
    /// Case-insensitive comparison per DNS semantics.
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.len().hash(state);
        for label in &self.labels {
            label.hash(state);
        }
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Canonical DNS name ordering per RFC 4034: compare label by label from
    /// the root side.
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.labels.iter().rev().zip(other.labels.iter().rev()) {
            let cmp = a.cmp_canonical(b);
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        self.labels.len().cmp(&other.labels.len())
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
