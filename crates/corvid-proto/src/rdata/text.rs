//! Text record types (TXT).

use crate::error::{Error, Result};
use crate::wire::MessageEncoder;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// TXT record - Text (RFC 1035).
///
/// Holds one or more character-strings of up to 255 bytes each. Protocols
/// built on TXT (SPF, DKIM, domain verification) treat the concatenation of
/// all strings as the semantic value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TXT {
    /// The character-strings (each up to 255 bytes).
    strings: SmallVec<[Vec<u8>; 2]>,
}

impl TXT {
    /// Creates a new TXT record with the given strings.
    pub fn new(strings: impl IntoIterator<Item = impl Into<Vec<u8>>>) -> Self {
        Self {
            strings: strings.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a TXT record from a single string.
    pub fn from_string(s: impl Into<Vec<u8>>) -> Self {
        Self {
            strings: smallvec::smallvec![s.into()],
        }
    }

    /// Returns the character-strings.
    pub fn strings(&self) -> &[Vec<u8>] {
        &self.strings
    }

    /// Returns all strings concatenated.
    pub fn data(&self) -> Vec<u8> {
        self.strings.iter().flatten().copied().collect()
    }

    /// Returns the concatenated data as a UTF-8 string if valid.
    pub fn text(&self) -> Option<String> {
        String::from_utf8(self.data()).ok()
    }

    /// Parses a TXT record from its RDATA bytes.
    ///
    /// The strings must tile the RDATA exactly.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut strings = SmallVec::new();
        let mut pos = 0;

        while pos < data.len() {
            let len = data[pos] as usize;
            pos += 1;

            if pos + len > data.len() {
                return Err(Error::invalid_rdata(
                    "TXT",
                    format!("string length {len} exceeds remaining data"),
                ));
            }

            strings.push(data[pos..pos + len].to_vec());
            pos += len;
        }

        Ok(Self { strings })
    }

    /// Returns the maximum wire length.
    pub fn max_len(&self) -> usize {
        self.strings
            .iter()
            .map(|s| s.chunks(255).map(|c| 1 + c.len()).sum::<usize>().max(1))
            .sum()
    }

    /// Writes the TXT record to the encoder.
    ///
    /// Strings longer than 255 bytes are split into chunks on the way out.
    pub fn encode(&self, enc: &mut MessageEncoder) -> Result<()> {
        for s in &self.strings {
            if s.is_empty() {
                enc.write_u8(0);
                continue;
            }
            for chunk in s.chunks(255) {
                enc.write_u8(chunk.len() as u8);
                enc.write_bytes(chunk);
            }
        }
        Ok(())
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for s in &self.strings {
            if !first {
                write!(f, " ")?;
            }
            first = false;

            write!(f, "\"")?;
            for &byte in s {
                if byte == b'"' || byte == b'\\' {
                    write!(f, "\\{}", byte as char)?;
                } else if byte.is_ascii_graphic() || byte == b' ' {
                    write!(f, "{}", byte as char)?;
                } else {
                    write!(f, "\\{byte:03}")?;
                }
            }
            write!(f, "\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_record() {
        let txt = TXT::from_string("Hello, World!");
        assert_eq!(txt.text(), Some("Hello, World!".to_string()));
    }

    #[test]
    fn test_txt_multiple_strings() {
        let txt = TXT::new(vec!["Hello, ", "World!"]);
        assert_eq!(txt.data(), b"Hello, World!");
        assert_eq!(txt.strings().len(), 2);
    }

    #[test]
    fn test_txt_roundtrip() {
        let original = TXT::new(vec!["v=spf1 ", "include:example.com ~all"]);

        let mut enc = MessageEncoder::new(original.max_len());
        original.encode(&mut enc).unwrap();
        let parsed = TXT::parse(enc.as_bytes()).unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn test_txt_overlong_string_is_chunked() {
        let txt = TXT::from_string(vec![b'x'; 600]);

        let mut enc = MessageEncoder::new(txt.max_len());
        txt.encode(&mut enc).unwrap();

        let parsed = TXT::parse(enc.as_bytes()).unwrap();
        assert_eq!(parsed.strings().len(), 3); // 255 + 255 + 90
        assert_eq!(parsed.data(), txt.data());
    }

    #[test]
    fn test_txt_truncated_string() {
        // Declared length 5 with only 3 bytes of data
        let data = [5, b'a', b'b', b'c'];
        assert!(matches!(
            TXT::parse(&data),
            Err(Error::InvalidRData { .. })
        ));
    }

    #[test]
    fn test_txt_display_escaping() {
        let txt = TXT::from_string("say \"hi\"");
        assert_eq!(txt.to_string(), "\"say \\\"hi\\\"\"");
    }
}
