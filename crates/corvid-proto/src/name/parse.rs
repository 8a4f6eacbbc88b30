//! DNS name parsing from wire format.
//!
//! Handles the three label forms that appear in messages: ordinary labels,
//! compression pointers (RFC 1035 Section 4.1.4), and the historical binary
//! EDNS label form (RFC 2673), which is recognized on decode and rendered in
//! its presentation form.

use super::{Label, Name};
use crate::error::{Error, Result};
use crate::{MAX_LABELS, MAX_NAME_LENGTH};
use data_encoding::HEXLOWER;
use smallvec::SmallVec;

/// Maximum number of compression pointer jumps.
///
/// Pointers must target strictly earlier offsets, so decoding always
/// terminates; the cap bounds work on hostile messages long before that.
const MAX_POINTER_JUMPS: usize = 127;

/// First byte of a binary (bit-string) label, the only extended label type
/// this decoder renders.
const BINARY_LABEL_TYPE: u8 = 0x41;

/// Parser for reading domain names from DNS wire format.
///
/// The parser holds the complete message buffer so compression pointers can
/// be followed anywhere a name appears, including inside record data.
#[derive(Debug, Clone)]
pub struct NameParser<'a> {
    /// The complete message buffer (for compression pointer resolution).
    message: &'a [u8],
}

impl<'a> NameParser<'a> {
    /// Creates a new name parser over the given message buffer.
    #[inline]
    pub const fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    /// Parses a domain name starting at the given offset.
    ///
    /// Returns the parsed name and the number of bytes the caller's cursor
    /// must advance. A compression pointer terminates the caller-visible
    /// portion of the name, so consumption stops two bytes after it.
    pub fn parse_name(&self, offset: usize) -> Result<(Name, usize)> {
        let mut labels: SmallVec<[Label; 5]> = SmallVec::new();
        let mut consumed = 0;
        let mut pos = offset;
        let mut jumps = 0;
        let mut followed_pointer = false;
        let mut encoded_len = 1usize; // terminating root byte

        loop {
            if pos >= self.message.len() {
                return Err(Error::UnexpectedEof { offset: pos });
            }

            let len_byte = self.message[pos];

            // Compression pointer: top two bits set
            if len_byte >= 0xC0 {
                if pos + 1 >= self.message.len() {
                    return Err(Error::UnexpectedEof { offset: pos + 1 });
                }

                let target =
                    usize::from(u16::from_be_bytes([len_byte & 0x3F, self.message[pos + 1]]));

                // A pointer must make strict backward progress, otherwise the
                // chain could loop
                if target >= pos {
                    return Err(Error::InvalidCompressionPointer {
                        offset: pos,
                        target,
                    });
                }

                if !followed_pointer {
                    consumed = pos - offset + 2;
                    followed_pointer = true;
                }

                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(Error::TooManyPointerJumps {
                        max_jumps: MAX_POINTER_JUMPS,
                    });
                }

                pos = target;
                continue;
            }

            // Historical binary (bit-string) label
            if len_byte == BINARY_LABEL_TYPE {
                let (label, skip) = self.parse_binary_label(pos)?;
                labels.push(label);
                if labels.len() > MAX_LABELS {
                    return Err(Error::TooManyLabels { max: MAX_LABELS });
                }
                pos += skip;
                continue;
            }

            // Any other extended label type (0x40-0x7F) is not supported,
            // and 0x80-0xBF has no assigned meaning at all
            if len_byte >= 0x40 {
                if len_byte < 0x80 {
                    return Err(Error::UnsupportedLabelType {
                        label_type: len_byte,
                        offset: pos,
                    });
                }
                return Err(Error::invalid_data(
                    pos,
                    format!("reserved label type 0x{len_byte:02X}"),
                ));
            }

            let len = len_byte as usize;

            // Root label ends the name
            if len == 0 {
                if !followed_pointer {
                    consumed = pos - offset + 1;
                }
                break;
            }

            if pos + 1 + len > self.message.len() {
                return Err(Error::UnexpectedEof {
                    offset: pos + 1 + len,
                });
            }

            encoded_len += 1 + len;
            if encoded_len > MAX_NAME_LENGTH {
                return Err(Error::NameTooLong {
                    length: encoded_len,
                });
            }

            labels.push(Label::new(&self.message[pos + 1..pos + 1 + len])?);
            if labels.len() > MAX_LABELS {
                return Err(Error::TooManyLabels { max: MAX_LABELS });
            }

            pos += 1 + len;
        }

        Ok((Name { labels }, consumed))
    }

    /// Parses a name and discards the consumed-byte count.
    #[inline]
    pub fn parse(&self, offset: usize) -> Result<Name> {
        self.parse_name(offset).map(|(name, _)| name)
    }

    /// Parses a binary label at `pos` (whose first byte is 0x41).
    ///
    /// The layout is a one-byte bit count (0 meaning 256) followed by
    /// `ceil(bits / 8)` octets. Unused bits in the final octet are masked
    /// off, and the label is rendered as `\[x<hex>/<bitcount>]`.
    fn parse_binary_label(&self, pos: usize) -> Result<(Label, usize)> {
        if pos + 1 >= self.message.len() {
            return Err(Error::UnexpectedEof { offset: pos + 1 });
        }

        let bits = match self.message[pos + 1] {
            0 => 256usize,
            n => usize::from(n),
        };
        let octets = bits.div_ceil(8);

        let start = pos + 2;
        if start + octets > self.message.len() {
            return Err(Error::UnexpectedEof {
                offset: start + octets,
            });
        }

        let mut data: SmallVec<[u8; 32]> = SmallVec::from_slice(&self.message[start..start + octets]);
        let trailing = bits % 8;
        if trailing != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xFF << (8 - trailing);
            }
        }

        let rendered = format!("\\[x{}/{}]", HEXLOWER.encode(&data), bits).into_bytes();
        Ok((Label::from_rendered(rendered), 2 + octets))
    }
}
