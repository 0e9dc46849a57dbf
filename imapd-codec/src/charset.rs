//! Charset-aware text decoding.
//!
//! Quoted strings and literals are handed to a [`TextDecoder`] chunk by chunk. The decoder keeps
//! state between chunks, so a multi-byte sequence split across two chunks decodes exactly like
//! the same bytes fed at once.

use std::fmt::{Debug, Formatter};

use encoding_rs::{DecoderResult, Encoding};

use crate::decode::DecodingError;

/// A charset a client may request, e.g., via `SEARCH CHARSET`.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub enum Charset {
    /// The default charset of IMAP4rev1. Bytes above 0x7f are rejected.
    #[default]
    UsAscii,
    Other(&'static Encoding),
}

impl Charset {
    /// Look up a charset by label (case-insensitive).
    pub fn for_label(label: &[u8]) -> Option<Self> {
        let label = label.trim_ascii();

        // The encoding standard maps these labels to windows-1252, which accepts 8-bit bytes.
        if [b"US-ASCII".as_ref(), b"ASCII", b"ANSI_X3.4-1968"]
            .iter()
            .any(|ascii| ascii.eq_ignore_ascii_case(label))
        {
            return Some(Self::UsAscii);
        }

        Encoding::for_label_no_replacement(label).map(Self::Other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::UsAscii => "US-ASCII",
            Self::Other(encoding) => encoding.name(),
        }
    }

    pub fn decoder(&self) -> TextDecoder {
        TextDecoder {
            inner: match self {
                Self::UsAscii => None,
                Self::Other(encoding) => Some(encoding.new_decoder_without_bom_handling()),
            },
            output: String::new(),
        }
    }

    /// Decode a complete byte sequence.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodingError> {
        let mut decoder = self.decoder();
        decoder.feed(bytes, true)?;
        Ok(decoder.finish())
    }
}

impl Debug for Charset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Charset({})", self.name())
    }
}

/// Minimum number of bytes reserved whenever the output buffer runs full.
const MIN_GROWTH: usize = 32;

/// Incremental decoder for one string value.
pub struct TextDecoder {
    inner: Option<encoding_rs::Decoder>,
    output: String,
}

impl TextDecoder {
    /// Decode the next chunk. `last` must be set for the final chunk.
    pub fn feed(&mut self, mut chunk: &[u8], last: bool) -> Result<(), DecodingError> {
        let Some(decoder) = self.inner.as_mut() else {
            return match chunk.iter().position(|byte| !byte.is_ascii()) {
                Some(position) => Err(DecodingError {
                    found: Some(chunk[position]),
                    ..DecodingError::bad_io_encoding("Non US-ASCII byte in US-ASCII string")
                }),
                None => {
                    // US-ASCII is a subset of UTF-8.
                    self.output.extend(chunk.iter().map(|byte| char::from(*byte)));
                    Ok(())
                }
            };
        };

        loop {
            let (result, read) =
                decoder.decode_to_string_without_replacement(chunk, &mut self.output, last);
            chunk = &chunk[read..];

            match result {
                DecoderResult::InputEmpty => return Ok(()),
                DecoderResult::OutputFull => {
                    let growth = self.output.capacity().max(MIN_GROWTH);
                    self.output.reserve(growth);
                }
                DecoderResult::Malformed(_, _) => {
                    return Err(DecodingError::bad_io_encoding(format!(
                        "Malformed {} data",
                        decoder.encoding().name()
                    )));
                }
            }
        }
    }

    /// Finish decoding and return the text.
    pub fn finish(self) -> String {
        self.output
    }
}

impl Debug for TextDecoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextDecoder")
            .field(
                "encoding",
                &self.inner.as_ref().map(|decoder| decoder.encoding().name()),
            )
            .field("output", &self.output)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::HumanReadableText;

    #[test]
    fn test_for_label() {
        let tests = [
            (b"US-ASCII".as_ref(), Some("US-ASCII")),
            (b"us-ascii", Some("US-ASCII")),
            (b"UTF-8", Some("UTF-8")),
            (b"utf8", Some("UTF-8")),
            (b"ISO-8859-1", Some("windows-1252")),
            (b"KOI8-R", Some("KOI8-R")),
            (b"X-NO-SUCH-CHARSET", None),
            (b"", None),
        ];

        for (test, expected) in tests {
            assert_eq!(
                Charset::for_label(test).map(|charset| charset.name()),
                expected,
                "{}",
                String::from_utf8_lossy(test)
            );
        }
    }

    #[test]
    fn test_us_ascii_rejects_8bit() {
        assert_eq!(Charset::UsAscii.decode(b"Smith").unwrap(), "Smith");

        let error = Charset::UsAscii.decode(b"Sm\xc3\xb6rg").unwrap_err();
        assert_eq!(error.text, HumanReadableText::BadIoEncoding);
        assert_eq!(error.found, Some(0xc3));
    }

    #[test]
    fn test_malformed_utf8() {
        let utf8 = Charset::for_label(b"UTF-8").unwrap();
        let error = utf8.decode(b"\xc3\x28").unwrap_err();
        assert_eq!(error.text, HumanReadableText::BadIoEncoding);

        // Truncated sequence at the very end.
        assert!(utf8.decode(b"abc\xe2\x82").is_err());
    }

    #[test]
    fn test_chunked_decoding_matches_single_shot() {
        let utf8 = Charset::for_label(b"UTF-8").unwrap();
        let input = "Grüße aus Köln – ☃ 𝄞".repeat(20);
        let expected = utf8.decode(input.as_bytes()).unwrap();
        assert_eq!(expected, input);

        for chunk_size in [1, 2, 3, 5, 7, 64] {
            let mut decoder = utf8.decoder();
            let mut chunks = input.as_bytes().chunks(chunk_size).peekable();

            while let Some(chunk) = chunks.next() {
                decoder.feed(chunk, chunks.peek().is_none()).unwrap();
            }

            assert_eq!(decoder.finish(), expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn test_single_byte_charsets() {
        let latin1 = Charset::for_label(b"ISO-8859-1").unwrap();
        assert_eq!(latin1.decode(b"K\xf6ln").unwrap(), "Köln");

        let koi8 = Charset::for_label(b"KOI8-R").unwrap();
        assert_eq!(koi8.decode(b"\xf0\xd2\xc9\xd7\xc5\xd4").unwrap(), "Привет");
    }
}
