//! Request cursors.
//!
//! Decoders never touch a transport directly. They pull bytes through a [`RequestCursor`], which
//! also knows how to ask the client for more data when a synchronizing literal was announced.

use std::io::{self, BufRead, Write};

use crate::decode::{DecodeResult, DecodingError, unexpected};

/// A read position over the bytes of one or more client requests.
pub trait RequestCursor {
    /// Peek at the current byte.
    ///
    /// Fails with an I/O error (`UnexpectedEof`) when no more input is available.
    fn next_char(&mut self) -> DecodeResult<u8>;

    /// Return the current byte and advance.
    fn consume(&mut self) -> DecodeResult<u8>;

    /// Whether all input has been read.
    fn is_consumed(&mut self) -> bool;

    /// Tell the client to go on sending the data of a synchronizing literal (`+ ...`).
    fn command_continuation_request(&mut self) -> DecodeResult<()>;

    /// Peek at the current byte, skipping (and consuming) leading spaces.
    fn next_word_char(&mut self) -> DecodeResult<u8> {
        loop {
            match self.next_char()? {
                b' ' | b'\t' => {
                    self.consume()?;
                }
                other => return Ok(other),
            }
        }
    }

    /// Consume exactly `count` raw bytes, e.g., literal data.
    fn take(&mut self, count: usize) -> DecodeResult<Vec<u8>> {
        let mut data = Vec::with_capacity(count.min(8192));

        for _ in 0..count {
            data.push(self.consume()?);
        }

        Ok(data)
    }

    /// Consume the end of a line.
    ///
    /// Only `CRLF` is accepted, unless the `quirk_crlf_relaxed` feature makes the `CR` optional.
    /// Anything else before the line break is an error.
    fn eol(&mut self) -> DecodeResult<()> {
        let mut next = self.next_char()?;

        if next == b'\r' {
            self.consume()?;
            next = self.next_char()?;
        } else if next == b'\n' {
            if cfg!(feature = "quirk_crlf_relaxed") {
                log::warn!("Rectified missing `\\r` before `\\n`");
            } else {
                return unexpected(next, "CRLF");
            }
        }

        if next != b'\n' {
            return unexpected(next, "end of line");
        }

        self.consume()?;

        Ok(())
    }

    /// Consume `count` bytes without keeping them.
    fn skip(&mut self, count: u32) -> DecodeResult<()> {
        for _ in 0..count {
            self.consume()?;
        }

        Ok(())
    }

    /// Skip the rest of a rejected command.
    ///
    /// Skips everything up to and including the next `LF`, or to the end of input. A line ending
    /// in a non-synchronizing literal announcement (`{n+}`) is followed by `n` octets the client
    /// sends without waiting. These octets and the line after them are skipped as well.
    fn discard_line(&mut self) -> DecodeResult<()> {
        let mut latest = LatestByte::Other;

        while !self.is_consumed() {
            let next = self.consume()?;

            if next != b'\n' {
                latest = latest.advance(next);
                continue;
            }

            match latest.announced_length() {
                Some(length) => {
                    log::debug!("Skipping {length} octets of non-synchronizing literal");
                    self.skip(length)?;
                    latest = LatestByte::Other;
                }
                None => break,
            }
        }

        Ok(())
    }

    /// Consume one byte which must be `expected`.
    ///
    /// Any other byte is left unconsumed.
    fn expect(&mut self, expected: u8) -> DecodeResult<()> {
        let next = self.next_char()?;

        if next != expected {
            return Err(DecodingError::unexpected(
                next,
                &format!("\"{}\"", std::ascii::escape_default(expected)),
            )
            .into());
        }

        self.consume()?;

        Ok(())
    }

    /// Consume a single space.
    fn sp(&mut self) -> DecodeResult<()> {
        match self.next_char()? {
            b' ' => {
                self.consume()?;
                Ok(())
            }
            other => unexpected(other, "SP"),
        }
    }

    /// Consume the byte following an element of a parenthesized list.
    ///
    /// Returns `true` after `SP`, i.e., when another element follows, and `false` after the
    /// closing `)`.
    fn list_continues(&mut self) -> DecodeResult<bool> {
        let continues = match self.next_char()? {
            b' ' => true,
            b')' => false,
            other => return unexpected(other, "SP or \")\""),
        };

        self.consume()?;

        Ok(continues)
    }
}

/// The latest byte seen by [`RequestCursor::discard_line`], tracking a trailing `{n+}`.
#[derive(Clone, Copy, Debug)]
enum LatestByte {
    Other,
    OpeningBracket,
    Digit { length: u32 },
    Plus { length: u32 },
    ClosingBracket { length: u32 },
    Cr { length: u32 },
}

impl LatestByte {
    fn advance(self, byte: u8) -> Self {
        match (self, byte) {
            (_, b'{') => Self::OpeningBracket,
            (Self::OpeningBracket, b'0'..=b'9') => Self::Digit {
                length: u32::from(byte - b'0'),
            },
            (Self::Digit { length }, b'0'..=b'9') => length
                .checked_mul(10)
                .and_then(|length| length.checked_add(u32::from(byte - b'0')))
                .map_or(Self::Other, |length| Self::Digit { length }),
            (Self::Digit { length }, b'+') => Self::Plus { length },
            (Self::Plus { length }, b'}') => Self::ClosingBracket { length },
            (Self::ClosingBracket { length }, b'\r') => Self::Cr { length },
            _ => Self::Other,
        }
    }

    /// Length of the non-synchronizing literal announced right before `LF`.
    fn announced_length(self) -> Option<u32> {
        match self {
            Self::ClosingBracket { length } | Self::Cr { length } => Some(length),
            _ => None,
        }
    }
}

fn unexpected_eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "request ended unexpectedly")
}

/// A cursor over a request that is already fully available in memory.
///
/// Continuation requests are counted instead of being sent anywhere.
#[derive(Debug, Clone)]
pub struct SliceCursor<'a> {
    input: &'a [u8],
    position: usize,
    continuation_requests: usize,
}

impl<'a> SliceCursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            continuation_requests: 0,
        }
    }

    /// Number of continuation requests issued so far.
    pub fn continuation_requests(&self) -> usize {
        self.continuation_requests
    }

    /// The bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.position..]
    }
}

impl RequestCursor for SliceCursor<'_> {
    fn next_char(&mut self) -> DecodeResult<u8> {
        self.input
            .get(self.position)
            .copied()
            .ok_or_else(|| unexpected_eof().into())
    }

    fn consume(&mut self) -> DecodeResult<u8> {
        let next = self.next_char()?;
        self.position += 1;
        Ok(next)
    }

    fn is_consumed(&mut self) -> bool {
        self.position >= self.input.len()
    }

    fn command_continuation_request(&mut self) -> DecodeResult<()> {
        self.continuation_requests += 1;
        Ok(())
    }

    fn take(&mut self, count: usize) -> DecodeResult<Vec<u8>> {
        let remaining = self.remaining();

        if remaining.len() < count {
            return Err(unexpected_eof().into());
        }

        self.position += count;

        Ok(remaining[..count].to_vec())
    }

    fn skip(&mut self, count: u32) -> DecodeResult<()> {
        let count = count as usize;

        if self.remaining().len() < count {
            self.position = self.input.len();
            return Err(unexpected_eof().into());
        }

        self.position += count;

        Ok(())
    }
}

/// A cursor over a blocking transport.
///
/// Reads from `reader` on demand and writes continuation requests to `writer`.
#[derive(Debug)]
pub struct StreamCursor<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StreamCursor<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> RequestCursor for StreamCursor<R, W> {
    fn next_char(&mut self) -> DecodeResult<u8> {
        let buffer = self.reader.fill_buf()?;

        buffer.first().copied().ok_or_else(|| unexpected_eof().into())
    }

    fn consume(&mut self) -> DecodeResult<u8> {
        let next = self.next_char()?;
        self.reader.consume(1);
        Ok(next)
    }

    fn is_consumed(&mut self) -> bool {
        // A failing reader has nothing more to offer either. The error surfaces on the next read.
        self.reader
            .fill_buf()
            .map(|buffer| buffer.is_empty())
            .unwrap_or(true)
    }

    fn command_continuation_request(&mut self) -> DecodeResult<()> {
        log::trace!("Sending continuation request");
        self.writer.write_all(b"+ Ok\r\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn take(&mut self, count: usize) -> DecodeResult<Vec<u8>> {
        let mut data = vec![0; count];
        self.reader.read_exact(&mut data)?;
        Ok(data)
    }

    fn skip(&mut self, count: u32) -> DecodeResult<()> {
        let mut remaining = count as usize;

        while remaining > 0 {
            let available = self.reader.fill_buf()?.len();

            if available == 0 {
                return Err(unexpected_eof().into());
            }

            let skipped = available.min(remaining);
            self.reader.consume(skipped);
            remaining -= skipped;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::decode::DecodeError;

    #[test]
    fn test_slice_cursor() {
        let mut cursor = SliceCursor::new(b"A  B\r\n");

        assert_eq!(cursor.consume().unwrap(), b'A');
        assert_eq!(cursor.next_word_char().unwrap(), b'B');
        assert_eq!(cursor.consume().unwrap(), b'B');
        assert!(!cursor.is_consumed());
        cursor.eol().unwrap();
        assert!(cursor.is_consumed());

        assert!(matches!(cursor.next_char(), Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_eol() {
        let tests: [(&[u8], bool); 4] = [
            (b"\r\n", true),
            (b"\n", cfg!(feature = "quirk_crlf_relaxed")),
            (b" \r\n", false),
            (b"x\r\n", false),
        ];

        for (test, expected) in tests {
            let mut cursor = SliceCursor::new(test);
            assert_eq!(cursor.eol().is_ok(), expected, "{:?}", test);
        }

        // Missing `\n` is not recoverable from a slice.
        let mut cursor = SliceCursor::new(b"\r");
        assert!(matches!(cursor.eol(), Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_discard_line() {
        let mut cursor = SliceCursor::new(b"garbage (\r\nA NOOP\r\n");
        cursor.discard_line().unwrap();
        assert_eq!(cursor.remaining(), b"A NOOP\r\n");

        let mut cursor = SliceCursor::new(b"no line break");
        cursor.discard_line().unwrap();
        assert!(cursor.is_consumed());
    }

    #[test]
    fn test_discard_line_skips_non_sync_literals() {
        let tests: [(&[u8], &[u8]); 6] = [
            (b"X {4+}\r\nA\r\nB\r\nC NOOP\r\n", b"C NOOP\r\n"),
            (b"X {3+}\r\nabc {2+}\r\nxy)\r\nC NOOP\r\n", b"C NOOP\r\n"),
            (b"X {0+}\r\n\r\nC NOOP\r\n", b"C NOOP\r\n"),
            (b"X {4+}\nA\r\nB\r\nC NOOP\r\n", b"C NOOP\r\n"),
            // Synchronizing literals are never sent without a continuation request.
            (b"X {4}\r\nC NOOP\r\n", b"C NOOP\r\n"),
            (b"X {4+} \r\nC NOOP\r\n", b"C NOOP\r\n"),
        ];

        for (test, remaining) in tests {
            let mut cursor = SliceCursor::new(test);
            cursor.discard_line().unwrap();
            assert_eq!(cursor.remaining(), remaining, "{}", String::from_utf8_lossy(test));
        }

        let mut cursor = SliceCursor::new(b"X {9+}\r\nabc");
        assert!(matches!(cursor.discard_line(), Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_failed_expectations_do_not_consume() {
        let mut cursor = SliceCursor::new(b"\n");
        assert!(cursor.sp().is_err());
        assert!(cursor.expect(b'(').is_err());
        assert!(cursor.list_continues().is_err());
        assert_eq!(cursor.remaining(), b"\n");

        let mut cursor = SliceCursor::new(b" x) ");
        assert!(cursor.list_continues().unwrap());
        assert_eq!(cursor.consume().unwrap(), b'x');
        assert!(!cursor.list_continues().unwrap());
        assert_eq!(cursor.remaining(), b" ");
    }

    #[test]
    fn test_take() {
        let mut cursor = SliceCursor::new(b"abc");
        assert_eq!(cursor.take(2).unwrap(), b"ab");
        assert!(matches!(cursor.take(2), Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_stream_cursor_continuation() {
        let mut out = Vec::new();
        let mut cursor = StreamCursor::new(Cursor::new(b"{3}\r\nabc".to_vec()), &mut out);

        assert_eq!(cursor.consume().unwrap(), b'{');
        cursor.command_continuation_request().unwrap();
        assert_eq!(cursor.take(4).unwrap(), b"3}\r\n");
        assert_eq!(cursor.take(3).unwrap(), b"abc");
        assert!(cursor.is_consumed());
        assert!(matches!(cursor.consume(), Err(DecodeError::Io(_))));

        drop(cursor);
        assert_eq!(out, b"+ Ok\r\n");
    }

    #[test]
    fn test_stream_cursor_discard_line() {
        let input = b"X {5+}\r\nhello\r\nC NOOP\r\n".to_vec();
        // A tiny buffer makes the literal data span several reads.
        let reader = io::BufReader::with_capacity(2, Cursor::new(input));
        let mut cursor = StreamCursor::new(reader, io::sink());

        cursor.discard_line().unwrap();
        assert_eq!(cursor.take(8).unwrap(), b"C NOOP\r\n");
        assert!(cursor.is_consumed());
    }
}
