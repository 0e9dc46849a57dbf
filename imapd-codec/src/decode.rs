//! Decoding errors.
//!
//! A decoder either fails with a [`DecodingError`], meaning that the client sent something we
//! can't make sense of and the session may continue after a tagged `BAD`, or with an I/O error,
//! meaning that the connection is unusable. Both are carried by [`DecodeError`].

use std::{
    fmt::{Display, Formatter},
    io,
    num::{ParseIntError, TryFromIntError},
};

use imapd_types::{
    datetime::DayMonthYearError,
    sequence::{IdRangeError, SequenceSetError},
};
use nom::error::{ErrorKind, FromExternalError, ParseError};
use thiserror::Error;

/// Result of all cursor-driven decoders.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The request is malformed. The session can continue.
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// The transport failed. The connection must be closed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A non-synchronizing literal exceeds the size limit. The client sends its data without
    /// waiting, so the connection must be closed.
    #[error("Non-synchronizing literal of {length} octets exceeds limit of {limit} octets")]
    LiteralTooLarge { length: u32, limit: u32 },
}

impl DecodeError {
    /// Whether this error must terminate the connection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::LiteralTooLarge { .. })
    }

    /// The decoding error, if any.
    pub fn as_decoding(&self) -> Option<&DecodingError> {
        match self {
            Self::Decoding(error) => Some(error),
            Self::Io(_) | Self::LiteralTooLarge { .. } => None,
        }
    }
}

/// Category of a [`DecodingError`], each with a stable key and an English text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HumanReadableText {
    IllegalArguments,
    BadIoEncoding,
    BadCharset,
}

impl HumanReadableText {
    pub fn key(&self) -> &'static str {
        match self {
            Self::IllegalArguments => "imapd.illegal-arguments",
            Self::BadIoEncoding => "imapd.bad-io-encoding",
            Self::BadCharset => "imapd.bad-charset",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::IllegalArguments => "Illegal arguments.",
            Self::BadIoEncoding => "Bad IO encoding.",
            Self::BadCharset => "Bad charset.",
        }
    }
}

impl Display for HumanReadableText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// A malformed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{text} {message}")]
pub struct DecodingError {
    pub text: HumanReadableText,
    pub message: String,
    /// The offending byte, when one is known.
    pub found: Option<u8>,
}

impl DecodingError {
    pub fn new(text: HumanReadableText, message: impl Into<String>) -> Self {
        Self {
            text,
            message: message.into(),
            found: None,
        }
    }

    pub fn illegal_arguments(message: impl Into<String>) -> Self {
        Self::new(HumanReadableText::IllegalArguments, message)
    }

    /// An unexpected byte was read.
    pub fn unexpected(found: u8, expected: &str) -> Self {
        Self {
            text: HumanReadableText::IllegalArguments,
            message: format!(
                "Expected {expected} but found {}",
                std::ascii::escape_default(found)
            ),
            found: Some(found),
        }
    }

    pub fn bad_io_encoding(message: impl Into<String>) -> Self {
        Self::new(HumanReadableText::BadIoEncoding, message)
    }

    pub fn bad_charset(label: &str) -> Self {
        Self::new(
            HumanReadableText::BadCharset,
            format!("Unsupported charset \"{label}\""),
        )
    }
}

/// Shorthand for failing a decoder with [`HumanReadableText::IllegalArguments`].
pub(crate) fn illegal<T>(message: impl Into<String>) -> DecodeResult<T> {
    Err(DecodingError::illegal_arguments(message).into())
}

/// Shorthand for failing a decoder on an unexpected byte.
pub(crate) fn unexpected<T>(found: u8, expected: &str) -> DecodeResult<T> {
    Err(DecodingError::unexpected(found, expected).into())
}

// ----- nom -----
//
// Some grammar productions (sequence sets, dates, section parts) are first collected from the
// cursor as a single token and then parsed in one go with nom.

/// An extended version of [`nom::IResult`].
pub(crate) type IMAPResult<I, O> = Result<(I, O), nom::Err<IMAPParseError<I>>>;

/// An extended version of [`nom::error::Error`].
#[derive(Debug)]
pub(crate) struct IMAPParseError<I> {
    pub input: I,
    pub kind: IMAPErrorKind,
}

/// An extended version of [`nom::error::ErrorKind`].
#[derive(Debug)]
pub(crate) enum IMAPErrorKind {
    BadNumber,
    BadDateTime,
    Nom(ErrorKind),
}

impl<I> ParseError<I> for IMAPParseError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::Nom(kind),
        }
    }

    fn append(input: I, kind: ErrorKind, _: Self) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::Nom(kind),
        }
    }
}

impl<I> FromExternalError<I, ParseIntError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: ParseIntError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

impl<I> FromExternalError<I, TryFromIntError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: TryFromIntError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

impl<I> FromExternalError<I, DayMonthYearError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: DayMonthYearError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadDateTime,
        }
    }
}

impl<I> FromExternalError<I, IdRangeError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: IdRangeError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

impl<I> FromExternalError<I, SequenceSetError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: SequenceSetError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

/// Run a complete nom parser over a whole token. Trailing input is an error.
pub(crate) fn parse_token<'a, O>(
    token: &'a [u8],
    what: &str,
    mut parser: impl FnMut(&'a [u8]) -> IMAPResult<&'a [u8], O>,
) -> Result<O, DecodingError> {
    let failure = |input: &[u8], kind: IMAPErrorKind| {
        let reason = match kind {
            IMAPErrorKind::BadNumber => "number out of range",
            IMAPErrorKind::BadDateTime => "no such date",
            IMAPErrorKind::Nom(_) => "malformed",
        };

        DecodingError {
            text: HumanReadableText::IllegalArguments,
            message: format!(
                "Invalid {what} \"{}\": {reason}",
                String::from_utf8_lossy(token)
            ),
            found: input.first().copied(),
        }
    };

    match parser(token) {
        Ok(([], out)) => Ok(out),
        Ok((remaining, _)) => Err(failure(remaining, IMAPErrorKind::Nom(ErrorKind::Eof))),
        Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
            Err(failure(error.input, error.kind))
        }
        Err(nom::Err::Incomplete(_)) => Err(failure(&[], IMAPErrorKind::Nom(ErrorKind::Eof))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_readable_text() {
        let error = DecodingError::illegal_arguments("Missing tag");
        assert_eq!(error.to_string(), "Illegal arguments. Missing tag");
        assert_eq!(error.text.key(), "imapd.illegal-arguments");

        let error = DecodingError::unexpected(b'\r', "SP");
        assert_eq!(error.found, Some(b'\r'));
        assert_eq!(error.message, "Expected SP but found \\r");
    }

    #[test]
    fn test_fatal() {
        let io = DecodeError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(io.is_fatal());
        assert!(io.as_decoding().is_none());

        let decoding = DecodeError::from(DecodingError::bad_charset("X-UNKNOWN"));
        assert!(!decoding.is_fatal());
        assert_eq!(
            decoding.as_decoding().map(|error| error.text),
            Some(HumanReadableText::BadCharset)
        );
    }
}
