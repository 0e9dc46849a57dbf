//! Primitive decoders.
//!
//! Every decoder starts at the first byte of the unit it decodes and leaves the cursor right
//! after it. Separating spaces are consumed by the caller.

use std::num::NonZeroU32;

use imapd_types::{
    core::{Atom, LiteralMode, Tag},
    utils::indicators::{
        is_astring_char, is_atom_char, is_char8, is_quoted_specials, is_tag_char,
    },
};

use crate::{
    charset::Charset,
    cursor::RequestCursor,
    decode::{DecodeError, DecodeResult, DecodingError, illegal, unexpected},
};

/// Default upper bound for a single literal (64 MiB).
pub const DEFAULT_MAX_LITERAL_SIZE: u32 = 64 * 1024 * 1024;

/// Quoted strings are handed to the text decoder in chunks of this size.
const QUOTED_CHUNK: usize = 256;

/// Parameters shared by all decoders of one command.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    /// Charset of quoted strings and literals.
    pub charset: Charset,
    /// Literals announcing more octets are rejected before any data is requested.
    pub max_literal_size: u32,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            charset: Charset::UsAscii,
            max_literal_size: DEFAULT_MAX_LITERAL_SIZE,
        }
    }
}

impl DecodeContext {
    pub fn with_charset(self, charset: Charset) -> Self {
        Self { charset, ..self }
    }
}

// ----- helpers -----

/// Consume bytes while `predicate` holds, stopping at the end of input.
pub(crate) fn take_while<C>(
    cursor: &mut C,
    predicate: impl Fn(u8) -> bool,
) -> DecodeResult<Vec<u8>>
where
    C: RequestCursor + ?Sized,
{
    let mut bytes = Vec::new();

    while !cursor.is_consumed() {
        let next = cursor.next_char()?;

        if !predicate(next) {
            break;
        }

        bytes.push(cursor.consume()?);
    }

    Ok(bytes)
}

/// Like [`take_while`] but at least one byte is required.
pub(crate) fn take_while1<C>(
    cursor: &mut C,
    predicate: impl Fn(u8) -> bool,
    expected: &str,
) -> DecodeResult<Vec<u8>>
where
    C: RequestCursor + ?Sized,
{
    let bytes = take_while(cursor, predicate)?;

    if bytes.is_empty() {
        // Fails with an I/O error at the end of input.
        let next = cursor.next_char()?;
        return unexpected(next, expected);
    }

    Ok(bytes)
}

/// Convert US-ASCII bytes (as guaranteed by the character classes used here) into a `String`.
pub(crate) fn ascii_string(bytes: Vec<u8>) -> String {
    bytes.into_iter().map(char::from).collect()
}

/// Read an alphanumeric keyword such as a command name or search key, upper-cased.
///
/// `.` is part of keywords (`FLAGS.SILENT`, `BODY.PEEK`, `HEADER.FIELDS`).
pub(crate) fn keyword<C>(cursor: &mut C) -> DecodeResult<String>
where
    C: RequestCursor + ?Sized,
{
    let bytes = take_while1(
        cursor,
        |b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_',
        "keyword",
    )?;

    Ok(ascii_string(bytes).to_ascii_uppercase())
}

// ----- number -----

/// Digits, without any check of what follows them.
///
/// The value is checked after every digit, so that overlong input is rejected as soon as it
/// exceeds 32 bits.
fn digits<C>(cursor: &mut C) -> DecodeResult<u32>
where
    C: RequestCursor + ?Sized,
{
    let mut value: u64 = 0;
    let mut count = 0;

    while !cursor.is_consumed() {
        let next = cursor.next_char()?;

        if !next.is_ascii_digit() {
            break;
        }

        cursor.consume()?;
        count += 1;
        value = value * 10 + u64::from(next - b'0');

        if value > u64::from(u32::MAX) {
            return illegal(format!(
                "Number out of range (more than {} with {count} digits)",
                u32::MAX
            ));
        }
    }

    if count == 0 {
        let next = cursor.next_char()?;
        return unexpected(next, "number");
    }

    // Checked above.
    u32::try_from(value).map_err(|_| DecodingError::illegal_arguments("Number out of range").into())
}

/// Bytes that may follow a number.
fn is_number_terminator(byte: u8) -> bool {
    matches!(byte, b' ' | b'.' | b'>' | b'\r' | b'\n' | b'\t' | b')')
}

/// `number = 1*DIGIT`
///
/// Unsigned 32-bit integer (0 <= n < 4,294,967,296)
///
/// The number must be followed by SP, `.`, `>`, `)`, CR, LF, TAB, or the end of input.
pub fn number<C>(cursor: &mut C) -> DecodeResult<u32>
where
    C: RequestCursor + ?Sized,
{
    let value = digits(cursor)?;

    if !cursor.is_consumed() {
        let next = cursor.next_char()?;

        if !is_number_terminator(next) {
            return unexpected(next, "digit or end of number");
        }
    }

    Ok(value)
}

/// `nz-number = digit-nz *DIGIT`
///
/// Non-zero unsigned 32-bit integer (0 < n < 4,294,967,296)
pub fn nz_number<C>(cursor: &mut C) -> DecodeResult<NonZeroU32>
where
    C: RequestCursor + ?Sized,
{
    NonZeroU32::new(number(cursor)?)
        .ok_or_else(|| DecodingError::illegal_arguments("Number must be non-zero").into())
}

// ----- tag & atom -----

/// `tag = 1*<any ASTRING-CHAR except "+">`
pub fn tag_imap<C>(cursor: &mut C) -> DecodeResult<Tag>
where
    C: RequestCursor + ?Sized,
{
    let bytes = take_while1(cursor, is_tag_char, "tag")?;

    Tag::try_from(ascii_string(bytes))
        .map_err(|error| DecodingError::illegal_arguments(format!("Invalid tag: {error}")).into())
}

/// `atom = 1*ATOM-CHAR`
pub fn atom<C>(cursor: &mut C) -> DecodeResult<Atom>
where
    C: RequestCursor + ?Sized,
{
    let bytes = take_while1(cursor, is_atom_char, "atom")?;

    Atom::try_from(ascii_string(bytes))
        .map_err(|error| DecodingError::illegal_arguments(format!("Invalid atom: {error}")).into())
}

// ----- string -----

/// `astring = 1*ASTRING-CHAR / string`
pub fn astring<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<String>
where
    C: RequestCursor + ?Sized,
{
    match cursor.next_char()? {
        b'"' => quoted(cursor, ctx.charset),
        b'{' => literal(cursor, ctx),
        _ => Ok(ascii_string(take_while1(cursor, is_astring_char, "astring")?)),
    }
}

/// `string = quoted / literal`
pub fn string<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<String>
where
    C: RequestCursor + ?Sized,
{
    match cursor.next_char()? {
        b'"' => quoted(cursor, ctx.charset),
        b'{' => literal(cursor, ctx),
        other => unexpected(other, "string"),
    }
}

/// `quoted = DQUOTE *QUOTED-CHAR DQUOTE`
///
/// `QUOTED-CHAR = <any TEXT-CHAR except quoted-specials> / "\" quoted-specials`
///
/// 8-bit bytes are passed to the charset decoder.
pub fn quoted<C>(cursor: &mut C, charset: Charset) -> DecodeResult<String>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'"')?;

    let mut decoder = charset.decoder();
    let mut chunk = Vec::with_capacity(QUOTED_CHUNK);

    loop {
        let next = match cursor.next_char()? {
            b'"' => {
                cursor.consume()?;
                break;
            }
            b'\\' => {
                cursor.consume()?;
                let escaped = cursor.next_char()?;

                if !is_quoted_specials(escaped) {
                    return unexpected(escaped, "'\"' or '\\' after '\\'");
                }

                escaped
            }
            next @ (b'\r' | b'\n' | 0x00) => return unexpected(next, "TEXT-CHAR"),
            next => next,
        };

        cursor.consume()?;
        chunk.push(next);

        if chunk.len() >= QUOTED_CHUNK {
            decoder.feed(&chunk, false)?;
            chunk.clear();
        }
    }

    decoder.feed(&chunk, true)?;

    Ok(decoder.finish())
}

/// `"{" number ["+"] "}" CRLF`
fn literal_prefix<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<(u32, LiteralMode)>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'{')?;
    let length = digits(cursor)?;

    let mode = if cursor.next_char()? == b'+' {
        cursor.consume()?;
        LiteralMode::NonSync
    } else {
        LiteralMode::Sync
    };

    cursor.expect(b'}')?;

    // Checked before the line ends, so that the client's next line is not taken for data.
    if length > ctx.max_literal_size {
        if mode == LiteralMode::NonSync {
            return Err(DecodeError::LiteralTooLarge {
                length,
                limit: ctx.max_literal_size,
            });
        }

        return illegal(format!(
            "Literal of {length} octets exceeds limit of {} octets",
            ctx.max_literal_size
        ));
    }

    cursor.eol()?;

    Ok((length, mode))
}

/// `literal = "{" number ["+"] "}" CRLF *CHAR8`
///
/// Raw literal data, e.g., the message of an APPEND command.
///
/// A synchronizing literal makes the cursor send a command continuation request before the data
/// is read.
pub fn literal_bytes<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<Vec<u8>>
where
    C: RequestCursor + ?Sized,
{
    let (length, mode) = literal_prefix(cursor, ctx)?;

    if mode == LiteralMode::Sync {
        log::trace!("Requesting {length} octets of literal data");
        cursor.command_continuation_request()?;
    }

    let data = cursor.take(length as usize)?;

    if let Some(position) = data.iter().position(|b| !is_char8(*b)) {
        return Err(DecodingError {
            found: Some(data[position]),
            ..DecodingError::illegal_arguments(format!("Literal contains NUL at index {position}"))
        }
        .into());
    }

    Ok(data)
}

/// A literal decoded as text with the context's charset.
pub fn literal<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<String>
where
    C: RequestCursor + ?Sized,
{
    let data = literal_bytes(cursor, ctx)?;

    Ok(ctx.charset.decode(&data)?)
}

/// `charset = atom / quoted`
///
/// The name must denote a charset known to the server.
pub fn charset<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<Charset>
where
    C: RequestCursor + ?Sized,
{
    let label = astring(cursor, ctx.with_charset(Charset::UsAscii))?;

    Charset::for_label(label.as_bytes()).ok_or_else(|| DecodingError::bad_charset(&label).into())
}
