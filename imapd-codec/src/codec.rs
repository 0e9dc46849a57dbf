use imapd_types::{command::Command, core::Tag};

use crate::{
    charset::Charset,
    command::parse_command,
    core::{DEFAULT_MAX_LITERAL_SIZE, DecodeContext, keyword, tag_imap},
    cursor::RequestCursor,
    decode::{DecodeError, DecodingError},
};

/// Configuration of a [`CommandDecoder`].
#[derive(Debug, Clone, Copy)]
// We use `#[non_exhaustive]` to prevent users from using struct literal syntax.
#[non_exhaustive]
pub struct DecoderOptions {
    /// Literals announcing more octets are rejected.
    pub max_literal_size: u32,
    /// Charset of strings when a command doesn't request one.
    pub charset: Charset,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_literal_size: DEFAULT_MAX_LITERAL_SIZE,
            charset: Charset::UsAscii,
        }
    }
}

impl DecoderOptions {
    pub fn max_literal_size(mut self, max_literal_size: u32) -> Self {
        self.max_literal_size = max_literal_size;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }
}

/// The outcome of decoding one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A complete command.
    Command(Command),
    /// A malformed command, to be answered with `BAD`.
    ///
    /// The rest of the line was discarded. `tag` is `None` when not even the tag could be read,
    /// in which case the response is untagged.
    Bad {
        tag: Option<Tag>,
        error: DecodingError,
    },
}

/// Decoder for client commands.
///
/// One decoder serves one connection. It keeps no state between commands.
#[derive(Debug, Default)]
pub struct CommandDecoder {
    options: DecoderOptions,
}

impl CommandDecoder {
    /// Create decoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode the next command.
    ///
    /// ```abnf
    /// command = tag SP (command-any / command-auth / command-nonauth / command-select) CRLF
    /// ```
    ///
    /// Malformed commands are reported as [`Decoded::Bad`]. An error is returned only when the
    /// connection is unusable, i.e., when the cursor fails or a non-synchronizing literal exceeds
    /// the size limit.
    pub fn decode<C>(&self, cursor: &mut C) -> Result<Decoded, DecodeError>
    where
        C: RequestCursor + ?Sized,
    {
        let tag = match tag_imap(cursor) {
            Ok(tag) => tag,
            Err(DecodeError::Decoding(error)) => return Self::bad(cursor, None, error),
            Err(error) => return Err(error),
        };

        match self.decode_tagged(cursor, tag.clone()) {
            Ok(command) => {
                log::trace!("Decoded {} command tagged {}", command.name(), command.tag);
                Ok(Decoded::Command(command))
            }
            Err(DecodeError::Decoding(error)) => Self::bad(cursor, Some(tag), error),
            Err(error) => Err(error),
        }
    }

    fn decode_tagged<C>(&self, cursor: &mut C, tag: Tag) -> Result<Command, DecodeError>
    where
        C: RequestCursor + ?Sized,
    {
        let ctx = DecodeContext {
            charset: self.options.charset,
            max_literal_size: self.options.max_literal_size,
        };

        cursor.sp()?;
        let mut name = keyword(cursor)?;
        let mut uid = false;

        if name == "UID" {
            cursor.sp()?;
            name = keyword(cursor)?;
            uid = true;
        }

        parse_command(&name, cursor, tag, uid, ctx)
    }

    fn bad<C>(
        cursor: &mut C,
        tag: Option<Tag>,
        error: DecodingError,
    ) -> Result<Decoded, DecodeError>
    where
        C: RequestCursor + ?Sized,
    {
        log::debug!(
            "Rejecting command tagged {}: {error}",
            tag.as_ref().map_or("*", Tag::inner)
        );

        cursor.discard_line()?;

        Ok(Decoded::Bad { tag, error })
    }
}
