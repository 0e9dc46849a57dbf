//! # Server-side IMAP4rev1 command decoding
//!
//! imapd-codec turns the bytes a client sends into [`Command`](imapd_types::command::Command)s.
//! It is based on [imapd-types] and uses [nom] for the token-level grammar.
//!
//! The main entry point is the [`CommandDecoder`]. It pulls bytes through a
//! [`RequestCursor`](cursor::RequestCursor) instead of working on a complete buffer. This is
//! what IMAP literals demand: a client announcing `{42}` waits for the server's continuation
//! request before it sends the 42 octets, so the decoder must be able to talk back mid-command.
//!
//! Malformed commands don't end the session. The decoder skips the rest of the offending line and
//! reports [`Decoded::Bad`], carrying the tag (if any) and a [`DecodingError`](decode::DecodingError)
//! that can be sent to the client in a tagged `BAD`.
//!
//! Note that IMAP traces are not guaranteed to be UTF-8.
//! Strings are decoded as US-ASCII unless a charset is configured or requested by `SEARCH`.
//!
//! ## Example
//!
//! ```rust
//! use imapd_codec::{
//!     CommandDecoder, Decoded,
//!     cursor::SliceCursor,
//!     imapd_types::{
//!         command::{Command, CommandBody},
//!         sequence::SequenceSet,
//!     },
//! };
//!
//! let mut cursor = SliceCursor::new(b"A1 UID COPY 1:5,9 Archive\r\nA2 FROB\r\n");
//! let decoder = CommandDecoder::new();
//!
//! assert_eq!(
//!     decoder.decode(&mut cursor).unwrap(),
//!     Decoded::Command(Command::new(
//!         "A1",
//!         CommandBody::Copy {
//!             sequence_set: SequenceSet::try_from("1:5,9").unwrap(),
//!             mailbox: "Archive".into(),
//!             uid: true,
//!         },
//!     ).unwrap())
//! );
//!
//! // Unknown commands are rejected, but decoding continues with the next line.
//! assert!(matches!(decoder.decode(&mut cursor).unwrap(), Decoded::Bad { .. }));
//! assert!(cursor.remaining().is_empty());
//! ```
//!
//! ## Features
//!
//! imapd-codec forwards the `serde` feature to imapd-types.
//!
//! In addition, imapd-codec defines the following features:
//!
//! | Feature                     | Description                                      | Enabled by default |
//! |-----------------------------|--------------------------------------------------|--------------------|
//! | quirk_crlf_relaxed          | Make `\r` in `\r\n` optional.                    | No                 |
//! | quirk_trailing_space_search | Accept a trailing space after the last search key. | Yes (via `quirk`)  |
//!
//! ## Quirks
//!
//! Features starting with `quirk_` are used to cope with existing interoperability issues.
//! imapd-codec never produces values that violate the IMAP standard. Quirks only widen what is
//! accepted on input.
//!
//! [imapd-types]: imapd_types
//! [IMAP4rev1]: https://tools.ietf.org/html/rfc3501

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod codec;

pub mod charset;
pub mod command;
pub mod core;
pub mod cursor;
pub mod datetime;
pub mod decode;
pub mod fetch;
pub mod flag;
pub mod mailbox;
pub mod search;
pub mod sequence;
pub mod status;

pub use codec::*;
// Re-export.
pub use imapd_types;
