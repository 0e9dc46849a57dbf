//! # Misuse-resistant types for decoded IMAP commands
//!
//! imapd-types holds everything a server-side IMAP4rev1 command decoder produces: the
//! [`Command`](command::Command) itself and its building blocks such as [`Tag`](core::Tag),
//! [`SequenceSet`](sequence::SequenceSet), [`SearchKey`](search::SearchKey), and
//! [`FetchData`](fetch::FetchData).
//!
//! Similar to a [`Tag`](core::Tag), which can't contain a space or a `+`, the API does not allow
//! the creation of invalid values. Ranges are always normalized, a partial fetch can't request zero
//! octets, and a date always exists in the calendar.
//!
//! ## Construction
//!
//! imapd-types relies a lot on the standard conversion traits, i.e., [`From`], [`TryFrom`],
//! [`Into`], and [`TryInto`]. Make good use of them.
//!
//! ### Example
//!
//! ```
//! use imapd_types::{
//!     command::{Command, CommandBody},
//!     search::SearchKey,
//!     sequence::SequenceSet,
//! };
//!
//! // `Command::new()` returns `Err(...)` when the tag is invalid.
//! let cmd = Command::new("A123", CommandBody::Noop).unwrap();
//!
//! // Or create a `CommandBody` first and attach a tag later.
//! let cmd = CommandBody::Search {
//!     charset: None,
//!     criteria: SearchKey::or(
//!         SearchKey::Draft,
//!         SearchKey::uid(SequenceSet::try_from("1:*").unwrap()),
//!     ),
//!     uid: false,
//! }
//! .tag("A124")
//! .unwrap();
//! ```
//!
//! # Features
//!
//! | Feature          | Description                                                    | Enabled by default |
//! |------------------|----------------------------------------------------------------|--------------------|
//! | serde            | Derive `serde`s `Serialize` and `Deserialize` implementations. | No                 |

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod command;
pub mod core;
pub mod datetime;
pub mod fetch;
pub mod flag;
pub mod mailbox;
pub mod search;
pub mod secret;
pub mod sequence;
pub mod status;
pub mod utils;
