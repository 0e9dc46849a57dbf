//! Client commands.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{Tag, Vec1},
    datetime::DateTime,
    fetch::FetchData,
    flag::{Flag, StoreResponse, StoreType},
    mailbox::{ListMailbox, Mailbox},
    search::SearchKey,
    secret::Secret,
    sequence::SequenceSet,
    status::StatusDataItemName,
};

/// A decoded command, i.e., a tag and a [`CommandBody`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    pub tag: Tag,
    pub body: CommandBody,
}

impl Command {
    pub fn new<T>(tag: T, body: CommandBody) -> Result<Self, T::Error>
    where
        T: TryInto<Tag>,
    {
        Ok(Self {
            tag: tag.try_into()?,
            body,
        })
    }

    /// Get the command name.
    pub fn name(&self) -> &'static str {
        self.body.name()
    }
}

/// Command body.
///
/// Message commands carry `uid: true` when they were prefixed with `UID`. Sequence sets are then
/// interpreted as unique identifiers instead of message sequence numbers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandBody {
    // ----- Any State -----
    Capability,
    Noop,
    Logout,

    // ----- Not Authenticated State -----
    Login {
        username: String,
        password: Secret<String>,
    },

    // ----- Authenticated State -----
    Select {
        mailbox: Mailbox,
    },
    Examine {
        mailbox: Mailbox,
    },
    Create {
        mailbox: Mailbox,
    },
    Delete {
        mailbox: Mailbox,
    },
    Rename {
        from: Mailbox,
        to: Mailbox,
    },
    Subscribe {
        mailbox: Mailbox,
    },
    Unsubscribe {
        mailbox: Mailbox,
    },
    List {
        reference: Mailbox,
        mailbox_wildcard: ListMailbox,
    },
    Lsub {
        reference: Mailbox,
        mailbox_wildcard: ListMailbox,
    },
    Status {
        mailbox: Mailbox,
        item_names: Vec1<StatusDataItemName>,
    },
    Append {
        mailbox: Mailbox,
        flags: Vec<Flag>,
        date: Option<DateTime>,
        message: Vec<u8>,
    },

    // ----- Selected State -----
    Check,
    Close,
    Expunge,
    /// `UID EXPUNGE` (RFC 4315)
    UidExpunge {
        sequence_set: SequenceSet,
    },
    Search {
        /// Canonical name of the charset requested with `CHARSET`, e.g., `UTF-8` for `utf8`.
        charset: Option<String>,
        criteria: SearchKey,
        uid: bool,
    },
    Fetch {
        sequence_set: SequenceSet,
        fetch: FetchData,
        uid: bool,
    },
    Store {
        sequence_set: SequenceSet,
        kind: StoreType,
        response: StoreResponse,
        flags: Vec<Flag>,
        uid: bool,
    },
    Copy {
        sequence_set: SequenceSet,
        mailbox: Mailbox,
        uid: bool,
    },
}

impl CommandBody {
    /// Prepend a tag to finalize the command body to a command.
    pub fn tag<T>(self, tag: T) -> Result<Command, T::Error>
    where
        T: TryInto<Tag>,
    {
        Ok(Command {
            tag: tag.try_into()?,
            body: self,
        })
    }

    /// Construct a LOGIN command.
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        CommandBody::Login {
            username: username.into(),
            password: Secret::new(password.into()),
        }
    }

    /// Whether the command was prefixed with `UID`.
    pub fn is_uid(&self) -> bool {
        match self {
            Self::Search { uid, .. }
            | Self::Fetch { uid, .. }
            | Self::Store { uid, .. }
            | Self::Copy { uid, .. } => *uid,
            Self::UidExpunge { .. } => true,
            _ => false,
        }
    }

    /// Get the command name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Noop => "NOOP",
            Self::Logout => "LOGOUT",
            Self::Login { .. } => "LOGIN",
            Self::Select { .. } => "SELECT",
            Self::Examine { .. } => "EXAMINE",
            Self::Create { .. } => "CREATE",
            Self::Delete { .. } => "DELETE",
            Self::Rename { .. } => "RENAME",
            Self::Subscribe { .. } => "SUBSCRIBE",
            Self::Unsubscribe { .. } => "UNSUBSCRIBE",
            Self::List { .. } => "LIST",
            Self::Lsub { .. } => "LSUB",
            Self::Status { .. } => "STATUS",
            Self::Append { .. } => "APPEND",
            Self::Check => "CHECK",
            Self::Close => "CLOSE",
            Self::Expunge => "EXPUNGE",
            Self::UidExpunge { .. } => "EXPUNGE",
            Self::Search { .. } => "SEARCH",
            Self::Fetch { .. } => "FETCH",
            Self::Store { .. } => "STORE",
            Self::Copy { .. } => "COPY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::IdRange;

    #[test]
    fn test_command_new() {
        let cmd = Command::new("A1", CommandBody::Noop).unwrap();
        assert_eq!(cmd.tag.inner(), "A1");
        assert_eq!(cmd.name(), "NOOP");

        assert!(Command::new("A+", CommandBody::Noop).is_err());
        assert!(CommandBody::Capability.tag("").is_err());
    }

    #[test]
    fn test_is_uid() {
        let sequence_set = SequenceSet::from(IdRange::single(1).unwrap());

        let tests = [
            (CommandBody::Noop, false),
            (
                CommandBody::Copy {
                    sequence_set: sequence_set.clone(),
                    mailbox: Mailbox::Inbox,
                    uid: true,
                },
                true,
            ),
            (
                CommandBody::Search {
                    charset: None,
                    criteria: SearchKey::All,
                    uid: false,
                },
                false,
            ),
            (CommandBody::UidExpunge { sequence_set }, true),
        ];

        for (test, expected) in tests {
            assert_eq!(test.is_uid(), expected, "{}", test.name());
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let cmd = CommandBody::login("alice", "secret").tag("A1").unwrap();

        let json = serde_json::to_string(&cmd).unwrap();
        let got: Command = serde_json::from_str(&json).unwrap();

        assert_eq!(got, cmd);
    }
}
