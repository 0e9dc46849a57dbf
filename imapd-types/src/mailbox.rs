//! Mailbox-related types.

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mailbox name.
///
/// `INBOX` is case-insensitive and always decoded as [`Mailbox::Inbox`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mailbox {
    Inbox,
    Other(MailboxOther),
}

/// A mailbox name other than `INBOX`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxOther(String);

impl MailboxOther {
    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl Mailbox {
    pub fn name(&self) -> &str {
        match self {
            Self::Inbox => "INBOX",
            Self::Other(other) => other.inner(),
        }
    }
}

impl From<String> for Mailbox {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("inbox") {
            Self::Inbox
        } else {
            Self::Other(MailboxOther(value))
        }
    }
}

impl From<&str> for Mailbox {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A LIST/LSUB pattern, possibly containing the wildcards `*` and `%`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListMailbox(String);

impl ListMailbox {
    pub fn inner(&self) -> &str {
        &self.0
    }

    pub fn has_wildcards(&self) -> bool {
        self.0.contains(['*', '%'])
    }
}

impl From<String> for ListMailbox {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ListMailbox {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
