//! Search-related types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{Atom, Vec1},
    datetime::DayMonthYear,
    sequence::SequenceSet,
};

/// The defined search keys.
///
/// String arguments are stored decoded (after applying the requested `CHARSET`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchKey {
    // IMAP has no dedicated AND operator. Keys are ANDed by concatenating them with a space,
    // or by grouping them in parentheses.
    And(Vec1<SearchKey>),

    /// Messages with message sequence numbers corresponding to the
    /// specified message sequence number set.
    SequenceSet(SequenceSet),

    /// All messages in the mailbox; the default initial key for ANDing.
    All,

    /// Messages with the \Answered flag set.
    Answered,

    /// Messages that contain the specified string in the envelope
    /// structure's BCC field.
    Bcc(String),

    /// Messages whose internal date (disregarding time and timezone)
    /// is earlier than the specified date.
    Before(DayMonthYear),

    /// Messages that contain the specified string in the body of the
    /// message.
    Body(String),

    /// Messages that contain the specified string in the envelope
    /// structure's CC field.
    Cc(String),

    /// Messages with the \Deleted flag set.
    Deleted,

    /// Messages with the \Draft flag set.
    Draft,

    /// Messages with the \Flagged flag set.
    Flagged,

    /// Messages that contain the specified string in the envelope
    /// structure's FROM field.
    From(String),

    /// Messages that have a header with the specified field-name and that contains the specified
    /// string in the text of the header.
    Header(String, String),

    /// Messages with the specified keyword flag set.
    Keyword(Atom),

    /// Messages with a size larger than the specified number of octets.
    Larger(u32),

    /// Messages that have the \Recent flag set but not the \Seen flag.
    New,

    /// Messages that do not match the specified search key.
    Not(Box<SearchKey>),

    /// Messages that do not have the \Recent flag set.
    Old,

    /// Messages whose internal date is older than the specified number of seconds (RFC 5032).
    Older(u32),

    /// Messages whose internal date (disregarding time and timezone)
    /// is within the specified date.
    On(DayMonthYear),

    /// Messages that match either search key.
    Or(Box<SearchKey>, Box<SearchKey>),

    /// Messages that have the \Recent flag set.
    Recent,

    /// Messages that have the \Seen flag set.
    Seen,

    /// Messages whose Date: header (disregarding time and timezone) is earlier than the specified
    /// date.
    SentBefore(DayMonthYear),

    /// Messages whose Date: header is within the specified date.
    SentOn(DayMonthYear),

    /// Messages whose Date: header is within or later than the specified date.
    SentSince(DayMonthYear),

    /// Messages whose internal date (disregarding time and timezone)
    /// is within or later than the specified date.
    Since(DayMonthYear),

    /// Messages with a size smaller than the specified number of octets.
    Smaller(u32),

    /// Messages that contain the specified string in the envelope
    /// structure's SUBJECT field.
    Subject(String),

    /// Messages that contain the specified string in the header or
    /// body of the message.
    Text(String),

    /// Messages that contain the specified string in the envelope
    /// structure's TO field.
    To(String),

    /// Messages with unique identifiers corresponding to the specified
    /// unique identifier set.
    Uid(SequenceSet),

    /// Messages that do not have the \Answered flag set.
    Unanswered,

    /// Messages that do not have the \Deleted flag set.
    Undeleted,

    /// Messages that do not have the \Draft flag set.
    Undraft,

    /// Messages that do not have the \Flagged flag set.
    Unflagged,

    /// Messages that do not have the specified keyword flag set.
    Unkeyword(Atom),

    /// Messages that do not have the \Seen flag set.
    Unseen,

    /// Messages whose internal date is younger than the specified number of seconds (RFC 5032).
    Younger(u32),
}

impl SearchKey {
    pub fn not(key: SearchKey) -> Self {
        Self::Not(Box::new(key))
    }

    pub fn or(left: SearchKey, right: SearchKey) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// AND the given keys. A single key is returned as is.
    pub fn and(keys: Vec1<SearchKey>) -> Self {
        let mut keys = keys.into_inner();

        if keys.len() == 1 {
            keys.remove(0)
        } else {
            Self::And(Vec1(keys))
        }
    }

    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header(name.into(), value.into())
    }

    pub fn uid<S>(sequence_set: S) -> Self
    where
        S: Into<SequenceSet>,
    {
        Self::Uid(sequence_set.into())
    }

    pub fn sequence_set<S>(sequence_set: S) -> Self
    where
        S: Into<SequenceSet>,
    {
        Self::SequenceSet(sequence_set.into())
    }

    /// Nesting depth of this key, i.e., `1` for a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Self::Not(key) => 1 + key.depth(),
            Self::Or(left, right) => 1 + left.depth().max(right.depth()),
            Self::And(keys) => 1 + keys.iter().map(Self::depth).max().unwrap_or(0),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::IdRange;

    #[test]
    fn test_and_flattens_single_key() {
        assert_eq!(SearchKey::and(Vec1::from(SearchKey::Seen)), SearchKey::Seen);

        let keys = Vec1::try_from(vec![SearchKey::Seen, SearchKey::Draft]).unwrap();
        assert_eq!(SearchKey::and(keys.clone()), SearchKey::And(keys));
    }

    #[test]
    fn test_depth() {
        let tests = [
            (SearchKey::All, 1),
            (SearchKey::not(SearchKey::New), 2),
            (
                SearchKey::or(SearchKey::not(SearchKey::New), SearchKey::Draft),
                3,
            ),
            (
                SearchKey::uid(IdRange::single(1).unwrap()),
                1,
            ),
        ];

        for (test, expected) in tests {
            assert_eq!(test.depth(), expected);
        }
    }
}
