//! Message sequence numbers and UIDs.
//!
//! A client addresses messages with a `sequence-set` such as `1,3:5,100:*`. Every element is
//! represented as an inclusive [`IdRange`]. `*` ("the largest number in use") is not resolved here
//! but kept as the sentinel [`MAX`], so that `100:*` becomes `100..=u32::MAX`.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Vec1;

pub const MIN: u32 = 1;
pub const MAX: u32 = u32::MAX;

/// An inclusive range of message sequence numbers or UIDs.
///
/// Invariant: `MIN <= low <= high <= MAX`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdRange {
    low: u32,
    high: u32,
}

impl IdRange {
    /// Create a range from two bounds in wire order.
    ///
    /// Reversed bounds are swapped (`5:3` is `3:5`), except that a reversed range starting at `*`
    /// is anchored at [`MIN`], i.e., `*:9` is `1:9`.
    pub fn new(first: u32, second: u32) -> Result<Self, IdRangeError> {
        if first == 0 || second == 0 {
            return Err(IdRangeError::Zero);
        }

        Ok(Self::normalized(first, second))
    }

    pub fn single(id: u32) -> Result<Self, IdRangeError> {
        Self::new(id, id)
    }

    /// `*`
    pub fn asterisk() -> Self {
        Self {
            low: MAX,
            high: MAX,
        }
    }

    fn normalized(first: u32, second: u32) -> Self {
        if first <= second {
            Self {
                low: first,
                high: second,
            }
        } else if first == MAX {
            Self {
                low: MIN,
                high: second,
            }
        } else {
            Self {
                low: second,
                high: first,
            }
        }
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn contains(&self, id: u32) -> bool {
        self.low <= id && id <= self.high
    }

    /// Whether the upper bound is `*`.
    pub fn is_unbounded(&self) -> bool {
        self.high == MAX
    }

    fn overlaps(&self, next: &IdRange) -> bool {
        next.low <= self.high
    }

    fn touches(&self, next: &IdRange) -> bool {
        next.low <= self.high.saturating_add(1)
    }
}

impl Display for IdRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bound = |f: &mut Formatter<'_>, value: u32| {
            if value == MAX {
                f.write_str("*")
            } else {
                write!(f, "{value}")
            }
        };

        bound(f, self.low)?;

        if self.low != self.high {
            f.write_str(":")?;
            bound(f, self.high)?;
        }

        Ok(())
    }
}

impl FromStr for IdRange {
    type Err = IdRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut split = value.split(':');

        match (split.next(), split.next(), split.next()) {
            (Some(single), None, None) => {
                let id = parse_bound(single)?;
                Self::new(id, id)
            }
            (Some(first), Some(second), None) => {
                Self::new(parse_bound(first)?, parse_bound(second)?)
            }
            _ => Err(IdRangeError::Invalid),
        }
    }
}

fn parse_bound(value: &str) -> Result<u32, IdRangeError> {
    match value {
        "" => Err(IdRangeError::Empty),
        "*" => Ok(MAX),
        // `u32::from_str` accepts `+1` and `01`. Neither is a valid `seq-number`.
        _ if value.starts_with('0') && value.len() > 1 => Err(IdRangeError::LeadingZero),
        _ if !value.bytes().all(|b| b.is_ascii_digit()) => Err(IdRangeError::Invalid),
        _ => value.parse().map_err(|_| IdRangeError::OutOfRange),
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum IdRangeError {
    #[error("Must not be empty")]
    Empty,
    #[error("Must not be zero")]
    Zero,
    #[error("Must not start with \"0\"")]
    LeadingZero,
    #[error("Must be in range 1..=4294967295")]
    OutOfRange,
    #[error("Invalid value")]
    Invalid,
}

/// Sort `ranges` and collapse every pair that shares at least one id.
///
/// The result is independent of the input order, and merging twice yields the same result as
/// merging once. Neighbouring ranges (`1:2,3:4`) are kept apart. See [`compact_ranges`].
pub fn merge_ranges(ranges: impl IntoIterator<Item = IdRange>) -> Vec<IdRange> {
    collapse(ranges, IdRange::overlaps)
}

/// Like [`merge_ranges`] but neighbouring ranges are collapsed too (`1:2,3:4` becomes `1:4`).
pub fn compact_ranges(ranges: impl IntoIterator<Item = IdRange>) -> Vec<IdRange> {
    collapse(ranges, IdRange::touches)
}

fn collapse(
    ranges: impl IntoIterator<Item = IdRange>,
    joinable: fn(&IdRange, &IdRange) -> bool,
) -> Vec<IdRange> {
    let mut sorted: Vec<IdRange> = ranges.into_iter().collect();
    sorted.sort_unstable();

    let mut merged: Vec<IdRange> = Vec::with_capacity(sorted.len());

    for range in sorted {
        match merged.last_mut() {
            Some(last) if joinable(last, &range) => {
                last.high = last.high.max(range.high);
            }
            _ => merged.push(range),
        }
    }

    merged
}

/// A non-empty, merged set of [`IdRange`]s.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceSet(Vec1<IdRange>);

impl SequenceSet {
    /// Build a set from ranges in any order. Overlapping ranges are merged.
    pub fn merged(ranges: Vec1<IdRange>) -> Self {
        // Merging never empties a non-empty input.
        Self(Vec1(merge_ranges(ranges)))
    }

    /// The minimal set of ranges covering the same ids.
    pub fn compacted(&self) -> Self {
        Self(Vec1(compact_ranges(self.0.iter().copied())))
    }

    pub fn ranges(&self) -> &[IdRange] {
        self.0.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdRange> {
        self.0.iter()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.iter().any(|range| range.contains(id))
    }
}

impl From<IdRange> for SequenceSet {
    fn from(range: IdRange) -> Self {
        Self(Vec1::from(range))
    }
}

impl TryFrom<Vec<IdRange>> for SequenceSet {
    type Error = SequenceSetError;

    fn try_from(ranges: Vec<IdRange>) -> Result<Self, Self::Error> {
        Ok(Self::merged(
            Vec1::try_from(ranges).map_err(|_| SequenceSetError::Empty)?,
        ))
    }
}

impl TryFrom<&str> for SequenceSet {
    type Error = SequenceSetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for SequenceSet {
    type Err = SequenceSetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut results = vec![];

        for range in value.split(',') {
            results.push(IdRange::from_str(range)?);
        }

        Self::try_from(results)
    }
}

impl Display for SequenceSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, range) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum SequenceSetError {
    #[error("Must not be empty")]
    Empty,
    #[error(transparent)]
    Range(#[from] IdRangeError),
}
