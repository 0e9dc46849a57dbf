//! Date and time-related types.

use std::fmt::{Debug, Display, Formatter};

use chrono::{Datelike, FixedOffset, NaiveDate};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Three-letter month names as used by `date-month`.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Look up a `date-month` (case-insensitive) and return its number (1..=12).
pub fn month_from_abbreviation(value: &[u8]) -> Option<u32> {
    MONTHS
        .iter()
        .position(|month| month.as_bytes().eq_ignore_ascii_case(value))
        .map(|index| index as u32 + 1)
}

/// A calendar date as used by SEARCH (`BEFORE`, `ON`, `SINCE`, ...).
///
/// Only days that exist in the (proleptic Gregorian) calendar and years with four digits can be
/// represented.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DayMonthYear(NaiveDate);

impl DayMonthYear {
    pub fn new(day: u32, month: u32, year: i32) -> Result<Self, DayMonthYearError> {
        if !(0..=9999).contains(&year) {
            return Err(DayMonthYearError::YearOutOfRange { got: year });
        }

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DayMonthYearError::NoSuchDate { day, month, year })
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl TryFrom<NaiveDate> for DayMonthYear {
    type Error = DayMonthYearError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(value.day(), value.month(), value.year())
    }
}

impl From<DayMonthYear> for NaiveDate {
    fn from(value: DayMonthYear) -> Self {
        value.0
    }
}

impl AsRef<NaiveDate> for DayMonthYear {
    fn as_ref(&self) -> &NaiveDate {
        &self.0
    }
}

impl Debug for DayMonthYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for DayMonthYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{:04}",
            self.day(),
            MONTHS[self.month0()],
            self.year()
        )
    }
}

impl DayMonthYear {
    fn month0(&self) -> usize {
        self.0.month0() as usize
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum DayMonthYearError {
    #[error("Expected year in range 0..=9999, got {got}")]
    YearOutOfRange { got: i32 },
    #[error("No such date: {day}/{month}/{year}")]
    NoSuchDate { day: u32, month: u32, year: i32 },
}

/// An internal date as given to APPEND.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct DateTime(chrono::DateTime<FixedOffset>);

impl DateTime {
    pub fn validate(value: &chrono::DateTime<FixedOffset>) -> Result<(), DateTimeError> {
        // Only a subset of `chrono`s `DateTime<FixedOffset>` is valid in IMAP.
        if !(0..=9999).contains(&value.year()) {
            return Err(DateTimeError::YearOutOfRange { got: value.year() });
        }

        if value.timestamp_subsec_nanos() != 0 {
            return Err(DateTimeError::UnalignedNanoSeconds {
                got: value.timestamp_subsec_nanos(),
            });
        }

        if value.offset().local_minus_utc() % 60 != 0 {
            return Err(DateTimeError::UnalignedOffset {
                got: value.offset().local_minus_utc() % 60,
            });
        }

        Ok(())
    }
}

impl TryFrom<chrono::DateTime<FixedOffset>> for DateTime {
    type Error = DateTimeError;

    fn try_from(value: chrono::DateTime<FixedOffset>) -> Result<Self, Self::Error> {
        Self::validate(&value)?;

        Ok(Self(value))
    }
}

impl Debug for DateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl AsRef<chrono::DateTime<FixedOffset>> for DateTime {
    fn as_ref(&self) -> &chrono::DateTime<FixedOffset> {
        &self.0
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum DateTimeError {
    #[error("Expected year in range 0..=9999, got {got}")]
    YearOutOfRange { got: i32 },
    #[error("Expected `0` for sub-second nanoseconds, got {got}")]
    UnalignedNanoSeconds { got: u32 },
    #[error("Expected `0` for remaining offset seconds, got {got}")]
    UnalignedOffset { got: i32 },
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_month_lookup() {
        let tests = [
            (b"Jan".as_ref(), Some(1)),
            (b"jan", Some(1)),
            (b"FEB", Some(2)),
            (b"dEc", Some(12)),
            (b"Foo", None),
            (b"Ja", None),
            (b"", None),
        ];

        for (test, expected) in tests {
            assert_eq!(month_from_abbreviation(test), expected);
        }
    }

    #[test]
    fn test_day_month_year() {
        let date = DayMonthYear::new(1, 2, 2003).unwrap();
        assert_eq!((date.day(), date.month(), date.year()), (1, 2, 2003));
        assert_eq!(date.to_string(), "1-Feb-2003");

        assert_eq!(
            DayMonthYear::new(31, 2, 2003),
            Err(DayMonthYearError::NoSuchDate {
                day: 31,
                month: 2,
                year: 2003
            })
        );
        assert!(DayMonthYear::new(29, 2, 2004).is_ok());
        assert!(DayMonthYear::new(0, 1, 2004).is_err());
        assert_eq!(
            DayMonthYear::new(1, 1, 10000),
            Err(DayMonthYearError::YearOutOfRange { got: 10000 })
        );
    }

    #[test]
    fn test_date_time_validation() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let value = offset.with_ymd_and_hms(2003, 2, 1, 12, 30, 0).unwrap();
        assert!(DateTime::try_from(value).is_ok());

        let odd = FixedOffset::east_opt(3601).unwrap();
        let value = odd.with_ymd_and_hms(2003, 2, 1, 12, 30, 0).unwrap();
        assert_eq!(
            DateTime::try_from(value),
            Err(DateTimeError::UnalignedOffset { got: 1 })
        );
    }
}
