use abnf_core::is_digit;
use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use imapd_types::datetime::{DateTime, DayMonthYear, month_from_abbreviation};
use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while_m_n},
    character::complete::char,
    combinator::{map, map_opt, map_res},
    sequence::{preceded, tuple},
};

use crate::{
    core::{take_while, take_while1},
    cursor::RequestCursor,
    decode::{DecodeResult, IMAPErrorKind, IMAPParseError, IMAPResult, parse_token},
};

/// ```abnf
/// date = date-text / DQUOTE date-text DQUOTE
/// ```
pub fn date<C>(cursor: &mut C) -> DecodeResult<DayMonthYear>
where
    C: RequestCursor + ?Sized,
{
    let token = if cursor.next_char()? == b'"' {
        quoted_token(cursor)?
    } else {
        take_while1(cursor, |b| b.is_ascii_alphanumeric() || b == b'-', "date")?
    };

    Ok(parse_token(&token, "date", date_text)?)
}

/// ```abnf
/// date-time = DQUOTE
///              date-day-fixed "-" date-month "-" date-year SP
///              time SP
///              zone
///             DQUOTE
/// ```
pub fn date_time<C>(cursor: &mut C) -> DecodeResult<DateTime>
where
    C: RequestCursor + ?Sized,
{
    let token = quoted_token(cursor)?;

    Ok(parse_token(&token, "date-time", date_time_text)?)
}

/// The bytes between two double quotes. Quoted dates never contain escapes.
fn quoted_token<C>(cursor: &mut C) -> DecodeResult<Vec<u8>>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'"')?;
    let token = take_while(cursor, |b| b != b'"' && b != b'\r' && b != b'\n')?;
    cursor.expect(b'"')?;

    Ok(token)
}

/// ```abnf
/// date-text = date-day "-" date-month "-" date-year
/// ```
pub(crate) fn date_text(input: &[u8]) -> IMAPResult<&[u8], DayMonthYear> {
    map_res(
        tuple((date_day, tag(b"-"), date_month, tag(b"-"), date_year)),
        |(day, _, month, _, year)| DayMonthYear::new(day.into(), month, year.into()),
    )(input)
}

/// Day of month.
///
/// A single digit may be padded with a space.
///
/// ```abnf
/// date-day = 1*2DIGIT
/// ```
fn date_day(input: &[u8]) -> IMAPResult<&[u8], u8> {
    alt((date_day_fixed, digit_1_2))(input)
}

/// Fixed-format version of date-day.
///
/// ```abnf
/// date-day-fixed = (SP DIGIT) / 2DIGIT
/// ```
fn date_day_fixed(input: &[u8]) -> IMAPResult<&[u8], u8> {
    alt((
        map(preceded(char(' '), take_while_m_n(1, 1, is_digit)), |bytes: &[u8]| {
            bytes[0] - b'0'
        }),
        digit_2,
    ))(input)
}

/// ```abnf
/// date-month = "Jan" / "Feb" / "Mar" / "Apr" /
///              "May" / "Jun" / "Jul" / "Aug" /
///              "Sep" / "Oct" / "Nov" / "Dec"
/// ```
fn date_month(input: &[u8]) -> IMAPResult<&[u8], u32> {
    map_opt(take(3usize), month_from_abbreviation)(input)
}

/// ```abnf
/// date-year = 4DIGIT
/// ```
fn date_year(input: &[u8]) -> IMAPResult<&[u8], u16> {
    digits(4, 4)(input)
}

/// Hours minutes seconds.
///
/// ```abnf
/// time = 2DIGIT ":" 2DIGIT ":" 2DIGIT
/// ```
fn time(input: &[u8]) -> IMAPResult<&[u8], Option<NaiveTime>> {
    let mut parser = tuple((digit_2, tag(b":"), digit_2, tag(b":"), digit_2));

    let (remaining, (h, _, m, _, s)) = parser(input)?;

    Ok((
        remaining,
        NaiveTime::from_hms_opt(h.into(), m.into(), s.into()),
    ))
}

/// Signed four-digit value of hhmm representing hours and minutes east of Greenwich.
///
/// ```abnf
/// zone = ("+" / "-") 4DIGIT
/// ```
fn zone(input: &[u8]) -> IMAPResult<&[u8], Option<FixedOffset>> {
    let mut parser = tuple((alt((char('+'), char('-'))), digit_2, digit_2));

    let (remaining, (sign, hh, mm)) = parser(input)?;

    let offset = 3600 * i32::from(hh) + 60 * i32::from(mm);

    let zone = if sign == '+' {
        FixedOffset::east_opt(offset)
    } else {
        FixedOffset::west_opt(offset)
    };

    Ok((remaining, zone))
}

fn date_time_text(input: &[u8]) -> IMAPResult<&[u8], DateTime> {
    let mut parser = tuple((
        date_day_fixed,
        tag(b"-"),
        date_month,
        tag(b"-"),
        date_year,
        char(' '),
        time,
        char(' '),
        zone,
    ));

    let (remaining, (d, _, m, _, y, _, time, _, zone)) = parser(input)?;

    let bad_date_time = || {
        nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadDateTime,
        })
    };

    let (Some(date), Some(time), Some(zone)) =
        (NaiveDate::from_ymd_opt(y.into(), m, d.into()), time, zone)
    else {
        return Err(bad_date_time());
    };

    let LocalResult::Single(datetime) = zone.from_local_datetime(&NaiveDateTime::new(date, time))
    else {
        return Err(bad_date_time());
    };

    DateTime::try_from(datetime)
        .map(|datetime| (remaining, datetime))
        .map_err(|_| bad_date_time())
}

fn digit_1_2(input: &[u8]) -> IMAPResult<&[u8], u8> {
    digits(1, 2)(input)
}

fn digit_2(input: &[u8]) -> IMAPResult<&[u8], u8> {
    digits(2, 2)(input)
}

/// Between `min` and `max` digits, converted to `T`.
fn digits<'a, T>(min: usize, max: usize) -> impl FnMut(&'a [u8]) -> IMAPResult<&'a [u8], T>
where
    T: TryFrom<u32>,
    IMAPParseError<&'a [u8]>: nom::error::FromExternalError<&'a [u8], T::Error>,
{
    map_res(take_while_m_n(min, max, is_digit), |bytes: &[u8]| {
        let value = bytes
            .iter()
            .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));

        T::try_from(value)
    })
}
