use std::num::NonZeroU32;

use imapd_types::{
    core::Vec1,
    fetch::{BodyFetchElement, FetchData, FetchItemName, FetchMacro, Partial, SectionType},
    utils::indicators::is_astring_char,
};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    combinator::{map, map_opt, opt, success, value},
    multi::separated_list1,
    sequence::{pair, preceded},
};

use crate::{
    core::{DecodeContext, ascii_string, astring, keyword, number, take_while, take_while1},
    cursor::RequestCursor,
    decode::{DecodeResult, DecodingError, IMAPResult, illegal, parse_token},
    sequence::nz_number,
};

/// Arguments of a `FETCH` command after the sequence set.
///
/// ```abnf
/// fetch = "FETCH" SP sequence-set SP ("ALL" / "FULL" / "FAST" /
///         fetch-att / "(" fetch-att *(SP fetch-att) ")")
/// ```
pub fn fetch_arguments<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<FetchData>
where
    C: RequestCursor + ?Sized,
{
    let mut data = FetchData::default();

    if cursor.next_char()? == b'(' {
        cursor.consume()?;

        loop {
            fetch_att(cursor, ctx, &mut data)?;

            if !cursor.list_continues()? {
                break;
            }
        }

        return Ok(data);
    }

    let name = keyword(cursor)?;

    let shorthand = match name.as_str() {
        "ALL" => Some(FetchMacro::All),
        "FAST" => Some(FetchMacro::Fast),
        "FULL" => Some(FetchMacro::Full),
        _ => None,
    };

    match shorthand {
        Some(shorthand) => Ok(shorthand.expand()),
        None => {
            named_fetch_att(cursor, ctx, &name, &mut data)?;
            Ok(data)
        }
    }
}

/// Decode one `fetch-att` into `data`.
pub fn fetch_att<C>(cursor: &mut C, ctx: DecodeContext, data: &mut FetchData) -> DecodeResult<()>
where
    C: RequestCursor + ?Sized,
{
    let name = keyword(cursor)?;

    named_fetch_att(cursor, ctx, &name, data)
}

/// ```abnf
/// fetch-att = "ENVELOPE" / "FLAGS" / "INTERNALDATE" /
///             "RFC822" [".HEADER" / ".SIZE" / ".TEXT"] /
///             "BODY" ["STRUCTURE"] / "UID" /
///             "BODY" section ["<" number "." nz-number ">"] /
///             "BODY.PEEK" section ["<" number "." nz-number ">"]
/// ```
fn named_fetch_att<C>(
    cursor: &mut C,
    ctx: DecodeContext,
    name: &str,
    data: &mut FetchData,
) -> DecodeResult<()>
where
    C: RequestCursor + ?Sized,
{
    match name {
        "ENVELOPE" => data.envelope = true,
        "FLAGS" => data.flags = true,
        "INTERNALDATE" => data.internal_date = true,
        "RFC822.SIZE" => data.size = true,
        "BODYSTRUCTURE" => data.body_structure = true,
        "UID" => data.uid = true,
        "RFC822" => data.add_body_element(BodyFetchElement::rfc822()),
        "RFC822.HEADER" => data.add_body_element(BodyFetchElement::rfc822_header()),
        "RFC822.TEXT" => data.add_body_element(BodyFetchElement::rfc822_text()),
        "BODY" => {
            if !cursor.is_consumed() && cursor.next_char()? == b'[' {
                data.add_body_element(body_fetch_element(cursor, ctx, FetchItemName::Body)?);
            } else {
                data.body = true;
            }
        }
        "BODY.PEEK" => {
            data.add_body_element(body_fetch_element(cursor, ctx, FetchItemName::BodyPeek)?);
        }
        _ => return illegal(format!("Unknown fetch attribute \"{name}\"")),
    }

    Ok(())
}

/// `section ["<" number "." nz-number ">"]`
///
/// ```abnf
/// section      = "[" [section-spec] "]"
/// section-spec = section-msgtext / (section-part ["." section-text])
/// header-list  = "(" header-fld-name *(SP header-fld-name) ")"
/// ```
pub fn body_fetch_element<C>(
    cursor: &mut C,
    ctx: DecodeContext,
    name: FetchItemName,
) -> DecodeResult<BodyFetchElement>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'[')?;

    let spec = take_while(cursor, |b| b.is_ascii_alphanumeric() || b == b'.')?;
    let (path, section_type) = parse_token(&spec, "section", section_spec)?;

    let field_names = match section_type {
        SectionType::HeaderFields | SectionType::HeaderFieldsNot => {
            cursor.sp()?;
            Some(header_list(cursor, ctx)?)
        }
        _ => None,
    };

    cursor.expect(b']')?;

    let partial = if !cursor.is_consumed() && cursor.next_char()? == b'<' {
        Some(partial(cursor)?)
    } else {
        None
    };

    BodyFetchElement::new(name, path, section_type, field_names, partial).map_err(|error| {
        DecodingError::illegal_arguments(format!("Invalid section: {error}")).into()
    })
}

/// `"<" number "." nz-number ">"`
///
/// A count of zero octets is rejected.
fn partial<C>(cursor: &mut C) -> DecodeResult<Partial>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'<')?;
    let first_octet = number(cursor)?;
    cursor.expect(b'.')?;
    let count = number(cursor)?;
    cursor.expect(b'>')?;

    let Some(number_of_octets) = NonZeroU32::new(count) else {
        return illegal("Number of octets must be non-zero");
    };

    Ok(Partial {
        first_octet,
        number_of_octets,
    })
}

/// `header-list = "(" header-fld-name *(SP header-fld-name) ")"`
///
/// `header-fld-name = astring`
fn header_list<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<Vec1<String>>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'(')?;

    let mut names = Vec1::from(header_field_name(cursor, ctx)?);

    while cursor.list_continues()? {
        names.push(header_field_name(cursor, ctx)?);
    }

    Ok(names)
}

fn header_field_name<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<String>
where
    C: RequestCursor + ?Sized,
{
    match cursor.next_char()? {
        b'"' | b'{' => astring(cursor, ctx),
        // `]` is an astring character but can't be part of a field name.
        _ => Ok(ascii_string(take_while1(
            cursor,
            |b| is_astring_char(b) && b != b']',
            "header field name",
        )?)),
    }
}

/// ```abnf
/// section-spec = section-msgtext / (section-part ["." section-text])
/// section-part = nz-number *("." nz-number)
/// ```
///
/// The empty spec addresses the whole message.
fn section_spec(input: &[u8]) -> IMAPResult<&[u8], (Vec<NonZeroU32>, SectionType)> {
    alt((
        map(section_text, |section_type| (Vec::new(), section_type)),
        map(
            pair(section_part, opt(preceded(tag(b"."), section_text))),
            |(path, section_type)| (path, section_type.unwrap_or(SectionType::Content)),
        ),
        success((Vec::new(), SectionType::Content)),
    ))(input)
}

fn section_part(input: &[u8]) -> IMAPResult<&[u8], Vec<NonZeroU32>> {
    separated_list1(tag(b"."), map_opt(nz_number, NonZeroU32::new))(input)
}

/// ```abnf
/// section-msgtext = "HEADER" / "HEADER.FIELDS" [".NOT"] SP header-list / "TEXT"
/// section-text    = section-msgtext / "MIME"
/// ```
///
/// The header list is decoded separately.
fn section_text(input: &[u8]) -> IMAPResult<&[u8], SectionType> {
    alt((
        value(SectionType::HeaderFieldsNot, tag_no_case(b"HEADER.FIELDS.NOT")),
        value(SectionType::HeaderFields, tag_no_case(b"HEADER.FIELDS")),
        value(SectionType::Header, tag_no_case(b"HEADER")),
        value(SectionType::Text, tag_no_case(b"TEXT")),
        value(SectionType::Mime, tag_no_case(b"MIME")),
    ))(input)
}
