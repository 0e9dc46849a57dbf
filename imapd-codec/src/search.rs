use imapd_types::{core::Vec1, search::SearchKey};

use crate::{
    charset::Charset,
    core::{DecodeContext, astring, atom, charset, keyword, number, nz_number},
    cursor::RequestCursor,
    datetime::date,
    decode::{DecodeResult, illegal, unexpected},
    sequence::sequence_set,
};

/// Search keys nested deeper than this are rejected.
pub const MAX_SEARCH_DEPTH: usize = 128;

/// Arguments of a `SEARCH` command, up to (not including) the end of line.
///
/// ```abnf
/// search = "SEARCH" [SP "CHARSET" SP astring] 1*(SP search-key)
/// ```
///
/// Juxtaposed keys are ANDed. Strings are decoded with the requested charset, or with the
/// charset of `ctx` when none was requested.
pub fn search_arguments<C>(
    cursor: &mut C,
    ctx: DecodeContext,
) -> DecodeResult<(Option<Charset>, SearchKey)>
where
    C: RequestCursor + ?Sized,
{
    let mut ctx = ctx;
    let mut requested = None;

    let first = if is_keyword_start(cursor.next_char()?) {
        let name = keyword(cursor)?;

        if name == "CHARSET" {
            cursor.sp()?;
            let charset = charset(cursor, ctx)?;
            log::trace!("Searching with charset {}", charset.name());
            ctx = ctx.with_charset(charset);
            requested = Some(charset);
            cursor.sp()?;
            search_key(cursor, ctx, 1)?
        } else {
            named_search_key(cursor, ctx, &name, 1)?
        }
    } else {
        search_key(cursor, ctx, 1)?
    };

    let mut keys = Vec1::from(first);

    while !cursor.is_consumed() && cursor.next_char()? == b' ' {
        cursor.consume()?;

        if matches!(cursor.next_char()?, b'\r' | b'\n') {
            if cfg!(feature = "quirk_trailing_space_search") {
                log::warn!("Rectified trailing space after last search key");
                break;
            }

            return illegal("Trailing space after last search key");
        }

        keys.push(search_key(cursor, ctx, 1)?);
    }

    Ok((requested, SearchKey::and(keys)))
}

fn is_keyword_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// ```abnf
/// search-key = "ALL" / "ANSWERED" / "BCC" SP astring / ... /
///              "NOT" SP search-key / "OR" SP search-key SP search-key /
///              "UID" SP sequence-set / sequence-set /
///              "(" search-key *(SP search-key) ")"
/// ```
///
/// `depth` is the nesting level of the key to decode, starting at `1`.
pub fn search_key<C>(cursor: &mut C, ctx: DecodeContext, depth: usize) -> DecodeResult<SearchKey>
where
    C: RequestCursor + ?Sized,
{
    if depth > MAX_SEARCH_DEPTH {
        return illegal(format!(
            "Search keys nested deeper than {MAX_SEARCH_DEPTH} levels"
        ));
    }

    match cursor.next_char()? {
        b'(' => {
            cursor.consume()?;

            let mut keys = Vec1::from(search_key(cursor, ctx, depth + 1)?);

            while cursor.list_continues()? {
                keys.push(search_key(cursor, ctx, depth + 1)?);
            }

            Ok(SearchKey::and(keys))
        }
        b'0'..=b'9' | b'*' => Ok(SearchKey::SequenceSet(sequence_set(cursor)?)),
        other if is_keyword_start(other) => {
            let name = keyword(cursor)?;
            named_search_key(cursor, ctx, &name, depth)
        }
        other => unexpected(other, "search key"),
    }
}

/// Decode the arguments of the search key `name` (already upper-cased and consumed).
fn named_search_key<C>(
    cursor: &mut C,
    ctx: DecodeContext,
    name: &str,
    depth: usize,
) -> DecodeResult<SearchKey>
where
    C: RequestCursor + ?Sized,
{
    let key = match name {
        "ALL" => SearchKey::All,
        "ANSWERED" => SearchKey::Answered,
        "DELETED" => SearchKey::Deleted,
        "DRAFT" => SearchKey::Draft,
        "FLAGGED" => SearchKey::Flagged,
        "NEW" => SearchKey::New,
        "OLD" => SearchKey::Old,
        "RECENT" => SearchKey::Recent,
        "SEEN" => SearchKey::Seen,
        "UNANSWERED" => SearchKey::Unanswered,
        "UNDELETED" => SearchKey::Undeleted,
        "UNDRAFT" => SearchKey::Undraft,
        "UNFLAGGED" => SearchKey::Unflagged,
        "UNSEEN" => SearchKey::Unseen,
        "BCC" | "BODY" | "CC" | "FROM" | "SUBJECT" | "TEXT" | "TO" => {
            cursor.sp()?;
            let value = astring(cursor, ctx)?;

            match name {
                "BCC" => SearchKey::Bcc(value),
                "BODY" => SearchKey::Body(value),
                "CC" => SearchKey::Cc(value),
                "FROM" => SearchKey::From(value),
                "SUBJECT" => SearchKey::Subject(value),
                "TEXT" => SearchKey::Text(value),
                _ => SearchKey::To(value),
            }
        }
        "HEADER" => {
            cursor.sp()?;
            let field = astring(cursor, ctx)?;
            cursor.sp()?;
            let value = astring(cursor, ctx)?;

            SearchKey::header(field, value)
        }
        "KEYWORD" => {
            cursor.sp()?;
            SearchKey::Keyword(atom(cursor)?)
        }
        "UNKEYWORD" => {
            cursor.sp()?;
            SearchKey::Unkeyword(atom(cursor)?)
        }
        "BEFORE" | "ON" | "SINCE" | "SENTBEFORE" | "SENTON" | "SENTSINCE" => {
            cursor.sp()?;
            let date = date(cursor)?;

            match name {
                "BEFORE" => SearchKey::Before(date),
                "ON" => SearchKey::On(date),
                "SINCE" => SearchKey::Since(date),
                "SENTBEFORE" => SearchKey::SentBefore(date),
                "SENTON" => SearchKey::SentOn(date),
                _ => SearchKey::SentSince(date),
            }
        }
        "LARGER" => {
            cursor.sp()?;
            SearchKey::Larger(number(cursor)?)
        }
        "SMALLER" => {
            cursor.sp()?;
            SearchKey::Smaller(number(cursor)?)
        }
        "OLDER" => {
            cursor.sp()?;
            SearchKey::Older(nz_number(cursor)?.get())
        }
        "YOUNGER" => {
            cursor.sp()?;
            SearchKey::Younger(nz_number(cursor)?.get())
        }
        "UID" => {
            cursor.sp()?;
            SearchKey::Uid(sequence_set(cursor)?)
        }
        "NOT" => {
            cursor.sp()?;
            SearchKey::not(search_key(cursor, ctx, depth + 1)?)
        }
        "OR" => {
            cursor.sp()?;
            let left = search_key(cursor, ctx, depth + 1)?;
            cursor.sp()?;
            let right = search_key(cursor, ctx, depth + 1)?;

            SearchKey::or(left, right)
        }
        _ => return illegal(format!("Unknown search key \"{name}\"")),
    };

    Ok(key)
}

#[cfg(test)]
mod tests {
    use imapd_types::{datetime::DayMonthYear, sequence::SequenceSet};

    use super::*;
    use crate::{
        cursor::SliceCursor,
        decode::{DecodeError, HumanReadableText},
    };

    fn parse(input: &[u8]) -> DecodeResult<(Option<Charset>, SearchKey)> {
        search_arguments(&mut SliceCursor::new(input), DecodeContext::default())
    }

    fn criteria(input: &[u8]) -> SearchKey {
        parse(input).unwrap().1
    }

    fn set(value: &str) -> SequenceSet {
        SequenceSet::try_from(value).unwrap()
    }

    #[test]
    fn test_search_key_known_answers() {
        let tests: Vec<(&[u8], SearchKey)> = vec![
            (b"ALL", SearchKey::All),
            (
                b"NOT HEADER FROM Smith",
                SearchKey::not(SearchKey::header("FROM", "Smith")),
            ),
            (
                b"OR DRAFT FROM Smith",
                SearchKey::or(SearchKey::Draft, SearchKey::From("Smith".into())),
            ),
            (
                b"FLAGGED SINCE 1-Feb-1994 NOT FROM \"Smith\"",
                SearchKey::And(
                    vec![
                        SearchKey::Flagged,
                        SearchKey::Since(DayMonthYear::new(1, 2, 1994).unwrap()),
                        SearchKey::not(SearchKey::From("Smith".into())),
                    ]
                    .try_into()
                    .unwrap(),
                ),
            ),
            (
                b"(SEEN UNDELETED) 2:4",
                SearchKey::And(
                    vec![
                        SearchKey::And(
                            vec![SearchKey::Seen, SearchKey::Undeleted].try_into().unwrap(),
                        ),
                        SearchKey::SequenceSet(set("2:4")),
                    ]
                    .try_into()
                    .unwrap(),
                ),
            ),
            (b"(DELETED)", SearchKey::Deleted),
            (b"UID 1:*", SearchKey::Uid(set("1:*"))),
            (b"*:9,15", SearchKey::SequenceSet(set("1:9,15"))),
            (b"KEYWORD $Junk", SearchKey::Keyword("$Junk".try_into().unwrap())),
            (b"LARGER 0", SearchKey::Larger(0)),
            (b"YOUNGER 3600", SearchKey::Younger(3600)),
            (b"SUBJECT {5+}\r\nhello", SearchKey::Subject("hello".into())),
        ];

        for (test, expected) in tests {
            assert_eq!(criteria(test), expected, "{}", String::from_utf8_lossy(test));
        }
    }

    #[test]
    fn test_search_key_case_insensitive() {
        let expected = SearchKey::not(SearchKey::New);

        for test in [b"NOT NEW".as_ref(), b"Not NEW", b"not new"] {
            assert_eq!(criteria(test), expected);
        }

        assert_eq!(
            criteria(b"sentbefore 1-jan-2000"),
            criteria(b"SENTBEFORE 1-Jan-2000")
        );
    }

    #[test]
    fn test_search_nesting() {
        let input = format!("{}SEEN", "OR NOT DRAFT ".repeat(9));
        let mut expected = SearchKey::Seen;
        for _ in 0..9 {
            expected = SearchKey::or(SearchKey::not(SearchKey::Draft), expected);
        }
        assert_eq!(criteria(input.as_bytes()), expected);

        let input = format!("{}SEEN{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(criteria(input.as_bytes()), SearchKey::Seen);

        let input = format!("{}SEEN", "NOT ".repeat(MAX_SEARCH_DEPTH + 1));
        let error = parse(input.as_bytes()).unwrap_err();
        assert!(error.as_decoding().unwrap().message.contains("nested"));
    }

    #[test]
    fn test_search_charset() {
        let (charset, key) = parse("CHARSET UTF-8 SUBJECT \"Grüße\"".as_bytes()).unwrap();
        assert_eq!(charset.map(|charset| charset.name()), Some("UTF-8"));
        assert_eq!(key, SearchKey::Subject("Grüße".into()));

        // Without CHARSET, 8-bit strings are not US-ASCII.
        let error = parse("SUBJECT \"Grüße\"".as_bytes()).unwrap_err();
        assert_eq!(
            error.as_decoding().unwrap().text,
            HumanReadableText::BadIoEncoding
        );

        let error = parse(b"CHARSET X-MARTIAN ALL").unwrap_err();
        assert_eq!(error.as_decoding().unwrap().text, HumanReadableText::BadCharset);
    }

    #[test]
    fn test_search_failures() {
        let tests: [&[u8]; 10] = [
            b"FOO",
            b"FROM",
            b"HEADER FROM",
            b"NOT",
            b"OR ALL",
            b"(ALL",
            b"()",
            b"ALL  SEEN",
            b"BEFORE 1-Foo-2000",
            b"OLDER 0",
        ];

        for test in tests {
            assert!(parse(test).is_err(), "{}", String::from_utf8_lossy(test));
        }

        assert!(matches!(parse(b"FOO"), Err(DecodeError::Decoding(_))));
    }

    #[test]
    fn test_search_trailing_space() {
        let got = parse(b"ALL \r\n");

        if cfg!(feature = "quirk_trailing_space_search") {
            assert_eq!(got.unwrap().1, SearchKey::All);
        } else {
            assert!(got.is_err());
        }
    }
}
