use imapd_types::flag::{Flag, StoreResponse, StoreType};

use crate::{
    core::{atom, keyword},
    cursor::RequestCursor,
    decode::{DecodeResult, illegal},
};

/// ```abnf
/// flag = "\Answered" /
///        "\Flagged" /
///        "\Deleted" /
///        "\Seen" /
///        "\Draft" /
///        flag-keyword /
///        flag-extension
/// ```
///
/// System flags are matched case-insensitively.
pub fn flag<C>(cursor: &mut C) -> DecodeResult<Flag>
where
    C: RequestCursor + ?Sized,
{
    if cursor.next_char()? == b'\\' {
        cursor.consume()?;
        Ok(Flag::system(atom(cursor)?))
    } else {
        Ok(Flag::keyword(atom(cursor)?))
    }
}

/// `flag-list = "(" [flag *(SP flag)] ")"`
///
/// Repeated flags are dropped.
pub fn flag_list<C>(cursor: &mut C) -> DecodeResult<Vec<Flag>>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'(')?;

    let mut flags = Vec::new();

    if cursor.next_char()? == b')' {
        cursor.consume()?;
        return Ok(flags);
    }

    loop {
        push_unique(&mut flags, flag(cursor)?);

        if !cursor.list_continues()? {
            break;
        }
    }

    Ok(flags)
}

/// ```abnf
/// store-att-flags = (["+" / "-"] "FLAGS" [".SILENT"]) SP
///                   (flag-list / (flag *(SP flag)))
/// ```
pub fn store_att_flags<C>(cursor: &mut C) -> DecodeResult<(StoreType, StoreResponse, Vec<Flag>)>
where
    C: RequestCursor + ?Sized,
{
    let kind = match cursor.next_char()? {
        b'+' => {
            cursor.consume()?;
            StoreType::Add
        }
        b'-' => {
            cursor.consume()?;
            StoreType::Remove
        }
        _ => StoreType::Replace,
    };

    let response = match keyword(cursor)?.as_str() {
        "FLAGS" => StoreResponse::Answer,
        "FLAGS.SILENT" => StoreResponse::Silent,
        other => return illegal(format!("Expected FLAGS or FLAGS.SILENT but found \"{other}\"")),
    };

    cursor.sp()?;

    let flags = if cursor.next_char()? == b'(' {
        flag_list(cursor)?
    } else {
        let mut flags = vec![flag(cursor)?];

        while !cursor.is_consumed() && cursor.next_char()? == b' ' {
            cursor.consume()?;
            push_unique(&mut flags, flag(cursor)?);
        }

        flags
    };

    Ok((kind, response, flags))
}

fn push_unique(flags: &mut Vec<Flag>, flag: Flag) {
    if !flags.contains(&flag) {
        flags.push(flag);
    }
}

#[cfg(test)]
mod tests {
    use imapd_types::core::Atom;

    use super::*;
    use crate::cursor::SliceCursor;

    fn keyword(value: &str) -> Flag {
        Flag::Keyword(Atom::try_from(value).unwrap())
    }

    #[test]
    fn test_flag() {
        let tests: [(&[u8], Flag, &[u8]); 5] = [
            (b"\\Seen ", Flag::Seen, b" "),
            (b"\\DRAFT)", Flag::Draft, b")"),
            (b"$Forwarded", keyword("$Forwarded"), b""),
            (
                b"\\Recent",
                Flag::Extension(Atom::try_from("Recent").unwrap()),
                b"",
            ),
            (
                b"\\Custom)",
                Flag::Extension(Atom::try_from("Custom").unwrap()),
                b")",
            ),
        ];

        for (test, expected, remaining) in tests {
            let mut cursor = SliceCursor::new(test);
            assert_eq!(flag(&mut cursor).unwrap(), expected);
            assert_eq!(cursor.remaining(), remaining);
        }

        assert!(flag(&mut SliceCursor::new(b"\\")).is_err());
        assert!(flag(&mut SliceCursor::new(b"\\*")).is_err());
        assert!(flag(&mut SliceCursor::new(b"(")).is_err());
    }

    #[test]
    fn test_flag_list() {
        let tests: [(&[u8], Vec<Flag>); 4] = [
            (b"()", vec![]),
            (b"(\\Seen)", vec![Flag::Seen]),
            (
                b"(\\Answered $Junk \\Seen)",
                vec![Flag::Answered, keyword("$Junk"), Flag::Seen],
            ),
            (b"(\\Seen \\seen \\SEEN)", vec![Flag::Seen]),
        ];

        for (test, expected) in tests {
            assert_eq!(flag_list(&mut SliceCursor::new(test)).unwrap(), expected);
        }

        let failures: [&[u8]; 4] = [b"(\\Seen", b"(\\Seen  \\Draft)", b"( )", b"\\Seen"];

        for test in failures {
            assert!(flag_list(&mut SliceCursor::new(test)).is_err());
        }
    }

    #[test]
    fn test_store_att_flags() {
        let tests: [(&[u8], StoreType, StoreResponse, Vec<Flag>); 5] = [
            (
                b"FLAGS.SILENT (\\Draft \\Flagged)",
                StoreType::Replace,
                StoreResponse::Silent,
                vec![Flag::Draft, Flag::Flagged],
            ),
            (
                b"+FLAGS (\\Deleted)",
                StoreType::Add,
                StoreResponse::Answer,
                vec![Flag::Deleted],
            ),
            (
                b"-flags.silent \\Seen $Junk",
                StoreType::Remove,
                StoreResponse::Silent,
                vec![Flag::Seen, keyword("$Junk")],
            ),
            (b"FLAGS ()", StoreType::Replace, StoreResponse::Answer, vec![]),
            (
                b"+FLAGS \\Seen \\Seen",
                StoreType::Add,
                StoreResponse::Answer,
                vec![Flag::Seen],
            ),
        ];

        for (test, kind, response, flags) in tests {
            let got = store_att_flags(&mut SliceCursor::new(test)).unwrap();
            assert_eq!(got, (kind, response, flags), "{}", String::from_utf8_lossy(test));
        }

        let failures: [&[u8]; 4] = [
            b"FLAG (\\Seen)",
            b"*FLAGS (\\Seen)",
            b"FLAGS",
            b"FLAGS.LOUD ()",
        ];

        for test in failures {
            assert!(store_att_flags(&mut SliceCursor::new(test)).is_err());
        }
    }
}
