use std::io::Cursor;

use imapd_codec::{
    CommandDecoder, Decoded, DecoderOptions,
    cursor::{RequestCursor, SliceCursor, StreamCursor},
    decode::HumanReadableText,
    imapd_types::{
        command::{Command, CommandBody},
        core::Vec1,
        datetime::DayMonthYear,
        fetch::FetchMacro,
        flag::{Flag, StoreResponse, StoreType},
        mailbox::Mailbox,
        search::SearchKey,
        sequence::SequenceSet,
    },
};

/// Strip the `C: ` prefix of every line of a client trace.
fn client_bytes(trace: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();

    for line in trace.split_inclusive(|b| *b == b'\n') {
        let Some(line) = line.strip_prefix(b"C: ") else {
            panic!("Line must begin with \"C: \".");
        };

        // Replace last "\n" with "\r\n".
        match line.strip_suffix(b"\n") {
            Some(line) if !line.ends_with(b"\r") => {
                bytes.extend_from_slice(line);
                bytes.extend_from_slice(b"\r\n");
            }
            _ => bytes.extend_from_slice(line),
        }
    }

    bytes
}

fn command(tag: &str, body: CommandBody) -> Decoded {
    Decoded::Command(Command::new(tag, body).unwrap())
}

fn set(value: &str) -> SequenceSet {
    SequenceSet::try_from(value).unwrap()
}

#[test]
fn test_trace_rfc3501_session() {
    let trace = br#"C: a001 LOGIN SMITH SESAME
C: A142 SELECT INBOX
C: A654 FETCH 2:4 (FLAGS BODY[HEADER.FIELDS (DATE FROM)])
C: A003 STORE 2:4 +FLAGS (\Deleted)
C: A202 EXPUNGE
C: A282 SEARCH FLAGGED SINCE 1-Feb-1994 NOT FROM "Smith"
C: A999 UID FETCH 4827313:4828442 FLAGS
C: A300 COPY 2:4 MEETING
C: a047 NOOP
C: A023 LOGOUT
"#;
    let bytes = client_bytes(trace);
    let mut cursor = SliceCursor::new(&bytes);
    let decoder = CommandDecoder::new();

    let mut decoded = Vec::new();
    while !cursor.is_consumed() {
        decoded.push(decoder.decode(&mut cursor).unwrap());
    }

    assert_eq!(decoded.len(), 10);
    assert_eq!(decoded[0], command("a001", CommandBody::login("SMITH", "SESAME")));
    assert_eq!(
        decoded[1],
        command("A142", CommandBody::Select { mailbox: Mailbox::Inbox })
    );

    let Decoded::Command(Command {
        body: CommandBody::Fetch { sequence_set, fetch, uid: false },
        ..
    }) = &decoded[2]
    else {
        panic!("expected FETCH");
    };
    assert_eq!(*sequence_set, set("2:4"));
    assert!(fetch.flags);
    assert!(fetch.sets_seen());
    assert_eq!(fetch.body_elements.len(), 1);

    assert_eq!(
        decoded[3],
        command(
            "A003",
            CommandBody::Store {
                sequence_set: set("2:4"),
                kind: StoreType::Add,
                response: StoreResponse::Answer,
                flags: vec![Flag::Deleted],
                uid: false,
            }
        )
    );
    assert_eq!(decoded[4], command("A202", CommandBody::Expunge));

    let mut criteria = Vec1::from(SearchKey::Flagged);
    criteria.push(SearchKey::Since(DayMonthYear::new(1, 2, 1994).unwrap()));
    criteria.push(SearchKey::not(SearchKey::From("Smith".into())));
    assert_eq!(
        decoded[5],
        command(
            "A282",
            CommandBody::Search {
                charset: None,
                criteria: SearchKey::and(criteria),
                uid: false,
            }
        )
    );

    let Decoded::Command(Command {
        body: CommandBody::Fetch { sequence_set, fetch, uid: true },
        ..
    }) = &decoded[6]
    else {
        panic!("expected UID FETCH");
    };
    assert_eq!(*sequence_set, set("4827313:4828442"));
    assert!(fetch.flags && fetch.uid);

    assert_eq!(
        decoded[7],
        command(
            "A300",
            CommandBody::Copy {
                sequence_set: set("2:4"),
                mailbox: Mailbox::from("MEETING"),
                uid: false,
            }
        )
    );
    assert_eq!(decoded[8], command("a047", CommandBody::Noop));
    assert_eq!(decoded[9], command("A023", CommandBody::Logout));
}

#[test]
fn test_trace_synchronizing_literals() {
    let trace = b"C: A003 APPEND saved-messages (\\Seen) {12}\r
C: Hello Joe!\r
C: \r
C: A004 LOGIN {5}\r
C: alice {6+}\r
C: secret\r
";
    let bytes = client_bytes(trace);
    let mut writer = Vec::new();
    let decoder = CommandDecoder::new();

    {
        let mut cursor = StreamCursor::new(Cursor::new(&bytes), &mut writer);

        let Decoded::Command(Command {
            body: CommandBody::Append { mailbox, flags, date, message },
            ..
        }) = decoder.decode(&mut cursor).unwrap()
        else {
            panic!("expected APPEND");
        };
        assert_eq!(mailbox, Mailbox::from("saved-messages"));
        assert_eq!(flags, vec![Flag::Seen]);
        assert_eq!(date, None);
        assert_eq!(message, b"Hello Joe!\r\n");

        assert_eq!(
            decoder.decode(&mut cursor).unwrap(),
            command("A004", CommandBody::login("alice", "secret"))
        );
        assert!(cursor.is_consumed());
    }

    // One request per synchronizing literal, none for `{6+}`.
    assert_eq!(writer, b"+ Ok\r\n+ Ok\r\n");
}

#[test]
fn test_trace_search_charset() {
    let trace = "C: A1 SEARCH CHARSET UTF-8 UNSEEN SUBJECT {7}\r\nC: Müller\r\n";
    let bytes = client_bytes(trace.as_bytes());
    let mut cursor = SliceCursor::new(&bytes);

    let mut criteria = Vec1::from(SearchKey::Unseen);
    criteria.push(SearchKey::Subject("Müller".into()));

    assert_eq!(
        CommandDecoder::new().decode(&mut cursor).unwrap(),
        command(
            "A1",
            CommandBody::Search {
                charset: Some("UTF-8".into()),
                criteria: SearchKey::and(criteria),
                uid: false,
            }
        )
    );
    assert_eq!(cursor.continuation_requests(), 1);
}

#[test]
fn test_trace_recovers_after_bad_command() {
    let trace = br#"C: A1 FETCH 1 BODY[]<0.0>
C: A2 SEARCH CHARSET KLINGON ALL
C: A3 STORE 1 FLAGS (\Seen
C: A4 FETCH 1 FAST
"#;
    let bytes = client_bytes(trace);
    let mut cursor = SliceCursor::new(&bytes);
    let decoder = CommandDecoder::new();

    for expected_tag in ["A1", "A2", "A3"] {
        let Decoded::Bad { tag, error } = decoder.decode(&mut cursor).unwrap() else {
            panic!("expected BAD for {expected_tag}");
        };
        assert_eq!(tag.unwrap().inner(), expected_tag);

        if expected_tag == "A2" {
            assert_eq!(error.text, HumanReadableText::BadCharset);
        }
    }

    assert_eq!(
        decoder.decode(&mut cursor).unwrap(),
        command(
            "A4",
            CommandBody::Fetch {
                sequence_set: set("1"),
                fetch: FetchMacro::Fast.expand(),
                uid: false,
            }
        )
    );
    assert!(cursor.is_consumed());
}

#[test]
fn test_trace_literal_limit() {
    let trace = b"C: A1 APPEND INBOX {100000}\r\nC: A2 NOOP\r\n";
    let bytes = client_bytes(trace);
    let mut writer = Vec::new();
    let decoder = CommandDecoder::with_options(DecoderOptions::default().max_literal_size(1024));

    {
        let mut cursor = StreamCursor::new(Cursor::new(&bytes), &mut writer);

        assert!(matches!(
            decoder.decode(&mut cursor).unwrap(),
            Decoded::Bad { .. }
        ));
        assert_eq!(
            decoder.decode(&mut cursor).unwrap(),
            command("A2", CommandBody::Noop)
        );
    }

    assert!(writer.is_empty());
}
