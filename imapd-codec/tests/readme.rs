use imapd_codec::{
    CommandDecoder, Decoded,
    cursor::SliceCursor,
    imapd_types::{command::CommandBody, fetch::SectionType},
};

#[test]
fn test_from_readme() {
    let input = b"ABCD UID FETCH 1,2:* (BODY.PEEK[1.2.3.4.MIME]<42.1337>)\r\n";
    let mut cursor = SliceCursor::new(input);

    let Decoded::Command(parsed) = CommandDecoder::new().decode(&mut cursor).unwrap() else {
        panic!("expected a command");
    };
    println!("# Parsed\n\n{:#?}\n\n", parsed);

    let CommandBody::Fetch { fetch, uid, .. } = parsed.body else {
        panic!("expected FETCH");
    };
    assert!(uid);
    assert!(!fetch.sets_seen());

    let element = &fetch.body_elements[0];
    assert_eq!(element.section_type(), SectionType::Mime);
    assert_eq!(element.path().len(), 4);

    let partial = element.partial().unwrap();
    assert_eq!(partial.first_octet, 42);
    assert_eq!(partial.number_of_octets.get(), 1337);
}
