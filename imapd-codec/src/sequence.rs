use imapd_types::{
    sequence::{IdRange, MAX, SequenceSet},
    utils::indicators::is_sequence_set_char,
};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while_m_n},
    combinator::{map_res, opt, recognize, value},
    multi::separated_list1,
    sequence::{pair, preceded},
};

use crate::{
    core::take_while1,
    cursor::RequestCursor,
    decode::{DecodeResult, IMAPResult, parse_token},
};

/// Decode a sequence set from the cursor.
///
/// The whole set is read as one token first. Ranges are normalized and overlapping ranges are
/// merged, see [`SequenceSet::merged`].
pub fn sequence_set<C>(cursor: &mut C) -> DecodeResult<SequenceSet>
where
    C: RequestCursor + ?Sized,
{
    let token = take_while1(cursor, is_sequence_set_char, "sequence set")?;

    Ok(parse_token(&token, "sequence set", sequence_set_token)?)
}

/// `sequence-set = (seq-number / seq-range) *("," (seq-number / seq-range))`
///
/// Example: a message sequence number set of *:4,5:7 for a mailbox with 10 messages is
/// equivalent to 10,9,8,7,6,5,4,5,6,7 and MAY be reordered and overlap coalesced to be
/// 4,5,6,7,8,9,10.
pub(crate) fn sequence_set_token(input: &[u8]) -> IMAPResult<&[u8], SequenceSet> {
    map_res(
        separated_list1(tag(b","), seq_range),
        <SequenceSet as TryFrom<Vec<IdRange>>>::try_from,
    )(input)
}

/// `seq-range = seq-number [":" seq-number]`
///
/// Two seq-number values and all values between these two regardless of order.
///
/// Example: 2:4 and 4:2 are equivalent and indicate values 2, 3, and 4.
fn seq_range(input: &[u8]) -> IMAPResult<&[u8], IdRange> {
    map_res(
        pair(seq_number, opt(preceded(tag(b":"), seq_number))),
        |(first, second)| IdRange::new(first, second.unwrap_or(first)),
    )(input)
}

/// `seq-number = nz-number / "*"`
///
/// "*" represents the largest number in use.
fn seq_number(input: &[u8]) -> IMAPResult<&[u8], u32> {
    alt((value(MAX, tag(b"*")), nz_number))(input)
}

/// `nz-number = digit-nz *DIGIT`
pub(crate) fn nz_number(input: &[u8]) -> IMAPResult<&[u8], u32> {
    map_res(
        recognize(pair(
            take_while_m_n(1, 1, |b: u8| matches!(b, b'1'..=b'9')),
            take_while(|b: u8| b.is_ascii_digit()),
        )),
        |digits: &[u8]| {
            // Only ASCII digits were recognized.
            String::from_utf8_lossy(digits).parse::<u32>()
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{cursor::SliceCursor, decode::DecodeError};

    fn ranges(set: &SequenceSet) -> Vec<(u32, u32)> {
        set.iter().map(|range| (range.low(), range.high())).collect()
    }

    #[test]
    fn test_sequence_set() {
        let tests: [(&[u8], &[(u32, u32)], &[u8]); 8] = [
            (b"1", &[(1, 1)], b""),
            (b"8,9:10,17,100:*", &[(8, 8), (9, 10), (17, 17), (100, MAX)], b""),
            (b"*:9,15,799:820", &[(1, 9), (15, 15), (799, 820)], b""),
            (b"*", &[(MAX, MAX)], b""),
            (b"5:2 FLAGS", &[(2, 5)], b" FLAGS"),
            (b"1:5,3:8,2", &[(1, 8)], b""),
            (b"20,1:2)", &[(1, 2), (20, 20)], b")"),
            (b"4294967295:4294967295", &[(MAX, MAX)], b""),
        ];

        for (test, expected, remaining) in tests {
            let mut cursor = SliceCursor::new(test);
            let got = sequence_set(&mut cursor).unwrap();
            assert_eq!(ranges(&got), expected, "{}", String::from_utf8_lossy(test));
            assert_eq!(cursor.remaining(), remaining);
        }
    }

    #[test]
    fn test_sequence_set_failures() {
        let tests: [&[u8]; 10] = [
            b"0",
            b"0:5",
            b"01",
            b"1,,2",
            b"1:",
            b",1",
            b"1:2:3",
            b"4294967296",
            b"**",
            b" 1",
        ];

        for test in tests {
            match sequence_set(&mut SliceCursor::new(test)) {
                Err(DecodeError::Decoding(_)) => {}
                other => panic!("{}: {other:?}", String::from_utf8_lossy(test)),
            }
        }
    }

    #[test]
    fn test_sequence_set_order_independent() {
        let forward = sequence_set(&mut SliceCursor::new(b"1:3,7,5:6,2")).unwrap();
        let backward = sequence_set(&mut SliceCursor::new(b"2,5:6,7,3:1")).unwrap();

        assert_eq!(forward, backward);
    }

    proptest! {
        #[test]
        fn decoded_set_covers_exactly_the_input(
            pairs in prop::collection::vec((1..=64u32, 1..=64u32), 1..8),
            probe in 1..=64u32,
        ) {
            let text = pairs
                .iter()
                .map(|(a, b)| format!("{a}:{b}"))
                .collect::<Vec<_>>()
                .join(",");

            let set = sequence_set(&mut SliceCursor::new(text.as_bytes())).unwrap();

            let expected = pairs
                .iter()
                .any(|&(a, b)| a.min(b) <= probe && probe <= a.max(b));
            let got = set.iter().any(|range| range.contains(probe));
            prop_assert_eq!(got, expected);

            // Ranges are sorted and disjoint.
            for window in ranges(&set).windows(2) {
                prop_assert!(window[0].1 < window[1].0);
            }
        }
    }
}
