use imapd_types::{
    mailbox::{ListMailbox, Mailbox},
    utils::indicators::is_list_char,
};

use crate::{
    core::{DecodeContext, ascii_string, astring, string, take_while1},
    cursor::RequestCursor,
    decode::DecodeResult,
};

/// `mailbox = "INBOX" / astring`
///
/// INBOX is case-insensitive. All case variants of INBOX (e.g., "iNbOx")
/// MUST be interpreted as INBOX not as an astring.
pub fn mailbox<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<Mailbox>
where
    C: RequestCursor + ?Sized,
{
    Ok(Mailbox::from(astring(cursor, ctx)?))
}

/// `list-mailbox = 1*list-char / string`
pub fn list_mailbox<C>(cursor: &mut C, ctx: DecodeContext) -> DecodeResult<ListMailbox>
where
    C: RequestCursor + ?Sized,
{
    match cursor.next_char()? {
        b'"' | b'{' => Ok(ListMailbox::from(string(cursor, ctx)?)),
        _ => Ok(ListMailbox::from(ascii_string(take_while1(
            cursor,
            is_list_char,
            "list-mailbox",
        )?))),
    }
}
