use imapd_types::{core::Vec1, status::StatusDataItemName};

use crate::{
    core::keyword,
    cursor::RequestCursor,
    decode::{DecodeResult, illegal},
};

/// `status-att = "MESSAGES" / "RECENT" / "UIDNEXT" / "UIDVALIDITY" / "UNSEEN"`
pub fn status_att<C>(cursor: &mut C) -> DecodeResult<StatusDataItemName>
where
    C: RequestCursor + ?Sized,
{
    let name = keyword(cursor)?;

    match StatusDataItemName::from_keyword(&name) {
        Some(item) => Ok(item),
        None => illegal(format!("Unknown status attribute \"{name}\"")),
    }
}

/// `"(" status-att *(SP status-att) ")"`
pub fn status_att_list<C>(cursor: &mut C) -> DecodeResult<Vec1<StatusDataItemName>>
where
    C: RequestCursor + ?Sized,
{
    cursor.expect(b'(')?;

    let mut items = Vec1::from(status_att(cursor)?);

    while cursor.list_continues()? {
        items.push(status_att(cursor)?);
    }

    Ok(items)
}
