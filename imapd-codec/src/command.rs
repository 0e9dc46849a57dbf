//! Command parsers.
//!
//! Every parser receives the cursor positioned right after the command name and decodes the
//! arguments up to and including the end of line. Tag, command name, and the `UID` prefix are
//! decoded by [`CommandDecoder`](crate::CommandDecoder).

use imapd_types::{
    command::{Command, CommandBody},
    core::Tag,
    mailbox::Mailbox,
    secret::Secret,
};

use crate::{
    core::{DecodeContext, astring, literal_bytes},
    cursor::RequestCursor,
    datetime::date_time,
    decode::{DecodeResult, illegal},
    fetch::fetch_arguments,
    flag::{flag_list, store_att_flags},
    mailbox::{list_mailbox, mailbox},
    search::search_arguments,
    sequence::sequence_set,
    status::status_att_list,
};

/// Parser for the arguments of one command.
///
/// The last argument tells whether the command was prefixed with `UID`.
pub type CommandParser<C> = fn(&mut C, DecodeContext, bool) -> DecodeResult<CommandBody>;

/// Look up the parser for a command name (case-insensitive).
pub fn command_parser<C>(name: &str) -> Option<CommandParser<C>>
where
    C: RequestCursor + ?Sized,
{
    let parser: CommandParser<C> = match name.to_ascii_uppercase().as_str() {
        // Any state
        "CAPABILITY" => capability,
        "NOOP" => noop,
        "LOGOUT" => logout,
        // Not authenticated
        "LOGIN" => login,
        // Authenticated
        "SELECT" => select,
        "EXAMINE" => examine,
        "CREATE" => create,
        "DELETE" => delete,
        "RENAME" => rename,
        "SUBSCRIBE" => subscribe,
        "UNSUBSCRIBE" => unsubscribe,
        "LIST" => list,
        "LSUB" => lsub,
        "STATUS" => status,
        "APPEND" => append,
        // Selected
        "CHECK" => check,
        "CLOSE" => close,
        "EXPUNGE" => expunge,
        "SEARCH" => search,
        "FETCH" => fetch,
        "STORE" => store,
        "COPY" => copy,
        _ => return None,
    };

    Some(parser)
}

/// Decode the arguments of the command `name` and build the command.
///
/// Fails for unknown commands and for commands which don't support the `UID` prefix.
pub fn parse_command<C>(
    name: &str,
    cursor: &mut C,
    tag: Tag,
    uid: bool,
    ctx: DecodeContext,
) -> DecodeResult<Command>
where
    C: RequestCursor + ?Sized,
{
    let Some(parser) = command_parser::<C>(name) else {
        return illegal(format!("Unknown command \"{name}\""));
    };

    let body = parser(cursor, ctx, uid)?;

    Ok(Command { tag, body })
}

fn reject_uid(name: &str, uid: bool) -> DecodeResult<()> {
    if uid {
        return illegal(format!("{name} can not be used with UID"));
    }

    Ok(())
}

/// Commands without arguments.
fn without_arguments<C>(
    cursor: &mut C,
    uid: bool,
    body: CommandBody,
) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid(body.name(), uid)?;
    cursor.eol()?;

    Ok(body)
}

fn capability<C>(cursor: &mut C, _: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    without_arguments(cursor, uid, CommandBody::Capability)
}

fn noop<C>(cursor: &mut C, _: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    without_arguments(cursor, uid, CommandBody::Noop)
}

fn logout<C>(cursor: &mut C, _: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    without_arguments(cursor, uid, CommandBody::Logout)
}

fn check<C>(cursor: &mut C, _: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    without_arguments(cursor, uid, CommandBody::Check)
}

fn close<C>(cursor: &mut C, _: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    without_arguments(cursor, uid, CommandBody::Close)
}

/// `login = "LOGIN" SP userid SP password`
fn login<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid("LOGIN", uid)?;
    cursor.sp()?;
    let username = astring(cursor, ctx)?;
    cursor.sp()?;
    let password = Secret::new(astring(cursor, ctx)?);
    cursor.eol()?;

    Ok(CommandBody::Login { username, password })
}

/// Commands with a single mailbox argument.
fn with_mailbox<C>(
    cursor: &mut C,
    ctx: DecodeContext,
    uid: bool,
    name: &str,
    body: fn(Mailbox) -> CommandBody,
) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid(name, uid)?;
    cursor.sp()?;
    let mailbox = mailbox(cursor, ctx)?;
    cursor.eol()?;

    Ok(body(mailbox))
}

fn select<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    with_mailbox(cursor, ctx, uid, "SELECT", |mailbox| CommandBody::Select {
        mailbox,
    })
}

fn examine<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    with_mailbox(cursor, ctx, uid, "EXAMINE", |mailbox| CommandBody::Examine {
        mailbox,
    })
}

fn create<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    with_mailbox(cursor, ctx, uid, "CREATE", |mailbox| CommandBody::Create {
        mailbox,
    })
}

fn delete<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    with_mailbox(cursor, ctx, uid, "DELETE", |mailbox| CommandBody::Delete {
        mailbox,
    })
}

fn subscribe<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    with_mailbox(cursor, ctx, uid, "SUBSCRIBE", |mailbox| {
        CommandBody::Subscribe { mailbox }
    })
}

fn unsubscribe<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    with_mailbox(cursor, ctx, uid, "UNSUBSCRIBE", |mailbox| {
        CommandBody::Unsubscribe { mailbox }
    })
}

/// `rename = "RENAME" SP mailbox SP mailbox`
fn rename<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid("RENAME", uid)?;
    cursor.sp()?;
    let from = mailbox(cursor, ctx)?;
    cursor.sp()?;
    let to = mailbox(cursor, ctx)?;
    cursor.eol()?;

    Ok(CommandBody::Rename { from, to })
}

/// `list = "LIST" SP mailbox SP list-mailbox`
fn list<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid("LIST", uid)?;
    cursor.sp()?;
    let reference = mailbox(cursor, ctx)?;
    cursor.sp()?;
    let mailbox_wildcard = list_mailbox(cursor, ctx)?;
    cursor.eol()?;

    Ok(CommandBody::List {
        reference,
        mailbox_wildcard,
    })
}

/// `lsub = "LSUB" SP mailbox SP list-mailbox`
fn lsub<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid("LSUB", uid)?;
    cursor.sp()?;
    let reference = mailbox(cursor, ctx)?;
    cursor.sp()?;
    let mailbox_wildcard = list_mailbox(cursor, ctx)?;
    cursor.eol()?;

    Ok(CommandBody::Lsub {
        reference,
        mailbox_wildcard,
    })
}

/// `status = "STATUS" SP mailbox SP "(" status-att *(SP status-att) ")"`
fn status<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid("STATUS", uid)?;
    cursor.sp()?;
    let mailbox = mailbox(cursor, ctx)?;
    cursor.sp()?;
    let item_names = status_att_list(cursor)?;
    cursor.eol()?;

    Ok(CommandBody::Status {
        mailbox,
        item_names,
    })
}

/// `append = "APPEND" SP mailbox [SP flag-list] [SP date-time] SP literal`
fn append<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    reject_uid("APPEND", uid)?;
    cursor.sp()?;
    let mailbox = mailbox(cursor, ctx)?;
    cursor.sp()?;

    let flags = if cursor.next_char()? == b'(' {
        let flags = flag_list(cursor)?;
        cursor.sp()?;
        flags
    } else {
        Vec::new()
    };

    let date = if cursor.next_char()? == b'"' {
        let date = date_time(cursor)?;
        cursor.sp()?;
        Some(date)
    } else {
        None
    };

    let message = literal_bytes(cursor, ctx)?;
    cursor.eol()?;

    log::trace!("Appending {} octets to {mailbox}", message.len());

    Ok(CommandBody::Append {
        mailbox,
        flags,
        date,
        message,
    })
}

/// `expunge = "EXPUNGE"` or, with UIDPLUS, `uid-expunge = "UID" SP "EXPUNGE" SP sequence-set`
fn expunge<C>(cursor: &mut C, _: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    let body = if uid {
        cursor.sp()?;
        CommandBody::UidExpunge {
            sequence_set: sequence_set(cursor)?,
        }
    } else {
        CommandBody::Expunge
    };

    cursor.eol()?;

    Ok(body)
}

/// `search = "SEARCH" [SP "CHARSET" SP astring] 1*(SP search-key)`
fn search<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    cursor.sp()?;
    let (charset, criteria) = search_arguments(cursor, ctx)?;
    cursor.eol()?;

    Ok(CommandBody::Search {
        charset: charset.map(|charset| charset.name().to_owned()),
        criteria,
        uid,
    })
}

/// ```abnf
/// fetch = "FETCH" SP sequence-set SP ("ALL" / "FULL" / "FAST" /
///         fetch-att / "(" fetch-att *(SP fetch-att) ")")
/// ```
///
/// `UID FETCH` always returns the UID.
fn fetch<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    cursor.sp()?;
    let sequence_set = sequence_set(cursor)?;
    cursor.sp()?;
    let mut fetch = fetch_arguments(cursor, ctx)?;
    cursor.eol()?;

    if uid {
        fetch.uid = true;
    }

    Ok(CommandBody::Fetch {
        sequence_set,
        fetch,
        uid,
    })
}

/// `store = "STORE" SP sequence-set SP store-att-flags`
fn store<C>(cursor: &mut C, _: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    cursor.sp()?;
    let sequence_set = sequence_set(cursor)?;
    cursor.sp()?;
    let (kind, response, flags) = store_att_flags(cursor)?;
    cursor.eol()?;

    Ok(CommandBody::Store {
        sequence_set,
        kind,
        response,
        flags,
        uid,
    })
}

/// `copy = "COPY" SP sequence-set SP mailbox`
fn copy<C>(cursor: &mut C, ctx: DecodeContext, uid: bool) -> DecodeResult<CommandBody>
where
    C: RequestCursor + ?Sized,
{
    cursor.sp()?;
    let sequence_set = sequence_set(cursor)?;
    cursor.sp()?;
    let mailbox = mailbox(cursor, ctx)?;
    cursor.eol()?;

    Ok(CommandBody::Copy {
        sequence_set,
        mailbox,
        uid,
    })
}
