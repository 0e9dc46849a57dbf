//! Fetch-related types.
//!
//! A FETCH request is decoded into a single [`FetchData`] accumulator: boolean switches for the
//! simple message data items and a list of [`BodyFetchElement`]s for everything addressing
//! message content (`BODY[...]`, `BODY.PEEK[...]`, `RFC822`, `RFC822.HEADER`, `RFC822.TEXT`).

use std::{
    fmt::{Display, Formatter},
    num::NonZeroU32,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Vec1;

/// Shorthands for commonly-used message data items.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMacro {
    /// Shorthand for `(FLAGS INTERNALDATE RFC822.SIZE)`.
    Fast,
    /// Shorthand for `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE)`.
    All,
    /// Shorthand for `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE BODY)`.
    Full,
}

impl FetchMacro {
    pub fn expand(&self) -> FetchData {
        let mut data = FetchData {
            flags: true,
            internal_date: true,
            size: true,
            ..FetchData::default()
        };

        match self {
            Self::Fast => {}
            Self::All => data.envelope = true,
            Self::Full => {
                data.envelope = true;
                data.body = true;
            }
        }

        data
    }
}

impl Display for FetchMacro {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FetchMacro::All => "ALL",
            FetchMacro::Fast => "FAST",
            FetchMacro::Full => "FULL",
        })
    }
}

/// Everything a FETCH command asked for.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FetchData {
    /// `FLAGS`
    pub flags: bool,
    /// `ENVELOPE`
    pub envelope: bool,
    /// `BODY` (non-extensible `BODYSTRUCTURE`)
    pub body: bool,
    /// `BODYSTRUCTURE`
    pub body_structure: bool,
    /// `INTERNALDATE`
    pub internal_date: bool,
    /// `RFC822.SIZE`
    pub size: bool,
    /// `UID`
    pub uid: bool,
    pub body_elements: Vec<BodyFetchElement>,
}

impl FetchData {
    pub fn add_body_element(&mut self, element: BodyFetchElement) {
        self.body_elements.push(element);
    }

    /// Whether answering this request implicitly sets the `\Seen` flag.
    pub fn sets_seen(&self) -> bool {
        self.body_elements.iter().any(|element| !element.name.is_peek())
    }

    /// Whether nothing was requested at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The attribute name a [`BodyFetchElement`] was requested with.
///
/// The name determines the label of the data item in the response and whether `\Seen` is set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchItemName {
    /// `BODY[<section>]<<partial>>`
    Body,
    /// `BODY.PEEK[<section>]<<partial>>`
    BodyPeek,
    /// `RFC822`, equivalent to `BODY[]`.
    Rfc822,
    /// `RFC822.HEADER`, equivalent to `BODY.PEEK[HEADER]`.
    Rfc822Header,
    /// `RFC822.TEXT`, equivalent to `BODY[TEXT]`.
    Rfc822Text,
}

impl FetchItemName {
    pub fn is_peek(&self) -> bool {
        matches!(self, Self::BodyPeek | Self::Rfc822Header)
    }
}

impl Display for FetchItemName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Body => "BODY",
            Self::BodyPeek => "BODY.PEEK",
            Self::Rfc822 => "RFC822",
            Self::Rfc822Header => "RFC822.HEADER",
            Self::Rfc822Text => "RFC822.TEXT",
        })
    }
}

/// The part specifier of a section.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionType {
    /// No specifier, e.g., `BODY[]` or `BODY[1.2]`.
    Content,
    /// `HEADER`
    Header,
    /// `HEADER.FIELDS (...)`
    HeaderFields,
    /// `HEADER.FIELDS.NOT (...)`
    HeaderFieldsNot,
    /// `MIME`, only valid after a part path.
    Mime,
    /// `TEXT`
    Text,
}

impl Display for SectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Content => "",
            Self::Header => "HEADER",
            Self::HeaderFields => "HEADER.FIELDS",
            Self::HeaderFieldsNot => "HEADER.FIELDS.NOT",
            Self::Mime => "MIME",
            Self::Text => "TEXT",
        })
    }
}

/// A substring request `<first_octet.number_of_octets>`.
///
/// A count of zero octets can not be represented.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partial {
    pub first_octet: u32,
    pub number_of_octets: NonZeroU32,
}

/// A request for (a part of) message content.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodyFetchElement {
    name: FetchItemName,
    section_type: SectionType,
    path: Vec<NonZeroU32>,
    field_names: Option<Vec1<String>>,
    partial: Option<Partial>,
}

impl BodyFetchElement {
    pub fn new(
        name: FetchItemName,
        path: Vec<NonZeroU32>,
        section_type: SectionType,
        field_names: Option<Vec1<String>>,
        partial: Option<Partial>,
    ) -> Result<Self, BodyFetchElementError> {
        match (section_type, &field_names) {
            (SectionType::HeaderFields | SectionType::HeaderFieldsNot, None) => {
                return Err(BodyFetchElementError::MissingFieldNames);
            }
            (SectionType::HeaderFields | SectionType::HeaderFieldsNot, Some(_)) => {}
            (_, Some(_)) => return Err(BodyFetchElementError::UnexpectedFieldNames),
            (_, None) => {}
        }

        if section_type == SectionType::Mime && path.is_empty() {
            return Err(BodyFetchElementError::MimeWithoutPart);
        }

        Ok(Self {
            name,
            section_type,
            path,
            field_names,
            partial,
        })
    }

    /// `RFC822`
    pub fn rfc822() -> Self {
        Self::whole(FetchItemName::Rfc822, SectionType::Content)
    }

    /// `RFC822.HEADER`
    pub fn rfc822_header() -> Self {
        Self::whole(FetchItemName::Rfc822Header, SectionType::Header)
    }

    /// `RFC822.TEXT`
    pub fn rfc822_text() -> Self {
        Self::whole(FetchItemName::Rfc822Text, SectionType::Text)
    }

    fn whole(name: FetchItemName, section_type: SectionType) -> Self {
        Self {
            name,
            section_type,
            path: Vec::new(),
            field_names: None,
            partial: None,
        }
    }

    pub fn name(&self) -> FetchItemName {
        self.name
    }

    pub fn section_type(&self) -> SectionType {
        self.section_type
    }

    /// Part numbers, outermost first. Empty for the whole message.
    pub fn path(&self) -> &[NonZeroU32] {
        &self.path
    }

    pub fn field_names(&self) -> Option<&Vec1<String>> {
        self.field_names.as_ref()
    }

    pub fn partial(&self) -> Option<Partial> {
        self.partial
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum BodyFetchElementError {
    #[error("HEADER.FIELDS requires a list of field names")]
    MissingFieldNames,
    #[error("Field names are only allowed with HEADER.FIELDS")]
    UnexpectedFieldNames,
    #[error("MIME requires a part number")]
    MimeWithoutPart,
}
