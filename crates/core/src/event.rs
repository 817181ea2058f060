use std::borrow::Cow;

/// An event emitted while scanning a chat message line by line.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// Start of a tagged element.
    Start(Tag),
    /// End of a tagged element.
    End(TagEnd),
    /// Line content, already carrying `<strong>` spans. Written verbatim.
    Html(Cow<'a, str>),
    /// A blank line.
    LineBreak,
}

/// Tags for container elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Paragraph,
    List(ListKind),
    Item,
}

/// Tag terminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEnd {
    Paragraph,
    List(ListKind),
    Item,
}

/// The two list styles a message can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// `1. item`
    Ordered,
    /// `* item`, `- item` or `• item`
    Unordered,
}

impl Tag {
    /// Converts a tag into its closing counterpart.
    pub fn to_end(self) -> TagEnd {
        match self {
            Tag::Paragraph => TagEnd::Paragraph,
            Tag::List(kind) => TagEnd::List(kind),
            Tag::Item => TagEnd::Item,
        }
    }
}

impl ListKind {
    pub(crate) fn element(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}
