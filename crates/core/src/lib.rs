//! Core of the docchat front-end: the chat answer formatter, the backend
//! wire types, client configuration and the chat session state.

use std::io::{self, Write};

use thiserror::Error;

pub mod adapter;
pub mod api;
pub mod config;
pub mod event;
pub mod html_renderer;
pub mod parser;
pub mod session;

pub use adapter::PipeAdapter;
pub use api::{
    ApiError, AskRequest, AskResponse, EmptyQuestion, ErrorBody, UPLOAD_FIELD, UploadResponse,
    decode_response, format_answer,
};
pub use config::{ClientConfig, ConfigError};
pub use event::{Event, ListKind, Tag, TagEnd};
pub use html_renderer::{HtmlRenderer, strip_empty_paragraphs};
pub use parser::{MessageParser, emphasize};
pub use session::{Author, Bubble, BubbleBody, ChatSession, Pending, SelectedFile, SessionError, View};

/// Errors surfaced while streaming a formatted message.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to write formatted message: {0}")]
    Io(#[from] io::Error),
}

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Formats a chat answer into an HTML fragment.
///
/// Handles `**bold**` spans, numbered and bulleted lists, blank lines and
/// plain paragraphs. Message text is **not** HTML-escaped.
pub fn format_message(message: &str) -> String {
    let mut html = Vec::with_capacity(message.len() + message.len() / 4);
    if let Err(err) = write_message(message, &mut html) {
        // Writing into a Vec never fails.
        tracing::error!(%err, "formatting into memory failed");
    }
    String::from_utf8(html).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

/// Streams the formatted HTML for `message` into `writer`.
pub fn write_message<W: Write>(message: &str, writer: W) -> Result<W, FormatError> {
    tracing::trace!(bytes = message.len(), "formatting message");
    PipeAdapter::new(writer).drive(MessageParser::new(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_message_formats_to_nothing() {
        assert_eq!(format_message(""), "");
    }

    #[test]
    fn bold_only_message_is_one_paragraph() {
        assert_eq!(format_message("**hi**"), "<p><strong>hi</strong></p>");
    }

    #[test]
    fn numbered_items_form_one_ordered_list() {
        assert_eq!(format_message("1. a\n2. b"), "<ol><li>a</li><li>b</li></ol>");
    }

    #[test]
    fn bullet_characters_are_interchangeable() {
        assert_eq!(
            format_message("* a\n- b\n• c"),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
    }

    #[test]
    fn plain_line_interrupts_a_list() {
        assert_eq!(
            format_message("1. a\nplain\n2. b"),
            "<ol><li>a</li></ol><p>plain</p><ol><li>b</li></ol>"
        );
    }

    #[test]
    fn list_kind_switch_has_no_paragraph_between() {
        assert_eq!(
            format_message("1. a\n* b"),
            "<ol><li>a</li></ol><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn blank_lines_become_breaks() {
        assert_eq!(
            format_message("Intro\n\n  \n**Steps**\n1. Open\n2. **Read**"),
            "<p>Intro</p><br><br><p><strong>Steps</strong></p>\
             <ol><li>Open</li><li><strong>Read</strong></li></ol>"
        );
        assert_eq!(format_message("a\n"), "<p>a</p><br>");
    }

    #[test]
    fn unmatched_bold_and_malformed_markers_are_plain_text() {
        assert_eq!(
            format_message("**open\n1.no space\n*tight"),
            "<p>**open</p><p>1.no space</p><p>*tight</p>"
        );
    }

    #[test]
    fn carriage_returns_stay_in_content() {
        assert_eq!(format_message("a\r\n\r\n"), "<p>a\r</p><br><br>");
    }

    #[test]
    fn list_tags_are_balanced() {
        let inputs = [
            "1. a",
            "* a\n1. b\n- c\n\n2. d",
            "text\n• x\n• y",
            "  3. indented\n\t- tabbed\nend",
        ];
        for input in inputs {
            let html = format_message(input);
            for (open, close) in [("<ol>", "</ol>"), ("<ul>", "</ul>")] {
                assert_eq!(
                    html.matches(open).count(),
                    html.matches(close).count(),
                    "unbalanced {open} in {html:?}"
                );
            }
        }
    }

    fn unfiltered_html(input: &str) -> String {
        MessageParser::new(input)
            .map(|event| match event {
                Event::Start(Tag::Paragraph) => "<p>".to_string(),
                Event::Start(Tag::Item) => "<li>".to_string(),
                Event::Start(Tag::List(kind)) => format!("<{}>", kind.element()),
                Event::End(TagEnd::Paragraph) => "</p>".to_string(),
                Event::End(TagEnd::Item) => "</li>".to_string(),
                Event::End(TagEnd::List(kind)) => format!("</{}>", kind.element()),
                Event::Html(html) => html.into_owned(),
                Event::LineBreak => "<br>".to_string(),
            })
            .collect()
    }

    #[test]
    fn streamed_output_matches_whole_fragment_cleanup() {
        let inputs = [
            "<p></p>",
            "x<p>\n</p>y",
            "* <p></p>\n<p><p></p></p>",
            "1. </p>\n<p>",
            "<p>\n\n</p>",
        ];
        for input in inputs {
            assert_eq!(
                format_message(input),
                strip_empty_paragraphs(&unfiltered_html(input)),
                "{input:?}"
            );
        }
    }

    #[test]
    fn write_message_streams_into_writer() {
        let out = write_message("- a", Vec::new()).unwrap();
        assert_eq!(out, b"<ul><li>a</li></ul>");
    }
}
