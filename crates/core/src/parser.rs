//! Line scanner that turns a chat answer into formatter events.
//!
//! The accepted syntax is a small subset of markdown: `**bold**` spans,
//! numbered items (`1. text`), bulleted items (`* text`, `- text`,
//! `• text`), blank lines and plain lines. Nothing else is interpreted.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::str::Split;
use std::sync::OnceLock;

use regex::Regex;

use crate::event::{Event, ListKind, Tag, TagEnd};

/// Iterator over the events of a single message.
///
/// At most one list is open at any time, and a list still open when the
/// input runs out is closed before the iterator finishes.
pub struct MessageParser<'a> {
    lines: Option<Split<'a, char>>,
    open_list: Option<ListKind>,
    pending: VecDeque<Event<'a>>,
}

impl<'a> MessageParser<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            // An empty message has no lines at all, not one blank line.
            lines: (!message.is_empty()).then(|| message.split('\n')),
            open_list: None,
            pending: VecDeque::new(),
        }
    }

    fn push_line(&mut self, line: &'a str) {
        let line = emphasize(line);

        match classify(&line) {
            LineKind::Item { kind, content_start } => {
                if self.open_list != Some(kind) {
                    self.close_list();
                    self.open_list = Some(kind);
                    self.pending.push_back(Event::Start(Tag::List(kind)));
                }
                self.pending.push_back(Event::Start(Tag::Item));
                self.pending
                    .push_back(Event::Html(strip_prefix(line, content_start)));
                self.pending.push_back(Event::End(TagEnd::Item));
            }
            LineKind::Other => {
                self.close_list();
                if line.trim().is_empty() {
                    self.pending.push_back(Event::LineBreak);
                } else {
                    self.pending.push_back(Event::Start(Tag::Paragraph));
                    self.pending.push_back(Event::Html(line));
                    self.pending.push_back(Event::End(TagEnd::Paragraph));
                }
            }
        }
    }

    fn close_list(&mut self) {
        if let Some(kind) = self.open_list.take() {
            self.pending.push_back(Event::End(TagEnd::List(kind)));
        }
    }
}

impl<'a> Iterator for MessageParser<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let lines = self.lines.as_mut()?;
            match lines.next() {
                Some(line) => self.push_line(line),
                None => {
                    self.lines = None;
                    self.close_list();
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Item { kind: ListKind, content_start: usize },
    Other,
}

/// Replaces every shortest `**text**` run with a `<strong>` span.
pub fn emphasize(line: &str) -> Cow<'_, str> {
    strong_pattern().replace_all(line, "<strong>${1}</strong>")
}

fn classify(line: &str) -> LineKind {
    if let Some(marker) = numbered_pattern().find(line) {
        return LineKind::Item {
            kind: ListKind::Ordered,
            content_start: marker.end(),
        };
    }

    if let Some(marker) = bulleted_pattern().find(line) {
        return LineKind::Item {
            kind: ListKind::Unordered,
            content_start: marker.end(),
        };
    }

    LineKind::Other
}

fn strip_prefix(line: Cow<'_, str>, start: usize) -> Cow<'_, str> {
    match line {
        Cow::Borrowed(text) => Cow::Borrowed(&text[start..]),
        Cow::Owned(mut text) => {
            text.drain(..start);
            Cow::Owned(text)
        }
    }
}

fn strong_pattern() -> &'static Regex {
    static STRONG_RE: OnceLock<Regex> = OnceLock::new();
    STRONG_RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("strong pattern is valid"))
}

fn numbered_pattern() -> &'static Regex {
    static NUMBERED_RE: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only: `١. x` is plain text.
    NUMBERED_RE.get_or_init(|| Regex::new(r"^\s*[0-9]+\.\s").expect("numbered pattern is valid"))
}

fn bulleted_pattern() -> &'static Regex {
    static BULLETED_RE: OnceLock<Regex> = OnceLock::new();
    BULLETED_RE.get_or_init(|| Regex::new(r"^\s*[*•-]\s").expect("bulleted pattern is valid"))
}
