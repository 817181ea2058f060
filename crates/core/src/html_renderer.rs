use std::io::{self, Write};

use crate::event::{Event, Tag, TagEnd};

/// An opening tag immediately followed by its closing tag.
pub const EMPTY_PARAGRAPH: &str = "<p></p>";

/// Writes formatter events as an HTML fragment.
///
/// Line content is written verbatim: the renderer does not escape `<`, `>`
/// or `&` found in message text, so its output is only as trustworthy as
/// the backend that produced the message.
///
/// Paragraphs and list items are assembled in a scratch buffer and written
/// once complete, with every `<p></p>` removed from them first. No other
/// piece of output ends in `<p>`, so this yields the same bytes as removing
/// the pattern from the whole fragment afterwards.
pub struct HtmlRenderer<W: Write> {
    writer: W,
    block: Option<String>,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            block: None,
        }
    }

    pub fn render<'a, I>(mut self, iter: I) -> io::Result<W>
    where
        I: IntoIterator<Item = Event<'a>>,
    {
        for event in iter {
            match event {
                Event::Start(tag) => self.write_start_tag(tag)?,
                Event::End(end) => self.write_end_tag(end)?,
                Event::Html(html) => self.write_html(html.as_ref())?,
                Event::LineBreak => self.writer.write_all(b"<br>")?,
            }
        }

        // A block left open by a truncated event stream is still emitted.
        self.flush_block()?;
        Ok(self.writer)
    }

    fn write_start_tag(&mut self, tag: Tag) -> io::Result<()> {
        match tag {
            Tag::Paragraph => self.begin_block("<p>"),
            Tag::Item => self.begin_block("<li>"),
            Tag::List(kind) => write!(self.writer, "<{}>", kind.element()),
        }
    }

    fn write_end_tag(&mut self, end: TagEnd) -> io::Result<()> {
        match end {
            TagEnd::Paragraph => self.end_block("</p>"),
            TagEnd::Item => self.end_block("</li>"),
            TagEnd::List(kind) => write!(self.writer, "</{}>", kind.element()),
        }
    }

    fn write_html(&mut self, html: &str) -> io::Result<()> {
        match self.block.as_mut() {
            Some(block) => {
                block.push_str(html);
                Ok(())
            }
            None => self.writer.write_all(html.as_bytes()),
        }
    }

    fn begin_block(&mut self, open: &str) -> io::Result<()> {
        self.flush_block()?;
        self.block = Some(String::from(open));
        Ok(())
    }

    fn end_block(&mut self, close: &str) -> io::Result<()> {
        match self.block.as_mut() {
            Some(block) => block.push_str(close),
            None => return self.writer.write_all(close.as_bytes()),
        }
        self.flush_block()
    }

    fn flush_block(&mut self) -> io::Result<()> {
        if let Some(block) = self.block.take() {
            let cleaned = strip_empty_paragraphs(&block);
            self.writer.write_all(cleaned.as_bytes())?;
        }
        Ok(())
    }
}

/// Removes every `<p></p>` in a single left-to-right pass.
///
/// Removal can bring a new `<p>` and `</p>` together; those are not removed.
pub fn strip_empty_paragraphs(html: &str) -> String {
    html.replace(EMPTY_PARAGRAPH, "")
}
