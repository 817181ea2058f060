use std::io::Write;

use crate::FormatError;
use crate::event::Event;
use crate::html_renderer::HtmlRenderer;

/// A bridge that accepts an iterator of formatter events and streams the
/// resulting HTML directly into an `io::Write`.
pub struct PipeAdapter<W> {
    writer: W,
}

impl<W: Write> PipeAdapter<W> {
    /// Create a new adapter wrapping an IO writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the event iterator, drives the HTML into the writer, flushes
    /// it and hands it back.
    pub fn drive<'a, I>(self, events: I) -> Result<W, FormatError>
    where
        I: IntoIterator<Item = Event<'a>>,
    {
        let mut writer = HtmlRenderer::new(self.writer).render(events)?;
        writer.flush()?;
        Ok(writer)
    }
}
