//! State behind the upload and chat views.
//!
//! The page owns the DOM and the network calls; this module decides what
//! those calls are allowed to be and what the transcript looks like after
//! they return. Only one request may be in flight at a time, which is what
//! the page reflects by disabling its buttons.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiError, AskRequest, AskResponse, EmptyQuestion, UploadResponse};
use crate::config::ClientConfig;
use crate::format_message;

/// A file the user picked or dropped, before it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Upload,
    Chat,
}

/// The request currently awaiting a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pending {
    Upload,
    Ask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
    System,
}

/// How a bubble's body must be inserted into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum BubbleBody {
    /// Inserted as text; never interpreted as markup.
    Text(String),
    /// Formatter output, inserted as markup.
    Html(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bubble {
    pub author: Author,
    pub body: BubbleBody,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a request is already in progress")]
    Busy,
    #[error("please select at least one file")]
    NoFiles,
    #[error("upload documents before asking a question")]
    NotReady,
    #[error(transparent)]
    EmptyQuestion(#[from] EmptyQuestion),
    #[error("no {0:?} request is pending")]
    NotPending(Pending),
    #[error("no file at position {0}")]
    NoSuchFile(usize),
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    config: ClientConfig,
    files: Vec<SelectedFile>,
    view: View,
    pending: Option<Pending>,
    documents_ready: bool,
    transcript: Vec<Bubble>,
}

impl ChatSession {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            view: View::default(),
            pending: None,
            documents_ready: false,
            transcript: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn documents_ready(&self) -> bool {
        self.documents_ready
    }

    pub fn transcript(&self) -> &[Bubble] {
        &self.transcript
    }

    /// Adds picked or dropped files, skipping ones already selected.
    /// Returns the positions, within `files`, of the ones that were kept.
    pub fn add_files<I>(&mut self, files: I) -> Vec<usize>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let mut accepted = Vec::new();
        for (position, file) in files.into_iter().enumerate() {
            if !self.files.contains(&file) {
                self.files.push(file);
                accepted.push(position);
            }
        }
        tracing::debug!(added = accepted.len(), total = self.files.len(), "files selected");
        accepted
    }

    pub fn remove_file(&mut self, index: usize) -> Result<SelectedFile, SessionError> {
        if index >= self.files.len() {
            return Err(SessionError::NoSuchFile(index));
        }
        Ok(self.files.remove(index))
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn show_upload(&mut self) {
        self.view = View::Upload;
    }

    /// Switches to the chat view once documents have been ingested.
    pub fn show_chat(&mut self) -> Result<(), SessionError> {
        if !self.documents_ready {
            return Err(SessionError::NotReady);
        }
        self.view = View::Chat;
        Ok(())
    }

    /// Marks an upload as in flight. The caller posts [`Self::files`] to
    /// [`ClientConfig::upload_url`].
    pub fn begin_upload(&mut self) -> Result<&[SelectedFile], SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }
        if self.files.is_empty() {
            return Err(SessionError::NoFiles);
        }
        self.pending = Some(Pending::Upload);
        tracing::debug!(files = self.files.len(), "upload started");
        Ok(&self.files)
    }

    pub fn finish_upload(
        &mut self,
        result: Result<UploadResponse, ApiError>,
    ) -> Result<(), SessionError> {
        self.take_pending(Pending::Upload)?;

        match result {
            Ok(response) => {
                tracing::debug!(reply = %response.message, "upload accepted");
                self.documents_ready = true;
                self.files.clear();
                self.view = View::Chat;
                self.push(Author::System, BubbleBody::Text(response.message));
            }
            Err(err) => {
                tracing::warn!(%err, "upload failed");
                self.push(Author::System, BubbleBody::Text(format!("Upload failed: {err}")));
            }
        }
        Ok(())
    }

    /// Records the user's question and marks it as in flight. The returned
    /// body goes to [`ClientConfig::ask_url`].
    pub fn begin_ask(&mut self, question: &str) -> Result<AskRequest, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }
        if !self.documents_ready {
            return Err(SessionError::NotReady);
        }
        let request = AskRequest::new(question)?;

        self.push(Author::User, BubbleBody::Text(request.question.clone()));
        self.pending = Some(Pending::Ask);
        Ok(request)
    }

    pub fn finish_ask(&mut self, result: Result<AskResponse, ApiError>) -> Result<(), SessionError> {
        self.take_pending(Pending::Ask)?;

        match result {
            Ok(response) => {
                let html = format_message(&response.answer);
                self.push(Author::Bot, BubbleBody::Html(html));
            }
            Err(err) => {
                tracing::warn!(%err, "question failed");
                self.push(Author::System, BubbleBody::Text(format!("Error: {err}")));
            }
        }
        Ok(())
    }

    fn take_pending(&mut self, expected: Pending) -> Result<(), SessionError> {
        if self.pending != Some(expected) {
            return Err(SessionError::NotPending(expected));
        }
        self.pending = None;
        Ok(())
    }

    fn push(&mut self, author: Author, body: BubbleBody) {
        self.transcript.push(Bubble { author, body });
    }
}
