use docchat_core::{
    ApiError, AskResponse, ChatSession, ClientConfig, SelectedFile, UploadResponse, View,
    decode_response,
};
use js_sys::Function;
use std::io::{self, Write};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Formats a chat answer into an HTML `String`. Message text is not escaped.
#[wasm_bindgen(js_name = format_message)]
pub fn format_message(input: &str) -> String {
    docchat_core::format_message(input)
}

/// Streams the formatted HTML into the provided JavaScript callback.
///
/// The callback is invoked with each UTF-8 chunk as paragraphs, items and
/// list tags are completed, so long answers can be appended to the chat
/// bubble incrementally.
#[wasm_bindgen(js_name = stream_message)]
pub fn stream_message(input: &str, chunk_callback: &Function) -> Result<(), JsError> {
    let writer = JsChunkWriter::new(chunk_callback.clone());
    docchat_core::write_message(input, writer).map_err(to_js_error)?;
    Ok(())
}

/// The upload and chat state of one page.
#[wasm_bindgen]
pub struct Session {
    inner: ChatSession,
}

#[wasm_bindgen]
impl Session {
    /// `config` is `{ api_base_url?: string }`, or `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Session, JsError> {
        let config = if config.is_null() || config.is_undefined() {
            ClientConfig::default()
        } else {
            let config: ClientConfig =
                serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
            config.validate().map_err(to_js_error)?;
            config
        };

        Ok(Self {
            inner: ChatSession::new(config),
        })
    }

    #[wasm_bindgen(getter, js_name = uploadUrl)]
    pub fn upload_url(&self) -> String {
        self.inner.config().upload_url()
    }

    #[wasm_bindgen(getter, js_name = askUrl)]
    pub fn ask_url(&self) -> String {
        self.inner.config().ask_url()
    }

    /// Multipart field name for each uploaded file.
    #[wasm_bindgen(getter, js_name = uploadField)]
    pub fn upload_field(&self) -> String {
        docchat_core::UPLOAD_FIELD.to_string()
    }

    /// `"upload"` or `"chat"`.
    #[wasm_bindgen(getter)]
    pub fn view(&self) -> String {
        match self.inner.view() {
            View::Upload => "upload".to_string(),
            View::Chat => "chat".to_string(),
        }
    }

    #[wasm_bindgen(getter, js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Selected files as `[{ name, size }]`.
    pub fn files(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.inner.files()).map_err(to_js_error)
    }

    /// Transcript as `[{ author, body: { kind, content } }]`.
    pub fn transcript(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.inner.transcript()).map_err(to_js_error)
    }

    /// Adds `[{ name, size }]` from a picker or drop event; returns the
    /// positions in that array of the files that were kept, so the page
    /// can hold on to the matching `File` handles.
    #[wasm_bindgen(js_name = addFiles)]
    pub fn add_files(&mut self, files: JsValue) -> Result<Vec<u32>, JsError> {
        let files: Vec<SelectedFile> = serde_wasm_bindgen::from_value(files).map_err(to_js_error)?;
        let accepted = self.inner.add_files(files);
        accepted
            .into_iter()
            .map(|position| u32::try_from(position).map_err(to_js_error))
            .collect()
    }

    #[wasm_bindgen(js_name = removeFile)]
    pub fn remove_file(&mut self, index: usize) -> Result<(), JsError> {
        self.inner.remove_file(index).map_err(to_js_error)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = showUpload)]
    pub fn show_upload(&mut self) {
        self.inner.show_upload();
    }

    #[wasm_bindgen(js_name = showChat)]
    pub fn show_chat(&mut self) -> Result<(), JsError> {
        self.inner.show_chat().map_err(to_js_error)
    }

    /// Marks an upload in flight and returns the files to send as
    /// `[{ name, size }]`, in selection order.
    #[wasm_bindgen(js_name = beginUpload)]
    pub fn begin_upload(&mut self) -> Result<JsValue, JsError> {
        let files = self.inner.begin_upload().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(files).map_err(to_js_error)
    }

    /// Completes the upload with the backend's HTTP status and body text.
    #[wasm_bindgen(js_name = finishUpload)]
    pub fn finish_upload(&mut self, status: u16, body: &str) -> Result<(), JsError> {
        let result = decode_response::<UploadResponse>(status, body);
        self.inner.finish_upload(result).map_err(to_js_error)
    }

    /// Completes the upload after `fetch` itself rejected.
    #[wasm_bindgen(js_name = failUpload)]
    pub fn fail_upload(&mut self, reason: &str) -> Result<(), JsError> {
        self.inner
            .finish_upload(Err(ApiError::Transport(reason.to_string())))
            .map_err(to_js_error)
    }

    /// Records the question and returns the JSON body to post.
    #[wasm_bindgen(js_name = beginAsk)]
    pub fn begin_ask(&mut self, question: &str) -> Result<JsValue, JsError> {
        let request = self.inner.begin_ask(question).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&request).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = finishAsk)]
    pub fn finish_ask(&mut self, status: u16, body: &str) -> Result<(), JsError> {
        let result = decode_response::<AskResponse>(status, body);
        self.inner.finish_ask(result).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = failAsk)]
    pub fn fail_ask(&mut self, reason: &str) -> Result<(), JsError> {
        self.inner
            .finish_ask(Err(ApiError::Transport(reason.to_string())))
            .map_err(to_js_error)
    }
}

fn to_js_error<E: ToString>(err: E) -> JsError {
    JsError::new(&err.to_string())
}

struct JsChunkWriter {
    callback: Function,
}

impl JsChunkWriter {
    fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl Write for JsChunkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = std::str::from_utf8(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        self.callback
            .call1(&JsValue::UNDEFINED, &JsValue::from_str(chunk))
            .map_err(js_callback_error)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn js_callback_error(err: JsValue) -> io::Error {
    let message = err
        .as_string()
        .or_else(|| {
            js_sys::JSON::stringify(&err)
                .ok()
                .and_then(|s| s.as_string())
        })
        .unwrap_or_else(|| "callback threw".to_string());
    io::Error::other(message)
}
