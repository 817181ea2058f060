#![deny(missing_docs)]
//! Node.js bindings that surface docchat's answer formatter.

use napi_derive::napi;

/// Returns the version string reported by the core crate.
#[napi]
pub fn version() -> String {
    docchat_core::version().to_string()
}

/// Formats a chat answer into an HTML fragment. Message text is not escaped.
#[napi(js_name = "formatMessage")]
pub fn format_message(message: String) -> String {
    docchat_core::format_message(&message)
}

/// Decodes a `/ask` reply and returns the formatted answer, or throws with
/// the backend's `detail`.
#[napi(js_name = "formatAnswerResponse")]
pub fn format_answer_response(status: u32, body: String) -> napi::Result<String> {
    docchat_core::format_answer(status, &body).map_err(to_napi_error)
}

/// Backend endpoints for server-side callers, honouring
/// `DOCCHAT_API_BASE_URL`.
#[napi(object)]
pub struct Endpoints {
    /// `POST` target for multipart uploads.
    pub upload: String,
    /// `POST` target for questions.
    pub ask: String,
}

/// Resolves the backend endpoints from the process environment.
#[napi]
pub fn endpoints() -> napi::Result<Endpoints> {
    let config = docchat_core::ClientConfig::from_env().map_err(to_napi_error)?;
    Ok(Endpoints {
        upload: config.upload_url(),
        ask: config.ask_url(),
    })
}

fn to_napi_error<E: ToString>(err: E) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}
