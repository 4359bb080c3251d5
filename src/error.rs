//! Error type shared by the dialog core.
//!
//! Most failure modes in this crate are recovered locally (malformed persisted
//! JSON, broken filter expressions) and only ever logged.  What remains here is
//! what a caller must see: a dialog that cannot be built, or a store that
//! refused a write.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// A required collaborator (store, scheduler, window) was not supplied.
    #[error("dialog cannot be constructed without a {0}")]
    MissingCollaborator(&'static str),

    /// The persistent key/value backend rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// Construction-time props could not be decoded.
    #[error("invalid dialog props: {0}")]
    InvalidProps(String),

    /// Unknown editor mode name.
    #[error("unknown editor mode '{0}'")]
    InvalidMode(String),
}

impl From<DialogError> for JsValue {
    fn from(err: DialogError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for DialogError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        DialogError::InvalidProps(err.to_string())
    }
}
