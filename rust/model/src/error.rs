// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model files.

/// Result type alias for model file operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while loading or saving a model file.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("model file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An element refers to another element that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Two elements of the same kind share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// An element id is too large to leave room for new elements.
    #[error("element ids exhaust the id space")]
    IdSpaceExhausted,
}
