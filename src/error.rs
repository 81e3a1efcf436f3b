//! Error types for the task store, the chat client and the subtask generator.

use std::path::PathBuf;

use thiserror::Error;

/// Marker prepended to generator errors when they are shown as plain text.
pub const ERROR_PREFIX: &str = "Error: ";

/// Failures of the JSON-backed task store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid task list: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} contains task id {id} more than once")]
    DuplicateId { path: PathBuf, id: u64 },

    #[error("{path} contains task id 0; ids start at 1")]
    ZeroId { path: PathBuf },

    #[error("no task ids left to assign")]
    IdExhausted,

    #[error("failed to save tasks to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise tasks: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("task description cannot be empty")]
    EmptyDescription,
}

/// Failures talking to the chat-completion service.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("service returned no content")]
    EmptyResponse,
}

/// Why a breakdown produced no subtasks.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("OpenAI API key is not configured.")]
    NotConfigured,

    #[error(transparent)]
    Request(#[from] LlmError),

    #[error("No subtasks could be generated.")]
    NoSubtasks,
}

impl GenerateError {
    /// Plain-text form, e.g. `Error: No subtasks could be generated.`
    pub fn sentinel(&self) -> String {
        format!("{ERROR_PREFIX}{self}")
    }
}
