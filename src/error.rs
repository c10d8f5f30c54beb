use thiserror::Error;

/// Task mutations that were rejected. Both variants are silent no-ops for the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyText,
    #[error("task not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FocusError {
    #[error("no pending tasks to focus")]
    EmptyView,
}

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
    #[error("{0} failed: {1}")]
    Failed(&'static str, String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse stored `{key}`: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored `{key}` is inconsistent: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings update: {0}")]
    Invalid(#[from] serde_json::Error),
}
