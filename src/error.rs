use std::path::PathBuf;

/// Errors that end a pipeline run.
///
/// Geometry failures are not here: the merger and matcher recover from them
/// locally and only count them.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required source file is absent. Raised before anything is written.
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// A source document is not a feature collection at all.
    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("failed to read {}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    /// A batch could not be committed within the retry budget.
    /// `batch` is zero-based, so a manual resume can skip the batches before it.
    #[error("batch {batch} failed to commit after {attempts} attempt(s)")]
    PersistenceFailure {
        batch: usize,
        attempts: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to encode record {id}")]
    Encode { id: String, #[source] source: serde_json::Error },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
