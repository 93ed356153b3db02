use thiserror::Error;

/// Errors that abort the batch before any output is written.
///
/// Per-request misses ("not found" answers) are not errors; they are regular
/// response payloads and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// A bus declaration references a stop the input never defined.
    #[error("bus {bus} references unknown stop {stop}")]
    UnknownStop { bus: String, stop: String },
    /// The input document is not valid JSON or does not match the schema.
    #[error("input error: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading the input or writing the output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
