//! Error types for the pipeline and its collaborators.

use thiserror::Error;

/// Error from a text-generation backend.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("generator request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generator returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generator returned an empty completion")]
    EmptyCompletion,
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),
}

/// Error from the lenient structured-data repair layer.
#[derive(Error, Debug)]
pub enum RepairError {
    #[error("no JSON array found in response")]
    NoArray,
    #[error("no JSON object found in response")]
    NoObject,
    #[error("JSON parse failed after repair: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fatal pipeline error. Everything past the input check degrades instead of failing.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("transcript is empty")]
    EmptyTranscript,
}
