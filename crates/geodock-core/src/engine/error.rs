use super::device::DeviceError;
use super::encoder::EncoderError;
use super::predictor::PredictorError;
use crate::core::io::loader::StructureLoadError;
use crate::core::io::pdb::PdbError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Checkpoint not found: {}", .0.display())]
    CheckpointNotFound(PathBuf),
    #[error("Checkpoint '{path}' is unusable: {reason}", path = path.display())]
    InvalidCheckpoint { path: PathBuf, reason: String },
    #[error("Failed to start model worker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Model '{model}' failed to load: {message}")]
    Rejected { model: String, message: String },
    #[error("Model worker protocol error: {0}")]
    Protocol(String),
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Model loading failed: {0}")]
    ModelLoad(#[from] ModelLoadError),

    #[error("Device selection failed: {0}")]
    Device(#[from] DeviceError),

    #[error("Structure loading failed: {0}")]
    StructureLoad(#[from] StructureLoadError),

    #[error("Embedding failed: {0}")]
    Encoding(#[from] EncoderError),

    #[error("Docking failed: {0}")]
    Docking(#[from] PredictorError),

    #[error("Failed to write prediction to '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: PdbError,
    },
}
