use super::bridge::WorkerError;
use candle_core::Tensor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("Encoder inference failed: {0}")]
    Inference(String),
    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),
    #[error("Unexpected encoder output shape {actual:?}: {reason}")]
    Shape { actual: Vec<usize>, reason: String },
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// A pretrained protein language model in inference mode.
///
/// Maps a `[B, T]` i64 token tensor to `[B, T, D]` f32 per-token representations.
/// Implementations must be deterministic for fixed weights.
pub trait SequenceEncoder: Send {
    fn encode(&self, tokens: &Tensor) -> Result<Tensor, EncoderError>;
}
