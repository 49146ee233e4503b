use super::protocol::{WorkerRequest, tensors};
use super::worker::WorkerProcess;
use crate::core::models::backbone::BackboneCoords;
use crate::engine::encoder::{EncoderError, SequenceEncoder};
use crate::engine::predictor::{
    DockingInput, DockingPredictor, PredictedComplex, Prediction, PredictorError,
};
use candle_core::{Device, Tensor};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

fn exchange_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::Builder::new().prefix("geodock-").tempdir()
}

fn load_tensor(path: &Path, name: &str, device: &Device) -> candle_core::Result<Tensor> {
    let mut tensors = candle_core::safetensors::load(path, device)?;
    tensors.remove(name).ok_or_else(|| {
        candle_core::Error::Msg(format!(
            "'{}' has no tensor named '{}'",
            path.display(),
            name
        ))
    })
}

pub struct BridgeEncoder {
    worker: WorkerProcess,
    device: Device,
}

impl BridgeEncoder {
    pub fn new(worker: WorkerProcess, device: Device) -> Self {
        Self { worker, device }
    }
}

impl SequenceEncoder for BridgeEncoder {
    fn encode(&self, tokens: &Tensor) -> Result<Tensor, EncoderError> {
        let dir = exchange_dir().map_err(|e| EncoderError::Inference(e.to_string()))?;
        let tokens_path = dir.path().join("tokens.safetensors");
        let output = dir.path().join("representations.safetensors");

        candle_core::safetensors::save(
            &HashMap::from([(tensors::TOKENS, tokens.clone())]),
            &tokens_path,
        )?;
        let reply = self.worker.request(&WorkerRequest::Encode {
            tokens: tokens_path,
            output: output.clone(),
        })?;
        debug!(
            worker = self.worker.label(),
            peak_memory_bytes = ?reply.peak_memory_bytes,
            "Encoder call finished."
        );

        Ok(load_tensor(&output, tensors::REPRESENTATIONS, &self.device)?)
    }
}

pub struct BridgePredictor {
    worker: WorkerProcess,
    device: Device,
}

impl BridgePredictor {
    pub fn new(worker: WorkerProcess, device: Device) -> Self {
        Self { worker, device }
    }
}

impl DockingPredictor for BridgePredictor {
    fn predict(&self, input: &DockingInput<'_>) -> Result<Prediction, PredictorError> {
        let dir = exchange_dir().map_err(|e| PredictorError::Inference(e.to_string()))?;
        let input_path = dir.path().join("partners.safetensors");
        let output = dir.path().join("complex.safetensors");

        candle_core::safetensors::save(&input.embeddings.named_tensors(), &input_path)?;
        let reply = self.worker.request(&WorkerRequest::Dock {
            sequence1: input.sequence1.to_string(),
            sequence2: input.sequence2.to_string(),
            input: input_path,
            output: output.clone(),
        })?;

        let coords = BackboneCoords::from_tensor(&load_tensor(
            &output,
            tensors::COORDS,
            &self.device,
        )?)?;
        let complex =
            PredictedComplex::from_joint_coords(input.sequence1, input.sequence2, coords)?;

        Ok(Prediction {
            complex,
            peak_memory_bytes: reply.peak_memory_bytes,
        })
    }
}
