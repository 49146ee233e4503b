//! A [`ModelBackend`] that hosts each pretrained model in its own long-lived worker
//! process.
//!
//! Workers speak one JSON object per line over stdio (see [`protocol`]). Tensors
//! never travel through the pipe: each call writes its inputs as safetensors into a
//! private temporary directory and the worker writes its outputs next to them.

pub mod models;
pub mod protocol;
pub mod worker;

pub use worker::WorkerError;

use super::backend::ModelBackend;
use super::checkpoint::Checkpoint;
use super::device::device_label;
use super::encoder::SequenceEncoder;
use super::error::ModelLoadError;
use super::predictor::DockingPredictor;
use candle_core::Device;
use models::{BridgeEncoder, BridgePredictor};
use tracing::info;
use worker::{WorkerProcess, WorkerRole, WorkerSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeBackend {
    pub program: String,
    pub args: Vec<String>,
}

impl BridgeBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn spec(&self, role: WorkerRole, device: &Device) -> WorkerSpec {
        WorkerSpec {
            program: self.program.clone(),
            args: self.args.clone(),
            role,
            device: device_label(device).to_string(),
            model: None,
            checkpoint: None,
        }
    }
}

impl ModelBackend for BridgeBackend {
    fn load_encoder(
        &self,
        model_id: &str,
        device: &Device,
    ) -> Result<Box<dyn SequenceEncoder>, ModelLoadError> {
        info!("Loading sequence encoder '{}'...", model_id);
        let spec = WorkerSpec {
            model: Some(model_id.to_string()),
            ..self.spec(WorkerRole::Encoder, device)
        };
        let worker = WorkerProcess::spawn(&spec)?;
        Ok(Box::new(BridgeEncoder::new(worker, device.clone())))
    }

    fn load_predictor(
        &self,
        checkpoint: &Checkpoint,
        device: &Device,
    ) -> Result<Box<dyn DockingPredictor>, ModelLoadError> {
        info!(
            "Loading docking model from '{}'...",
            checkpoint.path().display()
        );
        let spec = WorkerSpec {
            checkpoint: Some(checkpoint.path().to_path_buf()),
            ..self.spec(WorkerRole::Predictor, device)
        };
        let worker = WorkerProcess::spawn(&spec)?;
        Ok(Box::new(BridgePredictor::new(worker, device.clone())))
    }
}
