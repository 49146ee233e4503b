use super::checkpoint::Checkpoint;
use super::encoder::SequenceEncoder;
use super::error::ModelLoadError;
use super::predictor::DockingPredictor;
use candle_core::Device;

/// Loads pretrained models onto a device.
///
/// Returned handles are in inference mode and stay bound to `device` for their
/// whole lifetime.
pub trait ModelBackend {
    fn load_encoder(
        &self,
        model_id: &str,
        device: &Device,
    ) -> Result<Box<dyn SequenceEncoder>, ModelLoadError>;

    fn load_predictor(
        &self,
        checkpoint: &Checkpoint,
        device: &Device,
    ) -> Result<Box<dyn DockingPredictor>, ModelLoadError>;
}
