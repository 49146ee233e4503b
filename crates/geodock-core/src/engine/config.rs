use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of the pretrained sequence encoder fetched by the backend.
pub const DEFAULT_ENCODER_MODEL: &str = "esm2_t33_650M_UR50D";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Unknown device '{0}'. Expected 'cpu', 'accelerator', or 'auto'.")]
    UnknownDevice(String),
}

/// Which compute device the models are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    /// General-purpose CPU.
    Cpu,
    /// An accelerator (CUDA or Metal); construction fails if none is available.
    Accelerator,
    /// An accelerator if one is available, otherwise the CPU.
    #[default]
    Auto,
}

impl FromStr for DeviceKind {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(DeviceKind::Cpu),
            "accelerator" | "gpu" | "cuda" | "metal" => Ok(DeviceKind::Accelerator),
            "auto" => Ok(DeviceKind::Auto),
            _ => Err(ConfigError::UnknownDevice(s.to_string())),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DeviceKind::Cpu => "cpu",
                DeviceKind::Accelerator => "accelerator",
                DeviceKind::Auto => "auto",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub checkpoint_path: PathBuf,
    pub device: DeviceKind,
    pub output_path: Option<PathBuf>,
    pub encoder_model: String,
}

#[derive(Default)]
pub struct RunnerConfigBuilder {
    checkpoint_path: Option<PathBuf>,
    device: Option<DeviceKind>,
    output_path: Option<PathBuf>,
    encoder_model: Option<String>,
}

impl RunnerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkpoint_path(mut self, path: PathBuf) -> Self {
        self.checkpoint_path = Some(path);
        self
    }
    pub fn device(mut self, device: DeviceKind) -> Self {
        self.device = Some(device);
        self
    }
    pub fn output_path(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = path;
        self
    }
    pub fn encoder_model(mut self, model: impl Into<String>) -> Self {
        self.encoder_model = Some(model.into());
        self
    }

    pub fn build(self) -> Result<RunnerConfig, ConfigError> {
        Ok(RunnerConfig {
            checkpoint_path: self
                .checkpoint_path
                .ok_or(ConfigError::MissingParameter("checkpoint_path"))?,
            device: self.device.unwrap_or_default(),
            output_path: self.output_path,
            encoder_model: self
                .encoder_model
                .unwrap_or_else(|| DEFAULT_ENCODER_MODEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_checkpoint() {
        let result = RunnerConfigBuilder::new().device(DeviceKind::Cpu).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("checkpoint_path")));
    }

    #[test]
    fn builder_fills_defaults() {
        let config = RunnerConfigBuilder::new()
            .checkpoint_path(PathBuf::from("weights/dips.ckpt"))
            .build()
            .unwrap();
        assert_eq!(config.device, DeviceKind::Auto);
        assert_eq!(config.output_path, None);
        assert_eq!(config.encoder_model, DEFAULT_ENCODER_MODEL);
    }

    #[test]
    fn device_kind_parses_aliases() {
        assert_eq!("CPU".parse::<DeviceKind>(), Ok(DeviceKind::Cpu));
        assert_eq!("cuda".parse::<DeviceKind>(), Ok(DeviceKind::Accelerator));
        assert_eq!(" auto ".parse::<DeviceKind>(), Ok(DeviceKind::Auto));
        assert_eq!(
            "tpu".parse::<DeviceKind>(),
            Err(ConfigError::UnknownDevice("tpu".to_string()))
        );
    }

    #[test]
    fn device_kind_display_round_trips_through_from_str() {
        for kind in [DeviceKind::Cpu, DeviceKind::Accelerator, DeviceKind::Auto] {
            assert_eq!(kind.to_string().parse::<DeviceKind>(), Ok(kind));
        }
    }
}
