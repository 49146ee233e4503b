use directories::ProjectDirs;
use geodock::engine::config::{DEFAULT_ENCODER_MODEL, DeviceKind};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub struct DefaultsConfig {
    pub checkpoint: PathBuf,
    pub device: DeviceKind,
    pub backend_program: String,
    pub backend_args: Vec<String>,
    pub encoder_model: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            checkpoint: PathBuf::from("weights/dips.ckpt"),
            device: DeviceKind::Auto,
            backend_program: "python".to_string(),
            backend_args: vec!["-m".to_string(), "geodock.worker".to_string()],
            encoder_model: DEFAULT_ENCODER_MODEL.to_string(),
        }
    }
}

/// `config.toml` in the platform configuration directory, whether or not it exists.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "geodock", "geodock")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
