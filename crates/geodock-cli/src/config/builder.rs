use super::defaults::{DefaultsConfig, default_config_path};
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use geodock::engine::bridge::BridgeBackend;
use geodock::engine::config::{DeviceKind, RunnerConfigBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn build_config(args: &RunArgs, output: Option<&Path>) -> Result<AppConfig> {
    build_config_with_default_file(args, output, default_config_path())
}

pub(crate) fn build_config_with_default_file(
    args: &RunArgs,
    output: Option<&Path>,
    default_file: Option<PathBuf>,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match (&args.config, default_file) {
        (Some(path), _) => FileConfig::from_file(path)?,
        (None, Some(path)) if path.is_file() => {
            debug!("Using configuration file at default location: {:?}", path);
            FileConfig::from_file(&path)?
        }
        _ => FileConfig::default(),
    };

    let config = apply_cli_flags(file_config, args, output);
    let mut config = apply_set_values(config, &args.set_values)?;

    let backend_file = config.backend.take().unwrap_or_default();
    let structure_file = config.structure.take().unwrap_or_default();

    let runner = RunnerConfigBuilder::new()
        .checkpoint_path(config.checkpoint.unwrap_or(defaults.checkpoint))
        .device(config.device.unwrap_or(defaults.device))
        .output_path(config.output)
        .encoder_model(
            backend_file
                .encoder_model
                .unwrap_or(defaults.encoder_model),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let backend = BridgeBackend::new(
        backend_file.program.unwrap_or(defaults.backend_program),
        backend_file.args.unwrap_or(defaults.backend_args),
    );

    Ok(AppConfig {
        runner,
        backend,
        chain: structure_file.chain,
    })
}

fn apply_cli_flags(mut config: FileConfig, args: &RunArgs, output: Option<&Path>) -> FileConfig {
    if let Some(checkpoint) = &args.checkpoint {
        config.checkpoint = Some(checkpoint.clone());
    }
    if let Some(device) = args.device {
        config.device = Some(device);
    }
    if let Some(output) = output {
        config.output = Some(output.to_path_buf());
    }
    if let Some(chain) = args.chain {
        config.structure.get_or_insert_with(Default::default).chain = Some(chain);
    }
    config
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key.trim() {
            "checkpoint" => config.checkpoint = Some(PathBuf::from(value_str)),
            "device" => {
                config.device = Some(
                    value_str
                        .parse::<DeviceKind>()
                        .map_err(|e| CliError::Config(e.to_string()))?,
                )
            }
            "output" => config.output = Some(PathBuf::from(value_str)),
            "backend.program" => {
                config.backend.get_or_insert_with(Default::default).program =
                    Some(value_str.to_string())
            }
            "backend.args" => {
                config.backend.get_or_insert_with(Default::default).args =
                    Some(value_str.split_whitespace().map(str::to_string).collect())
            }
            "backend.encoder-model" => {
                config
                    .backend
                    .get_or_insert_with(Default::default)
                    .encoder_model = Some(value_str.to_string())
            }
            "structure.chain" => {
                let mut chars = value_str.chars();
                let (Some(chain), None) = (chars.next(), chars.next()) else {
                    return Err(CliError::Config(format!(
                        "Invalid chain identifier for {}: '{}'",
                        key, value_str
                    )));
                };
                config.structure.get_or_insert_with(Default::default).chain = Some(chain);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
