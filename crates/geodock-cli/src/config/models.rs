use geodock::engine::bridge::BridgeBackend;
use geodock::engine::config::RunnerConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub runner: RunnerConfig,
    pub backend: BridgeBackend,
    pub chain: Option<char>,
}
