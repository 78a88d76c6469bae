use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Seconds to wait per reconnect attempt while the backend is down.
    pub reconnect_wait_secs: u64,
    /// Overall reconnect budget in seconds; absent means wait forever.
    pub connect_timeout_secs: Option<u64>,
    pub max_respawn_attempts: u32,
    pub request_queue_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Rolling log file; console-only when absent.
    pub file: Option<String>,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                reconnect_wait_secs: 5,
                connect_timeout_secs: None,
                max_respawn_attempts: 10,
                request_queue_depth: 100,
            },
            logging: LoggingConfig { file: None },
        }
    }
}
