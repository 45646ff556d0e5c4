//! Runtime configuration for the engine and the server.

use tokio::time::Duration;

/// Default pause before each autonomous opponent shot.
pub const DEFAULT_BOT_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Simulated thinking time between bot shots.
    pub bot_delay: Duration,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bot_delay: DEFAULT_BOT_DELAY,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            engine: EngineConfig::default(),
        }
    }
}
