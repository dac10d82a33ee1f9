use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Where node timestamps come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClockConfig {
    /// Wall clock time (milliseconds since the unix epoch)
    #[default]
    System,
    /// Every stamp uses the same value. Serialized headers, and so their
    ///  hash links, become reproducible.
    Fixed { millis: i64 },
}

impl ClockConfig {
    pub fn now_millis(&self) -> i64 {
        match self {
            ClockConfig::System => Utc::now().timestamp_millis(),
            ClockConfig::Fixed { millis } => *millis,
        }
    }
}

/// Tunables for a brick map instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Serialize headers as indented JSON
    #[serde(default)]
    pub pretty: bool,
    /// Source of createdAt / updatedAt / deletedAt stamps
    #[serde(default)]
    pub clock: ClockConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Config with a fixed clock, mostly useful for tests
    pub fn fixed_clock(millis: i64) -> Self {
        Self {
            clock: ClockConfig::Fixed { millis },
            ..Self::default()
        }
    }
}
