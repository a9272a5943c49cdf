use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub keyboard: KeyboardConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Directory for rolling log files; the platform state dir when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            directory: None,
        }
    }
}

/// Keyboard geometry in terminal cells and animation timings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyboardConfig {
    pub button_height: u16,
    pub button_padding: u16,
    pub button_skip: u16,
    pub button_radius: u16,
    pub hover_duration_ms: u64,
    pub ripple_duration_ms: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            button_height: 1,
            button_padding: 1,
            button_skip: 1,
            button_radius: 0,
            hover_duration_ms: 200,
            ripple_duration_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoConfig {
    /// Delay before a callback button gets its simulated answer.
    pub callback_latency_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            callback_latency_ms: 1_200,
        }
    }
}
