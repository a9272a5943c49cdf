use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{AppConfig, DemoConfig, KeyboardConfig, LogConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub keyboard: Option<FileKeyboardConfig>,
    pub demo: Option<FileDemoConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(keyboard) = self.keyboard {
            keyboard.merge_into(&mut config.keyboard);
        }

        if let Some(demo) = self.demo {
            demo.merge_into(&mut config.demo);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub directory: Option<PathBuf>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(directory) = self.directory {
            config.directory = Some(directory);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileKeyboardConfig {
    pub button_height: Option<u16>,
    pub button_padding: Option<u16>,
    pub button_skip: Option<u16>,
    pub button_radius: Option<u16>,
    pub hover_duration_ms: Option<u64>,
    pub ripple_duration_ms: Option<u64>,
}

impl FileKeyboardConfig {
    fn merge_into(self, config: &mut KeyboardConfig) {
        if let Some(height) = self.button_height {
            config.button_height = height;
        }

        if let Some(padding) = self.button_padding {
            config.button_padding = padding;
        }

        if let Some(skip) = self.button_skip {
            config.button_skip = skip;
        }

        if let Some(radius) = self.button_radius {
            config.button_radius = radius;
        }

        if let Some(hover) = self.hover_duration_ms {
            config.hover_duration_ms = hover;
        }

        if let Some(ripple) = self.ripple_duration_ms {
            config.ripple_duration_ms = ripple;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileDemoConfig {
    pub callback_latency_ms: Option<u64>,
}

impl FileDemoConfig {
    fn merge_into(self, config: &mut DemoConfig) {
        if let Some(latency) = self.callback_latency_ms {
            config.callback_latency_ms = latency;
        }
    }
}
