//! Configuration file handling for braille-render.
//!
//! Loads configuration from `<config dir>/braille-render/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::{FramePolicy, RenderOptions, Threshold, DEFAULT_FACTOR};

/// Configuration file structure for braille-render.
/// Loaded from the user config dir (or custom path via --config).
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_factor")]
    pub factor: usize,
    /// Fixed threshold; the frame mean is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    #[serde(default)]
    pub invert: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            factor: DEFAULT_FACTOR,
            threshold: None,
            invert: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct StreamConfig {
    /// Skip frames that fail to decode instead of stopping.
    #[serde(default)]
    pub skip_corrupt: bool,
    /// Print rows in stored order instead of flipping bottom-up frames.
    #[serde(default)]
    pub keep_orientation: bool,
}

fn default_factor() -> usize {
    DEFAULT_FACTOR
}

/// Default config file contents written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# braille-render configuration

[render]
# Average factor x factor pixel blocks before tiling (1 = full resolution)
factor = 2
# Fixed brightness threshold (0-255); omit to use each frame's mean luminance
# threshold = 128
# Light dots for dark pixels (for light terminal themes)
invert = false

[stream]
# Skip frames that fail to decode instead of stopping
skip_corrupt = false
# Print rows in stored order instead of flipping bottom-up bitmaps
keep_orientation = false
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Render options described by this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            factor: self.render.factor,
            threshold: self
                .render
                .threshold
                .map_or(Threshold::FrameMean, Threshold::Fixed),
            invert: self.render.invert,
            top_down: !self.stream.keep_orientation,
        }
    }

    pub fn frame_policy(&self) -> FramePolicy {
        if self.stream.skip_corrupt {
            FramePolicy::Skip
        } else {
            FramePolicy::Abort
        }
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("braille-render").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/braille-render/config.toml")
        })
}
