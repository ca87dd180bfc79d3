use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
}

/// Static analysis parameters. Validated once at analyzer construction.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Number of log-spaced frequency bands.
    #[serde(default = "default_bands")]
    pub bands: usize,
    /// Duration of the slice analyzed around the playback position.
    #[serde(default = "default_window_ms")]
    pub window_ms: u32,
    /// Lower edge of the banded frequency range.
    #[serde(default = "default_min_hz")]
    pub min_hz: f32,
    /// Upper edge of the banded frequency range (clamped to Nyquist per track).
    #[serde(default = "default_max_hz")]
    pub max_hz: f32,
    /// Tracks decoded at a higher rate are resampled down to this.
    #[serde(default = "default_max_sample_rate")]
    pub max_sample_rate: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmoothingConfig {
    /// Blend factor for new raw levels (higher = snappier bars).
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Per-step bound of the idle animation jitter, in display units.
    #[serde(default = "default_idle_jitter")]
    pub idle_jitter: i32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            window_ms: default_window_ms(),
            min_hz: default_min_hz(),
            max_hz: default_max_hz(),
            max_sample_rate: default_max_sample_rate(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            idle_jitter: default_idle_jitter(),
        }
    }
}

fn default_bands() -> usize { 20 }
fn default_window_ms() -> u32 { 100 }
fn default_min_hz() -> f32 { 20.0 }
fn default_max_hz() -> f32 { 20_000.0 }
fn default_max_sample_rate() -> u32 { 44_100 }
fn default_alpha() -> f32 { 0.4 }
fn default_idle_jitter() -> i32 { 8 }

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bands == 0 {
            return Err(ConfigError::NoBands);
        }
        if self.window_ms == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if !(self.min_hz > 0.0) || !(self.max_hz > self.min_hz) {
            return Err(ConfigError::BadFrequencyRange {
                min_hz: self.min_hz,
                max_hz: self.max_hz,
            });
        }
        if self.max_sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRateCeiling);
        }
        Ok(())
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::BadSmoothing(self.alpha));
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyzer.validate()?;
        self.smoothing.validate()
    }
}

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Locate a config file: `ampviz.toml` in the working directory, then the
/// per-user config locations.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from("ampviz.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("ampviz").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("ampviz").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
