//! Playback-synchronized spectrum band levels for music player UIs.
//!
//! The player owns playback and widgets; this crate owns the numbers. It
//! decodes a track to mono PCM once, then maps each polled playback position
//! to a vector of log-spaced band levels, smoothed for display, with a
//! jittered idle animation when no real data is available.
//!
//! Typical wiring: call [`LevelFeed::set_track`] on track change,
//! [`LevelFeed::tick`] from a ~50 ms timer with the player's position, and
//! [`LevelFeed::idle_tick`] from a ~120 ms timer; hand the returned slice to
//! the bar renderer.

pub mod audio;
pub mod config;
pub mod error;
pub mod levels;

pub use audio::analysis::{band_edges, SpectrumAnalyzer, MIN_WINDOW_SAMPLES};
pub use audio::decode::{decode_audio, AudioData};
pub use config::{discover_config, load_config, AnalyzerConfig, Config, SmoothingConfig};
pub use error::{ConfigError, LevelsGap};
pub use levels::feed::{LevelFeed, FAST_TICK_MS, IDLE_TICK_MS};
pub use levels::{LevelSmoother, DISPLAY_MAX};
