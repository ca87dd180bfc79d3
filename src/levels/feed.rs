use std::path::Path;

use super::LevelSmoother;
use crate::audio::analysis::SpectrumAnalyzer;
use crate::audio::decode::AudioData;
use crate::config::Config;
use crate::error::ConfigError;

/// Suggested interval for [`LevelFeed::tick`], in milliseconds.
pub const FAST_TICK_MS: u64 = 50;
/// Suggested interval for [`LevelFeed::idle_tick`], in milliseconds.
pub const IDLE_TICK_MS: u64 = 120;

/// Glue between the two timers a player UI runs: the fast tick that follows
/// the playback position and the slow tick that animates an idle display.
///
/// Real levels always win: a fast tick that produced data marks the frame
/// driven, and the idle animation only runs when the last fast tick did not.
/// Both ticks are best-effort and never block; a tick without data is a no-op.
pub struct LevelFeed {
    analyzer: SpectrumAnalyzer,
    smoother: LevelSmoother,
    driven: bool,
}

impl LevelFeed {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let bands = config.analyzer.bands;
        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config.analyzer)?,
            smoother: LevelSmoother::new(config.smoothing, bands)?,
            driven: false,
        })
    }

    /// Like [`new`](Self::new) with a fixed idle-animation seed.
    pub fn with_seed(config: Config, seed: u64) -> Result<Self, ConfigError> {
        let bands = config.analyzer.bands;
        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config.analyzer)?,
            smoother: LevelSmoother::with_seed(config.smoothing, bands, seed)?,
            driven: false,
        })
    }

    /// Decode a new track for analysis. Playback itself is the media player's
    /// business; this only swaps the analysis buffer.
    pub fn set_track(&mut self, path: &Path) {
        self.driven = false;
        self.analyzer.set_track(path);
    }

    /// Adopt already-decoded PCM as the current track.
    pub fn set_audio(&mut self, audio: AudioData) {
        self.driven = false;
        self.analyzer.set_audio(audio);
    }

    pub fn clear_track(&mut self) {
        self.driven = false;
        self.analyzer.clear_track();
    }

    pub fn analyzer(&self) -> &SpectrumAnalyzer {
        &self.analyzer
    }

    /// Current displayed bar heights, one per band, each in [0, 100].
    pub fn levels(&self) -> &[f32] {
        self.smoother.levels()
    }

    /// Fast tick: query levels at the playback position and blend them in.
    /// Gated on `playing` so a paused player leaves the bars to the idle
    /// animation.
    pub fn tick(&mut self, position_ms: u64, playing: bool) -> &[f32] {
        self.driven = false;
        if playing {
            if let Some(raw) = self.analyzer.levels_at_ms(position_ms) {
                self.smoother.apply(&raw);
                self.driven = true;
            }
        }
        self.smoother.levels()
    }

    /// Slow tick: run one idle-animation step, unless the last fast tick
    /// already produced real levels.
    pub fn idle_tick(&mut self) -> &[f32] {
        if !self.driven {
            self.smoother.idle_step();
        }
        self.smoother.levels()
    }
}
