pub mod feed;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SmoothingConfig;
use crate::error::ConfigError;

/// Displayed levels live on a 0..100 bar-height scale.
pub const DISPLAY_MAX: f32 = 100.0;

/// Blends raw band levels into displayed bar heights, and wiggles them when
/// no real data arrives so an idle window is not completely static.
pub struct LevelSmoother {
    cfg: SmoothingConfig,
    levels: Vec<f32>,
    rng: StdRng,
}

impl LevelSmoother {
    pub fn new(cfg: SmoothingConfig, bands: usize) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            levels: vec![0.0; bands],
            rng: StdRng::from_entropy(),
        })
    }

    /// Like [`new`](Self::new) but with a fixed RNG seed, so idle animation
    /// is reproducible.
    pub fn with_seed(cfg: SmoothingConfig, bands: usize, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            levels: vec![0.0; bands],
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Current displayed levels, one per band, each in [0, `DISPLAY_MAX`].
    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    /// Blend a raw [0, 1] band vector into the displayed state.
    ///
    /// On a band-count mismatch the displayed state restarts from zero at the
    /// new length before blending.
    pub fn apply(&mut self, raw: &[f32]) {
        if raw.is_empty() {
            return;
        }
        if self.levels.len() != raw.len() {
            self.levels = vec![0.0; raw.len()];
        }
        let alpha = self.cfg.alpha;
        for (cur, &v) in self.levels.iter_mut().zip(raw) {
            let v = v.clamp(0.0, 1.0);
            *cur = (1.0 - alpha) * *cur + alpha * (v * DISPLAY_MAX);
        }
    }

    /// One step of the idle animation: nudge every bar by a bounded random
    /// integer amount and clamp back into range.
    pub fn idle_step(&mut self) {
        let jitter = self.cfg.idle_jitter;
        if jitter <= 0 {
            return;
        }
        for cur in self.levels.iter_mut() {
            let step = self.rng.gen_range(-jitter..jitter) as f32;
            *cur = (*cur + step).clamp(0.0, DISPLAY_MAX);
        }
    }
}
