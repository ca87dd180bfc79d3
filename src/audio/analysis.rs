use std::collections::HashMap;
use std::path::Path;

use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::{decode_audio, AudioData};
use crate::config::AnalyzerConfig;
use crate::error::{ConfigError, LevelsGap};

/// Slices shorter than this are not worth transforming.
pub const MIN_WINDOW_SAMPLES: usize = 16;

const EPS: f32 = 1e-9;
const RANGE_FLOOR: f32 = 1e-6;
const WEIGHT_LOW: f32 = 1.2;
const WEIGHT_HIGH: f32 = 0.9;

/// Maps a playback position to per-band spectrum levels for the current track.
///
/// Owns the decoded PCM for one track at a time. The buffer is replaced
/// wholesale on track change (rate and samples always swap together), so a
/// query sees either the complete previous track or the complete new one.
pub struct SpectrumAnalyzer {
    cfg: AnalyzerConfig,
    audio: Option<AudioData>,
    // Memoized Hann coefficients keyed by window length. Only a handful of
    // distinct lengths occur per process, so the map never needs eviction.
    hann_cache: HashMap<usize, Vec<f32>>,
    planner: FftPlanner<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(cfg: AnalyzerConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            audio: None,
            hann_cache: HashMap::new(),
            planner: FftPlanner::new(),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.cfg
    }

    pub fn has_track(&self) -> bool {
        self.audio.is_some()
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.audio.as_ref().map(AudioData::duration_ms)
    }

    /// Decode `path` and adopt it as the current track. A failed decode clears
    /// the buffer, degrading every subsequent query to "no levels".
    pub fn set_track(&mut self, path: &Path) {
        self.audio = match decode_audio(path, self.cfg.max_sample_rate) {
            Ok(audio) => Some(audio),
            Err(err) => {
                log::warn!("Analysis unavailable for {}: {:#}", path.display(), err);
                None
            }
        };
    }

    /// Adopt already-decoded PCM as the current track.
    pub fn set_audio(&mut self, audio: AudioData) {
        self.audio = Some(audio);
    }

    pub fn clear_track(&mut self) {
        self.audio = None;
    }

    /// Band levels in [0, 1] for the given playback position, lowest band
    /// first, or `None` when no analysis is possible this tick.
    pub fn levels_at_ms(&mut self, position_ms: u64) -> Option<Vec<f32>> {
        self.try_levels_at_ms(position_ms).ok()
    }

    /// Same as [`levels_at_ms`](Self::levels_at_ms), with the gap reason.
    pub fn try_levels_at_ms(&mut self, position_ms: u64) -> Result<Vec<f32>, LevelsGap> {
        let audio = self.audio.as_ref().ok_or(LevelsGap::NoTrack)?;
        let rate = audio.sample_rate;

        // Center the analysis window on the position, clamped to the start.
        // The ms->index conversion runs in u128 so an absurd position maps to
        // PastEnd instead of overflowing.
        let half_ms = self.cfg.window_ms as u64 / 2;
        let start_ms = position_ms.saturating_sub(half_ms);
        let end_ms = start_ms.saturating_add(self.cfg.window_ms as u64);
        let start = start_ms as u128 * rate as u128 / 1000;
        if start >= audio.samples.len() as u128 {
            return Err(LevelsGap::PastEnd);
        }
        let start = start as usize;
        let end = (end_ms as u128 * rate as u128 / 1000).min(audio.samples.len() as u128) as usize;
        let chunk = &audio.samples[start..end];
        if chunk.len() < MIN_WINDOW_SAMPLES {
            return Err(LevelsGap::WindowTooShort);
        }

        let window: &[f32] = self
            .hann_cache
            .entry(chunk.len())
            .or_insert_with(|| hann_window(chunk.len()));

        // Windowed slice, zero-padded to the next power of two.
        let n = chunk.len().next_power_of_two();
        let mut buf: Vec<Complex<f32>> = Vec::with_capacity(n);
        buf.extend(
            chunk
                .iter()
                .zip(window.iter())
                .map(|(&s, &w)| Complex::new(s * w, 0.0)),
        );
        buf.resize(n, Complex::new(0.0, 0.0));

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buf);

        // One-sided magnitude spectrum.
        let half_bins = n / 2 + 1;
        let freq_step = rate as f32 / n as f32;
        let mags: Vec<f32> = buf[..half_bins].iter().map(|c| c.norm()).collect();

        let fmax = self.cfg.max_hz.min(rate as f32 / 2.0);
        let edges = band_edges(self.cfg.min_hz, fmax, self.cfg.bands);

        // RMS of the magnitudes falling in each band; empty bands stay 0.
        let mut levels = vec![0.0f32; self.cfg.bands];
        for (b, level) in levels.iter_mut().enumerate() {
            let (lo, hi) = (edges[b], edges[b + 1]);
            let first = (lo / freq_step).ceil() as usize;
            let last = ((hi / freq_step).ceil() as usize).min(half_bins);
            if first >= last {
                continue;
            }
            let sum: f32 = mags[first..last].iter().map(|&m| m * m).sum();
            *level = (sum / (last - first) as f32).sqrt();
        }

        shape_levels(&mut levels);
        Ok(levels)
    }
}

/// Geometric band edges: `bands + 1` values from `fmin` to `fmax`.
pub fn band_edges(fmin: f32, fmax: f32, bands: usize) -> Vec<f32> {
    let ratio = fmax / fmin;
    (0..=bands)
        .map(|i| fmin * ratio.powf(i as f32 / bands as f32))
        .collect()
}

/// Log-compress, rescale to [0, 1], and apply the bass-emphasis weight curve.
///
/// A flat spectrum (range below the floor, i.e. silence) yields all zeros
/// outright instead of letting the floored divisor scale noise up.
fn shape_levels(levels: &mut [f32]) {
    for v in levels.iter_mut() {
        *v = (*v + EPS).log10();
    }
    let min = levels.iter().copied().fold(f32::INFINITY, f32::min);
    let max = levels.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if !(range > RANGE_FLOOR) {
        levels.fill(0.0);
        return;
    }
    let n = levels.len();
    for (i, v) in levels.iter_mut().enumerate() {
        *v = (((*v - min) / range) * band_weight(i, n)).clamp(0.0, 1.0);
    }
}

/// Linearly descending weight from `WEIGHT_LOW` (band 0) to `WEIGHT_HIGH`.
fn band_weight(i: usize, bands: usize) -> f32 {
    if bands < 2 {
        return WEIGHT_LOW;
    }
    WEIGHT_LOW + (WEIGHT_HIGH - WEIGHT_LOW) * (i as f32 / (bands - 1) as f32)
}

fn hann_window(size: usize) -> Vec<f32> {
    let den = (size.max(2) - 1) as f32;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / den).cos()))
        .collect()
}
