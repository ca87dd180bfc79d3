use thiserror::Error;

/// Invalid static configuration. Surfaced once at construction, never per tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("band count must be at least 1")]
    NoBands,

    #[error("analysis window must be at least 1 ms")]
    EmptyWindow,

    #[error("frequency range is empty: {min_hz} Hz .. {max_hz} Hz")]
    BadFrequencyRange { min_hz: f32, max_hz: f32 },

    #[error("sample rate ceiling must be positive")]
    ZeroSampleRateCeiling,

    #[error("smoothing factor must be in (0, 1], got {0}")]
    BadSmoothing(f32),
}

/// Why no band levels were produced for a tick.
///
/// All variants are recoverable: the caller skips the tick and asks again on
/// the next one. None of these should ever abort playback or the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelsGap {
    /// No track is loaded, or the last decode failed.
    #[error("no decoded audio available")]
    NoTrack,

    /// The requested position lies past the end of the decoded buffer.
    #[error("position past end of track")]
    PastEnd,

    /// Fewer samples at the position than the minimum the FFT needs.
    #[error("window too short to analyze")]
    WindowTooShort,
}
