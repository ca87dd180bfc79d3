//! End-to-end tests: synthesize a WAV on disk, decode it through symphonia,
//! and drive the analyzer and feed the way a player UI would.

use std::f32::consts::PI;
use std::io::Write;
use std::path::PathBuf;

use ampviz::{band_edges, decode_audio, AnalyzerConfig, Config, LevelFeed, SpectrumAnalyzer};

/// Write a 16-bit PCM WAV file and return its path.
fn write_wav(name: &str, channels: u16, sample_rate: u32, interleaved: &[i16]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ampviz_test_{}_{}", std::process::id(), name));
    let data_len = (interleaved.len() * 2) as u32;
    let byte_rate = sample_rate * channels as u32 * 2;
    let block_align = channels * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for &s in interleaved {
        bytes.extend_from_slice(&s.to_le_bytes());
    }

    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&bytes).unwrap();
    path
}

fn sine_i16(freq: f32, sample_rate: u32, secs: f32, amp: f32) -> Vec<i16> {
    let n = (sample_rate as f32 * secs) as usize;
    (0..n)
        .map(|i| {
            let v = amp * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin();
            (v * i16::MAX as f32) as i16
        })
        .collect()
}

fn argmax(levels: &[f32]) -> usize {
    levels
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap()
        .0
}

#[test]
fn decode_and_analyze_440hz_tone() {
    let _ = env_logger::builder().is_test(true).try_init();

    let samples = sine_i16(440.0, 44_100, 2.0, 0.8);
    let path = write_wav("tone440.wav", 1, 44_100, &samples);

    let cfg = AnalyzerConfig::default();
    let mut analyzer = SpectrumAnalyzer::new(cfg.clone()).unwrap();
    analyzer.set_track(&path);
    assert!(analyzer.has_track());

    let levels = analyzer.levels_at_ms(500).expect("levels for a live position");
    assert_eq!(levels.len(), cfg.bands);
    for &v in &levels {
        assert!((0.0..=1.0).contains(&v));
    }

    let edges = band_edges(cfg.min_hz, cfg.max_hz.min(22_050.0), cfg.bands);
    let expected = edges
        .windows(2)
        .position(|e| e[0] <= 440.0 && 440.0 < e[1])
        .unwrap();
    assert_eq!(argmax(&levels), expected);

    std::fs::remove_file(path).ok();
}

#[test]
fn stereo_source_downmixes_to_mono() {
    let rate = 44_100;
    let frames = rate as usize / 2;
    // Left: 440 Hz tone, right: silence. The mono mix halves the amplitude
    // but keeps the tone.
    let left = sine_i16(440.0, rate, 0.5, 0.8);
    let mut interleaved = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        interleaved.push(left[i]);
        interleaved.push(0);
    }
    let path = write_wav("stereo.wav", 2, rate, &interleaved);

    let audio = decode_audio(&path, 44_100).unwrap();
    assert_eq!(audio.sample_rate, rate);
    assert_eq!(audio.samples.len(), frames);
    let peak = audio.samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    assert!(peak > 0.3 && peak < 0.5, "downmix should halve the peak, got {}", peak);

    std::fs::remove_file(path).ok();
}

#[test]
fn high_rate_source_is_resampled_to_the_ceiling() {
    let samples = sine_i16(440.0, 48_000, 1.0, 0.8);
    let path = write_wav("tone48k.wav", 1, 48_000, &samples);

    let audio = decode_audio(&path, 44_100).unwrap();
    assert_eq!(audio.sample_rate, 44_100);
    let expected = 48_000.0 * 44_100.0 / 48_000.0;
    assert!((audio.samples.len() as f64 - expected).abs() < 8_192.0);

    // The tone must still land in the same band after resampling.
    let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.set_audio(audio);
    let levels = analyzer.levels_at_ms(400).unwrap();
    let edges = band_edges(20.0, 20_000.0, 20);
    let expected_band = edges
        .windows(2)
        .position(|e| e[0] <= 440.0 && 440.0 < e[1])
        .unwrap();
    assert_eq!(argmax(&levels), expected_band);

    std::fs::remove_file(path).ok();
}

#[test]
fn missing_file_degrades_to_no_levels() {
    let path = PathBuf::from("/nonexistent/ampviz/no_such_track.mp3");
    assert!(decode_audio(&path, 44_100).is_err());

    let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.set_track(&path);
    assert!(!analyzer.has_track());
    assert_eq!(analyzer.levels_at_ms(0), None);
}

#[test]
fn corrupt_file_degrades_to_no_levels() {
    let path = std::env::temp_dir().join(format!("ampviz_test_{}_garbage.wav", std::process::id()));
    std::fs::write(&path, b"not really a wav file at all").unwrap();

    let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
    analyzer.set_track(&path);
    assert!(!analyzer.has_track());
    assert_eq!(analyzer.levels_at_ms(0), None);

    std::fs::remove_file(path).ok();
}

#[test]
fn feed_follows_a_real_track_end_to_end() {
    let samples = sine_i16(440.0, 44_100, 2.0, 0.8);
    let path = write_wav("feed440.wav", 1, 44_100, &samples);

    let mut feed = LevelFeed::with_seed(Config::default(), 7).unwrap();
    feed.set_track(&path);

    // Simulate the fast timer walking through playback.
    let mut saw_motion = false;
    let mut prev = feed.levels().to_vec();
    for pos in (0..1_000).step_by(50) {
        let levels = feed.tick(pos, true);
        assert_eq!(levels.len(), 20);
        for &v in levels {
            assert!((0.0..=100.0).contains(&v));
        }
        if levels != &prev[..] {
            saw_motion = true;
        }
        prev = levels.to_vec();
    }
    assert!(saw_motion, "a playing tone should move the bars");

    // End of track: the fast tick stops producing data, idle takes over.
    feed.tick(10_000, true);
    let before = feed.levels().to_vec();
    feed.idle_tick();
    assert_ne!(feed.levels(), &before[..]);

    std::fs::remove_file(path).ok();
}
