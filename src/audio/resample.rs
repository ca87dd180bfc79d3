use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const CHUNK_SIZE: usize = 1024;

/// Resample a mono channel from `from_rate` to `to_rate` with sinc
/// interpolation. Returns the input unchanged when the rates already match.
pub fn resample_mono(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
        .context("Failed to create resampler")?;

    let expected = (samples.len() as f64 * ratio).ceil() as usize + CHUNK_SIZE;
    let mut output = Vec::with_capacity(expected);

    let mut pos = 0;
    while pos + CHUNK_SIZE <= samples.len() {
        let chunk = &samples[pos..pos + CHUNK_SIZE];
        let result = resampler
            .process(&[chunk], None)
            .context("Resampler failed on chunk")?;
        output.extend_from_slice(&result[0]);
        pos += CHUNK_SIZE;
    }

    // Tail shorter than a chunk, then flush the resampler's internal delay.
    if pos < samples.len() {
        let result = resampler
            .process_partial(Some(&[&samples[pos..]]), None)
            .context("Resampler failed on tail")?;
        output.extend_from_slice(&result[0]);
    } else {
        let result = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .context("Resampler failed on flush")?;
        output.extend_from_slice(&result[0]);
    }

    Ok(output)
}
