//! Channel mixing and resampling for the recognition upload.
//!
//! The recognition service expects **16 kHz mono `f32`** audio, while the
//! capture device delivers whatever its native format is. Two conversion
//! steps:
//!
//! 1. [`stereo_to_mono`] — average interleaved channels down to one.
//! 2. [`resample_to_16k`] — linear-interpolation resample to 16 000 Hz.
//!
//! The resampler is deliberately simple; `rubato` (`SincFixedIn`) is the
//! listed upgrade path if recognition quality ever suffers from the
//! interpolation.

/// Target rate for recognition uploads.
pub const RECOGNITION_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging channels.
///
/// Output length is `samples.len() / channels`. Mono input is returned as an
/// owned copy; zero channels yield an empty vector.
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample_to_16k
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to [`RECOGNITION_RATE`]
/// using linear interpolation.
///
/// Already-16 kHz input is returned unchanged; empty input yields an empty
/// vector. Output length is approximately
/// `samples.len() * 16_000 / source_rate`.
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if source_rate == RECOGNITION_RATE {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = RECOGNITION_RATE as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos as usize;
            let frac = (src_pos - idx as f64) as f32;

            match (samples.get(idx), samples.get(idx + 1)) {
                (Some(&a), Some(&b)) => a * (1.0 - frac) + b * frac,
                (Some(&a), None) => a,
                _ => 0.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
