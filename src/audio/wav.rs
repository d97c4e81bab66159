//! In-memory WAV encoding for the recognition upload.
//!
//! The recognition service takes a standard RIFF/WAVE container; captured
//! `f32` samples are written as 16-bit PCM via `hound`.

use std::io::Cursor;

use thiserror::Error;

/// Errors from WAV encoding.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("WAV encoding failed: {0}")]
    Encode(#[from] hound::Error),
}

/// Encode mono `f32` samples in `[-1.0, 1.0]` as a 16-bit PCM WAV file in
/// memory.
///
/// Samples outside the unit range are clamped before quantisation.
pub fn encode_wav_mono16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, WavError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            let quantised = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(quantised)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
