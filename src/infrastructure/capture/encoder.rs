//! Raw PCM to container encoder
//!
//! A pure transform applied once, when capture stops:
//! - resample mono i16 PCM from the device rate to the target rate
//! - write it as 16-bit mono WAV (hound) or FLAC (flacenc)

use std::io::Cursor;

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use rubato::{FftFixedIn, Resampler};

use crate::domain::audio::{AudioBlob, AudioFormat};

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: u16 = 16;

/// Number of channels (mono)
const CHANNELS: u16 = 1;

/// Resampler chunk size in frames
const RESAMPLE_CHUNK: usize = 1024;

/// Encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("No audio samples to encode")]
    Empty,

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("WAV encoding failed: {0}")]
    Wav(String),

    #[error("FLAC encoding failed: {0}")]
    Flac(String),
}

/// Encode captured samples into a blob at `target_rate`.
///
/// Input: mono i16 samples at `source_rate`.
pub fn encode(
    samples: &[i16],
    source_rate: u32,
    format: AudioFormat,
    target_rate: u32,
) -> Result<AudioBlob, EncodingError> {
    if samples.is_empty() {
        return Err(EncodingError::Empty);
    }
    if source_rate == 0 {
        return Err(EncodingError::InvalidSampleRate(source_rate));
    }
    if target_rate == 0 {
        return Err(EncodingError::InvalidSampleRate(target_rate));
    }

    let resampled = resample(samples, source_rate, target_rate)?;
    let data = match format {
        AudioFormat::Wav => encode_wav(&resampled, target_rate)?,
        AudioFormat::Flac => encode_flac(&resampled, target_rate)?,
    };

    Ok(AudioBlob::new(data, format, target_rate))
}

/// Resample mono i16 audio between rates. Identity when the rates match.
///
/// The resampler's output delay is trimmed from the front and made up by
/// feeding silence at the end, so output sample `n` lines up with input
/// time `n / target_rate`.
pub fn resample(samples: &[i16], source_rate: u32, target_rate: u32) -> Result<Vec<i16>, EncodingError> {
    if source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let input: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (input.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        RESAMPLE_CHUNK,
        2, // Sub-chunks
        CHANNELS as usize,
    )
    .map_err(|e| EncodingError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();
    let wanted = delay + output_len;
    let mut output = Vec::with_capacity(wanted + RESAMPLE_CHUNK);
    let mut pos = 0;

    while output.len() < wanted {
        let needed = resampler.input_frames_next();
        let start = pos.min(input.len());
        let end = (pos + needed).min(input.len());

        let mut chunk = input[start..end].to_vec();
        chunk.resize(needed, 0.0);
        let frames = vec![chunk];

        let processed = resampler
            .process(&frames, None)
            .map_err(|e| EncodingError::Resample(e.to_string()))?;

        output.extend(
            processed[0]
                .iter()
                .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
        );
        pos += needed;
    }

    output.drain(..delay);
    output.truncate(output_len);
    Ok(output)
}

fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let spec = hound::WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| EncodingError::Wav(e.to_string()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| EncodingError::Wav(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| EncodingError::Wav(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

fn encode_flac(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    // flacenc works on i32 samples
    let samples_i32: Vec<i32> = samples.iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::Flac(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        CHANNELS as usize,
        BITS_PER_SAMPLE as usize,
        sample_rate as usize,
    );

    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Flac(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Flac(e.to_string()))?;

    Ok(sink.into_inner())
}
