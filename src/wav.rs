//! A minimal WAV container decoder for the chunks ffmpeg hands us.
//!
//! We only ever see one shape of input here: mono, 16-bit signed PCM, written
//! by our own extraction call. Walking the RIFF chunk list by hand keeps this
//! crate free of a general-purpose audio dependency and free of any native
//! buffer ownership; the decoded samples are a plain `Vec<f32>`.
//!
//! The walk is chunk-typed rather than offset-based because ffmpeg (and other
//! writers) may place auxiliary chunks such as `LIST` before `data`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

/// Decoded audio data: normalized mono samples plus their sample rate.
///
/// Samples are in `[-1.0, 1.0]`; for 16-bit mono PCM, `samples.len()` equals
/// half the byte length of the container's data chunk.
#[derive(Debug, Clone)]
pub struct Wave {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// A structural problem with a WAV container.
///
/// Each variant identifies which check failed so callers (and error output)
/// can tell a truncated file from an unsupported encoding.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("not a valid WAV file (no RIFF header), got: {}", String::from_utf8_lossy(.0))]
    MissingRiffHeader([u8; 4]),

    #[error("not a valid WAV file (no WAVE format), got: {}", String::from_utf8_lossy(.0))]
    MissingWaveMarker([u8; 4]),

    #[error("unsupported audio format: {0} (only PCM supported)")]
    UnsupportedAudioFormat(u16),

    #[error("unsupported number of channels: {0} (only mono supported)")]
    UnsupportedChannelCount(u16),

    #[error("unsupported bits per sample: {0} (only 16-bit supported)")]
    UnsupportedBitsPerSample(u16),

    #[error("fmt chunk too short: {0} bytes")]
    FmtChunkTooShort(u32),

    #[error("no data chunk found in WAV file")]
    MissingDataChunk,

    #[error("failed to read {0}")]
    Io(&'static str, #[source] std::io::Error),
}

/// PCM format tag in the `fmt ` chunk.
const WAVE_FORMAT_PCM: u16 = 1;

/// Open and decode a WAV file from disk.
pub fn read_wave(path: impl AsRef<Path>) -> Result<Wave, FormatError> {
    let file = File::open(path.as_ref()).map_err(|err| FormatError::Io("WAV file", err))?;
    decode_wave(BufReader::new(file))
}

/// Decode a WAV container from any byte stream.
///
/// The scan reads the outer RIFF/WAVE markers, then dispatches on each
/// sub-chunk identifier:
/// - `fmt ` is validated (PCM, mono, 16-bit) and its sample rate recorded,
/// - `data` is decoded and returned immediately (nothing after it is read),
/// - anything else is skipped by its declared length.
pub fn decode_wave<R: Read>(mut r: R) -> Result<Wave, FormatError> {
    let mut riff_header = [0u8; 12];
    r.read_exact(&mut riff_header)
        .map_err(|err| FormatError::Io("RIFF header", err))?;

    if &riff_header[0..4] != b"RIFF" {
        return Err(FormatError::MissingRiffHeader(four(&riff_header[0..4])));
    }
    if &riff_header[8..12] != b"WAVE" {
        return Err(FormatError::MissingWaveMarker(four(&riff_header[8..12])));
    }

    // Zero until we see a `fmt ` chunk. We deliberately don't require `fmt `
    // to precede `data`; a file with `data` first is malformed in other ways
    // the recognizer will reject, not something we guess about here.
    let mut sample_rate: u32 = 0;

    loop {
        let mut chunk_header = [0u8; 8];
        match r.read_exact(&mut chunk_header) {
            Ok(()) => {}
            // Clean or ragged end of input: the data chunk never showed up.
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(FormatError::MissingDataChunk);
            }
            Err(err) => return Err(FormatError::Io("chunk header", err)),
        }

        let chunk_len = u32::from_le_bytes(four(&chunk_header[4..8]));

        match &chunk_header[0..4] {
            b"fmt " => sample_rate = parse_fmt_chunk(&mut r, chunk_len)?,
            b"data" => return read_samples(&mut r, sample_rate, chunk_len),
            // LIST, INFO, fact, ... — skip without interpretation.
            _ => {
                let skipped = std::io::copy(&mut (&mut r).take(chunk_len as u64), &mut std::io::sink())
                    .map_err(|err| FormatError::Io("chunk body", err))?;
                if skipped < chunk_len as u64 {
                    return Err(FormatError::MissingDataChunk);
                }
            }
        }
    }
}

/// Validate the format-description chunk and return the sample rate.
fn parse_fmt_chunk<R: Read>(r: &mut R, chunk_len: u32) -> Result<u32, FormatError> {
    // PCM fmt chunks are at least 16 bytes; extensions may make them longer.
    if chunk_len < 16 {
        return Err(FormatError::FmtChunkTooShort(chunk_len));
    }

    let mut fmt_data = vec![0u8; chunk_len as usize];
    r.read_exact(&mut fmt_data)
        .map_err(|err| FormatError::Io("fmt chunk", err))?;

    let audio_format = u16::from_le_bytes([fmt_data[0], fmt_data[1]]);
    if audio_format != WAVE_FORMAT_PCM {
        return Err(FormatError::UnsupportedAudioFormat(audio_format));
    }

    let channels = u16::from_le_bytes([fmt_data[2], fmt_data[3]]);
    let sample_rate = u32::from_le_bytes(four(&fmt_data[4..8]));
    // Byte rate (8..12) and block align (12..14) are derived fields; skipped.
    let bits_per_sample = u16::from_le_bytes([fmt_data[14], fmt_data[15]]);

    if channels != 1 {
        return Err(FormatError::UnsupportedChannelCount(channels));
    }
    if bits_per_sample != 16 {
        return Err(FormatError::UnsupportedBitsPerSample(bits_per_sample));
    }

    Ok(sample_rate)
}

/// Read the audio-data chunk and normalize i16 PCM into `[-1.0, 1.0]`.
fn read_samples<R: Read>(r: &mut R, sample_rate: u32, data_len: u32) -> Result<Wave, FormatError> {
    let mut data = vec![0u8; data_len as usize];
    r.read_exact(&mut data)
        .map_err(|err| FormatError::Io("audio data", err))?;

    let samples = data
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    Ok(Wave {
        samples,
        sample_rate,
    })
}

fn four(bytes: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&bytes[0..4]);
    out
}
