//! `jackdaw` — chunked transcription of long-form audio.
//!
//! This crate provides:
//! - Chunk-boundary planning over a probed total duration
//! - A minimal mono 16-bit PCM WAV decoder (no audio-library dependency)
//! - A sequential extract → decode → recognize orchestration loop with
//!   per-chunk failure isolation and live progress/ETA reporting
//! - Token-timestamp cue segmentation feeding text, JSON, and WebVTT output
//!
//! The heavy lifting at the edges stays external: ffmpeg/ffprobe handle
//! extraction and duration probing, and speech recognition sits behind the
//! [`recognizer::Recognizer`] trait (whisper.cpp built in).

// Orchestration (most consumers should start here).
pub mod pipeline;

// Chunk planning and the per-chunk data model.
pub mod boundaries;
pub mod chunk;

// Audio container decoding.
pub mod wav;

// External collaborators: ffmpeg/ffprobe and the recognizer seam.
pub mod backends;
pub mod media;
pub mod recognizer;

// Cue segmentation and output rendering.
pub mod cue;
pub mod json_output;
pub mod output;
pub mod output_format;
pub mod vtt_output;

// Progress reporting.
pub mod progress;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use error::{Error, Result};
