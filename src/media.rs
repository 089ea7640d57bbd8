//! The external media collaborators: ffprobe for durations, ffmpeg for
//! cutting a time window out of the source as a mono 16 kHz PCM WAV.
//!
//! Both run as subprocesses. Their diagnostic output is attached to the
//! errors we raise so a failed window is debuggable from the progress line.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::{Error, Result};

/// Produces a mono/16 kHz/16-bit PCM WAV for a `[start, start+duration)`
/// window of a source file.
///
/// This is a seam: the orchestrator only depends on the contract, so tests
/// substitute an implementation that writes synthetic containers.
pub trait Extractor {
    fn extract(&self, source: &Path, start: f64, duration: f64, dest: &Path) -> Result<()>;
}

/// The real extractor, shelling out to ffmpeg.
#[derive(Debug, Default)]
pub struct FfmpegExtractor;

impl Extractor for FfmpegExtractor {
    fn extract(&self, source: &Path, start: f64, duration: f64, dest: &Path) -> Result<()> {
        debug!(?source, start, duration, "extracting chunk with ffmpeg");

        let output = Command::new("ffmpeg")
            .arg("-ss")
            .arg(format!("{start:.3}"))
            .arg("-t")
            .arg(format!("{duration:.3}"))
            .arg("-i")
            .arg(source)
            .arg("-vn")
            .arg("-ar")
            .arg("16000")
            .arg("-ac")
            .arg("1")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-y")
            .arg(dest)
            .output()
            .map_err(|err| Error::Extraction(format!("failed to run ffmpeg: {err}")))?;

        if !output.status.success() {
            // ffmpeg writes its diagnostics to stderr.
            return Err(Error::Extraction(format!(
                "ffmpeg: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

/// Probe the total duration of a media file, in seconds.
///
/// A probe failure is fatal to the run; without a duration there is nothing
/// to plan boundaries over.
pub fn probe_duration(source: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(source)
        .output()
        .map_err(|err| Error::setup(format!("failed to run ffprobe: {err}")))?;

    if !output.status.success() {
        return Err(Error::setup(format!(
            "ffprobe: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration = stdout
        .trim()
        .parse::<f64>()
        .map_err(|err| Error::setup(format!("unparsable ffprobe duration {stdout:?}: {err}")))?;

    debug!(?source, duration, "probed duration");
    Ok(duration)
}
