//! The chunk-at-a-time transcription loop.
//!
//! We run strictly sequentially: one extraction, one decode, one recognition
//! call at a time, in planned boundary order. That keeps results sorted by
//! start time with nothing to reason about, and it matches how the recognizer
//! handle must be used (sequential, exclusive).
//!
//! A chunk that fails — extraction, decode, or recognition — is reported
//! through the progress sink and skipped; it never aborts the run. Whole-run
//! failures only happen before this loop starts.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::boundaries::MIN_WINDOW_SECONDS;
use crate::chunk::ChunkResult;
use crate::media::Extractor;
use crate::progress::ProgressSink;
use crate::recognizer::{Recognition, Recognizer};
use crate::wav::read_wave;
use crate::Result;

/// Filename of the per-chunk scratch WAV inside its temp directory.
const CHUNK_FILE_NAME: &str = "chunk.wav";

/// Drives extraction → decode → recognition over planned chunk windows.
///
/// Owns the recognizer handle for the duration of a run; the handle is used
/// by one chunk at a time and released when the `Transcriber` drops.
pub struct Transcriber<R: Recognizer> {
    recognizer: R,
}

impl<R: Recognizer> Transcriber<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Transcribe every window of `boundaries`, in order.
    ///
    /// Returns the surviving chunk results (non-decreasing start order) and
    /// the wall-clock time the loop took, for the realtime-factor report.
    /// Per-chunk failures surface only through `progress`.
    pub fn transcribe(
        &mut self,
        source: &Path,
        boundaries: &[f64],
        extractor: &dyn Extractor,
        progress: &mut dyn ProgressSink,
    ) -> (Vec<ChunkResult>, Duration) {
        let started = Instant::now();
        let total = boundaries.len().saturating_sub(1);
        let mut results = Vec::with_capacity(total);

        for (i, pair) in boundaries.windows(2).enumerate() {
            let (start, end) = (pair[0], pair[1]);

            // BoundaryPlanner filters most slivers, but windows derived from
            // an external duration probe can be imprecise.
            if end - start < MIN_WINDOW_SECONDS {
                debug!(start, end, "skipping sub-floor window");
                continue;
            }

            let elapsed = started.elapsed().as_secs_f64();
            let percent = (i + 1) as f64 / total as f64;
            let eta = elapsed / percent - elapsed;
            progress.on_chunk(i + 1, total, eta);

            match self.transcribe_window(source, start, end - start, extractor) {
                Ok(recognition) => results.push(ChunkResult {
                    start_time: start,
                    end_time: end,
                    text: recognition.text,
                    timestamps: recognition.timestamps,
                    tokens: recognition.tokens,
                }),
                Err(err) => {
                    warn!(start, end, %err, "chunk failed; continuing");
                    progress.on_chunk_error(i + 1, total, started.elapsed().as_secs_f64(), &err);
                }
            }
        }

        progress.on_done(total);
        (results, started.elapsed())
    }

    /// Process a single window: extract to a scratch WAV, decode, recognize.
    ///
    /// The temp directory lives exactly as long as this call; dropping it
    /// deletes the extracted artifact on success and error paths alike.
    fn transcribe_window(
        &mut self,
        source: &Path,
        start: f64,
        duration: f64,
        extractor: &dyn Extractor,
    ) -> Result<Recognition> {
        let scratch = tempfile::tempdir()?;
        let chunk_path = scratch.path().join(CHUNK_FILE_NAME);

        extractor.extract(source, start, duration, &chunk_path)?;

        let wave = read_wave(&chunk_path)?;
        self.recognizer.recognize(&wave.samples, wave.sample_rate)
    }

    /// Access the owned recognizer.
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}
