//! Orchestration tests with fake collaborators: a recording extractor that
//! writes synthetic WAVs and a scripted recognizer. No ffmpeg or model files
//! are involved.

use std::cell::RefCell;
use std::path::Path;

use jackdaw::boundaries::plan_boundaries;
use jackdaw::chunk::ChunkResult;
use jackdaw::media::Extractor;
use jackdaw::output::write_transcript;
use jackdaw::output_format::OutputFormat;
use jackdaw::pipeline::Transcriber;
use jackdaw::progress::ProgressSink;
use jackdaw::recognizer::{Recognition, Recognizer};
use jackdaw::{Error, Result};

/// Writes a valid mono/16 kHz/16-bit WAV for every requested window and
/// records the windows it was asked for.
struct FakeExtractor {
    calls: RefCell<Vec<(f64, f64)>>,
    /// Windows (by call index) that should produce a corrupt container.
    corrupt_calls: Vec<usize>,
}

impl FakeExtractor {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            corrupt_calls: Vec::new(),
        }
    }

    fn with_corrupt_call(index: usize) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            corrupt_calls: vec![index],
        }
    }

    fn calls(&self) -> Vec<(f64, f64)> {
        self.calls.borrow().clone()
    }
}

impl Extractor for FakeExtractor {
    fn extract(&self, _source: &Path, start: f64, duration: f64, dest: &Path) -> Result<()> {
        let call_index = self.calls.borrow().len();
        self.calls.borrow_mut().push((start, duration));

        if self.corrupt_calls.contains(&call_index) {
            std::fs::write(dest, b"definitely not a WAV container")?;
            return Ok(());
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dest, spec).expect("create fixture WAV");
        // A handful of samples is plenty; the fake recognizer never looks.
        for s in [0i16, 1000, -1000, 0] {
            writer.write_sample(s).expect("write fixture sample");
        }
        writer.finalize().expect("finalize fixture WAV");
        Ok(())
    }
}

/// Returns scripted texts in order; errors on the call indices it's told to.
struct FakeRecognizer {
    texts: Vec<&'static str>,
    fail_calls: Vec<usize>,
    calls: usize,
}

impl FakeRecognizer {
    fn new(texts: &[&'static str]) -> Self {
        Self {
            texts: texts.to_vec(),
            fail_calls: Vec::new(),
            calls: 0,
        }
    }

    fn failing_on(mut self, index: usize) -> Self {
        self.fail_calls.push(index);
        self
    }
}

impl Recognizer for FakeRecognizer {
    fn recognize(&mut self, samples: &[f32], sample_rate: u32) -> Result<Recognition> {
        assert_eq!(sample_rate, 16_000);
        assert!(!samples.is_empty());

        let call = self.calls;
        self.calls += 1;

        if self.fail_calls.contains(&call) {
            return Err(Error::Recognition("scripted failure".into()));
        }

        Ok(Recognition {
            text: self.texts[call].to_owned(),
            tokens: vec![self.texts[call].to_owned()],
            timestamps: vec![0.0],
        })
    }
}

/// Records every progress callback.
#[derive(Default)]
struct RecordingProgress {
    chunks: Vec<(usize, usize)>,
    errors: Vec<String>,
    done: bool,
}

impl ProgressSink for RecordingProgress {
    fn on_chunk(&mut self, current: usize, total: usize, _eta_seconds: f64) {
        self.chunks.push((current, total));
    }

    fn on_chunk_error(&mut self, _c: usize, _t: usize, _elapsed: f64, err: &Error) {
        self.errors.push(err.to_string());
    }

    fn on_done(&mut self, _total: usize) {
        self.done = true;
    }
}

fn starts(results: &[ChunkResult]) -> Vec<f64> {
    results.iter().map(|r| r.start_time).collect()
}

#[test]
fn sub_floor_windows_are_never_extracted() {
    let extractor = FakeExtractor::new();
    let mut progress = RecordingProgress::default();
    let mut transcriber = Transcriber::new(FakeRecognizer::new(&["only chunk"]));

    // The trailing 0.2s window must be skipped before extraction.
    let boundaries = [0.0, 10.0, 10.2];
    let (results, _) = transcriber.transcribe(
        Path::new("input.mp3"),
        &boundaries,
        &extractor,
        &mut progress,
    );

    assert_eq!(extractor.calls(), vec![(0.0, 10.0)]);
    assert_eq!(results.len(), 1);
    assert!(progress.done);
}

#[test]
fn planned_windows_are_extracted_in_order_with_exact_spans() {
    let extractor = FakeExtractor::new();
    let mut progress = RecordingProgress::default();
    let mut transcriber = Transcriber::new(FakeRecognizer::new(&["one", "two", "three"]));

    let boundaries = plan_boundaries(125.0, 60.0);
    assert_eq!(boundaries, vec![0.0, 60.0, 120.0, 125.0]);

    let (results, _) = transcriber.transcribe(
        Path::new("input.mp3"),
        &boundaries,
        &extractor,
        &mut progress,
    );

    assert_eq!(
        extractor.calls(),
        vec![(0.0, 60.0), (60.0, 60.0), (120.0, 5.0)]
    );
    assert_eq!(starts(&results), vec![0.0, 60.0, 120.0]);
    assert_eq!(results[2].end_time, 125.0);
    assert_eq!(progress.chunks, vec![(1, 3), (2, 3), (3, 3)]);
    assert!(progress.errors.is_empty());
}

#[test]
fn recognition_failure_skips_only_that_chunk() {
    let extractor = FakeExtractor::new();
    let mut progress = RecordingProgress::default();
    let mut transcriber =
        Transcriber::new(FakeRecognizer::new(&["one", "two", "three"]).failing_on(1));

    let boundaries = plan_boundaries(125.0, 60.0);
    let (results, _) = transcriber.transcribe(
        Path::new("input.mp3"),
        &boundaries,
        &extractor,
        &mut progress,
    );

    // The failed middle chunk is missing; everything else survived in order.
    assert_eq!(starts(&results), vec![0.0, 120.0]);
    assert_eq!(results[0].text, "one");
    assert_eq!(results[1].text, "three");
    assert_eq!(progress.errors.len(), 1);
    assert!(progress.errors[0].contains("scripted failure"));
    assert!(progress.done);
}

#[test]
fn corrupt_container_skips_only_that_chunk() {
    let extractor = FakeExtractor::with_corrupt_call(0);
    let mut progress = RecordingProgress::default();
    let mut transcriber = Transcriber::new(FakeRecognizer::new(&["two", "three"]));

    let boundaries = plan_boundaries(125.0, 60.0);
    let (results, _) = transcriber.transcribe(
        Path::new("input.mp3"),
        &boundaries,
        &extractor,
        &mut progress,
    );

    assert_eq!(starts(&results), vec![60.0, 120.0]);
    assert_eq!(progress.errors.len(), 1);
    assert!(progress.errors[0].contains("not a valid WAV file"));
}

#[test]
fn extraction_failure_skips_only_that_chunk() {
    struct FailingSecond {
        inner: FakeExtractor,
    }

    impl Extractor for FailingSecond {
        fn extract(&self, source: &Path, start: f64, duration: f64, dest: &Path) -> Result<()> {
            if self.inner.calls().len() == 1 {
                self.inner.calls.borrow_mut().push((start, duration));
                return Err(Error::Extraction("ffmpeg exited with status 1".into()));
            }
            self.inner.extract(source, start, duration, dest)
        }
    }

    let extractor = FailingSecond {
        inner: FakeExtractor::new(),
    };
    let mut progress = RecordingProgress::default();
    let mut transcriber = Transcriber::new(FakeRecognizer::new(&["one", "three"]));

    let boundaries = plan_boundaries(125.0, 60.0);
    let (results, _) = transcriber.transcribe(
        Path::new("input.mp3"),
        &boundaries,
        &extractor,
        &mut progress,
    );

    assert_eq!(starts(&results), vec![0.0, 120.0]);
    assert_eq!(progress.errors.len(), 1);
    assert!(progress.errors[0].contains("extraction failed"));
}

#[test]
fn surviving_chunks_still_render_every_format() -> anyhow::Result<()> {
    let extractor = FakeExtractor::new();
    let mut progress = RecordingProgress::default();
    let mut transcriber =
        Transcriber::new(FakeRecognizer::new(&["First part.", "Second part.", "Third."]).failing_on(2));

    let boundaries = plan_boundaries(125.0, 60.0);
    let (results, _) = transcriber.transcribe(
        Path::new("input.mp3"),
        &boundaries,
        &extractor,
        &mut progress,
    );

    let mut text = Vec::new();
    write_transcript(&mut text, OutputFormat::Text, &results, 125.0)?;
    assert_eq!(std::str::from_utf8(&text)?, "First part. Second part.\n");

    let mut json = Vec::new();
    write_transcript(&mut json, OutputFormat::Json, &results, 125.0)?;
    let parsed: serde_json::Value = serde_json::from_slice(&json)?;
    assert_eq!(parsed["chunks"], 2);
    assert_eq!(parsed["duration_seconds"], 125.0);
    assert_eq!(parsed["text"], "First part. Second part.");

    let mut vtt = Vec::new();
    write_transcript(&mut vtt, OutputFormat::Vtt, &results, 125.0)?;
    let vtt = std::str::from_utf8(&vtt)?;
    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert!(vtt.contains("1\n00:00:00.000 --> 00:00:00.000\nFirst part.\n\n"));
    assert!(vtt.contains("2\n00:01:00.000 --> 00:01:00.000\nSecond part.\n\n"));
    Ok(())
}
