//! Built-in recognizer powered by `whisper-rs` / `whisper.cpp`.

use std::os::raw::{c_char, c_void};
use std::sync::Once;

use anyhow::Context as _;
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
};

use crate::recognizer::{Recognition, Recognizer};
use crate::{Error, Result};

/// The only sample rate whisper.cpp accepts.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// A loaded whisper.cpp model.
///
/// The context is the expensive part and is created once per invocation; each
/// `recognize` call gets its own short-lived inference state. The native
/// resources are released when this value drops.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
}

impl WhisperRecognizer {
    /// Load a whisper.cpp model from disk.
    pub fn new(model_path: &str) -> Result<Self> {
        // Whisper can be very chatty; keep it quiet by default.
        silence_whisper_logs();

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(model_path, ctx_params).map_err(|err| {
            Error::setup(format!("failed to load model from '{model_path}': {err}"))
        })?;

        Ok(Self { ctx })
    }

    /// Access the underlying Whisper context.
    ///
    /// This is primarily intended for advanced or experimental use-cases.
    pub fn context(&self) -> &WhisperContext {
        &self.ctx
    }
}

impl Recognizer for WhisperRecognizer {
    fn recognize(&mut self, samples: &[f32], sample_rate: u32) -> Result<Recognition> {
        if sample_rate != WHISPER_SAMPLE_RATE {
            return Err(Error::Recognition(format!(
                "expected {WHISPER_SAMPLE_RATE} Hz audio, got {sample_rate} Hz"
            )));
        }

        run_full(&self.ctx, samples).map_err(|err| Error::Recognition(format!("{err:#}")))
    }
}

fn run_full(ctx: &WhisperContext, samples: &[f32]) -> anyhow::Result<Recognition> {
    let params = build_full_params();

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;
    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    collect_recognition(&mut state)
}

fn build_full_params() -> FullParams<'static, 'static> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });

    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(false);
    params.set_language(None);
    params.set_no_context(true);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    params.set_token_timestamps(true);

    params
}

fn collect_recognition(state: &mut WhisperState) -> anyhow::Result<Recognition> {
    let mut recognition = Recognition::default();

    for segment in state.as_iter() {
        let text = segment
            .to_str()
            .context("failed to get segment text")?
            .to_owned();
        recognition.text.push_str(&text);

        let token_count = segment.n_tokens();
        let token_count = usize::try_from(token_count)
            .with_context(|| format!("segment reported negative token count: {token_count}"))?;

        for token_idx in 0..token_count {
            let token = segment
                .get_token(token_idx as i32)
                .context("failed to get token from segment")?;

            let text = token
                .to_str()
                .with_context(|| format!("failed to get token text at index {token_idx}"))?
                .to_owned();

            // Whisper's special/control tokens (e.g. `[_BEG_]`, `[_TT_50]`)
            // carry no speech and would pollute cue text.
            if text.starts_with("[_") && text.ends_with("_]") {
                continue;
            }

            let data = token.token_data();
            recognition.tokens.push(text);
            recognition.timestamps.push(centiseconds_to_seconds(data.t0));
        }
    }

    Ok(recognition)
}

/// Convert whisper's centisecond timestamps to seconds.
///
/// Whisper uses -1 for unknown; clamp to 0 so consumers don't see -0.01s.
fn centiseconds_to_seconds(value: i64) -> f32 {
    if value < 0 { 0.0 } else { value as f32 / 100.0 }
}

/// A no-op log callback used to silence logs emitted by whisper.cpp.
unsafe extern "C" fn whisper_log_callback(
    _level: u32,
    _c_msg: *const c_char,
    _user_data: *mut c_void,
) {
    // Intentionally left empty.
}

/// Ensure whisper logging is configured exactly once for the lifetime of the process.
fn silence_whisper_logs() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    });
}
