use crate::Result;

/// The output contract of a recognition call: transcript text plus a token
/// sequence with one timestamp per token, in seconds relative to the start of
/// the audio that was passed in.
///
/// `timestamps` and `tokens` are co-indexed but not guaranteed equal length;
/// downstream consumers stop at the shorter of the two.
#[derive(Debug, Clone, Default)]
pub struct Recognition {
    pub text: String,
    pub tokens: Vec<String>,
    pub timestamps: Vec<f32>,
}

/// A loaded speech-recognition engine.
///
/// The handle is created once per program invocation, used sequentially (one
/// call at a time) across all chunks, and released on drop. Everything about
/// the engine's internals (model, decoding strategy, native resources) is
/// opaque behind this trait; the built-in implementation lives in
/// [`crate::backends::whisper`].
pub trait Recognizer {
    /// Transcribe normalized mono samples at the given sample rate.
    fn recognize(&mut self, samples: &[f32], sample_rate: u32) -> Result<Recognition>;
}
