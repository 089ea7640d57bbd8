use serde::Serialize;

/// One chunk's transcription outcome.
///
/// `tokens` and `timestamps` are co-indexed: index `i` in `tokens`
/// corresponds to index `i` in `timestamps` when present. The arrays are not
/// guaranteed to be the same length; consumers must stop at the shorter one.
/// Timestamps are seconds relative to the chunk's own start.
///
/// Built once by the orchestrator after a successful recognition call and
/// immutable thereafter; the ordered collection of chunk results for a file
/// is the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkResult {
    /// Absolute start of the chunk window, in seconds.
    pub start_time: f64,
    /// Absolute end of the chunk window, in seconds.
    pub end_time: f64,
    /// The chunk's transcript text.
    pub text: String,
    /// Per-token offsets in seconds relative to `start_time`.
    pub timestamps: Vec<f32>,
    /// The token texts, co-indexed with `timestamps`.
    pub tokens: Vec<String>,
}
