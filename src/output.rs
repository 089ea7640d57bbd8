//! Transcript rendering: format dispatch and the plain-text renderer.
//!
//! All renderers are pure functions of the ordered chunk-result sequence
//! (plus the source duration, for JSON). They write the whole document once;
//! there is no incremental/streaming encoding here because the transcript is
//! only complete after the final chunk.

use std::io::Write;

use crate::chunk::ChunkResult;
use crate::json_output::write_json;
use crate::output_format::OutputFormat;
use crate::vtt_output::write_vtt;
use crate::{Error, Result};

/// Render the transcript to `out` in the requested format.
pub fn write_transcript(
    out: &mut dyn Write,
    format: OutputFormat,
    results: &[ChunkResult],
    duration_seconds: f64,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, results),
        OutputFormat::Json => write_json(out, results, duration_seconds),
        OutputFormat::Vtt => write_vtt(out, results),
    }
}

/// All non-empty chunk texts joined by a single space, in chunk order.
pub(crate) fn full_text(results: &[ChunkResult]) -> String {
    let parts: Vec<&str> = results
        .iter()
        .map(|r| r.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect();
    parts.join(" ")
}

/// The plain-text renderer: the joined text and a trailing newline.
pub fn write_text(out: &mut dyn Write, results: &[ChunkResult]) -> Result<()> {
    writeln!(out, "{}", full_text(results)).map_err(Error::from)
}
