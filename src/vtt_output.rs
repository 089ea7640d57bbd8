use std::io::Write;

use crate::chunk::ChunkResult;
use crate::cue::segment_cues;
use crate::Result;

/// Render the transcript as WebVTT.
///
/// Every chunk's cues are shifted from chunk-relative to absolute time and
/// numbered with a single counter across the whole transcript; numbering is
/// never reset per chunk. Cues whose text trims to nothing (a silent chunk's
/// fallback cue) are skipped here and never consume an index.
pub fn write_vtt(out: &mut dyn Write, results: &[ChunkResult]) -> Result<()> {
    out.write_all(b"WEBVTT\n\n")?;

    let mut cue_number = 1usize;
    for result in results {
        for cue in segment_cues(result) {
            if cue.text.trim().is_empty() {
                continue;
            }

            let start = result.start_time + cue.start;
            let end = result.start_time + cue.end;

            writeln!(out, "{cue_number}")?;
            writeln!(
                out,
                "{} --> {}",
                format_vtt_timestamp(start),
                format_vtt_timestamp(end)
            )?;
            writeln!(out, "{}", cue.text)?;
            writeln!(out)?;

            cue_number += 1;
        }
    }

    Ok(())
}

/// Format seconds as a WebVTT timestamp (`HH:MM:SS.mmm`), rounding to the
/// nearest millisecond.
fn format_vtt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}
