use std::io::Write;

use serde::Serialize;

use crate::chunk::ChunkResult;
use crate::output::full_text;
use crate::Result;

/// The JSON document shape.
///
/// `chunks` counts chunk results, not cues. `chunk_data` carries the full
/// per-chunk records and is omitted entirely when no chunk survived.
#[derive(Serialize)]
struct TranscriptDoc<'a> {
    duration_seconds: f64,
    chunks: usize,
    text: String,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    chunk_data: &'a [ChunkResult],
}

/// Render the transcript as pretty-printed JSON (2-space indentation) with a
/// trailing newline.
pub fn write_json(
    out: &mut dyn Write,
    results: &[ChunkResult],
    duration_seconds: f64,
) -> Result<()> {
    let doc = TranscriptDoc {
        duration_seconds,
        chunks: results.len(),
        text: full_text(results),
        chunk_data: results,
    };

    serde_json::to_writer_pretty(&mut *out, &doc)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(start: f64, end: f64, text: &str) -> ChunkResult {
        ChunkResult {
            start_time: start,
            end_time: end,
            text: text.to_owned(),
            timestamps: vec![0.5, 1.5],
            tokens: vec!["a".to_owned(), "b".to_owned()],
        }
    }

    #[test]
    fn json_document_matches_the_text_renderer_and_counts_chunks() -> anyhow::Result<()> {
        let results = vec![chunk(0.0, 60.0, "hello there"), chunk(60.0, 125.0, "again")];
        let mut out = Vec::new();
        write_json(&mut out, &results, 125.0)?;

        let parsed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(parsed["duration_seconds"], 125.0);
        assert_eq!(parsed["chunks"], 2);
        assert_eq!(parsed["text"], "hello there again");

        let chunk_data = parsed["chunk_data"].as_array().expect("chunk_data array");
        assert_eq!(chunk_data.len(), 2);
        assert_eq!(chunk_data[0]["start_time"], 0.0);
        assert_eq!(chunk_data[0]["end_time"], 60.0);
        assert_eq!(chunk_data[1]["text"], "again");
        assert_eq!(chunk_data[1]["tokens"][0], "a");
        Ok(())
    }

    #[test]
    fn json_omits_chunk_data_when_no_chunk_survived() -> anyhow::Result<()> {
        let mut out = Vec::new();
        write_json(&mut out, &[], 42.5)?;

        let parsed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(parsed["chunks"], 0);
        assert_eq!(parsed["text"], "");
        assert!(parsed.get("chunk_data").is_none());
        Ok(())
    }

    #[test]
    fn json_is_pretty_printed_with_two_space_indentation() -> anyhow::Result<()> {
        let mut out = Vec::new();
        write_json(&mut out, &[chunk(0.0, 1.0, "x")], 1.0)?;
        let s = std::str::from_utf8(&out)?;
        assert!(s.starts_with("{\n  \"duration_seconds\""));
        assert!(s.ends_with("}\n"));
        Ok(())
    }
}
