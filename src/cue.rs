//! Regrouping a chunk's token/timestamp arrays into subtitle cues.

use crate::chunk::ChunkResult;

/// A subtitle cue. Times are seconds relative to the chunk's own start;
/// the VTT renderer shifts them to absolute time.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A cue is closed once its span exceeds this many seconds, even mid-sentence.
const MAX_CUE_SECONDS: f64 = 5.0;

/// Regroup a chunk's tokens into cues.
///
/// This is a greedy single pass over the co-indexed token/timestamp arrays,
/// stopping at the shorter of the two:
/// - an empty cue adopts the current token's timestamp as its start,
/// - each token's text is appended verbatim and advances the cue's end,
/// - a sentence-ending token or a span past [`MAX_CUE_SECONDS`] closes the
///   cue (both conditions trigger the same close, so a token that does both
///   closes exactly once),
/// - closed cues are trimmed and dropped if nothing remains,
/// - a non-empty partial cue left at the end of the scan is flushed.
///
/// A chunk with no token data at all becomes a single cue spanning the whole
/// chunk with the chunk's full text.
pub fn segment_cues(chunk: &ChunkResult) -> Vec<Cue> {
    if chunk.tokens.is_empty() {
        return vec![Cue {
            start: 0.0,
            end: chunk.end_time - chunk.start_time,
            text: chunk.text.clone(),
        }];
    }

    let mut cues = Vec::new();
    let mut current = Cue {
        start: 0.0,
        end: 0.0,
        text: String::new(),
    };

    for (token, &timestamp) in chunk.tokens.iter().zip(chunk.timestamps.iter()) {
        let timestamp = f64::from(timestamp);

        if current.text.is_empty() {
            current.start = timestamp;
        }

        current.text.push_str(token);
        current.end = timestamp;

        if is_sentence_end(token) || current.end - current.start > MAX_CUE_SECONDS {
            close_cue(&mut cues, &mut current);
        }
    }

    if !current.text.is_empty() {
        close_cue(&mut cues, &mut current);
    }

    cues
}

fn close_cue(cues: &mut Vec<Cue>, current: &mut Cue) {
    let text = current.text.trim();
    if !text.is_empty() {
        cues.push(Cue {
            start: current.start,
            end: current.end,
            text: text.to_owned(),
        });
    }
    current.start = 0.0;
    current.end = 0.0;
    current.text.clear();
}

fn is_sentence_end(token: &str) -> bool {
    let t = token.trim();
    t.ends_with('.') || t.ends_with('!') || t.ends_with('?')
}
