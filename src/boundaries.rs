//! Chunk-boundary planning over a known total duration.

/// Windows shorter than this are discarded rather than transcribed.
///
/// The usual way such a sliver appears is a total duration that is an exact or
/// near-exact multiple of the chunk size, which leaves a degenerate trailing
/// window after the final cut-point is appended.
pub const MIN_WINDOW_SECONDS: f64 = 0.5;

/// Compute the ordered cut-points for a file of `total_seconds`.
///
/// Cut-points are generated at `0, c, 2c, ...` while strictly less than the
/// total, then the total itself is appended unconditionally. The returned
/// sequence therefore always ends exactly at `total_seconds` regardless of
/// rounding, and has at least two entries (one window) whenever
/// `total_seconds > 0`. Adjacent pairs are the chunk windows.
///
/// # Panics
///
/// `chunk_seconds` must be positive; this is a caller precondition (the CLI
/// validates its flag before calling) and is not clamped here.
pub fn plan_boundaries(total_seconds: f64, chunk_seconds: f64) -> Vec<f64> {
    assert!(chunk_seconds > 0.0, "chunk size must be positive");

    // Multiply rather than accumulate so long files don't drift.
    let mut boundaries = Vec::new();
    for i in 0u64.. {
        let cut = i as f64 * chunk_seconds;
        if cut >= total_seconds {
            break;
        }
        boundaries.push(cut);
    }
    boundaries.push(total_seconds);
    boundaries
}

/// The adjacent `(start, end)` pairs of a boundary sequence, with sub-floor
/// windows filtered out.
pub fn windows(boundaries: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    boundaries
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(start, end)| end - start >= MIN_WINDOW_SECONDS)
}
