//! Progress rendering and the seam the orchestrator reports through.
//!
//! The rendering functions are pure (counters in, strings out) so they stay
//! testable; the ANSI line rewriting lives only in [`TerminalProgress`].

use std::io::Write;

use crate::Error;

/// Bar width in glyphs when the terminal width is unknown.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Narrowest bar a cramped terminal gets.
pub const MIN_BAR_WIDTH: usize = 10;

/// Size the bar to the terminal: the full width minus the ` ETA …` tail,
/// clamped to [`MIN_BAR_WIDTH`]. Falls back to [`DEFAULT_BAR_WIDTH`] when the
/// width is unknown.
pub fn bar_width_for_eta(columns: Option<usize>, eta_text: &str) -> usize {
    let Some(columns) = columns.filter(|&c| c > 0) else {
        return DEFAULT_BAR_WIDTH;
    };
    let reserved = 1 + "ETA ".len() + eta_text.len();
    columns.saturating_sub(reserved).max(MIN_BAR_WIDTH)
}

/// Render a progress bar of `width` glyphs: `█` for the filled part, `░` for
/// the rest. Returns an empty string when `total` is zero and clamps the fill
/// to the bar width.
pub fn render_bar(current: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return String::new();
    }
    let filled = ((current * width) / total).min(width);
    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..width {
        bar.push('░');
    }
    bar
}

/// Format an ETA in whole seconds as `"1m 23s"` or `"45s"`.
///
/// Negative values render as `"0s"`. The orchestrator's linear extrapolation
/// can legitimately go negative right after a slow first chunk; the value is
/// clamped at display time rather than suppressed.
pub fn format_eta(seconds: f64) -> String {
    if seconds < 0.0 {
        return "0s".to_owned();
    }
    let total = seconds as u64;
    let minutes = total / 60;
    let secs = total % 60;
    if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Where the orchestrator reports per-chunk progress.
///
/// Per-chunk errors arrive here too: they are rendered inline and the run
/// continues, so this trait is the only place they surface.
pub trait ProgressSink {
    /// Called before chunk `current` of `total` is processed.
    fn on_chunk(&mut self, current: usize, total: usize, eta_seconds: f64);

    /// Called when chunk `current` failed; the run continues.
    fn on_chunk_error(&mut self, current: usize, total: usize, elapsed_seconds: f64, err: &Error);

    /// Called once after the last chunk.
    fn on_done(&mut self, total: usize);
}

/// A sink that reports nothing. Useful for library callers and tests.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_chunk(&mut self, _current: usize, _total: usize, _eta_seconds: f64) {}
    fn on_chunk_error(&mut self, _c: usize, _t: usize, _elapsed: f64, _err: &Error) {}
    fn on_done(&mut self, _total: usize) {}
}

/// Interactive terminal progress: a `\r`-rewritten bar with an ETA tail,
/// errors appended to the current line.
///
/// The bar is re-sized against `columns` on every render, so a resized
/// terminal picks up the new width on the next chunk. Color and cursor
/// handling are the caller's concern; when `dim`/`reset` are empty strings
/// the output is plain text, which is what non-TTY stderr gets.
pub struct TerminalProgress<W: Write> {
    w: W,
    columns: fn() -> Option<usize>,
    dim: &'static str,
    reset: &'static str,
}

impl<W: Write> TerminalProgress<W> {
    pub fn new(
        w: W,
        columns: fn() -> Option<usize>,
        dim: &'static str,
        reset: &'static str,
    ) -> Self {
        Self {
            w,
            columns,
            dim,
            reset,
        }
    }
}

impl<W: Write> ProgressSink for TerminalProgress<W> {
    fn on_chunk(&mut self, current: usize, total: usize, eta_seconds: f64) {
        let eta = format_eta(eta_seconds);
        let bar = render_bar(current, total, bar_width_for_eta((self.columns)(), &eta));
        // Rewrite the line in place and clear anything left from a longer one.
        let _ = write!(
            self.w,
            "\r{bar} {}ETA {eta}{}\x1b[K",
            self.dim, self.reset
        );
        let _ = self.w.flush();
    }

    fn on_chunk_error(&mut self, current: usize, total: usize, elapsed_seconds: f64, err: &Error) {
        let eta = format_eta(elapsed_seconds);
        let bar = render_bar(current, total, bar_width_for_eta((self.columns)(), &eta));
        let _ = writeln!(
            self.w,
            "\r{bar} {}ETA {eta} ERR: {err}{}",
            self.dim, self.reset
        );
        let _ = self.w.flush();
    }

    fn on_done(&mut self, total: usize) {
        let bar = render_bar(total, total, bar_width_for_eta((self.columns)(), "0s"));
        let _ = writeln!(self.w, "\r{bar} {}ETA 0s{}\x1b[K", self.dim, self.reset);
        let _ = self.w.flush();
    }
}
