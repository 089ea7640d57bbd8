//! The jackdaw CLI: probe the source, plan chunk windows, transcribe them
//! sequentially with live progress on stderr, and write the transcript to
//! stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use jackdaw::backends::whisper::WhisperRecognizer;
use jackdaw::boundaries::plan_boundaries;
use jackdaw::media::{FfmpegExtractor, probe_duration};
use jackdaw::output::write_transcript;
use jackdaw::output_format::OutputFormat;
use jackdaw::pipeline::Transcriber;
use jackdaw::progress::TerminalProgress;

/// Model file the CLI looks for when neither `--model` nor `JACKDAW_MODEL`
/// is given. The `model-downloader` binary fetches it under this name.
const DEFAULT_MODEL_FILE: &str = "ggml-base.en.bin";

#[derive(Parser, Debug)]
#[command(name = "jackdaw", version)]
#[command(about = "Transcribe long-form audio in fixed-size chunks with Whisper")]
struct Args {
    /// Audio or video file to transcribe.
    audio: PathBuf,

    /// Chunk size in seconds.
    #[arg(
        short = 'c',
        long = "chunk-size",
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    chunk_size: u32,

    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Output file (stdout when omitted).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Path to a ggml Whisper model. Falls back to $JACKDAW_MODEL, then to
    /// the cache directory populated by `model-downloader`.
    #[arg(short = 'm', long = "model")]
    model: Option<PathBuf>,
}

/// ANSI styling for stderr ceremony; every code is empty when stderr is not a
/// terminal, so piped/captured output stays clean.
#[derive(Clone, Copy)]
struct Style {
    bold: &'static str,
    dim: &'static str,
    green: &'static str,
    yellow: &'static str,
    reset: &'static str,
    tty: bool,
}

impl Style {
    fn for_stderr() -> Self {
        if io::stderr().is_terminal() {
            Self {
                bold: "\x1b[1m",
                dim: "\x1b[2m",
                green: "\x1b[32m",
                yellow: "\x1b[33m",
                reset: "\x1b[0m",
                tty: true,
            }
        } else {
            Self {
                bold: "",
                dim: "",
                green: "",
                yellow: "",
                reset: "",
                tty: false,
            }
        }
    }
}

/// Hides the terminal cursor for its lifetime. Dropping restores it, so the
/// cursor comes back on every exit path, including errors.
struct HiddenCursor {
    tty: bool,
}

impl HiddenCursor {
    fn new(style: &Style) -> Self {
        if style.tty {
            eprint!("\x1b[?25l");
        }
        Self { tty: style.tty }
    }
}

impl Drop for HiddenCursor {
    fn drop(&mut self) {
        if self.tty {
            eprint!("\x1b[?25h");
        }
    }
}

fn main() -> Result<()> {
    jackdaw::logging::init();
    let args = Args::parse();
    let style = Style::for_stderr();

    let recognizer = load_recognizer(args.model.as_deref(), &style)?;

    let duration = probe_duration(&args.audio).context("failed to get duration")?;
    let boundaries = plan_boundaries(duration, f64::from(args.chunk_size));

    eprintln!(
        "audio: {duration:.1}s {dim}\u{2022}{reset} chunks: {chunk}s {dim}\u{2022}{reset} format: {format}",
        dim = style.dim,
        reset = style.reset,
        chunk = args.chunk_size,
        format = args.format,
    );

    let mut transcriber = Transcriber::new(recognizer);
    let (results, elapsed) = {
        let _cursor = HiddenCursor::new(&style);
        let mut progress =
            TerminalProgress::new(io::stderr(), stderr_columns, style.dim, style.reset);
        transcriber.transcribe(&args.audio, &boundaries, &FfmpegExtractor, &mut progress)
    };

    let elapsed_secs = elapsed.as_secs_f64();
    let rt_factor = duration / elapsed_secs;
    let rt_color = if rt_factor < 10.0 {
        style.yellow
    } else {
        style.green
    };
    eprintln!(
        "\u{26a1} Processed in {bold}{elapsed_secs:.1}s{reset} {dim}({rt_color}{rt_factor:.1}x{reset}{dim} realtime){reset}\n",
        bold = style.bold,
        dim = style.dim,
        reset = style.reset,
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("error creating output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_transcript(&mut out, args.format, &results, duration)?;
            out.flush()?;
            eprintln!("output: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            write_transcript(&mut out, args.format, &results, duration)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn load_recognizer(model_flag: Option<&Path>, style: &Style) -> Result<WhisperRecognizer> {
    let model_path = resolve_model_path(model_flag)?;

    let _cursor = HiddenCursor::new(style);
    eprint!("\u{23f3} Loading model...\r");

    match WhisperRecognizer::new(&model_path.to_string_lossy()) {
        Ok(recognizer) => {
            eprintln!("\u{2705} Model loaded!   ");
            Ok(recognizer)
        }
        Err(err) => {
            eprintln!();
            Err(err).context("failed to load model")
        }
    }
}

/// Current stderr terminal width in columns, `None` when stderr is not a
/// terminal. Queried per progress render so resizes take effect mid-run.
fn stderr_columns() -> Option<usize> {
    console::Term::stderr()
        .size_checked()
        .map(|(_rows, cols)| usize::from(cols))
}

/// Resolve the model path: `--model` flag, then `JACKDAW_MODEL`, then the
/// default cache location.
fn resolve_model_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        if !path.is_file() {
            bail!("model not found at '{}'", path.display());
        }
        return Ok(path.to_owned());
    }

    if let Ok(env_path) = std::env::var("JACKDAW_MODEL") {
        let path = PathBuf::from(env_path);
        if !path.is_file() {
            bail!("JACKDAW_MODEL points at '{}', which is not a file", path.display());
        }
        return Ok(path);
    }

    let path = default_model_dir().join(DEFAULT_MODEL_FILE);
    if !path.is_file() {
        bail!(
            "no model at '{}'; pass --model, set JACKDAW_MODEL, or fetch one with `model-downloader --name base.en`",
            path.display()
        );
    }
    Ok(path)
}

/// `$XDG_CACHE_HOME/jackdaw/models`, falling back to `~/.cache/jackdaw/models`.
fn default_model_dir() -> PathBuf {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"));
    cache.join("jackdaw").join("models")
}
