// A small CLI utility to download known ggml Whisper models into jackdaw's
// model cache (or any target directory).

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "model-downloader")]
#[command(about = "Download ggml Whisper models for jackdaw", long_about = None)]
struct Args {
    /// List supported model names and exit.
    #[arg(long)]
    list: bool,

    /// Model name (examples: tiny, base.en, large-v3-turbo).
    ///
    /// We intentionally keep an allowlist of known-good model artifacts.
    #[arg(long, required_unless_present = "list")]
    name: Option<String>,

    /// Target directory (created if missing). Defaults to jackdaw's model
    /// cache, which the `jackdaw` CLI checks when no model flag is given.
    #[arg(long)]
    dir: Option<PathBuf>,
}

/// Download source for a known model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModelSpec {
    /// Friendly name users type (e.g. "large-v3-turbo").
    name: &'static str,

    /// Filename written to disk (e.g. "ggml-large-v3-turbo.bin").
    filename: &'static str,
}

// These artifacts live in whisper.cpp's standard Hugging Face repo for ggml
// models; the URL is derived from the filename.
const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

static MODELS: &[ModelSpec] = &[
    ModelSpec { name: "tiny", filename: "ggml-tiny.bin" },
    ModelSpec { name: "tiny.en", filename: "ggml-tiny.en.bin" },
    ModelSpec { name: "base", filename: "ggml-base.bin" },
    ModelSpec { name: "base.en", filename: "ggml-base.en.bin" },
    ModelSpec { name: "small", filename: "ggml-small.bin" },
    ModelSpec { name: "small.en", filename: "ggml-small.en.bin" },
    ModelSpec { name: "medium", filename: "ggml-medium.bin" },
    ModelSpec { name: "medium.en", filename: "ggml-medium.en.bin" },
    ModelSpec { name: "large-v3", filename: "ggml-large-v3.bin" },
    ModelSpec { name: "large-v3-turbo", filename: "ggml-large-v3-turbo.bin" },
    ModelSpec { name: "large-v3-turbo-q5_0", filename: "ggml-large-v3-turbo-q5_0.bin" },
];

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        print!("{}", model_list_string());
        return Ok(());
    }

    let name = args.name.as_deref().expect("clap should require --name");
    let dir = args.dir.unwrap_or_else(default_model_dir);

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create target dir: {}", dir.display()))?;

    let spec = lookup_model(name).with_context(|| {
        format!("unknown model '{name}'. Run with --list to see supported models.")
    })?;

    let dest_path = dir.join(spec.filename);
    if dest_path.exists() {
        println!("already exists: {}", dest_path.display());
        return Ok(());
    }

    let url = format!("{MODEL_BASE_URL}/{}", spec.filename);
    println!("downloading {}", spec.filename);
    println!("    {url}");

    let client = reqwest::blocking::Client::builder()
        .user_agent("jackdaw-model-downloader")
        .build()
        .context("failed to build HTTP client")?;

    let resp = client
        .get(&url)
        .send()
        .with_context(|| format!("request failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("download failed (bad status): {url}"))?;

    let total = resp.content_length();
    download_to_path(resp, total, &dest_path)?;

    println!("saved: {}", dest_path.display());
    Ok(())
}

fn lookup_model(name: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|m| m.name == name)
}

fn model_list_string() -> String {
    let mut out = String::from("Whisper models:\n");
    for m in MODELS {
        out.push_str("  - ");
        out.push_str(m.name);
        out.push('\n');
    }
    out
}

/// `$XDG_CACHE_HOME/jackdaw/models`, falling back to `~/.cache/jackdaw/models`.
fn default_model_dir() -> PathBuf {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"));
    cache.join("jackdaw").join("models")
}

/// Download a reader into `dest_path` safely:
/// - download to `dest_path.part`
/// - fsync + rename to final path
/// - remove the partial file if anything fails
fn download_to_path<R: Read>(
    mut reader: R,
    total_bytes: Option<u64>,
    dest_path: &Path,
) -> Result<()> {
    let total = total_bytes.unwrap_or(0);

    let pb = if total > 0 {
        ProgressBar::new(total)
    } else {
        ProgressBar::new_spinner()
    };

    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {bytes}/{total_bytes} {bar:40.cyan/blue} {eta}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );

    let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            pb.inc(n as u64);
        }

        file.sync_all()?;
        pb.finish_and_clear();

        fs::rename(&tmp_path, dest_path)
            .with_context(|| format!("failed to move into place: {}", dest_path.display()))?;

        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        pb.finish_and_clear();
    }

    result
}
