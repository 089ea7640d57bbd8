use std::fmt;
use std::str::FromStr;

/// The supported transcript output formats.
///
/// `ValueEnum` lets the CLI use this enum directly as a flag value; the
/// `FromStr` impl covers programmatic use without the `cli` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// All chunk texts joined into a single line of plain text.
    Text,

    /// A JSON document with duration, chunk count, joined text, and per-chunk data.
    Json,

    /// WebVTT subtitle cues derived from token timestamps.
    Vtt,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "vtt" => Ok(Self::Vtt),
            other => Err(format!("unknown format {other:?} (valid: text, json, vtt)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Vtt => "vtt",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats_case_insensitively() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Vtt".parse::<OutputFormat>().unwrap(), OutputFormat::Vtt);
    }

    #[test]
    fn rejects_unknown_formats_with_the_valid_list() {
        let err = "srt".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("valid: text, json, vtt"));
    }
}
