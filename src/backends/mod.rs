//! Built-in recognition backends.

pub mod whisper;
