// Error type for the melody library.
//
// Lookup and validation failures (`UnknownScale`, `UnknownPitch`,
// `InvalidLength`, `InvalidTempo`, `InvalidRhythm`, `InvalidCatalog`) are
// raised synchronously by the catalog, generator, rhythm and playback code.
// `Midi` covers notes outside the MIDI key range. The remaining variants wrap
// I/O and codec failures from the JSON, WAV and MIDI writers so `?`
// propagates through the CLI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested scale name is not in the catalog.
    #[error("unknown scale '{0}'")]
    UnknownScale(String),

    /// A pitch name is malformed or absent from the frequency table.
    #[error("unknown pitch '{0}'")]
    UnknownPitch(String),

    /// Melody length must be at least 1.
    #[error("invalid melody length {0} (must be at least 1)")]
    InvalidLength(usize),

    #[error("invalid tempo {0} BPM")]
    InvalidTempo(u32),

    /// A rhythm duration that is zero, negative or not finite.
    #[error("invalid rhythm duration {0} (must be finite and positive)")]
    InvalidRhythm(f64),

    /// A note that a Standard MIDI File cannot encode.
    #[error("MIDI: {0}")]
    Midi(String),

    /// Catalog data breaks one of its invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
