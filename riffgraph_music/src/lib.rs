// Riffgraph melody generator
//
// Generates short melodies by a weighted random walk over a complete directed
// graph of scale pitches. Edge weights come from the interval between two
// pitches: small steps and consonant leaps are preferred, everything else
// stays possible with a small weight.
//
// Architecture:
// - pitch.rs: Pitch names ("C#4") <-> pitch class + octave, MIDI keys
// - catalog.rs: Validated scale definitions and frequency table, JSON loading
// - interval.rs: Semitone distance and the interval -> weight table
// - graph.rs: Per-scale weighted graph (rebuilt on every request)
// - generator.rs: Roulette-wheel selection and the melody walk
// - rhythm.rs: Stock rhythm patterns fitted to a melody
// - playback.rs: Tempo-driven scheduler that loops a melody note by note
// - synth.rs: Triangle-oscillator rendering and WAV output
// - midi.rs: Standard MIDI File output
// - error.rs: Crate error type
//
// Randomness is injected through `riffgraph_prng::RandomSource`; the same
// seed and catalog reproduce the same melody.

pub mod catalog;
pub mod error;
pub mod generator;
pub mod graph;
pub mod interval;
pub mod midi;
pub mod pitch;
pub mod playback;
pub mod rhythm;
pub mod synth;

pub use catalog::{Scale, ScaleCatalog};
pub use error::{Error, Result};
pub use generator::{Melody, Note, generate_melody, weighted_choice};
pub use graph::MelodyGraph;
pub use pitch::Pitch;
