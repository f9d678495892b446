// Melody generation by weighted random walk over a `MelodyGraph`.
//
// `generate_melody` resolves the scale (or picks one uniformly when none is
// named), rebuilds the graph, and starts on the scale's middle pitch
// (`floor(len / 2)`). Each further note is a roulette-wheel draw over the
// current pitch's outgoing edges. The first note never consumes randomness,
// so a length-1 melody is fully deterministic.
//
// All randomness comes from a caller-supplied `RandomSource`: the same seed
// and catalog give the same melody.

use crate::catalog::ScaleCatalog;
use crate::error::{Error, Result};
use crate::graph::MelodyGraph;
use crate::pitch::Pitch;
use riffgraph_prng::RandomSource;
use serde::{Deserialize, Serialize};

/// One melody event: a pitch and its frequency in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "note")]
    pub pitch: Pitch,
    pub frequency: f64,
}

/// A generated melody. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Melody {
    scale: String,
    notes: Vec<Note>,
}

impl Melody {
    /// Name of the scale the melody was drawn from.
    pub fn scale(&self) -> &str {
        &self.scale
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Roulette-wheel selection.
///
/// `rng_val` is a uniform value in [0, 1); it is scaled to
/// `[0, total_weight)` and each option's weight is subtracted in order until
/// the remainder drops to zero or below. Zero-weight options are never
/// chosen. Returns `None` if no option has positive weight.
pub fn weighted_choice<T>(options: &[T], weight: impl Fn(&T) -> u32, rng_val: f64) -> Option<&T> {
    let total: u64 = options.iter().map(|o| weight(o) as u64).sum();
    if total == 0 {
        return None;
    }

    let mut remaining = rng_val * total as f64;
    let mut last = None;
    for option in options {
        let w = weight(option);
        if w == 0 {
            continue;
        }
        remaining -= w as f64;
        if remaining <= 0.0 {
            return Some(option);
        }
        last = Some(option);
    }
    // Only reachable through float rounding at the top of the wheel.
    last
}

/// Generate a melody of `length` notes.
///
/// `scale_name` of `None` picks a scale uniformly from the catalog.
pub fn generate_melody(
    catalog: &ScaleCatalog,
    length: usize,
    scale_name: Option<&str>,
    rng: &mut impl RandomSource,
) -> Result<Melody> {
    if length == 0 {
        return Err(Error::InvalidLength(length));
    }

    let scale = match scale_name {
        Some(name) => catalog.scale(name)?,
        None => {
            let scales = catalog.scales();
            &scales[rng.range_usize(0, scales.len())]
        }
    };
    let graph = MelodyGraph::build(scale, catalog)?;

    let mut current = scale.start_pitch();
    let mut notes = Vec::with_capacity(length);
    notes.push(Note {
        pitch: current,
        frequency: catalog.frequency(current)?,
    });

    while notes.len() < length {
        let node = graph.next_pitch(current, rng.next_f64()).ok_or_else(|| {
            Error::InvalidCatalog(format!("{current} has no successors in '{}'", scale.name))
        })?;
        notes.push(Note {
            pitch: node.pitch,
            frequency: node.frequency,
        });
        current = node.pitch;
    }

    log::debug!(
        "generated {} notes in '{}': {}",
        notes.len(),
        scale.name,
        notes
            .iter()
            .map(|n| n.pitch.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );

    Ok(Melody {
        scale: scale.name.clone(),
        notes,
    })
}
