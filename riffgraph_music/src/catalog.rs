// Scale catalog: named scales and the pitch-to-frequency table.
//
// The catalog is immutable configuration. It is built once (either from the
// built-in tables or from a JSON file) and passed by reference into the
// generator. Construction always goes through `ScaleCatalog::new`, which
// enforces the invariants the generator relies on:
// - every scale has at least two pitches, all distinct
// - every scale pitch has a frequency
// - frequencies are finite and positive
// - scale names are unique and the catalog is non-empty
//
// JSON format (same shape `builtin()` would serialize to):
//   {
//     "frequencies": { "C4": 261.63, "D4": 293.66, ... },
//     "scales": [ { "name": "major", "pitches": ["C4", "D4", ...] }, ... ]
//   }
//
// Scale order is definition order; `scale_names()` and random scale selection
// both follow it.

use crate::error::{Error, Result};
use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Equal-tempered frequencies (A4 = 440 Hz) for C4 through A#5.
const BUILTIN_FREQUENCIES: [(&str, f64); 23] = [
    ("C4", 261.63),
    ("C#4", 277.18),
    ("D4", 293.66),
    ("D#4", 311.13),
    ("E4", 329.63),
    ("F4", 349.23),
    ("F#4", 369.99),
    ("G4", 392.00),
    ("G#4", 415.30),
    ("A4", 440.00),
    ("A#4", 466.16),
    ("B4", 493.88),
    ("C5", 523.25),
    ("C#5", 554.37),
    ("D5", 587.33),
    ("D#5", 622.25),
    ("E5", 659.25),
    ("F5", 698.46),
    ("F#5", 739.99),
    ("G5", 783.99),
    ("G#5", 830.61),
    ("A5", 880.00),
    ("A#5", 932.33),
];

const BUILTIN_SCALES: [(&str, &[&str]); 4] = [
    ("pentatonic", &["C4", "D4", "E4", "G4", "A4", "C5"]),
    ("major", &["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]),
    ("minor", &["C4", "D4", "D#4", "F4", "G4", "G#4", "A#4", "C5"]),
    ("dorian", &["C4", "D4", "D#4", "F4", "G4", "A4", "A#4", "C5"]),
];

/// A named, ordered sequence of distinct pitches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub name: String,
    pub pitches: Vec<Pitch>,
}

impl Scale {
    /// The deterministic first note of every melody: the pitch at
    /// `floor(len / 2)`.
    pub fn start_pitch(&self) -> Pitch {
        self.pitches[self.pitches.len() / 2]
    }

    pub fn contains(&self, pitch: Pitch) -> bool {
        self.pitches.contains(&pitch)
    }
}

/// Serialized form of a catalog. Pitch names stay strings here and are parsed
/// on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    frequencies: BTreeMap<String, f64>,
    scales: Vec<ScaleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScaleEntry {
    name: String,
    pitches: Vec<String>,
}

fn parse_pitch(name: &str) -> Result<Pitch> {
    Ok(name.parse::<Pitch>()?)
}

/// Validated scale definitions plus the frequency table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCatalog {
    scales: Vec<Scale>,
    frequencies: BTreeMap<Pitch, f64>,
}

impl ScaleCatalog {
    /// Validate and assemble a catalog.
    pub fn new(scales: Vec<Scale>, frequencies: BTreeMap<Pitch, f64>) -> Result<Self> {
        if scales.is_empty() {
            return Err(Error::InvalidCatalog("no scales defined".into()));
        }
        for (&pitch, &hz) in &frequencies {
            if !hz.is_finite() || hz <= 0.0 {
                return Err(Error::InvalidCatalog(format!(
                    "frequency of {pitch} must be positive, got {hz}"
                )));
            }
        }

        let mut names = BTreeSet::new();
        for scale in &scales {
            if !names.insert(scale.name.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "scale '{}' is defined twice",
                    scale.name
                )));
            }
            if scale.pitches.len() < 2 {
                return Err(Error::InvalidCatalog(format!(
                    "scale '{}' needs at least 2 pitches, has {}",
                    scale.name,
                    scale.pitches.len()
                )));
            }
            let mut seen = BTreeSet::new();
            for &pitch in &scale.pitches {
                if !seen.insert(pitch) {
                    return Err(Error::InvalidCatalog(format!(
                        "scale '{}' repeats {pitch}",
                        scale.name
                    )));
                }
                if !frequencies.contains_key(&pitch) {
                    return Err(Error::UnknownPitch(pitch.to_string()));
                }
            }
        }

        log::debug!(
            "catalog ready: {} scales, {} pitches",
            scales.len(),
            frequencies.len()
        );
        Ok(ScaleCatalog {
            scales,
            frequencies,
        })
    }

    /// The built-in pentatonic / major / minor / dorian catalog.
    pub fn builtin() -> Result<Self> {
        let frequencies = BUILTIN_FREQUENCIES
            .iter()
            .map(|&(name, hz)| Ok((name.parse::<Pitch>()?, hz)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        let scales = BUILTIN_SCALES
            .iter()
            .map(|&(name, pitches)| {
                Ok(Scale {
                    name: name.to_string(),
                    pitches: pitches
                        .iter()
                        .map(|p| p.parse::<Pitch>().map_err(Error::from))
                        .collect::<Result<_>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(scales, frequencies)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let frequencies = file
            .frequencies
            .iter()
            .map(|(name, &hz)| Ok((parse_pitch(name)?, hz)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        let scales = file
            .scales
            .into_iter()
            .map(|entry| {
                Ok(Scale {
                    pitches: entry
                        .pitches
                        .iter()
                        .map(|p| parse_pitch(p))
                        .collect::<Result<_>>()?,
                    name: entry.name,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(scales, frequencies)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Serialize to the JSON format accepted by `from_json`.
    pub fn to_json(&self) -> Result<String> {
        let file = CatalogFile {
            frequencies: self
                .frequencies
                .iter()
                .map(|(pitch, &hz)| (pitch.to_string(), hz))
                .collect(),
            scales: self
                .scales
                .iter()
                .map(|scale| ScaleEntry {
                    name: scale.name.clone(),
                    pitches: scale.pitches.iter().map(|p| p.to_string()).collect(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Scale names in definition order.
    pub fn scale_names(&self) -> Vec<&str> {
        self.scales.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn scales(&self) -> &[Scale] {
        &self.scales
    }

    /// Look up a scale by name.
    pub fn scale(&self, name: &str) -> Result<&Scale> {
        self.scales
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::UnknownScale(name.to_string()))
    }

    /// Frequency of a pitch given by name. Malformed names and names missing
    /// from the table are both `UnknownPitch`.
    pub fn frequency_of(&self, name: &str) -> Result<f64> {
        let pitch: Pitch = name.parse()?;
        self.frequency(pitch)
    }

    /// Frequency of a parsed pitch.
    pub fn frequency(&self, pitch: Pitch) -> Result<f64> {
        self.frequencies
            .get(&pitch)
            .copied()
            .ok_or_else(|| Error::UnknownPitch(pitch.to_string()))
    }
}
