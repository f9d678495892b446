// Pitch names and their decomposition into pitch class and octave.
//
// A `Pitch` is parsed from names like "C4" or "A#5": a note letter, an
// optional sharp, and a non-negative octave number. Only the twelve sharp
// spellings are recognised; flats and enharmonic oddities like "E#" do not
// parse. Pitches round-trip through their name, which is also their serde
// representation, so catalog JSON and melody JSON both use plain strings.
//
// Used by catalog.rs (frequency table keys, scale members), interval.rs
// (semitone distances) and midi.rs (MIDI key numbers).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chromatic pitch class names, indexed by pitch class (C = 0).
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A named note at a specific octave.
///
/// Field order gives the derived `Ord` a low-to-high ordering: octave first,
/// then pitch class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pitch {
    octave: u8,
    class: u8,
}

impl Pitch {
    /// Build a pitch from a pitch class (0-11, C = 0) and octave.
    /// Returns `None` if `class` is out of range.
    pub fn new(class: u8, octave: u8) -> Option<Self> {
        (class < 12).then_some(Pitch { octave, class })
    }

    /// Chromatic pitch class, 0-11 with C = 0.
    pub fn class(self) -> u8 {
        self.class
    }

    pub fn octave(self) -> u8 {
        self.octave
    }

    /// Note letter plus optional sharp, without the octave ("C#").
    pub fn class_name(self) -> &'static str {
        PITCH_CLASS_NAMES[self.class as usize]
    }

    /// MIDI key number with C4 = 60.
    pub fn midi_key(self) -> u16 {
        12 * (self.octave as u16 + 1) + self.class as u16
    }
}

impl FromStr for Pitch {
    type Err = ParsePitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ParsePitchError(s.to_string()))?;
        let (name, octave) = s.split_at(split);

        let class = PITCH_CLASS_NAMES
            .iter()
            .position(|&n| n == name)
            .ok_or_else(|| ParsePitchError(s.to_string()))?;
        if !octave.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsePitchError(s.to_string()));
        }
        let octave: u8 = octave
            .parse()
            .map_err(|_| ParsePitchError(s.to_string()))?;

        Ok(Pitch {
            octave,
            class: class as u8,
        })
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class_name(), self.octave)
    }
}

impl From<Pitch> for String {
    fn from(p: Pitch) -> String {
        p.to_string()
    }
}

impl TryFrom<String> for Pitch {
    type Error = ParsePitchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A string that is not a recognised pitch name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a pitch name")]
pub struct ParsePitchError(pub String);

impl From<ParsePitchError> for crate::error::Error {
    fn from(e: ParsePitchError) -> Self {
        crate::error::Error::UnknownPitch(e.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_naturals_and_sharps() {
        let c4: Pitch = "C4".parse().unwrap();
        assert_eq!((c4.class(), c4.octave()), (0, 4));

        let a_sharp: Pitch = "A#4".parse().unwrap();
        assert_eq!((a_sharp.class(), a_sharp.octave()), (10, 4));

        let b5: Pitch = "B5".parse().unwrap();
        assert_eq!((b5.class(), b5.octave()), (11, 5));
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["", "C", "H4", "Db4", "E#4", "c4", "C#", "C4x", "4", "C-1", "C 4"] {
            assert!(bad.parse::<Pitch>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_round_trips() {
        for name in ["C4", "C#4", "D#4", "G#5", "A#5", "B4", "C5"] {
            let p: Pitch = name.parse().unwrap();
            assert_eq!(p.to_string(), name);
        }
    }

    #[test]
    fn ordering_is_low_to_high() {
        let b4: Pitch = "B4".parse().unwrap();
        let c5: Pitch = "C5".parse().unwrap();
        let c_sharp4: Pitch = "C#4".parse().unwrap();
        assert!(b4 < c5);
        assert!(c_sharp4 < b4);
    }

    #[test]
    fn midi_keys() {
        assert_eq!("C4".parse::<Pitch>().unwrap().midi_key(), 60);
        assert_eq!("A4".parse::<Pitch>().unwrap().midi_key(), 69);
        assert_eq!("C5".parse::<Pitch>().unwrap().midi_key(), 72);
    }

    #[test]
    fn serde_uses_the_name() {
        let p: Pitch = "F#4".parse().unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"F#4\"");
        let back: Pitch = serde_json::from_str("\"F#4\"").unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Pitch>("\"Gb4\"").is_err());
    }

    #[test]
    fn parse_error_names_the_input() {
        let err = "Gb4".parse::<Pitch>().unwrap_err();
        assert_eq!(err.to_string(), "'Gb4' is not a pitch name");
        assert!(matches!(
            crate::error::Error::from(err),
            crate::error::Error::UnknownPitch(name) if name == "Gb4"
        ));
    }
}
