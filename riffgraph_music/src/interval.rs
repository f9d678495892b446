// Interval weights: how strongly the melody graph prefers one pitch after
// another.
//
// The semitone distance between two pitches is
//   ((pc2 - pc1 + 12) mod 12) + 12 * (oct2 - oct1)
// which is *not* folded into a single octave. Descending moves across an
// octave boundary (C5 -> D4 is -10) and wide ascending moves land outside the
// table and take the fallback weight of 1. Small steps and consonant leaps
// score highest; every interval keeps a nonzero weight so any edge remains
// selectable.

use crate::pitch::Pitch;

pub const UNISON: u32 = 1;
pub const SECOND: u32 = 10;
pub const THIRD: u32 = 8;
pub const FOURTH: u32 = 6;
pub const FIFTH: u32 = 7;
pub const SIXTH: u32 = 4;
pub const SEVENTH: u32 = 3;
pub const OCTAVE: u32 = 5;
/// Tritone, negative and multi-octave intervals.
pub const FALLBACK: u32 = 1;

/// Signed semitone distance from `from` to `to`.
pub fn semitones_between(from: Pitch, to: Pitch) -> i32 {
    let class_diff = (to.class() as i32 - from.class() as i32 + 12) % 12;
    let octave_diff = to.octave() as i32 - from.octave() as i32;
    class_diff + 12 * octave_diff
}

/// Edge weight for a raw semitone interval.
pub fn interval_weight(semitones: i32) -> u32 {
    match semitones {
        0 => UNISON,
        1 | 2 => SECOND,
        3 | 4 => THIRD,
        5 => FOURTH,
        7 => FIFTH,
        8 | 9 => SIXTH,
        10 | 11 => SEVENTH,
        12 => OCTAVE,
        _ => FALLBACK,
    }
}

/// Weight of the directed move `from -> to`.
pub fn transition_weight(from: Pitch, to: Pitch) -> u32 {
    interval_weight(semitones_between(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Pitch {
        name.parse().unwrap()
    }

    #[test]
    fn weight_table_is_exact() {
        let expected = [
            (0, 1),
            (1, 10),
            (2, 10),
            (3, 8),
            (4, 8),
            (5, 6),
            (7, 7),
            (8, 4),
            (9, 4),
            (10, 3),
            (11, 3),
            (12, 5),
        ];
        for (semitones, weight) in expected {
            assert_eq!(interval_weight(semitones), weight, "interval {semitones}");
        }
    }

    #[test]
    fn everything_else_falls_back_to_one() {
        for semitones in [6, 13, 14, 19, 24, -1, -2, -10, -12, i32::MIN, i32::MAX] {
            assert_eq!(interval_weight(semitones), 1, "interval {semitones}");
        }
    }

    #[test]
    fn semitones_within_an_octave() {
        assert_eq!(semitones_between(p("C4"), p("D4")), 2);
        assert_eq!(semitones_between(p("C4"), p("G4")), 7);
        assert_eq!(semitones_between(p("E4"), p("C4")), 8);
        assert_eq!(semitones_between(p("C4"), p("C4")), 0);
    }

    #[test]
    fn semitones_across_octaves_are_not_folded() {
        assert_eq!(semitones_between(p("C4"), p("C5")), 12);
        assert_eq!(semitones_between(p("C5"), p("C4")), -12);
        assert_eq!(semitones_between(p("C5"), p("D4")), -10);
        assert_eq!(semitones_between(p("A4"), p("E5")), 19);
    }

    #[test]
    fn transition_weights() {
        assert_eq!(transition_weight(p("G4"), p("A4")), SECOND);
        assert_eq!(transition_weight(p("C4"), p("C5")), OCTAVE);
        assert_eq!(transition_weight(p("C5"), p("B4")), FALLBACK);
        // Descending within the octave wraps upward: G4 -> F4 is 10.
        assert_eq!(transition_weight(p("G4"), p("F4")), SEVENTH);
    }
}
