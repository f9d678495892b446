// Note durations, in beats, for playback and export.
//
// Three stock patterns: straight quarters, a half-quarter-quarter figure, and
// a pattern with paired eighths. A pattern is cycled (or truncated) to the
// melody length so every note gets a duration.

use crate::error::{Error, Result};
use riffgraph_prng::RandomSource;

pub const STRAIGHT: &[f64] = &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
pub const LONG_SHORT: &[f64] = &[2.0, 1.0, 1.0, 2.0, 1.0, 1.0];
pub const EIGHTHS: &[f64] = &[1.0, 0.5, 0.5, 1.0, 1.0, 0.5, 0.5, 1.0];

pub const PATTERNS: [&[f64]; 3] = [STRAIGHT, LONG_SHORT, EIGHTHS];

/// Per-note durations in beats.
#[derive(Debug, Clone, PartialEq)]
pub struct Rhythm {
    durations: Vec<f64>,
}

impl Rhythm {
    /// One beat per note.
    pub fn uniform(length: usize) -> Self {
        Rhythm {
            durations: vec![1.0; length],
        }
    }

    /// Cycle `pattern` out to `length` notes. An empty pattern gives one
    /// beat per note. Every duration must be finite and positive.
    pub fn from_pattern(pattern: &[f64], length: usize) -> Result<Self> {
        if let Some(&bad) = pattern.iter().find(|d| !d.is_finite() || **d <= 0.0) {
            return Err(Error::InvalidRhythm(bad));
        }
        Ok(Self::cycled(pattern, length))
    }

    /// This rhythm cycled (or truncated) to `length` notes.
    pub fn fit(&self, length: usize) -> Rhythm {
        Self::cycled(&self.durations, length)
    }

    fn cycled(pattern: &[f64], length: usize) -> Self {
        if pattern.is_empty() {
            return Self::uniform(length);
        }
        Rhythm {
            durations: pattern.iter().copied().cycle().take(length).collect(),
        }
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Beat offset at which each note starts.
    pub fn onsets(&self) -> Vec<f64> {
        self.durations
            .iter()
            .scan(0.0, |t, &d| {
                let start = *t;
                *t += d;
                Some(start)
            })
            .collect()
    }

    pub fn total_beats(&self) -> f64 {
        self.durations.iter().sum()
    }
}

/// Pick one of the stock patterns uniformly and fit it to `length` notes.
pub fn choose_rhythm(length: usize, rng: &mut impl RandomSource) -> Rhythm {
    let pattern = PATTERNS[rng.range_usize(0, PATTERNS.len())];
    Rhythm::cycled(pattern, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use riffgraph_prng::RiffRng;

    #[test]
    fn cycles_and_truncates() {
        let r = Rhythm::from_pattern(LONG_SHORT, 8).unwrap();
        assert_eq!(r.durations(), &[2.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0]);
        let r = Rhythm::from_pattern(EIGHTHS, 3).unwrap();
        assert_eq!(r.durations(), &[1.0, 0.5, 0.5]);
        assert_eq!(Rhythm::from_pattern(&[], 2).unwrap(), Rhythm::uniform(2));
    }

    #[test]
    fn rejects_degenerate_durations() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Rhythm::from_pattern(&[1.0, bad], 3),
                Err(Error::InvalidRhythm(_))
            ));
        }
    }

    #[test]
    fn fit_cycles_existing_rhythm() {
        let short = Rhythm::from_pattern(LONG_SHORT, 2).unwrap();
        assert_eq!(short.fit(5).durations(), &[2.0, 1.0, 2.0, 1.0, 2.0]);
        assert_eq!(short.fit(1).durations(), &[2.0]);
        assert_eq!(Rhythm::uniform(0).fit(2), Rhythm::uniform(2));
    }

    #[test]
    fn onsets_accumulate() {
        let r = Rhythm::from_pattern(EIGHTHS, 5).unwrap();
        assert_eq!(r.onsets(), vec![0.0, 1.0, 1.5, 2.0, 3.0]);
        assert_eq!(r.total_beats(), 4.0);
    }

    #[test]
    fn choose_rhythm_fits_length() {
        let mut rng = RiffRng::new(11);
        for length in [1, 5, 8, 13] {
            let r = choose_rhythm(length, &mut rng);
            assert_eq!(r.durations().len(), length);
            assert!(r.durations().iter().all(|&d| d > 0.0));
        }
    }
}
