// Audio rendering of a melody: one triangle oscillator per note with a
// piano-like gain envelope, mixed into a mono f32 buffer and optionally
// written to a WAV file with `hound`.
//
// Envelope, for a note lasting `d` seconds (times relative to note start):
//   0      .. 0.01s     linear 0 -> 0.3          attack
//   0.01s  .. 0.1s      exponential 0.3 -> 0.1   decay
//   0.1s   .. d - 0.1s  hold 0.1                 sustain
//   d-0.1s .. d         exponential 0.1 -> 0.001 release
// Silent after `d`. Notes start on the beat grid given by tempo and rhythm;
// overlapping tails are summed and the mix is clamped to [-1, 1].

use crate::error::{Error, Result};
use crate::generator::Melody;
use crate::playback::beat_duration;
use crate::rhythm::Rhythm;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

const ATTACK_END: f64 = 0.01;
const ATTACK_PEAK: f64 = 0.3;
const DECAY_END: f64 = 0.1;
const SUSTAIN_LEVEL: f64 = 0.1;
const RELEASE_TIME: f64 = 0.1;
const RELEASE_FLOOR: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub sample_rate: u32,
    pub tempo_bpm: u32,
    /// How long each note sounds, independent of its rhythmic slot.
    pub note_seconds: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            sample_rate: 44_100,
            tempo_bpm: crate::playback::DEFAULT_TEMPO,
            note_seconds: 0.5,
        }
    }
}

/// Envelope gain `t` seconds into a note lasting `duration` seconds.
pub fn envelope_gain(t: f64, duration: f64) -> f64 {
    if t < 0.0 || t >= duration {
        return 0.0;
    }
    let release_start = (duration - RELEASE_TIME).max(DECAY_END);
    if t < ATTACK_END {
        ATTACK_PEAK * t / ATTACK_END
    } else if t < DECAY_END {
        let frac = (t - ATTACK_END) / (DECAY_END - ATTACK_END);
        ATTACK_PEAK * (SUSTAIN_LEVEL / ATTACK_PEAK).powf(frac)
    } else if t < release_start {
        SUSTAIN_LEVEL
    } else {
        let frac = (t - release_start) / (duration - release_start);
        SUSTAIN_LEVEL * (RELEASE_FLOOR / SUSTAIN_LEVEL).powf(frac)
    }
}

/// Triangle wave in [-1, 1], starting at 0 and rising. `phase` in cycles.
pub fn triangle(phase: f64) -> f64 {
    1.0 - 4.0 * ((phase + 0.25).rem_euclid(1.0) - 0.5).abs()
}

/// Render `melody` to mono samples. `rhythm` of `None` gives one beat per
/// note; a shorter rhythm is cycled.
pub fn render_melody(
    melody: &Melody,
    rhythm: Option<&Rhythm>,
    config: &RenderConfig,
) -> Result<Vec<f32>> {
    if melody.is_empty() {
        return Err(Error::InvalidLength(0));
    }
    let beat = beat_duration(config.tempo_bpm)?.as_secs_f64();
    let rhythm = match rhythm {
        Some(r) => r.fit(melody.len()),
        None => Rhythm::uniform(melody.len()),
    };

    let sr = config.sample_rate as f64;
    let onsets = rhythm.onsets();
    let last_end = onsets[melody.len() - 1] * beat + config.note_seconds;
    let grid_end = rhythm.total_beats() * beat;
    let total = (last_end.max(grid_end) * sr).round() as usize;
    let mut buf = vec![0.0f64; total];

    for (note, onset) in melody.notes().iter().zip(&onsets) {
        let start = (onset * beat * sr).round() as usize;
        let len = (config.note_seconds * sr).round() as usize;
        for (i, sample) in buf.iter_mut().skip(start).take(len).enumerate() {
            let t = i as f64 / sr;
            *sample += triangle(note.frequency * t) * envelope_gain(t, config.note_seconds);
        }
    }

    log::debug!(
        "rendered {} notes into {} samples at {} Hz",
        melody.len(),
        total,
        config.sample_rate
    );
    Ok(buf.into_iter().map(|s| s.clamp(-1.0, 1.0) as f32).collect())
}

/// Write mono f32 samples to a 32-bit float WAV file.
pub fn write_wav(samples: &[f32], sample_rate: u32, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}
