// MIDI output for generated melodies.
//
// Converts a Melody (plus rhythm and tempo) into a Standard MIDI File:
// format 1, track 0 carries the tempo, track 1 carries the melody as a
// single monophonic line. Pitches map to MIDI keys with C4 = 60, beats to
// 480 ticks per quarter note.
//
// Uses the `midly` crate for writing.

use crate::error::{Error, Result};
use crate::generator::Melody;
use crate::playback::beat_duration;
use crate::rhythm::Rhythm;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note (one beat).
const TICKS_PER_BEAT: u16 = 480;

const CHANNEL: u8 = 0;
const VELOCITY: u8 = 80;
/// General MIDI acoustic grand piano.
const PROGRAM: u8 = 0;

/// Build an in-memory SMF for `melody`. `rhythm` of `None` gives one beat per
/// note; a shorter rhythm is cycled.
pub fn melody_to_smf(
    melody: &Melody,
    rhythm: Option<&Rhythm>,
    tempo_bpm: u32,
) -> Result<Smf<'static>> {
    if melody.is_empty() {
        return Err(Error::InvalidLength(0));
    }
    beat_duration(tempo_bpm)?;

    let durations = match rhythm {
        Some(r) => r.fit(melody.len()),
        None => Rhythm::uniform(melody.len()),
    };

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_BEAT)),
    ));

    let tempo_microseconds = 60_000_000 / tempo_bpm;
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);

    let channel = u4::new(CHANNEL);
    let mut track: Track<'static> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName("Melody".as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(PROGRAM),
                },
            },
        },
    ];

    for (note, &beats) in melody.notes().iter().zip(durations.durations()) {
        let key = u8::try_from(note.pitch.midi_key())
            .ok()
            .filter(|&k| k <= 127)
            .map(u7::new)
            .ok_or_else(|| Error::Midi(format!("{} is above MIDI key 127", note.pitch)))?;
        let ticks = (beats * TICKS_PER_BEAT as f64).round() as u32;
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(VELOCITY),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(ticks),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    Ok(smf)
}

/// Write `melody` as a MIDI file.
pub fn write_midi(
    melody: &Melody,
    rhythm: Option<&Rhythm>,
    tempo_bpm: u32,
    path: &Path,
) -> Result<()> {
    let smf = melody_to_smf(melody, rhythm, tempo_bpm)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}
