// Timed playback of a finished melody.
//
// `PlaybackScheduler` is a clock-free state machine: the caller feeds it
// elapsed time through `advance` and gets back the note events that fell due.
// Tempo sets the length of one beat (60 / bpm seconds); each note occupies
// `beat * rhythm_duration` seconds and stays "current" for the first 80% of
// that slot, after which there is no current note until the next one starts.
// After the last note the scheduler wraps straight back to the first and
// counts a completed loop.
//
// The scheduler only borrows the melody and never mutates it.
//
// `play_blocking` drives a scheduler in real time with `std::thread::sleep`
// and forwards events to a `NoteSink` (console output and audio triggers in
// the CLI).

use crate::error::{Error, Result};
use crate::generator::{Melody, Note};
use crate::rhythm::Rhythm;
use std::time::Duration;

pub const MIN_TEMPO: u32 = 60;
pub const MAX_TEMPO: u32 = 180;
pub const DEFAULT_TEMPO: u32 = 120;

/// Fraction of a note's slot during which it is highlighted as current.
pub const HIGHLIGHT_FRACTION: f64 = 0.8;

/// Slack for float accumulation when comparing the clock against a deadline.
const EPSILON: f64 = 1e-9;

/// Length of one beat at `bpm`. Tempo must lie in `MIN_TEMPO..=MAX_TEMPO`.
pub fn beat_duration(bpm: u32) -> Result<Duration> {
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&bpm) {
        return Err(Error::InvalidTempo(bpm));
    }
    Ok(Duration::from_secs_f64(60.0 / bpm as f64))
}

/// A change in which note is current.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// Note `index` became current and should sound for `slot` seconds.
    NoteOn { index: usize, note: Note, slot: f64 },
    /// Note `index` is no longer highlighted.
    NoteOff { index: usize },
}

/// Receives playback events from `play_blocking`.
pub trait NoteSink {
    fn note_on(&mut self, index: usize, note: &Note, slot: Duration);
    fn note_off(&mut self, index: usize);
}

#[derive(Debug, Clone)]
pub struct PlaybackScheduler<'a> {
    melody: &'a Melody,
    /// Seconds per note slot, one per melody note.
    slots: Vec<f64>,
    playing: bool,
    index: usize,
    /// Seconds elapsed inside the current slot.
    into_slot: f64,
    highlighted: bool,
    loops: usize,
}

impl<'a> PlaybackScheduler<'a> {
    /// One beat per note at `tempo_bpm`.
    pub fn new(melody: &'a Melody, tempo_bpm: u32) -> Result<Self> {
        Self::with_rhythm(melody, tempo_bpm, &Rhythm::uniform(melody.len()))
    }

    /// Note slots follow `rhythm`, cycled if it is shorter than the melody.
    pub fn with_rhythm(melody: &'a Melody, tempo_bpm: u32, rhythm: &Rhythm) -> Result<Self> {
        if melody.is_empty() {
            return Err(Error::InvalidLength(0));
        }
        let beat = beat_duration(tempo_bpm)?.as_secs_f64();
        let slots = rhythm
            .fit(melody.len())
            .durations()
            .iter()
            .map(|d| beat * d)
            .collect();

        Ok(PlaybackScheduler {
            melody,
            slots,
            playing: false,
            index: 0,
            into_slot: 0.0,
            highlighted: false,
            loops: 0,
        })
    }

    /// Begin playback on the first note.
    pub fn start(&mut self) -> Vec<PlaybackEvent> {
        self.playing = true;
        self.index = 0;
        self.into_slot = 0.0;
        self.loops = 0;
        self.highlighted = true;
        vec![self.note_on()]
    }

    /// Stop playback. Releases the current note if one is highlighted.
    pub fn stop(&mut self) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if self.highlighted {
            events.push(PlaybackEvent::NoteOff { index: self.index });
        }
        self.playing = false;
        self.highlighted = false;
        self.into_slot = 0.0;
        events
    }

    /// Move the clock forward by `dt` seconds and return every event that
    /// fell due, in order.
    pub fn advance(&mut self, dt: f64) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if !self.playing {
            return events;
        }
        self.into_slot += dt.max(0.0);

        loop {
            let slot = self.slots[self.index];
            if self.highlighted && self.into_slot + EPSILON >= slot * HIGHLIGHT_FRACTION {
                self.highlighted = false;
                events.push(PlaybackEvent::NoteOff { index: self.index });
            }
            if self.into_slot + EPSILON < slot {
                break;
            }
            self.into_slot = (self.into_slot - slot).max(0.0);
            self.index += 1;
            if self.index == self.slots.len() {
                self.index = 0;
                self.loops += 1;
            }
            self.highlighted = true;
            events.push(self.note_on());
        }
        events
    }

    /// Seconds until the next event, or `None` when stopped.
    pub fn time_until_next_event(&self) -> Option<f64> {
        if !self.playing {
            return None;
        }
        let slot = self.slots[self.index];
        let due = if self.highlighted {
            slot * HIGHLIGHT_FRACTION
        } else {
            slot
        };
        Some((due - self.into_slot).max(0.0))
    }

    /// Index of the highlighted note, if any.
    pub fn current_index(&self) -> Option<usize> {
        (self.playing && self.highlighted).then_some(self.index)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Number of times playback has wrapped from the last note to the first.
    pub fn loops_completed(&self) -> usize {
        self.loops
    }

    fn note_on(&self) -> PlaybackEvent {
        PlaybackEvent::NoteOn {
            index: self.index,
            note: self.melody.notes()[self.index],
            slot: self.slots[self.index],
        }
    }
}

/// Play `loops` full passes of the scheduler's melody in real time.
pub fn play_blocking(scheduler: &mut PlaybackScheduler<'_>, loops: usize, sink: &mut impl NoteSink) {
    if loops == 0 {
        return;
    }
    dispatch(scheduler.start(), sink);

    'outer: while let Some(wait) = scheduler.time_until_next_event() {
        std::thread::sleep(Duration::from_secs_f64(wait));
        for event in scheduler.advance(wait) {
            let wrapped = matches!(event, PlaybackEvent::NoteOn { index: 0, .. });
            if wrapped && scheduler.loops_completed() >= loops {
                break 'outer;
            }
            dispatch(vec![event], sink);
        }
    }
    // The wrap note was never dispatched, so its release is dropped too.
    scheduler.stop();
    log::debug!("playback finished after {loops} loop(s)");
}

fn dispatch(events: Vec<PlaybackEvent>, sink: &mut impl NoteSink) {
    for event in events {
        match event {
            PlaybackEvent::NoteOn { index, note, slot } => {
                sink.note_on(index, &note, Duration::from_secs_f64(slot))
            }
            PlaybackEvent::NoteOff { index } => sink.note_off(index),
        }
    }
}
