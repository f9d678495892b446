// Riffgraph melody generator: CLI entry point.
//
// Generates one melody and prints it, then optionally exports it and plays it
// back on the console in real time.
//
// Usage:
//   cargo run -p riffgraph_music -- [--length N] [--scale NAME] [--seed N]
//     [--tempo BPM] [--catalog FILE] [--rhythm] [--json FILE] [--graph FILE]
//     [--midi FILE] [--wav FILE] [--play LOOPS] [--list-scales]
//
// Without --scale a scale is picked at random. Set RUST_LOG=debug for
// generator diagnostics.

use riffgraph_music::graph::MelodyGraph;
use riffgraph_music::midi::write_midi;
use riffgraph_music::playback::{DEFAULT_TEMPO, NoteSink, PlaybackScheduler, play_blocking};
use riffgraph_music::rhythm::{Rhythm, choose_rhythm};
use riffgraph_music::synth::{RenderConfig, render_melody, write_wav};
use riffgraph_music::{Note, Result, ScaleCatalog, generate_melody};
use riffgraph_prng::RiffRng;
use std::path::Path;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let length: usize = parse_flag(&args, "--length").unwrap_or(8);
    let scale: Option<String> = parse_flag(&args, "--scale");
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let tempo: u32 = parse_flag(&args, "--tempo").unwrap_or(DEFAULT_TEMPO);
    let catalog_path: Option<String> = parse_flag(&args, "--catalog");
    let json_path: Option<String> = parse_flag(&args, "--json");
    let graph_path: Option<String> = parse_flag(&args, "--graph");
    let midi_path: Option<String> = parse_flag(&args, "--midi");
    let wav_path: Option<String> = parse_flag(&args, "--wav");
    let loops: usize = parse_flag(&args, "--play").unwrap_or(0);
    let use_rhythm = has_flag(&args, "--rhythm");

    let catalog = match &catalog_path {
        Some(path) => {
            log::info!("loading catalog from {path}");
            ScaleCatalog::load(Path::new(path))?
        }
        None => ScaleCatalog::builtin()?,
    };

    if has_flag(&args, "--list-scales") {
        for s in catalog.scales() {
            let names: Vec<String> = s.pitches.iter().map(|p| p.to_string()).collect();
            println!("{:<12} {}", s.name, names.join(" "));
        }
        return Ok(());
    }

    let mut rng = match seed {
        Some(s) => RiffRng::new(s),
        None => RiffRng::from_time(),
    };

    let melody = generate_melody(&catalog, length, scale.as_deref(), &mut rng)?;
    let rhythm = if use_rhythm {
        choose_rhythm(melody.len(), &mut rng)
    } else {
        Rhythm::uniform(melody.len())
    };

    println!("=== Riffgraph ===");
    println!("Scale: {}", melody.scale());
    println!("Tempo: {tempo} BPM");
    if let Some(s) = seed {
        println!("Seed: {s}");
    }
    println!();
    for (i, (note, beats)) in melody.notes().iter().zip(rhythm.durations()).enumerate() {
        println!(
            "  {:>2}. {:<4} {:>7.2} Hz  {} beat(s)",
            i + 1,
            note.pitch.to_string(),
            note.frequency,
            beats
        );
    }

    if let Some(path) = &json_path {
        std::fs::write(path, melody.to_json()?)?;
        println!("Wrote melody JSON to {path}");
    }
    if let Some(path) = &graph_path {
        let graph = MelodyGraph::build(catalog.scale(melody.scale())?, &catalog)?;
        std::fs::write(path, serde_json::to_string_pretty(&graph)?)?;
        println!("Wrote graph JSON to {path}");
    }
    if let Some(path) = &midi_path {
        write_midi(&melody, Some(&rhythm), tempo, Path::new(path))?;
        println!("Wrote MIDI to {path}");
    }
    if let Some(path) = &wav_path {
        let config = RenderConfig {
            tempo_bpm: tempo,
            ..RenderConfig::default()
        };
        let samples = render_melody(&melody, Some(&rhythm), &config)?;
        write_wav(&samples, config.sample_rate, Path::new(path))?;
        println!(
            "Wrote WAV to {path} ({:.1}s)",
            samples.len() as f64 / config.sample_rate as f64
        );
    }

    if loops > 0 {
        println!();
        println!("Playing {loops} loop(s)...");
        let mut scheduler = PlaybackScheduler::with_rhythm(&melody, tempo, &rhythm)?;
        play_blocking(&mut scheduler, loops, &mut ConsoleSink);
    }

    Ok(())
}

/// Prints each note as it becomes current.
struct ConsoleSink;

impl NoteSink for ConsoleSink {
    fn note_on(&mut self, index: usize, note: &Note, slot: Duration) {
        println!(
            "  > {:>2}  {:<4} {:>7.2} Hz  ({} ms)",
            index + 1,
            note.pitch.to_string(),
            note.frequency,
            slot.as_millis()
        );
    }

    fn note_off(&mut self, _index: usize) {}
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Value following `flag`, parsed. Exits if the flag is present but its value
/// does not parse.
fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let i = args.iter().position(|a| a == flag)?;
    match args.get(i + 1).and_then(|v| v.parse().ok()) {
        Some(v) => Some(v),
        None => {
            eprintln!("{flag} requires a valid value");
            std::process::exit(1);
        }
    }
}
