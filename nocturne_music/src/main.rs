// Nocturne — CLI entry point.
//
// Generates a two-hand piano piece and writes it to a MIDI file.
//
// Usage:
//   cargo run -p nocturne_music -- [output.mid] [--config FILE] [--pattern P]
//     [--seed N] [--tempo BPM] [--transpose SEMITONES] [--sustain]
//
// A JSON config file (see SongConfig) sets every parameter; flags override
// it. Without a config file the built-in defaults are used.

use nocturne_music::config::SongConfig;
use nocturne_music::song::Song;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("output.mid");

    println!("=== Nocturne Piano Generator ===");

    println!("[1/3] Loading configuration...");
    let from_file = parse_flag::<String>(&args, "--config").is_some();
    let mut config = match parse_flag::<String>(&args, "--config") {
        Some(path) => match load_config(&path) {
            Ok(cfg) => {
                println!("  Loaded {path}.");
                cfg
            }
            Err(e) => {
                eprintln!("  Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("  Using default configuration.");
            SongConfig::default()
        }
    };

    if let Some(tempo) = parse_flag(&args, "--tempo") {
        config.bpm = tempo;
    }
    if let Some(transpose) = parse_flag(&args, "--transpose") {
        config.transpose = transpose;
    }
    if args.iter().any(|a| a == "--sustain") {
        config.sustain = true;
    }
    // Flag beats config file; a file's seed is honored; otherwise seed
    // from the clock so plain runs differ.
    if let Some(seed) = parse_flag(&args, "--seed") {
        config.seed = seed;
    } else if !from_file {
        config.seed = time_seed();
    }

    let pattern = parse_flag::<String>(&args, "--pattern")
        .or_else(|| config.pattern.clone())
        .unwrap_or_else(|| "AABA".to_string());
    config.pattern = None;

    println!("  Tempo: {} BPM", config.bpm);
    println!("  Transpose: {} semitones", config.transpose);
    println!("  Pattern: {pattern}");
    println!("  Seed: {}", config.seed);

    println!("[2/3] Generating \"{pattern}\"...");
    let mut song = match Song::new(config) {
        Ok(song) => song,
        Err(e) => {
            eprintln!("  {e}");
            std::process::exit(1);
        }
    };
    song.set_observer(|msg| println!("  {msg}"));

    if let Err(e) = song.generate(&pattern) {
        eprintln!("  {e}");
        std::process::exit(1);
    }
    println!(
        "  {} left-hand events, {} right-hand events.",
        song.left_hand().len(),
        song.right_hand().len()
    );

    println!("[3/3] Writing MIDI to {output_path}...");
    let data = match song.midi_data() {
        Ok(data) => data,
        Err(e) => {
            eprintln!("  {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(output_path, data) {
        eprintln!("  Error writing {output_path}: {e}");
        std::process::exit(1);
    }
    println!("  Done! {} bytes.", data.len());

    println!();
    println!("Play with: timidity {output_path} (or any MIDI player)");
}

fn load_config(path: &str) -> Result<SongConfig, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let config: SongConfig = serde_json::from_str(&text)?;
    Ok(config)
}

/// Seed for runs without an explicit `--seed`: the current time in nanos.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
