// Chordsmith — CLI entry point.
//
// Writes a piece in the requested genre and key, optionally mixes it with a
// second piece or spreads it over a five-part symphony, and renders the
// result to a MIDI file.
//
// Usage:
//   cargo run -p chordsmith_music -- [output.mid] [--genre GENRE] [--key KEY]
//     [--mode MODE] [--variation N] [--name NAME] [--seed N] [--rerun]
//     [--change-key] [--symphony] [--mix-with GENRE:KEY:MODE:VARIATION]
//     [--harmonize] [--config PATH]
//
// Genres: jazz, pop, country. Log output is controlled with RUST_LOG.

use std::path::Path;

use chordsmith_music::midi::{MidiRenderer, write_midi};
use chordsmith_music::{
    Composer, ComposerConfig, Genre, Piece, Renderer, SequenceOptions, SymphonyRequest,
};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("output.mid");
    let genre: Genre = parse_flag(&args, "--genre").unwrap_or(Genre::Jazz);
    let key: String = parse_flag(&args, "--key").unwrap_or_else(|| "C".to_string());
    let mode: String = parse_flag(&args, "--mode").unwrap_or_else(|| "major".to_string());
    let variation: i64 = parse_flag(&args, "--variation").unwrap_or(3);
    let name: String = parse_flag(&args, "--name").unwrap_or_else(|| "untitled".to_string());
    let seed: u64 = parse_flag(&args, "--seed").unwrap_or(0);
    let mix_with: Option<String> = parse_flag(&args, "--mix-with");
    let config_path: Option<String> = parse_flag(&args, "--config");
    let options = SequenceOptions {
        rerun: has_flag(&args, "--rerun"),
        change_key: has_flag(&args, "--change-key"),
    };

    println!("=== Chordsmith ===");
    println!("Output: {}", output_path);
    println!("Piece: '{}' ({} in {} {}, variation {})", name, genre, key, mode, variation);
    println!("Seed: {}", seed);
    println!();

    let config = match config_path {
        Some(path) => {
            println!("Loading config from {}...", path);
            ComposerConfig::load(Path::new(&path))?
        }
        None => ComposerConfig::default(),
    };
    let mut composer = Composer::seeded(config, seed);

    println!("[1/3] Sequencing...");
    let mut piece = composer.create_piece(genre, &name, &key, &mode, variation)?;
    composer.sequence(&mut piece, options)?;
    print_chords(&piece);

    let piece = match mix_with {
        Some(spec) => {
            println!("[2/3] Mixing with {}...", spec);
            let mut other = parse_piece(&composer, &spec)?;
            composer.sequence(&mut other, options)?;
            print_chords(&other);
            let mixed = composer.mix(&piece, &other, has_flag(&args, "--harmonize"))?;
            println!("  '{}': {} chords", mixed.name(), mixed.chord_tracks().len());
            mixed
        }
        None => {
            println!("[2/3] No mix requested.");
            piece
        }
    };

    let mut renderer = MidiRenderer;
    let bytes = if has_flag(&args, "--symphony") {
        println!("[3/3] Arranging symphony...");
        let arrangement = composer.generate_symphony(&piece, SymphonyRequest::default())?;
        for (i, track) in arrangement.tracks.iter().enumerate() {
            let role = if i < 2 { "lead" } else { "rhythm" };
            println!(
                "  {} {}: instrument {} at {}%",
                role,
                i + 1,
                track.instrument,
                track.volume_percent
            );
        }
        renderer.render_arrangement(&arrangement)?
    } else {
        println!("[3/3] Rendering...");
        let settings = composer.render_settings(piece.genre());
        println!(
            "  {} BPM, instrument {}",
            settings.tempo_bpm, settings.instrument
        );
        renderer.render_tracks(piece.chord_tracks(), &settings)?
    };

    write_midi(&bytes, Path::new(output_path))?;
    println!("  Wrote {} bytes to {}", bytes.len(), output_path);
    Ok(())
}

/// `GENRE:KEY:MODE:VARIATION`, e.g. `pop:G:major:2`.
fn parse_piece(
    composer: &Composer,
    spec: &str,
) -> Result<Piece, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    let &[genre, key, mode, variation] = parts.as_slice() else {
        return Err(format!("expected GENRE:KEY:MODE:VARIATION, got '{}'", spec).into());
    };
    let genre = Genre::parse(genre)?;
    let variation: i64 = variation.parse()?;
    Ok(composer.create_piece(genre, spec, key, mode, variation)?)
}

fn print_chords(piece: &Piece) {
    let names: Vec<String> = piece.raw_chords().iter().map(|c| c.to_string()).collect();
    println!("  '{}': {} chords", piece.name(), names.len());
    for line in names.chunks(4) {
        println!("    {}", line.join(" | "));
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
