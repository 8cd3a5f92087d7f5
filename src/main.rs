use std::error::Error;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use midicoll::converters::midi_to_coll;
use midicoll::markov::{self, Mode};
use midicoll::models::{Meter, Tick};
use midicoll::{tidy, transforms};

const USAGE: &str = "\
Usage: midicoll <command> [args]

Commands:
  tidyup <coll-file> <start-index> <beats-per-measure>
      Re-derive durations, ties, and measure groups from <start-index> on.
  import-file <midi-file> <coll-file>
      Decode one MIDI file into a raw collection.
  import-dir <midi-dir> <coll-dir>
      Decode <midi-dir>/<mood>/* into <coll-dir>/<mood>/<name>.txt.
  repeat <coll-file> <start> <end> <beats-per-measure>
      Append a copy of events [start, end) and re-tidy the seam.
  sequence <coll-file> <start> <end> <end-pitch> <beats-per-measure>
      Append a transposed copy of [start, end) ending on <end-pitch>.
  train <coll-dir> <mood> <major|minor> <beats-per-measure> [out-dir]
      Train pitch/onset transition tables from matching collections.

Set RUST_LOG to control log verbosity (default info).";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("tidyup") => {
            expect_args(&args, 3)?;
            let start_index: usize = parse_num(&args[2], "start index")?;
            let meter = parse_meter(&args[3])?;
            let outcome = tidy::tidy_file(Path::new(&args[1]), start_index, meter)?;
            println!("{:?}", outcome.groups.counts());
            Ok(())
        }
        Some("import-file") => {
            expect_args(&args, 2)?;
            let outcome =
                midi_to_coll::import_file(Path::new(&args[1]), Path::new(&args[2]))?;
            println!(
                "{} notes in {}/4",
                outcome.note_count, outcome.meter.beats_per_measure
            );
            Ok(())
        }
        Some("import-dir") => {
            expect_args(&args, 2)?;
            let imported = midi_to_coll::import_dir(Path::new(&args[1]), Path::new(&args[2]))?;
            println!("imported {} files", imported);
            Ok(())
        }
        Some("repeat") => {
            expect_args(&args, 4)?;
            let start: usize = parse_num(&args[2], "start")?;
            let end: usize = parse_num(&args[3], "end")?;
            let meter = parse_meter(&args[4])?;
            let outcome = transforms::repeat_file(Path::new(&args[1]), start, end, meter)?;
            println!("{:?}", outcome.groups.counts());
            Ok(())
        }
        Some("sequence") => {
            expect_args(&args, 5)?;
            let start: usize = parse_num(&args[2], "start")?;
            let end: usize = parse_num(&args[3], "end")?;
            let end_pitch: i32 = parse_num(&args[4], "end pitch")?;
            let meter = parse_meter(&args[5])?;
            let outcome =
                transforms::sequence_file(Path::new(&args[1]), start, end, end_pitch, meter)?;
            println!("{:?}", outcome.groups.counts());
            Ok(())
        }
        Some("train") => {
            if args.len() != 5 && args.len() != 6 {
                return Err(USAGE.into());
            }
            let mode = Mode::from_str(&args[3])?;
            let meter = parse_meter(&args[4])?;
            let out_dir = args.get(5).map(String::as_str).unwrap_or(".");
            let outcome = markov::train_dir(
                Path::new(&args[1]),
                &args[2],
                mode,
                meter,
                Path::new(out_dir),
            )?;
            println!(
                "trained {} tunes -> {}, {}",
                outcome.tune_count,
                outcome.pitch_path.display(),
                outcome.onset_path.display()
            );
            Ok(())
        }
        _ => Err(USAGE.into()),
    }
}

fn expect_args(args: &[String], operands: usize) -> Result<(), Box<dyn Error>> {
    if args.len() != operands + 1 {
        return Err(USAGE.into());
    }
    Ok(())
}

fn parse_meter(token: &str) -> Result<Meter, Box<dyn Error>> {
    let beats: Tick = parse_num(token, "beats per measure")?;
    if beats <= 0 {
        return Err(format!("beats per measure must be positive, got {}", beats).into());
    }
    Ok(Meter::with_beats(beats))
}

fn parse_num<T: FromStr>(token: &str, name: &str) -> Result<T, Box<dyn Error>>
where
    T::Err: Display,
{
    token
        .parse()
        .map_err(|e| format!("invalid {} '{}': {}", name, token, e).into())
}
