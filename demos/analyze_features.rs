//! Example: Analyze pre-extracted feature files
//!
//! Usage:
//!   cargo run --release --example analyze_features -- [--mode chords|bass] [--timesig 3/4] [--bars] [--json] <file1.json> <file2.json> ...
//!
//! Files are analyzed in parallel; results print in argument order.

use std::sync::Arc;

use chordgrid::analysis::nashville::to_nashville;
use chordgrid::io::feature_file::FeatureFiles;
use chordgrid::{analyze_batch, AnalysisConfig, AnalysisMode, AnalysisResult, Segments, TimeSignature};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "analyze_features", about = "Chord and bass-tab recognition from feature files")]
struct Args {
    /// Feature JSON files
    #[arg(required = true)]
    files: Vec<String>,

    /// Analysis mode: chords or bass
    #[arg(long, default_value = "chords")]
    mode: AnalysisMode,

    /// Time signature: 4/4, 3/4 or 6/8
    #[arg(long, default_value = "4/4")]
    timesig: TimeSignature,

    /// Quantize chord segments to bars
    #[arg(long)]
    bars: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn print_table(result: &AnalysisResult) {
    println!("== {} ==", result.source);
    print!(
        "Mode: {}  BPM: {:.1}  Time: {}",
        result.mode.name(),
        result.bpm,
        result.time_signature
    );
    if let Some(key) = &result.key {
        print!("  Key: {}", key.name());
    }
    println!();

    match &result.segments {
        Segments::Chords(segments) => {
            for seg in segments {
                let number = result
                    .key
                    .as_ref()
                    .map(|k| to_nashville(&seg.chord, k))
                    .unwrap_or_default();
                println!(
                    "{:>8.2} - {:>8.2}  {:<7} {}",
                    seg.start, seg.end, seg.chord, number
                );
            }
        }
        Segments::Bass(bars) => {
            for (i, bar) in bars.iter().enumerate() {
                let notes: Vec<&str> = bar.notes.iter().map(|n| n.note_name.as_str()).collect();
                let tabs: Vec<&str> = bar.tabs.iter().map(|t| t.display.as_str()).collect();
                println!(
                    "bar {:>3} [{:>7.2}]  {:<20} | {}",
                    i + 1,
                    bar.start,
                    notes.join(" "),
                    tabs.join(" ")
                );
            }
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = AnalysisConfig {
        mode: args.mode,
        time_signature: args.timesig,
        quantize_bars: args.bars,
        ..AnalysisConfig::default()
    };

    let files = Arc::new(FeatureFiles);
    let results = analyze_batch(&args.files, files.clone(), files, &config);

    let mut failures = 0;
    for (path, result) in args.files.iter().zip(results) {
        match result {
            Ok(result) if args.json => match serde_json::to_string_pretty(&result) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("{}: cannot serialize result: {}", path, e);
                    failures += 1;
                }
            },
            Ok(result) => print_table(&result),
            Err(e) => {
                eprintln!("{}: {}", path, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
