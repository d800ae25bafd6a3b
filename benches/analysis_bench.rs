//! Performance benchmarks for chord and bass analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chordgrid::features::chord::{cost_matrix, ChordTemplates, ViterbiSmoother};
use chordgrid::io::{BassFeatures, ChordFeatures};
use chordgrid::{analyze_bass, analyze_chords, AnalysisConfig, AnalysisMode};
use ndarray::Array2;

/// Roughly four minutes at 120 BPM, cycling I-vi-IV-V in C
fn synthetic_chords(n_beats: usize) -> ChordFeatures {
    let progression: [&[usize]; 4] = [&[0, 4, 7], &[9, 0, 4], &[5, 9, 0], &[7, 11, 2]];
    let mut chroma = Array2::<f32>::from_elem((12, n_beats), 0.05);
    for t in 0..n_beats {
        for &pc in progression[(t / 4) % 4] {
            chroma[[pc, t]] = 1.0;
        }
    }
    ChordFeatures {
        chroma,
        beat_times: (0..n_beats).map(|i| i as f32 * 0.5).collect(),
        tempo_bpm: 120.0,
        duration_seconds: n_beats as f32 * 0.5,
    }
}

fn synthetic_bass(n_beats: usize) -> BassFeatures {
    // 22050 Hz / 512 hop ≈ 43 frames per second
    let n_frames = (n_beats as f32 * 0.5 * 22050.0 / 512.0).ceil() as usize;
    let pitches = Array2::<f32>::from_shape_fn((24, n_frames), |(bin, _)| 41.2 + bin as f32 * 8.0);
    let magnitudes =
        Array2::<f32>::from_shape_fn((24, n_frames), |(bin, frame)| ((bin * 7 + frame) % 13) as f32);
    BassFeatures {
        pitches,
        magnitudes,
        sample_rate: 22050,
        hop_length: 512,
        beat_times: (0..n_beats).map(|i| i as f32 * 0.5).collect(),
        tempo_bpm: 120.0,
        duration_seconds: n_beats as f32 * 0.5,
    }
}

fn bench_analyze_chords(c: &mut Criterion) {
    let features = synthetic_chords(480);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_chords_480_beats", |b| {
        b.iter(|| {
            let _ = analyze_chords(black_box("bench"), black_box(&features), black_box(&config));
        });
    });
}

fn bench_viterbi(c: &mut Criterion) {
    let features = synthetic_chords(480);
    let costs = cost_matrix(&features.chroma, ChordTemplates::shared(), 1e-9)
        .unwrap_or_else(|_| Array2::zeros((480, 60)));
    let smoother = ViterbiSmoother::new(0.4, 0.6);

    c.bench_function("viterbi_decode_480x60", |b| {
        b.iter(|| {
            let _ = smoother.decode(black_box(&costs));
        });
    });
}

fn bench_analyze_bass(c: &mut Criterion) {
    let features = synthetic_bass(480);
    let config = AnalysisConfig {
        mode: AnalysisMode::Bass,
        ..AnalysisConfig::default()
    };

    c.bench_function("analyze_bass_480_beats", |b| {
        b.iter(|| {
            let _ = analyze_bass(black_box("bench"), black_box(&features), black_box(&config));
        });
    });
}

criterion_group!(benches, bench_analyze_chords, bench_viterbi, bench_analyze_bass);
criterion_main!(benches);
