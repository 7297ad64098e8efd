//! Performance benchmarks for tempo analysis

use bpm_scan::{analyze_full_buffer, AnalysisConfig, RealtimeBpmAnalyzer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SAMPLE_RATE: f32 = 44100.0;
const CHUNK: usize = 4096;

/// 30 seconds of 120 BPM kicks: decaying bursts over a quiet bed
fn kick_track() -> Vec<f32> {
    (0..44100 * 30)
        .map(|i| {
            let phase = (i % 22050) as f32;
            let bed = (i as f32 * 110.0 * 2.0 * std::f32::consts::PI / SAMPLE_RATE).sin() * 0.1;
            bed + 0.9 * (-phase / 800.0).exp()
        })
        .collect()
}

fn bench_analyze_full_buffer(c: &mut Criterion) {
    let samples = kick_track();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_full_buffer_30s", |b| {
        b.iter(|| {
            let _ = analyze_full_buffer(black_box(&samples), black_box(SAMPLE_RATE), &config);
        });
    });
}

fn bench_push_chunk(c: &mut Criterion) {
    let samples = kick_track();

    // Cost of one chunk against a session that has already accumulated history
    c.bench_function("push_chunk_4096", |b| {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let mut chunks = samples.chunks_exact(CHUNK).cycle();
        b.iter(|| {
            let chunk = chunks.next().unwrap_or(&[]);
            if analyzer
                .push_chunk(black_box(chunk), SAMPLE_RATE, CHUNK, |event| {
                    black_box(event);
                })
                .is_err()
            {
                analyzer.reset();
            }
        });
    });
}

criterion_group!(benches, bench_analyze_full_buffer, bench_push_chunk);
criterion_main!(benches);
