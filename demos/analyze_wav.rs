//! Example: Analyze a WAV file offline and as a simulated real-time stream
//!
//! Usage: `cargo run --example analyze_wav -- <file.wav> [--continuous]`
//!
//! The detector expects low-passed input; run the file through a low-pass
//! filter first for results comparable to a live host.

use bpm_scan::{
    analyze_full_buffer, AnalysisConfig, AnalyzerEvent, BpmCandidates, RealtimeBpmAnalyzer,
    StreamConfig,
};

/// Render quantum size of typical audio hosts
const QUANTUM: usize = 128;

/// Load a WAV file as mono f32 samples
fn load_wav(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mono = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .ok_or("Usage: analyze_wav <file.wav> [--continuous]")?;
    let continuous = args.iter().any(|arg| arg == "--continuous");

    let (samples, sample_rate) = load_wav(path)?;
    let sample_rate = sample_rate as f32;
    log::info!(
        "Loaded {}: {:.1}s at {} Hz",
        path,
        samples.len() as f32 / sample_rate,
        sample_rate
    );

    // Offline
    let candidates = analyze_full_buffer(&samples, sample_rate, &AnalysisConfig::default())?;
    println!("Offline candidates:");
    for candidate in &candidates {
        println!("  {:>3} BPM  (count {})", candidate.tempo, candidate.count);
    }

    // Streaming
    let config = StreamConfig {
        continuous_analysis: continuous,
        ..Default::default()
    };
    let mut analyzer = RealtimeBpmAnalyzer::new(config)?;
    let mut latest: Option<BpmCandidates> = None;

    for (n, quantum) in samples.chunks(QUANTUM).enumerate() {
        let seconds = (n * QUANTUM) as f32 / sample_rate;
        analyzer.process_frames(quantum, sample_rate, |event| match event {
            AnalyzerEvent::Bpm(result) => latest = Some(result),
            AnalyzerEvent::BpmStable(result) => {
                log::info!(
                    "{:>7.2}s stable: {:?} BPM at threshold {:.2}",
                    seconds,
                    result.top().ok(),
                    result.threshold
                );
            }
            AnalyzerEvent::AnalyzerReset => log::info!("{:>7.2}s analyzer reset", seconds),
            AnalyzerEvent::Error(e) => log::warn!("{:>7.2}s {}", seconds, e),
            _ => {}
        })?;
    }

    if let Some(result) = latest {
        println!("Streaming result:");
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
