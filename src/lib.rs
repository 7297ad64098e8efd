//! # bpm-scan
//!
//! Tempo (BPM) detection from low-passed mono PCM, either over a complete
//! buffer or over a real-time feed of fixed-size chunks.
//!
//! ## Features
//!
//! - **Offline analysis**: one pure function, buffer and sample rate in,
//!   ranked tempo candidates out
//! - **Streaming analysis**: a session that accumulates peaks across chunk
//!   boundaries, recomputes the tempo after every chunk, prunes low-confidence
//!   history once it stabilizes and can restart itself for unbounded streams
//!
//! ## Quick Start
//!
//! ```no_run
//! use bpm_scan::{analyze_full_buffer, AnalysisConfig};
//!
//! // Low-passed mono samples
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100.0;
//!
//! let candidates = analyze_full_buffer(&samples, sample_rate, &AnalysisConfig::default())?;
//! if let Some(best) = candidates.first() {
//!     println!("BPM: {} ({} supporting intervals)", best.tempo, best.count);
//! }
//! # Ok::<(), bpm_scan::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Threshold ladder → Peak detection → Interval histogram → Tempo folding → Ranking
//! ```
//!
//! The offline analyzer runs the pipeline once at the best threshold; the
//! streaming analyzer keeps peaks for every threshold and reruns the back half
//! of the pipeline after each chunk. Filtering, decoding and device I/O are
//! left to the host.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod streaming;

// Re-export main types
pub use analysis::compute::compute_bpm;
pub use analysis::result::BpmCandidates;
pub use config::{AnalysisConfig, StreamConfig};
pub use error::AnalysisError;
pub use features::period::candidate_filter::{top_candidate, top_candidates};
pub use features::period::{Interval, Tempo};
pub use streaming::analyzer::{RealtimeBpmAnalyzer, SessionState};
pub use streaming::event::AnalyzerEvent;

use analysis::compute::tempo_candidates;
use error::validate_sample_rate;
use features::onset::peak_detection::find_best_threshold;

/// Analyze a complete buffer
///
/// Finds the highest threshold yielding enough peaks, builds the interval
/// histogram of those peaks and returns the best tempo candidates.
///
/// # Arguments
///
/// * `samples` - Low-passed mono samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Detection parameters
///
/// # Returns
///
/// Up to `config.top_candidates` candidates, best first. Empty when no
/// threshold yields enough peaks (silence, noise floor, short clips).
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer, a non-positive
/// sample rate or an invalid `config`
///
/// # Example
///
/// ```
/// use bpm_scan::{analyze_full_buffer, AnalysisConfig};
///
/// // 120 BPM click track, 20 seconds
/// let sample_rate = 44100.0;
/// let samples: Vec<f32> = (0..44100 * 20)
///     .map(|i| if i % 22050 == 0 { 0.9 } else { 0.0 })
///     .collect();
/// let candidates = analyze_full_buffer(&samples, sample_rate, &AnalysisConfig::default())?;
/// assert_eq!(candidates[0].tempo, 120);
/// # Ok::<(), bpm_scan::AnalysisError>(())
/// ```
pub fn analyze_full_buffer(
    samples: &[f32],
    sample_rate: f32,
    config: &AnalysisConfig,
) -> Result<Vec<Tempo>, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting tempo analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    validate_sample_rate(sample_rate)?;
    config.validate()?;

    let scan = find_best_threshold(samples, sample_rate, config)?;
    let candidates = tempo_candidates(&scan.peaks, sample_rate, config)?;

    log::debug!(
        "Tempo analysis done in {:.2} ms: threshold {:.2}, {} peaks, {} candidates",
        start_time.elapsed().as_secs_f32() * 1000.0,
        scan.threshold,
        scan.peaks.len(),
        candidates.len()
    );

    Ok(candidates)
}
