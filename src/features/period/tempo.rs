//! Interval to tempo conversion
//!
//! Raw intervals are converted to BPM and folded into the canonical band by
//! octaves, since half/double tempo aliasing dominates out-of-band readings.

use super::{Interval, Tempo};
use crate::config::AnalysisConfig;
use crate::error::{validate_sample_rate, AnalysisError};

/// Fold a BPM value into `[min_bpm, max_bpm]` by doubling or halving
///
/// Returns `bpm` unchanged if it is not a positive finite value or the band
/// does not satisfy `0 < min_bpm < max_bpm`.
pub fn fold_into_band(mut bpm: f64, min_bpm: f64, max_bpm: f64) -> f64 {
    if !bpm.is_finite() || bpm <= 0.0 {
        return bpm;
    }
    if !(min_bpm > 0.0 && min_bpm < max_bpm && max_bpm.is_finite()) {
        return bpm;
    }
    while bpm < min_bpm {
        bpm *= 2.0;
    }
    while bpm > max_bpm {
        bpm /= 2.0;
    }
    bpm
}

/// Group intervals by the tempo they imply
///
/// # Arguments
///
/// * `sample_rate` - Sample rate the intervals were measured at
/// * `intervals` - Output of `identify_intervals`
/// * `config` - Supplies the canonical band
///
/// # Returns
///
/// One `Tempo` per distinct rounded BPM, counts summed, in order of first
/// appearance. Zero-distance intervals are skipped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `sample_rate` is not positive or
/// `config` fails validation
pub fn group_by_tempo(
    sample_rate: f32,
    intervals: &[Interval],
    config: &AnalysisConfig,
) -> Result<Vec<Tempo>, AnalysisError> {
    validate_sample_rate(sample_rate)?;
    config.validate()?;

    let mut tempos: Vec<Tempo> = Vec::new();

    for interval in intervals {
        if interval.interval == 0 {
            continue;
        }

        let raw_bpm = 60.0 / (interval.interval as f64 / sample_rate as f64);
        let bpm = fold_into_band(raw_bpm, config.min_bpm as f64, config.max_bpm as f64);
        let tempo = bpm.round() as u32;

        match tempos.iter_mut().find(|t| t.tempo == tempo) {
            Some(existing) => existing.count += interval.count,
            None => tempos.push(Tempo {
                tempo,
                count: interval.count,
                confidence: 0.0,
            }),
        }
    }

    Ok(tempos)
}
