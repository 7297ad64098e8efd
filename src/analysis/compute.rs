//! Tempo computation over accumulated peaks
//!
//! Picks the highest threshold whose accumulated peaks are numerous enough
//! and runs its peaks through the interval histogram and tempo grouping.

use super::result::BpmCandidates;
use crate::config::AnalysisConfig;
use crate::error::{validate_sample_rate, AnalysisError};
use crate::features::onset::threshold::descending_over_thresholds;
use crate::features::period::candidate_filter::top_candidates;
use crate::features::period::intervals::identify_intervals;
use crate::features::period::tempo::group_by_tempo;
use crate::features::period::Tempo;
use crate::streaming::state::ThresholdBank;

/// Rank tempo candidates from a set of peaks
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `sample_rate` is not positive or
/// `config` fails validation
pub fn tempo_candidates(
    peaks: &[usize],
    sample_rate: f32,
    config: &AnalysisConfig,
) -> Result<Vec<Tempo>, AnalysisError> {
    let intervals = identify_intervals(peaks, config.interval_lookahead);
    let tempos = group_by_tempo(sample_rate, &intervals, config)?;
    Ok(top_candidates(&tempos, config.top_candidates))
}

/// Compute tempo candidates from the peaks retained in `bank`
///
/// Walks the thresholds from the top down to the bank's floor and uses the
/// first one holding strictly more than `config.min_peaks` peaks.
///
/// # Returns
///
/// Candidates with the threshold they came from, or no candidates with the
/// floor threshold echoed back if no threshold qualifies
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `sample_rate` is not positive or
/// `config` fails validation
pub fn compute_bpm(
    bank: &ThresholdBank,
    sample_rate: f32,
    config: &AnalysisConfig,
) -> Result<BpmCandidates, AnalysisError> {
    validate_sample_rate(sample_rate)?;
    config.validate()?;

    let floor = bank.floor();
    let mut found = None;

    descending_over_thresholds(floor.value(), |threshold| {
        match bank.valid_peaks(threshold) {
            Some(peaks) if peaks.len() > config.min_peaks => {
                found = Some((threshold, peaks));
                true
            }
            _ => false,
        }
    });

    let Some((threshold, peaks)) = found else {
        log::trace!("No threshold above {:.2} has enough peaks yet", floor.value());
        return Ok(BpmCandidates::empty(floor.value()));
    };

    let bpm = tempo_candidates(peaks, sample_rate, config)?;
    log::debug!(
        "Threshold {:.2}: {} peaks, top tempo {:?}",
        threshold.value(),
        peaks.len(),
        bpm.first().map(|t| t.tempo)
    );

    Ok(BpmCandidates {
        bpm,
        threshold: threshold.value(),
    })
}
