//! Threshold-crossing peak detection
//!
//! Finds beat transients in an already low-passed mono channel by scanning for
//! samples above a confidence threshold. After each hit the scan skips the
//! transient's decay so one physical beat yields one peak.

use super::threshold::{descending_over_thresholds, THRESHOLD_FLOOR};
use super::PeakScan;
use crate::config::AnalysisConfig;
use crate::error::{validate_sample_rate, AnalysisError};

/// Find peaks above `threshold`, scanning from `offset`
///
/// # Arguments
///
/// * `data` - Mono samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `threshold` - Normalized amplitude in [0.0, 1.0]
/// * `offset` - Index the scan starts at
/// * `config` - Supplies the peak decay duration
///
/// # Returns
///
/// Indices (relative to `data`) of samples strictly above `threshold`,
/// separated by at least the peak decay
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `threshold` is outside [0, 1] or
/// `sample_rate` is not positive
///
/// # Example
///
/// ```
/// use bpm_scan::config::AnalysisConfig;
/// use bpm_scan::features::onset::peak_detection::find_peaks_at_threshold;
///
/// let mut data = vec![0.0f32; 44100];
/// data[100] = 0.9;
/// data[30000] = 0.9;
/// let scan = find_peaks_at_threshold(&data, 44100.0, 0.5, 0, &AnalysisConfig::default())?;
/// assert_eq!(scan.peaks, vec![100, 30000]);
/// # Ok::<(), bpm_scan::AnalysisError>(())
/// ```
pub fn find_peaks_at_threshold(
    data: &[f32],
    sample_rate: f32,
    threshold: f32,
    offset: usize,
    config: &AnalysisConfig,
) -> Result<PeakScan, AnalysisError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AnalysisError::InvalidInput(format!(
            "Threshold must be in [0.0, 1.0], got {}",
            threshold
        )));
    }
    validate_sample_rate(sample_rate)?;

    let skip = config.peak_decay_samples(sample_rate);
    let mut peaks = Vec::new();
    let mut i = offset;

    while i < data.len() {
        if data[i] > threshold {
            peaks.push(i);
            // Resume past the decay of this transient
            i = i.saturating_add(skip).saturating_add(1);
        } else {
            i += 1;
        }
    }

    log::trace!(
        "Threshold {:.2}: {} peaks in {} samples from offset {}",
        threshold,
        peaks.len(),
        data.len(),
        offset
    );

    Ok(PeakScan { peaks, threshold })
}

/// Find the highest threshold that yields enough peaks over the whole buffer
///
/// Walks the threshold ladder from the top and stops at the first threshold
/// producing strictly more than `config.min_peaks` peaks.
///
/// # Returns
///
/// The qualifying scan, or `PeakScan::empty()` (threshold 0.0) if the floor is
/// reached without one. Silence and very short clips land here; that is a
/// valid outcome, not an error.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `sample_rate` is not positive
pub fn find_best_threshold(
    channel_data: &[f32],
    sample_rate: f32,
    config: &AnalysisConfig,
) -> Result<PeakScan, AnalysisError> {
    validate_sample_rate(sample_rate)?;

    let mut best = None;
    let mut failure = None;

    descending_over_thresholds(THRESHOLD_FLOOR, |threshold| {
        match find_peaks_at_threshold(channel_data, sample_rate, threshold.value(), 0, config) {
            Ok(scan) if scan.peaks.len() > config.min_peaks => {
                best = Some(scan);
                true
            }
            Ok(_) => false,
            Err(e) => {
                failure = Some(e);
                true
            }
        }
    });

    if let Some(e) = failure {
        return Err(e);
    }

    match best {
        Some(scan) => {
            log::debug!(
                "Best threshold {:.2} with {} peaks",
                scan.threshold,
                scan.peaks.len()
            );
            Ok(scan)
        }
        None => {
            log::debug!(
                "No threshold yielded more than {} peaks in {} samples",
                config.min_peaks,
                channel_data.len()
            );
            Ok(PeakScan::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    fn click_track(interval: usize, clicks: usize, amplitude: f32) -> Vec<f32> {
        let mut data = vec![0.0f32; interval * clicks];
        for n in 0..clicks {
            data[n * interval] = amplitude;
        }
        data
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = AnalysisConfig::default();
        let data = vec![0.0f32; 16];
        for threshold in [-0.1, 1.1, 2.0, f32::NAN] {
            let result = find_peaks_at_threshold(&data, SAMPLE_RATE, threshold, 0, &config);
            assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
        }
        // The closed range is accepted
        assert!(find_peaks_at_threshold(&data, SAMPLE_RATE, 0.0, 0, &config).is_ok());
        assert!(find_peaks_at_threshold(&data, SAMPLE_RATE, 1.0, 0, &config).is_ok());
    }

    #[test]
    fn test_invalid_sample_rate() {
        let config = AnalysisConfig::default();
        let data = vec![0.0f32; 16];
        for sample_rate in [0.0, -44100.0] {
            assert!(find_peaks_at_threshold(&data, sample_rate, 0.5, 0, &config).is_err());
            assert!(find_best_threshold(&data, sample_rate, &config).is_err());
        }
    }

    #[test]
    fn test_empty_and_silent_input() {
        let config = AnalysisConfig::default();
        let scan = find_peaks_at_threshold(&[], SAMPLE_RATE, 0.5, 0, &config).unwrap();
        assert!(scan.peaks.is_empty());

        let silence = vec![0.0f32; 50_000];
        for threshold in [0.01, 0.2, 0.9] {
            let scan = find_peaks_at_threshold(&silence, SAMPLE_RATE, threshold, 0, &config).unwrap();
            assert!(scan.peaks.is_empty());
        }
    }

    #[test]
    fn test_single_peak() {
        let config = AnalysisConfig::default();
        let mut data = vec![0.1f32; 1000];
        data[437] = 0.8;
        let scan = find_peaks_at_threshold(&data, SAMPLE_RATE, 0.5, 0, &config).unwrap();
        assert_eq!(scan.peaks, vec![437]);
        assert_eq!(scan.threshold, 0.5);
    }

    #[test]
    fn test_decay_skip() {
        let config = AnalysisConfig::default();
        // A sustained transient only counts once within the decay window
        let mut data = vec![0.0f32; 30_000];
        for sample in data.iter_mut().take(2000) {
            *sample = 0.9;
        }
        data[11_025] = 0.9;
        data[11_026] = 0.9;
        let scan = find_peaks_at_threshold(&data, SAMPLE_RATE, 0.5, 0, &config).unwrap();
        assert_eq!(scan.peaks, vec![0, 11_026]);
    }

    #[test]
    fn test_huge_decay_stops_at_first_peak() {
        // A skip past the end of the buffer ends the scan instead of wrapping
        let config = AnalysisConfig {
            peak_decay_seconds: 1e20,
            ..Default::default()
        };
        let mut data = vec![0.0f32; 1000];
        data[3] = 0.9;
        data[700] = 0.9;
        let scan = find_peaks_at_threshold(&data, SAMPLE_RATE, 0.5, 0, &config).unwrap();
        assert_eq!(scan.peaks, vec![3]);
    }

    #[test]
    fn test_offset() {
        let config = AnalysisConfig::default();
        let mut data = vec![0.0f32; 1000];
        data[10] = 0.9;
        data[500] = 0.9;
        let scan = find_peaks_at_threshold(&data, SAMPLE_RATE, 0.5, 11, &config).unwrap();
        assert_eq!(scan.peaks, vec![500]);

        let scan = find_peaks_at_threshold(&data, SAMPLE_RATE, 0.5, 5000, &config).unwrap();
        assert!(scan.peaks.is_empty());
    }

    #[test]
    fn test_best_threshold_click_track() {
        let config = AnalysisConfig::default();
        let data = click_track(22050, 20, 0.9);
        let scan = find_best_threshold(&data, SAMPLE_RATE, &config).unwrap();
        // 0.9 is not strictly exceeded, 0.85 is
        assert_eq!(scan.threshold, 0.85);
        assert_eq!(scan.peaks.len(), 20);
        assert_eq!(scan.peaks[1], 22050);
    }

    #[test]
    fn test_best_threshold_requires_more_than_min_peaks() {
        let config = AnalysisConfig::default();
        let data = click_track(22050, config.min_peaks, 0.9);
        let scan = find_best_threshold(&data, SAMPLE_RATE, &config).unwrap();
        assert_eq!(scan, PeakScan::empty());

        let data = click_track(22050, config.min_peaks + 1, 0.9);
        let scan = find_best_threshold(&data, SAMPLE_RATE, &config).unwrap();
        assert_eq!(scan.peaks.len(), config.min_peaks + 1);
    }

    #[test]
    fn test_best_threshold_quiet_clicks() {
        let config = AnalysisConfig::default();
        let data = click_track(22050, 20, 0.33);
        let scan = find_best_threshold(&data, SAMPLE_RATE, &config).unwrap();
        assert_eq!(scan.threshold, 0.3);
    }
}
