//! Configuration parameters for tempo analysis

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Longest accepted peak decay, in seconds
pub const MAX_PEAK_DECAY_SECONDS: f32 = 60.0;

/// Largest accepted interval lookahead, in peaks
pub const MAX_INTERVAL_LOOKAHEAD: usize = 1024;

/// Largest accepted mute distance, in samples (about six minutes at 48 kHz)
pub const MAX_MUTE_TIME_IN_INDEXES: usize = 1 << 24;

/// Detection parameters shared by offline and streaming analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// A threshold qualifies only with strictly more peaks than this (default: 15)
    pub min_peaks: usize,

    /// Time skipped after each detected peak so its decay is not counted again,
    /// in seconds (default: 0.25)
    pub peak_decay_seconds: f32,

    /// Number of following peaks each peak is compared against when building
    /// the interval histogram (default: 10)
    pub interval_lookahead: usize,

    /// Lower edge of the canonical tempo band in BPM (default: 90.0)
    pub min_bpm: f32,

    /// Upper edge of the canonical tempo band in BPM (default: 180.0)
    pub max_bpm: f32,

    /// Number of ranked candidates returned (default: 5)
    pub top_candidates: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_peaks: 15,
            peak_decay_seconds: 0.25,
            interval_lookahead: 10,
            min_bpm: 90.0,
            max_bpm: 180.0,
            top_candidates: 5,
        }
    }
}

impl AnalysisConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first bad field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(0.0..=MAX_PEAK_DECAY_SECONDS).contains(&self.peak_decay_seconds) {
            return Err(AnalysisError::InvalidInput(format!(
                "peak_decay_seconds must be in [0, {}], got {}",
                MAX_PEAK_DECAY_SECONDS, self.peak_decay_seconds
            )));
        }
        if self.interval_lookahead > MAX_INTERVAL_LOOKAHEAD {
            return Err(AnalysisError::InvalidInput(format!(
                "interval_lookahead must be at most {}, got {}",
                MAX_INTERVAL_LOOKAHEAD, self.interval_lookahead
            )));
        }
        if !(self.min_bpm.is_finite() && self.max_bpm.is_finite())
            || self.min_bpm <= 0.0
            || self.min_bpm >= self.max_bpm
        {
            return Err(AnalysisError::InvalidInput(format!(
                "Tempo band must satisfy 0 < min_bpm < max_bpm, got [{}, {}]",
                self.min_bpm, self.max_bpm
            )));
        }
        if self.top_candidates == 0 {
            return Err(AnalysisError::InvalidInput(
                "top_candidates must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Peak decay expressed in samples: `round(peak_decay_seconds * sample_rate)`
    pub fn peak_decay_samples(&self, sample_rate: f32) -> usize {
        (self.peak_decay_seconds * sample_rate).round() as usize
    }
}

/// Options for a real-time analyzer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Detection parameters
    pub analysis: AnalysisConfig,

    /// Size of the chunks fed to the analyzer in samples (default: 4096)
    pub chunk_size: usize,

    /// Reset the session once `stabilization_time_ms` of audio has been
    /// consumed, for unbounded streams such as radio (default: false)
    pub continuous_analysis: bool,

    /// Audio duration after which a continuous session resets, in
    /// milliseconds (default: 20000)
    pub stabilization_time_ms: u32,

    /// Distance in samples a threshold's resume cursor is moved past each
    /// recorded peak (default: 10000)
    pub mute_time_in_indexes: usize,

    /// Emit chunk echoes and per-peak notifications (default: false)
    pub debug: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            chunk_size: 4096,
            continuous_analysis: false,
            stabilization_time_ms: 20_000,
            mute_time_in_indexes: 10_000,
            debug: false,
        }
    }
}

impl StreamConfig {
    /// Check parameter ranges, including the nested `AnalysisConfig`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first bad field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.analysis.validate()?;
        if self.chunk_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.mute_time_in_indexes > MAX_MUTE_TIME_IN_INDEXES {
            return Err(AnalysisError::InvalidInput(format!(
                "mute_time_in_indexes must be at most {}, got {}",
                MAX_MUTE_TIME_IN_INDEXES, self.mute_time_in_indexes
            )));
        }
        Ok(())
    }
}
