//! Error types for tempo analysis

use thiserror::Error;

/// Errors that can occur during tempo analysis
///
/// "No detectable beat" is not an error: silence or noise produce an empty
/// candidate list instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Invalid input parameters (threshold range, sample rate, buffer shape)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A top candidate was requested from an empty candidate list
    #[error("Could not find enough samples for a reliable detection.")]
    NoCandidates,

    /// A chunk was pushed to a session after `stop()`
    #[error("Analyzer session is stopped; call reset() before pushing chunks")]
    SessionStopped,
}

/// Validate a sample rate (must be finite and > 0)
pub(crate) fn validate_sample_rate(sample_rate: f32) -> Result<(), AnalysisError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Sample rate must be a positive number of Hz, got {}",
            sample_rate
        )));
    }
    Ok(())
}
