//! Analysis result types

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::features::period::candidate_filter::top_candidate;
use crate::features::period::Tempo;

/// Ranked tempo candidates and the threshold they were found at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmCandidates {
    /// Candidates ranked by support, best first
    pub bpm: Vec<Tempo>,

    /// Threshold whose peaks produced the candidates, or the session floor
    /// when no threshold had enough peaks
    pub threshold: f32,
}

impl BpmCandidates {
    /// No candidates, echoing `threshold`
    pub fn empty(threshold: f32) -> Self {
        Self {
            bpm: vec![],
            threshold,
        }
    }

    /// True when detection found nothing
    pub fn is_empty(&self) -> bool {
        self.bpm.is_empty()
    }

    /// BPM of the best candidate
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NoCandidates` if there are no candidates
    pub fn top(&self) -> Result<u32, AnalysisError> {
        top_candidate(&self.bpm)
    }
}
