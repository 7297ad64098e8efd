//! Messages emitted by a streaming session

use crate::analysis::result::BpmCandidates;
use crate::error::AnalysisError;

/// Message delivered to the host after (or while) a chunk is processed
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerEvent {
    /// Candidates recomputed after a chunk; emitted for every chunk
    Bpm(BpmCandidates),

    /// Candidates found above the session floor; the floor is raised to
    /// their threshold and lower thresholds are pruned
    BpmStable(BpmCandidates),

    /// Continuous mode reached its stabilization time and the session
    /// restarted from a fresh state
    AnalyzerReset,

    /// A chunk could not be processed; the session remains usable
    Error(AnalysisError),

    /// Debug: echo of the chunk about to be analyzed
    AnalyzeChunk(Vec<f32>),

    /// Debug: a peak was accepted
    ValidPeak {
        /// Threshold the peak was found at
        threshold: f32,
        /// Global sample index of the peak
        index: usize,
    },
}

impl AnalyzerEvent {
    /// Message tag, as hosts forward it over their transport
    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerEvent::Bpm(_) => "bpm",
            AnalyzerEvent::BpmStable(_) => "bpmStable",
            AnalyzerEvent::AnalyzerReset => "analyzerReset",
            AnalyzerEvent::Error(_) => "error",
            AnalyzerEvent::AnalyzeChunk(_) => "analyzeChunk",
            AnalyzerEvent::ValidPeak { .. } => "validPeak",
        }
    }

    /// True for the messages only emitted in debug mode
    pub fn is_debug(&self) -> bool {
        matches!(
            self,
            AnalyzerEvent::AnalyzeChunk(_) | AnalyzerEvent::ValidPeak { .. }
        )
    }
}
