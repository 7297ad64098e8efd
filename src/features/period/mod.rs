//! Period estimation modules
//!
//! Convert peak positions to BPM candidates using:
//! - Interval histogram over nearby peak pairs
//! - Folding of intervals into the canonical tempo band
//! - Candidate ranking

pub mod candidate_filter;
pub mod intervals;
pub mod tempo;

use serde::{Deserialize, Serialize};

/// Distance between two peaks with its number of occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Distance in samples
    pub interval: usize,

    /// Number of peak pairs at this distance
    pub count: usize,
}

/// Tempo candidate with its support
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    /// Rounded BPM inside the canonical band
    pub tempo: u32,

    /// Number of peak pairs supporting this tempo
    pub count: usize,

    /// Confidence score (always 0.0; kept for result shape)
    pub confidence: f32,
}
