//! Peak detection over threshold-scanned PCM
//!
//! - Threshold ladder shared by every threshold-parameterized search
//! - Peak detection at one threshold, and best-threshold search over a buffer

pub mod peak_detection;
pub mod threshold;

use serde::{Deserialize, Serialize};

/// Peaks found at one threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakScan {
    /// Strictly increasing sample indices where the signal exceeded the threshold
    pub peaks: Vec<usize>,

    /// Threshold the scan ran at (0.0 when no threshold qualified)
    pub threshold: f32,
}

impl PeakScan {
    /// Empty scan carrying the "nothing qualified" sentinel threshold
    pub fn empty() -> Self {
        Self {
            peaks: vec![],
            threshold: 0.0,
        }
    }
}
