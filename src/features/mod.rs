//! Feature extraction modules
//!
//! - Peak detection (threshold ladder + threshold-crossing scan)
//! - Period estimation (interval histogram, tempo folding, ranking)

pub mod onset;
pub mod period;
