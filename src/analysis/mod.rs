//! Analysis and result aggregation modules
//!
//! - Tempo computation over threshold-keyed peak sets
//! - Result types

pub mod compute;
pub mod result;
