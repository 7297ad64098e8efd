//! Streaming analysis modules
//!
//! - Session state machine over a chunked PCM feed
//! - Per-threshold peak history
//! - Event channel
//! - Render-quantum aggregation into fixed chunks

pub mod aggregator;
pub mod analyzer;
pub mod event;
pub mod state;
