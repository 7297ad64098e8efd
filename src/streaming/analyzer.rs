//! Real-time tempo analyzer session
//!
//! Consumes an ordered feed of same-size chunks, accumulates peaks per
//! threshold across chunk boundaries and recomputes the tempo after every
//! chunk. Once a threshold above the session floor produces a result, the
//! floor is raised to it and lower thresholds are pruned, which bounds the
//! retained history. In continuous mode the session restarts after a fixed
//! amount of audio so unbounded streams never grow it either.
//!
//! Processing is synchronous and allocation-light so a chunk can be handled
//! inside one audio callback. Events are handed to a caller-supplied sink.
//!
//! # Example
//!
//! ```
//! use bpm_scan::{AnalyzerEvent, RealtimeBpmAnalyzer, StreamConfig};
//!
//! let mut analyzer = RealtimeBpmAnalyzer::new(StreamConfig::default())?;
//! let chunk = vec![0.0f32; 4096];
//! analyzer.push_chunk(&chunk, 44100.0, 4096, |event| {
//!     if let AnalyzerEvent::BpmStable(result) = event {
//!         println!("stable at {:?} BPM", result.top());
//!     }
//! })?;
//! # Ok::<(), bpm_scan::AnalysisError>(())
//! ```

use crate::analysis::compute::compute_bpm;
use crate::config::StreamConfig;
use crate::error::{validate_sample_rate, AnalysisError};
use crate::features::onset::peak_detection::find_peaks_at_threshold;
use crate::features::onset::threshold::{descending_over_thresholds, Threshold};

use super::aggregator::ChunkAggregator;
use super::event::AnalyzerEvent;
use super::state::ThresholdBank;

/// Lifecycle of an analyzer session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Just created or reset; no chunk processed yet
    Fresh,
    /// Chunks processed, floor still at its initial threshold
    Accumulating,
    /// A result was found above the floor and lower thresholds were pruned
    Stabilized,
    /// `stop()` was called; chunks are rejected until `reset()`
    Stopped,
}

/// Streaming tempo analyzer owning one session's state
#[derive(Debug)]
pub struct RealtimeBpmAnalyzer {
    config: StreamConfig,
    bank: ThresholdBank,
    /// Number of chunks processed since the last reset
    chunk_index: usize,
    /// Samples consumed since the last reset
    elapsed_samples: usize,
    state: SessionState,
    aggregator: ChunkAggregator,
}

impl Default for RealtimeBpmAnalyzer {
    fn default() -> Self {
        Self::with_valid_config(StreamConfig::default())
    }
}

impl RealtimeBpmAnalyzer {
    /// Create a session
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `config` fails validation
    pub fn new(config: StreamConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: StreamConfig) -> Self {
        let aggregator = ChunkAggregator::new(config.chunk_size);
        Self {
            config,
            bank: ThresholdBank::new(),
            chunk_index: 0,
            elapsed_samples: 0,
            state: SessionState::Fresh,
            aggregator,
        }
    }

    /// Session options
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Per-threshold peak history
    pub fn bank(&self) -> &ThresholdBank {
        &self.bank
    }

    /// Chunks processed since the last reset
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    /// Samples consumed since the last reset
    pub fn elapsed_samples(&self) -> usize {
        self.elapsed_samples
    }

    /// Lowest threshold still tracked
    pub fn floor_threshold(&self) -> f32 {
        self.bank.floor().value()
    }

    /// Discard all history and start a fresh session
    pub fn reset(&mut self) {
        self.clear_history();
        self.state = SessionState::Fresh;
        log::debug!("Analyzer session reset");
    }

    /// Discard all history and reject chunks until `reset()`
    pub fn stop(&mut self) {
        self.clear_history();
        self.state = SessionState::Stopped;
        log::debug!("Analyzer session stopped");
    }

    fn clear_history(&mut self) {
        self.bank.reset();
        self.chunk_index = 0;
        self.elapsed_samples = 0;
        self.aggregator.clear();
    }

    /// Analyze the next chunk of the stream
    ///
    /// Chunks must arrive in temporal order, exactly once, each holding
    /// `chunk_size` samples (the session's configured chunk size).
    ///
    /// # Arguments
    ///
    /// * `channel_data` - Low-passed mono samples of this chunk
    /// * `sample_rate` - Sample rate in Hz
    /// * `chunk_size` - Samples per chunk
    /// * `on_event` - Receives `Bpm` for every chunk, `BpmStable` and
    ///   `AnalyzerReset` when they occur, and debug events when enabled
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::SessionStopped` (without emitting) after
    /// `stop()`. Validation failures are emitted as `AnalyzerEvent::Error`
    /// and returned; the session state is left untouched and later chunks are
    /// processed normally.
    pub fn push_chunk<F>(
        &mut self,
        channel_data: &[f32],
        sample_rate: f32,
        chunk_size: usize,
        mut on_event: F,
    ) -> Result<(), AnalysisError>
    where
        F: FnMut(AnalyzerEvent),
    {
        if self.state == SessionState::Stopped {
            return Err(AnalysisError::SessionStopped);
        }

        match self.analyze_chunk(channel_data, sample_rate, chunk_size, &mut on_event) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("Chunk {} rejected: {}", self.chunk_index, e);
                on_event(AnalyzerEvent::Error(e.clone()));
                Err(e)
            }
        }
    }

    /// Feed frames of any length, analyzing each chunk as it fills up
    ///
    /// # Errors
    ///
    /// Same as `push_chunk`; frames after a rejected chunk are dropped
    pub fn process_frames<F>(
        &mut self,
        frames: &[f32],
        sample_rate: f32,
        mut on_event: F,
    ) -> Result<(), AnalysisError>
    where
        F: FnMut(AnalyzerEvent),
    {
        if self.state == SessionState::Stopped {
            return Err(AnalysisError::SessionStopped);
        }

        let chunk_size = self.config.chunk_size;
        let mut consumed = 0;
        while consumed < frames.len() {
            consumed += self.aggregator.fill(&frames[consumed..]);
            if let Some(chunk) = self.aggregator.take_full() {
                let result = self.push_chunk(&chunk, sample_rate, chunk_size, &mut on_event);
                self.aggregator.recycle(chunk);
                result?;
            }
        }
        Ok(())
    }

    fn analyze_chunk<F>(
        &mut self,
        channel_data: &[f32],
        sample_rate: f32,
        chunk_size: usize,
        on_event: &mut F,
    ) -> Result<(), AnalysisError>
    where
        F: FnMut(AnalyzerEvent),
    {
        validate_sample_rate(sample_rate)?;
        if chunk_size != self.config.chunk_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Chunk size {} does not match the session chunk size {}",
                chunk_size, self.config.chunk_size
            )));
        }
        if channel_data.len() != chunk_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Expected {} samples per chunk, got {}",
                chunk_size,
                channel_data.len()
            )));
        }

        if self.config.debug {
            on_event(AnalyzerEvent::AnalyzeChunk(channel_data.to_vec()));
        }

        let min_index = self.chunk_index * chunk_size;
        let max_index = min_index + chunk_size;
        self.find_chunk_peaks(channel_data, sample_rate, min_index, max_index, on_event)?;

        self.chunk_index += 1;
        self.elapsed_samples += chunk_size;

        let floor = self.bank.floor();
        let result = compute_bpm(&self.bank, sample_rate, &self.config.analysis)?;
        on_event(AnalyzerEvent::Bpm(result.clone()));

        match Threshold::from_value(result.threshold) {
            Some(threshold) if result.threshold > floor.value() => {
                log::debug!(
                    "Stable at threshold {:.2} (floor was {:.2})",
                    result.threshold,
                    floor.value()
                );
                on_event(AnalyzerEvent::BpmStable(result));
                self.bank.prune_below(threshold);
                self.state = SessionState::Stabilized;
            }
            _ => {
                if self.state == SessionState::Fresh {
                    self.state = SessionState::Accumulating;
                }
            }
        }

        if self.config.continuous_analysis {
            let elapsed_seconds = self.elapsed_samples as f64 / sample_rate as f64;
            if elapsed_seconds > self.config.stabilization_time_ms as f64 / 1000.0 {
                log::debug!(
                    "Continuous analysis restarting after {:.1}s",
                    elapsed_seconds
                );
                self.reset();
                on_event(AnalyzerEvent::AnalyzerReset);
            }
        }

        Ok(())
    }

    /// Scan this chunk at every tracked threshold whose cursor falls inside it
    fn find_chunk_peaks<F>(
        &mut self,
        channel_data: &[f32],
        sample_rate: f32,
        min_index: usize,
        max_index: usize,
        on_event: &mut F,
    ) -> Result<(), AnalysisError>
    where
        F: FnMut(AnalyzerEvent),
    {
        let bank = &mut self.bank;
        let analysis = &self.config.analysis;
        let mute_distance = self.config.mute_time_in_indexes;
        let debug = self.config.debug;
        let mut failure = None;

        descending_over_thresholds(bank.floor().value(), |threshold| {
            let Some(next_index) = bank.next_index(threshold) else {
                return false;
            };
            if next_index >= max_index {
                return false;
            }

            let offset = next_index.saturating_sub(min_index);
            let scan = match find_peaks_at_threshold(
                channel_data,
                sample_rate,
                threshold.value(),
                offset,
                analysis,
            ) {
                Ok(scan) => scan,
                Err(e) => {
                    failure = Some(e);
                    return true;
                }
            };

            for peak in scan.peaks {
                let index = min_index + peak;
                bank.record_peak(threshold, index, mute_distance);
                if debug {
                    on_event(AnalyzerEvent::ValidPeak {
                        threshold: threshold.value(),
                        index,
                    });
                }
            }
            false
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;
    const CHUNK: usize = 4096;

    /// Click track with one sample at `amplitude` every `spacing` samples
    fn clicks(len: usize, spacing: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| if i % spacing == 0 { amplitude } else { 0.0 })
            .collect()
    }

    fn feed(analyzer: &mut RealtimeBpmAnalyzer, signal: &[f32]) -> Vec<AnalyzerEvent> {
        let mut events = Vec::new();
        for chunk in signal.chunks_exact(CHUNK) {
            analyzer
                .push_chunk(chunk, SAMPLE_RATE, CHUNK, |event| events.push(event))
                .unwrap();
        }
        events
    }

    #[test]
    fn test_fresh_session() {
        let analyzer = RealtimeBpmAnalyzer::default();
        assert_eq!(analyzer.state(), SessionState::Fresh);
        assert_eq!(analyzer.chunk_index(), 0);
        assert_eq!(analyzer.elapsed_samples(), 0);
        assert_eq!(analyzer.floor_threshold(), 0.2);
        assert_eq!(analyzer.bank(), &ThresholdBank::new());
    }

    #[test]
    fn test_bpm_emitted_every_chunk() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let events = feed(&mut analyzer, &vec![0.0; CHUNK * 3]);
        assert_eq!(events.len(), 3);
        for event in &events {
            assert_eq!(event, &AnalyzerEvent::Bpm(crate::BpmCandidates::empty(0.2)));
        }
        assert_eq!(analyzer.state(), SessionState::Accumulating);
        assert_eq!(analyzer.chunk_index(), 3);
        assert_eq!(analyzer.elapsed_samples(), CHUNK * 3);
    }

    #[test]
    fn test_peaks_are_global_indices() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let mut signal = vec![0.0f32; CHUNK * 4];
        signal[CHUNK * 2 + 7] = 0.95;
        feed(&mut analyzer, &signal);

        let top = Threshold::from_value(0.9).unwrap();
        assert_eq!(analyzer.bank().valid_peaks(top), Some(&[CHUNK * 2 + 7][..]));
        assert_eq!(
            analyzer.bank().next_index(top),
            Some(CHUNK * 2 + 7 + analyzer.config().mute_time_in_indexes)
        );
    }

    #[test]
    fn test_mute_distance_spans_chunks() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let mut signal = vec![0.0f32; CHUNK * 4];
        // Second hit falls inside the mute window of the first
        signal[CHUNK - 10] = 0.95;
        signal[CHUNK + 100] = 0.95;
        // Third hit lands after the mute window, resumed mid-chunk
        signal[CHUNK * 3 + 2000] = 0.95;
        feed(&mut analyzer, &signal);

        let top = Threshold::from_value(0.9).unwrap();
        assert_eq!(
            analyzer.bank().valid_peaks(top),
            Some(&[CHUNK - 10, CHUNK * 3 + 2000][..])
        );
    }

    #[test]
    fn test_click_track_stabilizes_and_prunes() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let signal = clicks(CHUNK * 250, 22050, 0.9);
        let events = feed(&mut analyzer, &signal);

        let stable: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                AnalyzerEvent::BpmStable(result) => Some(result),
                _ => None,
            })
            .collect();
        assert!(!stable.is_empty());
        assert_eq!(stable[0].threshold, 0.85);
        assert_eq!(stable[0].top().unwrap(), 120);
        assert_eq!(analyzer.state(), SessionState::Stabilized);
        assert_eq!(analyzer.floor_threshold(), 0.85);

        let keys = analyzer.bank().valid_peak_keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys, analyzer.bank().next_index_keys());
    }

    #[test]
    fn test_key_sets_stay_identical() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let signal = clicks(CHUNK * 120, 18_000, 0.7);
        for chunk in signal.chunks_exact(CHUNK) {
            analyzer
                .push_chunk(chunk, SAMPLE_RATE, CHUNK, |_| {})
                .unwrap();
            assert_eq!(
                analyzer.bank().valid_peak_keys(),
                analyzer.bank().next_index_keys()
            );
        }
    }

    #[test]
    fn test_continuous_reset() {
        let config = StreamConfig {
            continuous_analysis: true,
            stabilization_time_ms: 1000,
            ..Default::default()
        };
        let mut analyzer = RealtimeBpmAnalyzer::new(config).unwrap();
        let events = feed(&mut analyzer, &vec![0.0; CHUNK * 12]);

        let resets = events
            .iter()
            .filter(|event| **event == AnalyzerEvent::AnalyzerReset)
            .count();
        // 44100 samples per second: the 11th chunk crosses one second
        assert_eq!(resets, 1);
        assert_eq!(analyzer.chunk_index(), 1);
        assert_eq!(analyzer.elapsed_samples(), CHUNK);
    }

    #[test]
    fn test_no_reset_without_continuous_mode() {
        let config = StreamConfig {
            stabilization_time_ms: 10,
            ..Default::default()
        };
        let mut analyzer = RealtimeBpmAnalyzer::new(config).unwrap();
        let events = feed(&mut analyzer, &vec![0.0; CHUNK * 4]);
        assert!(events.iter().all(|e| *e != AnalyzerEvent::AnalyzerReset));
    }

    #[test]
    fn test_errors_are_reported_and_session_survives() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let mut events = Vec::new();

        let result = analyzer.push_chunk(&vec![0.0; CHUNK], 0.0, CHUNK, |e| events.push(e));
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
        let result = analyzer.push_chunk(&vec![0.0; 100], SAMPLE_RATE, CHUNK, |e| events.push(e));
        assert!(result.is_err());
        let result = analyzer.push_chunk(&vec![0.0; 1024], SAMPLE_RATE, 1024, |e| events.push(e));
        assert!(result.is_err());

        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.name() == "error"));
        assert_eq!(analyzer.chunk_index(), 0);

        events.clear();
        analyzer
            .push_chunk(&vec![0.0; CHUNK], SAMPLE_RATE, CHUNK, |e| events.push(e))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "bpm");
    }

    #[test]
    fn test_stop_and_reset() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let signal = clicks(CHUNK * 8, 20_000, 0.9);
        feed(&mut analyzer, &signal);
        assert!(analyzer.bank().peak_count() > 0);

        analyzer.stop();
        assert_eq!(analyzer.state(), SessionState::Stopped);
        let mut emitted = 0;
        let result = analyzer.push_chunk(&signal[..CHUNK], SAMPLE_RATE, CHUNK, |_| emitted += 1);
        assert_eq!(result, Err(AnalysisError::SessionStopped));
        assert_eq!(emitted, 0);

        analyzer.reset();
        assert_eq!(analyzer.state(), SessionState::Fresh);
        assert_eq!(analyzer.bank(), &ThresholdBank::new());
        assert_eq!(analyzer.chunk_index(), 0);
        assert_eq!(analyzer.elapsed_samples(), 0);
        assert!(analyzer
            .push_chunk(&signal[..CHUNK], SAMPLE_RATE, CHUNK, |_| {})
            .is_ok());
    }

    #[test]
    fn test_debug_events() {
        let config = StreamConfig {
            debug: true,
            ..Default::default()
        };
        let mut analyzer = RealtimeBpmAnalyzer::new(config).unwrap();
        let mut signal = vec![0.0f32; CHUNK];
        signal[42] = 0.92;
        let events = feed(&mut analyzer, &signal);

        assert_eq!(events[0], AnalyzerEvent::AnalyzeChunk(signal.clone()));
        let peaks = events
            .iter()
            .filter(|e| matches!(e, AnalyzerEvent::ValidPeak { index: 42, .. }))
            .count();
        // 0.92 clears every threshold on the ladder
        assert_eq!(peaks, 15);
        assert_eq!(events.last().unwrap().name(), "bpm");
    }

    #[test]
    fn test_process_frames_aggregates_render_quanta() {
        let mut analyzer = RealtimeBpmAnalyzer::default();
        let signal = clicks(CHUNK * 3 + 64, 22050, 0.9);
        let mut bpm_events = 0;
        for quantum in signal.chunks(128) {
            analyzer
                .process_frames(quantum, SAMPLE_RATE, |event| {
                    if event.name() == "bpm" {
                        bpm_events += 1;
                    }
                })
                .unwrap();
        }
        assert_eq!(bpm_events, 3);
        assert_eq!(analyzer.chunk_index(), 3);

        let top = Threshold::from_value(0.85).unwrap();
        assert_eq!(analyzer.bank().valid_peaks(top), Some(&[0usize][..]));
    }

    #[test]
    fn test_invalid_config() {
        let config = StreamConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(RealtimeBpmAnalyzer::new(config).is_err());
    }
}
