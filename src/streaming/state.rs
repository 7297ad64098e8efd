//! Per-threshold peak history for a streaming session
//!
//! Each ladder threshold owns its accumulated peaks and the global sample
//! index its scan resumes from. Both live in the same slot, so a threshold is
//! either tracked with both or pruned with both.

use std::array;

use crate::features::onset::threshold::{Threshold, THRESHOLD_COUNT};

/// Accumulated peaks and resume cursor of one threshold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdTrack {
    /// Global sample indices of accepted peaks, strictly increasing
    pub peaks: Vec<usize>,

    /// Global sample index scanning resumes at
    pub next_index: usize,
}

/// Peak history for every threshold at or above the session floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdBank {
    tracks: [Option<ThresholdTrack>; THRESHOLD_COUNT],
    floor: Threshold,
}

impl Default for ThresholdBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdBank {
    /// Fresh bank: every threshold tracked, no peaks, cursors at 0
    pub fn new() -> Self {
        Self {
            tracks: array::from_fn(|_| Some(ThresholdTrack::default())),
            floor: Threshold::lowest(),
        }
    }

    /// Restore the fresh shape
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Lowest threshold still tracked
    pub fn floor(&self) -> Threshold {
        self.floor
    }

    /// Track of `threshold`, `None` once pruned
    pub fn track(&self, threshold: Threshold) -> Option<&ThresholdTrack> {
        self.tracks[threshold.rank()].as_ref()
    }

    /// Accepted peaks at `threshold`
    pub fn valid_peaks(&self, threshold: Threshold) -> Option<&[usize]> {
        self.track(threshold).map(|track| track.peaks.as_slice())
    }

    /// Resume cursor of `threshold`
    pub fn next_index(&self, threshold: Threshold) -> Option<usize> {
        self.track(threshold).map(|track| track.next_index)
    }

    /// Thresholds that currently have a peak list, highest first
    pub fn valid_peak_keys(&self) -> Vec<Threshold> {
        Threshold::all()
            .filter(|&threshold| self.valid_peaks(threshold).is_some())
            .collect()
    }

    /// Thresholds that currently have a resume cursor, highest first
    pub fn next_index_keys(&self) -> Vec<Threshold> {
        Threshold::all()
            .filter(|&threshold| self.next_index(threshold).is_some())
            .collect()
    }

    /// Record a peak at global `index` and mute the threshold until
    /// `index + mute_distance`
    ///
    /// Returns `false` (recording nothing) if the threshold has been pruned.
    pub fn record_peak(&mut self, threshold: Threshold, index: usize, mute_distance: usize) -> bool {
        match self.tracks[threshold.rank()].as_mut() {
            Some(track) => {
                track.peaks.push(index);
                track.next_index = index.saturating_add(mute_distance);
                true
            }
            None => false,
        }
    }

    /// Drop every threshold below `floor` and raise the floor to it
    pub fn prune_below(&mut self, floor: Threshold) {
        for track in self.tracks.iter_mut().skip(floor.rank() + 1) {
            *track = None;
        }
        self.floor = floor;
        log::debug!("Pruned peak history below threshold {:.2}", floor.value());
    }

    /// Total number of retained peaks across thresholds
    pub fn peak_count(&self) -> usize {
        self.tracks
            .iter()
            .flatten()
            .map(|track| track.peaks.len())
            .sum()
    }
}
