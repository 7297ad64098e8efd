//! Interval histogram between nearby peaks

use std::collections::HashMap;

use super::Interval;

/// Tally the distances between each peak and the peaks that follow it
///
/// Each peak is paired with itself and the next `lookahead` peaks. Pairs
/// past the end of `peaks` are skipped. The self pair is kept as a distance
/// of 0; tempo grouping discards it.
///
/// # Returns
///
/// One `Interval` per distinct distance, in order of first appearance
///
/// # Example
///
/// ```
/// use bpm_scan::features::period::intervals::identify_intervals;
///
/// let intervals = identify_intervals(&[0, 1000, 2000, 3000], 10);
/// let step = intervals.iter().find(|i| i.interval == 1000).unwrap();
/// assert_eq!(step.count, 3);
/// ```
pub fn identify_intervals(peaks: &[usize], lookahead: usize) -> Vec<Interval> {
    let mut intervals: Vec<Interval> = Vec::new();
    let mut positions: HashMap<usize, usize> = HashMap::new();

    for (n, &peak) in peaks.iter().enumerate() {
        let last = n.saturating_add(lookahead).min(peaks.len() - 1);
        for &other in &peaks[n..=last] {
            let distance = other.abs_diff(peak);
            match positions.get(&distance) {
                Some(&position) => intervals[position].count += 1,
                None => {
                    positions.insert(distance, intervals.len());
                    intervals.push(Interval {
                        interval: distance,
                        count: 1,
                    });
                }
            }
        }
    }

    log::trace!(
        "{} distinct intervals from {} peaks",
        intervals.len(),
        peaks.len()
    );

    intervals
}
