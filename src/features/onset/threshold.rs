//! Descending confidence thresholds
//!
//! Every threshold-parameterized search in the crate walks the same fixed
//! ladder: start at 0.95, subtract 0.05 before each step, stop at the floor
//! (0.20). Thresholds are identified by their *rank* on the ladder (0 = 0.90,
//! the highest) and their values are derived from integer hundredths, so the
//! same rank always maps to the same `f32` and no floating-point drift can
//! creep into lookups.

/// Value the ladder starts from; the first threshold visited is one step below
pub const THRESHOLD_START: f32 = 0.95;

/// Default lowest threshold visited
pub const THRESHOLD_FLOOR: f32 = 0.2;

/// Distance between consecutive thresholds
pub const THRESHOLD_STEP: f32 = 0.05;

/// Number of thresholds on the ladder (0.90 down to 0.20)
pub const THRESHOLD_COUNT: usize = 15;

const START_HUNDREDTHS: u32 = 95;
const STEP_HUNDREDTHS: u32 = 5;

/// A threshold on the descending ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Threshold {
    rank: usize,
}

impl Threshold {
    /// Threshold at `rank` (0 is the highest), `None` past the end of the ladder
    pub fn from_rank(rank: usize) -> Option<Self> {
        (rank < THRESHOLD_COUNT).then_some(Self { rank })
    }

    /// Threshold whose value is `value` after rounding to two decimals
    ///
    /// `0.8999999999999999` and `0.9` resolve to the same threshold.
    pub fn from_value(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let hundredths = (value * 100.0).round() as i64;
        let below_start = START_HUNDREDTHS as i64 - hundredths;
        if below_start <= 0 || below_start % STEP_HUNDREDTHS as i64 != 0 {
            return None;
        }
        Self::from_rank((below_start / STEP_HUNDREDTHS as i64) as usize - 1)
    }

    /// The lowest threshold on the ladder
    pub fn lowest() -> Self {
        Self {
            rank: THRESHOLD_COUNT - 1,
        }
    }

    /// Position on the ladder, 0 being the highest threshold
    pub fn rank(self) -> usize {
        self.rank
    }

    /// Threshold value as a normalized amplitude
    pub fn value(self) -> f32 {
        self.hundredths() as f32 / 100.0
    }

    fn hundredths(self) -> u32 {
        START_HUNDREDTHS - STEP_HUNDREDTHS * (self.rank as u32 + 1)
    }

    /// Iterate over the whole ladder, highest first
    pub fn all() -> impl Iterator<Item = Threshold> {
        (0..THRESHOLD_COUNT).map(|rank| Threshold { rank })
    }
}

/// Walk the ladder from the top, calling `step` once per threshold
///
/// `step` returns `true` to stop. At least one threshold is always visited;
/// the walk also ends once a threshold at or below `floor` has been visited.
pub fn descending_over_thresholds<F>(floor: f32, mut step: F)
where
    F: FnMut(Threshold) -> bool,
{
    let floor_hundredths = (floor * 100.0).round() as i64;
    for threshold in Threshold::all() {
        if step(threshold) {
            break;
        }
        if threshold.hundredths() as i64 <= floor_hundredths {
            break;
        }
    }
}
