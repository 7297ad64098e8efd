//! Tempo candidate ranking

use super::Tempo;
use crate::error::AnalysisError;

/// Rank candidates by support and keep the best `n`
///
/// The sort is stable: candidates with equal counts keep their input order.
pub fn top_candidates(candidates: &[Tempo], n: usize) -> Vec<Tempo> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

/// BPM of the best-supported candidate
///
/// # Errors
///
/// Returns `AnalysisError::NoCandidates` if `candidates` is empty. Finding no
/// peaks is a valid analysis outcome; ranking an empty list is a caller error.
pub fn top_candidate(candidates: &[Tempo]) -> Result<u32, AnalysisError> {
    // First of equally supported candidates wins
    top_candidates(candidates, 1)
        .first()
        .map(|best| best.tempo)
        .ok_or(AnalysisError::NoCandidates)
}
