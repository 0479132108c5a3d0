use std::collections::HashSet;

use crate::Candidate;

/// Returns a copy of `candidates` where every id in `picked_ids` has one more draw.
pub fn apply_draw_history(candidates: &[Candidate], picked_ids: &HashSet<u64>) -> Vec<Candidate> {
    candidates
        .iter()
        .map(|candidate| {
            let mut updated = candidate.clone();
            if picked_ids.contains(&candidate.id) {
                updated.draw_count = updated.draw_count.saturating_add(1);
            }
            updated
        })
        .collect()
}

pub fn reset_history(candidates: &[Candidate]) -> Vec<Candidate> {
    candidates
        .iter()
        .map(|candidate| Candidate {
            draw_count: 0,
            weight: None,
            ..candidate.clone()
        })
        .collect()
}
