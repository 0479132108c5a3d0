use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::engine::probability::probabilities;
use crate::engine::weight::WeightConfig;
use crate::{Candidate, DrawError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawRequest {
    pub pool: Vec<Candidate>,
    pub count: i64,
}

impl DrawRequest {
    pub fn new(pool: Vec<Candidate>, count: i64) -> Self {
        Self { pool, count }
    }

    pub fn effective_count(&self) -> Result<usize, DrawError> {
        resolve_count(self.count, self.pool.len())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawResult {
    pub picks: Vec<Candidate>,
}

impl DrawResult {
    pub fn ids(&self) -> Vec<u64> {
        self.picks.iter().map(|candidate| candidate.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

pub fn resolve_count(count: i64, pool_len: usize) -> Result<usize, DrawError> {
    if count < 0 {
        return Err(DrawError::InvalidCount { count });
    }
    Ok((count as u64).min(pool_len as u64) as usize)
}

/// Weighted draw over the request's pool using the thread-local generator.
pub fn draw(request: &DrawRequest, config: &WeightConfig) -> Result<DrawResult, DrawError> {
    let probs = probabilities(&request.pool, config)?;
    let picks = draw_without_replacement(&request.pool, &probs, request.count)?;
    Ok(DrawResult { picks })
}

pub fn draw_without_replacement(
    candidates: &[Candidate],
    probabilities: &[f64],
    count: i64,
) -> Result<Vec<Candidate>, DrawError> {
    draw_with_rng(candidates, probabilities, count, &mut rand::thread_rng())
}

/// Sequential sampling without replacement. Each step renormalizes over the
/// candidates still in play, so removing a heavy pick raises everyone else.
pub fn draw_with_rng<R: Rng + ?Sized>(
    candidates: &[Candidate],
    probabilities: &[f64],
    count: i64,
    rng: &mut R,
) -> Result<Vec<Candidate>, DrawError> {
    let target = resolve_count(count, candidates.len())?;
    if candidates.len() != probabilities.len() {
        return Err(DrawError::LengthMismatch {
            candidates: candidates.len(),
            probabilities: probabilities.len(),
        });
    }
    ensure_unique_ids(candidates)?;

    let mut remaining: Vec<(&Candidate, f64)> = candidates
        .iter()
        .zip(probabilities.iter().copied().map(sanitize_weight))
        .collect();

    let mut picks = Vec::with_capacity(target);
    while picks.len() < target && !remaining.is_empty() {
        let index = pick_index(&remaining, rng);
        let (candidate, _) = remaining.remove(index);
        picks.push(candidate.clone());
    }

    debug!(
        pool = candidates.len(),
        requested = count,
        drawn = picks.len(),
        "weighted draw complete"
    );
    Ok(picks)
}

/// Restricts `pool` to `ids`, keeping pool order.
pub fn select_group(pool: &[Candidate], ids: &[u64]) -> Result<Vec<Candidate>, DrawError> {
    let known: HashSet<u64> = pool.iter().map(|candidate| candidate.id).collect();
    if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
        return Err(DrawError::UnknownCandidate { id: *missing });
    }

    let wanted: HashSet<u64> = ids.iter().copied().collect();
    Ok(pool
        .iter()
        .filter(|candidate| wanted.contains(&candidate.id))
        .cloned()
        .collect())
}

fn pick_index<R: Rng + ?Sized>(remaining: &[(&Candidate, f64)], rng: &mut R) -> usize {
    let total: f64 = remaining.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return rng.gen_range(0..remaining.len());
    }

    let threshold = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (index, (_, weight)) in remaining.iter().enumerate() {
        cumulative += weight;
        if *weight > 0.0 && cumulative >= threshold {
            return index;
        }
    }

    // float rounding can leave the running sum just short of the threshold
    remaining
        .iter()
        .rposition(|(_, weight)| *weight > 0.0)
        .unwrap_or(remaining.len() - 1)
}

fn sanitize_weight(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn ensure_unique_ids(candidates: &[Candidate]) -> Result<(), DrawError> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        if !seen.insert(candidate.id) {
            return Err(DrawError::DuplicateCandidate { id: candidate.id });
        }
    }
    Ok(())
}
