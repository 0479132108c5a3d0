//! Weighted classroom draws.
//!
//! Candidates carry their draw history; the engine turns that history into
//! weights, draws without replacement, and builds a seeded reel for the
//! reveal animation. All engine functions are pure: inputs are borrowed and
//! new values are returned.

pub mod config;
pub mod engine;
pub mod reel;
pub mod roster;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use config::DrawConfig;
pub use engine::{
    draw, draw_with_rng, normalize, reset_history, select_group, DrawRequest, DrawResult,
    WeightConfig, WeightModel,
};
pub use reel::{ReelConfig, ReelGenerator, ReelSeed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub draw_count: u32,
    /// Manual weight in `[0, 1]`. Overrides the history-derived weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_grade: Option<f64>,
}

impl Candidate {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            draw_count: 0,
            weight: None,
            last_grade: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DrawError {
    #[error("invalid draw count: {count}")]
    InvalidCount { count: i64 },

    #[error("weights sum to {total}; check min_weight_floor")]
    DegenerateDistribution { total: f64 },

    #[error("{candidates} candidates but {probabilities} probabilities")]
    LengthMismatch {
        candidates: usize,
        probabilities: usize,
    },

    #[error("candidate {id} appears more than once in the pool")]
    DuplicateCandidate { id: u64 },

    #[error("candidate {id} is not in the pool")]
    UnknownCandidate { id: u64 },
}

pub fn compute_weight(candidate: &Candidate, config: &WeightConfig) -> f64 {
    WeightModel::new(config).weight(candidate)
}

pub fn compute_probabilities(
    candidates: &[Candidate],
    config: &WeightConfig,
) -> Result<Vec<f64>, DrawError> {
    engine::probabilities(candidates, config)
}

pub fn draw_without_replacement(
    candidates: &[Candidate],
    probabilities: &[f64],
    count: i64,
) -> Result<Vec<Candidate>, DrawError> {
    engine::draw_without_replacement(candidates, probabilities, count)
}

pub fn apply_draw_history(candidates: &[Candidate], picked_ids: &HashSet<u64>) -> Vec<Candidate> {
    engine::apply_draw_history(candidates, picked_ids)
}

pub fn build_reel(pool: &[Candidate], winner: Option<&Candidate>, seed: u64) -> Vec<Candidate> {
    ReelGenerator::default().build(pool, winner, seed)
}

pub fn build_reel_with(
    pool: &[Candidate],
    winner: Option<&Candidate>,
    seed: u64,
    config: &ReelConfig,
) -> Vec<Candidate> {
    ReelGenerator::new(config.clone()).build(pool, winner, seed)
}

pub fn winner_index(reel: &[Candidate], winner: &Candidate) -> Option<usize> {
    crate::reel::winner_index(reel, winner)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
