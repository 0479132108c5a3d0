use serde::{Deserialize, Serialize};

use crate::Candidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub past_draw_penalty: f64,
    pub boost_factor: f64,
    pub max_grade: f64,
    pub min_weight_floor: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            past_draw_penalty: 0.6,
            boost_factor: 1.5,
            max_grade: 20.0,
            min_weight_floor: 0.0001,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WeightModel<'a> {
    config: &'a WeightConfig,
}

impl<'a> WeightModel<'a> {
    pub fn new(config: &'a WeightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WeightConfig {
        self.config
    }

    /// Geometric decay applied once per confirmed draw.
    pub fn penalty(&self, draw_count: u32) -> f64 {
        self.config.past_draw_penalty.powi(draw_count.min(i32::MAX as u32) as i32)
    }

    /// Linear boost for grades below `max_grade`. Out-of-range grades are not clamped.
    pub fn grade_boost(&self, grade: Option<f64>) -> f64 {
        match grade {
            Some(grade) => {
                1.0 + ((self.config.max_grade - grade) / self.config.max_grade)
                    * self.config.boost_factor
            }
            None => 1.0,
        }
    }

    pub fn weight(&self, candidate: &Candidate) -> f64 {
        if let Some(manual) = candidate.weight {
            return manual.max(self.config.min_weight_floor);
        }

        let raw = self.penalty(candidate.draw_count) * self.grade_boost(candidate.last_grade);
        raw.max(self.config.min_weight_floor)
    }

    pub fn weights(&self, candidates: &[Candidate]) -> Vec<f64> {
        candidates.iter().map(|candidate| self.weight(candidate)).collect()
    }
}
