use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::reel::rng::Mulberry32;
use crate::Candidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    pub visible_items: usize,
    pub min_full_cycles: usize,
    pub min_total_items: usize,
    pub buffer_multiplier: usize,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            visible_items: 3,
            min_full_cycles: 3,
            min_total_items: 40,
            buffer_multiplier: 2,
        }
    }
}

impl ReelConfig {
    /// Visible window, forced odd and at least 3 so there is a centre slot.
    pub fn window(&self) -> usize {
        let visible = self.visible_items.max(3);
        if visible % 2 == 0 {
            visible + 1
        } else {
            visible
        }
    }

    pub fn items_before_winner(&self, pool_len: usize) -> usize {
        let window = self.window();
        (pool_len * self.min_full_cycles)
            .max(window * (self.min_full_cycles + 1))
            .max(self.min_total_items)
    }

    pub fn buffer_after_winner(&self) -> usize {
        let window = self.window();
        (window * self.buffer_multiplier).max(window + 3)
    }

    pub fn insertion_index(&self, pool_len: usize, reel_len: usize) -> usize {
        let window = self.window();
        let centred = self
            .items_before_winner(pool_len)
            .saturating_sub((window + 1) / 2);
        centred.max(window).min(reel_len)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReelGenerator {
    config: ReelConfig,
}

impl ReelGenerator {
    pub fn new(config: ReelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    pub fn build(&self, pool: &[Candidate], winner: Option<&Candidate>, seed: u64) -> Vec<Candidate> {
        if pool.is_empty() {
            return Vec::new();
        }

        let distinct = distinct_by_id(pool);
        let filler: Vec<&Candidate> = match winner {
            Some(winner) => distinct
                .iter()
                .copied()
                .filter(|candidate| candidate.id != winner.id)
                .collect(),
            None => distinct.clone(),
        };

        let items_before = self.config.items_before_winner(distinct.len());
        let target = items_before + self.config.buffer_after_winner();

        let mut rng = Mulberry32::seed_from_u64(seed);
        let mut reel = fill(&filler, target, &mut rng);

        if let Some(winner) = winner {
            let index = self.config.insertion_index(distinct.len(), reel.len());
            reel.insert(index, winner.clone());
            debug!(seed, winner = winner.id, index, len = reel.len(), "reel built");
        } else {
            debug!(seed, len = reel.len(), "idle reel built");
        }

        reel
    }
}

/// Last position of `winner` in `reel`, used for the stop offset.
pub fn winner_index(reel: &[Candidate], winner: &Candidate) -> Option<usize> {
    reel.iter().rposition(|candidate| candidate.id == winner.id)
}

fn fill(filler: &[&Candidate], target: usize, rng: &mut Mulberry32) -> Vec<Candidate> {
    let mut reel: Vec<Candidate> = Vec::with_capacity(target + 1);
    if filler.is_empty() {
        return reel;
    }

    while reel.len() < target {
        let mut shuffled = filler.to_vec();
        shuffled.shuffle(rng);

        let seam_repeats = reel
            .last()
            .map(|last| last.id == shuffled[0].id)
            .unwrap_or(false);
        if seam_repeats && shuffled.len() > 1 {
            shuffled.rotate_left(1);
        }

        for candidate in shuffled {
            if reel.len() >= target {
                break;
            }
            reel.push(candidate.clone());
        }
    }

    reel
}

fn distinct_by_id(pool: &[Candidate]) -> Vec<&Candidate> {
    let mut seen = HashSet::with_capacity(pool.len());
    pool.iter()
        .filter(|candidate| seen.insert(candidate.id))
        .collect()
}
