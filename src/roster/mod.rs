pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::reel::stable_hash64;
use crate::Candidate;

pub use store::RosterStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Newest first.
    #[serde(default)]
    pub history: Vec<DrawRecord>,
}

/// Named subset of the roster, drawn from on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub members: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub id: u64,
    pub drawn_at: i64,
    pub drawn: Vec<DrawnEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnEntry {
    pub id: u64,
    pub name: String,
}

impl Roster {
    pub fn find(&self, id: u64) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| candidate.id == id)
    }

    /// Six-digit id derived from the name; steps forward on collision.
    pub fn derive_candidate_id(&self, name: &str) -> u64 {
        let mut id = stable_hash64(&name.trim().to_lowercase()) % 1_000_000;
        while self.find(id).is_some() {
            id = (id + 1) % 1_000_000;
        }
        id
    }

    pub fn find_group(&self, name: &str) -> Option<&Group> {
        let name = name.trim();
        self.groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
    }

    pub fn next_group_id(&self) -> u64 {
        self.groups
            .iter()
            .map(|group| group.id)
            .max()
            .map(|id| id + 1)
            .unwrap_or(1)
    }

    pub fn next_record_id(&self) -> u64 {
        self.history
            .iter()
            .map(|record| record.id)
            .max()
            .map(|id| id + 1)
            .unwrap_or(1)
    }
}

/// Drops repeated ids, keeping the first occurrence of each.
pub fn dedup_ids(ids: &[u64]) -> Vec<u64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}
