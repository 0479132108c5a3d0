pub mod generator;
pub mod rng;

pub use generator::{winner_index, ReelConfig, ReelGenerator};
pub use rng::{stable_hash64, Mulberry32, ReelSeed};
