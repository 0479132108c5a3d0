pub mod history;
pub mod probability;
pub mod sampler;
pub mod weight;

pub use history::{apply_draw_history, reset_history};
pub use probability::{normalize, probabilities};
pub use sampler::{
    draw, draw_with_rng, draw_without_replacement, resolve_count, select_group, DrawRequest,
    DrawResult,
};
pub use weight::{WeightConfig, WeightModel};
