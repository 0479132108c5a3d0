use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::engine::WeightConfig;
use crate::reel::ReelConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub weights: WeightConfig,
    pub reel: ReelConfig,
}

impl DrawConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::from_toml(&contents)?
            } else {
                DrawConfig::default()
            }
        } else {
            DrawConfig::default()
        };

        config.apply_env_overrides();
        config.warn_on_suspicious_values();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_f64("PAST_DRAW_PENALTY") {
            self.weights.past_draw_penalty = value;
        }
        if let Some(value) = env_f64("BOOST_FACTOR") {
            self.weights.boost_factor = value;
        }
        if let Some(value) = env_f64("MAX_GRADE") {
            self.weights.max_grade = value;
        }
        if let Some(value) = env_f64("MIN_WEIGHT_FLOOR") {
            self.weights.min_weight_floor = value;
        }
        if let Ok(visible) = env::var("REEL_VISIBLE_ITEMS") {
            if let Ok(value) = visible.trim().parse::<usize>() {
                self.reel.visible_items = value;
            }
        }
    }

    // Out-of-range values are kept; the engine reports the consequences.
    fn warn_on_suspicious_values(&self) {
        let weights = &self.weights;
        if !(weights.past_draw_penalty > 0.0 && weights.past_draw_penalty <= 1.0) {
            warn!(value = weights.past_draw_penalty, "past_draw_penalty outside (0, 1]");
        }
        if weights.boost_factor < 0.0 {
            warn!(value = weights.boost_factor, "boost_factor is negative");
        }
        if weights.max_grade <= 0.0 {
            warn!(value = weights.max_grade, "max_grade must be positive");
        }
        if weights.min_weight_floor <= 0.0 {
            warn!(
                value = weights.min_weight_floor,
                "min_weight_floor is not positive; candidates can be excluded entirely"
            );
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
}

fn default_config_path() -> Option<PathBuf> {
    env::var("DRAW_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/draw.toml")))
}
