use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generator::{DEFAULT_RETRY_BUDGET, DEFAULT_SEED};
use crate::matcher::DEFAULT_MIN_MATCH;
use crate::piece::Kind;

/// Largest accepted board side.
pub const MAX_DIMENSION: i32 = 64;

/// Board configuration, loadable from TOML. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    /// Number of piece kinds in play, taken from the front of [`Kind::ALL`].
    pub kinds: usize,
    pub min_match: usize,
    /// Re-rolls allowed across one fill before a match is accepted.
    pub retry_budget: usize,
    /// Seconds a swap (or its rollback) takes to animate.
    pub swap_time: f32,
    /// Seconds a collapsing piece takes to fall.
    pub collapse_time: f32,
    pub seed: Option<u64>,
    /// Refill empty cells once a cascade settles.
    pub refill: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: 7,
            height: 9,
            kinds: 5,
            min_match: DEFAULT_MIN_MATCH,
            retry_budget: DEFAULT_RETRY_BUDGET,
            swap_time: 0.5,
            collapse_time: 0.1,
            seed: None,
            refill: true,
        }
    }
}

impl BoardConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: BoardConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 || self.width > MAX_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "width must be in 1..={}",
                MAX_DIMENSION
            )));
        }
        if self.height < 1 || self.height > MAX_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "height must be in 1..={}",
                MAX_DIMENSION
            )));
        }
        if self.kinds < 2 || self.kinds > Kind::ALL.len() {
            return Err(ConfigError::Validation(format!(
                "kinds must be in 2..={}",
                Kind::ALL.len()
            )));
        }
        if self.min_match < 2 {
            return Err(ConfigError::Validation("min_match must be >= 2".into()));
        }
        if !(self.swap_time.is_finite() && self.swap_time > 0.0) {
            return Err(ConfigError::Validation("swap_time must be > 0".into()));
        }
        if !(self.collapse_time.is_finite() && self.collapse_time > 0.0) {
            return Err(ConfigError::Validation("collapse_time must be > 0".into()));
        }
        Ok(())
    }

    /// The kinds in play.
    pub fn palette(&self) -> &'static [Kind] {
        &Kind::ALL[..self.kinds.min(Kind::ALL.len())]
    }

    pub fn swap_duration(&self) -> Duration {
        Duration::from_secs_f32(self.swap_time.max(0.0))
    }

    pub fn collapse_duration(&self) -> Duration {
        Duration::from_secs_f32(self.collapse_time.max(0.0))
    }

    pub fn rng_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}
