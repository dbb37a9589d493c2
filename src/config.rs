use crate::error::{Error, Result};
use crate::forest::DEFAULT_CAPACITY;
use crate::settings::GroveSettings;
use crate::tree::TreeParams;

/// Default world units spanning the terminal height.
pub const DEFAULT_WORLD_HEIGHT: f32 = 480.0;
pub const DEFAULT_TIME_STEP: f32 = 0.03;

/// Configuration for the animated forest
#[derive(Debug, Clone, PartialEq)]
pub struct GroveConfig {
    pub time_step: f32,
    pub seed: Option<u64>,
    pub max_trees: usize,
    pub world_height: f32,
    pub params: TreeParams,
}

/// Configuration for print mode
#[derive(Debug, Clone, PartialEq)]
pub struct PrintConfig {
    pub grove: GroveConfig,
    /// Frames to grow before printing; `None` grows to completion.
    pub ticks: Option<u32>,
    /// Randomly placed trees planted next to the initial one.
    pub extra_trees: usize,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl GroveConfig {
    /// Merge command-line overrides over the settings file over defaults.
    pub fn resolve(cli: &GroveSettings, file: &GroveSettings, seed: Option<u64>) -> Result<Self> {
        let merged = cli.or(file);
        let defaults = TreeParams::default();

        let config = Self {
            time_step: merged.time_step.unwrap_or(DEFAULT_TIME_STEP),
            seed,
            max_trees: merged.max_trees.unwrap_or(DEFAULT_CAPACITY),
            world_height: merged.world_height.unwrap_or(DEFAULT_WORLD_HEIGHT),
            params: TreeParams {
                branch_factor: merged.branch_factor.unwrap_or(defaults.branch_factor),
                growth_speed: merged.growth_speed.unwrap_or(defaults.growth_speed),
                fruit_probability: merged
                    .fruit_probability
                    .unwrap_or(defaults.fruit_probability),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.time_step >= 0.0 && self.time_step.is_finite()) {
            return Err(Error::InvalidOption(format!(
                "time step must be a non-negative number of seconds, got {}",
                self.time_step
            )));
        }
        if self.max_trees == 0 {
            return Err(Error::InvalidOption("max trees must be at least 1".into()));
        }
        if !(self.world_height > 0.0 && self.world_height.is_finite()) {
            return Err(Error::InvalidOption(format!(
                "world height must be positive, got {}",
                self.world_height
            )));
        }
        self.params.validate()?;
        Ok(())
    }
}
