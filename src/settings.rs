use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub grove: GroveSettings,
}

/// Optional overrides; every field falls back to the next layer when unset.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct GroveSettings {
    pub time_step: Option<f32>,
    pub max_trees: Option<usize>,
    pub growth_speed: Option<f32>,
    pub branch_factor: Option<f32>,
    pub fruit_probability: Option<f32>,
    pub world_height: Option<f32>,
}

impl GroveSettings {
    /// Fields set here win; unset ones come from `fallback`.
    pub fn or(&self, fallback: &GroveSettings) -> GroveSettings {
        GroveSettings {
            time_step: self.time_step.or(fallback.time_step),
            max_trees: self.max_trees.or(fallback.max_trees),
            growth_speed: self.growth_speed.or(fallback.growth_speed),
            branch_factor: self.branch_factor.or(fallback.branch_factor),
            fruit_probability: self.fruit_probability.or(fallback.fruit_probability),
            world_height: self.world_height.or(fallback.world_height),
        }
    }
}

impl Settings {
    /// Load the user settings file. A missing file gives defaults; a broken
    /// one is logged and ignored.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|source| Error::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
            .map(Some)
            .map_err(|source| Error::Settings {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("canopy")
            .join("config.toml")
    }
}
