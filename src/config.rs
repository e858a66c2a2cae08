use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::meal::{Meal, Photo, Rating};

/// Top-level application configuration, read from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_sample_meals")]
    pub sample_meals: bool,
    #[serde(default)]
    pub photos: PhotosConfig,
    #[serde(default)]
    pub meals: Vec<SeedMeal>,
}

fn default_sample_meals() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sample_meals: default_sample_meals(),
            photos: PhotosConfig::default(),
            meals: Vec::new(),
        }
    }
}

/// Where the photo picker looks for images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotosConfig {
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub show_hidden: bool,
}

/// A meal listed in the config to start the session with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedMeal {
    pub name: String,
    #[serde(default)]
    pub rating: u8,
    pub photo: Option<PathBuf>,
}

impl AppConfig {
    pub fn photos_dir(&self) -> PathBuf {
        self.photos
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Meals the list starts with: the configured seeds, else the samples
    /// unless they are turned off. Seed photos are not decoded here; their
    /// size stays zero until re-picked.
    pub fn initial_meals(&self) -> Vec<Meal> {
        if !self.meals.is_empty() {
            return self
                .meals
                .iter()
                .filter(|m| !m.name.trim().is_empty())
                .map(|m| {
                    let photo = m.photo.as_ref().map(|path| Photo {
                        path: path.clone(),
                        width: 0,
                        height: 0,
                    });
                    let rating = Rating::new(m.rating).unwrap_or_else(|| {
                        warn!(name = %m.name, rating = m.rating, "seed meal rating clamped");
                        Rating::clamped(m.rating)
                    });
                    Meal::new(m.name.trim(), photo, rating)
                })
                .collect();
        }
        if self.sample_meals {
            crate::meal::sample_meals()
        } else {
            Vec::new()
        }
    }
}

/// Returns the mealbook config directory path (`~/.config/mealbook/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set")?;
    Ok(PathBuf::from(home).join(".config").join("mealbook"))
}

/// Returns the config file path (`~/.config/mealbook/config.toml`).
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the log file path (`~/.config/mealbook/mealbook.log`).
pub fn log_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("mealbook.log"))
}

/// Load the config from disk. Returns `Ok(None)` if the file does not exist.
pub fn load_config() -> Result<Option<AppConfig>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content).map(Some)
}

pub fn parse_config(content: &str) -> Result<AppConfig> {
    toml::from_str(content).context("Failed to parse config.toml")
}
