//! Movement settings with persistence
//!
//! Settings are saved to `~/.config/pilot/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pilot_core::TimeConfig;
use pilot_game::{LookConfig, MovementConfig};
use pilot_physics::CharacterBodyConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All tunable settings of the demo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub movement: MovementConfig,
    pub body: CharacterBodyConfig,
    pub time: TimeConfig,
    pub look: LookConfig,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pilot"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to load settings: {:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Read, parse and validate a settings file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content).context("Failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every section, and that the capsule matches the standing height
    pub fn validate(&self) -> anyhow::Result<()> {
        self.movement.validate().context("Invalid movement settings")?;
        self.body.validate().context("Invalid body settings")?;
        self.time.validate().context("Invalid time settings")?;
        anyhow::ensure!(
            (self.body.height - self.movement.standing_height).abs() <= 1e-4,
            "body height ({}) must equal movement standing height ({})",
            self.body.height,
            self.movement.standing_height
        );
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}
