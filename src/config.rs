//! Typed game configuration.
//!
//! The default configuration lives in `data/game_config.ron` and is embedded at
//! build time. Hosts that ship their own balance file can load it with
//! [`GameConfig::parse`] or [`GameConfig::from_file`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::game::archetype::{Archetype, DifficultyTable, Perks};
use crate::game::empire::ResearchLevels;
use crate::game::galaxy::GalaxySize;

const DEFAULT_CONFIG: &str = include_str!("../data/game_config.ron");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub defaults: Defaults,
    pub empire_archetypes: Vec<Archetype>,
    pub game_settings: GameSettings,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Values every new empire starts from before archetype or difficulty tweaks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub perks: Perks,
    pub starting_resources: DifficultyTable,
    pub research_levels: ResearchLevels,
    pub player_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub min_computer_empires: usize,
    pub max_computer_empires: usize,
    pub default_computer_empires: usize,
    pub galaxy_sizes: GalaxySizeTable,
    pub perk_bounds: PerkBounds,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GalaxySizeTable {
    pub small: SizeProfile,
    pub medium: SizeProfile,
    pub large: SizeProfile,
}

impl GalaxySizeTable {
    pub fn profile(&self, size: GalaxySize) -> &SizeProfile {
        match size {
            GalaxySize::Small => &self.small,
            GalaxySize::Medium => &self.medium,
            GalaxySize::Large => &self.large,
        }
    }
}

/// System count range and disk radius for one galaxy size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeProfile {
    pub min_systems: u32,
    pub max_systems: u32,
    pub radius: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerkBounds {
    pub min: f64,
    pub max: f64,
}

impl PerkBounds {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRange {
    pub min: u64,
    pub max: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chance that a body at orbit 3 or further out is an asteroid belt.
    pub asteroid_belt_chance: f64,
    pub production: ProductionRange,
    /// Per-resource storage capacity of every generated planet.
    pub storage_capacity: u64,
    pub max_discovery_level: u8,
    pub fallback_color_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            asteroid_belt_chance: 0.15,
            production: ProductionRange { min: 0, max: 100 },
            storage_capacity: 100,
            max_discovery_level: 6,
            fallback_color_attempts: 256,
        }
    }
}

impl GameConfig {
    /// Parse and validate a RON configuration document.
    pub fn parse(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Reject configurations the generators cannot honor.
    pub fn validate(&self) -> Result<()> {
        let settings = &self.game_settings;
        if settings.min_computer_empires > settings.max_computer_empires {
            return Err(GameError::Config(format!(
                "min_computer_empires {} exceeds max_computer_empires {}",
                settings.min_computer_empires, settings.max_computer_empires
            )));
        }
        if !(settings.min_computer_empires..=settings.max_computer_empires)
            .contains(&settings.default_computer_empires)
        {
            return Err(GameError::Config(
                "default_computer_empires outside min/max range".to_string(),
            ));
        }
        if settings.perk_bounds.min > settings.perk_bounds.max {
            return Err(GameError::Config("perk_bounds min exceeds max".to_string()));
        }
        for size in GalaxySize::ALL {
            let profile = settings.galaxy_sizes.profile(size);
            if profile.min_systems == 0 || profile.min_systems > profile.max_systems {
                return Err(GameError::Config(format!(
                    "invalid system range for {size} galaxy"
                )));
            }
            if profile.radius <= 0 {
                return Err(GameError::Config(format!(
                    "radius for {size} galaxy must be positive"
                )));
            }
        }
        if self.empire_archetypes.is_empty() {
            return Err(GameError::Config("no empire archetypes defined".to_string()));
        }
        if let Some(archetype) = self
            .empire_archetypes
            .iter()
            .find(|a| a.name.trim().is_empty())
        {
            return Err(GameError::Config(format!(
                "archetype with perks {:?} has an empty name",
                archetype.perks
            )));
        }
        let generation = &self.generation;
        if generation.production.min > generation.production.max {
            return Err(GameError::Config("production min exceeds max".to_string()));
        }
        if !(0.0..=1.0).contains(&generation.asteroid_belt_chance) {
            return Err(GameError::Config(
                "asteroid_belt_chance must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        // The embedded file is covered by `embedded_config_is_valid`.
        match Self::parse(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(err) => panic!("embedded game config is invalid: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::archetype::Difficulty;

    #[test]
    fn embedded_config_is_valid() {
        let config = GameConfig::parse(DEFAULT_CONFIG).expect("embedded config parses");
        assert_eq!(config.defaults.player_color, "#00FF00");
        assert!(config.empire_archetypes.len() >= 3);
        let normal = config.defaults.starting_resources.get(Difficulty::Normal);
        assert_eq!(normal.credits, 1000);
        assert_eq!(normal.research_points, 50);
    }

    #[test]
    fn inverted_empire_range_is_rejected() {
        let mut config = GameConfig::default();
        config.game_settings.min_computer_empires = 5;
        config.game_settings.max_computer_empires = 2;
        assert!(matches!(config.validate(), Err(GameError::Config(_))));
    }

    #[test]
    fn malformed_ron_is_a_config_error() {
        let err = GameConfig::parse("(defaults: oops)").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn missing_generation_section_falls_back_to_defaults() {
        let trimmed = DEFAULT_CONFIG
            .split("    generation:")
            .next()
            .expect("prefix")
            .to_string()
            + ")";
        let config = GameConfig::parse(&trimmed).expect("parses without generation");
        assert_eq!(config.generation, GenerationConfig::default());
    }
}
