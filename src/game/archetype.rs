//! Empire archetypes and the starting-resource tables.
//!
//! Player and computer empires use different policies for their opening
//! stockpile. The player reads the row for the chosen difficulty; computer
//! empires scale the normal row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::empire::ResearchLevels;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| GameError::validation(format!("unknown difficulty '{s}'")))
    }
}

/// Multipliers applied by other systems (research, combat, economy, diplomacy).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Perks {
    pub research_efficiency: f64,
    pub combat_efficiency: f64,
    pub economic_efficiency: f64,
    pub diplomatic_influence: f64,
}

impl Perks {
    pub const NEUTRAL: Perks = Perks {
        research_efficiency: 1.0,
        combat_efficiency: 1.0,
        economic_efficiency: 1.0,
        diplomatic_influence: 1.0,
    };

    pub fn values(&self) -> [(&'static str, f64); 4] {
        [
            ("research_efficiency", self.research_efficiency),
            ("combat_efficiency", self.combat_efficiency),
            ("economic_efficiency", self.economic_efficiency),
            ("diplomatic_influence", self.diplomatic_influence),
        ]
    }
}

impl Default for Perks {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingResources {
    pub credits: u64,
    pub research_points: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: StartingResources,
    pub normal: StartingResources,
    pub hard: StartingResources,
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> StartingResources {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub perks: Perks,
    /// Preferred colors in order, as `#RRGGBB`.
    pub color_range: Vec<String>,
}

/// Read-only archetype and default tables, loaded once from configuration.
#[derive(Clone, Debug)]
pub struct ArchetypeRegistry {
    archetypes: Vec<Archetype>,
    starting_resources: DifficultyTable,
    default_perks: Perks,
    research_levels: ResearchLevels,
    player_color: String,
}

impl ArchetypeRegistry {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            archetypes: config.empire_archetypes.clone(),
            starting_resources: config.defaults.starting_resources.clone(),
            default_perks: config.defaults.perks,
            research_levels: config.defaults.research_levels,
            player_color: config.defaults.player_color.to_ascii_uppercase(),
        }
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn archetype(&self, index: usize) -> Result<&Archetype> {
        self.archetypes
            .get(index)
            .ok_or_else(|| GameError::not_found("archetype", index as u64))
    }

    /// Archetype for the `n`-th computer empire, wrapping around the list.
    pub fn archetype_for(&self, n: usize) -> Result<&Archetype> {
        if self.archetypes.is_empty() {
            return Err(GameError::Config("no empire archetypes defined".to_string()));
        }
        self.archetype(n % self.archetypes.len())
    }

    pub fn starting_resources(&self) -> &DifficultyTable {
        &self.starting_resources
    }

    pub fn default_perks(&self) -> Perks {
        self.default_perks
    }

    pub fn research_levels(&self) -> ResearchLevels {
        self.research_levels
    }

    pub fn player_color(&self) -> &str {
        &self.player_color
    }
}

/// Player opening stockpile: the difficulty row, as is.
pub struct PlayerStartingResourcePolicy;

impl PlayerStartingResourcePolicy {
    pub fn resolve(table: &DifficultyTable, difficulty: Difficulty) -> StartingResources {
        table.get(difficulty)
    }
}

/// Computer opening stockpile: the normal row scaled by difficulty.
pub struct ComputerStartingResourcePolicy;

impl ComputerStartingResourcePolicy {
    pub fn multiplier(difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    pub fn resolve(table: &DifficultyTable, difficulty: Difficulty) -> StartingResources {
        let base = table.get(Difficulty::Normal);
        let factor = Self::multiplier(difficulty);
        StartingResources {
            credits: (base.credits as f64 * factor) as u64,
            research_points: (base.research_points as f64 * factor) as u64,
        }
    }
}
