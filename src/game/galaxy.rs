use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::body::{Body, BodyId};
use crate::game::orbit::OrbitalSlots;
use crate::game::system::{Coordinates, StarSystem, SystemGenerator, SystemId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;
use tracing::info;

const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalaxySize {
    Small,
    Medium,
    Large,
}

impl GalaxySize {
    pub const ALL: [GalaxySize; 3] = [GalaxySize::Small, GalaxySize::Medium, GalaxySize::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            GalaxySize::Small => "small",
            GalaxySize::Medium => "medium",
            GalaxySize::Large => "large",
        }
    }
}

impl fmt::Display for GalaxySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GalaxySize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        GalaxySize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| GameError::validation(format!("unknown galaxy size '{s}'")))
    }
}

/// All star systems of one game. Owns systems, which own their bodies.
///
/// Deserialized galaxies are rebuilt through [`Galaxy::insert_system`], so
/// imported state obeys the same coordinate, id and orbit rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GalaxyData")]
pub struct Galaxy {
    pub size: GalaxySize,
    systems: Vec<StarSystem>,
    explored_count: u32,
    next_system_id: u32,
    next_body_id: u32,
}

#[derive(Deserialize)]
struct GalaxyData {
    size: GalaxySize,
    systems: Vec<StarSystem>,
    explored_count: u32,
    next_system_id: u32,
    next_body_id: u32,
}

impl TryFrom<GalaxyData> for Galaxy {
    type Error = GameError;

    fn try_from(data: GalaxyData) -> Result<Self> {
        let mut galaxy = Galaxy::new(data.size);
        for system in data.systems {
            galaxy.insert_system(system)?;
        }
        if galaxy.explored_count != data.explored_count {
            return Err(GameError::validation(format!(
                "explored_count {} does not match {} explored systems",
                data.explored_count, galaxy.explored_count
            )));
        }
        galaxy.next_system_id = galaxy.next_system_id.max(data.next_system_id);
        galaxy.next_body_id = galaxy.next_body_id.max(data.next_body_id);
        Ok(galaxy)
    }
}

impl Galaxy {
    pub fn new(size: GalaxySize) -> Self {
        Self {
            size,
            systems: Vec::new(),
            explored_count: 0,
            next_system_id: 0,
            next_body_id: 0,
        }
    }

    pub fn systems(&self) -> &[StarSystem] {
        &self.systems
    }

    pub fn explored_count(&self) -> u32 {
        self.explored_count
    }

    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.iter().find(|s| s.id == id)
    }

    pub fn system_mut(&mut self, id: SystemId) -> Option<&mut StarSystem> {
        self.systems.iter_mut().find(|s| s.id == id)
    }

    pub fn system_at(&self, coordinates: Coordinates) -> Option<&StarSystem> {
        self.systems.iter().find(|s| s.coordinates == coordinates)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.systems.iter().flat_map(|s| s.bodies.iter())
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.systems
            .iter_mut()
            .flat_map(|s| s.bodies.iter_mut())
            .find(|b| b.id == id)
    }

    pub(crate) fn peek_system_id(&self) -> SystemId {
        SystemId(self.next_system_id)
    }

    pub(crate) fn peek_body_id(&self) -> BodyId {
        BodyId(self.next_body_id)
    }

    /// Insert a fully built system.
    ///
    /// Coordinates must be unused and the orbit layout valid; the galaxy is
    /// left untouched otherwise.
    pub fn insert_system(&mut self, system: StarSystem) -> Result<SystemId> {
        if self.system_at(system.coordinates).is_some() {
            return Err(GameError::constraint(format!(
                "a system already exists at {}",
                system.coordinates
            )));
        }
        if self.system(system.id).is_some() {
            return Err(GameError::constraint(format!(
                "system id {} already in use",
                system.id
            )));
        }
        if let Some(body) = system.bodies.iter().find(|b| self.body(b.id).is_some()) {
            return Err(GameError::constraint(format!(
                "body id {} already in use",
                body.id
            )));
        }
        OrbitalSlots::validate(&system)?;

        let id = system.id;
        let next_system = id
            .0
            .checked_add(1)
            .ok_or_else(|| GameError::constraint("system ids exhausted"))?;
        let next_body = match system.bodies.iter().map(|b| b.id.0).max() {
            Some(max_body) => max_body
                .checked_add(1)
                .ok_or_else(|| GameError::constraint("body ids exhausted"))?,
            None => 0,
        };
        self.next_system_id = self.next_system_id.max(next_system);
        self.next_body_id = self.next_body_id.max(next_body);
        if system.explored {
            self.explored_count += 1;
        }
        self.systems.push(system);
        Ok(id)
    }

    /// Mark a system as visited.
    pub fn explore(&mut self, id: SystemId, discovery_level: u8) -> Result<()> {
        let system = self
            .system_mut(id)
            .ok_or_else(|| GameError::not_found("system", id))?;
        let newly_explored = !system.explored;
        system.explored = true;
        system.discovery_level = system.discovery_level.max(discovery_level);
        if newly_explored {
            self.explored_count += 1;
        }
        Ok(())
    }
}

/// Builds whole galaxies: picks a system count for the size, scatters systems
/// over a disk and explores the home system.
pub struct GalaxyGenerator {
    systems: SystemGenerator,
    config: GameConfig,
}

impl GalaxyGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        Self {
            systems: SystemGenerator::new(seed, config.generation.clone()),
            config,
        }
    }

    /// The system generator shared with later phases (colony assignment).
    pub fn system_generator(&mut self) -> &mut SystemGenerator {
        &mut self.systems
    }

    pub fn generate(&mut self, size: GalaxySize) -> Result<Galaxy> {
        let profile = self.config.game_settings.galaxy_sizes.profile(size).clone();
        let count = self
            .systems
            .rng()
            .gen_range(profile.min_systems..=profile.max_systems);

        let mut galaxy = Galaxy::new(size);
        for _ in 0..count {
            let coordinates = self.sample_free_coordinates(&galaxy, profile.radius)?;
            self.systems.generate(&mut galaxy, coordinates)?;
        }

        if let Some(home) = galaxy.systems.first().map(|s| s.id) {
            galaxy.explore(home, self.config.generation.max_discovery_level)?;
        }

        info!(
            size = %size,
            systems = galaxy.systems.len(),
            bodies = galaxy.bodies().count(),
            "generated galaxy"
        );
        Ok(galaxy)
    }

    fn sample_free_coordinates(&mut self, galaxy: &Galaxy, radius: i32) -> Result<Coordinates> {
        let rng = self.systems.rng();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let r: f64 = rng.gen::<f64>() * radius as f64;
            let angle: f64 = rng.gen::<f64>() * TAU;
            let candidate = Coordinates::new(
                (r * angle.cos()).round() as i32,
                (r * angle.sin()).round() as i32,
            );
            if galaxy.system_at(candidate).is_none() {
                return Ok(candidate);
            }
        }
        Err(GameError::constraint(format!(
            "no free coordinates left within radius {radius}"
        )))
    }
}

/// Generate a galaxy with the default configuration.
pub fn generate_galaxy(size: GalaxySize, seed: u64) -> Result<Galaxy> {
    GalaxyGenerator::new(seed).generate(size)
}
