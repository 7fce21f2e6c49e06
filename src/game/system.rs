use crate::config::GenerationConfig;
use crate::error::{GameError, Result};
use crate::game::body::{Body, BodyGenerator};
use crate::game::galaxy::Galaxy;
use crate::game::naming::generate_system_name;
use crate::game::orbit::{OrbitalSlots, MAX_ORBITS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub u32);

impl From<SystemId> for u64 {
    fn from(id: SystemId) -> Self {
        id.0 as u64
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarType {
    Blue,
    White,
    Yellow,
    Orange,
    Brown,
}

impl StarType {
    pub const ALL: [StarType; 5] = [
        StarType::Blue,
        StarType::White,
        StarType::Yellow,
        StarType::Orange,
        StarType::Brown,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub star_type: StarType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub coordinates: Coordinates,
    pub star: Star,
    /// Bodies sorted by orbit.
    pub bodies: Vec<Body>,
    pub explored: bool,
    pub discovery_level: u8,
}

impl StarSystem {
    /// Body in the innermost occupied orbit.
    pub fn first_body_mut(&mut self) -> Option<&mut Body> {
        self.bodies.iter_mut().min_by_key(|b| b.orbit)
    }
}

/// Builds one star system at a time into a [`Galaxy`].
pub struct SystemGenerator {
    rng: ChaCha8Rng,
    bodies: BodyGenerator,
}

impl SystemGenerator {
    pub fn new(seed: u64, config: GenerationConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            bodies: BodyGenerator::new(config),
        }
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Create a system at `coordinates` and insert it into `galaxy`.
    ///
    /// Fails with [`GameError::ConstraintViolation`] if the coordinates are
    /// taken. On error nothing is written to the galaxy.
    pub fn generate(&mut self, galaxy: &mut Galaxy, coordinates: Coordinates) -> Result<SystemId> {
        if galaxy.system_at(coordinates).is_some() {
            return Err(GameError::constraint(format!(
                "a system already exists at {coordinates}"
            )));
        }

        let star_type = StarType::ALL[self.rng.gen_range(0..StarType::ALL.len())];
        let mut system = StarSystem {
            id: galaxy.peek_system_id(),
            name: generate_system_name(&mut self.rng),
            coordinates,
            star: Star { star_type },
            bodies: Vec::new(),
            explored: false,
            discovery_level: 0,
        };

        let body_count = self.rng.gen_range(1..=MAX_ORBITS) as u32;
        let mut next_body = galaxy.peek_body_id();
        for orbit in 1..=body_count {
            let body = self.bodies.generate(&mut self.rng, next_body, orbit);
            OrbitalSlots::place(&mut system, body)?;
            next_body.0 += 1;
        }

        debug!(
            system = %system.id,
            name = %system.name,
            %coordinates,
            bodies = system.bodies.len(),
            "generated star system"
        );
        galaxy.insert_system(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::galaxy::GalaxySize;

    #[test]
    fn generated_system_has_contiguous_orbits() {
        let mut galaxy = Galaxy::new(GalaxySize::Small);
        let mut gen = SystemGenerator::new(8, GenerationConfig::default());
        for i in 0..30 {
            let id = gen.generate(&mut galaxy, Coordinates::new(i, -i)).unwrap();
            let system = galaxy.system(id).unwrap();
            let orbits: Vec<u32> = system.bodies.iter().map(|b| b.orbit).collect();
            let expected: Vec<u32> = (1..=system.bodies.len() as u32).collect();
            assert_eq!(orbits, expected);
            assert!(!system.bodies.is_empty() && system.bodies.len() <= MAX_ORBITS);
        }
    }

    #[test]
    fn duplicate_coordinates_fail_without_side_effects() {
        let mut galaxy = Galaxy::new(GalaxySize::Small);
        let mut gen = SystemGenerator::new(1, GenerationConfig::default());
        gen.generate(&mut galaxy, Coordinates::new(4, 4)).unwrap();
        let bodies_before = galaxy.bodies().count();

        let err = gen.generate(&mut galaxy, Coordinates::new(4, 4)).unwrap_err();
        assert!(matches!(err, GameError::ConstraintViolation(_)));
        assert_eq!(galaxy.systems().len(), 1);
        assert_eq!(galaxy.bodies().count(), bodies_before);
    }

    #[test]
    fn body_ids_are_unique_across_systems() {
        let mut galaxy = Galaxy::new(GalaxySize::Small);
        let mut gen = SystemGenerator::new(2, GenerationConfig::default());
        for i in 0..10 {
            gen.generate(&mut galaxy, Coordinates::new(i, 0)).unwrap();
        }
        let mut ids: Vec<_> = galaxy.bodies().map(|b| b.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
