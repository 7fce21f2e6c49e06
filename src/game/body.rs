use crate::config::GenerationConfig;
use crate::game::empire::EmpireId;
use crate::game::naming::generate_planet_name;
use crate::game::resources::Resources;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl From<BodyId> for u64 {
    fn from(id: BodyId) -> Self {
        id.0 as u64
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetType {
    Rocky,
    Terrestrial,
    Volcanic,
    Oceanic,
    Desert,
    Jungle,
    Arctic,
    GasGiant,
    IceGiant,
}

impl PlanetType {
    /// Inclusive size range for this planet type.
    pub fn size_range(self) -> std::ops::RangeInclusive<u8> {
        match self {
            PlanetType::GasGiant | PlanetType::IceGiant => 7..=10,
            PlanetType::Terrestrial | PlanetType::Oceanic | PlanetType::Jungle => 4..=7,
            _ => 1..=5,
        }
    }
}

/// Distance band of an orbit; drives the planet type distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitTier {
    Inner,
    Middle,
    Outer,
}

impl OrbitTier {
    pub fn for_orbit(orbit: u32) -> Self {
        match orbit {
            0..=2 => OrbitTier::Inner,
            3..=4 => OrbitTier::Middle,
            _ => OrbitTier::Outer,
        }
    }

    /// Planet types with integer percentage weights.
    pub fn planet_weights(self) -> &'static [(PlanetType, u32)] {
        match self {
            OrbitTier::Inner => &[
                (PlanetType::Rocky, 50),
                (PlanetType::Terrestrial, 30),
                (PlanetType::Volcanic, 20),
            ],
            OrbitTier::Middle => &[
                (PlanetType::Terrestrial, 30),
                (PlanetType::Oceanic, 20),
                (PlanetType::Desert, 20),
                (PlanetType::Jungle, 15),
                (PlanetType::Arctic, 15),
            ],
            OrbitTier::Outer => &[
                (PlanetType::GasGiant, 50),
                (PlanetType::IceGiant, 40),
                (PlanetType::Arctic, 10),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyKind {
    Planet {
        planet_type: PlanetType,
        size: u8,
        storage_capacity: Resources,
    },
    AsteroidBelt,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    /// 1-based orbit slot inside the owning system.
    pub orbit: u32,
    pub kind: BodyKind,
    pub production: Resources,
    /// Back-reference to the controlling empire, if any.
    pub owner: Option<EmpireId>,
}

impl Body {
    pub fn is_planet(&self) -> bool {
        matches!(self.kind, BodyKind::Planet { .. })
    }

    /// Storage this body adds to its owner. Asteroid belts add none.
    pub fn storage_capacity(&self) -> Option<Resources> {
        match &self.kind {
            BodyKind::Planet {
                storage_capacity, ..
            } => Some(*storage_capacity),
            BodyKind::AsteroidBelt => None,
        }
    }

    pub fn is_owned_by(&self, empire: EmpireId) -> bool {
        self.owner == Some(empire)
    }
}

pub(crate) fn weighted_pick<T: Copy>(rng: &mut ChaCha8Rng, options: &[(T, u32)]) -> T {
    let total_weight: u32 = options.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total_weight.max(1));
    for (item, weight) in options {
        if roll < *weight {
            return *item;
        }
        roll -= *weight;
    }
    options[options.len() - 1].0
}

/// Produces single planets and asteroid belts.
#[derive(Clone, Debug)]
pub struct BodyGenerator {
    config: GenerationConfig,
}

impl BodyGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, rng: &mut ChaCha8Rng, id: BodyId, orbit: u32) -> Body {
        let production = self.roll_production(rng);
        let belt = orbit >= 3 && rng.gen::<f64>() < self.config.asteroid_belt_chance;

        if belt {
            return Body {
                id,
                name: format!("{} Belt", generate_planet_name(rng)),
                orbit,
                kind: BodyKind::AsteroidBelt,
                production,
                owner: None,
            };
        }

        let planet_type = weighted_pick(rng, OrbitTier::for_orbit(orbit).planet_weights());
        let size = rng.gen_range(planet_type.size_range());
        Body {
            id,
            name: generate_planet_name(rng),
            orbit,
            kind: BodyKind::Planet {
                planet_type,
                size,
                storage_capacity: Resources::splat(self.config.storage_capacity),
            },
            production,
            owner: None,
        }
    }

    fn roll_production(&self, rng: &mut ChaCha8Rng) -> Resources {
        let range = self.config.production.min..=self.config.production.max;
        Resources::new(
            rng.gen_range(range.clone()),
            rng.gen_range(range.clone()),
            rng.gen_range(range.clone()),
            rng.gen_range(range),
        )
    }
}
