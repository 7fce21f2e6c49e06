use crate::game::archetype::{Difficulty, Perks};
use crate::game::body::{Body, BodyKind, PlanetType};
use crate::game::empire::{Empire, ResearchLevels};
use crate::game::galaxy::{Galaxy, GalaxySize};
use crate::game::resources::Resources;
use crate::game::system::{Coordinates, StarSystem, StarType};
use crate::game::Game;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EmpireView {
    pub id: u32,
    pub name: String,
    pub is_player: bool,
    pub color: String,
    pub credits: u64,
    pub research_points: u64,
    pub research_levels: ResearchLevels,
    pub perks: Perks,
    pub storage: Resources,
    pub controlled_systems_count: usize,
    pub controlled_planets_count: usize,
}

impl EmpireView {
    pub fn new(empire: &Empire, galaxy: &Galaxy) -> Self {
        Self {
            id: empire.id.0,
            name: empire.name.clone(),
            is_player: empire.is_player,
            color: empire.color.clone(),
            credits: empire.credits,
            research_points: empire.research_points,
            research_levels: empire.research_levels,
            perks: empire.perks,
            storage: empire.storage,
            controlled_systems_count: empire.controlled_systems_count(galaxy),
            controlled_planets_count: empire.controlled_planets_count(galaxy),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyView {
    pub id: u32,
    pub name: String,
    pub orbit: u32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet_type: Option<PlanetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u8>,
    pub mineral_production: u64,
    pub organic_production: u64,
    pub radioactive_production: u64,
    pub exotic_production: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mineral_storage_capacity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organic_storage_capacity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radioactive_storage_capacity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exotic_storage_capacity: Option<u64>,
    pub owner: Option<u32>,
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        let (kind, planet_type, size) = match &body.kind {
            BodyKind::Planet {
                planet_type, size, ..
            } => ("planet", Some(*planet_type), Some(*size)),
            BodyKind::AsteroidBelt => ("asteroid_belt", None, None),
        };
        let capacity = body.storage_capacity();
        Self {
            id: body.id.0,
            name: body.name.clone(),
            orbit: body.orbit,
            kind,
            planet_type,
            size,
            mineral_production: body.production.mineral,
            organic_production: body.production.organic,
            radioactive_production: body.production.radioactive,
            exotic_production: body.production.exotic,
            mineral_storage_capacity: capacity.map(|c| c.mineral),
            organic_storage_capacity: capacity.map(|c| c.organic),
            radioactive_storage_capacity: capacity.map(|c| c.radioactive),
            exotic_storage_capacity: capacity.map(|c| c.exotic),
            owner: body.owner.map(|o| o.0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemView {
    pub id: u32,
    pub name: String,
    pub position: Coordinates,
    pub star_type: StarType,
    pub explored: bool,
    pub discovery_level: u8,
    pub bodies: Vec<BodyView>,
}

impl From<&StarSystem> for SystemView {
    fn from(system: &StarSystem) -> Self {
        Self {
            id: system.id.0,
            name: system.name.clone(),
            position: system.coordinates,
            star_type: system.star.star_type,
            explored: system.explored,
            discovery_level: system.discovery_level,
            bodies: system.bodies.iter().map(BodyView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GalaxyView {
    pub size: GalaxySize,
    pub explored_count: u32,
    pub total_systems: usize,
    pub systems: Vec<SystemView>,
}

impl From<&Galaxy> for GalaxyView {
    fn from(galaxy: &Galaxy) -> Self {
        Self {
            size: galaxy.size,
            explored_count: galaxy.explored_count(),
            total_systems: galaxy.systems().len(),
            systems: galaxy.systems().iter().map(SystemView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameView {
    pub id: u64,
    pub turn: u32,
    pub difficulty: Difficulty,
    pub galaxy: GalaxyView,
    pub empires: Vec<EmpireView>,
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.0,
            turn: game.turn,
            difficulty: game.difficulty,
            galaxy: GalaxyView::from(&game.galaxy),
            empires: game
                .empires
                .iter()
                .map(|e| EmpireView::new(e, &game.galaxy))
                .collect(),
        }
    }
}
