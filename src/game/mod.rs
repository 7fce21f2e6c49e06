pub mod archetype;
pub mod body;
pub mod colony;
pub mod empire;
pub mod galaxy;
pub mod naming;
pub mod orbit;
pub mod resources;
pub mod service;
pub mod store;
pub mod system;
pub mod turn;
pub mod view;

use crate::error::{GameError, Result};
use archetype::Difficulty;
use empire::{Empire, EmpireId, EmpireRoster};
use galaxy::Galaxy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Turn number of a freshly created game.
pub const STARTING_TURN: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl From<GameId> for u64 {
    fn from(id: GameId) -> Self {
        id.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub turn: u32,
    pub difficulty: Difficulty,
    pub galaxy: Galaxy,
    pub empires: EmpireRoster,
}

impl Game {
    pub fn new(galaxy: Galaxy, difficulty: Difficulty) -> Self {
        Self {
            id: GameId::default(),
            turn: STARTING_TURN,
            difficulty,
            galaxy,
            empires: EmpireRoster::new(),
        }
    }

    /// Advance the turn counter by one. Fails without touching the game once
    /// the counter cannot grow any further.
    pub fn tick(&mut self) -> Result<u32> {
        self.turn = self.next_turn()?;
        Ok(self.turn)
    }

    pub(crate) fn next_turn(&self) -> Result<u32> {
        self.turn.checked_add(1).ok_or_else(|| {
            GameError::constraint(format!("turn counter exhausted at turn {}", self.turn))
        })
    }

    pub fn empire(&self, id: EmpireId) -> Result<&Empire> {
        self.empires
            .get(id)
            .ok_or_else(|| GameError::not_found("empire", id))
    }

    pub fn empire_mut(&mut self, id: EmpireId) -> Result<&mut Empire> {
        self.empires
            .get_mut(id)
            .ok_or_else(|| GameError::not_found("empire", id))
    }

    /// A started game needs at least two empires and two systems, and every
    /// owned body must point at an empire of this game.
    pub fn validate(&self) -> Result<()> {
        if self.empires.len() < 2 {
            return Err(GameError::validation("game must have at least 2 empires"));
        }
        if self.galaxy.systems().len() < 2 {
            return Err(GameError::validation("game must have at least 2 star systems"));
        }
        for body in self.galaxy.bodies() {
            if let Some(owner) = body.owner {
                if self.empires.get(owner).is_none() {
                    return Err(GameError::validation(format!(
                        "body {} is owned by unknown empire {owner}",
                        body.id
                    )));
                }
            }
        }
        Ok(())
    }
}
