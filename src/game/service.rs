//! Entry points used by the host's request layer.
//!
//! A new game reaches the store only once generation, empire creation and
//! colony assignment have all succeeded. Calls on a stored game edit it in
//! place; each step checks or stages its own changes, so a failing call leaves
//! the stored game as it was.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::info;

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::archetype::{Difficulty, Perks};
use crate::game::body::BodyId;
use crate::game::colony::ColonyAssigner;
use crate::game::empire::{EmpireId, EmpireInitializer};
use crate::game::galaxy::{GalaxyGenerator, GalaxySize};
use crate::game::store::GameStore;
use crate::game::system::SystemGenerator;
use crate::game::turn::TurnEngine;
use crate::game::view::EmpireView;
use crate::game::{Game, GameId};

#[derive(Clone, Debug, Deserialize)]
pub struct NewGameRequest {
    pub player_name: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_galaxy_size")]
    pub galaxy_size: GalaxySize,
    #[serde(default)]
    pub num_computer_empires: Option<usize>,
    #[serde(default)]
    pub player_perks: Option<Perks>,
}

fn default_galaxy_size() -> GalaxySize {
    GalaxySize::Medium
}

impl NewGameRequest {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            difficulty: Difficulty::Normal,
            galaxy_size: default_galaxy_size(),
            num_computer_empires: None,
            player_perks: None,
        }
    }
}

pub struct GameService<S: GameStore> {
    store: S,
    config: GameConfig,
    rng: ChaCha8Rng,
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S, config: GameConfig, seed: u64) -> Self {
        Self {
            store,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Generate the galaxy, create the empires and assign colonies in one go.
    pub fn new_game(&mut self, request: NewGameRequest) -> Result<GameId> {
        let mut galaxy_gen = GalaxyGenerator::with_config(self.rng.gen(), self.config.clone());
        let galaxy = galaxy_gen.generate(request.galaxy_size)?;
        let mut game = Game::new(galaxy, request.difficulty);

        let mut empires = EmpireInitializer::new(self.rng.gen(), &self.config);
        empires.initialize_game_empires(
            &mut game.empires,
            &request.player_name,
            request.num_computer_empires,
            request.difficulty,
            request.player_perks,
        )?;
        ColonyAssigner::assign(&mut game, galaxy_gen.system_generator())?;
        game.validate()?;

        let id = self.store.insert(game);
        info!(game = %id, size = %request.galaxy_size, "created new game");
        Ok(id)
    }

    pub fn game(&self, id: GameId) -> Result<&Game> {
        self.store.get(id)
    }

    pub fn initialize_game_empires(
        &mut self,
        game_id: GameId,
        player_name: &str,
        num_computer_empires: Option<usize>,
        difficulty: Option<Difficulty>,
        player_perks: Option<Perks>,
    ) -> Result<Vec<EmpireView>> {
        let mut initializer = EmpireInitializer::new(self.rng.gen(), &self.config);
        let game = self.store.get_mut(game_id)?;
        let ids = initializer.initialize_game_empires(
            &mut game.empires,
            player_name,
            num_computer_empires,
            difficulty.unwrap_or(game.difficulty),
            player_perks,
        )?;
        let game = &*game;
        Ok(ids
            .iter()
            .filter_map(|id| game.empires.get(*id))
            .map(|e| EmpireView::new(e, &game.galaxy))
            .collect())
    }

    pub fn assign_colony_planets(&mut self, game_id: GameId) -> Result<Vec<(EmpireId, BodyId)>> {
        let mut systems = SystemGenerator::new(self.rng.gen(), self.config.generation.clone());
        let game = self.store.get_mut(game_id)?;
        ColonyAssigner::assign(game, &mut systems)
    }

    pub fn process_turn(&mut self, game_id: GameId) -> Result<&Game> {
        let game = self.store.get_mut(game_id)?;
        TurnEngine::process(game)?;
        Ok(game)
    }

    pub fn get_empire(&self, game_id: GameId, empire_id: EmpireId) -> Result<EmpireView> {
        let game = self.store.get(game_id)?;
        let empire = game.empire(empire_id)?;
        Ok(EmpireView::new(empire, &game.galaxy))
    }

    pub fn list_empires(&self, game_id: GameId) -> Result<Vec<EmpireView>> {
        let game = self.store.get(game_id)?;
        Ok(game
            .empires
            .iter()
            .map(|e| EmpireView::new(e, &game.galaxy))
            .collect())
    }

    pub fn delete_game(&mut self, game_id: GameId) -> Result<Game> {
        self.store.remove(game_id)
    }
}
