use std::collections::BTreeMap;

use crate::error::{GameError, Result};
use crate::game::{Game, GameId};

/// Storage for games. Hosts create one per request scope and pass it in;
/// nothing in the core keeps games alive on its own.
pub trait GameStore {
    /// Store `game` under a fresh id and return that id.
    fn insert(&mut self, game: Game) -> GameId;

    fn get(&self, id: GameId) -> Result<&Game>;

    fn get_mut(&mut self, id: GameId) -> Result<&mut Game>;

    /// Replace the stored game with `game` (same id).
    fn put(&mut self, game: Game) -> Result<()>;

    fn remove(&mut self, id: GameId) -> Result<Game>;

    fn ids(&self) -> Vec<GameId>;
}

#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: BTreeMap<GameId, Game>,
    next_id: u64,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for MemoryGameStore {
    fn insert(&mut self, mut game: Game) -> GameId {
        self.next_id += 1;
        let id = GameId(self.next_id);
        game.id = id;
        self.games.insert(id, game);
        id
    }

    fn get(&self, id: GameId) -> Result<&Game> {
        self.games.get(&id).ok_or_else(|| GameError::not_found("game", id))
    }

    fn get_mut(&mut self, id: GameId) -> Result<&mut Game> {
        self.games
            .get_mut(&id)
            .ok_or_else(|| GameError::not_found("game", id))
    }

    fn put(&mut self, game: Game) -> Result<()> {
        let slot = self.get_mut(game.id)?;
        *slot = game;
        Ok(())
    }

    fn remove(&mut self, id: GameId) -> Result<Game> {
        self.games
            .remove(&id)
            .ok_or_else(|| GameError::not_found("game", id))
    }

    fn ids(&self) -> Vec<GameId> {
        self.games.keys().copied().collect()
    }
}
