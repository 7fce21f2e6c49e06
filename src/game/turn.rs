//! End-of-turn processing.
//!
//! Each turn every empire collects the production of the bodies it owns and
//! stores it, capped per resource at the combined storage of its planets.
//! Asteroid belts produce but add no storage. Whatever does not fit is lost.

use crate::error::Result;
use crate::game::empire::Empire;
use crate::game::galaxy::Galaxy;
use crate::game::resources::Resources;
use crate::game::Game;
use tracing::{debug, info};

pub struct TurnEngine;

impl TurnEngine {
    /// Total per-turn production of everything `empire` owns.
    pub fn calculate_resource_production(galaxy: &Galaxy, empire: &Empire) -> Resources {
        empire.owned_bodies(galaxy).map(|b| b.production).sum()
    }

    /// Add this turn's production to the empire's stockpile. Returns the new stockpile.
    pub fn update_empire_resources(galaxy: &Galaxy, empire: &mut Empire) -> Resources {
        let produced = Self::calculate_resource_production(galaxy, empire);
        let capacity = empire.capacity(galaxy);
        empire.storage = empire.storage.stored_with(produced, capacity);
        debug!(
            empire = %empire.id,
            produced = ?produced.as_tuple(),
            stored = ?empire.storage.as_tuple(),
            "updated empire resources"
        );
        empire.storage
    }

    /// Run one full turn and advance the counter. Returns the new turn number.
    ///
    /// A game whose counter is already at its maximum is rejected before any
    /// stockpile changes.
    pub fn process(game: &mut Game) -> Result<u32> {
        game.next_turn()?;
        for empire in game.empires.iter_mut() {
            Self::update_empire_resources(&game.galaxy, empire);
        }
        let turn = game.tick()?;
        info!(game = %game.id, turn, "processed turn");
        Ok(turn)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::archetype::Difficulty;
    use crate::game::galaxy::GalaxySize;
    use crate::game::orbit::MAX_ORBITS;
    use crate::game::service::{GameService, NewGameRequest};
    use crate::game::store::{GameStore, MemoryGameStore};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn new_game(seed: u64, computers: usize, difficulty: Difficulty) -> Game {
        let mut service = GameService::new(MemoryGameStore::new(), GameConfig::default(), seed);
        let mut request = NewGameRequest::new("Prop Tester");
        request.galaxy_size = GalaxySize::Small;
        request.num_computer_empires = Some(computers);
        request.difficulty = difficulty;
        let id = service.new_game(request).unwrap();
        service.into_store().remove(id).unwrap()
    }

    fn difficulty() -> impl Strategy<Value = Difficulty> {
        prop_oneof![
            Just(Difficulty::Easy),
            Just(Difficulty::Normal),
            Just(Difficulty::Hard),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_storage_grows_and_stays_under_capacity(
            seed in any::<u64>(),
            computers in 1usize..=7,
            turns in 1usize..12,
        ) {
            let mut game = new_game(seed, computers, Difficulty::Normal);
            for _ in 0..turns {
                let before: Vec<Resources> = game.empires.iter().map(|e| e.storage).collect();
                TurnEngine::process(&mut game).unwrap();
                for (empire, old) in game.empires.iter().zip(before) {
                    let capacity = empire.capacity(&game.galaxy);
                    for kind in crate::game::resources::ResourceKind::ALL {
                        prop_assert!(empire.storage.get(kind) >= old.get(kind));
                        prop_assert!(empire.storage.get(kind) <= capacity.get(kind));
                    }
                }
            }
            prop_assert_eq!(game.turn as usize, 1 + turns);
        }

        #[test]
        fn prop_generated_games_keep_orbits_and_exploration_consistent(
            seed in any::<u64>(),
            computers in 1usize..=7,
        ) {
            let game = new_game(seed, computers, Difficulty::Normal);
            let explored = game.galaxy.systems().iter().filter(|s| s.explored).count();
            prop_assert_eq!(explored, 1);
            prop_assert_eq!(game.galaxy.explored_count(), 1);

            let mut coordinates = HashSet::new();
            for system in game.galaxy.systems() {
                prop_assert!(coordinates.insert(system.coordinates));
                prop_assert!(!system.bodies.is_empty());
                prop_assert!(system.bodies.len() <= MAX_ORBITS);
                let orbits: HashSet<u32> = system.bodies.iter().map(|b| b.orbit).collect();
                prop_assert_eq!(orbits.len(), system.bodies.len());
                prop_assert!(orbits.iter().all(|o| (1..=MAX_ORBITS as u32).contains(o)));
            }
        }

        #[test]
        fn prop_empire_names_and_colors_are_unique(
            seed in any::<u64>(),
            computers in 1usize..=7,
            difficulty in difficulty(),
        ) {
            let game = new_game(seed, computers, difficulty);
            prop_assert_eq!(game.empires.len(), computers + 1);

            let names: HashSet<&str> = game.empires.iter().map(|e| e.name.as_str()).collect();
            let colors: HashSet<String> =
                game.empires.iter().map(|e| e.color.to_ascii_uppercase()).collect();
            prop_assert_eq!(names.len(), game.empires.len());
            prop_assert_eq!(colors.len(), game.empires.len());

            let owners: HashSet<_> = game.galaxy.bodies().filter_map(|b| b.owner).collect();
            prop_assert_eq!(owners.len(), game.empires.len());
        }
    }
}
