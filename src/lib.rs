use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;

use config::GameConfig;
use error::Result;
use game::galaxy::{GalaxyGenerator, GalaxySize};
use game::service::{GameService, NewGameRequest};
use game::store::{GameStore, MemoryGameStore};
use game::turn::TurnEngine;
use game::view::{GalaxyView, GameView};
use game::Game;

pub use error::GameError;

// Every export is stateless: the caller keeps the serialized game between
// calls and hands it back in.

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn generate_galaxy(size: &str, seed: u64) -> String {
    respond(galaxy_json(size, seed))
}

#[wasm_bindgen]
pub fn new_game(request_json: &str, seed: u64) -> String {
    respond(new_game_state(request_json, seed))
}

#[wasm_bindgen]
pub fn process_turn(game_json: &str) -> String {
    respond(advance(game_json))
}

#[wasm_bindgen]
pub fn game_view(game_json: &str) -> String {
    respond(parse_game(game_json).map(|game| to_json(&GameView::from(&game))))
}

fn galaxy_json(size: &str, seed: u64) -> Result<String> {
    let size: GalaxySize = size.parse()?;
    let galaxy = GalaxyGenerator::new(seed).generate(size)?;
    Ok(to_json(&GalaxyView::from(&galaxy)))
}

fn new_game_state(request_json: &str, seed: u64) -> Result<String> {
    let request: NewGameRequest = serde_json::from_str(request_json)
        .map_err(|e| GameError::validation(format!("bad new game request: {e}")))?;
    let mut service = GameService::new(MemoryGameStore::new(), GameConfig::default(), seed);
    let id = service.new_game(request)?;
    let game = service.into_store().remove(id)?;
    Ok(to_json(&game))
}

fn advance(game_json: &str) -> Result<String> {
    let mut game = parse_game(game_json)?;
    TurnEngine::process(&mut game)?;
    Ok(to_json(&game))
}

fn parse_game(game_json: &str) -> Result<Game> {
    let game: Game = serde_json::from_str(game_json)
        .map_err(|e| GameError::validation(format!("bad game state: {e}")))?;
    game.validate()?;
    Ok(game)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Serialize)]
struct ErrorView {
    error: String,
}

fn respond(result: Result<String>) -> String {
    match result {
        Ok(json) => json,
        Err(err) => {
            report(&err);
            to_json(&ErrorView {
                error: err.to_string(),
            })
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn report(err: &GameError) {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
}

#[cfg(not(target_arch = "wasm32"))]
fn report(err: &GameError) {
    tracing::warn!(error = %err, "request failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_size_reports_error_json() {
        let out = generate_galaxy("enormous", 1);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["error"].as_str().unwrap().contains("enormous"));
    }

    #[test]
    fn galaxy_json_lists_systems() {
        let out = generate_galaxy("small", 5);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["explored_count"], 1);
        assert_eq!(
            value["total_systems"].as_u64().unwrap() as usize,
            value["systems"].as_array().unwrap().len()
        );
    }

    #[test]
    fn game_state_round_trips_through_turns() {
        let state = new_game(r#"{"player_name": "Ada", "galaxy_size": "small"}"#, 3);
        let game: Game = serde_json::from_str(&state).unwrap();
        assert_eq!(game.turn, 1);

        let next = process_turn(&state);
        let advanced: Game = serde_json::from_str(&next).unwrap();
        assert_eq!(advanced.turn, 2);
        assert_eq!(advanced.galaxy, game.galaxy);

        let view: serde_json::Value = serde_json::from_str(&game_view(&next)).unwrap();
        let player = &view["empires"][0];
        assert_eq!(player["is_player"], true);
        assert_eq!(player["controlled_planets_count"], 1);
    }

    fn small_game() -> serde_json::Value {
        let state = new_game(r#"{"player_name": "Ada", "galaxy_size": "small"}"#, 8);
        serde_json::from_str(&state).unwrap()
    }

    #[test]
    fn turn_at_counter_limit_is_an_error() {
        let mut state = small_game();
        state["turn"] = u32::MAX.into();
        let out: serde_json::Value =
            serde_json::from_str(&process_turn(&state.to_string())).unwrap();
        assert!(out["error"].as_str().unwrap().contains("turn counter"));
    }

    #[test]
    fn imported_game_with_duplicate_names_is_rejected() {
        let mut state = small_game();
        state["empires"]["empires"][1]["name"] = state["empires"]["empires"][0]["name"].clone();
        let out: serde_json::Value =
            serde_json::from_str(&process_turn(&state.to_string())).unwrap();
        assert!(out["error"].as_str().unwrap().contains("bad game state"));
    }

    #[test]
    fn imported_game_with_dangling_owner_is_rejected() {
        let mut state = small_game();
        state["galaxy"]["systems"][0]["bodies"][0]["owner"] = 999.into();
        let out: serde_json::Value = serde_json::from_str(&game_view(&state.to_string())).unwrap();
        assert!(out["error"].as_str().unwrap().contains("unknown empire 999"));
    }

    #[test]
    fn bad_request_json_is_a_validation_error() {
        let out = new_game(r#"{"difficulty": "normal"}"#, 3);
        assert!(out.contains("validation failed"));
    }
}
