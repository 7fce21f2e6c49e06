use crate::error::{GameError, Result};
use crate::game::body::BodyId;
use crate::game::empire::EmpireId;
use crate::game::system::{Coordinates, SystemGenerator};
use crate::game::Game;
use tracing::{debug, info};

/// Spacing of the fallback grid used when a galaxy has fewer systems than empires.
const GRID_SPACING: i32 = 2;

/// Hands every empire its starting body.
pub struct ColonyAssigner;

impl ColonyAssigner {
    /// Give the i-th empire the innermost body of the i-th system, creating
    /// systems first if there are fewer systems than empires.
    ///
    /// Runs on a copy of the galaxy; `game` is only changed on success.
    pub fn assign(
        game: &mut Game,
        systems: &mut SystemGenerator,
    ) -> Result<Vec<(EmpireId, BodyId)>> {
        let mut galaxy = game.galaxy.clone();
        let empires: Vec<EmpireId> = game.empires.iter().map(|e| e.id).collect();

        let mut slot = galaxy.systems().len() as i32;
        while galaxy.systems().len() < empires.len() {
            let coordinates = Coordinates::new(slot * GRID_SPACING, slot * GRID_SPACING);
            slot += 1;
            if galaxy.system_at(coordinates).is_some() {
                continue;
            }
            let id = systems.generate(&mut galaxy, coordinates)?;
            debug!(system = %id, %coordinates, "added system for colony assignment");
        }

        let system_ids: Vec<_> = galaxy.systems().iter().map(|s| s.id).collect();
        let mut assigned = Vec::with_capacity(empires.len());
        for (empire, system_id) in empires.iter().zip(system_ids) {
            let system = galaxy
                .system_mut(system_id)
                .ok_or_else(|| GameError::not_found("system", system_id))?;
            let body = system.first_body_mut().ok_or_else(|| {
                GameError::constraint(format!("system {system_id} has no bodies to colonize"))
            })?;
            match body.owner {
                Some(owner) if owner != *empire => {
                    return Err(GameError::constraint(format!(
                        "body {} already owned by empire {owner}",
                        body.id
                    )));
                }
                _ => body.owner = Some(*empire),
            }
            assigned.push((*empire, body.id));
        }

        game.galaxy = galaxy;
        info!(colonies = assigned.len(), "assigned starting colonies");
        Ok(assigned)
    }
}
