//! Orbital slot bookkeeping for a single star system.
//!
//! A system has at most [`MAX_ORBITS`] occupied slots and every slot holds at
//! most one body. Placement is checked before the body is written and the
//! whole system is re-validated afterwards; a failing post-write check undoes
//! the write before the error is returned.

use std::collections::HashSet;

use crate::error::{GameError, Result};
use crate::game::body::Body;
use crate::game::system::StarSystem;

pub const MAX_ORBITS: usize = 5;

pub struct OrbitalSlots;

impl OrbitalSlots {
    /// Check that `orbit` could take a new body in `system`.
    pub fn check_placement(system: &StarSystem, orbit: u32) -> Result<()> {
        if orbit == 0 {
            return Err(GameError::validation("orbit must be a positive integer"));
        }
        if system.bodies.iter().any(|b| b.orbit == orbit) {
            return Err(GameError::constraint(format!(
                "orbit {orbit} of system {} is already occupied",
                system.id
            )));
        }
        if system.bodies.len() >= MAX_ORBITS {
            return Err(GameError::constraint(format!(
                "system {} cannot have more than {MAX_ORBITS} occupied orbits",
                system.id
            )));
        }
        Ok(())
    }

    /// Validate the full slot state of a system.
    pub fn validate(system: &StarSystem) -> Result<()> {
        let mut used = HashSet::with_capacity(system.bodies.len());
        for body in &system.bodies {
            if body.orbit == 0 {
                return Err(GameError::validation(format!(
                    "body {} has orbit 0",
                    body.id
                )));
            }
            if !used.insert(body.orbit) {
                return Err(GameError::constraint(format!(
                    "orbit {} of system {} holds more than one body",
                    body.orbit, system.id
                )));
            }
        }
        if used.len() > MAX_ORBITS {
            return Err(GameError::constraint(format!(
                "system {} cannot have more than {MAX_ORBITS} occupied orbits",
                system.id
            )));
        }
        Ok(())
    }

    /// Place `body` into `system`, rolling back if the result is invalid.
    pub fn place(system: &mut StarSystem, body: Body) -> Result<()> {
        Self::check_placement(system, body.orbit)?;
        system.bodies.push(body);
        if let Err(err) = Self::validate(system) {
            system.bodies.pop();
            return Err(err);
        }
        system.bodies.sort_by_key(|b| b.orbit);
        Ok(())
    }
}
