use crate::config::{GameConfig, GameSettings};
use crate::error::{GameError, Result};
use crate::game::archetype::{
    Archetype, ArchetypeRegistry, ComputerStartingResourcePolicy, Difficulty, Perks,
    PlayerStartingResourcePolicy,
};
use crate::game::body::Body;
use crate::game::galaxy::Galaxy;
use crate::game::naming::disambiguate;
use crate::game::resources::Resources;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

pub const MAX_PLAYER_NAME_LEN: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmpireId(pub u32);

impl From<EmpireId> for u64 {
    fn from(id: EmpireId) -> Self {
        id.0 as u64
    }
}

impl fmt::Display for EmpireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchLevels {
    pub weapons: u32,
    pub shields: u32,
    pub propulsion: u32,
    pub economics: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Empire {
    pub id: EmpireId,
    pub name: String,
    /// `#RRGGBB`, upper case.
    pub color: String,
    pub is_player: bool,
    pub perks: Perks,
    pub credits: u64,
    pub research_points: u64,
    pub research_levels: ResearchLevels,
    pub storage: Resources,
}

impl Empire {
    /// Bodies pointing back at this empire. Ownership lives on the body.
    pub fn owned_bodies<'a>(&self, galaxy: &'a Galaxy) -> impl Iterator<Item = &'a Body> + 'a {
        let id = self.id;
        galaxy.bodies().filter(move |b| b.is_owned_by(id))
    }

    /// Sum of storage capacities of owned planets.
    pub fn capacity(&self, galaxy: &Galaxy) -> Resources {
        self.owned_bodies(galaxy)
            .filter_map(Body::storage_capacity)
            .sum()
    }

    pub fn controlled_planets_count(&self, galaxy: &Galaxy) -> usize {
        self.owned_bodies(galaxy).filter(|b| b.is_planet()).count()
    }

    pub fn controlled_systems_count(&self, galaxy: &Galaxy) -> usize {
        galaxy
            .systems()
            .iter()
            .filter(|s| s.bodies.iter().any(|b| b.is_owned_by(self.id)))
            .count()
    }
}

/// Empires of one game, in creation order.
///
/// Names and colors are unique within a roster and at most one empire is the
/// player. [`EmpireRoster::insert`] enforces this for new empires; deserialized
/// rosters are checked the same way before they are accepted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RosterData")]
pub struct EmpireRoster {
    empires: Vec<Empire>,
    next_id: u32,
}

/// Wire form of [`EmpireRoster`], unchecked.
#[derive(Deserialize)]
struct RosterData {
    empires: Vec<Empire>,
    next_id: u32,
}

impl TryFrom<RosterData> for EmpireRoster {
    type Error = GameError;

    fn try_from(data: RosterData) -> Result<Self> {
        let mut roster = EmpireRoster::new();
        for mut empire in data.empires {
            if roster.get(empire.id).is_some() {
                return Err(GameError::validation(format!(
                    "empire id {} appears twice",
                    empire.id
                )));
            }
            if empire.id.0 >= data.next_id {
                return Err(GameError::validation(format!(
                    "empire id {} is not below next_id {}",
                    empire.id, data.next_id
                )));
            }
            roster.check_insert(&empire)?;
            empire.color = empire.color.to_ascii_uppercase();
            roster.empires.push(empire);
        }
        roster.next_id = data.next_id;
        Ok(roster)
    }
}

impl EmpireRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Empire> {
        self.empires.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Empire> {
        self.empires.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.empires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.empires.is_empty()
    }

    pub fn get(&self, id: EmpireId) -> Option<&Empire> {
        self.empires.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EmpireId) -> Option<&mut Empire> {
        self.empires.iter_mut().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Empire> {
        self.empires.iter().find(|e| e.is_player)
    }

    pub fn name_taken(&self, name: &str) -> bool {
        self.empires.iter().any(|e| e.name == name)
    }

    pub fn color_taken(&self, color: &str) -> bool {
        self.empires.iter().any(|e| e.color.eq_ignore_ascii_case(color))
    }

    /// Insert `empire`, assigning it a fresh id.
    pub fn insert(&mut self, mut empire: Empire) -> Result<EmpireId> {
        self.check_insert(&empire)?;
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| GameError::constraint("empire ids exhausted"))?;
        empire.id = EmpireId(self.next_id);
        empire.color = empire.color.to_ascii_uppercase();
        self.next_id = next_id;
        let id = empire.id;
        self.empires.push(empire);
        Ok(id)
    }

    fn check_insert(&self, empire: &Empire) -> Result<()> {
        if empire.is_player && self.player().is_some() {
            return Err(GameError::validation("game already has a player empire"));
        }
        if self.name_taken(&empire.name) {
            return Err(GameError::constraint(format!(
                "empire name '{}' already used in this game",
                empire.name
            )));
        }
        if self.color_taken(&empire.color) {
            return Err(GameError::constraint(format!(
                "empire color {} already used in this game",
                empire.color
            )));
        }
        Ok(())
    }
}

/// Creates player and computer empires from the archetype registry.
pub struct EmpireInitializer {
    registry: ArchetypeRegistry,
    settings: GameSettings,
    fallback_color_attempts: u32,
    rng: ChaCha8Rng,
}

impl EmpireInitializer {
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        Self {
            registry: ArchetypeRegistry::from_config(config),
            settings: config.game_settings.clone(),
            fallback_color_attempts: config.generation.fallback_color_attempts,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn registry(&self) -> &ArchetypeRegistry {
        &self.registry
    }

    pub fn create_player_empire(
        &mut self,
        roster: &mut EmpireRoster,
        name: &str,
        perks: Option<Perks>,
        difficulty: Difficulty,
    ) -> Result<EmpireId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::validation("empire name must not be empty"));
        }
        if roster.player().is_some() {
            return Err(GameError::validation("game already has a player empire"));
        }
        let perks = match perks {
            Some(perks) => self.check_perks(perks)?,
            None => self.registry.default_perks(),
        };
        let start =
            PlayerStartingResourcePolicy::resolve(self.registry.starting_resources(), difficulty);

        let id = roster.insert(Empire {
            id: EmpireId(0),
            name: name.to_string(),
            color: self.registry.player_color().to_string(),
            is_player: true,
            perks,
            credits: start.credits,
            research_points: start.research_points,
            research_levels: self.registry.research_levels(),
            storage: Resources::ZERO,
        })?;
        debug!(empire = %id, empire_name = name, %difficulty, "created player empire");
        Ok(id)
    }

    pub fn create_computer_empire(
        &mut self,
        roster: &mut EmpireRoster,
        archetype_index: usize,
        difficulty: Difficulty,
    ) -> Result<EmpireId> {
        let archetype = self.registry.archetype(archetype_index)?.clone();
        self.spawn_computer(roster, archetype, difficulty)
    }

    fn spawn_computer(
        &mut self,
        roster: &mut EmpireRoster,
        archetype: Archetype,
        difficulty: Difficulty,
    ) -> Result<EmpireId> {
        let name = disambiguate(&archetype.name, |candidate| roster.name_taken(candidate));
        let color = self.pick_color(roster, &archetype.color_range)?;
        let start =
            ComputerStartingResourcePolicy::resolve(self.registry.starting_resources(), difficulty);

        let id = roster.insert(Empire {
            id: EmpireId(0),
            name,
            color,
            is_player: false,
            perks: archetype.perks,
            credits: start.credits,
            research_points: start.research_points,
            research_levels: self.registry.research_levels(),
            storage: Resources::ZERO,
        })?;
        debug!(empire = %id, archetype = %archetype.name, "created computer empire");
        Ok(id)
    }

    /// Create the player empire and `num_computer_empires` computer empires.
    ///
    /// Either every empire is added to `roster` or none is.
    pub fn initialize_game_empires(
        &mut self,
        roster: &mut EmpireRoster,
        player_name: &str,
        num_computer_empires: Option<usize>,
        difficulty: Difficulty,
        player_perks: Option<Perks>,
    ) -> Result<Vec<EmpireId>> {
        let count = num_computer_empires.unwrap_or(self.settings.default_computer_empires);
        let (min, max) = (
            self.settings.min_computer_empires,
            self.settings.max_computer_empires,
        );
        if !(min..=max).contains(&count) {
            return Err(GameError::validation(format!(
                "number of computer empires must be between {min} and {max}, got {count}"
            )));
        }
        let player_name = validate_player_name(player_name)?;

        let mut staged = roster.clone();
        let mut ids = Vec::with_capacity(count + 1);
        ids.push(self.create_player_empire(
            &mut staged,
            &format!("{player_name}'s Empire"),
            player_perks,
            difficulty,
        )?);
        for n in 0..count {
            let archetype = self.registry.archetype_for(n)?.clone();
            ids.push(self.spawn_computer(&mut staged, archetype, difficulty)?);
        }

        *roster = staged;
        info!(empires = ids.len(), %difficulty, "initialized game empires");
        Ok(ids)
    }

    fn check_perks(&self, perks: Perks) -> Result<Perks> {
        let bounds = self.settings.perk_bounds;
        for (name, value) in perks.values() {
            if !bounds.contains(value) {
                return Err(GameError::validation(format!(
                    "perk {name} = {value} outside [{}, {}]",
                    bounds.min, bounds.max
                )));
            }
        }
        Ok(perks)
    }

    fn pick_color(&mut self, roster: &EmpireRoster, palette: &[String]) -> Result<String> {
        if let Some(color) = palette.iter().find(|c| !roster.color_taken(c)) {
            return Ok(color.to_ascii_uppercase());
        }

        warn!(palette = palette.len(), "archetype palette exhausted, using a random color");
        let mut tried = HashSet::new();
        for _ in 0..self.fallback_color_attempts {
            let candidate = format!("#{:06X}", self.rng.gen_range(0..=0xFF_FFFFu32));
            if tried.insert(candidate.clone()) && !roster.color_taken(&candidate) {
                return Ok(candidate);
            }
        }
        Err(GameError::ResourceExhausted(format!(
            "no unique color found after {} attempts",
            self.fallback_color_attempts
        )))
    }
}

pub fn validate_player_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_PLAYER_NAME_LEN {
        return Err(GameError::validation(format!(
            "player name must be 1 to {MAX_PLAYER_NAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initializer() -> EmpireInitializer {
        EmpireInitializer::new(1, &GameConfig::default())
    }

    #[test]
    fn player_empire_uses_fixed_color_and_difficulty_row() {
        let mut roster = EmpireRoster::new();
        let mut init = initializer();
        let id = init
            .create_player_empire(&mut roster, "Terran Union", None, Difficulty::Easy)
            .unwrap();
        let empire = roster.get(id).unwrap();
        assert!(empire.is_player);
        assert_eq!(empire.color, "#00FF00");
        assert_eq!((empire.credits, empire.research_points), (2000, 100));
        assert_eq!(empire.perks, Perks::NEUTRAL);
    }

    #[test]
    fn out_of_bounds_perks_are_rejected() {
        let mut roster = EmpireRoster::new();
        let perks = Perks {
            combat_efficiency: 9.0,
            ..Perks::NEUTRAL
        };
        let err = initializer()
            .create_player_empire(&mut roster, "Greedy", Some(perks), Difficulty::Normal)
            .unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
        assert!(roster.is_empty());
    }

    #[test]
    fn repeated_archetype_gets_suffix_and_next_palette_color() {
        let mut roster = EmpireRoster::new();
        let mut init = initializer();
        let a = init.create_computer_empire(&mut roster, 0, Difficulty::Normal).unwrap();
        let b = init.create_computer_empire(&mut roster, 0, Difficulty::Normal).unwrap();
        let (a, b) = (roster.get(a).unwrap(), roster.get(b).unwrap());
        assert_eq!(b.name, format!("{} 2", a.name));
        assert_ne!(a.color, b.color);
        let palette = &init.registry().archetypes()[0].color_range;
        assert_eq!(&a.color, &palette[0]);
        assert_eq!(&b.color, &palette[1]);
    }

    #[test]
    fn exhausted_palette_falls_back_to_unique_random_colors() {
        let mut roster = EmpireRoster::new();
        let mut init = initializer();
        let palette_len = init.registry().archetypes()[2].color_range.len();
        for _ in 0..palette_len + 3 {
            init.create_computer_empire(&mut roster, 2, Difficulty::Hard).unwrap();
        }
        let colors: HashSet<_> = roster.iter().map(|e| e.color.clone()).collect();
        assert_eq!(colors.len(), roster.len());
        assert!(roster.iter().all(|e| e.credits == 1500));
    }

    #[test]
    fn no_fallback_attempts_means_exhaustion_error() {
        let mut config = GameConfig::default();
        config.generation.fallback_color_attempts = 0;
        config.empire_archetypes.truncate(1);
        config.empire_archetypes[0].color_range = vec!["#123456".to_string()];
        let mut init = EmpireInitializer::new(4, &config);
        let mut roster = EmpireRoster::new();
        init.create_computer_empire(&mut roster, 0, Difficulty::Normal).unwrap();
        let err = init
            .create_computer_empire(&mut roster, 0, Difficulty::Normal)
            .unwrap_err();
        assert!(matches!(err, GameError::ResourceExhausted(_)));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn roster_rejects_duplicate_color_ignoring_case() {
        let mut roster = EmpireRoster::new();
        let mut init = initializer();
        let id = init
            .create_player_empire(&mut roster, "First", None, Difficulty::Normal)
            .unwrap();
        let mut copy = roster.get(id).unwrap().clone();
        copy.name = "Second".to_string();
        copy.is_player = false;
        copy.color = copy.color.to_ascii_lowercase();
        assert!(matches!(
            roster.insert(copy),
            Err(GameError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn initialize_rejects_count_outside_range_without_creating() {
        let config = GameConfig::default();
        let min = config.game_settings.min_computer_empires;
        let max = config.game_settings.max_computer_empires;
        let mut init = EmpireInitializer::new(2, &config);
        let mut roster = EmpireRoster::new();
        for bad in [min.saturating_sub(1), max + 1] {
            let err = init
                .initialize_game_empires(&mut roster, "Ada", Some(bad), Difficulty::Normal, None)
                .unwrap_err();
            assert!(matches!(err, GameError::Validation(_)), "count {bad}");
        }
        assert!(roster.is_empty());
    }

    #[test]
    fn initialize_creates_player_then_computers_in_archetype_order() {
        let config = GameConfig::default();
        let mut init = EmpireInitializer::new(2, &config);
        let mut roster = EmpireRoster::new();
        let count = config.game_settings.max_computer_empires;
        let ids = init
            .initialize_game_empires(&mut roster, " Ada ", Some(count), Difficulty::Normal, None)
            .unwrap();
        assert_eq!(ids.len(), count + 1);
        let first = roster.get(ids[0]).unwrap();
        assert!(first.is_player);
        assert_eq!(first.name, "Ada's Empire");
        let archetypes = init.registry().archetypes();
        for (n, id) in ids[1..].iter().enumerate() {
            let empire = roster.get(*id).unwrap();
            assert!(!empire.is_player);
            assert!(empire.name.starts_with(&archetypes[n % archetypes.len()].name));
        }
    }

    #[test]
    fn initialize_without_archetypes_creates_nothing() {
        let mut config = GameConfig::default();
        config.empire_archetypes.clear();
        let mut init = EmpireInitializer::new(2, &config);
        let mut roster = EmpireRoster::new();
        let err = init
            .initialize_game_empires(&mut roster, "Ada", Some(1), Difficulty::Normal, None)
            .unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
        assert!(roster.is_empty());
    }

    #[test]
    fn failed_initialize_leaves_roster_untouched() {
        let mut init = initializer();
        let mut roster = EmpireRoster::new();
        init.create_player_empire(&mut roster, "Existing", None, Difficulty::Normal)
            .unwrap();
        let before = roster.clone();
        let err = init
            .initialize_game_empires(&mut roster, "Ada", Some(2), Difficulty::Normal, None)
            .unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
        assert_eq!(roster, before);
    }

    fn imported(value: serde_json::Value) -> Result<EmpireRoster> {
        serde_json::from_value(value).map_err(|e| GameError::validation(e.to_string()))
    }

    fn two_empire_roster() -> serde_json::Value {
        let mut roster = EmpireRoster::new();
        let mut init = initializer();
        init.create_player_empire(&mut roster, "Home", None, Difficulty::Normal)
            .unwrap();
        init.create_computer_empire(&mut roster, 0, Difficulty::Normal)
            .unwrap();
        serde_json::to_value(&roster).unwrap()
    }

    #[test]
    fn serialized_roster_round_trips() {
        let value = two_empire_roster();
        let roster = imported(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&roster).unwrap(), value);
    }

    #[test]
    fn imported_roster_rejects_duplicate_names() {
        let mut value = two_empire_roster();
        value["empires"][1]["name"] = value["empires"][0]["name"].clone();
        let err = imported(value).unwrap_err();
        assert!(err.to_string().contains("already used"), "{err}");
    }

    #[test]
    fn imported_roster_rejects_colors_differing_only_in_case() {
        let mut value = two_empire_roster();
        let color = value["empires"][0]["color"].as_str().unwrap().to_ascii_lowercase();
        value["empires"][1]["color"] = color.into();
        assert!(imported(value).is_err());
    }

    #[test]
    fn imported_roster_rejects_second_player() {
        let mut value = two_empire_roster();
        value["empires"][1]["is_player"] = true.into();
        let err = imported(value).unwrap_err();
        assert!(err.to_string().contains("player empire"), "{err}");
    }

    #[test]
    fn imported_roster_rejects_stale_next_id() {
        let mut value = two_empire_roster();
        value["next_id"] = 1.into();
        let err = imported(value).unwrap_err();
        assert!(err.to_string().contains("next_id"), "{err}");
    }

    #[test]
    fn player_name_length_is_checked() {
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name(&"x".repeat(MAX_PLAYER_NAME_LEN + 1)).is_err());
        assert_eq!(validate_player_name(" Zed ").unwrap(), "Zed");
    }
}
