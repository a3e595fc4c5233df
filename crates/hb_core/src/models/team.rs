use super::player::PlayerData;
use serde::{Deserialize, Serialize};

/// Number of players a team fields at once (six field players plus a goalkeeper).
pub const PLAYERS_ON_COURT: usize = 7;

/// Squad handed to the engine for one match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamData {
    pub id: u32,
    pub name: String,
    pub players: Vec<PlayerData>,
    /// Player ids of the starting seven. Everyone else starts on the bench.
    #[serde(default)]
    pub lineup: Vec<u32>,
}

impl TeamData {
    pub fn new(id: u32, name: impl Into<String>, players: Vec<PlayerData>) -> Self {
        Self { id, name: name.into(), players, lineup: Vec::new() }
    }

    pub fn with_lineup(mut self, lineup: Vec<u32>) -> Self {
        self.lineup = lineup;
        self
    }

    /// Pick the first goalkeeper and the first six field players in roster order.
    ///
    /// Returns `None` when the roster cannot produce a legal seven.
    pub fn default_lineup(&self) -> Option<Vec<u32>> {
        let gk = self.players.iter().find(|p| p.is_goalkeeper())?;
        let field: Vec<u32> = self
            .players
            .iter()
            .filter(|p| !p.is_goalkeeper())
            .take(PLAYERS_ON_COURT - 1)
            .map(|p| p.id)
            .collect();
        if field.len() < PLAYERS_ON_COURT - 1 {
            return None;
        }
        let mut lineup = vec![gk.id];
        lineup.extend(field);
        Some(lineup)
    }

    pub fn player(&self, id: u32) -> Option<&PlayerData> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// Defensive formations. Each maps tactical slots to hardcoded court coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DefensiveSystem {
    #[default]
    #[serde(rename = "6-0")]
    SixZero,
    #[serde(rename = "5-1")]
    FiveOne,
    #[serde(rename = "3-2-1")]
    ThreeTwoOne,
}

impl DefensiveSystem {
    pub fn code(&self) -> &'static str {
        match self {
            DefensiveSystem::SixZero => "6-0",
            DefensiveSystem::FiveOne => "5-1",
            DefensiveSystem::ThreeTwoOne => "3-2-1",
        }
    }
}

/// Where the attack concentrates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OffensiveFocus {
    Wings,
    #[default]
    Balanced,
    Centre,
}

/// Tempo of play: how long carriers hold the ball and how eagerly they shoot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TacticPace {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl TacticPace {
    /// Multiplier applied to decision/hold timers.
    pub fn tempo_factor(&self) -> f32 {
        match self {
            TacticPace::Slow => 1.35,
            TacticPace::Normal => 1.0,
            TacticPace::Fast => 0.7,
        }
    }

    /// Shift applied to the shot-quality threshold (negative = shoots earlier).
    pub fn shot_threshold_shift(&self) -> f32 {
        match self {
            TacticPace::Slow => 0.08,
            TacticPace::Normal => 0.0,
            TacticPace::Fast => -0.08,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Tactic {
    #[serde(default)]
    pub defensive_system: DefensiveSystem,
    #[serde(default)]
    pub offensive_focus: OffensiveFocus,
    #[serde(default)]
    pub pace: TacticPace,
}

impl Tactic {
    pub fn new(defensive_system: DefensiveSystem, offensive_focus: OffensiveFocus, pace: TacticPace) -> Self {
        Self { defensive_system, offensive_focus, pace }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerPosition;

    fn roster() -> Vec<PlayerData> {
        let mut players = vec![PlayerData::new(1, "Keeper", PlayerPosition::Goalkeeper)];
        for (i, pos) in PlayerPosition::FIELD_ORDER.iter().enumerate() {
            players.push(PlayerData::new(10 + i as u32, format!("Field {i}"), *pos));
        }
        players.push(PlayerData::new(30, "Bench", PlayerPosition::LeftBack));
        players
    }

    #[test]
    fn test_default_lineup_picks_keeper_first() {
        let team = TeamData::new(1, "Test", roster());
        let lineup = team.default_lineup().unwrap();
        assert_eq!(lineup.len(), PLAYERS_ON_COURT);
        assert_eq!(lineup[0], 1);
        assert!(!lineup.contains(&30));
    }

    #[test]
    fn test_default_lineup_requires_keeper() {
        let players: Vec<PlayerData> =
            roster().into_iter().filter(|p| !p.is_goalkeeper()).collect();
        assert!(TeamData::new(1, "NoKeeper", players).default_lineup().is_none());
    }

    #[test]
    fn test_defensive_system_serde_codes() {
        let json = serde_json::to_string(&DefensiveSystem::ThreeTwoOne).unwrap();
        assert_eq!(json, "\"3-2-1\"");
        let parsed: DefensiveSystem = serde_json::from_str("\"5-1\"").unwrap();
        assert_eq!(parsed, DefensiveSystem::FiveOne);
    }

    #[test]
    fn test_pace_ordering() {
        assert!(TacticPace::Fast.tempo_factor() < TacticPace::Slow.tempo_factor());
    }
}
