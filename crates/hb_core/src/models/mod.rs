pub mod events;
pub mod match_result;
pub mod match_statistics;
pub mod player;
pub mod side;
pub mod team;

pub use events::{EventType, MatchEvent};
pub use match_result::{MatchResult, MatchStatus};
pub use match_statistics::TeamMatchStats;
pub use player::{AttributeId, PlayerAttributes, PlayerData, PlayerPosition};
pub use side::TeamSide;
pub use team::{
    DefensiveSystem, OffensiveFocus, Tactic, TacticPace, TeamData, PLAYERS_ON_COURT,
};
