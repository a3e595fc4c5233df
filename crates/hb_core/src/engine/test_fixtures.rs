//! Shared builders for unit and scenario tests.

use super::config::EngineConfig;
use super::match_state::MatchState;
use super::positioning::kickoff_position;
use crate::models::{PlayerAttributes, PlayerData, PlayerPosition, Tactic, TeamData};

/// Ten players: goalkeeper + six field players starting, three on the bench
/// (one of them a goalkeeper). Player ids are `team_id * 100 + index`.
pub fn basic_team(id: u32, name: &str) -> TeamData {
    let roles = [
        PlayerPosition::Goalkeeper,
        PlayerPosition::LeftWing,
        PlayerPosition::LeftBack,
        PlayerPosition::CentreBack,
        PlayerPosition::Pivot,
        PlayerPosition::RightBack,
        PlayerPosition::RightWing,
        PlayerPosition::Goalkeeper,
        PlayerPosition::LeftBack,
        PlayerPosition::RightWing,
    ];
    let players: Vec<PlayerData> = roles
        .iter()
        .enumerate()
        .map(|(i, role)| {
            PlayerData::new(id * 100 + i as u32, format!("{name} {}", role.code()), *role)
                .with_attributes(PlayerAttributes::uniform(12))
        })
        .collect();
    let lineup = players.iter().take(7).map(|p| p.id).collect();
    TeamData::new(id, name, players).with_lineup(lineup)
}

/// Default-config state between two basic teams, players on their throw-off spots.
/// Phase is still `PreKickOff` with setup pending.
pub fn basic_state(seed: u64) -> MatchState {
    let home = basic_team(1, "Home");
    let away = basic_team(2, "Away");
    let mut state = MatchState::new(&home, Tactic::default(), &away, Tactic::default(), EngineConfig::default(), seed)
        .expect("basic teams are valid");
    for id in state.all_active() {
        let spot = kickoff_position(&state, id);
        state.player_mut(id).teleport(spot);
    }
    state
}
