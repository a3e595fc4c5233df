//! Per-tick timers: action preparation, tackle cooldown, hold time, suspensions,
//! red-card replacement and possession seconds.
//!
//! Everything here runs on simulated time and stands still while the match clock
//! is paused (timeouts, half-time).

use super::match_state::MatchState;
use super::types::{PlayerId, Vec2};
use crate::models::{EventType, TeamSide, PLAYERS_ON_COURT};

pub fn update_timers(state: &mut MatchState) {
    if state.phase.clock_paused() {
        return;
    }
    let dt = state.dt();
    let holder = state.holder();

    for p in state.players.iter_mut() {
        if p.action_timer > 0.0 {
            p.action_timer = (p.action_timer - dt).max(0.0);
        }
        if p.tackle_cooldown > 0.0 {
            p.tackle_cooldown = (p.tackle_cooldown - dt).max(0.0);
        }
        if Some(p.id) == holder {
            p.hold_time += dt;
        }
    }

    for side in TeamSide::BOTH {
        update_suspensions(state, side);
        update_replacements(state, side);
    }

    if let Some(side) = state.possession {
        state.stats_mut(side).possession_secs += dt;
    }
}

fn entry_point(state: &MatchState, side: TeamSide) -> Vec2 {
    let wait = state.geometry.substitution_point(side);
    Vec2::new(wait.x, 0.5)
}

fn keeper_on_court(state: &MatchState, side: TeamSide) -> bool {
    state.team(side).on_court.iter().any(|id| state.player(*id).is_goalkeeper())
}

fn update_suspensions(state: &mut MatchState, side: TeamSide) {
    let dt = state.dt();
    let serving: Vec<PlayerId> = state.team(side).suspended.clone();

    for id in serving {
        if state.player(id).disqualified {
            continue;
        }
        let p = state.player_mut(id);
        p.suspension_timer -= dt;
        if p.suspension_timer >= dt * 0.5 {
            continue;
        }
        if state.team(side).on_court.len() >= PLAYERS_ON_COURT {
            continue;
        }
        if state.player(id).is_goalkeeper() && keeper_on_court(state, side) {
            continue;
        }

        let entry = entry_point(state, side);
        state.player_mut(id).reenter(entry);
        let team = state.team_mut(side);
        team.suspended.retain(|p| *p != id);
        team.on_court.push(id);
        state.log_player_event(EventType::ReEntry, id);
        log::debug!("{id} back from suspension at {:.1}s", state.time);
    }
}

fn update_replacements(state: &mut MatchState, side: TeamSide) {
    let dt = state.dt();
    let team = state.team_mut(side);
    if team.replacement_timers.is_empty() {
        return;
    }
    for t in team.replacement_timers.iter_mut() {
        *t -= dt;
    }

    while state.team(side).replacement_timers.iter().any(|t| *t < dt * 0.5) {
        if state.team(side).on_court.len() >= PLAYERS_ON_COURT {
            break;
        }
        let keeper_needed = !keeper_on_court(state, side)
            && !state.team(side).suspended.iter().any(|id| state.player(*id).is_goalkeeper());
        let bench = &state.team(side).bench;
        let keeper = if keeper_needed {
            bench.iter().copied().find(|id| state.player(*id).is_goalkeeper())
        } else {
            None
        };
        let pick = keeper.or_else(|| bench.iter().copied().find(|id| !state.player(*id).is_goalkeeper()));

        let team = state.team_mut(side);
        if let Some(pos) = team.replacement_timers.iter().position(|t| *t < dt * 0.5) {
            team.replacement_timers.remove(pos);
        }
        let Some(sub) = pick else {
            log::debug!("{} has nobody left on the bench", side.label());
            continue;
        };
        team.bench.retain(|p| *p != sub);
        team.on_court.push(sub);

        let entry = entry_point(state, side);
        state.player_mut(sub).reenter(entry);
        state.log_player_event(EventType::Substitution, sub);
        log::debug!("{sub} replaces a disqualified player at {:.1}s", state.time);
    }
}
