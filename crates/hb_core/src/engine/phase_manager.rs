//! Game phase state machine
//!
//! Explicit transitions come from the event handler through [`transition_to`];
//! this module owns the clock-driven ones (half-time, full-time), the automatic
//! follow-on rules, and the one-shot setup routine of every phase that needs one.
//!
//! ```text
//! PreKickOff ──setup──▶ KickOff ──release──▶ Attack ◀──▶ Transition
//!      ▲                   │                    │            │
//!      │ goal              ▼ timeout            ▼ loose      │
//!      └────────────── ContestedBall ◀──────────┴────────────┘
//! ```

use super::event_handler::{award_restart, nearest_side};
use super::game_phase::{GamePhase, PhaseCategory};
use super::match_state::{ActiveTimeout, MatchState, Restart, RestartKind};
use super::positioning::{finalize_target, kickoff_position};
use super::sim_player::PlayerAction;
use super::types::{PlayerId, Vec2};
use crate::models::{AttributeId, EventType, MatchStatus, TeamSide};

/// Opponents keep this far from a free throw / throw-in.
const RESTART_CLEARANCE: f32 = 3.0;
/// Players other than the thrower stand behind this radius on a seven-metre throw.
const PENALTY_CLEARANCE: f32 = 9.5;

/// Enter `phase`. Setup phases run their routine on the next [`update_phase`].
pub fn transition_to(state: &mut MatchState, phase: GamePhase) {
    log::debug!("phase {:?} -> {:?} at {:.1}s", state.phase, phase, state.time);
    state.phase = phase;
    state.phase_time = 0.0;
    state.setup_pending = phase.needs_setup();
}

fn half_ticks(state: &MatchState) -> u64 {
    let flow = &state.config.flow;
    (flow.half_duration_secs / flow.time_step).round() as u64
}

/// Half-time and full-time from the tick counter.
pub fn check_clock(state: &mut MatchState) {
    if state.phase.is_finished() {
        return;
    }
    let half = half_ticks(state);
    if state.clock_ticks >= 2 * half {
        force_finish(state, MatchStatus::Completed);
    } else if !state.second_half && state.clock_ticks >= half && state.phase != GamePhase::HalfTime {
        log::info!("half-time {}-{}", state.score[0], state.score[1]);
        transition_to(state, GamePhase::HalfTime);
    }
}

/// End the match with `status`. Idempotent.
pub fn force_finish(state: &mut MatchState, status: MatchStatus) {
    if state.phase.is_finished() {
        return;
    }
    let event_type = match status {
        MatchStatus::Completed | MatchStatus::StepLimitReached => EventType::FullTime,
        MatchStatus::Aborted => EventType::Aborted,
        MatchStatus::Cancelled => EventType::Cancelled,
    };
    let mut event = state.event(event_type).with_detail(format!("{}-{}", state.score[0], state.score[1]));
    if status == MatchStatus::StepLimitReached {
        event = event.with_detail("step limit reached");
    }
    state.log_event(event);
    state.status = status;
    state.restart = None;
    state.timeout = None;
    state.phase = GamePhase::Finished;
    state.setup_pending = false;
    log::info!("match finished ({:?}) {}-{} at {:.1}s", status, state.score[0], state.score[1], state.time);
}

/// Team timeout; play resumes in `resume` afterwards.
pub fn start_timeout(state: &mut MatchState, team: TeamSide, resume: GamePhase) {
    let remaining = state.config.flow.timeout_duration_secs;
    state.timeout = Some(ActiveTimeout { team, remaining, resume });
    transition_to(state, GamePhase::Timeout);
}

/// Phase stage of the pipeline: pending setup first, otherwise the automatic rules.
pub fn update_phase(state: &mut MatchState) {
    if state.phase.is_finished() {
        return;
    }
    if state.setup_pending {
        state.setup_pending = false;
        run_setup(state);
        return;
    }

    match state.phase.category() {
        PhaseCategory::Attack | PhaseCategory::Transition => open_play_rules(state),
        PhaseCategory::Contested => contested_rules(state),
        PhaseCategory::DeadBall => dead_ball_rules(state),
        PhaseCategory::Break => break_rules(state),
        PhaseCategory::Terminal => {}
    }
}

// ============================================================================
// Automatic rules
// ============================================================================

fn open_play_rules(state: &mut MatchState) {
    let Some(side) = state.phase.team() else {
        return;
    };
    let holder_side = state.holder_side();

    if holder_side == Some(side.opponent()) {
        transition_to(state, GamePhase::transition(side.opponent()));
        return;
    }
    if holder_side.is_none() && state.possession.is_none() {
        transition_to(state, GamePhase::ContestedBall);
        return;
    }

    if state.phase.category() == PhaseCategory::Transition {
        let crossed = state.holder().is_some_and(|id| {
            let g = &state.geometry;
            g.depth_from_goal(side, &state.player(id).position) > g.length * 0.5
        });
        if crossed || state.phase_time >= state.config.flow.transition_duration_secs {
            transition_to(state, GamePhase::attack(side));
        }
    }
}

fn contested_rules(state: &mut MatchState) {
    if let Some(side) = state.holder_side() {
        transition_to(state, GamePhase::transition(side));
        return;
    }
    if state.phase_time < state.config.flow.restart_timeout_secs {
        return;
    }

    // 아무도 공을 잡지 못함: 심판 재개
    let g = state.geometry;
    let pos = state.ball.xy();
    log::debug!("loose ball unclaimed for {:.1}s, restarting", state.phase_time);
    match g.goal_area_at(&pos) {
        Some(area) => award_restart(state, RestartKind::GoalThrow, area, g.from_goal(area, 2.0, g.width * 0.5)),
        None => {
            let team = nearest_side(state, &pos);
            award_restart(state, RestartKind::FreeThrow, team, pos);
        }
    }
}

fn dead_ball_rules(state: &mut MatchState) {
    if state.phase == GamePhase::PreKickOff || state.phase_time <= state.config.flow.restart_timeout_secs {
        return;
    }
    log::warn!("{:?} not taken within {:.1}s, ball is contested", state.phase, state.phase_time);
    state.restart = None;
    match state.holder() {
        Some(id) => {
            state.possession = Some(state.player(id).side);
            state.player_mut(id).action = PlayerAction::HoldingBall;
        }
        None => state.possession = None,
    }
    transition_to(state, GamePhase::ContestedBall);
}

fn break_rules(state: &mut MatchState) {
    match state.phase {
        GamePhase::Timeout => {
            let dt = state.dt();
            let Some(timeout) = state.timeout.as_mut() else {
                transition_to(state, GamePhase::ContestedBall);
                return;
            };
            timeout.remaining -= dt;
            if timeout.remaining <= dt * 0.5 {
                let resume = timeout.resume;
                state.timeout = None;
                transition_to(state, resume);
            }
        }
        GamePhase::HalfTime => transition_to(state, GamePhase::PreKickOff),
        _ => {}
    }
}

// ============================================================================
// Setup routines
// ============================================================================

fn run_setup(state: &mut MatchState) {
    match state.phase {
        GamePhase::PreKickOff => setup_kickoff(state),
        GamePhase::HomeSetPiece | GamePhase::AwaySetPiece => setup_set_piece(state),
        GamePhase::HomePenalty | GamePhase::AwayPenalty => setup_penalty(state),
        GamePhase::HalfTime => setup_half_time(state),
        GamePhase::Timeout => setup_timeout(state),
        _ => {}
    }
}

/// No legal thrower: fall back to a contested ball.
fn abandon_setup(state: &mut MatchState, why: &str) {
    log::warn!("{:?} setup failed ({why}), ball is contested", state.phase);
    state.restart = None;
    if state.holder().is_none() {
        state.possession = None;
    }
    transition_to(state, GamePhase::ContestedBall);
}

fn nearest_field_player(state: &MatchState, side: TeamSide, pos: &Vec2) -> Option<PlayerId> {
    state
        .active_players(side)
        .filter(|id| !state.player(*id).is_goalkeeper())
        .min_by(|a, b| {
            let da = (state.player(*a).position - pos).norm();
            let db = (state.player(*b).position - pos).norm();
            da.total_cmp(&db).then(a.cmp(b))
        })
}

/// Put `taker` on the spot with the ball, waiting to release.
fn seat_taker(state: &mut MatchState, taker: PlayerId, spot: Vec2) {
    state.player_mut(taker).teleport(spot);
    state.give_ball(taker);
    state.player_mut(taker).action = PlayerAction::TakingRestart;
}

fn setup_kickoff(state: &mut MatchState) {
    let g = state.geometry;
    let centre = g.centre();
    for id in state.all_active() {
        let spot = kickoff_position(state, id);
        let p = state.player_mut(id);
        p.reset_action();
        p.teleport(spot);
        p.hold_time = 0.0;
    }
    state.ball.place(centre);
    state.possession = None;

    let team = state.next_kickoff;
    let taker = state
        .active_players(team)
        .find(|id| state.player(*id).slot == Some(2))
        .or_else(|| nearest_field_player(state, team, &centre));
    let Some(taker) = taker else {
        abandon_setup(state, "no field player for the throw-off");
        return;
    };

    seat_taker(state, taker, centre);
    state.restart =
        Some(Restart { kind: RestartKind::ThrowOff, team, position: centre, taker: Some(taker), taken: false });
    let event = state.event(EventType::ThrowOff).with_team(team).with_player(state.roster_id(taker));
    state.log_event(event);

    match state.pending_timeout.take() {
        Some(side) => start_timeout(state, side, GamePhase::KickOff),
        None => transition_to(state, GamePhase::KickOff),
    }
}

fn setup_set_piece(state: &mut MatchState) {
    let Some(mut restart) = state.restart else {
        abandon_setup(state, "no restart recorded");
        return;
    };
    let taker = if restart.kind == RestartKind::GoalThrow {
        state.goalkeeper(restart.team).or_else(|| nearest_field_player(state, restart.team, &restart.position))
    } else {
        nearest_field_player(state, restart.team, &restart.position)
    };
    let Some(taker) = taker else {
        abandon_setup(state, "no eligible thrower");
        return;
    };

    seat_taker(state, taker, restart.position);
    restart.taker = Some(taker);
    state.restart = Some(restart);

    // 3m 규칙
    let opponents: Vec<PlayerId> = state.active_players(restart.team.opponent()).collect();
    for id in opponents {
        let pos = state.player(id).position;
        let offset = pos - restart.position;
        let dist = offset.norm();
        if dist >= RESTART_CLEARANCE {
            continue;
        }
        let dir = if dist > 1e-4 {
            offset / dist
        } else {
            Vec2::new(-state.geometry.attack_direction(restart.team), 0.0)
        };
        let spot = finalize_target(state, id, restart.position + dir * RESTART_CLEARANCE);
        state.player_mut(id).teleport(spot);
    }

    let event = state
        .event(restart.kind.event_type())
        .with_team(restart.team)
        .with_player(state.roster_id(taker))
        .with_position(restart.position.x, restart.position.y);
    state.log_event(event);
}

fn setup_penalty(state: &mut MatchState) {
    let Some(team) = state.phase.team() else {
        return;
    };
    let g = state.geometry;
    let defending = team.opponent();
    let mark = g.seven_metre_mark(defending);

    let shooter = state
        .active_players(team)
        .filter(|id| !state.player(*id).is_goalkeeper())
        .max_by(|a, b| {
            let sa = state.player(*a).attrs().get(AttributeId::Shooting);
            let sb = state.player(*b).attrs().get(AttributeId::Shooting);
            sa.cmp(&sb).then(b.cmp(a))
        });
    let Some(shooter) = shooter else {
        abandon_setup(state, "no seven-metre shooter");
        return;
    };

    seat_taker(state, shooter, mark);
    state.restart =
        Some(Restart { kind: RestartKind::SevenMetre, team, position: mark, taker: Some(shooter), taken: false });

    let keeper = state.goalkeeper(defending);
    for id in state.all_active() {
        if id == shooter {
            continue;
        }
        if Some(id) == keeper {
            let spot = g.from_goal(defending, state.config.ai.goalkeeper_line_depth, g.width * 0.5);
            state.player_mut(id).teleport(spot);
            continue;
        }
        let pos = state.player(id).position;
        if g.inside_free_throw_line(defending, &pos) {
            let spot = behind_line(state, defending, &pos, PENALTY_CLEARANCE);
            state.player_mut(id).teleport(spot);
        }
    }

    let event = state
        .event(EventType::SevenMetreThrow)
        .with_team(team)
        .with_player(state.roster_id(shooter))
        .with_position(mark.x, mark.y);
    state.log_event(event);
}

/// Same lateral position, moved straight out until `radius` from the goal.
fn behind_line(state: &MatchState, defending: TeamSide, pos: &Vec2, radius: f32) -> Vec2 {
    let g = &state.geometry;
    let buffer = state.config.movement.sideline_buffer;
    let (a, b) = g.goal_posts(defending);
    let y = pos.y.clamp(buffer, g.width - buffer);
    let dy = y - y.clamp(a.y, b.y);
    let depth = (radius * radius - dy * dy).max(0.0).sqrt().max(g.depth_from_goal(defending, pos));
    g.from_goal(defending, depth, y)
}

fn setup_half_time(state: &mut MatchState) {
    let event = state.event(EventType::HalfTime).with_detail(format!("{}-{}", state.score[0], state.score[1]));
    state.log_event(event);

    state.second_half = true;
    state.next_kickoff = state.first_half_kickoff.opponent();
    let recovery = state.config.flow.half_time_stamina_recovery;
    for p in state.players.iter_mut() {
        p.stamina = (p.stamina + recovery).min(1.0);
        p.reset_action();
        p.hold_time = 0.0;
    }
    for team in state.teams.iter_mut() {
        team.timeouts_this_half = 0;
    }
    state.restart = None;
    state.timeout = None;
    state.pending_timeout = None;
    let centre = state.geometry.centre();
    state.ball.place(centre);
    state.possession = None;
}

fn setup_timeout(state: &mut MatchState) {
    let Some(timeout) = state.timeout else {
        abandon_setup(state, "timeout without a team");
        return;
    };
    let side = timeout.team;
    state.stats_mut(side).timeouts += 1;
    let team = state.team_mut(side);
    team.timeouts_used += 1;
    team.timeouts_this_half += 1;
    let event = state.event(EventType::Timeout).with_team(side);
    state.log_event(event);
    log::info!("timeout {} at {:.1}s", side.label(), state.time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::basic_state;

    fn settle(state: &mut MatchState) {
        state.setup_pending = false;
    }

    #[test]
    fn test_kickoff_setup_seats_taker() {
        let mut state = basic_state(11);
        update_phase(&mut state);

        assert_eq!(state.phase, GamePhase::KickOff);
        let holder = state.holder().unwrap();
        assert_eq!(state.player(holder).side, state.next_kickoff);
        assert_eq!(state.player(holder).action, PlayerAction::TakingRestart);
        assert_eq!(state.player(holder).position, state.geometry.centre());
        assert_eq!(state.restart.unwrap().kind, RestartKind::ThrowOff);
        assert_eq!(state.events.last().unwrap().event_type, EventType::ThrowOff);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_half_time_then_full_time() {
        let mut state = basic_state(12);
        update_phase(&mut state);
        let half = half_ticks(&state);

        state.clock_ticks = half;
        check_clock(&mut state);
        assert_eq!(state.phase, GamePhase::HalfTime);
        update_phase(&mut state);
        assert!(state.second_half);
        assert_eq!(state.next_kickoff, state.first_half_kickoff.opponent());
        update_phase(&mut state);
        assert_eq!(state.phase, GamePhase::PreKickOff);

        state.clock_ticks = 2 * half;
        check_clock(&mut state);
        assert_eq!(state.phase, GamePhase::Finished);
        assert_eq!(state.status, MatchStatus::Completed);
        let events = state.events.len();
        force_finish(&mut state, MatchStatus::Aborted);
        assert_eq!(state.events.len(), events);
        assert_eq!(state.status, MatchStatus::Completed);
    }

    #[test]
    fn test_goal_throw_taken_by_keeper() {
        let mut state = basic_state(13);
        let spot = state.geometry.from_goal(TeamSide::Home, 2.0, 10.0);
        award_restart(&mut state, RestartKind::GoalThrow, TeamSide::Home, spot);
        update_phase(&mut state);

        let holder = state.holder().unwrap();
        assert_eq!(Some(holder), state.goalkeeper(TeamSide::Home));
        assert_eq!(state.player(holder).action, PlayerAction::TakingRestart);
        assert_eq!(state.restart.unwrap().taker, Some(holder));
    }

    #[test]
    fn test_free_throw_clears_opponents() {
        let mut state = basic_state(13);
        let spot = Vec2::new(20.0, 10.0);
        for id in state.all_active() {
            state.player_mut(id).teleport(Vec2::new(20.5, 10.5));
        }
        award_restart(&mut state, RestartKind::FreeThrow, TeamSide::Away, spot);
        update_phase(&mut state);

        for id in state.active_players(TeamSide::Home) {
            let d = (state.player(id).position - spot).norm();
            assert!(d >= RESTART_CLEARANCE - 0.5, "{id} still {d:.2}m from the throw");
        }
    }

    #[test]
    fn test_penalty_setup() {
        let mut state = basic_state(14);
        let mark = state.geometry.seven_metre_mark(TeamSide::Away);
        award_restart(&mut state, RestartKind::SevenMetre, TeamSide::Home, mark);
        assert_eq!(state.phase, GamePhase::HomePenalty);
        update_phase(&mut state);

        let shooter = state.holder().unwrap();
        assert_eq!(state.player(shooter).position, mark);
        let keeper = state.goalkeeper(TeamSide::Away);
        for id in state.all_active() {
            if id == shooter || Some(id) == keeper {
                continue;
            }
            assert!(!state.geometry.inside_free_throw_line(TeamSide::Away, &state.player(id).position));
        }
        assert_eq!(state.events.last().unwrap().event_type, EventType::SevenMetreThrow);
    }

    #[test]
    fn test_unclaimed_loose_ball_becomes_free_throw() {
        let mut state = basic_state(15);
        state.phase = GamePhase::ContestedBall;
        settle(&mut state);
        state.ball.place(Vec2::new(20.0, 10.0));
        state.phase_time = state.config.flow.restart_timeout_secs;
        update_phase(&mut state);

        assert!(state.phase.is_set_piece());
        assert_eq!(state.restart.unwrap().kind, RestartKind::FreeThrow);
    }

    #[test]
    fn test_restart_not_taken_reverts_to_contested() {
        let mut state = basic_state(16);
        update_phase(&mut state);
        state.phase_time = state.config.flow.restart_timeout_secs + 0.1;
        update_phase(&mut state);

        assert_eq!(state.phase, GamePhase::ContestedBall);
        assert!(state.restart.is_none());
        let holder = state.holder().unwrap();
        assert_eq!(state.player(holder).action, PlayerAction::HoldingBall);
        update_phase(&mut state);
        assert_eq!(state.phase, GamePhase::transition(state.player(holder).side));
    }

    #[test]
    fn test_transition_becomes_attack_over_halfway() {
        let mut state = basic_state(17);
        state.phase = GamePhase::TransitionToHomeAttack;
        settle(&mut state);
        let id = state.team(TeamSide::Home).on_court[2];
        state.player_mut(id).teleport(Vec2::new(25.0, 10.0));
        state.give_ball(id);
        update_phase(&mut state);
        assert_eq!(state.phase, GamePhase::HomeAttack);

        let thief = state.team(TeamSide::Away).on_court[2];
        state.give_ball(thief);
        update_phase(&mut state);
        assert_eq!(state.phase, GamePhase::TransitionToAwayAttack);
    }

    #[test]
    fn test_timeout_before_throw_off() {
        let mut state = basic_state(18);
        state.pending_timeout = Some(TeamSide::Away);
        update_phase(&mut state);
        assert_eq!(state.phase, GamePhase::Timeout);
        update_phase(&mut state);
        assert_eq!(state.stats[1].timeouts, 1);
        assert_eq!(state.team(TeamSide::Away).timeouts_this_half, 1);

        let mut ticks = 0;
        while state.phase == GamePhase::Timeout && ticks < 2000 {
            update_phase(&mut state);
            ticks += 1;
        }
        assert_eq!(state.phase, GamePhase::KickOff);
        assert!(ticks >= 590, "timeout lasted {ticks} ticks");
        assert_eq!(state.player(state.holder().unwrap()).action, PlayerAction::TakingRestart);
    }
}
