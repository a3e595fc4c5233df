//! Match event handler
//!
//! The only place an [`ActionResult`] touches `MatchState`. Each outcome updates
//! the team stats, player actions, ball and possession, logs an event, and picks
//! the next phase.
//!
//! | Result                    | Next phase                          |
//! |---------------------------|-------------------------------------|
//! | pass / shot released      | attack of the releasing side        |
//! | bad pass, tackle won, block, parry | `ContestedBall`            |
//! | interception, caught save, pickup  | transition of the new side |
//! | goal                      | `PreKickOff` (conceding side throws off) |
//! | foul                      | set piece or penalty of the fouled side  |
//! | out of bounds / miss      | set piece (throw-in, goal throw, corner) |

use super::actions::foul::restart_for_foul;
use super::actions::{ActionKind, ActionOutcome, ActionResult, BallLaunch, FoulSeverity};
use super::ai::coach_wants_timeout;
use super::game_phase::GamePhase;
use super::match_state::{MatchState, Restart, RestartKind};
use super::phase_manager::transition_to;
use super::sim_ball::FlightKind;
use super::types::{PlayerId, Vec2};
use crate::models::{EventType, TeamSide};

pub fn handle(state: &mut MatchState, result: ActionResult) {
    use ActionKind as K;
    use ActionOutcome as O;

    log::trace!("{:?}/{:?} at {:.1}s", result.kind, result.outcome, state.time);
    match (result.kind, result.outcome) {
        (K::Pass, O::Success) => on_pass(state, &result),
        (K::Pass, O::Turnover) => on_bad_pass(state, &result),
        (K::Shot, O::Success) => on_shot(state, &result),
        (K::Tackle, O::Success) => on_tackle_won(state, &result),
        (K::Tackle, O::Failure) => on_tackle_failed(state, &result),
        (K::Tackle, O::FoulCommitted) => on_foul(state, &result),
        (K::Interception, O::Intercepted) => on_interception(state, &result),
        (K::Block, O::Blocked) => on_block(state, &result),
        (K::Save, O::Saved) => on_save(state, &result),
        (K::Pickup, O::Success) => on_pickup(state, &result),
        (K::GoalLine, O::Goal) => on_goal(state, &result),
        (K::GoalLine, O::Miss) => on_miss(state, &result),
        (K::GoalLine, O::OutOfBounds) => on_goal_line_out(state, &result),
        (K::Sideline, O::OutOfBounds) => on_sideline_out(state, &result),
        (kind, outcome) => {
            log::warn!("unhandled outcome {:?}/{:?} at {:.1}s, ignored", kind, outcome, state.time);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn launch(state: &mut MatchState, l: &BallLaunch) {
    state.ball.launch(l.origin, l.velocity, l.spin, l.kind, l.target);
}

fn roster_id(state: &MatchState, id: Option<PlayerId>) -> Option<u32> {
    id.map(|id| state.roster_id(id))
}

/// Reset every active player's action (suspensions untouched).
fn reset_all_actions(state: &mut MatchState) {
    for p in state.players.iter_mut() {
        p.reset_action();
        p.hold_time = 0.0;
    }
}

/// Loose ball: nobody in possession, contested play.
fn to_contested(state: &mut MatchState) {
    state.possession = None;
    state.restart = None;
    transition_to(state, GamePhase::ContestedBall);
}

/// `side` just won the ball in open play.
fn to_transition(state: &mut MatchState, side: TeamSide) {
    state.restart = None;
    if state.phase.team() != Some(side) || state.phase == GamePhase::ContestedBall {
        transition_to(state, GamePhase::transition(side));
    }
}

/// Side whose active player is nearest to `pos`; ties go to the home side.
pub fn nearest_side(state: &MatchState, pos: &Vec2) -> TeamSide {
    state
        .all_active()
        .into_iter()
        .map(|id| (state.player(id).side, (state.player(id).position - pos).norm()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(TeamSide::Home, |(side, _)| side)
}

/// Dead ball for `team` at `position`; the phase setup picks the taker.
pub fn award_restart(state: &mut MatchState, kind: RestartKind, team: TeamSide, position: Vec2) {
    let position = if kind == RestartKind::SevenMetre { position } else { state.geometry.clamp_to_court(&position, 0.3) };
    state.ball.place(position);
    state.possession = Some(team);
    state.restart = Some(Restart { kind, team, position, taker: None, taken: false });
    reset_all_actions(state);
    let phase = if kind == RestartKind::SevenMetre { GamePhase::penalty(team) } else { GamePhase::set_piece(team) };
    log::debug!("{:?} to {} at ({:.1}, {:.1})", kind, team.label(), position.x, position.y);
    transition_to(state, phase);
}

/// Goal throw from inside the goal area of `team`.
fn award_goal_throw(state: &mut MatchState, team: TeamSide) {
    let g = state.geometry;
    let spot = g.from_goal(team, 2.0, g.width * 0.5);
    award_restart(state, RestartKind::GoalThrow, team, spot);
}

/// Two-minute suspension; the third one disqualifies.
pub fn apply_suspension(state: &mut MatchState, id: PlayerId) {
    let limit = state.config.flow.suspensions_for_disqualification;
    let secs = state.config.flow.suspension_secs;
    let side = state.player(id).side;

    state.player_mut(id).suspensions += 1;
    if state.player(id).suspensions >= limit {
        disqualify(state, id, "third suspension");
        return;
    }

    state.stats_mut(side).suspensions += 1;
    state.log_player_event(EventType::TwoMinuteSuspension, id);
    drop_if_holding(state, id);
    let wait = state.geometry.substitution_point(side);
    state.player_mut(id).suspend(secs, wait);
    let team = state.team_mut(side);
    team.on_court.retain(|p| *p != id);
    if !team.suspended.contains(&id) {
        team.suspended.push(id);
    }
    log::info!("{id} suspended for {secs:.0}s at {:.1}s", state.time);
}

/// Red card: off for the rest of the match, team short-handed until the replacement timer runs out.
pub fn disqualify(state: &mut MatchState, id: PlayerId, reason: &str) {
    let secs = state.config.flow.suspension_secs;
    let side = state.player(id).side;

    state.stats_mut(side).red_cards += 1;
    let event = {
        let p = state.player(id);
        state
            .event(EventType::RedCard)
            .with_team(side)
            .with_player(p.data.id)
            .with_position(p.position.x, p.position.y)
            .with_detail(reason)
    };
    state.log_event(event);
    drop_if_holding(state, id);

    let wait = state.geometry.substitution_point(side);
    let p = state.player_mut(id);
    p.suspend(0.0, wait);
    p.disqualified = true;
    let team = state.team_mut(side);
    team.on_court.retain(|p| *p != id);
    team.suspended.retain(|p| *p != id);
    team.disqualified.push(id);
    team.replacement_timers.push(secs);
    log::info!("{id} disqualified ({reason}) at {:.1}s", state.time);
}

fn drop_if_holding(state: &mut MatchState, id: PlayerId) {
    if state.holder() == Some(id) {
        let pos = state.player(id).position;
        state.ball.place(pos);
        state.possession = None;
    }
}

// ============================================================================
// Releases
// ============================================================================

fn on_pass(state: &mut MatchState, r: &ActionResult) {
    let Some(passer) = r.primary else {
        return;
    };
    let side = state.player(passer).side;
    state.stats_mut(side).passes_attempted += 1;
    if let Some(l) = &r.launch {
        launch(state, l);
    }
    state.ball.pass_target = r.secondary;
    state.ball.last_passer = Some(passer);
    state.ball.touch(passer, side);
    state.player_mut(passer).reset_action();

    let target = roster_id(state, r.secondary);
    let event = state.event(EventType::Pass).with_team(side).with_player(state.roster_id(passer)).with_target(target);
    state.log_event(event);

    state.restart = None;
    if state.phase.is_dead_ball() {
        transition_to(state, GamePhase::attack(side));
    }
}

fn on_bad_pass(state: &mut MatchState, r: &ActionResult) {
    let Some(passer) = r.primary else {
        return;
    };
    let side = state.player(passer).side;
    let stats = state.stats_mut(side);
    stats.passes_attempted += 1;
    stats.turnovers += 1;
    if let Some(l) = &r.launch {
        launch(state, l);
    }
    state.ball.last_passer = Some(passer);
    state.ball.touch(passer, side);
    state.player_mut(passer).reset_action();

    let event = state
        .event(EventType::Turnover)
        .with_team(side)
        .with_player(state.roster_id(passer))
        .with_position(r.impact_position.x, r.impact_position.y)
        .with_detail("bad pass");
    state.log_event(event);
    to_contested(state);
}

fn on_shot(state: &mut MatchState, r: &ActionResult) {
    let Some(shooter) = r.primary else {
        return;
    };
    let side = state.player(shooter).side;
    state.stats_mut(side).shots += 1;
    if let Some(l) = &r.launch {
        launch(state, l);
    }
    state.ball.last_shooter = Some(shooter);
    state.ball.last_shooter_side = Some(side);
    state.ball.is_penalty_shot = r.penalty;
    state.ball.touch(shooter, side);
    state.player_mut(shooter).reset_action();

    let pos = state.player(shooter).position;
    let mut event = state
        .event(EventType::Shot)
        .with_team(side)
        .with_player(state.roster_id(shooter))
        .with_position(pos.x, pos.y);
    if r.penalty {
        event = event.with_detail("7m");
    }
    state.log_event(event);

    state.restart = None;
    if state.phase.is_dead_ball() {
        transition_to(state, GamePhase::attack(side));
    }
}

// ============================================================================
// Goal line
// ============================================================================

fn on_goal(state: &mut MatchState, r: &ActionResult) {
    let Some(side) = state.ball.last_shooter_side.or_else(|| r.primary.map(|id| state.player(id).side)) else {
        log::warn!("goal without a shooter at {:.1}s, ignored", state.time);
        return;
    };
    let conceding = side.opponent();
    let penalty = state.ball.is_penalty_shot;

    state.score[side.index()] += 1;
    let stats = state.stats_mut(side);
    stats.goals_scored += 1;
    stats.shots_on_target += 1;
    if penalty {
        stats.penalties_scored += 1;
    }
    state.stats_mut(conceding).goals_conceded += 1;

    let assist = state
        .ball
        .last_passer
        .filter(|p| Some(*p) != r.primary && state.player(*p).side == side);
    let mut event = state
        .event(EventType::Goal)
        .with_team(side)
        .with_target(roster_id(state, assist))
        .with_position(r.impact_position.x, r.impact_position.y)
        .with_detail(format!("{}-{}", state.score[0], state.score[1]));
    if let Some(scorer) = r.primary {
        event = event.with_player(state.roster_id(scorer));
    }
    state.log_event(event);
    log::info!(
        "goal {} at {:.1}s ({}-{})",
        side.label(),
        state.time,
        state.score[0],
        state.score[1]
    );

    let centre = state.geometry.centre();
    state.ball.place(centre);
    state.ball.last_passer = None;
    state.possession = None;
    state.restart = None;
    state.next_kickoff = conceding;
    reset_all_actions(state);
    if state.pending_timeout.is_none() && coach_wants_timeout(state, conceding) {
        state.pending_timeout = Some(conceding);
    }
    transition_to(state, GamePhase::PreKickOff);
}

/// Which goal line an impact on `x` belongs to.
fn goal_line_side(state: &MatchState, impact: &Vec2) -> TeamSide {
    if impact.x < state.geometry.length * 0.5 {
        TeamSide::Home
    } else {
        TeamSide::Away
    }
}

fn on_miss(state: &mut MatchState, r: &ActionResult) {
    let defending = goal_line_side(state, &r.impact_position);
    let mut event = state
        .event(EventType::Miss)
        .with_team(defending.opponent())
        .with_position(r.impact_position.x, r.impact_position.y);
    if let Some(shooter) = r.primary {
        event = event.with_player(state.roster_id(shooter));
    }
    state.log_event(event);
    award_goal_throw(state, defending);
}

fn on_goal_line_out(state: &mut MatchState, r: &ActionResult) {
    let defending = goal_line_side(state, &r.impact_position);
    let by_defender = r
        .primary
        .map(|id| state.player(id))
        .is_some_and(|p| p.side == defending && !p.is_goalkeeper());
    if by_defender {
        // 코너 스로인
        let g = state.geometry;
        let y = if r.impact_position.y < g.width * 0.5 { 0.0 } else { g.width };
        let corner = Vec2::new(g.own_goal_x(defending), y);
        award_restart(state, RestartKind::ThrowIn, defending.opponent(), corner);
    } else {
        award_goal_throw(state, defending);
    }
}

fn on_sideline_out(state: &mut MatchState, r: &ActionResult) {
    let team = match r.primary {
        Some(id) => state.player(id).side.opponent(),
        None => state
            .ball
            .last_touch_side
            .map(TeamSide::opponent)
            .unwrap_or_else(|| nearest_side(state, &r.impact_position)),
    };
    award_restart(state, RestartKind::ThrowIn, team, r.impact_position);
}

// ============================================================================
// Defensive actions
// ============================================================================

fn on_interception(state: &mut MatchState, r: &ActionResult) {
    let Some(id) = r.primary else {
        return;
    };
    let side = state.player(id).side;
    state.stats_mut(side).interceptions += 1;
    state.stats_mut(side.opponent()).turnovers += 1;
    state.log_player_event(EventType::Interception, id);
    state.give_ball(id);
    to_transition(state, side);
}

fn on_block(state: &mut MatchState, r: &ActionResult) {
    let Some(id) = r.primary else {
        return;
    };
    let side = state.player(id).side;
    state.stats_mut(side).blocks += 1;
    state.stats_mut(side.opponent()).shots_blocked += 1;
    state.log_player_event(EventType::Block, id);
    if let Some(l) = &r.launch {
        launch(state, l);
    }
    state.ball.touch(id, side);
    to_contested(state);
}

fn on_save(state: &mut MatchState, r: &ActionResult) {
    let Some(keeper) = r.primary else {
        return;
    };
    let side = state.player(keeper).side;
    state.stats_mut(side).saves += 1;
    state.stats_mut(side.opponent()).shots_on_target += 1;

    let kind = if r.ball_secured { EventType::Save } else { EventType::Parry };
    let mut event = state
        .event(kind)
        .with_team(side)
        .with_player(state.roster_id(keeper))
        .with_target(roster_id(state, r.secondary));
    if r.penalty {
        event = event.with_detail("7m");
    }
    state.log_event(event);

    if r.ball_secured {
        state.give_ball(keeper);
        to_transition(state, side);
    } else {
        if let Some(l) = &r.launch {
            launch(state, l);
        }
        state.ball.touch(keeper, side);
        state.player_mut(keeper).reset_action();
        to_contested(state);
    }
}

fn on_pickup(state: &mut MatchState, r: &ActionResult) {
    let Some(id) = r.primary else {
        return;
    };
    let side = state.player(id).side;
    if state.ball.flight == FlightKind::Pass {
        let passer_side = state.ball.last_touch_side;
        if passer_side == Some(side) {
            state.stats_mut(side).passes_completed += 1;
            let event = state
                .event(EventType::PassCompleted)
                .with_team(side)
                .with_player(state.roster_id(id))
                .with_target(roster_id(state, state.ball.last_passer));
            state.log_event(event);
        } else {
            state.stats_mut(side).interceptions += 1;
            state.stats_mut(side.opponent()).turnovers += 1;
            state.log_player_event(EventType::Interception, id);
        }
    }
    state.give_ball(id);
    to_transition(state, side);
}

fn on_tackle_won(state: &mut MatchState, r: &ActionResult) {
    let (Some(tackler), Some(carrier)) = (r.primary, r.secondary) else {
        return;
    };
    let side = state.player(tackler).side;
    let cooldown = state.config.actions.tackle.cooldown_secs;
    let stats = state.stats_mut(side);
    stats.tackles_attempted += 1;
    stats.tackles_won += 1;
    state.stats_mut(side.opponent()).turnovers += 1;

    let event = state
        .event(EventType::TackleWon)
        .with_team(side)
        .with_player(state.roster_id(tackler))
        .with_target(Some(state.roster_id(carrier)))
        .with_position(r.impact_position.x, r.impact_position.y);
    state.log_event(event);

    if let Some(l) = &r.launch {
        launch(state, l);
    }
    state.player_mut(carrier).reset_action();
    let t = state.player_mut(tackler);
    t.reset_action();
    t.tackle_cooldown = cooldown;
    to_contested(state);
}

fn on_tackle_failed(state: &mut MatchState, r: &ActionResult) {
    let Some(tackler) = r.primary else {
        return;
    };
    let side = state.player(tackler).side;
    let cooldown = state.config.actions.tackle.cooldown_secs;
    state.stats_mut(side).tackles_attempted += 1;
    let t = state.player_mut(tackler);
    t.reset_action();
    t.tackle_cooldown = cooldown;
}

fn on_foul(state: &mut MatchState, r: &ActionResult) {
    let (Some(fouler), Some(victim)) = (r.primary, r.secondary) else {
        return;
    };
    let side = state.player(fouler).side;
    let fouled_side = side.opponent();
    let cooldown = state.config.actions.tackle.cooldown_secs;
    let severity = r.foul_severity.unwrap_or(FoulSeverity::Free);

    let stats = state.stats_mut(side);
    stats.tackles_attempted += 1;
    stats.fouls += 1;
    let event = state
        .event(EventType::Foul)
        .with_team(side)
        .with_player(state.roster_id(fouler))
        .with_target(Some(state.roster_id(victim)))
        .with_position(r.impact_position.x, r.impact_position.y);
    state.log_event(event);

    let t = state.player_mut(fouler);
    t.reset_action();
    t.tackle_cooldown = cooldown;

    match severity {
        FoulSeverity::Free => {}
        FoulSeverity::TwoMinutes => apply_suspension(state, fouler),
        FoulSeverity::RedCard => disqualify(state, fouler, "foul"),
    }

    let (kind, spot) = restart_for_foul(&state.geometry, fouled_side, &r.impact_position, severity, r.penalty);
    if kind == RestartKind::SevenMetre {
        state.stats_mut(fouled_side).penalties_awarded += 1;
    }
    award_restart(state, kind, fouled_side, spot);
}
