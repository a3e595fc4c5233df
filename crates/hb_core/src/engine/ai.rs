//! AI decision layer
//!
//! Runs after the timers and before action resolution. Sets every active
//! player's `target_position` and, where a decision is due, starts a prepared
//! action (pass, shot, tackle) that the resolver picks up once its timer runs
//! out.
//!
//! ```text
//! live play:   tactical target → carrier decision → defensive press/tackle
//!              pass in flight → receiver + interceptor
//!              free ball      → one chaser per team
//! dead ball:   formation targets → restart taker releases after its delay
//! ```

use super::actions::opponent_pressure;
use super::actions::shot::goal_angle_factor;
use super::game_phase::{GamePhase, PhaseCategory};
use super::geometry::{closest_point_on_segment, distance_to_segment};
use super::match_state::{MatchState, RestartKind};
use super::positioning::{finalize_target, goalkeeper_target, kickoff_position, tactical_target};
use super::sim_ball::FlightKind;
use super::sim_player::PlayerAction;
use super::types::{PlayerId, Vec2};
use crate::models::{AttributeId, TeamSide};
use rand::Rng;

/// Decision stage of the pipeline.
pub fn update_decisions(state: &mut MatchState) {
    match state.phase.category() {
        PhaseCategory::Break | PhaseCategory::Terminal => return,
        _ if state.phase == GamePhase::PreKickOff => return,
        PhaseCategory::DeadBall => {
            dead_ball_decisions(state);
            return;
        }
        _ => {}
    }

    assign_tactical_targets(state);

    if let Some(carrier) = state.holder() {
        carrier_decision(state, carrier);
        defensive_pressure(state, carrier);
    } else if state.ball.is_in_flight() && state.ball.flight == FlightKind::Pass {
        pass_in_flight(state);
    } else if !(state.ball.is_in_flight() && state.ball.flight == FlightKind::Shot) {
        chase_free_ball(state);
    }
}

fn assign_tactical_targets(state: &mut MatchState) {
    let holder = state.holder();
    for id in state.all_active() {
        if state.player(id).action.is_prepared() {
            continue;
        }
        let target = tactical_target(state, id);
        let p = state.player_mut(id);
        p.target_position = target;
        p.target_player = None;
        p.action = if holder == Some(id) { PlayerAction::HoldingBall } else { PlayerAction::MovingToPosition };
    }
}

// ============================================================================
// Evaluation helpers
// ============================================================================

/// How good a shot from `id`'s current spot would be, 0..1.
pub fn shot_quality(state: &MatchState, id: PlayerId) -> f32 {
    let p = state.player(id);
    let g = &state.geometry;
    let defending = p.side.opponent();
    let range = state.config.ai.shoot_range.max(1.0);
    let dist = g.distance_to_goal(defending, &p.position);
    if dist > range * 1.3 {
        return 0.0;
    }
    let skill = p.attrs().blend(&[
        (AttributeId::Shooting, 0.6),
        (AttributeId::Composure, 0.2),
        (AttributeId::Technique, 0.2),
    ]);
    let dist_factor = (1.0 - (dist / range).powf(1.5)).max(0.0);
    let angle = goal_angle_factor(&p.position, defending, g);
    let pressure = opponent_pressure(state, &p.position, p.side, state.config.actions.shot.pressure_radius);
    (0.45 * skill + 0.35 * dist_factor * angle + 0.2 * (1.0 - pressure)).clamp(0.0, 1.0)
}

fn nearest_opponent_distance(state: &MatchState, pos: &Vec2, side: TeamSide) -> f32 {
    state
        .active_players(side.opponent())
        .map(|o| (state.player(o).position - pos).norm())
        .fold(f32::INFINITY, f32::min)
}

/// Whether an opponent stands within a metre of the passing lane `from`-`to`.
pub fn lane_blocked(state: &MatchState, from: &Vec2, to: &Vec2, side: TeamSide) -> bool {
    state.active_players(side.opponent()).any(|o| {
        let pos = state.player(o).position;
        (pos - from).norm() > 1.0 && distance_to_segment(&pos, from, to) < 1.0
    })
}

/// Best teammate to pass to: open, forward, in a shooting spot, with a clear lane.
///
/// With `allow_blocked` a blocked lane only lowers the score instead of
/// excluding the receiver.
pub fn best_pass_target(state: &MatchState, id: PlayerId, allow_blocked: bool) -> Option<PlayerId> {
    let p = state.player(id);
    let side = p.side;
    let defending = side.opponent();
    let g = &state.geometry;
    let own_depth = g.depth_from_goal(defending, &p.position);

    let mut best: Option<(PlayerId, f32)> = None;
    for mate in state.active_players(side) {
        let m = state.player(mate);
        if mate == id || m.is_goalkeeper() {
            continue;
        }
        let d = (m.position - p.position).norm();
        if !(2.0..=28.0).contains(&d) {
            continue;
        }
        let openness = (nearest_opponent_distance(state, &m.position, side) / 5.0).min(1.0);
        let progress = ((own_depth - g.depth_from_goal(defending, &m.position)) / 20.0).clamp(-1.0, 1.0);
        let mut score = 0.45 * openness + 0.3 * progress + 0.25 * shot_quality(state, mate) - 0.01 * d;
        if lane_blocked(state, &p.position, &m.position, side) {
            if !allow_blocked {
                continue;
            }
            score -= 0.5;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((mate, score));
        }
    }
    best.map(|(mate, _)| mate)
}

/// Coach calls a timeout when trailing by the configured margin and allowances remain.
pub fn coach_wants_timeout(state: &MatchState, side: TeamSide) -> bool {
    let flow = &state.config.flow;
    if !flow.timeouts_enabled {
        return false;
    }
    let team = state.team(side);
    if team.timeouts_used >= flow.max_timeouts_per_team || team.timeouts_this_half >= flow.max_timeouts_per_half {
        return false;
    }
    let deficit = state.score_of(side.opponent()) as i32 - state.score_of(side) as i32;
    deficit >= flow.timeout_deficit_trigger as i32
}

// ============================================================================
// Ball carrier
// ============================================================================

fn begin_pass(state: &mut MatchState, id: PlayerId, receiver: PlayerId) {
    let secs = state.config.ai.pass_preparation_secs;
    let p = state.player_mut(id);
    p.begin_action(PlayerAction::PreparingPass, secs);
    p.target_player = Some(receiver);
    p.target_position = p.position;
}

fn begin_shot(state: &mut MatchState, id: PlayerId) {
    let secs = state.config.ai.shot_preparation_secs;
    let p = state.player_mut(id);
    p.begin_action(PlayerAction::PreparingShot, secs);
    p.target_player = None;
    p.target_position = p.position;
}

fn carrier_decision(state: &mut MatchState, id: PlayerId) {
    let (side, pos, hold, is_keeper, action) = {
        let p = state.player(id);
        (p.side, p.position, p.hold_time, p.is_goalkeeper(), p.action)
    };
    if action != PlayerAction::HoldingBall {
        return;
    }
    let ai = &state.config.ai;
    let (min_hold, max_hold, keeper_hold, shoot_range, threshold, noise_amp) = (
        ai.min_hold_secs,
        ai.max_hold_secs,
        ai.goalkeeper_hold_secs,
        ai.shoot_range,
        ai.shot_quality_threshold,
        ai.decision_noise,
    );

    if is_keeper {
        if hold >= keeper_hold {
            if let Some(receiver) = best_pass_target(state, id, true) {
                begin_pass(state, id, receiver);
            }
        } else {
            state.player_mut(id).target_position = pos;
        }
        return;
    }

    let pace = state.team(side).tactic.pace;
    let tempo = pace.tempo_factor();
    let noise = noise_amp * (state.rng.gen::<f32>() * 2.0 - 1.0);
    let defending = side.opponent();
    let dist = state.geometry.distance_to_goal(defending, &pos);
    let quality = shot_quality(state, id) + noise;

    if dist <= shoot_range && hold >= min_hold * 0.5 && quality >= threshold + pace.shot_threshold_shift() {
        begin_shot(state, id);
        return;
    }

    if hold >= min_hold * tempo {
        let forced = hold >= max_hold * tempo;
        if let Some(receiver) = best_pass_target(state, id, forced) {
            if forced || shot_quality(state, receiver) > quality {
                begin_pass(state, id, receiver);
                return;
            }
        } else if forced && dist <= shoot_range {
            begin_shot(state, id);
            return;
        }
    }

    let target = drive_target(state, id);
    state.player_mut(id).target_position = target;
}

/// Carrier runs at goal; on a fast break straight for the 7 m zone.
fn drive_target(state: &MatchState, id: PlayerId) -> Vec2 {
    let p = state.player(id);
    let g = &state.geometry;
    let defending = p.side.opponent();
    let raw = if state.phase == GamePhase::transition(p.side) {
        let y = g.width * 0.5 + (p.position.y - g.width * 0.5) * 0.5;
        g.from_goal(defending, g.seven_metre_distance, y)
    } else {
        let to_goal = g.own_goal_centre(defending) - p.position;
        let dist = to_goal.norm();
        if dist < 1e-3 {
            p.position
        } else {
            p.position + to_goal / dist * 2.0
        }
    };
    finalize_target(state, id, raw)
}

// ============================================================================
// Defence
// ============================================================================

fn defensive_pressure(state: &mut MatchState, carrier: PlayerId) {
    let (carrier_side, carrier_pos) = {
        let c = state.player(carrier);
        (c.side, c.position)
    };
    let defending = carrier_side.opponent();
    let defenders: Vec<PlayerId> = state.active_players(defending).collect();

    let mut tackle_in_progress = false;
    for id in &defenders {
        let p = state.player_mut(*id);
        if p.action == PlayerAction::AttemptingTackle {
            p.target_position = carrier_pos;
            tackle_in_progress = true;
        }
    }

    let presser = defenders
        .iter()
        .copied()
        .filter(|id| {
            let p = state.player(*id);
            !p.is_goalkeeper() && !p.action.is_prepared()
        })
        .map(|id| (id, (state.player(id).position - carrier_pos).norm()))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let Some((presser, dist)) = presser else {
        return;
    };
    let ai = &state.config.ai;
    if dist > ai.press_range {
        return;
    }
    let tackle_range = ai.tackle_range;
    let prep = state.config.actions.tackle.preparation_secs;

    // 골문 쪽에 서서 압박
    let own_goal = state.geometry.own_goal_centre(defending);
    let to_goal = own_goal - carrier_pos;
    let goal_side = if to_goal.norm() > 1e-3 { carrier_pos + to_goal.normalize() * 1.0 } else { carrier_pos };
    let target = finalize_target(state, presser, goal_side);

    let can_tackle = dist <= tackle_range
        && !tackle_in_progress
        && state.phase.is_live()
        && state.player(presser).tackle_cooldown <= 0.0;
    let p = state.player_mut(presser);
    if can_tackle {
        p.begin_action(PlayerAction::AttemptingTackle, prep);
        p.target_player = Some(carrier);
        p.target_position = carrier_pos;
    } else {
        p.action = PlayerAction::MovingToPosition;
        p.target_position = target;
    }
}

// ============================================================================
// Free ball
// ============================================================================

fn pass_in_flight(state: &mut MatchState) {
    let g = state.geometry;
    let ball_xy = state.ball.xy();
    let aim = state.ball.flight_target.xy();
    let passer_side = state.ball.last_touch_side;

    if let Some(receiver) = state.ball.pass_target {
        let r = state.player(receiver);
        if r.is_active() && Some(r.side) == passer_side && !r.action.is_prepared() {
            let target = if r.is_goalkeeper() { aim } else { finalize_target(state, receiver, aim) };
            let p = state.player_mut(receiver);
            p.action = PlayerAction::ChasingBall;
            p.target_position = target;
        }
    }

    let Some(passer_side) = passer_side else {
        return;
    };
    let range = state.config.ai.intercept_range;
    let interceptor = state
        .active_players(passer_side.opponent())
        .filter(|id| !state.ball.has_contested(*id) && !state.player(*id).action.is_prepared())
        .map(|id| (id, distance_to_segment(&state.player(id).position, &ball_xy, &aim)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((id, _)) = interceptor {
        let point = closest_point_on_segment(&state.player(id).position, &ball_xy, &aim);
        let target = if state.player(id).is_goalkeeper() { g.clamp_to_court(&point, 0.0) } else { finalize_target(state, id, point) };
        let p = state.player_mut(id);
        p.action = PlayerAction::AttemptingIntercept;
        p.target_position = target;
    }
}

fn chase_free_ball(state: &mut MatchState) {
    let g = state.geometry;
    let ball_xy = state.ball.xy();
    let lead = g.clamp_to_court(&(ball_xy + state.ball.velocity.xy() * 0.3), 0.0);
    let area = g.goal_area_at(&ball_xy);

    for side in TeamSide::BOTH {
        let chaser = match area {
            Some(a) if a != side => None,
            Some(_) => state.goalkeeper(side).or_else(|| nearest_to(state, side, &ball_xy, true)),
            None => nearest_to(state, side, &ball_xy, false),
        };
        let Some(id) = chaser else {
            continue;
        };
        let target = if state.player(id).is_goalkeeper() { lead } else { finalize_target(state, id, lead) };
        let p = state.player_mut(id);
        p.action = PlayerAction::ChasingBall;
        p.target_position = target;
    }
}

fn nearest_to(state: &MatchState, side: TeamSide, pos: &Vec2, include_keeper: bool) -> Option<PlayerId> {
    state
        .active_players(side)
        .filter(|id| {
            let p = state.player(*id);
            (include_keeper || !p.is_goalkeeper()) && !p.action.is_prepared()
        })
        .map(|id| (id, (state.player(id).position - pos).norm()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

// ============================================================================
// Dead ball
// ============================================================================

fn dead_ball_decisions(state: &mut MatchState) {
    let restart = state.restart.filter(|r| !r.taken);
    let taker = restart.and_then(|r| r.taker);

    for id in state.all_active() {
        if Some(id) == taker || state.player(id).action.is_prepared() {
            continue;
        }
        let p = state.player(id);
        let target = match state.phase {
            GamePhase::KickOff => kickoff_position(state, id),
            GamePhase::HomePenalty | GamePhase::AwayPenalty => {
                if p.is_goalkeeper() && Some(p.side) != state.phase.team() {
                    goalkeeper_target(state, p.side, id)
                } else {
                    p.position
                }
            }
            _ => tactical_target(state, id),
        };
        let p = state.player_mut(id);
        p.target_position = target;
        p.action = PlayerAction::MovingToPosition;
    }

    let (Some(restart), Some(taker)) = (restart, taker) else {
        return;
    };
    if state.player(taker).action != PlayerAction::TakingRestart {
        return;
    }
    let flow = &state.config.flow;
    let delay = match restart.kind {
        RestartKind::ThrowOff => flow.throw_off_delay_secs,
        RestartKind::SevenMetre => flow.penalty_delay_secs,
        _ => flow.set_piece_delay_secs,
    };
    if state.phase_time < delay {
        return;
    }
    if restart.kind == RestartKind::SevenMetre {
        begin_shot(state, taker);
    } else if let Some(receiver) = best_pass_target(state, taker, true) {
        begin_pass(state, taker, receiver);
    }
}
