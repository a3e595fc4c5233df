//! Event detection
//!
//! Runs after ball and player movement.
//!
//! - **Reactive** (free ball only), fixed priority; the first hit ends the check:
//!   interception → block → save → pickup. Reactions roll the match RNG.
//! - **Passive** (every live tick): goal-line crossing, then sideline crossing.
//!
//! Crossings use a one-step look-behind (`position - velocity * dt`) and
//! interpolate the exact intersection, so the reported impact point lies on the
//! line even though checks run once per tick.

use super::actions::interception::{interception_probability, InterceptionContext};
use super::actions::shot::{block_probability, catch_probability, keeper_reach, save_probability};
use super::actions::{unit_roll, ActionKind, ActionOutcome, ActionResult, BallLaunch};
use super::geometry::{distance_to_segment, plane_crossing};
use super::match_state::MatchState;
use super::sim_ball::FlightKind;
use super::types::{PlayerId, Vec2, Vec3};
use crate::models::TeamSide;

/// Pickups by the last toucher are ignored this long after a release (s).
const RELEASE_GRACE_SECS: f32 = 0.3;

// ============================================================================
// Reactive
// ============================================================================

pub fn detect_reactive(state: &mut MatchState) -> Option<ActionResult> {
    if !state.phase.is_live() || state.ball.is_held() {
        return None;
    }
    let in_flight = state.ball.is_in_flight();
    match state.ball.flight {
        FlightKind::Pass if in_flight => detect_interception(state).or_else(|| detect_pickup(state)),
        FlightKind::Shot if in_flight => detect_block(state).or_else(|| detect_save(state)),
        _ => detect_pickup(state),
    }
}

/// Swept ball segment of the last step, in the court plane.
fn swept_segment(state: &MatchState) -> (Vec3, Vec3) {
    (state.ball.previous_position(state.dt()), state.ball.position)
}

/// Uncontested players of `side` within `radius` of the swept segment, nearest first.
fn candidates_near_path(
    state: &MatchState,
    side: TeamSide,
    radius: f32,
    include_keeper: bool,
) -> Vec<(PlayerId, f32)> {
    let (prev, curr) = swept_segment(state);
    let (a, b) = (prev.xy(), curr.xy());
    let mut found: Vec<(PlayerId, f32)> = state
        .active_players(side)
        .filter(|id| !state.ball.has_contested(*id))
        .filter(|id| include_keeper || !state.player(*id).is_goalkeeper())
        .map(|id| (id, distance_to_segment(&state.player(id).position, &a, &b)))
        .filter(|(_, d)| *d <= radius)
        .collect();
    found.sort_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)));
    found
}

fn detect_interception(state: &mut MatchState) -> Option<ActionResult> {
    let passer_side = state.ball.last_touch_side?;
    let cfg = state.config.actions.interception.clone();
    let (prev, curr) = swept_segment(state);
    if prev.z.min(curr.z) > cfg.reach_height {
        return None;
    }

    for (id, _) in candidates_near_path(state, passer_side.opponent(), cfg.radius, true) {
        state.ball.contested_by.push(id);
        let ctx = InterceptionContext::build(state.player(id), &state.ball, &cfg);
        let p = interception_probability(&ctx, &cfg);
        if unit_roll(state) < p {
            log::trace!("{id} intercepts (p = {p:.2})");
            return Some(
                ActionResult::new(ActionKind::Interception, ActionOutcome::Intercepted, Some(id), state.player(id).position)
                    .with_secondary(state.ball.last_passer),
            );
        }
    }
    None
}

fn detect_block(state: &mut MatchState) -> Option<ActionResult> {
    let shooter_side = state.ball.last_shooter_side?;
    let cfg = state.config.actions.block.clone();
    let (prev, curr) = swept_segment(state);
    if prev.z.min(curr.z) > cfg.reach_height {
        return None;
    }

    for (id, _) in candidates_near_path(state, shooter_side.opponent(), cfg.radius, false) {
        state.ball.contested_by.push(id);
        let p = block_probability(state.player(id), &cfg);
        if unit_roll(state) >= p {
            continue;
        }
        let v = state.ball.velocity;
        let lateral_dir = Vec3::new(-v.y, v.x, 0.0);
        let lateral_dir = if lateral_dir.norm() > 1e-4 { lateral_dir.normalize() } else { Vec3::zeros() };
        let spread = (unit_roll(state) * 2.0 - 1.0) * v.norm() * cfg.rebound_factor * 0.5;
        let mut rebound = -v * cfg.rebound_factor + lateral_dir * spread;
        rebound.z = 1.5;
        let origin = state.ball.position;
        return Some(
            ActionResult::new(ActionKind::Block, ActionOutcome::Blocked, Some(id), state.player(id).position)
                .with_secondary(state.ball.last_shooter)
                .with_launch(BallLaunch {
                    origin,
                    velocity: rebound,
                    spin: Vec3::zeros(),
                    target: origin + rebound,
                    kind: FlightKind::Loose,
                }),
        );
    }
    None
}

fn detect_save(state: &mut MatchState) -> Option<ActionResult> {
    let shooter_side = state.ball.last_shooter_side?;
    let defending = shooter_side.opponent();
    let keeper = state.goalkeeper(defending)?;
    if state.ball.has_contested(keeper) {
        return None;
    }
    let g = state.geometry;
    let cfg = state.config.actions.save.clone();
    let goal_x = g.own_goal_x(defending);
    let dir = g.attack_direction(defending);
    let (prev, curr) = swept_segment(state);
    let v = state.ball.velocity;

    // 골라인까지 예측 교차점
    let predicted = match plane_crossing(&prev, &curr, 0, goal_x) {
        Some(hit) => hit,
        None => {
            let depth = (curr.x - goal_x) * dir;
            let toward = -v.x * dir;
            if depth > cfg.reaction_distance || toward <= 1e-3 {
                return None;
            }
            let t = depth / toward;
            curr + v * t
        }
    };
    if (predicted.y - g.width * 0.5).abs() > g.goal_width * 0.5 + 0.3 || predicted.z > cfg.max_height {
        return None;
    }

    state.ball.contested_by.push(keeper);
    let k = state.player(keeper);
    let keeper_depth = g.depth_from_goal(defending, &k.position).max(0.0);
    let lateral = predicted.y - k.position.y;
    let vertical = predicted.z.max(0.0) - 1.0;
    let distance =
        (lateral * lateral + (0.5 * keeper_depth).powi(2) + (0.5 * vertical).powi(2)).sqrt();
    if distance > keeper_reach(k, &cfg) {
        return None;
    }

    let speed = state.ball.speed();
    let p = save_probability(k, speed, distance, state.ball.is_penalty_shot, &cfg);
    let catch = catch_probability(k, speed, &cfg);
    let keeper_pos = k.position;
    if unit_roll(state) >= p {
        return None;
    }
    let result = ActionResult::new(ActionKind::Save, ActionOutcome::Saved, Some(keeper), keeper_pos)
        .with_secondary(state.ball.last_shooter)
        .with_penalty(state.ball.is_penalty_shot);
    if unit_roll(state) < catch {
        return Some(result.secured());
    }

    // 쳐내기: back into the court, random side
    let side_roll = unit_roll(state) * 2.0 - 1.0;
    let out = speed * cfg.parry_factor;
    let velocity = Vec3::new(dir * out * 0.7, side_roll * out * 0.7, 2.0);
    let origin = Vec3::new(goal_x + dir * 0.3, predicted.y, predicted.z.max(0.2));
    Some(result.with_launch(BallLaunch {
        origin,
        velocity,
        spin: Vec3::zeros(),
        target: origin + velocity,
        kind: FlightKind::Loose,
    }))
}

fn detect_pickup(state: &mut MatchState) -> Option<ActionResult> {
    let ball = &state.ball;
    let cfg = &state.config.actions.pickup;
    let is_pass = ball.is_in_flight() && ball.flight == FlightKind::Pass;
    if ball.position.z > cfg.max_height || (!is_pass && ball.speed() > cfg.max_speed) {
        return None;
    }

    let (prev, curr) = swept_segment(state);
    let (a, b) = (prev.xy(), curr.xy());
    let area = if cfg.enforce_goal_area { state.geometry.goal_area_at(&curr.xy()) } else { None };
    let in_grace = ball.is_in_flight() && ball.flight_time < RELEASE_GRACE_SECS;

    let mut best: Option<(PlayerId, f32)> = None;
    for id in state.all_active() {
        let p = state.player(id);
        if is_pass && ball.has_contested(id) {
            continue;
        }
        if in_grace && ball.last_touch == Some(id) {
            continue;
        }
        if let Some(area_side) = area {
            let keeper_present = state.goalkeeper(area_side).is_some();
            if p.side != area_side || (keeper_present && !p.is_goalkeeper()) {
                continue;
            }
        }
        let d = distance_to_segment(&p.position, &a, &b);
        if d <= cfg.radius && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((id, d));
        }
    }

    let (id, _) = best?;
    Some(
        ActionResult::new(ActionKind::Pickup, ActionOutcome::Success, Some(id), state.player(id).position)
            .with_secondary(state.ball.last_touch),
    )
}

// ============================================================================
// Passive
// ============================================================================

pub fn detect_passive(state: &MatchState) -> Option<ActionResult> {
    if !state.phase.is_live() || state.ball.is_held() {
        return None;
    }
    let g = &state.geometry;
    let ball = &state.ball;
    let (prev, curr) = swept_segment(state);

    for defending in TeamSide::BOTH {
        let goal_x = g.own_goal_x(defending);
        let Some(hit) = plane_crossing(&prev, &curr, 0, goal_x) else {
            continue;
        };
        // 코트 밖으로 나가는 방향만
        if (curr.x - prev.x) * g.attack_direction(defending) >= 0.0 {
            continue;
        }
        let attacker = defending.opponent();
        let impact = Vec2::new(goal_x, hit.y.clamp(0.0, g.width));
        let shot_live = ball.last_shooter_side == Some(attacker)
            && matches!(ball.flight, FlightKind::Shot | FlightKind::Loose);

        if shot_live && g.within_goal_mouth(hit.y, hit.z) {
            return Some(
                ActionResult::new(ActionKind::GoalLine, ActionOutcome::Goal, ball.last_shooter, impact)
                    .with_secondary(state.goalkeeper(defending))
                    .with_penalty(ball.is_penalty_shot),
            );
        }
        if shot_live && ball.flight == FlightKind::Shot {
            return Some(ActionResult::new(ActionKind::GoalLine, ActionOutcome::Miss, ball.last_shooter, impact));
        }
        return Some(ActionResult::new(ActionKind::GoalLine, ActionOutcome::OutOfBounds, ball.last_touch, impact));
    }

    for line_y in [0.0, g.width] {
        if let Some(hit) = plane_crossing(&prev, &curr, 1, line_y) {
            let impact = Vec2::new(hit.x.clamp(0.0, g.length), line_y);
            return Some(ActionResult::new(ActionKind::Sideline, ActionOutcome::OutOfBounds, ball.last_touch, impact));
        }
    }

    // Ball resting outside without a detected crossing (e.g. released out there).
    let pos = ball.xy();
    if !g.is_inside(&pos) {
        let kind = if pos.x < 0.0 || pos.x > g.length { ActionKind::GoalLine } else { ActionKind::Sideline };
        let impact = g.clamp_to_court(&pos, 0.0);
        return Some(ActionResult::new(kind, ActionOutcome::OutOfBounds, ball.last_touch, impact));
    }
    None
}
