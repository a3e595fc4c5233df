//! Player Motion Physics
//!
//! 관성 기반 선수 이동: the positioner/AI only set `target_position`; this module
//! turns it into velocity with arrival steering, turn penalty, an acceleration
//! limit and drag, then applies stamina drain/recovery.
//!
//! - pace → top speed
//! - acceleration + agility → acceleration limit
//! - agility → turn skill
//! - stamina / natural fitness → drain resistance / recovery

use crate::engine::config::{MovementConfig, StaminaConfig};
use crate::engine::match_state::MatchState;
use crate::engine::sim_player::{PlayerAction, SimPlayer};
use crate::engine::types::Vec2;
use crate::models::AttributeId;

const DT_MIN: f32 = 0.001;
const DT_MAX: f32 = 0.5;
const SPEED_EPSILON: f32 = 0.01;
const ARRIVAL_SLOWING_MIN: f32 = 0.5;
const TURN_PENALTY_MIN: f32 = 0.35;

/// Per-tick kinematic limits for one player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub max_speed: f32,
    pub accel: f32,
    pub decel: f32,
    /// 0..1
    pub turn_skill: f32,
    pub drag: f32,
}

/// Top speed at the current stamina, before sprint/action modifiers.
pub fn effective_speed(p: &SimPlayer, cfg: &MovementConfig) -> f32 {
    let top = cfg.base_max_speed + cfg.pace_speed_bonus * p.attrs().normalized(AttributeId::Pace);
    let stamina_factor = cfg.min_speed_fraction + (1.0 - cfg.min_speed_fraction) * p.stamina.clamp(0.0, 1.0);
    top * stamina_factor
}

pub fn motion_params(p: &SimPlayer, max_speed: f32, cfg: &MovementConfig) -> MotionParams {
    let a = p.attrs();
    let accel = cfg.base_acceleration
        + cfg.agility_acceleration_bonus
            * a.blend(&[(AttributeId::Acceleration, 0.6), (AttributeId::Agility, 0.4)]);
    MotionParams {
        max_speed,
        accel,
        decel: accel * cfg.deceleration_factor,
        turn_skill: a.normalized(AttributeId::Agility),
        drag: cfg.drag,
    }
}

// ============================================================
// 물리 계산 함수들
// ============================================================

/// 제동 거리: v² = 2ad → d = v² / 2a
#[inline]
pub fn calculate_slowing_radius(current_speed: f32, deceleration: f32) -> f32 {
    if deceleration <= 0.0 {
        return ARRIVAL_SLOWING_MIN;
    }
    (current_speed.powi(2) / (2.0 * deceleration)).max(ARRIVAL_SLOWING_MIN)
}

/// Arrival steering: slow down linearly inside the braking distance.
#[inline]
pub fn calculate_arrival_speed(dist: f32, current_speed: f32, max_speed: f32, decel: f32) -> f32 {
    let slowing_radius = calculate_slowing_radius(current_speed, decel);
    if dist < slowing_radius {
        max_speed * (dist / slowing_radius)
    } else {
        max_speed
    }
}

/// 0 = same direction, 1 = reversing.
#[inline]
pub fn calc_turn_severity(current_dir: &Vec2, desired_dir: &Vec2) -> f32 {
    let dot = current_dir.dot(desired_dir).clamp(-1.0, 1.0);
    1.0 - (dot + 1.0) * 0.5
}

/// 빠를수록, 급하게 꺾을수록, turn_skill 낮을수록 페널티 큼
#[inline]
pub fn calculate_turn_penalty(turn_severity: f32, speed_ratio: f32, turn_skill: f32) -> f32 {
    (1.0 - turn_severity * speed_ratio * (1.0 - turn_skill)).clamp(TURN_PENALTY_MIN, 1.0)
}

/// One integration step toward `target`. Returns (new position, new velocity).
pub fn update_player_motion(
    pos: Vec2,
    vel: Vec2,
    target: Vec2,
    dt: f32,
    arrival_radius: f32,
    params: &MotionParams,
) -> (Vec2, Vec2) {
    let dt = dt.clamp(DT_MIN, DT_MAX);
    let to = target - pos;
    let dist = to.norm();
    let decay = (1.0 - params.drag * dt).clamp(0.0, 1.0);

    // 도착: brake with the deceleration limit
    if dist < arrival_radius || params.max_speed <= SPEED_EPSILON {
        let speed = vel.norm();
        let new_vel = if speed <= params.decel * dt || speed < SPEED_EPSILON {
            Vec2::zeros()
        } else {
            vel * ((speed - params.decel * dt) / speed)
        };
        return (pos + new_vel * dt, new_vel);
    }

    let desired_dir = to / dist;
    let speed = vel.norm();
    let current_dir = if speed > SPEED_EPSILON { vel / speed } else { desired_dir };

    let turn_severity = calc_turn_severity(&current_dir, &desired_dir);
    let speed_ratio = (speed / params.max_speed.max(SPEED_EPSILON)).clamp(0.0, 1.0);
    let turn_penalty = calculate_turn_penalty(turn_severity, speed_ratio, params.turn_skill);
    let arrival_speed = calculate_arrival_speed(dist, speed, params.max_speed, params.decel);

    let desired_vel = desired_dir * (arrival_speed * turn_penalty);

    // 가속/감속 제한
    let delta = desired_vel - vel;
    let delta_len = delta.norm();
    let limit = (if desired_vel.norm() < speed { params.decel } else { params.accel }) * dt;
    let vel2 = if delta_len <= limit || delta_len < SPEED_EPSILON {
        desired_vel
    } else {
        vel + delta * (limit / delta_len)
    };

    let mut vel3 = vel2 * decay;
    let vel3_len = vel3.norm();
    if vel3_len > params.max_speed {
        vel3 *= params.max_speed / vel3_len;
    }
    (pos + vel3 * dt, vel3)
}

/// Stamina drain (moving) or recovery (walking/standing), per tick.
pub fn update_stamina(p: &mut SimPlayer, speed: f32, top_speed: f32, dt: f32, cfg: &StaminaConfig) {
    let attrs = p.attrs();
    if speed > cfg.recovery_speed_threshold {
        let effort = (speed / top_speed.max(SPEED_EPSILON)).clamp(0.0, 1.0);
        let sprint = if p.is_sprinting { cfg.sprint_drain_multiplier } else { 1.0 };
        let resistance = 1.0 - cfg.stamina_attr_resistance * attrs.normalized(AttributeId::Stamina);
        let drain = (cfg.base_drain_per_sec + cfg.effort_drain_per_sec * effort) * sprint * resistance;
        p.stamina = (p.stamina - drain * dt).max(0.0);
    } else {
        let recovery = recovery_rate(p, cfg);
        p.stamina = (p.stamina + recovery * dt).min(1.0);
    }
}

fn recovery_rate(p: &SimPlayer, cfg: &StaminaConfig) -> f32 {
    cfg.recovery_per_sec * (1.0 + cfg.fitness_recovery_bonus * p.attrs().normalized(AttributeId::NaturalFitness))
}

/// Integrate every on-court player toward their target and update stamina.
/// Off-court players recover on the bench.
pub fn move_players(state: &mut MatchState) {
    let dt = state.dt();
    let movement = &state.config.movement;
    let stamina_cfg = &state.config.stamina;
    let holder = state.ball.holder();
    let restart_taker = state.restart.filter(|r| !r.taken).and_then(|r| r.taker);

    for p in state.players.iter_mut() {
        if !p.is_active() {
            if !p.is_on_court {
                let rate = recovery_rate(p, stamina_cfg) * stamina_cfg.bench_recovery_factor;
                p.stamina = (p.stamina + rate * dt).min(1.0);
            }
            continue;
        }

        let base_speed = effective_speed(p, movement);
        let is_holder = holder == Some(p.id);
        let mut speed_factor = match p.action {
            PlayerAction::PreparingPass => movement.preparing_speed_factor,
            _ if is_holder => movement.carrier_speed_factor,
            _ => 1.0,
        };
        let rooted = p.action.is_rooted() || restart_taker == Some(p.id);
        if rooted {
            speed_factor = 0.0;
        }

        let dist = (p.target_position - p.position).norm();
        let wants_full_speed = base_speed * speed_factor >= base_speed * movement.sprint_speed_ratio;
        p.is_sprinting = !rooted
            && dist > movement.sprint_distance
            && p.stamina > movement.sprint_min_stamina
            && wants_full_speed;
        let sprint = if p.is_sprinting { movement.sprint_multiplier } else { 1.0 };

        let params = motion_params(p, base_speed * speed_factor * sprint, movement);
        let (pos, vel) =
            update_player_motion(p.position, p.velocity, p.target_position, dt, movement.arrival_radius, &params);
        p.position = pos;
        p.velocity = vel;

        let speed = vel.norm();
        if speed > 0.1 {
            p.facing = vel / speed;
        }
        let top = movement.base_max_speed + movement.pace_speed_bonus;
        update_stamina(p, speed, top, dt, stamina_cfg);
        p.effective_speed = effective_speed(p, movement);
    }
}
