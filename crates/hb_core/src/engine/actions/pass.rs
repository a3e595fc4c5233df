//! Pass calculator
//!
//! accuracy = base × skill blend (passing / decisions / technique)
//!          − distance penalty − pressure × (1 − damping·composure)
//!
//! Accurate: launched at the receiver's lead point with a small controlled
//! deviation. Inaccurate: launched off target at reduced speed as a loose ball,
//! reported as a turnover.

use super::{release_accuracy, opponent_pressure, ActionKind, ActionOutcome, ActionResult, BallLaunch};
use crate::engine::config::{PassConfig, PhysicsConfig};
use crate::engine::geometry::PitchGeometry;
use crate::engine::match_state::MatchState;
use crate::engine::physics::ball_physics::held_ball_position;
use crate::engine::physics::solve_launch;
use crate::engine::sim_ball::FlightKind;
use crate::engine::types::{lift, PlayerId, Vec2, Vec3};
use crate::models::AttributeId;

#[derive(Debug, Clone, PartialEq)]
pub struct PassContext {
    pub passer: PlayerId,
    pub receiver: PlayerId,
    pub origin: Vec3,
    pub receiver_pos: Vec2,
    pub receiver_vel: Vec2,
    /// Weighted passing/decisions/technique, 0..1
    pub skill: f32,
    pub composure: f32,
    /// 0..1
    pub pressure: f32,
}

impl PassContext {
    pub fn build(state: &MatchState, passer: PlayerId, receiver: PlayerId) -> Self {
        let cfg = &state.config.actions.pass;
        let p = state.player(passer);
        let r = state.player(receiver);
        let skill = p.attrs().blend(&[
            (AttributeId::Passing, cfg.passing_weight),
            (AttributeId::Decisions, cfg.decisions_weight),
            (AttributeId::Technique, cfg.technique_weight),
        ]);
        Self {
            passer,
            receiver,
            origin: held_ball_position(&p.position, &p.facing, &state.config.physics),
            receiver_pos: r.position,
            receiver_vel: r.velocity,
            skill,
            composure: p.attrs().normalized(AttributeId::Composure),
            pressure: opponent_pressure(state, &p.position, p.side, cfg.pressure_radius),
        }
    }

    pub fn distance(&self) -> f32 {
        (self.receiver_pos - self.origin.xy()).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassRolls {
    /// Uniform; accurate when below the accuracy
    pub accuracy_roll: f32,
    /// Standard normal; scales the controlled deviation
    pub deviation: f32,
    /// Uniform; sign of an inaccurate deviation
    pub side_roll: f32,
    /// Uniform; magnitude within the inaccurate deviation band
    pub spread_roll: f32,
}

pub fn pass_accuracy(ctx: &PassContext, cfg: &PassConfig) -> f32 {
    release_accuracy(
        cfg.base_accuracy,
        cfg.skill_floor,
        ctx.skill,
        ctx.distance(),
        cfg.comfortable_distance,
        cfg.distance_penalty_per_m,
        ctx.pressure,
        cfg.max_pressure_penalty,
        ctx.composure,
        cfg.composure_damping,
    )
}

/// Release speed grows with distance up to the configured maximum.
pub fn pass_speed(distance: f32, cfg: &PassConfig) -> f32 {
    (cfg.speed + (distance - cfg.comfortable_distance).max(0.0) * 0.4).min(cfg.max_speed)
}

fn rotate(v: &Vec2, angle_rad: f32) -> Vec2 {
    let (s, c) = angle_rad.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

pub fn resolve_pass(
    ctx: &PassContext,
    rolls: &PassRolls,
    cfg: &PassConfig,
    physics: &PhysicsConfig,
    geometry: &PitchGeometry,
    dt: f32,
) -> ActionResult {
    let accuracy = pass_accuracy(ctx, cfg);
    let origin_xy = ctx.origin.xy();
    let distance = ctx.distance().max(0.5);
    let speed = pass_speed(distance, cfg);

    // 리드 패스: aim where the receiver will be
    let lead_time = distance / speed;
    let lead = geometry.clamp_to_court(&(ctx.receiver_pos + ctx.receiver_vel * lead_time), 0.5);
    let to_lead = lead - origin_xy;
    let lead_dist = to_lead.norm().max(0.5);
    let dir = if to_lead.norm() > 1e-4 { to_lead / to_lead.norm() } else { Vec2::new(1.0, 0.0) };

    if rolls.accuracy_roll < accuracy {
        let deviation = cfg.accurate_deviation_deg.to_radians() * rolls.deviation.clamp(-2.0, 2.0);
        let aim_xy = origin_xy + rotate(&dir, deviation) * lead_dist;
        let target = lift(&aim_xy, cfg.receive_height);
        let velocity = solve_launch(&ctx.origin, &target, speed, dt, physics);
        return ActionResult::new(ActionKind::Pass, ActionOutcome::Success, Some(ctx.passer), origin_xy)
            .with_secondary(Some(ctx.receiver))
            .with_launch(BallLaunch {
                origin: ctx.origin,
                velocity,
                spin: Vec3::zeros(),
                target,
                kind: FlightKind::Pass,
            });
    }

    let band = cfg.inaccurate_deviation_max_deg - cfg.inaccurate_deviation_min_deg;
    let magnitude = (cfg.inaccurate_deviation_min_deg + band * rolls.spread_roll.clamp(0.0, 1.0)).to_radians();
    let sign = if rolls.side_roll < 0.5 { -1.0 } else { 1.0 };
    let wild_dir = rotate(&dir, sign * magnitude);
    let wild_speed = speed * cfg.inaccurate_speed_factor;
    let aim_xy = origin_xy + wild_dir * lead_dist;
    let target = lift(&aim_xy, 0.0);
    let velocity = solve_launch(&ctx.origin, &target, wild_speed, dt, physics);
    ActionResult::new(ActionKind::Pass, ActionOutcome::Turnover, Some(ctx.passer), aim_xy)
        .with_secondary(Some(ctx.receiver))
        .with_launch(BallLaunch { origin: ctx.origin, velocity, spin: Vec3::zeros(), target, kind: FlightKind::Loose })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(skill: f32, pressure: f32, distance: f32) -> PassContext {
        PassContext {
            passer: PlayerId(1),
            receiver: PlayerId(2),
            origin: Vec3::new(10.0, 10.0, 1.1),
            receiver_pos: Vec2::new(10.0 + distance, 10.0),
            receiver_vel: Vec2::zeros(),
            skill,
            composure: 0.5,
            pressure,
        }
    }

    fn rolls(accuracy_roll: f32) -> PassRolls {
        PassRolls { accuracy_roll, deviation: 0.0, side_roll: 0.2, spread_roll: 0.5 }
    }

    #[test]
    fn test_accuracy_drops_with_distance_and_pressure() {
        let cfg = PassConfig::default();
        let short = pass_accuracy(&ctx(0.6, 0.0, 6.0), &cfg);
        let long = pass_accuracy(&ctx(0.6, 0.0, 20.0), &cfg);
        let pressed = pass_accuracy(&ctx(0.6, 1.0, 6.0), &cfg);
        assert!(long < short);
        assert!(pressed < short);
    }

    #[test]
    fn test_accurate_pass_targets_receiver() {
        let cfg = PassConfig::default();
        let result =
            resolve_pass(&ctx(0.8, 0.0, 10.0), &rolls(0.0), &cfg, &PhysicsConfig::default(), &PitchGeometry::STANDARD, 0.1);
        assert_eq!(result.outcome, ActionOutcome::Success);
        assert_eq!(result.secondary, Some(PlayerId(2)));
        let launch = result.launch.unwrap();
        assert_eq!(launch.kind, FlightKind::Pass);
        assert!((launch.target.x - 20.0).abs() < 0.05);
        assert!(launch.velocity.x > 0.0);
    }

    #[test]
    fn test_zero_accuracy_forces_turnover() {
        let cfg = PassConfig { base_accuracy: 0.0, ..Default::default() };
        let c = ctx(1.0, 0.0, 10.0);
        assert_eq!(pass_accuracy(&c, &cfg), 0.0);
        let result = resolve_pass(&c, &rolls(0.0), &cfg, &PhysicsConfig::default(), &PitchGeometry::STANDARD, 0.1);
        assert_eq!(result.outcome, ActionOutcome::Turnover);
        let launch = result.launch.unwrap();
        assert_eq!(launch.kind, FlightKind::Loose);
        // off target by at least the minimum deviation
        let dir = Vec2::new(launch.velocity.x, launch.velocity.y).normalize();
        let angle = dir.y.atan2(dir.x).abs().to_degrees();
        assert!(angle >= cfg.inaccurate_deviation_min_deg - 0.5);
        assert!(Vec2::new(launch.velocity.x, launch.velocity.y).norm() < pass_speed(10.0, &cfg));
    }

    #[test]
    fn test_pass_leads_running_receiver() {
        let mut c = ctx(0.8, 0.0, 10.0);
        c.receiver_vel = Vec2::new(0.0, 4.0);
        let result =
            resolve_pass(&c, &rolls(0.0), &PassConfig::default(), &PhysicsConfig::default(), &PitchGeometry::STANDARD, 0.1);
        assert!(result.launch.unwrap().target.y > 10.5);
    }
}
