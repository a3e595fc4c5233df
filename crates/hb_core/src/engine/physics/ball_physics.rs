//! Ball physics: held ball follows the holder, free ball flies/bounces/rolls.
//!
//! Flight forces: gravity, quadratic drag `-k|v|v`, Magnus `c (ω × v)`.
//! Spin decays exponentially. Integration is semi-implicit Euler at the match step.

use crate::engine::config::PhysicsConfig;
use crate::engine::match_state::MatchState;
use crate::engine::sim_ball::{BallMotion, SimBall};
use crate::engine::types::{Vec2, Vec3};

/// Where a held ball sits relative to its holder.
pub fn held_ball_position(holder_pos: &Vec2, facing: &Vec2, cfg: &PhysicsConfig) -> Vec3 {
    let dir = if facing.norm() > 1e-4 { facing.normalize() } else { Vec2::zeros() };
    let xy = holder_pos + dir * cfg.hold_offset;
    Vec3::new(xy.x, xy.y, cfg.hold_height)
}

/// Flight acceleration at velocity `v` with spin `spin`.
pub fn flight_acceleration(v: &Vec3, spin: &Vec3, cfg: &PhysicsConfig) -> Vec3 {
    let gravity = Vec3::new(0.0, 0.0, -cfg.gravity);
    let drag = -v * (cfg.drag_constant() * v.norm());
    let magnus = spin.cross(v) * cfg.magnus_coefficient;
    gravity + drag + magnus
}

/// Advance a free ball by one step.
pub fn integrate_free_ball(ball: &mut SimBall, dt: f32, cfg: &PhysicsConfig) {
    match ball.motion {
        BallMotion::InFlight => integrate_flight(ball, dt, cfg),
        BallMotion::Rolling => integrate_roll(ball, dt, cfg),
        BallMotion::Resting | BallMotion::Held(_) => {}
    }
}

fn integrate_flight(ball: &mut SimBall, dt: f32, cfg: &PhysicsConfig) {
    let accel = flight_acceleration(&ball.velocity, &ball.spin, cfg);
    ball.velocity += accel * dt;
    ball.position += ball.velocity * dt;
    ball.spin *= (-cfg.spin_decay_rate * dt).exp();
    ball.flight_time += dt;

    if ball.position.z <= 0.0 {
        ball.position.z = 0.0;
        if ball.velocity.z < 0.0 {
            bounce(ball, cfg);
        }
    }
}

/// Reflect off the floor; settle into rolling/resting when the bounce dies out.
fn bounce(ball: &mut SimBall, cfg: &PhysicsConfig) {
    let vz = -ball.velocity.z * cfg.restitution;
    let horizontal = Vec2::new(ball.velocity.x, ball.velocity.y) * (1.0 - cfg.bounce_friction);

    if vz < cfg.min_bounce_speed {
        ball.spin = Vec3::zeros();
        if horizontal.norm() > cfg.stop_speed {
            ball.velocity = Vec3::new(horizontal.x, horizontal.y, 0.0);
            ball.motion = BallMotion::Rolling;
        } else {
            ball.velocity = Vec3::zeros();
            ball.motion = BallMotion::Resting;
        }
    } else {
        ball.velocity = Vec3::new(horizontal.x, horizontal.y, vz);
    }
}

fn integrate_roll(ball: &mut SimBall, dt: f32, cfg: &PhysicsConfig) {
    let horizontal = Vec2::new(ball.velocity.x, ball.velocity.y);
    let speed = horizontal.norm();
    let new_speed = speed - cfg.rolling_deceleration * dt;
    if new_speed <= cfg.stop_speed {
        ball.velocity = Vec3::zeros();
        ball.motion = BallMotion::Resting;
        return;
    }
    let v = horizontal * (new_speed / speed);
    ball.velocity = Vec3::new(v.x, v.y, 0.0);
    ball.position += ball.velocity * dt;
    ball.position.z = 0.0;
}

/// Launch velocity that carries the ball from `from` to `to` at horizontal speed `speed`.
///
/// Horizontal travel time under quadratic drag: `t = (e^{kd} - 1) / (k v0)`;
/// the vertical component is then solved so gravity brings the ball to `to.z` at `t`,
/// corrected for the integrator step `dt` and for drag acting on the vertical component.
pub fn solve_launch(from: &Vec3, to: &Vec3, speed: f32, dt: f32, cfg: &PhysicsConfig) -> Vec3 {
    let delta = to - from;
    let horizontal = Vec2::new(delta.x, delta.y);
    let d = horizontal.norm();
    if d < 1e-3 || speed <= 0.0 {
        return Vec3::zeros();
    }
    let k = cfg.drag_constant();
    let (t, drag_scale) = if k * d < 1e-4 {
        (d / speed, 1.0)
    } else {
        let growth = (k * d).exp() - 1.0;
        (growth / (k * speed), growth / (k * d))
    };
    let vz = ((delta.z + 0.5 * cfg.gravity * t * t) / t + 0.5 * cfg.gravity * dt) * drag_scale;
    let dir = horizontal / d;
    Vec3::new(dir.x * speed, dir.y * speed, vz)
}

/// Ball stage of the pipeline.
pub fn step_ball(state: &mut MatchState) {
    let dt = state.dt();
    match state.ball.motion {
        BallMotion::Held(id) => {
            let (pos, facing, vel) = {
                let p = state.player(id);
                (p.position, p.facing, p.velocity)
            };
            state.ball.position = held_ball_position(&pos, &facing, &state.config.physics);
            state.ball.velocity = Vec3::new(vel.x, vel.y, 0.0);
        }
        _ => {
            integrate_free_ball(&mut state.ball, dt, &state.config.physics);
            state.ball.position =
                state.geometry.clamp_with_margin(&state.ball.position, state.config.physics.out_of_bounds_margin);
        }
    }
}
