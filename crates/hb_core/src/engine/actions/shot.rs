//! Shot calculator
//!
//! Decides only the trajectory: aim point (corner away from the goalkeeper),
//! aim error scaled by `1 - accuracy`, release speed and spin. Goal / save /
//! block / miss is decided by the event detector as the ball travels.
//!
//! Also holds the block and save probability models the detector uses.

use super::{opponent_pressure, release_accuracy, ActionKind, ActionOutcome, ActionResult, BallLaunch};
use crate::engine::config::{BlockConfig, PhysicsConfig, SaveConfig, ShotConfig};
use crate::engine::geometry::PitchGeometry;
use crate::engine::match_state::MatchState;
use crate::engine::physics::ball_physics::held_ball_position;
use crate::engine::physics::solve_launch;
use crate::engine::sim_ball::FlightKind;
use crate::engine::sim_player::SimPlayer;
use crate::engine::types::{PlayerId, Vec2, Vec3};
use crate::models::{AttributeId, TeamSide};

#[derive(Debug, Clone, PartialEq)]
pub struct ShotContext {
    pub shooter: PlayerId,
    /// Side that defends the target goal
    pub defending: TeamSide,
    pub origin: Vec3,
    pub skill: f32,
    pub composure: f32,
    /// Shooting/strength blend driving release speed, 0..1
    pub power: f32,
    pub pressure: f32,
    /// Lateral position of the defending goalkeeper, if one is on court
    pub keeper_y: Option<f32>,
    pub is_penalty: bool,
}

impl ShotContext {
    pub fn build(state: &MatchState, shooter: PlayerId) -> Self {
        let cfg = &state.config.actions.shot;
        let p = state.player(shooter);
        let a = p.attrs();
        let defending = p.side.opponent();
        let is_penalty = state.phase.is_penalty() && state.restart.and_then(|r| r.taker) == Some(shooter);
        Self {
            shooter,
            defending,
            origin: held_ball_position(&p.position, &p.facing, &state.config.physics),
            skill: a.blend(&[
                (AttributeId::Shooting, cfg.shooting_weight),
                (AttributeId::Technique, cfg.technique_weight),
                (AttributeId::Composure, cfg.composure_weight),
            ]),
            composure: a.normalized(AttributeId::Composure),
            power: a.blend(&[(AttributeId::Shooting, 0.6), (AttributeId::Strength, 0.4)]),
            pressure: if is_penalty { 0.0 } else { opponent_pressure(state, &p.position, p.side, cfg.pressure_radius) },
            keeper_y: state.goalkeeper(defending).map(|gk| state.player(gk).position.y),
            is_penalty,
        }
    }

    pub fn distance(&self, geometry: &PitchGeometry) -> f32 {
        geometry.distance_to_goal(self.defending, &self.origin.xy())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRolls {
    /// Uniform; far corner (away from the keeper) when below 0.75
    pub corner_roll: f32,
    /// Uniform; aim height within the configured band
    pub height_roll: f32,
    /// Standard normal aim errors
    pub error_y: f32,
    pub error_z: f32,
    /// Standard normal spin draw
    pub spin_roll: f32,
}

pub fn shot_accuracy(ctx: &ShotContext, cfg: &ShotConfig, geometry: &PitchGeometry) -> f32 {
    release_accuracy(
        cfg.base_accuracy,
        cfg.skill_floor,
        ctx.skill,
        ctx.distance(geometry),
        cfg.comfortable_distance,
        cfg.distance_penalty_per_m,
        ctx.pressure,
        cfg.max_pressure_penalty,
        ctx.composure,
        cfg.composure_damping,
    )
}

/// Intended aim point on the goal plane before aim error.
pub fn choose_aim(ctx: &ShotContext, rolls: &ShotRolls, cfg: &ShotConfig, geometry: &PitchGeometry) -> Vec3 {
    let cy = geometry.width * 0.5;
    let half = geometry.goal_width * 0.5 - cfg.aim_margin;
    let keeper_y = ctx.keeper_y.unwrap_or(cy);
    // 골키퍼 반대편 코너
    let far = if keeper_y <= cy { cy + half } else { cy - half };
    let near = 2.0 * cy - far;
    let y = if rolls.corner_roll < 0.75 { far } else { near };
    let z = cfg.min_aim_height + (cfg.max_aim_height - cfg.min_aim_height) * rolls.height_roll.clamp(0.0, 1.0);
    Vec3::new(geometry.own_goal_x(ctx.defending), y, z)
}

pub fn shot_speed(ctx: &ShotContext, cfg: &ShotConfig) -> f32 {
    cfg.base_speed + cfg.power_speed_bonus * ctx.power
}

pub fn resolve_shot(
    ctx: &ShotContext,
    rolls: &ShotRolls,
    cfg: &ShotConfig,
    physics: &PhysicsConfig,
    geometry: &PitchGeometry,
    dt: f32,
) -> ActionResult {
    let accuracy = shot_accuracy(ctx, cfg, geometry);
    let spread = cfg.max_aim_error * (1.0 - accuracy);
    let mut aim = choose_aim(ctx, rolls, cfg, geometry);
    aim.y += spread * rolls.error_y.clamp(-3.0, 3.0);
    aim.z = (aim.z + spread * 0.6 * rolls.error_z.clamp(-3.0, 3.0)).max(0.1);

    let speed = shot_speed(ctx, cfg);
    let velocity = solve_launch(&ctx.origin, &aim, speed, dt, physics);
    // 부정확한 슛일수록 회전이 섞인다
    let spin = Vec3::new(0.0, 0.0, cfg.max_spin * (1.0 - accuracy) * rolls.spin_roll.clamp(-1.0, 1.0));

    ActionResult::new(ActionKind::Shot, ActionOutcome::Success, Some(ctx.shooter), ctx.origin.xy())
        .with_launch(BallLaunch { origin: ctx.origin, velocity, spin, target: aim, kind: FlightKind::Shot })
        .with_penalty(ctx.is_penalty)
}

/// Chance that a defender in the shot's path gets a hand to it.
pub fn block_probability(blocker: &SimPlayer, cfg: &BlockConfig) -> f32 {
    let skill = blocker.attrs().blend(&[
        (AttributeId::Blocking, cfg.blocking_weight),
        (AttributeId::Jumping, cfg.jumping_weight),
        (AttributeId::Anticipation, cfg.anticipation_weight),
    ]);
    (cfg.base * (0.5 + skill)).clamp(0.0, cfg.max)
}

/// Goalkeeper reach in metres from where they stand.
pub fn keeper_reach(keeper: &SimPlayer, cfg: &SaveConfig) -> f32 {
    cfg.reach_base + cfg.reach_bonus * keeper.attrs().normalized(AttributeId::Jumping)
}

/// Save chance for a ball `distance` metres from the keeper at `ball_speed`.
pub fn save_probability(keeper: &SimPlayer, ball_speed: f32, distance: f32, is_penalty: bool, cfg: &SaveConfig) -> f32 {
    let skill = keeper.attrs().blend(&[
        (AttributeId::Reflexes, cfg.reflexes_weight),
        (AttributeId::Positioning, cfg.positioning_weight),
        (AttributeId::OneOnOnes, cfg.one_on_ones_weight),
    ]);
    let reach = keeper_reach(keeper, cfg).max(0.1);
    let base = cfg.base + (cfg.max - cfg.base) * skill;
    let speed_factor = 1.0 - cfg.speed_penalty * (ball_speed / cfg.speed_reference).min(1.0);
    let reach_factor = 1.0 - 0.5 * (distance / reach).clamp(0.0, 1.0);
    let penalty_factor = if is_penalty { 0.8 } else { 1.0 };
    (base * speed_factor * reach_factor * penalty_factor).clamp(0.0, cfg.max)
}

/// Chance a save is held rather than parried.
pub fn catch_probability(keeper: &SimPlayer, ball_speed: f32, cfg: &SaveConfig) -> f32 {
    let handling = keeper.attrs().normalized(AttributeId::Handling);
    let catch = cfg.catch_base + (1.0 - cfg.catch_base) * handling * 0.6;
    (catch * (1.0 - cfg.parry_factor * (ball_speed / cfg.speed_reference).min(1.0))).clamp(0.0, 1.0)
}

/// 1 straight in front of the goal, falling toward 0 at acute wing angles.
pub fn goal_angle_factor(pos: &Vec2, defending: TeamSide, geometry: &PitchGeometry) -> f32 {
    let depth = geometry.depth_from_goal(defending, pos).max(0.5);
    let lateral = (pos.y - geometry.width * 0.5).abs();
    (depth / (depth * depth + lateral * lateral).sqrt()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerAttributes, PlayerData, PlayerPosition};

    fn ctx(skill: f32, keeper_y: Option<f32>) -> ShotContext {
        ShotContext {
            shooter: PlayerId(3),
            defending: TeamSide::Away,
            origin: Vec3::new(33.0, 10.0, 1.1),
            skill,
            composure: 0.5,
            power: 0.5,
            pressure: 0.0,
            keeper_y,
            is_penalty: false,
        }
    }

    fn rolls() -> ShotRolls {
        ShotRolls { corner_roll: 0.1, height_roll: 0.5, error_y: 1.0, error_z: 0.0, spin_roll: 0.0 }
    }

    fn keeper(attr: u8) -> SimPlayer {
        let data = PlayerData::new(1, "GK", PlayerPosition::Goalkeeper).with_attributes(PlayerAttributes::uniform(attr));
        SimPlayer::new(PlayerId(0), TeamSide::Away, data, None)
    }

    #[test]
    fn test_aims_away_from_keeper() {
        let g = PitchGeometry::STANDARD;
        let cfg = ShotConfig::default();
        let aim = choose_aim(&ctx(0.5, Some(9.0)), &rolls(), &cfg, &g);
        assert!(aim.y > 10.0);
        assert_eq!(aim.x, 40.0);
        let aim = choose_aim(&ctx(0.5, Some(11.0)), &rolls(), &cfg, &g);
        assert!(aim.y < 10.0);
        assert!(g.within_goal_mouth(aim.y, aim.z));
    }

    #[test]
    fn test_perfect_shot_has_no_aim_error() {
        let g = PitchGeometry::STANDARD;
        let cfg = ShotConfig { base_accuracy: 1.0, skill_floor: 1.0, ..Default::default() };
        let c = ctx(1.0, None);
        assert_eq!(shot_accuracy(&c, &cfg, &g), 1.0);
        let result = resolve_shot(&c, &rolls(), &cfg, &PhysicsConfig::default(), &g, 0.1);
        let launch = result.launch.unwrap();
        let intended = choose_aim(&c, &rolls(), &cfg, &g);
        assert!((launch.target - intended).norm() < 1e-5);
        assert_eq!(launch.kind, FlightKind::Shot);
        assert_eq!(launch.spin, Vec3::zeros());
    }

    #[test]
    fn test_poor_shooter_spreads_more() {
        let g = PitchGeometry::STANDARD;
        let cfg = ShotConfig::default();
        let phys = PhysicsConfig::default();
        let good = resolve_shot(&ctx(1.0, None), &rolls(), &cfg, &phys, &g, 0.1).launch.unwrap();
        let poor = resolve_shot(&ctx(0.0, None), &rolls(), &cfg, &phys, &g, 0.1).launch.unwrap();
        let intended = choose_aim(&ctx(0.0, None), &rolls(), &cfg, &g);
        assert!((poor.target.y - intended.y).abs() > (good.target.y - intended.y).abs());
    }

    #[test]
    fn test_save_probability_monotonic() {
        let cfg = SaveConfig::default();
        let good = keeper(20);
        let poor = keeper(1);
        assert!(save_probability(&good, 15.0, 0.5, false, &cfg) > save_probability(&poor, 15.0, 0.5, false, &cfg));
        assert!(save_probability(&good, 25.0, 0.5, false, &cfg) < save_probability(&good, 10.0, 0.5, false, &cfg));
        assert!(save_probability(&good, 15.0, 1.5, false, &cfg) < save_probability(&good, 15.0, 0.2, false, &cfg));
        assert!(save_probability(&good, 15.0, 0.5, false, &cfg) <= cfg.max);
    }

    #[test]
    fn test_block_probability_bounded() {
        let cfg = BlockConfig::default();
        let mut p = keeper(20);
        p.data.position = PlayerPosition::CentreBack;
        assert!(block_probability(&p, &cfg) <= cfg.max);
        assert!(block_probability(&keeper(1), &cfg) < block_probability(&p, &cfg));
    }

    #[test]
    fn test_angle_factor_prefers_centre() {
        let g = PitchGeometry::STANDARD;
        let centre = goal_angle_factor(&Vec2::new(32.0, 10.0), TeamSide::Away, &g);
        let wing = goal_angle_factor(&Vec2::new(38.0, 1.0), TeamSide::Away, &g);
        assert!(centre > wing);
        assert!((centre - 1.0).abs() < 1e-5);
    }
}
