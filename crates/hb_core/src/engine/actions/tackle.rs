//! Tackle calculator
//!
//! Skill ratio tackler vs carrier decides success; aggression, angle, closing
//! speed and a denied clear chance drive the foul probability. The foul roll is
//! checked first, so a reckless tackle is a foul even when it would have won
//! the ball.

use super::foul::{classify_foul, is_clear_scoring_chance, FoulContext};
use super::{ActionKind, ActionOutcome, ActionResult, BallLaunch};
use crate::engine::config::TackleConfig;
use crate::engine::match_state::MatchState;
use crate::engine::sim_ball::FlightKind;
use crate::engine::types::{PlayerId, Vec2, Vec3};
use crate::models::AttributeId;

#[derive(Debug, Clone, PartialEq)]
pub struct TackleContext {
    pub tackler: PlayerId,
    pub carrier: PlayerId,
    pub tackler_pos: Vec2,
    pub carrier_pos: Vec2,
    pub ball_pos: Vec3,
    /// tackling / strength / anticipation, 0..1
    pub tackle_skill: f32,
    /// dribbling / agility / strength / composure, 0..1
    pub evade_skill: f32,
    pub tackling: f32,
    pub aggression: f32,
    pub from_behind: bool,
    /// Tackler speed toward the carrier (m/s, ≥ 0)
    pub closing_speed: f32,
    pub clear_chance: bool,
    pub distance: f32,
}

impl TackleContext {
    pub fn build(state: &MatchState, tackler: PlayerId, carrier: PlayerId) -> Self {
        let cfg = &state.config.actions.tackle;
        let t = state.player(tackler);
        let c = state.player(carrier);
        let ta = t.attrs();
        let ca = c.attrs();

        let to_carrier = c.position - t.position;
        let distance = to_carrier.norm();
        let dir = if distance > 1e-4 { to_carrier / distance } else { c.facing };
        let closing_speed = t.velocity.dot(&dir).max(0.0);

        // 뒤에서 들어오는 태클: angle between the carrier's facing and the tackler's approach
        let approach = -dir;
        let angle = c.facing.dot(&approach).clamp(-1.0, 1.0).acos().to_degrees();
        let from_behind = angle > cfg.from_behind_angle_deg;

        Self {
            tackler,
            carrier,
            tackler_pos: t.position,
            carrier_pos: c.position,
            ball_pos: state.ball.position,
            tackle_skill: ta.blend(&[
                (AttributeId::Tackling, 0.5),
                (AttributeId::Strength, 0.25),
                (AttributeId::Anticipation, 0.25),
            ]),
            evade_skill: ca.blend(&[
                (AttributeId::Dribbling, 0.35),
                (AttributeId::Agility, 0.25),
                (AttributeId::Strength, 0.2),
                (AttributeId::Composure, 0.2),
            ]),
            tackling: ta.normalized(AttributeId::Tackling),
            aggression: ta.normalized(AttributeId::Aggression),
            from_behind,
            closing_speed,
            clear_chance: is_clear_scoring_chance(state, carrier),
            distance,
        }
    }
}

/// Random values for one tackle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TackleRolls {
    pub foul_roll: f32,
    pub success_roll: f32,
    pub severity_roll: f32,
    /// Direction of the dislodged ball, as a fraction of a turn
    pub loose_angle: f32,
}

pub fn tackle_success_probability(ctx: &TackleContext, cfg: &TackleConfig) -> f32 {
    let ratio = (ctx.tackle_skill + 0.05) / (ctx.tackle_skill + ctx.evade_skill + 0.1);
    (cfg.base_success * 2.0 * ratio).clamp(cfg.min_success, cfg.max_success)
}

pub fn tackle_foul_probability(ctx: &TackleContext, cfg: &TackleConfig) -> f32 {
    let mut p = cfg.base_foul * (1.0 + cfg.aggression_foul_weight * (2.0 * ctx.aggression - 1.0));
    if ctx.from_behind {
        p *= cfg.from_behind_foul_multiplier;
    }
    if ctx.clear_chance {
        p *= cfg.clear_chance_foul_multiplier;
    }
    p += cfg.closing_speed_foul_weight * ctx.closing_speed;
    // 태클 능력이 좋을수록 깔끔하다
    p *= 1.2 - 0.4 * ctx.tackling;
    p.clamp(0.0, cfg.max_foul)
}

pub fn resolve_tackle(ctx: &TackleContext, rolls: &TackleRolls, cfg: &TackleConfig) -> ActionResult {
    let impact = ctx.carrier_pos;
    let base = |outcome| {
        ActionResult::new(ActionKind::Tackle, outcome, Some(ctx.tackler), impact).with_secondary(Some(ctx.carrier))
    };

    // 거리 밖: 캐리어가 빠져나감
    if ctx.distance > cfg.reach {
        return base(ActionOutcome::Failure);
    }

    if rolls.foul_roll < tackle_foul_probability(ctx, cfg) {
        let foul = FoulContext { aggression: ctx.aggression, from_behind: ctx.from_behind, clear_chance: ctx.clear_chance };
        let severity = classify_foul(&foul, rolls.severity_roll, cfg);
        return base(ActionOutcome::FoulCommitted).with_foul(severity).with_penalty(ctx.clear_chance);
    }

    if rolls.success_roll < tackle_success_probability(ctx, cfg) {
        let angle = rolls.loose_angle.clamp(0.0, 1.0) * std::f32::consts::TAU;
        let velocity = Vec3::new(angle.cos() * cfg.loose_ball_speed, angle.sin() * cfg.loose_ball_speed, 1.0);
        let origin = ctx.ball_pos;
        return base(ActionOutcome::Success).with_launch(BallLaunch {
            origin,
            velocity,
            spin: Vec3::zeros(),
            target: origin + velocity,
            kind: FlightKind::Loose,
        });
    }

    base(ActionOutcome::Failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::actions::FoulSeverity;
    use proptest::prelude::*;

    fn ctx(tackle_skill: f32, evade_skill: f32) -> TackleContext {
        TackleContext {
            tackler: PlayerId(8),
            carrier: PlayerId(2),
            tackler_pos: Vec2::new(20.0, 10.0),
            carrier_pos: Vec2::new(21.0, 10.0),
            ball_pos: Vec3::new(21.3, 10.0, 1.1),
            tackle_skill,
            evade_skill,
            tackling: tackle_skill,
            aggression: 0.5,
            from_behind: false,
            closing_speed: 0.0,
            clear_chance: false,
            distance: 1.0,
        }
    }

    fn rolls(foul_roll: f32, success_roll: f32) -> TackleRolls {
        TackleRolls { foul_roll, success_roll, severity_roll: 0.99, loose_angle: 0.25 }
    }

    #[test]
    fn test_skill_ratio_drives_success() {
        let cfg = TackleConfig::default();
        let strong = tackle_success_probability(&ctx(0.9, 0.2), &cfg);
        let weak = tackle_success_probability(&ctx(0.2, 0.9), &cfg);
        assert!(strong > weak);
        assert!(strong <= cfg.max_success && weak >= cfg.min_success);
    }

    #[test]
    fn test_from_behind_raises_foul_chance() {
        let cfg = TackleConfig::default();
        let mut c = ctx(0.5, 0.5);
        let front = tackle_foul_probability(&c, &cfg);
        c.from_behind = true;
        assert!(tackle_foul_probability(&c, &cfg) > front);
        c.clear_chance = true;
        c.closing_speed = 6.0;
        c.aggression = 1.0;
        assert!(tackle_foul_probability(&c, &cfg) <= cfg.max_foul);
    }

    #[test]
    fn test_outcomes_by_roll() {
        let cfg = TackleConfig::default();
        let won = resolve_tackle(&ctx(0.5, 0.5), &rolls(0.99, 0.0), &cfg);
        assert_eq!(won.outcome, ActionOutcome::Success);
        let launch = won.launch.unwrap();
        assert_eq!(launch.kind, FlightKind::Loose);
        assert!(launch.velocity.y > 0.0);

        let evaded = resolve_tackle(&ctx(0.5, 0.5), &rolls(0.99, 0.99), &cfg);
        assert_eq!(evaded.outcome, ActionOutcome::Failure);

        let foul = resolve_tackle(&ctx(0.5, 0.5), &rolls(0.0, 0.0), &cfg);
        assert_eq!(foul.outcome, ActionOutcome::FoulCommitted);
        assert_eq!(foul.foul_severity, Some(FoulSeverity::Free));
        assert_eq!(foul.secondary, Some(PlayerId(2)));
    }

    #[test]
    fn test_out_of_reach_is_evaded() {
        let mut c = ctx(1.0, 0.0);
        c.distance = 5.0;
        let result = resolve_tackle(&c, &rolls(0.0, 0.0), &TackleConfig::default());
        assert_eq!(result.outcome, ActionOutcome::Failure);
    }

    proptest! {
        #[test]
        fn prop_probabilities_in_range(
            t in 0.0f32..1.0, e in 0.0f32..1.0, aggression in 0.0f32..1.0,
            closing in 0.0f32..10.0, behind: bool, clear: bool,
        ) {
            let cfg = TackleConfig::default();
            let mut c = ctx(t, e);
            c.aggression = aggression;
            c.closing_speed = closing;
            c.from_behind = behind;
            c.clear_chance = clear;
            let s = tackle_success_probability(&c, &cfg);
            let f = tackle_foul_probability(&c, &cfg);
            prop_assert!((cfg.min_success..=cfg.max_success).contains(&s));
            prop_assert!((0.0..=cfg.max_foul).contains(&f));
        }
    }
}
