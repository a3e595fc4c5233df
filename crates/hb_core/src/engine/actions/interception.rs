//! Interception calculator
//!
//! Evaluated reactively every tick a pass is in flight, for each opponent near
//! the ball's swept path. Probability blends defender skill (anticipation,
//! agility, positioning) with geometry: how far the pass has travelled, how
//! fast it is, and how fast the defender is closing on the ball.

use crate::engine::config::InterceptionConfig;
use crate::engine::sim_ball::SimBall;
use crate::engine::sim_player::SimPlayer;
use crate::models::AttributeId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptionContext {
    pub skill: f32,
    /// 0 at release, 1 at the aim point
    pub progress: f32,
    pub ball_speed: f32,
    /// Defender velocity component toward the ball (m/s, ≥ 0)
    pub closing_speed: f32,
}

impl InterceptionContext {
    pub fn build(defender: &SimPlayer, ball: &SimBall, cfg: &InterceptionConfig) -> Self {
        let to_ball = ball.xy() - defender.position;
        let dist = to_ball.norm();
        let closing_speed = if dist > 1e-4 { defender.velocity.dot(&(to_ball / dist)).max(0.0) } else { 0.0 };
        Self {
            skill: defender.attrs().blend(&[
                (AttributeId::Anticipation, cfg.anticipation_weight),
                (AttributeId::Agility, cfg.agility_weight),
                (AttributeId::Positioning, cfg.positioning_weight),
            ]),
            progress: ball.flight_progress(),
            ball_speed: ball.speed(),
            closing_speed,
        }
    }
}

pub fn interception_probability(ctx: &InterceptionContext, cfg: &InterceptionConfig) -> f32 {
    let skill_factor = 0.6 + 0.8 * ctx.skill.clamp(0.0, 1.0);
    // 패스 후반일수록 리시버가 먼저 닿는다
    let progress_factor = 1.0 - cfg.progress_weight * ctx.progress.clamp(0.0, 1.0);
    let speed_factor = 1.0 - cfg.speed_weight * (ctx.ball_speed / cfg.speed_reference.max(0.1)).min(1.0);
    let p = cfg.base * skill_factor * progress_factor * speed_factor + cfg.closing_weight * ctx.closing_speed;
    p.clamp(0.0, cfg.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ctx(skill: f32, progress: f32, ball_speed: f32) -> InterceptionContext {
        InterceptionContext { skill, progress, ball_speed, closing_speed: 0.0 }
    }

    #[test]
    fn test_skill_helps() {
        let cfg = InterceptionConfig::default();
        assert!(interception_probability(&ctx(0.9, 0.5, 12.0), &cfg) > interception_probability(&ctx(0.1, 0.5, 12.0), &cfg));
    }

    #[test]
    fn test_fast_late_passes_are_harder() {
        let cfg = InterceptionConfig::default();
        let slow_early = interception_probability(&ctx(0.5, 0.2, 6.0), &cfg);
        let fast_late = interception_probability(&ctx(0.5, 0.9, 18.0), &cfg);
        assert!(fast_late < slow_early);
    }

    #[test]
    fn test_closing_speed_helps() {
        let cfg = InterceptionConfig::default();
        let mut c = ctx(0.5, 0.5, 12.0);
        let standing = interception_probability(&c, &cfg);
        c.closing_speed = 5.0;
        assert!(interception_probability(&c, &cfg) > standing);
    }

    proptest! {
        #[test]
        fn prop_probability_bounded(
            skill in 0.0f32..1.0, progress in 0.0f32..1.0,
            speed in 0.0f32..30.0, closing in 0.0f32..10.0,
        ) {
            let cfg = InterceptionConfig::default();
            let p = interception_probability(
                &InterceptionContext { skill, progress, ball_speed: speed, closing_speed: closing },
                &cfg,
            );
            prop_assert!((0.0..=cfg.max).contains(&p));
        }
    }
}
