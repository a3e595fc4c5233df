//! Foul severity and restart decisions
//!
//! Severity tiers are chosen by independent thresholds on one roll:
//!
//! ```text
//! roll < red_p                → RedCard
//! roll < red_p + two_min_p    → TwoMinutes
//! otherwise                   → Free (free throw only)
//! ```
//!
//! Both thresholds scale with the same severity factor (from behind, clear
//! chance, aggression).

use crate::engine::config::TackleConfig;
use crate::engine::geometry::{closest_point_on_segment, distance_to_segment, PitchGeometry};
use crate::engine::match_state::{MatchState, RestartKind};
use crate::engine::types::{PlayerId, Vec2};
use crate::models::TeamSide;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FoulSeverity {
    /// Free throw, no personal punishment
    Free,
    TwoMinutes,
    RedCard,
}

/// Inputs to the severity model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoulContext {
    /// Fouler's aggression, 0..1
    pub aggression: f32,
    pub from_behind: bool,
    pub clear_chance: bool,
}

pub fn severity_scale(ctx: &FoulContext, cfg: &TackleConfig) -> f32 {
    let mut scale = 1.0 + cfg.aggression_severity * (ctx.aggression - 0.5);
    if ctx.from_behind {
        scale *= cfg.from_behind_severity;
    }
    if ctx.clear_chance {
        scale *= cfg.clear_chance_severity;
    }
    scale.max(0.0)
}

/// (red card, two minutes) probabilities.
pub fn severity_thresholds(ctx: &FoulContext, cfg: &TackleConfig) -> (f32, f32) {
    let scale = severity_scale(ctx, cfg);
    let red = (cfg.red_card_base * scale).clamp(0.0, 1.0);
    let two = (cfg.two_minute_base * scale).clamp(0.0, 1.0 - red);
    (red, two)
}

pub fn classify_foul(ctx: &FoulContext, roll: f32, cfg: &TackleConfig) -> FoulSeverity {
    let (red, two) = severity_thresholds(ctx, cfg);
    if roll < red {
        FoulSeverity::RedCard
    } else if roll < red + two {
        FoulSeverity::TwoMinutes
    } else {
        FoulSeverity::Free
    }
}

/// Attacker `id` is inside the free-throw line with no defending field player
/// between them and the goal.
pub fn is_clear_scoring_chance(state: &MatchState, id: PlayerId) -> bool {
    let p = state.player(id);
    let g = &state.geometry;
    let defending = p.side.opponent();
    if !g.inside_free_throw_line(defending, &p.position) {
        return false;
    }
    let goal = g.own_goal_centre(defending);
    let own_depth = g.depth_from_goal(defending, &p.position);
    !state.active_players(defending).any(|d| {
        let dp = state.player(d);
        !dp.is_goalkeeper()
            && g.depth_from_goal(defending, &dp.position) < own_depth
            && distance_to_segment(&dp.position, &p.position, &goal) < 1.5
    })
}

/// Restart awarded to `fouled_side` for a foul at `position`.
///
/// Seven metres when a clear chance was denied, or for a suspension-level foul
/// inside the free-throw line; otherwise a free throw, moved back to the
/// free-throw line when the foul happened inside it.
pub fn restart_for_foul(
    geometry: &PitchGeometry,
    fouled_side: TeamSide,
    position: &Vec2,
    severity: FoulSeverity,
    clear_chance: bool,
) -> (RestartKind, Vec2) {
    let defending = fouled_side.opponent();
    let inside = geometry.inside_free_throw_line(defending, position);
    if clear_chance || (inside && severity >= FoulSeverity::TwoMinutes) {
        return (RestartKind::SevenMetre, geometry.seven_metre_mark(defending));
    }
    (RestartKind::FreeThrow, free_throw_spot(geometry, defending, position))
}

/// Foul position, pushed out to the free-throw line of `defending` if inside it.
pub fn free_throw_spot(geometry: &PitchGeometry, defending: TeamSide, position: &Vec2) -> Vec2 {
    let spot = if geometry.inside_free_throw_line(defending, position) {
        let (a, b) = geometry.goal_posts(defending);
        let closest = closest_point_on_segment(position, &a, &b);
        let mut dir = position - closest;
        if dir.norm() < 1e-4 {
            dir = Vec2::new(geometry.attack_direction(defending), 0.0);
        }
        closest + dir.normalize() * (geometry.free_throw_radius + 0.05)
    } else {
        *position
    };
    geometry.clamp_to_court(&spot, 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: PitchGeometry = PitchGeometry::STANDARD;

    fn ctx(from_behind: bool, clear_chance: bool) -> FoulContext {
        FoulContext { aggression: 0.5, from_behind, clear_chance }
    }

    #[test]
    fn test_severity_tiers_by_roll() {
        let cfg = TackleConfig::default();
        let (red, two) = severity_thresholds(&ctx(false, false), &cfg);
        assert_eq!(classify_foul(&ctx(false, false), red * 0.5, &cfg), FoulSeverity::RedCard);
        assert_eq!(classify_foul(&ctx(false, false), red + two * 0.5, &cfg), FoulSeverity::TwoMinutes);
        assert_eq!(classify_foul(&ctx(false, false), 0.99, &cfg), FoulSeverity::Free);
    }

    #[test]
    fn test_from_behind_and_clear_chance_raise_severity() {
        let cfg = TackleConfig::default();
        let (red_plain, two_plain) = severity_thresholds(&ctx(false, false), &cfg);
        let (red_bad, two_bad) = severity_thresholds(&ctx(true, true), &cfg);
        assert!(red_bad > red_plain);
        assert!(two_bad > two_plain);
    }

    #[test]
    fn test_clear_chance_gives_seven_metres() {
        let pos = Vec2::new(30.0, 4.0);
        let (kind, spot) = restart_for_foul(&G, TeamSide::Home, &pos, FoulSeverity::Free, true);
        assert_eq!(kind, RestartKind::SevenMetre);
        assert_eq!(spot, Vec2::new(33.0, 10.0));
    }

    #[test]
    fn test_suspension_inside_nine_metres_gives_seven_metres() {
        let pos = Vec2::new(32.5, 10.0);
        let (kind, _) = restart_for_foul(&G, TeamSide::Home, &pos, FoulSeverity::TwoMinutes, false);
        assert_eq!(kind, RestartKind::SevenMetre);
        let (kind, _) = restart_for_foul(&G, TeamSide::Home, &pos, FoulSeverity::Free, false);
        assert_eq!(kind, RestartKind::FreeThrow);
    }

    #[test]
    fn test_free_throw_moved_to_nine_metre_line() {
        let pos = Vec2::new(33.0, 10.0);
        let (kind, spot) = restart_for_foul(&G, TeamSide::Home, &pos, FoulSeverity::Free, false);
        assert_eq!(kind, RestartKind::FreeThrow);
        assert!(!G.inside_free_throw_line(TeamSide::Away, &spot));
        assert!((spot.x - (40.0 - 9.05)).abs() < 1e-3);

        let far = Vec2::new(20.0, 5.0);
        assert_eq!(free_throw_spot(&G, TeamSide::Away, &far), far);
    }
}
