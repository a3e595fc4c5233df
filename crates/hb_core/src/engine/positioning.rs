//! Tactical positioner
//!
//! Computes where each player *wants* to stand this tick. Movement physics does
//! the rest. Pipeline per field player:
//!
//! 1. defensive slot position (6-0 / 5-1 / 3-2-1 table) and attacking slot position
//!    (shape adjusted by offensive focus)
//! 2. blend by phase (straight, or interpolated during transition/contested play)
//! 3. nudge toward the ball laterally and slightly in depth
//! 4. attribute deviations: work rate shifts depth, low Positioning adds jitter
//! 5. spacing from teammates, goal-area rule, court clamp
//!
//! Goalkeepers follow their own rule (`goalkeeper_target`).

use super::game_phase::{GamePhase, PhaseCategory};
use super::match_state::MatchState;
use super::types::{lerp2, PlayerId, Vec2};
use crate::models::{AttributeId, DefensiveSystem, OffensiveFocus, TeamSide};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stage marker for positioning jitter streams (0x905 = "POS")
const JITTER_MARKER: u64 = 0x905;

// ============================================================================
// Slot tables: (depth from own/target goal line, lateral y) for slots LW..RW
// ============================================================================

/// Defensive slot coordinates, measured from the defended goal line.
pub fn defensive_slot(system: DefensiveSystem, slot: usize) -> (f32, f32) {
    const SIX_ZERO: [(f32, f32); 6] =
        [(3.5, 2.8), (5.8, 5.5), (6.7, 8.8), (6.7, 11.2), (5.8, 14.5), (3.5, 17.2)];
    const FIVE_ONE: [(f32, f32); 6] =
        [(3.5, 2.8), (5.8, 5.5), (10.0, 10.0), (6.7, 10.0), (5.8, 14.5), (3.5, 17.2)];
    const THREE_TWO_ONE: [(f32, f32); 6] =
        [(4.5, 4.0), (9.0, 6.0), (11.5, 10.0), (6.7, 10.0), (9.0, 14.0), (4.5, 16.0)];

    let table = match system {
        DefensiveSystem::SixZero => &SIX_ZERO,
        DefensiveSystem::FiveOne => &FIVE_ONE,
        DefensiveSystem::ThreeTwoOne => &THREE_TWO_ONE,
    };
    table[slot.min(5)]
}

/// Attacking slot coordinates, measured from the attacked goal line.
pub fn attacking_slot(focus: OffensiveFocus, slot: usize) -> (f32, f32) {
    const BALANCED: [(f32, f32); 6] =
        [(0.8, 1.0), (10.0, 5.0), (10.5, 10.0), (6.4, 10.0), (10.0, 15.0), (0.8, 19.0)];
    // 윙 중심: wings higher and wider, backs spread
    const WINGS: [(f32, f32); 6] =
        [(2.0, 0.7), (10.0, 4.0), (11.0, 10.0), (6.6, 9.0), (10.0, 16.0), (2.0, 19.3)];
    // 중앙 돌파: backs narrow, pivot tight on the line
    const CENTRE: [(f32, f32); 6] =
        [(2.5, 1.8), (9.5, 6.5), (9.5, 10.0), (6.2, 10.0), (9.5, 13.5), (2.5, 18.2)];

    let table = match focus {
        OffensiveFocus::Balanced => &BALANCED,
        OffensiveFocus::Wings => &WINGS,
        OffensiveFocus::Centre => &CENTRE,
    };
    table[slot.min(5)]
}

/// Slot tables are written for Home; Away mirrors `y` so each team's left wing is
/// on its own left.
fn oriented_y(side: TeamSide, y: f32, width: f32) -> f32 {
    match side {
        TeamSide::Home => y,
        TeamSide::Away => width - y,
    }
}

pub fn defensive_position(state: &MatchState, side: TeamSide, slot: usize) -> Vec2 {
    let g = &state.geometry;
    let (depth, y) = defensive_slot(state.team(side).tactic.defensive_system, slot);
    g.from_goal(side, depth, oriented_y(side, y, g.width))
}

pub fn attacking_position(state: &MatchState, side: TeamSide, slot: usize) -> Vec2 {
    let g = &state.geometry;
    let (depth, y) = attacking_slot(state.team(side).tactic.offensive_focus, slot);
    g.from_goal(side.opponent(), depth, oriented_y(side, y, g.width))
}

/// 0 = fully defensive shape, 1 = fully attacking shape.
pub fn attack_weight(state: &MatchState, side: TeamSide) -> f32 {
    let transition_len = state.config.flow.transition_duration_secs.max(0.1);
    let progress = (state.phase_time / transition_len).clamp(0.0, 1.0);
    match state.phase.category() {
        PhaseCategory::Attack => {
            if state.phase.team() == Some(side) {
                1.0
            } else {
                0.0
            }
        }
        PhaseCategory::Transition => {
            if state.phase.team() == Some(side) {
                progress
            } else {
                1.0 - progress
            }
        }
        PhaseCategory::Contested => {
            // lean toward whichever goal the ball is nearer to
            let depth = state.geometry.depth_from_goal(side, &state.ball.xy()) / state.geometry.length;
            depth.clamp(0.2, 0.8)
        }
        PhaseCategory::DeadBall => match state.phase {
            GamePhase::PreKickOff | GamePhase::KickOff => 0.5,
            _ => {
                if state.possession == Some(side) {
                    1.0
                } else {
                    0.0
                }
            }
        },
        PhaseCategory::Break | PhaseCategory::Terminal => 0.5,
    }
}

/// Deterministic per-player jitter, independent of the match RNG stream.
pub fn positional_jitter(state: &MatchState, id: PlayerId) -> Vec2 {
    let p = state.player(id);
    let ai = &state.config.ai;
    let radius = ai.max_jitter * (1.0 - p.attrs().normalized(AttributeId::Positioning));
    if radius <= 1e-4 {
        return Vec2::zeros();
    }
    let bucket = (state.time / ai.jitter_bucket_secs.max(0.1)).floor() as u64;
    let seed = state.seed ^ (bucket << 16) ^ ((id.index() as u64) << 32) ^ (JITTER_MARKER << 48);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let r: f32 = rng.gen_range(0.0..1.0f32).sqrt() * radius;
    Vec2::new(angle.cos() * r, angle.sin() * r)
}

/// Tactically ideal target for `id` this tick.
pub fn tactical_target(state: &MatchState, id: PlayerId) -> Vec2 {
    let p = state.player(id);
    if p.is_goalkeeper() {
        return goalkeeper_target(state, p.side, id);
    }
    let Some(slot) = p.slot else {
        return p.position;
    };

    let g = &state.geometry;
    let ai = &state.config.ai;
    let side = p.side;
    let weight = attack_weight(state, side);

    let defensive = defensive_position(state, side, slot);
    let attacking = attacking_position(state, side, slot);
    let mut target = lerp2(&defensive, &attacking, weight);

    // 공 방향 보정
    let ball = state.ball.xy();
    let lateral_pull = ai.lateral_pull_defence + (ai.lateral_pull_attack - ai.lateral_pull_defence) * weight;
    target.y += (ball.y - target.y) * lateral_pull;
    target.x += (ball.x - target.x) * ai.depth_pull;

    let work_rate = p.attrs().normalized(AttributeId::WorkRate);
    target.x += g.attack_direction(side) * ai.work_rate_depth_shift * (work_rate - 0.5);
    target += positional_jitter(state, id);

    target = apply_spacing(state, id, target);
    finalize_target(state, id, target)
}

/// Push `target` away from teammates closer than `min_spacing`.
fn apply_spacing(state: &MatchState, id: PlayerId, mut target: Vec2) -> Vec2 {
    let p = state.player(id);
    let min_spacing = state.config.movement.min_spacing;
    for mate in state.active_players(p.side) {
        if mate == id || state.player(mate).is_goalkeeper() {
            continue;
        }
        let delta = target - state.player(mate).position;
        let dist = delta.norm();
        if dist < min_spacing && dist > 1e-4 {
            target += delta / dist * (min_spacing - dist) * 0.5;
        }
    }
    target
}

/// Goal-area rule and court clamp for a field player's target.
pub fn finalize_target(state: &MatchState, id: PlayerId, target: Vec2) -> Vec2 {
    let g = &state.geometry;
    let buffer = state.config.movement.sideline_buffer;
    let mut t = g.clamp_to_court(&target, buffer);
    if !state.player(id).is_goalkeeper() {
        if let Some(area) = g.goal_area_at(&t) {
            t = g.clamp_to_court(&g.push_out_of_goal_area(area, &t), buffer);
        }
    }
    t
}

/// Goalkeeper: on the line tracking the ball while defending, advanced while attacking.
pub fn goalkeeper_target(state: &MatchState, side: TeamSide, id: PlayerId) -> Vec2 {
    let g = &state.geometry;
    let ai = &state.config.ai;
    let cy = g.width * 0.5;

    if attack_weight(state, side) > 0.5 {
        return g.from_goal(side, ai.goalkeeper_support_depth, cy);
    }
    let positioning = state.player(id).attrs().normalized(AttributeId::Positioning);
    let follow = 0.3 + 0.7 * positioning;
    let y = cy + ((state.ball.position.y - cy) * follow)
        .clamp(-ai.goalkeeper_lateral_limit, ai.goalkeeper_lateral_limit);
    g.from_goal(side, ai.goalkeeper_line_depth, y)
}

/// Throw-off formation: tactical spots pulled into the player's own half.
pub fn kickoff_position(state: &MatchState, id: PlayerId) -> Vec2 {
    let p = state.player(id);
    let g = &state.geometry;
    if p.is_goalkeeper() {
        return g.from_goal(p.side, state.config.ai.goalkeeper_line_depth, g.width * 0.5);
    }
    let slot = p.slot.unwrap_or(2);
    let base = if state.next_kickoff == p.side {
        let (depth, y) = attacking_slot(state.team(p.side).tactic.offensive_focus, slot);
        // mirror the attacking shape into the own half
        g.from_goal(p.side, (g.length * 0.5 - depth).max(7.0), oriented_y(p.side, y, g.width))
    } else {
        defensive_position(state, p.side, slot)
    };
    let max_depth = g.length * 0.5 - 0.5;
    let depth = g.depth_from_goal(p.side, &base).min(max_depth);
    finalize_target(state, id, g.from_goal(p.side, depth, base.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::basic_state;
    use crate::models::{PlayerAttributes, Tactic, TacticPace};

    #[test]
    fn test_defensive_slots_outside_goal_area() {
        let state = basic_state(1);
        for system in [DefensiveSystem::SixZero, DefensiveSystem::FiveOne, DefensiveSystem::ThreeTwoOne] {
            for slot in 0..6 {
                let (d, y) = defensive_slot(system, slot);
                let pos = state.geometry.from_goal(TeamSide::Home, d, y);
                assert!(!state.geometry.in_goal_area(TeamSide::Home, &pos), "{system:?} slot {slot}");
            }
        }
    }

    #[test]
    fn test_five_one_point_is_advanced() {
        let (six_cb, _) = defensive_slot(DefensiveSystem::SixZero, 2);
        let (five_cb, _) = defensive_slot(DefensiveSystem::FiveOne, 2);
        assert!(five_cb > six_cb + 2.0);
    }

    #[test]
    fn test_attack_positions_are_in_opponent_half() {
        let mut state = basic_state(2);
        state.phase = GamePhase::HomeAttack;
        state.ball.position.x = 30.0;
        for id in state.team(TeamSide::Home).on_court.clone() {
            if state.player(id).is_goalkeeper() {
                continue;
            }
            let t = tactical_target(&state, id);
            assert!(t.x > 20.0, "home attacker target {t:?}");
            assert!(!state.geometry.in_goal_area(TeamSide::Away, &t));
        }
    }

    #[test]
    fn test_defenders_stay_near_own_goal() {
        let mut state = basic_state(2);
        state.phase = GamePhase::HomeAttack;
        state.ball.position.x = 30.0;
        for id in state.team(TeamSide::Away).on_court.clone() {
            let t = tactical_target(&state, id);
            assert!(t.x > 25.0, "away defender target {t:?}");
        }
    }

    #[test]
    fn test_transition_blends_shapes() {
        let mut state = basic_state(2);
        let id = state.team(TeamSide::Home).on_court[2];
        state.phase = GamePhase::TransitionToHomeAttack;
        state.phase_time = 0.0;
        let start = attack_weight(&state, TeamSide::Home);
        state.phase_time = state.config.flow.transition_duration_secs;
        let end = attack_weight(&state, TeamSide::Home);
        assert_eq!(start, 0.0);
        assert_eq!(end, 1.0);
        assert!(state.player(id).slot.is_some());
    }

    #[test]
    fn test_goalkeeper_tracks_ball_within_limit() {
        let mut state = basic_state(2);
        state.phase = GamePhase::AwayAttack;
        let gk = state.goalkeeper(TeamSide::Home).unwrap();
        state.ball.position.y = 0.0;
        let t = goalkeeper_target(&state, TeamSide::Home, gk);
        assert!((t.x - state.config.ai.goalkeeper_line_depth).abs() < 1e-5);
        assert!(t.y >= 10.0 - state.config.ai.goalkeeper_lateral_limit - 1e-5);
        assert!(t.y < 10.0);
    }

    #[test]
    fn test_jitter_is_deterministic_and_skill_bounded() {
        let mut state = basic_state(9);
        let id = state.team(TeamSide::Home).on_court[1];
        state.player_mut(id).data.attributes = PlayerAttributes::uniform(1);
        let a = positional_jitter(&state, id);
        let b = positional_jitter(&state, id);
        assert_eq!(a, b);
        assert!(a.norm() <= state.config.ai.max_jitter + 1e-5);

        state.player_mut(id).data.attributes = PlayerAttributes::uniform(20);
        assert_eq!(positional_jitter(&state, id), Vec2::zeros());
    }

    #[test]
    fn test_kickoff_positions_in_own_half() {
        let mut state = basic_state(4);
        state.team_mut(TeamSide::Away).tactic = Tactic::new(
            DefensiveSystem::ThreeTwoOne,
            OffensiveFocus::Wings,
            TacticPace::Fast,
        );
        for id in state.all_active() {
            let side = state.player(id).side;
            let pos = kickoff_position(&state, id);
            assert!(state.geometry.depth_from_goal(side, &pos) <= 20.0, "{id} at {pos:?}");
        }
    }
}
