//! Action resolution
//!
//! A player whose prepared action (`PreparingPass`, `PreparingShot`,
//! `AttemptingTackle`) runs out of preparation time gets exactly one
//! [`ActionResult`]. The resolver gathers a context from the state, draws the
//! rolls from the match RNG, and calls a pure calculator:
//!
//! ```text
//! resolve_action(state, id)
//!   ├─ build *Context   (reads MatchState)
//!   ├─ draw *Rolls      (state.rng)
//!   └─ resolve_*(ctx, rolls, cfg) -> ActionResult
//! ```
//!
//! Calculators never touch `MatchState`; the event handler applies the result.

pub mod foul;
pub mod interception;
pub mod pass;
pub mod shot;
pub mod tackle;

use super::match_state::MatchState;
use super::sim_ball::FlightKind;
use super::sim_player::PlayerAction;
use super::types::{PlayerId, Vec2, Vec3};
use crate::models::TeamSide;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

pub use foul::FoulSeverity;

/// Which calculator or detector produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Pass,
    Shot,
    Tackle,
    Interception,
    Block,
    Save,
    Pickup,
    /// Ball crossed a goal line
    GoalLine,
    /// Ball crossed a sideline
    Sideline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionOutcome {
    Success,
    Failure,
    Intercepted,
    Saved,
    Blocked,
    Goal,
    Miss,
    FoulCommitted,
    OutOfBounds,
    Turnover,
}

/// Ball release carried by a result; the handler launches it verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallLaunch {
    pub origin: Vec3,
    pub velocity: Vec3,
    pub spin: Vec3,
    pub target: Vec3,
    pub kind: FlightKind,
}

/// Transient outcome value, consumed once by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub kind: ActionKind,
    pub outcome: ActionOutcome,
    pub primary: Option<PlayerId>,
    pub secondary: Option<PlayerId>,
    pub impact_position: Vec2,
    pub foul_severity: Option<FoulSeverity>,
    pub launch: Option<BallLaunch>,
    /// Shot is a seven-metre throw / foul denied a clear chance
    pub penalty: bool,
    /// Save held the ball (as opposed to a parry)
    pub ball_secured: bool,
}

impl ActionResult {
    pub fn new(kind: ActionKind, outcome: ActionOutcome, primary: Option<PlayerId>, impact: Vec2) -> Self {
        Self {
            kind,
            outcome,
            primary,
            secondary: None,
            impact_position: impact,
            foul_severity: None,
            launch: None,
            penalty: false,
            ball_secured: false,
        }
    }

    pub fn with_secondary(mut self, secondary: Option<PlayerId>) -> Self {
        self.secondary = secondary;
        self
    }

    pub fn with_launch(mut self, launch: BallLaunch) -> Self {
        self.launch = Some(launch);
        self
    }

    pub fn with_foul(mut self, severity: FoulSeverity) -> Self {
        self.foul_severity = Some(severity);
        self
    }

    pub fn with_penalty(mut self, penalty: bool) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn secured(mut self) -> Self {
        self.ball_secured = true;
        self
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Opponent pressure at `pos` for a player of `side`: 0 when the nearest active
/// opponent is at least `radius` away, 1 when they are on top of the player.
pub fn opponent_pressure(state: &MatchState, pos: &Vec2, side: TeamSide, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let nearest = state
        .active_players(side.opponent())
        .map(|id| (state.player(id).position - pos).norm())
        .fold(f32::INFINITY, f32::min);
    (1.0 - nearest / radius).clamp(0.0, 1.0)
}

/// Accuracy envelope shared by passes and shots.
///
/// `base × (floor + (1 - floor)·skill)`, minus a distance penalty beyond the
/// comfortable range, minus pressure damped by composure.
#[allow(clippy::too_many_arguments)]
pub fn release_accuracy(
    base: f32,
    skill_floor: f32,
    skill: f32,
    distance: f32,
    comfortable_distance: f32,
    penalty_per_m: f32,
    pressure: f32,
    max_pressure_penalty: f32,
    composure: f32,
    composure_damping: f32,
) -> f32 {
    let skill_term = base * (skill_floor + (1.0 - skill_floor) * skill.clamp(0.0, 1.0));
    let distance_term = (distance - comfortable_distance).max(0.0) * penalty_per_m;
    let pressure_term =
        pressure.clamp(0.0, 1.0) * max_pressure_penalty * (1.0 - composure_damping * composure.clamp(0.0, 1.0));
    (skill_term - distance_term - pressure_term).clamp(0.0, 1.0)
}

/// Standard normal draw from the match RNG.
pub(crate) fn normal_roll(state: &mut MatchState) -> f32 {
    StandardNormal.sample(&mut state.rng)
}

/// Uniform `[0, 1)` draw from the match RNG.
pub(crate) fn unit_roll(state: &mut MatchState) -> f32 {
    state.rng.gen::<f32>()
}

// ============================================================================
// Resolver
// ============================================================================

/// A prepared action is ready once its timer is within half a step of zero.
pub fn is_ready(state: &MatchState, id: PlayerId) -> bool {
    let p = state.player(id);
    p.is_active() && p.action.is_prepared() && p.action_timer <= state.dt() * 0.5
}

/// Resolve `id`'s prepared action. `None` when the action no longer applies
/// (the ball was lost during preparation); the player is reset in that case.
pub fn resolve_action(state: &mut MatchState, id: PlayerId) -> Option<ActionResult> {
    let action = state.player(id).action;
    let result = match action {
        PlayerAction::PreparingPass => resolve_pass_action(state, id),
        PlayerAction::PreparingShot => resolve_shot_action(state, id),
        PlayerAction::AttemptingTackle => resolve_tackle_action(state, id),
        _ => None,
    };
    if result.is_none() {
        log::trace!("{id} {:?} fizzled at {:.1}s", action, state.time);
        let holds = state.holder() == Some(id);
        let p = state.player_mut(id);
        p.reset_action();
        if holds {
            p.action = PlayerAction::HoldingBall;
        }
    }
    result
}

fn resolve_pass_action(state: &mut MatchState, id: PlayerId) -> Option<ActionResult> {
    if state.holder() != Some(id) {
        return None;
    }
    let receiver = state
        .player(id)
        .target_player
        .filter(|r| *r != id && state.player(*r).is_active() && state.player(*r).side == state.player(id).side)
        .or_else(|| super::ai::best_pass_target(state, id, true))?;

    let ctx = pass::PassContext::build(state, id, receiver);
    let rolls = pass::PassRolls {
        accuracy_roll: unit_roll(state),
        deviation: normal_roll(state),
        side_roll: unit_roll(state),
        spread_roll: unit_roll(state),
    };
    let dt = state.dt();
    Some(pass::resolve_pass(&ctx, &rolls, &state.config.actions.pass, &state.config.physics, &state.geometry, dt))
}

fn resolve_shot_action(state: &mut MatchState, id: PlayerId) -> Option<ActionResult> {
    if state.holder() != Some(id) {
        return None;
    }
    let ctx = shot::ShotContext::build(state, id);
    let rolls = shot::ShotRolls {
        corner_roll: unit_roll(state),
        height_roll: unit_roll(state),
        error_y: normal_roll(state),
        error_z: normal_roll(state),
        spin_roll: normal_roll(state),
    };
    let dt = state.dt();
    Some(shot::resolve_shot(&ctx, &rolls, &state.config.actions.shot, &state.config.physics, &state.geometry, dt))
}

fn resolve_tackle_action(state: &mut MatchState, id: PlayerId) -> Option<ActionResult> {
    let carrier = state.holder()?;
    if state.player(carrier).side == state.player(id).side {
        return None;
    }
    let ctx = tackle::TackleContext::build(state, id, carrier);
    let rolls = tackle::TackleRolls {
        foul_roll: unit_roll(state),
        success_roll: unit_roll(state),
        severity_roll: unit_roll(state),
        loose_angle: unit_roll(state),
    };
    Some(tackle::resolve_tackle(&ctx, &rolls, &state.config.actions.tackle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::basic_state;
    use proptest::prelude::*;

    #[test]
    fn test_pressure_falls_off_with_distance() {
        let mut state = basic_state(1);
        let home = state.team(TeamSide::Home).on_court[2];
        for id in state.all_active() {
            state.player_mut(id).position = Vec2::new(2.0, 2.0);
        }
        let pos = Vec2::new(20.0, 10.0);
        state.player_mut(home).position = pos;
        assert_eq!(opponent_pressure(&state, &pos, TeamSide::Home, 2.5), 0.0);

        let away = state.team(TeamSide::Away).on_court[2];
        state.player_mut(away).position = Vec2::new(21.0, 10.0);
        let p = opponent_pressure(&state, &pos, TeamSide::Home, 2.5);
        assert!((p - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_unprepared_player_is_not_ready() {
        let mut state = basic_state(1);
        let id = state.team(TeamSide::Home).on_court[1];
        assert!(!is_ready(&state, id));
        state.player_mut(id).begin_action(PlayerAction::PreparingPass, 0.0);
        assert!(is_ready(&state, id));
    }

    #[test]
    fn test_pass_without_ball_fizzles() {
        let mut state = basic_state(1);
        let id = state.team(TeamSide::Home).on_court[1];
        state.player_mut(id).begin_action(PlayerAction::PreparingPass, 0.0);
        assert!(resolve_action(&mut state, id).is_none());
        assert_eq!(state.player(id).action, PlayerAction::Idle);
    }

    proptest! {
        #[test]
        fn prop_release_accuracy_in_unit_range(
            skill in 0.0f32..1.0, distance in 0.0f32..40.0,
            pressure in 0.0f32..1.0, composure in 0.0f32..1.0,
        ) {
            let acc = release_accuracy(0.95, 0.55, skill, distance, 8.0, 0.012, pressure, 0.3, composure, 0.6);
            prop_assert!((0.0..=1.0).contains(&acc));
        }

        #[test]
        fn prop_composure_never_hurts(skill in 0.0f32..1.0, pressure in 0.0f32..1.0) {
            let calm = release_accuracy(0.95, 0.55, skill, 10.0, 8.0, 0.012, pressure, 0.3, 1.0, 0.6);
            let nervy = release_accuracy(0.95, 0.55, skill, 10.0, 8.0, 0.012, pressure, 0.3, 0.0, 0.6);
            prop_assert!(calm >= nervy);
        }
    }
}
