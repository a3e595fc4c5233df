//! Movement / physics engine
//!
//! - `ball_physics`: held ball, flight, bounce, roll, launch solving
//! - `player_movement`: steering, sprint, stamina
//! - `collisions`: separation, goal-area rule, court bounds

pub mod ball_physics;
pub mod collisions;
pub mod player_movement;

pub use ball_physics::{solve_launch, step_ball};
pub use player_movement::{effective_speed, move_players};

use super::match_state::MatchState;

/// Player stage of the pipeline: integrate, separate, clamp, then re-seat a held ball.
pub fn step_players(state: &mut MatchState) {
    move_players(state);
    collisions::separate_players(state);
    collisions::enforce_court_bounds(state);

    if let Some(id) = state.ball.holder() {
        let (pos, facing) = (state.player(id).position, state.player(id).facing);
        state.ball.position = ball_physics::held_ball_position(&pos, &facing, &state.config.physics);
    }
}
