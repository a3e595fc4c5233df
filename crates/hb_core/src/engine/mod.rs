//! Match engine
//!
//! Fixed-timestep handball simulation. Module map:
//!
//! - `simulator`: the tick loop, progress/cancellation, panic containment
//! - `phase_manager`, `game_phase`: clock, phase machine, restart setups
//! - `ai`, `positioning`: per-tick decisions and tactical targets
//! - `actions`: pass / shot / tackle / foul / interception calculators
//! - `event_detector`, `event_handler`: what the ball did, and its consequences
//! - `physics`: ball flight and player movement
//! - `timer`: suspensions, replacements, cooldowns, possession time
//! - `finalizer`: state → [`crate::models::MatchResult`]
//! - `fixtures`: parallel runs over independent matches

pub mod actions;
pub mod ai;
pub mod config;
pub mod event_detector;
pub mod event_handler;
pub mod finalizer;
pub mod fixtures;
pub mod game_phase;
pub mod geometry;
pub mod match_state;
pub mod phase_manager;
pub mod physics;
pub mod positioning;
pub mod sim_ball;
pub mod sim_player;
pub mod simulator;
pub mod timer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod scenario_tests;

pub use config::EngineConfig;
pub use fixtures::{simulate_fixtures, Fixture};
pub use game_phase::GamePhase;
pub use match_state::MatchState;
pub use simulator::{simulate_match, tick, CancellationToken, MatchOutput, MatchProgress, MatchSimulator};
