//! # hb_core - Deterministic Handball Match Simulation Engine
//!
//! Simulates a handball match (7 vs 7 on a 40 × 20 m court) as a fixed-timestep
//! loop and returns the final score, team statistics and an event log.
//!
//! ## Features
//! - Deterministic: same rosters, tactics, config and seed give the same match
//! - Two-minute suspensions, red cards, seven-metre throws, team timeouts
//! - YAML-tunable engine config with realistic / arcade / quick presets
//! - JSON API for host integration, rayon-backed fixture runner

#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{simulate_match_json, MatchRequest, MatchResponse, SCHEMA_VERSION};
pub use engine::{
    simulate_fixtures, simulate_match, CancellationToken, EngineConfig, Fixture, MatchOutput,
    MatchProgress, MatchSimulator,
};
pub use error::{MatchError, Result, SimulationError};
pub use models::{
    EventType, MatchEvent, MatchResult, MatchStatus, PlayerAttributes, PlayerData, PlayerPosition,
    Tactic, TeamData, TeamMatchStats, TeamSide,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
