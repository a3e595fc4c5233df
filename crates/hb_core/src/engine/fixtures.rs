//! Parallel fixture runner
//!
//! Matches on one match day share nothing: each gets its own `MatchState` and
//! seed, so they run on the rayon pool without locking. Output order equals
//! input order.

use super::config::EngineConfig;
use super::simulator::MatchSimulator;
use crate::error::Result;
use crate::models::{MatchResult, Tactic, TeamData};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub home: TeamData,
    #[serde(default)]
    pub home_tactic: Tactic,
    pub away: TeamData,
    #[serde(default)]
    pub away_tactic: Tactic,
    pub seed: u64,
    #[serde(default)]
    pub match_date: Option<NaiveDate>,
}

fn simulate_fixture(fixture: &Fixture, config: &EngineConfig) -> Result<MatchResult> {
    let sim = MatchSimulator::new(
        &fixture.home,
        fixture.home_tactic,
        &fixture.away,
        fixture.away_tactic,
        config.clone(),
        fixture.seed,
    )?;
    Ok(sim.with_match_date(fixture.match_date).run().result)
}

pub fn simulate_fixtures(fixtures: &[Fixture], config: &EngineConfig) -> Vec<Result<MatchResult>> {
    log::info!("simulating {} fixtures", fixtures.len());
    fixtures.par_iter().map(|f| simulate_fixture(f, config)).collect()
}
