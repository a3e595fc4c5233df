//! JSON match API
//!
//! One request in, one response out. The host supplies rosters, tactics and an
//! optional seed/config; the response carries the `MatchResult`, the event count
//! and a SHA-256 digest of the serialized event log so two runs can be compared
//! without shipping the log itself.

use crate::engine::{EngineConfig, MatchSimulator};
use crate::error::{MatchError, Result};
use crate::models::{MatchEvent, MatchResult, Tactic, TeamData};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    /// Missing seed → derived from the current time
    #[serde(default)]
    pub seed: Option<u64>,
    pub home_team: TeamData,
    pub away_team: TeamData,
    #[serde(default)]
    pub home_tactic: Tactic,
    #[serde(default)]
    pub away_tactic: Tactic,
    #[serde(default)]
    pub match_date: Option<NaiveDate>,
    #[serde(default)]
    pub config: Option<EngineConfig>,
    #[serde(default)]
    pub include_events: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub result: MatchResult,
    pub event_count: usize,
    /// Hex SHA-256 of the JSON-serialized event log
    pub events_digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<MatchEvent>>,
}

fn time_seed() -> u64 {
    let now = Utc::now();
    (now.timestamp() as u64).wrapping_mul(1_000_000_007) ^ u64::from(now.timestamp_subsec_nanos())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Run a parsed request.
pub fn simulate_request(request: MatchRequest) -> Result<MatchResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(MatchError::InvalidConfig(format!(
            "unsupported schema version {} (expected {SCHEMA_VERSION})",
            request.schema_version
        )));
    }
    let seed = request.seed.unwrap_or_else(|| {
        let seed = time_seed();
        warn!(seed, "request has no seed; using a time-derived one");
        seed
    });
    let config = request.config.unwrap_or_default();

    debug!(home = %request.home_team.name, away = %request.away_team.name, seed, "simulating match");
    let output = MatchSimulator::new(
        &request.home_team,
        request.home_tactic,
        &request.away_team,
        request.away_tactic,
        config,
        seed,
    )?
    .with_match_date(request.match_date)
    .run();

    let serialized = serde_json::to_vec(&output.events)?;
    let result = output.result;
    info!(
        home = result.home_score,
        away = result.away_score,
        status = ?result.status,
        events = output.events.len(),
        "match finished"
    );

    Ok(MatchResponse {
        schema_version: SCHEMA_VERSION,
        seed,
        event_count: output.events.len(),
        events_digest: sha256_hex(&serialized),
        events: request.include_events.then_some(output.events),
        result,
    })
}

/// JSON string in, JSON string out.
pub fn simulate_match_json(request_json: &str) -> Result<String> {
    let request: MatchRequest = serde_json::from_str(request_json)?;
    let response = simulate_request(request)?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::basic_team;
    use crate::models::MatchStatus;
    use serde_json::json;

    fn request(seed: Option<u64>, include_events: bool) -> serde_json::Value {
        json!({
            "schema_version": 1,
            "seed": seed,
            "home_team": basic_team(1, "Home"),
            "away_team": basic_team(2, "Away"),
            "match_date": "2026-10-17",
            "config": EngineConfig::quick(60.0),
            "include_events": include_events,
        })
    }

    #[test]
    fn test_basic_request() {
        let out = simulate_match_json(&request(Some(42), false).to_string()).unwrap();
        let parsed: MatchResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.schema_version, 1);
        assert_eq!(parsed.seed, 42);
        assert_eq!(parsed.result.status, MatchStatus::Completed);
        assert_eq!(parsed.result.match_date, NaiveDate::from_ymd_opt(2026, 10, 17));
        assert!(parsed.events.is_none());
        assert_eq!(parsed.events_digest.len(), 64);
        assert!(parsed.event_count > 0);
    }

    #[test]
    fn test_determinism_via_digest() {
        let a: MatchResponse =
            serde_json::from_str(&simulate_match_json(&request(Some(7), true).to_string()).unwrap()).unwrap();
        let b: MatchResponse =
            serde_json::from_str(&simulate_match_json(&request(Some(7), false).to_string()).unwrap()).unwrap();
        assert_eq!(a.result, b.result);
        assert_eq!(a.events_digest, b.events_digest);

        let events = a.events.unwrap();
        assert_eq!(events.len(), a.event_count);
        assert_eq!(sha256_hex(&serde_json::to_vec(&events).unwrap()), a.events_digest);
    }

    #[test]
    fn test_missing_seed_is_filled_in() {
        let out = simulate_match_json(&request(None, false).to_string()).unwrap();
        let parsed: MatchResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.result.seed, parsed.seed);
    }

    #[test]
    fn test_bad_requests() {
        assert!(matches!(simulate_match_json("{"), Err(MatchError::Serialization(_))));

        let mut wrong_version = request(Some(1), false);
        wrong_version["schema_version"] = json!(9);
        let err = simulate_match_json(&wrong_version.to_string()).unwrap_err();
        assert!(err.to_string().contains("schema version"));

        let mut same_team = request(Some(1), false);
        same_team["away_team"] = same_team["home_team"].clone();
        let err = simulate_match_json(&same_team.to_string()).unwrap_err();
        assert!(err.is_validation());

        let mut bad_config = request(Some(1), false);
        bad_config["config"]["flow"]["time_step"] = json!(0.0);
        assert!(matches!(simulate_match_json(&bad_config.to_string()), Err(MatchError::InvalidConfig(_))));
    }
}
