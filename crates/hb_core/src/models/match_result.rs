//! Match Result Data Structures
//!
//! Output of the simulation core. Collaborators (league tables, player history,
//! commentary) consume this and nothing else; the event log travels separately.

use super::match_statistics::TeamMatchStats;
use super::TeamSide;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the simulation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Full time reached normally.
    #[default]
    Completed,
    /// Caller requested cancellation; result holds the state at that tick boundary.
    Cancelled,
    /// A step failed and the match was force-finished.
    Aborted,
    /// The safety step bound was hit before full time.
    StepLimitReached,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_score: u16,
    pub away_score: u16,
    pub home_stats: TeamMatchStats,
    pub away_stats: TeamMatchStats,
    /// Passed through from the caller; the core never computes dates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_date: Option<NaiveDate>,
    pub status: MatchStatus,
    /// Simulated seconds at the end of the loop.
    pub duration_secs: f32,
    pub seed: u64,
}

impl MatchResult {
    pub fn score(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::Home => self.home_score,
            TeamSide::Away => self.away_score,
        }
    }

    pub fn stats(&self, side: TeamSide) -> &TeamMatchStats {
        match side {
            TeamSide::Home => &self.home_stats,
            TeamSide::Away => &self.away_stats,
        }
    }

    /// `None` for a draw.
    pub fn winner(&self) -> Option<TeamSide> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Score/stat consistency: each side's score equals its goals-scored counter.
    pub fn is_consistent(&self) -> bool {
        self.home_score == self.home_stats.goals_scored
            && self.away_score == self.away_stats.goals_scored
            && self.home_stats.goals_conceded == self.away_score
            && self.away_stats.goals_conceded == self.home_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(home: u16, away: u16) -> MatchResult {
        MatchResult {
            home_team_id: 1,
            away_team_id: 2,
            home_team_name: "Home".into(),
            away_team_name: "Away".into(),
            home_score: home,
            away_score: away,
            home_stats: TeamMatchStats {
                goals_scored: home,
                goals_conceded: away,
                ..Default::default()
            },
            away_stats: TeamMatchStats {
                goals_scored: away,
                goals_conceded: home,
                ..Default::default()
            },
            match_date: NaiveDate::from_ymd_opt(2026, 10, 17),
            status: MatchStatus::Completed,
            duration_secs: 3600.0,
            seed: 42,
        }
    }

    #[test]
    fn test_winner() {
        assert_eq!(result(30, 28).winner(), Some(TeamSide::Home));
        assert_eq!(result(27, 29).winner(), Some(TeamSide::Away));
        assert_eq!(result(25, 25).winner(), None);
    }

    #[test]
    fn test_consistency_check() {
        let mut r = result(30, 28);
        assert!(r.is_consistent());
        r.home_score += 1;
        assert!(!r.is_consistent());
    }

    #[test]
    fn test_date_passthrough_serializes() {
        let json = serde_json::to_string(&result(1, 0)).unwrap();
        assert!(json.contains("2026-10-17"));
        assert!(json.contains("\"status\":\"completed\""));
    }
}
