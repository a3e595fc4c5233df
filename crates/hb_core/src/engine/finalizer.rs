//! Match finalizer: final score and statistics packed into a [`MatchResult`].

use super::match_state::MatchState;
use crate::models::{MatchResult, TeamSide};
use chrono::NaiveDate;

pub fn finalize(state: &MatchState, match_date: Option<NaiveDate>) -> MatchResult {
    let total_possession: f32 = state.stats.iter().map(|s| s.possession_secs).sum();
    let mut stats = state.stats.clone();
    for s in stats.iter_mut() {
        s.finalize_percentages(total_possession);
    }
    let [home_stats, away_stats] = stats;
    let (home, away) = (state.team(TeamSide::Home), state.team(TeamSide::Away));

    let result = MatchResult {
        home_team_id: home.team_id,
        away_team_id: away.team_id,
        home_team_name: home.name.clone(),
        away_team_name: away.name.clone(),
        home_score: state.score_of(TeamSide::Home),
        away_score: state.score_of(TeamSide::Away),
        home_stats,
        away_stats,
        match_date,
        status: state.status,
        duration_secs: state.time,
        seed: state.seed,
    };
    if !result.is_consistent() {
        log::error!("final score {}-{} disagrees with the goal counters", result.home_score, result.away_score);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::basic_state;
    use crate::models::MatchStatus;

    #[test]
    fn test_finalize_copies_score_and_percentages() {
        let mut state = basic_state(3);
        state.score = [2, 1];
        state.stats[0].goals_scored = 2;
        state.stats[0].goals_conceded = 1;
        state.stats[0].shots = 4;
        state.stats[0].possession_secs = 30.0;
        state.stats[1].goals_scored = 1;
        state.stats[1].goals_conceded = 2;
        state.stats[1].possession_secs = 10.0;
        state.time = 600.0;

        let date = NaiveDate::from_ymd_opt(2026, 10, 17);
        let result = finalize(&state, date);
        assert_eq!((result.home_score, result.away_score), (2, 1));
        assert!(result.is_consistent());
        assert!((result.home_stats.shooting_percentage - 50.0).abs() < 1e-4);
        assert!((result.home_stats.possession_percentage - 75.0).abs() < 1e-4);
        assert!((result.away_stats.possession_percentage - 25.0).abs() < 1e-4);
        assert_eq!(result.match_date, date);
        assert_eq!(result.status, MatchStatus::Completed);
        assert_eq!(result.seed, 3);
        assert_eq!(result.duration_secs, 600.0);
    }
}
