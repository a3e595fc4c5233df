use serde::{Deserialize, Serialize};

/// Cumulative per-team counters for one match.
///
/// Mutated only by the event handler (and the timer for possession time); read by
/// the finalizer, which also fills in the derived percentages.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TeamMatchStats {
    pub goals_scored: u16,
    pub goals_conceded: u16,
    pub shots: u16,
    pub shots_on_target: u16,
    /// Shots by this team that were blocked by a defender.
    pub shots_blocked: u16,
    pub saves: u16,
    pub blocks: u16,
    pub turnovers: u16,
    pub interceptions: u16,
    pub passes_attempted: u16,
    pub passes_completed: u16,
    pub tackles_attempted: u16,
    pub tackles_won: u16,
    pub fouls: u16,
    pub suspensions: u16,
    pub red_cards: u16,
    pub penalties_awarded: u16,
    pub penalties_scored: u16,
    pub timeouts: u8,
    pub possession_secs: f32,

    // Derived, filled by `finalize_percentages`
    pub shooting_percentage: f32,
    pub save_percentage: f32,
    pub pass_accuracy: f32,
    pub penalty_conversion: f32,
    pub possession_percentage: f32,
}

impl TeamMatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Goals per shot, in percent.
    pub fn shooting_pct(&self) -> f32 {
        percentage(self.goals_scored as f32, self.shots as f32)
    }

    /// Saves per shot on target faced, in percent.
    pub fn save_pct(&self) -> f32 {
        percentage(self.saves as f32, (self.saves + self.goals_conceded) as f32)
    }

    pub fn pass_accuracy_pct(&self) -> f32 {
        percentage(self.passes_completed as f32, self.passes_attempted as f32)
    }

    pub fn penalty_conversion_pct(&self) -> f32 {
        percentage(self.penalties_scored as f32, self.penalties_awarded as f32)
    }

    /// Compute the stored percentage fields. `total_possession_secs` is the sum of
    /// both teams' possession time.
    pub fn finalize_percentages(&mut self, total_possession_secs: f32) {
        self.shooting_percentage = self.shooting_pct();
        self.save_percentage = self.save_pct();
        self.pass_accuracy = self.pass_accuracy_pct();
        self.penalty_conversion = self.penalty_conversion_pct();
        self.possession_percentage = percentage(self.possession_secs, total_possession_secs);
    }
}

#[inline]
fn percentage(part: f32, whole: f32) -> f32 {
    if whole <= 0.0 {
        0.0
    } else {
        (part / whole * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_stats_percentages_are_zero() {
        let mut stats = TeamMatchStats::new();
        stats.finalize_percentages(0.0);
        assert_eq!(stats.shooting_percentage, 0.0);
        assert_eq!(stats.save_percentage, 0.0);
        assert_eq!(stats.pass_accuracy, 0.0);
        assert_eq!(stats.possession_percentage, 0.0);
    }

    #[test]
    fn test_shooting_and_save_pct() {
        let stats = TeamMatchStats {
            goals_scored: 25,
            shots: 50,
            saves: 10,
            goals_conceded: 30,
            ..Default::default()
        };
        assert!((stats.shooting_pct() - 50.0).abs() < 1e-4);
        assert!((stats.save_pct() - 25.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_percentages_stay_in_range(
            goals in 0u16..60, shots in 0u16..80,
            completed in 0u16..400, attempted in 0u16..400,
            possession in 0.0f32..3600.0,
        ) {
            let mut stats = TeamMatchStats {
                goals_scored: goals,
                shots,
                passes_completed: completed,
                passes_attempted: attempted,
                possession_secs: possession,
                ..Default::default()
            };
            stats.finalize_percentages(3600.0);
            for value in [stats.shooting_percentage, stats.pass_accuracy, stats.possession_percentage] {
                prop_assert!((0.0..=100.0).contains(&value));
            }
        }
    }
}
