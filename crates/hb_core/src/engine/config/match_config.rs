//! Match flow configuration (clock, restarts, suspensions, timeouts)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Length of one half in simulated seconds (default: 1800)
    pub half_duration_secs: f32,
    /// Fixed logical step (default: 0.1s)
    pub time_step: f32,
    /// Safety bound multiplier over the steps a full match needs (default: 1.5)
    pub safety_factor: f32,
    /// Lower bound for the safety step limit (default: 1000)
    pub min_safety_steps: u64,
    /// Steps between progress notifications (default: 300 = 30s)
    pub progress_interval_steps: u64,

    // === Suspensions ===
    /// Two-minute suspension length (default: 120s)
    pub suspension_secs: f32,
    /// Suspensions that lead to disqualification (default: 3)
    pub suspensions_for_disqualification: u8,

    // === Restarts ===
    pub throw_off_delay_secs: f32,
    pub set_piece_delay_secs: f32,
    pub penalty_delay_secs: f32,
    /// Dead-ball phase reverts to contested play if nobody releases the ball in time
    pub restart_timeout_secs: f32,
    /// Transition phase length before it settles into the attack phase
    pub transition_duration_secs: f32,

    // === Timeouts ===
    pub timeouts_enabled: bool,
    pub timeout_duration_secs: f32,
    pub max_timeouts_per_team: u8,
    pub max_timeouts_per_half: u8,
    /// Goal deficit that makes the trailing coach call a timeout
    pub timeout_deficit_trigger: u16,

    /// Stamina restored at half-time (0..1, added and clamped)
    pub half_time_stamina_recovery: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            half_duration_secs: 1800.0,
            time_step: 0.1,
            safety_factor: 1.5,
            min_safety_steps: 1000,
            progress_interval_steps: 300,

            suspension_secs: 120.0,
            suspensions_for_disqualification: 3,

            throw_off_delay_secs: 1.0,
            set_piece_delay_secs: 1.2,
            penalty_delay_secs: 2.0,
            restart_timeout_secs: 8.0,
            transition_duration_secs: 4.0,

            timeouts_enabled: true,
            timeout_duration_secs: 60.0,
            max_timeouts_per_team: 3,
            max_timeouts_per_half: 2,
            timeout_deficit_trigger: 3,

            half_time_stamina_recovery: 0.3,
        }
    }
}

impl MatchConfig {
    pub fn match_duration_secs(&self) -> f32 {
        self.half_duration_secs * 2.0
    }

    /// Steps a full match needs at the configured time step.
    pub fn steps_for_match(&self) -> u64 {
        (self.match_duration_secs() / self.time_step).ceil() as u64
    }

    /// Loop bound: `safety_factor` × full-match steps, never below `min_safety_steps`.
    pub fn max_steps(&self) -> u64 {
        let scaled = (self.steps_for_match() as f64 * self.safety_factor as f64).ceil() as u64;
        scaled.max(self.min_safety_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_steps() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.steps_for_match(), 36_000);
        assert_eq!(cfg.max_steps(), 54_000);
    }

    #[test]
    fn test_safety_floor() {
        let cfg = MatchConfig { half_duration_secs: 10.0, ..Default::default() };
        assert_eq!(cfg.steps_for_match(), 200);
        assert_eq!(cfg.max_steps(), 1000);
    }
}
