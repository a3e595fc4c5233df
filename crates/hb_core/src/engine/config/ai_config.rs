//! AI decision and positioning tunables

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    // === Ball carrier ===
    /// Carrier holds at least this long before deciding (s)
    pub min_hold_secs: f32,
    /// Carrier is forced to release after this long (s)
    pub max_hold_secs: f32,
    /// Shots are only considered within this distance of the goal (m)
    pub shoot_range: f32,
    /// Shot quality above which the carrier shoots instead of passing
    pub shot_quality_threshold: f32,
    /// Uniform noise added to the shot-quality read (low Decisions → more)
    pub decision_noise: f32,
    pub pass_preparation_secs: f32,
    pub shot_preparation_secs: f32,
    /// Goalkeeper holds a gathered ball this long before distributing (s)
    pub goalkeeper_hold_secs: f32,

    // === Defence ===
    /// Closest defender presses the carrier inside this range (m)
    pub press_range: f32,
    /// Tackles start inside this range (m)
    pub tackle_range: f32,
    /// Defenders drift toward a pass path when it passes this close (m)
    pub intercept_range: f32,

    // === Positioning ===
    pub lateral_pull_defence: f32,
    pub lateral_pull_attack: f32,
    pub depth_pull: f32,
    /// Work rate 20 pushes a defender this much further up / an attacker this much deeper (m)
    pub work_rate_depth_shift: f32,
    /// Jitter radius of a positioning-1 player (m)
    pub max_jitter: f32,
    /// New jitter sample every bucket (s)
    pub jitter_bucket_secs: f32,
    /// Goalkeeper stands this far in front of the goal line (m)
    pub goalkeeper_line_depth: f32,
    /// Goalkeeper advance while their team attacks (m)
    pub goalkeeper_support_depth: f32,
    /// Goalkeeper lateral range around the goal centre (m)
    pub goalkeeper_lateral_limit: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            min_hold_secs: 0.5,
            max_hold_secs: 3.5,
            shoot_range: 11.0,
            shot_quality_threshold: 0.42,
            decision_noise: 0.1,
            pass_preparation_secs: 0.3,
            shot_preparation_secs: 0.4,
            goalkeeper_hold_secs: 1.0,

            press_range: 6.0,
            tackle_range: 1.6,
            intercept_range: 3.0,

            lateral_pull_defence: 0.3,
            lateral_pull_attack: 0.15,
            depth_pull: 0.08,
            work_rate_depth_shift: 1.0,
            max_jitter: 1.2,
            jitter_bucket_secs: 3.0,
            goalkeeper_line_depth: 0.8,
            goalkeeper_support_depth: 6.0,
            goalkeeper_lateral_limit: 1.3,
        }
    }
}
