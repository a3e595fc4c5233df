//! Stamina Configuration

use serde::{Deserialize, Serialize};

/// Stamina drain/recovery parameters (rates are per simulated second).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StaminaConfig {
    // === Drain ===
    /// Drain while on court regardless of effort (default: 0.0004)
    pub base_drain_per_sec: f32,
    /// Extra drain at full effort (default: 0.0012)
    pub effort_drain_per_sec: f32,
    /// Sprinting multiplies drain by this (default: 2.5)
    pub sprint_drain_multiplier: f32,
    /// How much a 20 Stamina attribute cuts drain (default: 0.5)
    pub stamina_attr_resistance: f32,

    // === Recovery ===
    /// Recovery while walking/standing (default: 0.004)
    pub recovery_per_sec: f32,
    /// Natural Fitness 20 adds this fraction to recovery (default: 1.0)
    pub fitness_recovery_bonus: f32,
    /// Below this speed the player recovers instead of draining (m/s)
    pub recovery_speed_threshold: f32,
    /// Recovery rate for benched/suspended players relative to on-court recovery
    pub bench_recovery_factor: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            base_drain_per_sec: 0.0004,
            effort_drain_per_sec: 0.0012,
            sprint_drain_multiplier: 2.5,
            stamina_attr_resistance: 0.5,

            recovery_per_sec: 0.004,
            fitness_recovery_bonus: 1.0,
            recovery_speed_threshold: 1.5,
            bench_recovery_factor: 1.5,
        }
    }
}
