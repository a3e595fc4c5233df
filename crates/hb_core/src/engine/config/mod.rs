//! # Engine Configuration
//!
//! 모든 튜닝 상수를 한 곳에서 관리한다.
//!
//! - Presets: `realistic()` (default), `arcade()`, `quick(half_secs)`
//! - YAML overrides: any subset of fields; missing fields keep their defaults
//!
//! ```rust
//! use hb_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::arcade();
//! assert!(arcade.actions.shot.max_aim_error < config.actions.shot.max_aim_error);
//! ```

mod action_config;
mod ai_config;
mod match_config;
mod physics_config;
mod stamina_config;

pub use action_config::{
    ActionConfig, BlockConfig, InterceptionConfig, PassConfig, PickupConfig, SaveConfig,
    ShotConfig, TackleConfig,
};
pub use ai_config::AiConfig;
pub use match_config::MatchConfig;
pub use physics_config::{MovementConfig, PhysicsConfig};
pub use stamina_config::StaminaConfig;

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Clock, restarts, suspensions, timeouts
    pub flow: MatchConfig,
    /// Ball flight
    pub physics: PhysicsConfig,
    /// Player kinematics / collisions
    pub movement: MovementConfig,
    pub stamina: StaminaConfig,
    /// Calculator tunables
    pub actions: ActionConfig,
    pub ai: AiConfig,
}

impl EngineConfig {
    /// 현실적인 시뮬레이션 (기본)
    pub fn realistic() -> Self {
        Self::default()
    }

    /// 아케이드 스타일: sharper shooting, fewer fouls, faster tempo
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.actions.shot.max_aim_error = 1.2;
        cfg.actions.shot.base_accuracy = 0.97;
        cfg.actions.save.base = 0.15;
        cfg.actions.tackle.base_foul = 0.12;
        cfg.actions.tackle.two_minute_base = 0.06;
        cfg.ai.max_hold_secs = 2.5;
        cfg.ai.shot_quality_threshold = 0.35;
        cfg
    }

    /// Short halves for previews and tests. Suspensions and timeouts shrink
    /// with the half so they keep their share of the match.
    pub fn quick(half_duration_secs: f32) -> Self {
        let mut cfg = Self::default();
        let scale = half_duration_secs / cfg.flow.half_duration_secs;
        cfg.flow.half_duration_secs = half_duration_secs;
        cfg.flow.suspension_secs = (cfg.flow.suspension_secs * scale).max(1.0);
        cfg.flow.timeout_duration_secs = (cfg.flow.timeout_duration_secs * scale).max(1.0);
        cfg
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the loop cannot run with. Tuning values that are merely odd
    /// are accepted.
    pub fn validate(&self) -> Result<()> {
        let f = &self.flow;
        positive("flow.time_step", f.time_step)?;
        positive("flow.half_duration_secs", f.half_duration_secs)?;
        if f.time_step > f.half_duration_secs {
            return Err(MatchError::InvalidConfig(
                "flow.time_step must not exceed flow.half_duration_secs".into(),
            ));
        }
        if f.safety_factor < 1.0 {
            return Err(MatchError::InvalidConfig("flow.safety_factor must be >= 1.0".into()));
        }
        positive("flow.suspension_secs", f.suspension_secs)?;
        positive("flow.restart_timeout_secs", f.restart_timeout_secs)?;
        if f.suspensions_for_disqualification == 0 {
            return Err(MatchError::InvalidConfig(
                "flow.suspensions_for_disqualification must be at least 1".into(),
            ));
        }

        positive("physics.gravity", self.physics.gravity)?;
        unit("physics.restitution", self.physics.restitution)?;
        unit("physics.bounce_friction", self.physics.bounce_friction)?;
        positive("movement.base_max_speed", self.movement.base_max_speed)?;
        positive("movement.base_acceleration", self.movement.base_acceleration)?;
        unit("movement.min_speed_fraction", self.movement.min_speed_fraction)?;

        let a = &self.actions;
        unit("actions.pass.base_accuracy", a.pass.base_accuracy)?;
        unit("actions.shot.base_accuracy", a.shot.base_accuracy)?;
        unit("actions.tackle.base_success", a.tackle.base_success)?;
        unit("actions.tackle.base_foul", a.tackle.base_foul)?;
        unit("actions.interception.max", a.interception.max)?;
        unit("actions.block.max", a.block.max)?;
        unit("actions.save.max", a.save.max)?;
        positive("actions.pass.speed", a.pass.speed)?;
        positive("actions.shot.base_speed", a.shot.base_speed)?;

        if self.ai.min_hold_secs > self.ai.max_hold_secs {
            return Err(MatchError::InvalidConfig(
                "ai.min_hold_secs must not exceed ai.max_hold_secs".into(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MatchError::InvalidConfig(format!("{name} must be > 0 (got {value})")))
    }
}

fn unit(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MatchError::InvalidConfig(format!("{name} must be within 0..=1 (got {value})")))
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::arcade().validate().is_ok());
        assert!(EngineConfig::quick(60.0).validate().is_ok());
    }

    #[test]
    fn test_arcade_is_more_accurate() {
        let realistic = EngineConfig::realistic();
        let arcade = EngineConfig::arcade();
        assert!(arcade.actions.shot.max_aim_error < realistic.actions.shot.max_aim_error);
        assert!(arcade.actions.tackle.base_foul < realistic.actions.tackle.base_foul);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = EngineConfig::from_yaml_str("flow:\n  half_duration_secs: 300.0\n").unwrap();
        assert_eq!(cfg.flow.half_duration_secs, 300.0);
        assert_eq!(cfg.flow.time_step, 0.1);
        assert_eq!(cfg.actions, ActionConfig::default());
    }

    #[test]
    fn test_invalid_yaml_values_rejected() {
        let err = EngineConfig::from_yaml_str("flow:\n  time_step: 0.0\n").unwrap_err();
        assert!(matches!(err, MatchError::InvalidConfig(_)));

        let err = EngineConfig::from_yaml_str("actions:\n  pass:\n    base_accuracy: 1.5\n")
            .unwrap_err();
        assert!(err.to_string().contains("actions.pass.base_accuracy"));
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let cfg = EngineConfig::quick(120.0);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(cfg.to_yaml_string().unwrap().as_bytes()).unwrap();

        let loaded = EngineConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::from_yaml_file("/nonexistent/hb_config.yaml").unwrap_err();
        assert!(matches!(err, MatchError::Io(_)));
    }
}
