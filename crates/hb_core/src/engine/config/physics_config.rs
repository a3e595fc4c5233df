//! Ball and player kinematics parameters

use serde::{Deserialize, Serialize};

/// Ball flight, bounce and roll parameters (SI units).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Size 3 handball: ~0.45 kg
    pub ball_mass: f32,
    pub ball_radius: f32,
    pub air_density: f32,
    pub drag_coefficient: f32,
    /// Magnus acceleration per unit of (spin × velocity)
    pub magnus_coefficient: f32,
    /// Exponential spin decay rate (1/s)
    pub spin_decay_rate: f32,
    /// Vertical coefficient of restitution on the court floor
    pub restitution: f32,
    /// Fraction of horizontal speed lost per bounce
    pub bounce_friction: f32,
    /// Below this post-bounce vertical speed the ball starts rolling (m/s)
    pub min_bounce_speed: f32,
    /// Rolling deceleration (m/s²)
    pub rolling_deceleration: f32,
    /// Below this horizontal speed a rolling ball stops (m/s)
    pub stop_speed: f32,
    /// Height of a held ball (m)
    pub hold_height: f32,
    /// Horizontal offset of a held ball along the holder's facing (m)
    pub hold_offset: f32,
    /// A free ball is kept within the court plus this margin (m)
    pub out_of_bounds_margin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            ball_mass: 0.45,
            ball_radius: 0.095,
            air_density: 1.2,
            drag_coefficient: 0.47,
            magnus_coefficient: 0.008,
            spin_decay_rate: 1.2,
            restitution: 0.55,
            bounce_friction: 0.25,
            min_bounce_speed: 1.0,
            rolling_deceleration: 1.8,
            stop_speed: 0.2,
            hold_height: 1.1,
            hold_offset: 0.35,
            out_of_bounds_margin: 2.0,
        }
    }
}

impl PhysicsConfig {
    /// Quadratic drag constant k in `a = -k |v| v`.
    pub fn drag_constant(&self) -> f32 {
        if self.ball_mass <= 0.0 {
            return 0.0;
        }
        let area = std::f32::consts::PI * self.ball_radius * self.ball_radius;
        0.5 * self.air_density * self.drag_coefficient * area / self.ball_mass
    }
}

/// Player kinematics, collision and spacing parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Top speed of a pace-1 player (m/s)
    pub base_max_speed: f32,
    /// Extra top speed at pace 20 (m/s)
    pub pace_speed_bonus: f32,
    /// Acceleration at agility/acceleration 1 (m/s²)
    pub base_acceleration: f32,
    pub agility_acceleration_bonus: f32,
    /// Deceleration limit relative to acceleration
    pub deceleration_factor: f32,
    /// Linear velocity drag (1/s)
    pub drag: f32,

    // === Sprint ===
    pub sprint_multiplier: f32,
    pub sprint_distance: f32,
    pub sprint_min_stamina: f32,
    /// Requested speed / effective speed ratio that counts as trying to sprint
    pub sprint_speed_ratio: f32,

    /// Effective speed fraction at zero stamina
    pub min_speed_fraction: f32,
    pub arrival_radius: f32,
    pub carrier_speed_factor: f32,
    pub preparing_speed_factor: f32,

    // === Collisions / spacing ===
    pub player_radius: f32,
    pub base_mass: f32,
    pub strength_mass_bonus: f32,
    pub min_spacing: f32,
    /// Players stay this far inside the court lines (m)
    pub sideline_buffer: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            base_max_speed: 5.0,
            pace_speed_bonus: 3.2,
            base_acceleration: 3.0,
            agility_acceleration_bonus: 3.0,
            deceleration_factor: 1.5,
            drag: 0.05,

            sprint_multiplier: 1.15,
            sprint_distance: 4.0,
            sprint_min_stamina: 0.25,
            sprint_speed_ratio: 0.9,

            min_speed_fraction: 0.65,
            arrival_radius: 0.3,
            carrier_speed_factor: 0.85,
            preparing_speed_factor: 0.35,

            player_radius: 0.35,
            base_mass: 70.0,
            strength_mass_bonus: 30.0,
            min_spacing: 2.0,
            sideline_buffer: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_constant_reasonable() {
        let k = PhysicsConfig::default().drag_constant();
        // ~0.018 for a size 3 handball
        assert!(k > 0.01 && k < 0.03, "k = {k}");
    }

    #[test]
    fn test_zero_mass_has_no_drag() {
        let cfg = PhysicsConfig { ball_mass: 0.0, ..Default::default() };
        assert_eq!(cfg.drag_constant(), 0.0);
    }
}
