//! Action calculator tunables (pass, shot, tackle, interception, block, save, pickup)
//!
//! Every probability in the calculators is built from these numbers; nothing in
//! `engine::actions` hardcodes a tuning constant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ActionConfig {
    pub pass: PassConfig,
    pub shot: ShotConfig,
    pub tackle: TackleConfig,
    pub interception: InterceptionConfig,
    pub block: BlockConfig,
    pub save: SaveConfig,
    pub pickup: PickupConfig,
}

// ============================================================================
// Pass
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PassConfig {
    /// Accuracy of a perfect passer under no pressure at comfortable range
    pub base_accuracy: f32,
    /// Skill multiplier floor (skill blend 0 → this multiplier)
    pub skill_floor: f32,
    pub passing_weight: f32,
    pub decisions_weight: f32,
    pub technique_weight: f32,
    /// No distance penalty below this range (m)
    pub comfortable_distance: f32,
    pub distance_penalty_per_m: f32,
    /// Opponents within this radius of the passer apply pressure (m)
    pub pressure_radius: f32,
    pub max_pressure_penalty: f32,
    /// Composure 20 cancels this fraction of the pressure penalty
    pub composure_damping: f32,
    /// Release speed of an accurate pass (m/s)
    pub speed: f32,
    pub max_speed: f32,
    /// Standard deviation of an accurate release (degrees)
    pub accurate_deviation_deg: f32,
    pub inaccurate_deviation_min_deg: f32,
    pub inaccurate_deviation_max_deg: f32,
    /// Inaccurate passes leave the hand at this fraction of pass speed
    pub inaccurate_speed_factor: f32,
    /// Height the ball should arrive at the receiver (m)
    pub receive_height: f32,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            base_accuracy: 0.95,
            skill_floor: 0.55,
            passing_weight: 0.5,
            decisions_weight: 0.25,
            technique_weight: 0.25,
            comfortable_distance: 8.0,
            distance_penalty_per_m: 0.012,
            pressure_radius: 2.5,
            max_pressure_penalty: 0.3,
            composure_damping: 0.6,
            speed: 13.0,
            max_speed: 18.0,
            accurate_deviation_deg: 3.0,
            inaccurate_deviation_min_deg: 20.0,
            inaccurate_deviation_max_deg: 55.0,
            inaccurate_speed_factor: 0.6,
            receive_height: 1.2,
        }
    }
}

// ============================================================================
// Shot
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShotConfig {
    pub base_accuracy: f32,
    pub skill_floor: f32,
    pub shooting_weight: f32,
    pub technique_weight: f32,
    pub composure_weight: f32,
    pub comfortable_distance: f32,
    pub distance_penalty_per_m: f32,
    pub pressure_radius: f32,
    pub max_pressure_penalty: f32,
    pub composure_damping: f32,
    /// Release speed of a shooting-1 / strength-1 player (m/s)
    pub base_speed: f32,
    /// Extra release speed at shooting/strength 20 (m/s)
    pub power_speed_bonus: f32,
    /// Aim error (m at the goal plane) at accuracy 0
    pub max_aim_error: f32,
    /// Corners are aimed this far inside the posts/crossbar (m)
    pub aim_margin: f32,
    pub min_aim_height: f32,
    pub max_aim_height: f32,
    /// Max side/top spin magnitude (rad/s)
    pub max_spin: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            base_accuracy: 0.92,
            skill_floor: 0.45,
            shooting_weight: 0.55,
            technique_weight: 0.25,
            composure_weight: 0.2,
            comfortable_distance: 7.0,
            distance_penalty_per_m: 0.02,
            pressure_radius: 2.0,
            max_pressure_penalty: 0.3,
            composure_damping: 0.6,
            base_speed: 17.0,
            power_speed_bonus: 8.0,
            max_aim_error: 2.2,
            aim_margin: 0.25,
            min_aim_height: 0.35,
            max_aim_height: 1.75,
            max_spin: 12.0,
        }
    }
}

// ============================================================================
// Tackle / foul
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TackleConfig {
    /// Success probability at equal skill
    pub base_success: f32,
    pub min_success: f32,
    pub max_success: f32,
    /// Foul probability at equal skill, neutral aggression
    pub base_foul: f32,
    pub max_foul: f32,
    pub aggression_foul_weight: f32,
    pub from_behind_foul_multiplier: f32,
    /// Added foul probability per m/s of closing speed
    pub closing_speed_foul_weight: f32,
    pub clear_chance_foul_multiplier: f32,
    /// Tackler can reach the carrier within this distance (m)
    pub reach: f32,
    /// Angle between carrier facing and tackler direction that counts as from behind (deg)
    pub from_behind_angle_deg: f32,

    // === Severity tiers ===
    pub two_minute_base: f32,
    pub red_card_base: f32,
    pub from_behind_severity: f32,
    pub clear_chance_severity: f32,
    pub aggression_severity: f32,

    /// Dislodged ball speed (m/s)
    pub loose_ball_speed: f32,
    pub preparation_secs: f32,
    /// Tackler cannot try again for this long (s)
    pub cooldown_secs: f32,
}

impl Default for TackleConfig {
    fn default() -> Self {
        Self {
            base_success: 0.32,
            min_success: 0.05,
            max_success: 0.8,
            base_foul: 0.2,
            max_foul: 0.75,
            aggression_foul_weight: 0.5,
            from_behind_foul_multiplier: 1.8,
            closing_speed_foul_weight: 0.05,
            clear_chance_foul_multiplier: 1.3,
            reach: 1.6,
            from_behind_angle_deg: 120.0,

            two_minute_base: 0.12,
            red_card_base: 0.01,
            from_behind_severity: 1.6,
            clear_chance_severity: 2.0,
            aggression_severity: 0.8,

            loose_ball_speed: 3.0,
            preparation_secs: 0.3,
            cooldown_secs: 1.5,
        }
    }
}

// ============================================================================
// Reactive checks
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InterceptionConfig {
    /// Max distance between defender and the ball's path this tick (m)
    pub radius: f32,
    pub reach_height: f32,
    pub base: f32,
    pub max: f32,
    pub anticipation_weight: f32,
    pub agility_weight: f32,
    pub positioning_weight: f32,
    /// Early in the flight the ball is harder to read
    pub progress_weight: f32,
    /// Pass speed at which the speed factor bottoms out (m/s)
    pub speed_reference: f32,
    pub speed_weight: f32,
    /// Bonus per m/s the defender is moving toward the ball
    pub closing_weight: f32,
}

impl Default for InterceptionConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            reach_height: 2.3,
            base: 0.4,
            max: 0.8,
            anticipation_weight: 0.45,
            agility_weight: 0.25,
            positioning_weight: 0.3,
            progress_weight: 0.3,
            speed_reference: 18.0,
            speed_weight: 0.35,
            closing_weight: 0.04,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockConfig {
    pub radius: f32,
    pub reach_height: f32,
    pub base: f32,
    pub max: f32,
    pub blocking_weight: f32,
    pub jumping_weight: f32,
    pub anticipation_weight: f32,
    /// Blocked shots rebound at this fraction of their speed
    pub rebound_factor: f32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            radius: 0.7,
            reach_height: 2.4,
            base: 0.3,
            max: 0.7,
            blocking_weight: 0.5,
            jumping_weight: 0.25,
            anticipation_weight: 0.25,
            rebound_factor: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SaveConfig {
    pub base: f32,
    pub max: f32,
    pub reflexes_weight: f32,
    pub positioning_weight: f32,
    pub one_on_ones_weight: f32,
    /// Lateral reach of a 1-rated keeper (m)
    pub reach_base: f32,
    /// Extra reach at agility/jumping 20 (m)
    pub reach_bonus: f32,
    pub max_height: f32,
    /// Shot speed at which the speed penalty saturates (m/s)
    pub speed_reference: f32,
    pub speed_penalty: f32,
    /// Probability a save is caught rather than parried, scaled by Handling
    pub catch_base: f32,
    /// Parried balls leave at this fraction of shot speed
    pub parry_factor: f32,
    /// Keeper reacts when the ball is within this distance of the goal line (m)
    pub reaction_distance: f32,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            base: 0.22,
            max: 0.85,
            reflexes_weight: 0.45,
            positioning_weight: 0.3,
            one_on_ones_weight: 0.25,
            reach_base: 0.9,
            reach_bonus: 1.0,
            max_height: 2.3,
            speed_reference: 25.0,
            speed_penalty: 0.25,
            catch_base: 0.45,
            parry_factor: 0.35,
            reaction_distance: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PickupConfig {
    pub radius: f32,
    pub max_height: f32,
    /// Faster balls cannot be gathered (m/s)
    pub max_speed: f32,
    /// Only the goalkeeper may gather a ball lying in their goal area
    pub enforce_goal_area: bool,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self { radius: 0.9, max_height: 2.0, max_speed: 9.0, enforce_goal_area: true }
    }
}
