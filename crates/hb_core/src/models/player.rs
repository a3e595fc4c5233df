use serde::{Deserialize, Serialize};
use validator::Validate;

/// Immutable player data handed to the engine by the roster owner.
///
/// The engine never writes back into this struct; per-match state lives in
/// [`crate::engine::SimPlayer`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerData {
    pub id: u32,
    pub name: String,
    pub position: PlayerPosition,
    #[serde(default)]
    pub attributes: PlayerAttributes,
}

impl PlayerData {
    pub fn new(id: u32, name: impl Into<String>, position: PlayerPosition) -> Self {
        Self { id, name: name.into(), position, attributes: PlayerAttributes::default() }
    }

    pub fn with_attributes(mut self, attributes: PlayerAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position.is_goalkeeper()
    }
}

/// Handball playing positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPosition {
    Goalkeeper,
    LeftWing,
    LeftBack,
    CentreBack,
    Pivot,
    RightBack,
    RightWing,
}

impl PlayerPosition {
    /// Field roles in tactical slot order (left to right, pivot in the middle).
    pub const FIELD_ORDER: [PlayerPosition; 6] = [
        PlayerPosition::LeftWing,
        PlayerPosition::LeftBack,
        PlayerPosition::CentreBack,
        PlayerPosition::Pivot,
        PlayerPosition::RightBack,
        PlayerPosition::RightWing,
    ];

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, PlayerPosition::Goalkeeper)
    }

    /// Slot rank used when assigning tactical slots to field players.
    pub fn slot_rank(&self) -> usize {
        Self::FIELD_ORDER.iter().position(|p| p == self).unwrap_or(Self::FIELD_ORDER.len())
    }

    pub fn code(&self) -> &'static str {
        match self {
            PlayerPosition::Goalkeeper => "GK",
            PlayerPosition::LeftWing => "LW",
            PlayerPosition::LeftBack => "LB",
            PlayerPosition::CentreBack => "CB",
            PlayerPosition::Pivot => "PV",
            PlayerPosition::RightBack => "RB",
            PlayerPosition::RightWing => "RW",
        }
    }
}

/// Attribute identifiers, used instead of per-attribute closures for generic access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    Passing,
    Shooting,
    Technique,
    Dribbling,
    Tackling,
    Blocking,
    Decisions,
    Composure,
    Anticipation,
    Positioning,
    WorkRate,
    Aggression,
    Pace,
    Acceleration,
    Agility,
    Strength,
    Stamina,
    NaturalFitness,
    Jumping,
    Reflexes,
    Handling,
    OneOnOnes,
}

impl AttributeId {
    pub const ALL: [AttributeId; 22] = [
        AttributeId::Passing,
        AttributeId::Shooting,
        AttributeId::Technique,
        AttributeId::Dribbling,
        AttributeId::Tackling,
        AttributeId::Blocking,
        AttributeId::Decisions,
        AttributeId::Composure,
        AttributeId::Anticipation,
        AttributeId::Positioning,
        AttributeId::WorkRate,
        AttributeId::Aggression,
        AttributeId::Pace,
        AttributeId::Acceleration,
        AttributeId::Agility,
        AttributeId::Strength,
        AttributeId::Stamina,
        AttributeId::NaturalFitness,
        AttributeId::Jumping,
        AttributeId::Reflexes,
        AttributeId::Handling,
        AttributeId::OneOnOnes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttributeId::Passing => "passing",
            AttributeId::Shooting => "shooting",
            AttributeId::Technique => "technique",
            AttributeId::Dribbling => "dribbling",
            AttributeId::Tackling => "tackling",
            AttributeId::Blocking => "blocking",
            AttributeId::Decisions => "decisions",
            AttributeId::Composure => "composure",
            AttributeId::Anticipation => "anticipation",
            AttributeId::Positioning => "positioning",
            AttributeId::WorkRate => "work_rate",
            AttributeId::Aggression => "aggression",
            AttributeId::Pace => "pace",
            AttributeId::Acceleration => "acceleration",
            AttributeId::Agility => "agility",
            AttributeId::Strength => "strength",
            AttributeId::Stamina => "stamina",
            AttributeId::NaturalFitness => "natural_fitness",
            AttributeId::Jumping => "jumping",
            AttributeId::Reflexes => "reflexes",
            AttributeId::Handling => "handling",
            AttributeId::OneOnOnes => "one_on_ones",
        }
    }
}

pub const ATTRIBUTE_MIN: u8 = 1;
pub const ATTRIBUTE_MAX: u8 = 20;

/// Player attributes on the 1-20 scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct PlayerAttributes {
    #[validate(range(min = 1, max = 20))]
    pub passing: u8,
    #[validate(range(min = 1, max = 20))]
    pub shooting: u8,
    #[validate(range(min = 1, max = 20))]
    pub technique: u8,
    #[validate(range(min = 1, max = 20))]
    pub dribbling: u8,
    #[validate(range(min = 1, max = 20))]
    pub tackling: u8,
    #[validate(range(min = 1, max = 20))]
    pub blocking: u8,
    #[validate(range(min = 1, max = 20))]
    pub decisions: u8,
    #[validate(range(min = 1, max = 20))]
    pub composure: u8,
    #[validate(range(min = 1, max = 20))]
    pub anticipation: u8,
    #[validate(range(min = 1, max = 20))]
    pub positioning: u8,
    #[validate(range(min = 1, max = 20))]
    pub work_rate: u8,
    #[validate(range(min = 1, max = 20))]
    pub aggression: u8,
    #[validate(range(min = 1, max = 20))]
    pub pace: u8,
    #[validate(range(min = 1, max = 20))]
    pub acceleration: u8,
    #[validate(range(min = 1, max = 20))]
    pub agility: u8,
    #[validate(range(min = 1, max = 20))]
    pub strength: u8,
    #[validate(range(min = 1, max = 20))]
    pub stamina: u8,
    #[validate(range(min = 1, max = 20))]
    pub natural_fitness: u8,
    #[validate(range(min = 1, max = 20))]
    pub jumping: u8,
    #[validate(range(min = 1, max = 20))]
    pub reflexes: u8,
    #[validate(range(min = 1, max = 20))]
    pub handling: u8,
    #[validate(range(min = 1, max = 20))]
    pub one_on_ones: u8,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl PlayerAttributes {
    /// Every attribute set to `value` (clamped to 1..=20).
    pub fn uniform(value: u8) -> Self {
        let v = value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
        Self {
            passing: v,
            shooting: v,
            technique: v,
            dribbling: v,
            tackling: v,
            blocking: v,
            decisions: v,
            composure: v,
            anticipation: v,
            positioning: v,
            work_rate: v,
            aggression: v,
            pace: v,
            acceleration: v,
            agility: v,
            strength: v,
            stamina: v,
            natural_fitness: v,
            jumping: v,
            reflexes: v,
            handling: v,
            one_on_ones: v,
        }
    }

    pub fn get(&self, id: AttributeId) -> u8 {
        match id {
            AttributeId::Passing => self.passing,
            AttributeId::Shooting => self.shooting,
            AttributeId::Technique => self.technique,
            AttributeId::Dribbling => self.dribbling,
            AttributeId::Tackling => self.tackling,
            AttributeId::Blocking => self.blocking,
            AttributeId::Decisions => self.decisions,
            AttributeId::Composure => self.composure,
            AttributeId::Anticipation => self.anticipation,
            AttributeId::Positioning => self.positioning,
            AttributeId::WorkRate => self.work_rate,
            AttributeId::Aggression => self.aggression,
            AttributeId::Pace => self.pace,
            AttributeId::Acceleration => self.acceleration,
            AttributeId::Agility => self.agility,
            AttributeId::Strength => self.strength,
            AttributeId::Stamina => self.stamina,
            AttributeId::NaturalFitness => self.natural_fitness,
            AttributeId::Jumping => self.jumping,
            AttributeId::Reflexes => self.reflexes,
            AttributeId::Handling => self.handling,
            AttributeId::OneOnOnes => self.one_on_ones,
        }
    }

    pub fn set(&mut self, id: AttributeId, value: u8) {
        let v = value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
        let slot = match id {
            AttributeId::Passing => &mut self.passing,
            AttributeId::Shooting => &mut self.shooting,
            AttributeId::Technique => &mut self.technique,
            AttributeId::Dribbling => &mut self.dribbling,
            AttributeId::Tackling => &mut self.tackling,
            AttributeId::Blocking => &mut self.blocking,
            AttributeId::Decisions => &mut self.decisions,
            AttributeId::Composure => &mut self.composure,
            AttributeId::Anticipation => &mut self.anticipation,
            AttributeId::Positioning => &mut self.positioning,
            AttributeId::WorkRate => &mut self.work_rate,
            AttributeId::Aggression => &mut self.aggression,
            AttributeId::Pace => &mut self.pace,
            AttributeId::Acceleration => &mut self.acceleration,
            AttributeId::Agility => &mut self.agility,
            AttributeId::Strength => &mut self.strength,
            AttributeId::Stamina => &mut self.stamina,
            AttributeId::NaturalFitness => &mut self.natural_fitness,
            AttributeId::Jumping => &mut self.jumping,
            AttributeId::Reflexes => &mut self.reflexes,
            AttributeId::Handling => &mut self.handling,
            AttributeId::OneOnOnes => &mut self.one_on_ones,
        };
        *slot = v;
    }

    /// Attribute mapped to 0.0..=1.0 (1 → 0.0, 20 → 1.0).
    #[inline]
    pub fn normalized(&self, id: AttributeId) -> f32 {
        normalize(self.get(id))
    }

    /// Weighted blend of normalized attributes. Weights need not sum to one.
    pub fn blend(&self, weights: &[(AttributeId, f32)]) -> f32 {
        let total: f32 = weights.iter().map(|(_, w)| *w).sum();
        if total <= f32::EPSILON {
            return 0.0;
        }
        weights.iter().map(|(id, w)| self.normalized(*id) * w).sum::<f32>() / total
    }

    /// Iterate `(id, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, u8)> + '_ {
        AttributeId::ALL.iter().map(move |id| (*id, self.get(*id)))
    }
}

/// Map a 1-20 attribute value to 0.0..=1.0.
#[inline]
pub fn normalize(value: u8) -> f32 {
    let v = value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX) as f32;
    (v - ATTRIBUTE_MIN as f32) / (ATTRIBUTE_MAX - ATTRIBUTE_MIN) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip_all_ids() {
        let mut attrs = PlayerAttributes::default();
        for (i, id) in AttributeId::ALL.iter().enumerate() {
            attrs.set(*id, (i % 20) as u8 + 1);
        }
        for (i, id) in AttributeId::ALL.iter().enumerate() {
            assert_eq!(attrs.get(*id), (i % 20) as u8 + 1, "{}", id.name());
        }
    }

    #[test]
    fn test_set_clamps_out_of_range() {
        let mut attrs = PlayerAttributes::default();
        attrs.set(AttributeId::Pace, 0);
        assert_eq!(attrs.pace, 1);
        attrs.set(AttributeId::Pace, 99);
        assert_eq!(attrs.pace, 20);
    }

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize(1), 0.0);
        assert_eq!(normalize(20), 1.0);
        assert!((normalize(10) - 9.0 / 19.0).abs() < 1e-6);
    }

    #[test]
    fn test_blend_weights() {
        let mut attrs = PlayerAttributes::uniform(1);
        attrs.passing = 20;
        let blend = attrs.blend(&[(AttributeId::Passing, 1.0), (AttributeId::Decisions, 1.0)]);
        assert!((blend - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_validation_rejects_zero() {
        let mut attrs = PlayerAttributes::default();
        assert!(attrs.validate().is_ok());
        attrs.shooting = 0;
        assert!(attrs.validate().is_err());
    }

    #[test]
    fn test_slot_rank_order() {
        assert_eq!(PlayerPosition::LeftWing.slot_rank(), 0);
        assert_eq!(PlayerPosition::RightWing.slot_rank(), 5);
        assert_eq!(PlayerPosition::Goalkeeper.slot_rank(), 6);
    }
}
