//! Shared engine types

use serde::{Deserialize, Serialize};

/// Court-plane vector in metres (`x` along the length, `y` across).
pub type Vec2 = nalgebra::Vector2<f32>;
/// 3D vector in metres; `z` is height above the floor.
pub type Vec3 = nalgebra::Vector3<f32>;

/// Index into `MatchState::players`.
///
/// Stable for the whole match: players are never removed from the arena, only
/// moved between a team's on-court and bench lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl PlayerId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[inline]
pub fn xy(v: &Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[inline]
pub fn lift(v: &Vec2, z: f32) -> Vec3 {
    Vec3::new(v.x, v.y, z)
}

/// Linear interpolation between two points.
#[inline]
pub fn lerp2(a: &Vec2, b: &Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}
