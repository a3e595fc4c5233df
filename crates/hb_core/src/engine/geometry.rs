//! Court geometry
//!
//! Pure queries over the court dimensions. Home defends the goal at `x = 0`
//! and attacks toward `x = length`; the sides do not swap at half-time.
//!
//! ```text
//!   y=20 +-----------------------------------------+
//!        |  (   |                 |             )  |
//!   goal |[ GA  ]  FT             |          [ GA ]| goal
//!        |  (   |                 |             )  |
//!   y=0  +-----------------------------------------+
//!        x=0                    x=20                x=40
//! ```

use super::types::{Vec2, Vec3};
use crate::models::TeamSide;
use serde::{Deserialize, Serialize};

/// Static court dimensions (metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchGeometry {
    pub length: f32,
    pub width: f32,
    pub goal_width: f32,
    pub goal_height: f32,
    /// Goal-area line: this far from the segment between the posts
    pub goal_area_radius: f32,
    /// Dashed free-throw line
    pub free_throw_radius: f32,
    pub seven_metre_distance: f32,
    /// Substitution point distance from the halfway line
    pub substitution_offset: f32,
}

impl Default for PitchGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl PitchGeometry {
    pub const STANDARD: PitchGeometry = PitchGeometry {
        length: 40.0,
        width: 20.0,
        goal_width: 3.0,
        goal_height: 2.0,
        goal_area_radius: 6.0,
        free_throw_radius: 9.0,
        seven_metre_distance: 7.0,
        substitution_offset: 4.5,
    };

    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.length * 0.5, self.width * 0.5)
    }

    /// x of the goal line `side` defends.
    pub fn own_goal_x(&self, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => 0.0,
            TeamSide::Away => self.length,
        }
    }

    /// x of the goal line `side` attacks.
    pub fn target_goal_x(&self, side: TeamSide) -> f32 {
        self.own_goal_x(side.opponent())
    }

    /// +1 when `side` attacks toward increasing x.
    pub fn attack_direction(&self, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => 1.0,
            TeamSide::Away => -1.0,
        }
    }

    /// Centre of the goal `side` defends.
    pub fn own_goal_centre(&self, side: TeamSide) -> Vec2 {
        Vec2::new(self.own_goal_x(side), self.width * 0.5)
    }

    /// Posts of the goal `side` defends (low y first).
    pub fn goal_posts(&self, side: TeamSide) -> (Vec2, Vec2) {
        let x = self.own_goal_x(side);
        let half = self.goal_width * 0.5;
        let cy = self.width * 0.5;
        (Vec2::new(x, cy - half), Vec2::new(x, cy + half))
    }

    /// Point `depth` metres in front of the goal `defending` side guards, at lateral `y`.
    pub fn from_goal(&self, defending: TeamSide, depth: f32, y: f32) -> Vec2 {
        let x = self.own_goal_x(defending) + self.attack_direction(defending) * depth;
        Vec2::new(x, y)
    }

    /// Distance from the goal line `defending` side guards, measured into the court.
    pub fn depth_from_goal(&self, defending: TeamSide, pos: &Vec2) -> f32 {
        (pos.x - self.own_goal_x(defending)) * self.attack_direction(defending)
    }

    /// Distance to the segment between the posts; the goal-area and free-throw
    /// lines are offsets of this segment.
    pub fn distance_to_goal(&self, defending: TeamSide, pos: &Vec2) -> f32 {
        let (a, b) = self.goal_posts(defending);
        distance_to_segment(pos, &a, &b)
    }

    pub fn in_goal_area(&self, defending: TeamSide, pos: &Vec2) -> bool {
        self.depth_from_goal(defending, pos) >= 0.0
            && self.distance_to_goal(defending, pos) < self.goal_area_radius
    }

    /// Inside the free-throw line (includes the goal area).
    pub fn inside_free_throw_line(&self, defending: TeamSide, pos: &Vec2) -> bool {
        self.distance_to_goal(defending, pos) < self.free_throw_radius
    }

    /// Which goal area, if any, contains `pos`.
    pub fn goal_area_at(&self, pos: &Vec2) -> Option<TeamSide> {
        TeamSide::BOTH.into_iter().find(|side| self.in_goal_area(*side, pos))
    }

    pub fn seven_metre_mark(&self, defending: TeamSide) -> Vec2 {
        self.from_goal(defending, self.seven_metre_distance, self.width * 0.5)
    }

    /// Whether a crossing point at lateral `y` / height `z` lies inside the mouth.
    pub fn within_goal_mouth(&self, y: f32, z: f32) -> bool {
        (y - self.width * 0.5).abs() <= self.goal_width * 0.5 && (0.0..=self.goal_height).contains(&z)
    }

    /// Where a suspended player of `side` waits: outside the sideline, on own half.
    pub fn substitution_point(&self, side: TeamSide) -> Vec2 {
        let x = self.length * 0.5 - self.attack_direction(side) * self.substitution_offset;
        Vec2::new(x, -1.0)
    }

    pub fn is_inside(&self, pos: &Vec2) -> bool {
        (0.0..=self.length).contains(&pos.x) && (0.0..=self.width).contains(&pos.y)
    }

    /// Clamp into the court shrunk by `buffer` on every side.
    pub fn clamp_to_court(&self, pos: &Vec2, buffer: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(buffer, self.length - buffer),
            pos.y.clamp(buffer, self.width - buffer),
        )
    }

    /// Clamp into the court grown by `margin` (used for a free ball so crossings stay visible).
    pub fn clamp_with_margin(&self, pos: &Vec3, margin: f32) -> Vec3 {
        Vec3::new(
            pos.x.clamp(-margin, self.length + margin),
            pos.y.clamp(-margin, self.width + margin),
            pos.z,
        )
    }

    /// Push a point that lies inside `defending`'s goal area out to its line.
    pub fn push_out_of_goal_area(&self, defending: TeamSide, pos: &Vec2) -> Vec2 {
        if !self.in_goal_area(defending, pos) {
            return *pos;
        }
        let (a, b) = self.goal_posts(defending);
        let closest = closest_point_on_segment(pos, &a, &b);
        let mut dir = pos - closest;
        if dir.norm() < 1e-4 {
            dir = Vec2::new(self.attack_direction(defending), 0.0);
        }
        closest + dir.normalize() * (self.goal_area_radius + 0.05)
    }
}

// ============================================================================
// Segment helpers
// ============================================================================

/// Closest point to `p` on segment `a`-`b`.
pub fn closest_point_on_segment(p: &Vec2, a: &Vec2, b: &Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-8 {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Point-to-segment distance.
pub fn distance_to_segment(p: &Vec2, a: &Vec2, b: &Vec2) -> f32 {
    (p - closest_point_on_segment(p, a, b)).norm()
}

/// Where segment `prev`-`curr` crosses the plane `axis = value` (axis 0 = x, 1 = y).
///
/// Returns the interpolated 3D crossing point, or `None` if the segment stays on
/// one side.
pub fn plane_crossing(prev: &Vec3, curr: &Vec3, axis: usize, value: f32) -> Option<Vec3> {
    let (p, c) = (prev[axis], curr[axis]);
    let crosses = (p - value) * (c - value) <= 0.0 && (p - value).abs() > f32::EPSILON;
    if !crosses || (c - p).abs() < 1e-8 {
        return None;
    }
    let t = ((value - p) / (c - p)).clamp(0.0, 1.0);
    Some(prev + (curr - prev) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const G: PitchGeometry = PitchGeometry::STANDARD;

    #[test]
    fn test_goal_orientation() {
        assert_eq!(G.own_goal_x(TeamSide::Home), 0.0);
        assert_eq!(G.target_goal_x(TeamSide::Home), 40.0);
        assert_eq!(G.from_goal(TeamSide::Away, 7.0, 10.0), Vec2::new(33.0, 10.0));
        assert_eq!(G.seven_metre_mark(TeamSide::Home), Vec2::new(7.0, 10.0));
    }

    #[test]
    fn test_goal_area_is_d_shaped() {
        // straight part in front of the posts
        assert!(G.in_goal_area(TeamSide::Home, &Vec2::new(5.9, 10.0)));
        assert!(!G.in_goal_area(TeamSide::Home, &Vec2::new(6.1, 10.0)));
        // quarter circle around the post at y = 8.5
        assert!(G.in_goal_area(TeamSide::Home, &Vec2::new(4.0, 4.6)));
        assert!(!G.in_goal_area(TeamSide::Home, &Vec2::new(4.0, 3.0)));
        assert_eq!(G.goal_area_at(&Vec2::new(37.0, 10.0)), Some(TeamSide::Away));
        assert_eq!(G.goal_area_at(&Vec2::new(20.0, 10.0)), None);
    }

    #[test]
    fn test_goal_mouth() {
        assert!(G.within_goal_mouth(10.0, 1.0));
        assert!(G.within_goal_mouth(11.5, 0.0));
        assert!(!G.within_goal_mouth(11.6, 1.0));
        assert!(!G.within_goal_mouth(10.0, 2.1));
    }

    #[test]
    fn test_plane_crossing_interpolates() {
        let prev = Vec3::new(1.0, 10.0, 1.0);
        let curr = Vec3::new(-1.0, 12.0, 0.6);
        let hit = plane_crossing(&prev, &curr, 0, 0.0).unwrap();
        assert!((hit.y - 11.0).abs() < 1e-5);
        assert!((hit.z - 0.8).abs() < 1e-5);
        assert!(plane_crossing(&prev, &Vec3::new(0.5, 10.0, 1.0), 0, 0.0).is_none());
    }

    #[test]
    fn test_push_out_of_goal_area() {
        let pushed = G.push_out_of_goal_area(TeamSide::Away, &Vec2::new(36.0, 10.0));
        assert!(!G.in_goal_area(TeamSide::Away, &pushed));
        assert!((pushed.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_substitution_point_on_own_half() {
        assert!(G.substitution_point(TeamSide::Home).x < 20.0);
        assert!(G.substitution_point(TeamSide::Away).x > 20.0);
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_inside(x in -100.0f32..100.0, y in -100.0f32..100.0, buf in 0.0f32..2.0) {
            let p = G.clamp_to_court(&Vec2::new(x, y), buf);
            prop_assert!(p.x >= buf && p.x <= G.length - buf);
            prop_assert!(p.y >= buf && p.y <= G.width - buf);
        }

        #[test]
        fn prop_segment_distance_not_above_endpoints(px in 0.0f32..40.0, py in 0.0f32..20.0) {
            let p = Vec2::new(px, py);
            let (a, b) = G.goal_posts(TeamSide::Home);
            let d = distance_to_segment(&p, &a, &b);
            prop_assert!(d <= (p - a).norm() + 1e-4);
            prop_assert!(d <= (p - b).norm() + 1e-4);
        }
    }
}
