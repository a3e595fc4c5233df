//! Ball state

use super::types::{PlayerId, Vec2, Vec3};
use crate::models::TeamSide;
use serde::{Deserialize, Serialize};

/// Exactly one of held / in flight / rolling / resting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallMotion {
    Held(PlayerId),
    InFlight,
    Rolling,
    Resting,
}

/// Why the ball is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightKind {
    Pass,
    Shot,
    /// Deflection, dislodged ball, bad pass
    Loose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimBall {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Angular velocity (rad/s)
    pub spin: Vec3,
    pub motion: BallMotion,
    pub flight: FlightKind,

    pub last_touch: Option<PlayerId>,
    pub last_touch_side: Option<TeamSide>,
    pub last_passer: Option<PlayerId>,
    pub last_shooter: Option<PlayerId>,
    pub last_shooter_side: Option<TeamSide>,
    /// Intended receiver of the current pass
    pub pass_target: Option<PlayerId>,
    /// Where the current flight started
    pub flight_origin: Vec3,
    /// Aim point of the current pass/shot
    pub flight_target: Vec3,
    pub flight_time: f32,
    /// Current shot is a seven-metre throw
    pub is_penalty_shot: bool,
    /// Players who already tried to intercept/block/save this flight
    pub contested_by: Vec<PlayerId>,
}

impl SimBall {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            spin: Vec3::zeros(),
            motion: BallMotion::Resting,
            flight: FlightKind::Loose,
            last_touch: None,
            last_touch_side: None,
            last_passer: None,
            last_shooter: None,
            last_shooter_side: None,
            pass_target: None,
            flight_origin: position,
            flight_target: position,
            flight_time: 0.0,
            is_penalty_shot: false,
            contested_by: Vec::new(),
        }
    }

    pub fn holder(&self) -> Option<PlayerId> {
        match self.motion {
            BallMotion::Held(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_held(&self) -> bool {
        self.holder().is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.motion == BallMotion::InFlight
    }

    pub fn is_rolling(&self) -> bool {
        self.motion == BallMotion::Rolling
    }

    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Position one step ago, reconstructed from the current velocity.
    pub fn previous_position(&self, dt: f32) -> Vec3 {
        self.position - self.velocity * dt
    }

    /// Progress along the current flight, 0 at release and 1 at the aim point.
    pub fn flight_progress(&self) -> f32 {
        let total = (self.flight_target - self.flight_origin).xy().norm();
        if total < 1e-3 {
            return 1.0;
        }
        ((self.position - self.flight_origin).xy().norm() / total).clamp(0.0, 1.0)
    }

    pub fn touch(&mut self, by: PlayerId, side: TeamSide) {
        self.last_touch = Some(by);
        self.last_touch_side = Some(side);
    }

    /// Give the ball to `holder`; clears all flight bookkeeping.
    pub fn attach(&mut self, holder: PlayerId, side: TeamSide) {
        self.motion = BallMotion::Held(holder);
        self.velocity = Vec3::zeros();
        self.spin = Vec3::zeros();
        self.flight = FlightKind::Loose;
        self.pass_target = None;
        self.last_shooter = None;
        self.last_shooter_side = None;
        self.flight_time = 0.0;
        self.is_penalty_shot = false;
        self.contested_by.clear();
        self.touch(holder, side);
    }

    /// Release into free flight.
    pub fn launch(&mut self, from: Vec3, velocity: Vec3, spin: Vec3, kind: FlightKind, target: Vec3) {
        self.motion = BallMotion::InFlight;
        self.position = from;
        self.velocity = velocity;
        self.spin = spin;
        self.flight = kind;
        self.flight_origin = from;
        self.flight_target = target;
        self.flight_time = 0.0;
        self.contested_by.clear();
        if kind != FlightKind::Pass {
            self.pass_target = None;
        }
    }

    /// Dead ball at `pos` on the floor, nobody holding it.
    pub fn place(&mut self, pos: Vec2) {
        self.motion = BallMotion::Resting;
        self.position = Vec3::new(pos.x, pos.y, 0.0);
        self.velocity = Vec3::zeros();
        self.spin = Vec3::zeros();
        self.flight = FlightKind::Loose;
        self.pass_target = None;
        self.last_shooter = None;
        self.last_shooter_side = None;
        self.flight_time = 0.0;
        self.is_penalty_shot = false;
        self.contested_by.clear();
    }

    pub fn has_contested(&self, id: PlayerId) -> bool {
        self.contested_by.contains(&id)
    }
}
