//! Runtime player state for one match

use super::types::{PlayerId, Vec2};
use crate::models::{PlayerAttributes, PlayerData, PlayerPosition, TeamSide};
use serde::{Deserialize, Serialize};

/// What a player is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayerAction {
    #[default]
    Idle,
    MovingToPosition,
    /// Ball carrier reading the play
    HoldingBall,
    /// Taker waiting to release a throw-off / free throw / throw-in / goal throw
    TakingRestart,
    PreparingPass,
    PreparingShot,
    AttemptingTackle,
    AttemptingIntercept,
    ChasingBall,
    Suspended,
}

impl PlayerAction {
    /// Actions that resolve through the action resolver when the timer runs out.
    pub fn is_prepared(&self) -> bool {
        matches!(
            self,
            PlayerAction::PreparingPass | PlayerAction::PreparingShot | PlayerAction::AttemptingTackle
        )
    }

    /// Prepared actions root the player in place.
    pub fn is_rooted(&self) -> bool {
        matches!(self, PlayerAction::PreparingShot | PlayerAction::Suspended)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimPlayer {
    pub id: PlayerId,
    pub side: TeamSide,
    pub data: PlayerData,
    /// Tactical slot 0..6 for field players (LW..RW), `None` for goalkeepers
    pub slot: Option<usize>,

    pub position: Vec2,
    pub velocity: Vec2,
    /// Unit facing direction
    pub facing: Vec2,

    /// 0..1
    pub stamina: f32,
    /// Top speed at the current stamina (m/s)
    pub effective_speed: f32,
    pub is_sprinting: bool,

    pub action: PlayerAction,
    /// Countdown until a prepared action resolves (s)
    pub action_timer: f32,
    pub target_position: Vec2,
    pub target_player: Option<PlayerId>,

    pub is_on_court: bool,
    /// Remaining suspension (s); 0 when not suspended
    pub suspension_timer: f32,
    pub suspensions: u8,
    pub disqualified: bool,

    /// Time the player has held the ball (s)
    pub hold_time: f32,
    /// Time until the player may attempt another tackle (s)
    pub tackle_cooldown: f32,
}

impl SimPlayer {
    pub fn new(id: PlayerId, side: TeamSide, data: PlayerData, slot: Option<usize>) -> Self {
        let facing = match side {
            TeamSide::Home => Vec2::new(1.0, 0.0),
            TeamSide::Away => Vec2::new(-1.0, 0.0),
        };
        Self {
            id,
            side,
            data,
            slot,
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            facing,
            stamina: 1.0,
            effective_speed: 0.0,
            is_sprinting: false,
            action: PlayerAction::Idle,
            action_timer: 0.0,
            target_position: Vec2::zeros(),
            target_player: None,
            is_on_court: false,
            suspension_timer: 0.0,
            suspensions: 0,
            disqualified: false,
            hold_time: 0.0,
            tackle_cooldown: 0.0,
        }
    }

    #[inline]
    pub fn attrs(&self) -> &PlayerAttributes {
        &self.data.attributes
    }

    #[inline]
    pub fn position_role(&self) -> PlayerPosition {
        self.data.position
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.data.is_goalkeeper()
    }

    pub fn is_suspended(&self) -> bool {
        self.action == PlayerAction::Suspended
    }

    /// On court and able to take part in play.
    pub fn is_active(&self) -> bool {
        self.is_on_court && !self.is_suspended()
    }

    /// Start a prepared action that resolves after `secs`.
    pub fn begin_action(&mut self, action: PlayerAction, secs: f32) {
        self.action = action;
        self.action_timer = secs.max(0.0);
    }

    /// Back to idle; keeps suspension bookkeeping untouched.
    pub fn reset_action(&mut self) {
        if self.is_suspended() {
            return;
        }
        self.action = PlayerAction::Idle;
        self.action_timer = 0.0;
        self.target_player = None;
    }

    /// Take the player off court for `secs` and park them at `wait_point`.
    pub fn suspend(&mut self, secs: f32, wait_point: Vec2) {
        self.action = PlayerAction::Suspended;
        self.action_timer = 0.0;
        self.target_player = None;
        self.suspension_timer = secs;
        self.is_on_court = false;
        self.velocity = Vec2::zeros();
        self.is_sprinting = false;
        self.hold_time = 0.0;
        self.position = wait_point;
        self.target_position = wait_point;
    }

    /// Back on court at `entry_point`, idle.
    pub fn reenter(&mut self, entry_point: Vec2) {
        self.action = PlayerAction::Idle;
        self.action_timer = 0.0;
        self.suspension_timer = 0.0;
        self.is_on_court = true;
        self.velocity = Vec2::zeros();
        self.position = entry_point;
        self.target_position = entry_point;
    }

    /// Place at `pos` with zero velocity, keeping the current action.
    pub fn teleport(&mut self, pos: Vec2) {
        self.position = pos;
        self.target_position = pos;
        self.velocity = Vec2::zeros();
        self.is_sprinting = false;
    }
}
