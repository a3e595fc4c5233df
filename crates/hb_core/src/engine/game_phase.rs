//! Game phase state machine states

use crate::models::TeamSide;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GamePhase {
    #[default]
    PreKickOff,
    KickOff,
    HomeAttack,
    AwayAttack,
    TransitionToHomeAttack,
    TransitionToAwayAttack,
    ContestedBall,
    HomeSetPiece,
    AwaySetPiece,
    HomePenalty,
    AwayPenalty,
    Timeout,
    HalfTime,
    Finished,
}

/// Exclusive category of a phase. Exactly one holds at any tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseCategory {
    Attack,
    Transition,
    Contested,
    DeadBall,
    Break,
    Terminal,
}

impl GamePhase {
    pub fn attack(side: TeamSide) -> Self {
        match side {
            TeamSide::Home => GamePhase::HomeAttack,
            TeamSide::Away => GamePhase::AwayAttack,
        }
    }

    pub fn transition(side: TeamSide) -> Self {
        match side {
            TeamSide::Home => GamePhase::TransitionToHomeAttack,
            TeamSide::Away => GamePhase::TransitionToAwayAttack,
        }
    }

    pub fn set_piece(side: TeamSide) -> Self {
        match side {
            TeamSide::Home => GamePhase::HomeSetPiece,
            TeamSide::Away => GamePhase::AwaySetPiece,
        }
    }

    pub fn penalty(side: TeamSide) -> Self {
        match side {
            TeamSide::Home => GamePhase::HomePenalty,
            TeamSide::Away => GamePhase::AwayPenalty,
        }
    }

    pub fn category(&self) -> PhaseCategory {
        use GamePhase::*;
        match self {
            HomeAttack | AwayAttack => PhaseCategory::Attack,
            TransitionToHomeAttack | TransitionToAwayAttack => PhaseCategory::Transition,
            ContestedBall => PhaseCategory::Contested,
            PreKickOff | KickOff | HomeSetPiece | AwaySetPiece | HomePenalty | AwayPenalty => {
                PhaseCategory::DeadBall
            }
            Timeout | HalfTime => PhaseCategory::Break,
            Finished => PhaseCategory::Terminal,
        }
    }

    /// Side the phase favours, if any.
    pub fn team(&self) -> Option<TeamSide> {
        use GamePhase::*;
        match self {
            HomeAttack | TransitionToHomeAttack | HomeSetPiece | HomePenalty => Some(TeamSide::Home),
            AwayAttack | TransitionToAwayAttack | AwaySetPiece | AwayPenalty => Some(TeamSide::Away),
            _ => None,
        }
    }

    pub fn is_dead_ball(&self) -> bool {
        self.category() == PhaseCategory::DeadBall
    }

    /// Live play: ball may be contested, passed, shot at goal.
    pub fn is_live(&self) -> bool {
        matches!(
            self.category(),
            PhaseCategory::Attack | PhaseCategory::Transition | PhaseCategory::Contested
        )
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self, GamePhase::HomePenalty | GamePhase::AwayPenalty)
    }

    pub fn is_set_piece(&self) -> bool {
        matches!(self, GamePhase::HomeSetPiece | GamePhase::AwaySetPiece)
    }

    /// Phases entered with a one-shot setup routine.
    pub fn needs_setup(&self) -> bool {
        use GamePhase::*;
        matches!(
            self,
            PreKickOff | HomeSetPiece | AwaySetPiece | HomePenalty | AwayPenalty | HalfTime | Timeout
        )
    }

    /// The match clock stands still in these phases.
    pub fn clock_paused(&self) -> bool {
        matches!(self, GamePhase::Timeout | GamePhase::HalfTime | GamePhase::Finished)
    }

    pub fn is_finished(&self) -> bool {
        *self == GamePhase::Finished
    }
}
