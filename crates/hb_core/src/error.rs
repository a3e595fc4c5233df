use thiserror::Error;

/// Errors that prevent a match from being built or its inputs from being read.
///
/// These are fatal at construction time: the caller has to fix the inputs.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Team {0} has no players")]
    EmptyRoster(String),

    #[error("Invalid lineup size for {team}: expected {expected}, found {found}")]
    InvalidLineupSize { team: String, expected: usize, found: usize },

    #[error("Team {team} lineup must contain exactly one goalkeeper, found {found}")]
    GoalkeeperCount { team: String, found: usize },

    #[error("Unknown player id {player_id} in {team} lineup")]
    UnknownPlayer { team: String, player_id: u32 },

    #[error("Duplicate player id {player_id} in {team}")]
    DuplicatePlayer { team: String, player_id: u32 },

    #[error("Invalid attributes for player {player}: {reason}")]
    InvalidAttributes { player: String, reason: String },

    #[error("Home and away sides reference the same team id {0}")]
    SameTeam(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MatchError {
    /// Validation failures come from the rosters themselves; everything else is
    /// a transport or configuration problem.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MatchError::EmptyRoster(_)
                | MatchError::InvalidLineupSize { .. }
                | MatchError::GoalkeeperCount { .. }
                | MatchError::UnknownPlayer { .. }
                | MatchError::DuplicatePlayer { .. }
                | MatchError::InvalidAttributes { .. }
                | MatchError::SameTeam(_)
        )
    }
}

/// Errors raised inside a simulation step.
///
/// The simulator logs them with the stage name and simulated time, then forces the
/// match to `Finished` and hands the accumulated state to the finalizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("[{stage} @ {time:.1}s] invalid state: {reason}")]
    InvalidState { stage: &'static str, time: f32, reason: String },

    #[error("[{stage} @ {time:.1}s] step panicked: {message}")]
    Panicked { stage: &'static str, time: f32, message: String },
}

impl SimulationError {
    pub fn invalid_state(stage: &'static str, time: f32, reason: impl Into<String>) -> Self {
        SimulationError::InvalidState { stage, time, reason: reason.into() }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            SimulationError::InvalidState { stage, .. } | SimulationError::Panicked { stage, .. } => {
                stage
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
