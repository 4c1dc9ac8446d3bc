use thiserror::Error;

use crate::sequencer::Phase;

#[derive(Debug, Error)]
pub enum FxError {
    #[error("config is not valid JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("browser call failed: {0}")]
    Dom(String),

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// Why the stage sequencer refused to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("a stage transition is already running")]
    Busy,

    #[error("cannot {action} while in phase {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("the journey already reached the success stage")]
    Finished,

    #[error("stage transition was cancelled")]
    Cancelled,
}

pub type Result<T, E = FxError> = std::result::Result<T, E>;
