use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{PageId, PlayerId, Stage},
    protocol::ActionKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidTransition,
    InvalidPayload,
    Setup,
    DuplicateName,
    Validation,
    NotReady,
}

/// Rejected round action. State is never touched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("invalid transition: '{action}' is not allowed while {stage}")]
    InvalidTransition { stage: Stage, action: ActionKind },
    #[error("invalid transition: page {page_id} is not a candidate of this round (stage {stage})")]
    UnknownCandidate { stage: Stage, page_id: PageId },
    #[error("{player} can't be both liar and investigator")]
    SamePlayer { player: PlayerId },
}

impl TransitionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TransitionError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            TransitionError::UnknownCandidate { .. } => ErrorCode::InvalidPayload,
            TransitionError::SamePlayer { .. } => ErrorCode::DuplicateName,
        }
    }
}

/// A round could not be set up from the document source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("not enough usable articles: need 2, got {usable}")]
    NotEnoughCandidates { usable: usize },
    #[error("failed to fetch articles: {0}")]
    Fetch(String),
    #[error("data doesn't fit expected format: {0}")]
    UnexpectedShape(String),
}

impl SetupError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Setup
    }
}
