use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::PageId;

/// User actions dispatched into a running match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    ChooseArticle { page_id: PageId },
    DoneReading,
    StartGuessing,
    Guess { page_id: PageId },
    NextRound,
    Stop,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ChooseArticle { .. } => ActionKind::ChooseArticle,
            Action::DoneReading => ActionKind::DoneReading,
            Action::StartGuessing => ActionKind::StartGuessing,
            Action::Guess { .. } => ActionKind::Guess,
            Action::NextRound => ActionKind::NextRound,
            Action::Stop => ActionKind::Stop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ChooseArticle,
    DoneReading,
    StartGuessing,
    Guess,
    NextRound,
    Stop,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::ChooseArticle => "choose article",
            ActionKind::DoneReading => "done reading",
            ActionKind::StartGuessing => "start guessing",
            ActionKind::Guess => "guess",
            ActionKind::NextRound => "next round",
            ActionKind::Stop => "stop",
        };
        f.write_str(name)
    }
}
