//! Round lifecycle: stage progression, the liar's chosen article, guess
//! evaluation and point accounting.
//!
//! [`transition`] is a pure reducer over `(stage, action)`. [`RoundEngine`]
//! wraps it and only replaces its state when a transition succeeds.

use im::OrdMap;
use shared::{
    domain::{Article, PageId, PlayerId, Stage},
    error::{SetupError, TransitionError},
    protocol::{Action, ActionKind},
};
use tracing::{debug, info};

/// Cumulative scores, copied on write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Points(OrdMap<PlayerId, u32>);

impl Points {
    pub fn new<'a>(players: impl IntoIterator<Item = &'a PlayerId>) -> Self {
        Self(players.into_iter().map(|p| (p.clone(), 0u32)).collect())
    }

    pub fn get(&self, player: &PlayerId) -> u32 {
        self.0.get(player).copied().unwrap_or(0)
    }

    /// Returns a new tally with one point added for `player`.
    #[must_use]
    pub fn award(&self, player: &PlayerId) -> Self {
        let mut next = self.0.clone();
        next.insert(player.clone(), self.get(player) + 1);
        Self(next)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }
}

/// The two articles offered in one round. Page ids are distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet([Article; 2]);

impl CandidateSet {
    /// Keeps the first two articles with distinct page ids.
    pub fn from_articles(articles: Vec<Article>) -> Result<Self, SetupError> {
        let mut usable: Vec<Article> = Vec::with_capacity(2);
        for article in articles {
            if usable.len() == 2 {
                break;
            }
            if usable.iter().all(|kept| kept.page_id != article.page_id) {
                usable.push(article);
            }
        }

        let count = usable.len();
        let pair: [Article; 2] = usable
            .try_into()
            .map_err(|_| SetupError::NotEnoughCandidates { usable: count })?;
        Ok(Self(pair))
    }

    pub fn find(&self, page_id: PageId) -> Option<&Article> {
        self.0.iter().find(|article| article.page_id == page_id)
    }

    pub fn articles(&self) -> &[Article; 2] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub liar: PlayerId,
    pub investigator: PlayerId,
    pub points: Points,
    pub stage: Stage,
    pub chosen_article: Option<Article>,
    pub guess_correct: bool,
}

impl RoundState {
    pub fn init(liar: PlayerId, investigator: PlayerId, points: Points) -> Self {
        Self {
            liar,
            investigator,
            points,
            stage: Stage::Choosing,
            chosen_article: None,
            guess_correct: false,
        }
    }

    /// The player who scored this round, once it has reached recap.
    pub fn winner(&self) -> Option<&PlayerId> {
        if self.stage != Stage::Recap {
            return None;
        }
        Some(if self.guess_correct {
            &self.investigator
        } else {
            &self.liar
        })
    }
}

/// Round-level actions; `stop` belongs to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAction {
    ChooseArticle { page_id: PageId },
    DoneReading,
    StartGuessing,
    Guess { page_id: PageId },
    NextRound,
}

impl RoundAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            RoundAction::ChooseArticle { .. } => ActionKind::ChooseArticle,
            RoundAction::DoneReading => ActionKind::DoneReading,
            RoundAction::StartGuessing => ActionKind::StartGuessing,
            RoundAction::Guess { .. } => ActionKind::Guess,
            RoundAction::NextRound => ActionKind::NextRound,
        }
    }
}

impl TryFrom<Action> for RoundAction {
    type Error = ActionKind;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        match action {
            Action::ChooseArticle { page_id } => Ok(RoundAction::ChooseArticle { page_id }),
            Action::DoneReading => Ok(RoundAction::DoneReading),
            Action::StartGuessing => Ok(RoundAction::StartGuessing),
            Action::Guess { page_id } => Ok(RoundAction::Guess { page_id }),
            Action::NextRound => Ok(RoundAction::NextRound),
            Action::Stop => Err(ActionKind::Stop),
        }
    }
}

pub fn transition(
    state: &RoundState,
    candidates: &CandidateSet,
    action: &RoundAction,
) -> Result<RoundState, TransitionError> {
    let candidate = |page_id: PageId| {
        candidates
            .find(page_id)
            .ok_or(TransitionError::UnknownCandidate {
                stage: state.stage,
                page_id,
            })
    };

    match (state.stage, action) {
        (Stage::Choosing, RoundAction::ChooseArticle { page_id }) => {
            let article = candidate(*page_id)?;
            Ok(RoundState {
                chosen_article: Some(article.clone()),
                stage: Stage::Reading,
                ..state.clone()
            })
        }
        (Stage::Reading, RoundAction::DoneReading) => Ok(RoundState {
            stage: Stage::Preguessing,
            ..state.clone()
        }),
        (Stage::Preguessing, RoundAction::StartGuessing) => Ok(RoundState {
            stage: Stage::Guessing,
            ..state.clone()
        }),
        (Stage::Guessing, RoundAction::Guess { page_id }) => {
            let guessed = candidate(*page_id)?;
            let guess_correct = state
                .chosen_article
                .as_ref()
                .is_some_and(|chosen| chosen.page_id == guessed.page_id);
            let scorer = if guess_correct {
                &state.investigator
            } else {
                &state.liar
            };
            Ok(RoundState {
                points: state.points.award(scorer),
                stage: Stage::Recap,
                guess_correct,
                ..state.clone()
            })
        }
        (Stage::Recap, RoundAction::NextRound) => Ok(RoundState::init(
            state.investigator.clone(),
            state.liar.clone(),
            state.points.clone(),
        )),
        (stage, action) => Err(TransitionError::InvalidTransition {
            stage,
            action: action.kind(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Advanced(Stage),
    /// The round is over; the returned state seeds the next one.
    NextRound(RoundState),
}

#[derive(Debug, Clone)]
pub struct RoundEngine {
    state: RoundState,
    candidates: CandidateSet,
}

impl RoundEngine {
    /// Starts a round. `state` must be freshly initialised (stage `choosing`)
    /// and seat two different players.
    pub fn new(state: RoundState, candidates: CandidateSet) -> Result<Self, TransitionError> {
        if state.liar == state.investigator {
            return Err(TransitionError::SamePlayer {
                player: state.liar.clone(),
            });
        }
        if state.stage != Stage::Choosing {
            return Err(TransitionError::InvalidTransition {
                stage: state.stage,
                action: ActionKind::NextRound,
            });
        }
        Ok(Self { state, candidates })
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn dispatch(&mut self, action: RoundAction) -> Result<RoundOutcome, TransitionError> {
        debug!(stage = %self.state.stage, action = %action.kind(), "round: dispatch");
        let next = transition(&self.state, &self.candidates, &action)?;

        if let RoundAction::NextRound = action {
            return Ok(RoundOutcome::NextRound(next));
        }

        if next.stage == Stage::Recap {
            info!(
                liar = %next.liar,
                investigator = %next.investigator,
                guess_correct = next.guess_correct,
                "round: resolved"
            );
        }
        self.state = next;
        Ok(RoundOutcome::Advanced(self.state.stage))
    }
}

#[cfg(test)]
#[path = "tests/round_tests.rs"]
mod tests;
