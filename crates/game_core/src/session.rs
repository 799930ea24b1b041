//! Match orchestration across rounds: role swapping, carried scores and the
//! invalidation of candidate fetches that belong to an older round.

use shared::{
    domain::{InvalidationToken, PlayerId, Stage},
    error::{ErrorCode, SetupError, TransitionError},
    protocol::Action,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    fetch::{FetchResult, FetchTicket},
    round::{CandidateSet, Points, RoundAction, RoundEngine, RoundOutcome, RoundState},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("player names must not be empty")]
    EmptyPlayerName,
    #[error("Players can't have the same name ({0})")]
    DuplicatePlayers(PlayerId),
    #[error("no match is running")]
    NoActiveMatch,
    #[error("the current round has not started yet")]
    RoundNotReady,
    #[error("the current round has no failed setup to retry")]
    NothingToRetry,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("round setup failed: {0}")]
    Setup(#[from] SetupError),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::EmptyPlayerName => ErrorCode::Validation,
            SessionError::DuplicatePlayers(_) => ErrorCode::DuplicateName,
            SessionError::NoActiveMatch
            | SessionError::RoundNotReady
            | SessionError::NothingToRetry => ErrorCode::NotReady,
            SessionError::Transition(err) => err.code(),
            SessionError::Setup(err) => err.code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingCandidates,
    Playing,
    SetupFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    RoundStarted { round: u32 },
    /// The result belonged to a round or match that is no longer current.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Advanced(Stage),
    AwaitingCandidates(FetchTicket),
    Stopped,
}

enum RoundSlot {
    Awaiting {
        state: RoundState,
        ticket: FetchTicket,
    },
    Playing(RoundEngine),
    SetupFailed {
        state: RoundState,
        error: SetupError,
    },
}

struct ActiveMatch {
    players: [PlayerId; 2],
    round: u32,
    rounds_completed: u32,
    slot: RoundSlot,
}

pub struct SessionController {
    generation: InvalidationToken,
    active: Option<ActiveMatch>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            generation: InvalidationToken(0),
            active: None,
        }
    }

    /// Starts a fresh match; `player_one` reads first.
    ///
    /// Any running match is replaced and its pending fetch invalidated.
    pub fn start(
        &mut self,
        player_one: &str,
        player_two: &str,
    ) -> Result<FetchTicket, SessionError> {
        let player_one = player_one.trim();
        let player_two = player_two.trim();
        if player_one.is_empty() || player_two.is_empty() {
            return Err(SessionError::EmptyPlayerName);
        }
        if player_one == player_two {
            return Err(SessionError::DuplicatePlayers(PlayerId::new(player_one)));
        }

        let liar = PlayerId::new(player_one);
        let investigator = PlayerId::new(player_two);
        let points = Points::new([&liar, &investigator]);
        let state = RoundState::init(liar.clone(), investigator.clone(), points);

        self.generation = self.generation.next();
        let ticket = FetchTicket {
            token: self.generation,
            round: 1,
        };
        info!(%liar, %investigator, token = ticket.token.0, "session: match started");
        self.active = Some(ActiveMatch {
            players: [liar, investigator],
            round: 1,
            rounds_completed: 0,
            slot: RoundSlot::Awaiting { state, ticket },
        });
        Ok(ticket)
    }

    /// Applies a fetch result if `ticket` still belongs to the current round.
    pub fn deliver_candidates(
        &mut self,
        ticket: FetchTicket,
        result: FetchResult,
    ) -> Result<Delivery, SessionError> {
        let Some(active) = self.active.as_mut() else {
            warn!(token = ticket.token.0, "fetch: discarding result, no match running");
            return Ok(Delivery::Discarded);
        };
        let state = match &active.slot {
            RoundSlot::Awaiting {
                state,
                ticket: expected,
            } if *expected == ticket && ticket.token == self.generation => state.clone(),
            _ => {
                warn!(
                    token = ticket.token.0,
                    current = self.generation.0,
                    "fetch: discarding stale result"
                );
                return Ok(Delivery::Discarded);
            }
        };

        let candidates = match result.and_then(CandidateSet::from_articles) {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(round = active.round, %error, "session: round setup failed");
                active.slot = RoundSlot::SetupFailed {
                    state,
                    error: error.clone(),
                };
                return Err(SessionError::Setup(error));
            }
        };

        let engine = RoundEngine::new(state, candidates)?;
        info!(
            round = active.round,
            liar = %engine.state().liar,
            investigator = %engine.state().investigator,
            "session: round started"
        );
        active.slot = RoundSlot::Playing(engine);
        Ok(Delivery::RoundStarted {
            round: active.round,
        })
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Dispatched, SessionError> {
        debug!(action = %action.kind(), "session: dispatch");
        let Ok(round_action) = RoundAction::try_from(action) else {
            self.stop();
            return Ok(Dispatched::Stopped);
        };

        let active = self.active.as_mut().ok_or(SessionError::NoActiveMatch)?;
        let RoundSlot::Playing(engine) = &mut active.slot else {
            return Err(SessionError::RoundNotReady);
        };

        match engine.dispatch(round_action)? {
            RoundOutcome::Advanced(stage) => {
                if stage == Stage::Recap {
                    active.rounds_completed += 1;
                }
                Ok(Dispatched::Advanced(stage))
            }
            RoundOutcome::NextRound(state) => {
                self.generation = self.generation.next();
                active.round += 1;
                let ticket = FetchTicket {
                    token: self.generation,
                    round: active.round,
                };
                info!(
                    round = active.round,
                    liar = %state.liar,
                    investigator = %state.investigator,
                    "session: roles swapped for next round"
                );
                active.slot = RoundSlot::Awaiting { state, ticket };
                Ok(Dispatched::AwaitingCandidates(ticket))
            }
        }
    }

    /// Issues a fresh ticket for a round whose setup failed.
    pub fn retry_setup(&mut self) -> Result<FetchTicket, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveMatch)?;
        let RoundSlot::SetupFailed { state, .. } = &active.slot else {
            return Err(SessionError::NothingToRetry);
        };
        let state = state.clone();

        self.generation = self.generation.next();
        let ticket = FetchTicket {
            token: self.generation,
            round: active.round,
        };
        active.slot = RoundSlot::Awaiting { state, ticket };
        Ok(ticket)
    }

    /// Ends the match from any stage. Pending fetches become stale.
    pub fn stop(&mut self) {
        self.generation = self.generation.next();
        if let Some(active) = self.active.take() {
            info!(rounds = active.rounds_completed, "session: match stopped");
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.active.as_ref().map(|active| &active.slot) {
            None => SessionPhase::Idle,
            Some(RoundSlot::Awaiting { .. }) => SessionPhase::AwaitingCandidates,
            Some(RoundSlot::Playing(_)) => SessionPhase::Playing,
            Some(RoundSlot::SetupFailed { .. }) => SessionPhase::SetupFailed,
        }
    }

    pub fn engine(&self) -> Option<&RoundEngine> {
        match &self.active.as_ref()?.slot {
            RoundSlot::Playing(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn round_state(&self) -> Option<&RoundState> {
        match &self.active.as_ref()?.slot {
            RoundSlot::Awaiting { state, .. } | RoundSlot::SetupFailed { state, .. } => Some(state),
            RoundSlot::Playing(engine) => Some(engine.state()),
        }
    }

    pub fn pending_ticket(&self) -> Option<FetchTicket> {
        match &self.active.as_ref()?.slot {
            RoundSlot::Awaiting { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    pub fn setup_error(&self) -> Option<&SetupError> {
        match &self.active.as_ref()?.slot {
            RoundSlot::SetupFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn players(&self) -> Option<&[PlayerId; 2]> {
        self.active.as_ref().map(|active| &active.players)
    }

    pub fn round_number(&self) -> Option<u32> {
        self.active.as_ref().map(|active| active.round)
    }

    pub fn rounds_completed(&self) -> u32 {
        self.active
            .as_ref()
            .map_or(0, |active| active.rounds_completed)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
