pub mod fetch;
pub mod round;
pub mod session;

pub use fetch::{candidate_query, spawn_candidate_fetch, FetchTicket, PendingFetch, CANDIDATE_COUNT};
pub use round::{
    transition, CandidateSet, Points, RoundAction, RoundEngine, RoundOutcome, RoundState,
};
pub use session::{Delivery, Dispatched, SessionController, SessionError, SessionPhase};
