//! Candidate fetches tagged with the session generation that requested them.

use std::sync::Arc;

use shared::{
    domain::{Article, InvalidationToken},
    error::SetupError,
};
use tokio::task::JoinHandle;
use tracing::debug;
use wiki_integration::{DocumentQuery, DocumentSource};

/// Identifies the round a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub token: InvalidationToken,
    pub round: u32,
}

pub type FetchResult = Result<Vec<Article>, SetupError>;

/// Articles offered to the liar each round.
pub const CANDIDATE_COUNT: usize = 2;

pub fn candidate_query(
    ticket: FetchTicket,
    language: &str,
    min_content_length: u64,
) -> DocumentQuery {
    DocumentQuery {
        min_content_length,
        count: CANDIDATE_COUNT,
        language: language.to_string(),
        invalidation_token: ticket.token,
    }
}

/// An in-flight candidate fetch. Dropping it aborts the request.
pub struct PendingFetch {
    ticket: FetchTicket,
    handle: Option<JoinHandle<FetchResult>>,
}

impl PendingFetch {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(token = self.ticket.token.0, "fetch: cancelled");
            handle.abort();
        }
    }

    pub async fn wait(mut self) -> (FetchTicket, FetchResult) {
        let ticket = self.ticket;
        let Some(handle) = self.handle.take() else {
            return (ticket, Err(SetupError::Fetch("fetch already cancelled".into())));
        };
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => Err(SetupError::Fetch(format!("fetch task failed: {err}"))),
        };
        (ticket, result)
    }
}

impl Drop for PendingFetch {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub fn spawn_candidate_fetch(
    source: Arc<dyn DocumentSource>,
    query: DocumentQuery,
    ticket: FetchTicket,
) -> PendingFetch {
    debug!(
        token = ticket.token.0,
        round = ticket.round,
        "fetch: spawning candidate request"
    );
    let handle = tokio::spawn(async move {
        source
            .random_candidates(&query)
            .await
            .map_err(SetupError::from)
    });
    PendingFetch {
        ticket,
        handle: Some(handle),
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
