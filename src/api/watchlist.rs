//! The priority-ordered watchlist.
//!
//! The server owns the order. Every mutation is a two-step sequence: send the
//! mutation, then re-fetch the whole list and install it wholesale. Nothing is
//! patched locally, so the displayed list is always a snapshot the server
//! actually produced. A failed mutation skips the re-fetch and leaves the last
//! good snapshot in place.
use thiserror::Error;

use super::error::ApiError;
use super::gateway::Gateway;
use super::sequence::{Sequencer, Ticket};
use super::types::{MessageResponse, MovieTitle, WatchlistEntry};
use crate::config::Consistency;

const WATCHLIST_PATH: &str = "api/watchlist";

pub const FETCH_FALLBACK: &str = "Could not fetch watchlist";
pub const ADD_FALLBACK: &str = "Failed to add to watchlist";
const REMOVE_FALLBACK: &str = "Failed to remove movie";
const MOVE_UP_FALLBACK: &str = "Failed to move movie up";
const MOVE_DOWN_FALLBACK: &str = "Failed to move movie down";

/// One user action against the watchlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistOp {
    Fetch,
    Add(String),
    Remove(String),
    MoveUp(String),
    MoveDown(String),
}

impl WatchlistOp {
    /// Endpoint of the mutation, `None` for a plain fetch.
    fn mutation_path(&self) -> Option<&'static str> {
        match self {
            WatchlistOp::Fetch => None,
            WatchlistOp::Add(_) => Some("api/watchlist/add"),
            WatchlistOp::Remove(_) => Some("api/watchlist/remove"),
            WatchlistOp::MoveUp(_) => Some("api/watchlist/move-up"),
            WatchlistOp::MoveDown(_) => Some("api/watchlist/move-down"),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            WatchlistOp::Fetch => None,
            WatchlistOp::Add(t)
            | WatchlistOp::Remove(t)
            | WatchlistOp::MoveUp(t)
            | WatchlistOp::MoveDown(t) => Some(t),
        }
    }

    /// Message shown when the mutation fails without a server message.
    pub fn fallback(&self) -> &'static str {
        match self {
            WatchlistOp::Fetch => FETCH_FALLBACK,
            WatchlistOp::Add(_) => ADD_FALLBACK,
            WatchlistOp::Remove(_) => REMOVE_FALLBACK,
            WatchlistOp::MoveUp(_) => MOVE_UP_FALLBACK,
            WatchlistOp::MoveDown(_) => MOVE_DOWN_FALLBACK,
        }
    }
}

/// Which half of a mutate-then-refresh sequence failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("watchlist mutation failed: {0}")]
    Mutation(#[source] ApiError),

    #[error("watchlist refresh failed: {0}")]
    Refresh(#[source] ApiError),
}

impl SyncError {
    pub fn api_error(&self) -> &ApiError {
        match self {
            SyncError::Mutation(e) | SyncError::Refresh(e) => e,
        }
    }

    /// Text for the error banner. A failed refresh always reads as a failed fetch.
    pub fn user_message(&self, op: &WatchlistOp) -> String {
        match self {
            SyncError::Mutation(e) => e.user_message(op.fallback()),
            SyncError::Refresh(e) => e.user_message(FETCH_FALLBACK),
        }
    }
}

/// Network side of the watchlist.
#[derive(Clone)]
pub struct WatchlistRemote {
    gateway: Gateway,
}

impl WatchlistRemote {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /api/watchlist`, in server order.
    pub async fn fetch(&self) -> Result<Vec<WatchlistEntry>, ApiError> {
        self.gateway.tokens().require()?;
        let entries: Vec<WatchlistEntry> = self.gateway.get(WATCHLIST_PATH, &[]).await?;
        tracing::debug!(count = entries.len(), "Watchlist fetched");
        Ok(entries)
    }

    /// Send the mutation for `op`. Returns the server's acknowledgement text.
    /// A fetch has nothing to send.
    pub async fn mutate(&self, op: &WatchlistOp) -> Result<Option<String>, ApiError> {
        let (Some(path), Some(title)) = (op.mutation_path(), op.title()) else {
            return Ok(None);
        };
        self.gateway.tokens().require()?;

        let body: Option<MessageResponse> = self
            .gateway
            .post(path, &MovieTitle { movie_title: title })
            .await?;
        tracing::debug!(op = ?op, "Watchlist mutation accepted");
        Ok(body.and_then(|b| b.message))
    }

    /// Run `op` end to end: mutation (if any), then an unconditional re-fetch.
    pub async fn run(&self, op: &WatchlistOp) -> Result<Vec<WatchlistEntry>, SyncError> {
        self.run_observed(op, || {}).await
    }

    /// Like [`run`](Self::run), calling `on_refreshing` between a successful
    /// mutation and the re-fetch.
    pub async fn run_observed(
        &self,
        op: &WatchlistOp,
        on_refreshing: impl FnOnce(),
    ) -> Result<Vec<WatchlistEntry>, SyncError> {
        if op.mutation_path().is_some() {
            self.mutate(op).await.map_err(SyncError::Mutation)?;
            on_refreshing();
        }
        self.fetch().await.map_err(SyncError::Refresh)
    }
}

/// Lifecycle of the most recent watchlist activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Refreshing,
    Failed,
}

/// What [`WatchlistController::apply`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The snapshot replaced the displayed list.
    Applied,
    /// The operation failed; the displayed list is unchanged.
    Failed(String),
    /// A later operation's result was already displayed.
    Discarded,
}

/// Displayed watchlist state. Holds no network handle.
#[derive(Debug, Clone)]
pub struct WatchlistController {
    entries: Vec<WatchlistEntry>,
    error: Option<String>,
    phase: Phase,
    in_flight: usize,
    pending_ops: Vec<(Ticket, WatchlistOp)>,
    sequencer: Sequencer,
}

impl WatchlistController {
    pub fn new(policy: Consistency) -> Self {
        Self {
            entries: Vec::new(),
            error: None,
            phase: Phase::Idle,
            in_flight: 0,
            pending_ops: Vec::new(),
            sequencer: Sequencer::new(policy),
        }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn policy(&self) -> Consistency {
        self.sequencer.policy()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Register a new operation. Concurrent operations are allowed to race.
    pub fn begin(&mut self, op: &WatchlistOp) -> Ticket {
        let ticket = self.sequencer.issue();
        self.in_flight += 1;
        self.pending_ops.push((ticket, op.clone()));
        self.phase = Phase::Pending;
        tracing::trace!(seq = ticket.seq(), op = ?op, "Watchlist operation issued");
        ticket
    }

    /// The mutation for `ticket` succeeded and its re-fetch is under way.
    pub fn mark_refreshing(&mut self, ticket: Ticket) {
        if self.pending_ops.last().is_some_and(|(t, _)| *t == ticket) {
            self.phase = Phase::Refreshing;
        }
    }

    /// Install the result of the operation behind `ticket`.
    ///
    /// A ticket that is no longer pending (abandoned, or issued before a
    /// `reset`) is discarded without touching any state. Failures bypass the
    /// consistency policy: the user's own action failed, so the banner shows
    /// even when a later-issued snapshot is already displayed. The snapshot
    /// itself is never touched by a failure.
    pub fn apply(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<WatchlistEntry>, SyncError>,
    ) -> ApplyOutcome {
        let Some(idx) = self.pending_ops.iter().position(|(t, _)| *t == ticket) else {
            tracing::debug!(seq = ticket.seq(), "Ignoring result for unknown watchlist ticket");
            return ApplyOutcome::Discarded;
        };
        let (_, op) = self.pending_ops.remove(idx);
        self.in_flight = self.in_flight.saturating_sub(1);

        let outcome = match result {
            Ok(entries) => {
                if self.sequencer.admit(ticket) {
                    self.entries = entries;
                    self.error = None;
                    ApplyOutcome::Applied
                } else {
                    tracing::debug!(seq = ticket.seq(), "Discarding superseded watchlist snapshot");
                    ApplyOutcome::Discarded
                }
            }
            Err(e) => {
                let message = e.user_message(&op);
                tracing::debug!(seq = ticket.seq(), error = %e, "Watchlist operation failed");
                self.error = Some(message.clone());
                ApplyOutcome::Failed(message)
            }
        };

        self.settle_phase();
        outcome
    }

    /// Forget an operation whose task died without producing a result.
    pub fn abandon(&mut self, ticket: Ticket) {
        if let Some(idx) = self.pending_ops.iter().position(|(t, _)| *t == ticket) {
            self.pending_ops.remove(idx);
            self.in_flight = self.in_flight.saturating_sub(1);
            self.settle_phase();
        }
    }

    fn settle_phase(&mut self) {
        self.phase = if self.in_flight > 0 {
            Phase::Pending
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        };
    }

    /// Drop everything shown and forget every pending operation, e.g. after
    /// logout. Tickets keep increasing, so results of forgotten operations
    /// are recognised and discarded.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.error = None;
        self.phase = Phase::Idle;
        self.in_flight = 0;
        self.pending_ops.clear();
    }
}
