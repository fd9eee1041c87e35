//! Title-keyed recommendation lookup and the state of the results view.
use super::error::ApiError;
use super::gateway::Gateway;
use super::sequence::{Sequencer, Ticket};
use crate::config::Consistency;

const RECOMMENDATIONS_PATH: &str = "api/recommendations";

pub const RECOMMENDATIONS_FALLBACK: &str = "Something went wrong";
const BLANK_TITLE: &str = "Please enter a movie title";

#[derive(Clone)]
pub struct RecommendationsClient {
    gateway: Gateway,
}

impl RecommendationsClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /api/recommendations?title=...`. Requires a session.
    pub async fn fetch(&self, title: &str) -> Result<Vec<String>, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation(BLANK_TITLE));
        }
        self.gateway.tokens().require()?;

        let titles: Vec<String> = self
            .gateway
            .get(RECOMMENDATIONS_PATH, &[("title", title)])
            .await?;
        tracing::debug!(count = titles.len(), "Recommendations received");
        Ok(titles)
    }
}

/// Displayed results for the recommendations view.
///
/// Each submission clears the previous results and error. Submissions are
/// never cancelled; the consistency policy decides whether a late response
/// from an older submission may still overwrite the view.
#[derive(Debug, Clone)]
pub struct RecommendationQuery {
    results: Vec<String>,
    error: Option<String>,
    in_flight: usize,
    sequencer: Sequencer,
}

impl RecommendationQuery {
    pub fn new(policy: Consistency) -> Self {
        Self {
            results: Vec::new(),
            error: None,
            in_flight: 0,
            sequencer: Sequencer::new(policy),
        }
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a submission for `title`.
    ///
    /// Returns `None` when the title is blank: the validation message is set
    /// and no request should be issued.
    pub fn begin(&mut self, title: &str) -> Option<Ticket> {
        self.results.clear();
        self.error = None;

        if title.trim().is_empty() {
            self.error = Some(BLANK_TITLE.to_string());
            return None;
        }

        self.in_flight += 1;
        Some(self.sequencer.issue())
    }

    /// Clear the view and forget outstanding submissions, e.g. after logout.
    /// The ticket sequence continues, so old tickets never alias new ones.
    pub fn reset(&mut self) {
        self.results.clear();
        self.error = None;
        self.in_flight = 0;
    }

    /// Forget a submission whose task died without producing a result.
    pub fn abandon(&mut self, ticket: Ticket) {
        tracing::debug!(seq = ticket.seq(), "Recommendation request abandoned");
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Install the outcome of a submission. Returns false if it was discarded.
    pub fn apply(&mut self, ticket: Ticket, result: Result<Vec<String>, ApiError>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if !self.sequencer.admit(ticket) {
            tracing::debug!(seq = ticket.seq(), "Discarding superseded recommendations");
            return false;
        }

        match result {
            Ok(titles) => {
                self.results = titles;
                self.error = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Recommendation request failed");
                self.results.clear();
                self.error = Some(e.user_message(RECOMMENDATIONS_FALLBACK));
            }
        }
        true
    }
}
