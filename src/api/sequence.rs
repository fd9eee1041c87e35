//! Request sequencing shared by the watchlist and recommendation views.
use crate::config::Consistency;

/// Identifies one issued operation. Tickets are handed out in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Issues tickets and decides whether a resolved response may be displayed.
#[derive(Debug, Clone)]
pub(crate) struct Sequencer {
    policy: Consistency,
    next: u64,
    applied: Option<u64>,
}

impl Sequencer {
    pub(crate) fn new(policy: Consistency) -> Self {
        Self {
            policy,
            next: 0,
            applied: None,
        }
    }

    pub(crate) fn issue(&mut self) -> Ticket {
        self.next += 1;
        Ticket(self.next)
    }

    /// Record `ticket` as displayed if the policy allows it.
    ///
    /// Under `LastResponse` every response is admitted. Under `LatestRequest`
    /// a response is refused once a later ticket has been displayed.
    pub(crate) fn admit(&mut self, ticket: Ticket) -> bool {
        if self.policy == Consistency::LatestRequest
            && self.applied.is_some_and(|applied| ticket.0 < applied)
        {
            return false;
        }
        self.applied = Some(self.applied.map_or(ticket.0, |a| a.max(ticket.0)));
        true
    }

    pub(crate) fn policy(&self) -> Consistency {
        self.policy
    }
}
