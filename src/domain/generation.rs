//! Lifecycle state for the two generation flows.

use serde::{Deserialize, Serialize};

/// Which agent a flow talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Content marketing manager: copy plus SEO analysis
    Content,

    /// Graphic designer: marketing visuals
    Graphic,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Content => write!(f, "content"),
            AgentRole::Graphic => write!(f, "graphic"),
        }
    }
}

/// State of one generation flow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum GenerationStatus {
    /// Nothing requested yet
    #[default]
    Idle,

    /// Waiting on the agent
    Running,

    /// Last call produced a result
    Succeeded,

    /// Last call failed; the caller may invoke again
    Failed { error: String },
}

impl GenerationStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, GenerationStatus::Running)
    }

    /// Error message of a failed flow
    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Best-effort "which agent is working" indicator shared by both flows.
///
/// Reports the most recently started call that has not completed yet. Not a
/// lock: both flows may be in flight at once.
#[derive(Debug, Default)]
pub struct ActivityIndicator {
    next_ticket: u64,
    in_flight: Vec<(u64, AgentRole)>,
}

/// Handle for one in-flight call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityTicket(u64);

impl ActivityIndicator {
    pub fn start(&mut self, role: AgentRole) -> ActivityTicket {
        self.next_ticket += 1;
        self.in_flight.push((self.next_ticket, role));
        ActivityTicket(self.next_ticket)
    }

    pub fn finish(&mut self, ticket: ActivityTicket) {
        self.in_flight.retain(|(t, _)| *t != ticket.0);
    }

    pub fn current(&self) -> Option<AgentRole> {
        self.in_flight.last().map(|(_, role)| *role)
    }
}
