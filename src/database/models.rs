use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventAction {
    Push,
    PullRequest,
    Merge,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Push => "PUSH",
            EventAction::PullRequest => "PULL_REQUEST",
            EventAction::Merge => "MERGE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PUSH" => Some(EventAction::Push),
            "PULL_REQUEST" => Some(EventAction::PullRequest),
            "MERGE" => Some(EventAction::Merge),
            _ => None,
        }
    }
}

/// Uniform log document produced from a GitHub webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogRecord {
    /// Opaque storage identifier; only present on records read back from the
    /// database, never on freshly normalized events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub request_id: String,
    pub author: String,
    pub action: EventAction,
    pub from_branch: String,
    pub to_branch: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretRecord {
    pub secret: String,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
