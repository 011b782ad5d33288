//! Normalizes raw GitHub webhook deliveries into uniform event log records.
//!
//! Each supported event kind is decoded into a typed payload up front, so a
//! delivery missing required fields fails with a deterministic
//! `MalformedPayload` instead of a lookup-time surprise.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::database::models::{EventAction, EventLogRecord};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    after: String,
    pusher: Pusher,
}

#[derive(Debug, Deserialize)]
struct Pusher {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    action: String,
    pull_request: PullRequestInfo,
}

#[derive(Debug, Deserialize)]
struct PullRequestInfo {
    id: u64,
    user: Account,
    #[serde(default)]
    merged: bool,
    merged_by: Option<Account>,
    head: BranchRef,
    base: BranchRef,
}

#[derive(Debug, Deserialize)]
struct Account {
    login: String,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: String,
}

/// Maps a webhook delivery to a uniform log record, or `None` for event
/// kinds this service does not track. Pure; never touches storage.
///
/// The record's timestamp is always assigned here from the server clock,
/// never taken from the payload.
pub fn parse_event(
    event_type: &str,
    payload: Option<&Value>,
) -> Result<Option<EventLogRecord>, AppError> {
    match event_type {
        "push" => {
            let push: PushPayload = decode(event_type, payload)?;
            let branch = push
                .git_ref
                .rsplit('/')
                .next()
                .unwrap_or(push.git_ref.as_str())
                .to_string();

            Ok(Some(EventLogRecord {
                id: None,
                request_id: push.after,
                author: push.pusher.name,
                action: EventAction::Push,
                from_branch: branch.clone(),
                to_branch: branch,
                timestamp: Utc::now(),
            }))
        }
        "pull_request" => {
            let payload: PullRequestPayload = decode(event_type, payload)?;
            let pr = payload.pull_request;

            match payload.action.as_str() {
                "opened" => Ok(Some(EventLogRecord {
                    id: None,
                    request_id: pr.id.to_string(),
                    author: pr.user.login,
                    action: EventAction::PullRequest,
                    from_branch: pr.head.name,
                    to_branch: pr.base.name,
                    timestamp: Utc::now(),
                })),
                "closed" if pr.merged => {
                    let merged_by = pr.merged_by.ok_or_else(|| {
                        AppError::MalformedPayload(
                            "merged pull_request event missing merged_by".to_string(),
                        )
                    })?;

                    Ok(Some(EventLogRecord {
                        id: None,
                        request_id: pr.id.to_string(),
                        author: merged_by.login,
                        action: EventAction::Merge,
                        from_branch: pr.head.name,
                        to_branch: pr.base.name,
                        timestamp: Utc::now(),
                    }))
                }
                // Closed without a merge, synchronize, reopened, labeled...
                _ => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

fn decode<T: DeserializeOwned>(event_type: &str, payload: Option<&Value>) -> Result<T, AppError> {
    let value = payload.ok_or_else(|| {
        AppError::MalformedPayload(format!("{} event carried no JSON body", event_type))
    })?;

    serde_json::from_value(value.clone())
        .map_err(|e| AppError::MalformedPayload(format!("invalid {} payload: {}", event_type, e)))
}
