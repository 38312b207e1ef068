//! Agent relay service
//!
//! Forwards a message plus user record to the remote reasoning agent and
//! returns its reply as an opaque payload. Single attempt per call, bounded
//! by a per-request timeout; retry policy belongs to the caller.

use crate::error::RelayError;
use crate::models::UserRecord;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for the remote agent call (seconds)
pub const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 120;

/// Opaque reply payload from the remote agent.
///
/// The relay never parses or re-encodes its content; the text passes through
/// to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply(String);

impl AgentReply {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_text(self) -> String {
        self.0
    }
}

/// HTTP relay towards the configured agent endpoint.
pub struct AgentRelay {
    client: Client,
    agent_url: String,
    timeout: Duration,
}

impl AgentRelay {
    pub fn new(agent_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            agent_url: agent_url.into(),
            timeout,
        }
    }

    /// Forward `message` and `user` to the agent, returning the raw reply.
    ///
    /// Sends `{"query": message, "user_data": user}` as JSON and waits up to
    /// the configured timeout for the full response body. No retries, no
    /// reply caching.
    pub async fn forward(
        &self,
        message: &str,
        user: &UserRecord,
    ) -> Result<AgentReply, RelayError> {
        let payload = json!({
            "query": message,
            "user_data": user,
        });

        debug!(
            url = %self.agent_url,
            message_len = message.len(),
            "Forwarding message to agent"
        );

        let response = self
            .client
            .post(&self.agent_url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(RelayError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Agent replied with error status");
            return Err(RelayError::Transport {
                status: Some(status.as_u16()),
                detail: if detail.is_empty() {
                    status.to_string()
                } else {
                    detail
                },
            });
        }

        let text = response.text().await.map_err(RelayError::from_reqwest)?;
        Ok(AgentReply(text))
    }
}
