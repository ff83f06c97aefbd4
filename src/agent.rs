use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::AgentError;

pub const MAX_TOKENS: u32 = 1000;

// ─── Wire Types ─────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
    pub max_tokens: u32,
}

impl<'a> ChatRequest<'a> {
    pub fn for_query(query: &'a str) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user",
                content: query,
            }],
            stream: false,
            max_tokens: MAX_TOKENS,
        }
    }
}

// ─── Agent Client ───────────────────────────────────────────────────────────

/// Single-shot client for the hosted chat-completion agent.
#[derive(Clone, Debug)]
pub struct AgentClient {
    client: Client,
    endpoint: String,
}

impl AgentClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Send `query` to the agent and return the decoded response body.
    /// No retries: the first failure is returned as-is.
    pub async fn invoke(&self, query: &str, agent_id: &str) -> Result<Value, AgentError> {
        let body = ChatRequest::for_query(query);

        tracing::info!(endpoint = %self.endpoint, "calling agent");
        tracing::debug!(
            payload = %serde_json::to_string(&body).unwrap_or_default(),
            "agent request payload"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .bearer_auth(agent_id)
            .json(&body)
            .send()
            .await
            .map_err(AgentError::Network)?;

        let status = resp.status();
        let text = resp.text().await.map_err(AgentError::Network)?;

        tracing::info!(status = status.as_u16(), "agent responded");
        tracing::debug!(body = %text, "agent response body");

        if !status.is_success() {
            return Err(AgentError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(AgentError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_has_expected_shape() {
        let body = serde_json::to_value(ChatRequest::for_query("rust beginner projects")).unwrap();
        assert_eq!(
            body,
            json!({
                "messages": [{ "role": "user", "content": "rust beginner projects" }],
                "stream": false,
                "max_tokens": 1000
            })
        );
    }

    #[actix_web::test]
    async fn unreachable_agent_is_a_network_error() {
        // Port 1 is reserved; nothing listens there.
        let client = AgentClient::new("http://127.0.0.1:1/chat", Duration::from_secs(2)).unwrap();
        let err = client.invoke("hi", "agent").await.unwrap_err();
        assert!(matches!(err, AgentError::Network(_)), "got {err:?}");
    }
}
