//! HTTP client for the agent invocation endpoint.
//!
//! Endpoint: POST {agent_url}
//! Auth: `x-api-key` header

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{AgentInvoker, AgentResponse};

/// Agent invocation client
pub struct HttpAgentClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// Request body for an agent call
#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    message: &'a str,
    agent_id: &'a str,
}

impl HttpAgentClient {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            client,
        })
    }

    /// Create from the resolved configuration
    pub fn from_config(config: &crate::config::ResolvedConfig) -> Result<Self> {
        Self::new(
            config.agent.endpoint.clone(),
            config.api_key.clone(),
            config.request_timeout(),
        )
    }
}

#[async_trait]
impl AgentInvoker for HttpAgentClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn invoke(&self, prompt: &str, agent_id: &str) -> Result<AgentResponse> {
        debug!(agent_id, endpoint = %self.endpoint, "Invoking agent");

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&InvokeRequest {
                message: prompt,
                agent_id,
            });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach agent endpoint {}", self.endpoint))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read agent response body")?;

        // Error statuses still carry a JSON envelope with an `error` field
        match serde_json::from_str::<Value>(&text) {
            Ok(payload) => Ok(AgentResponse::from_payload(payload)),
            Err(_) if status.is_success() => {
                anyhow::bail!("Agent returned a non-JSON response")
            }
            Err(_) => anyhow::bail!("Agent error ({}): {}", status, text.trim()),
        }
    }
}
