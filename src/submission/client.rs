//! Lead delivery to the remote forms endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::error::SubmitError;
use super::payload::LeadPayload;
use crate::config::SubmissionConfig;

/// Destination for captured leads.
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Sink name (for logging)
    fn name(&self) -> &str;

    /// Deliver one lead. Exactly one request per call.
    async fn submit(&self, payload: &LeadPayload) -> Result<(), SubmitError>;
}

/// Posts leads as JSON to a web-forms style endpoint
pub struct WebFormsClient {
    endpoint: String,
    client: Client,
}

impl WebFormsClient {
    pub fn new(config: &SubmissionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadSink for WebFormsClient {
    fn name(&self) -> &str {
        "web-forms"
    }

    async fn submit(&self, payload: &LeadPayload) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Lead request failed");
                SubmitError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let outcome = interpret_response(&body);
        match &outcome {
            Ok(()) => tracing::info!(endpoint = %self.endpoint, %status, "Lead delivered"),
            Err(e) => tracing::warn!(
                endpoint = %self.endpoint,
                %status,
                error = %e,
                "Lead not accepted"
            ),
        }
        outcome
    }
}

/// Classify a response body. Only JSON carrying `"success": true` counts
/// as delivered; the HTTP status is not consulted.
pub fn interpret_response(body: &str) -> Result<(), SubmitError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| SubmitError::Transport(format!("unreadable response: {e}")))?;

    if value.get("success").and_then(serde_json::Value::as_bool) == Some(true) {
        return Ok(());
    }

    let reason = value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("success flag not set");
    Err(SubmitError::Rejected(reason.to_string()))
}
