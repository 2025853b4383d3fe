use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::{error::PublishError, models::AuditEvent};

pub const LOG_ROUTING_KEY: &str = "logging-service.log";
pub const LOG_PRIORITY: u8 = 0;

/// Sink that audit events are handed to.
///
/// Shared by every dispatch task at once, so implementations must tolerate
/// concurrent calls. Retries and persistence are the implementation's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        routing_key: &str,
        event: &AuditEvent,
        priority: u8,
    ) -> Result<(), PublishError>;
}

/// Writes each event to the `audit_log::events` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

#[async_trait]
impl Publisher for TracingPublisher {
    async fn publish(
        &self,
        routing_key: &str,
        event: &AuditEvent,
        priority: u8,
    ) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;
        tracing::info!(
            target: "audit_log::events",
            routing_key,
            priority,
            payload = %payload,
            "audit_event"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    routing_key: &'a str,
    priority: u8,
    payload: &'a AuditEvent,
}

/// POSTs each event as JSON to a collector endpoint.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPublisher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(
        &self,
        routing_key: &str,
        event: &AuditEvent,
        priority: u8,
    ) -> Result<(), PublishError> {
        let envelope = Envelope {
            routing_key,
            priority,
            payload: event,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
