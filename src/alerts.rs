//! Operator alerts for worker outages
//!
//! When the proxy cannot reach the worker, or the worker does not answer in
//! time, every configured webhook receives an [`AlertPayload`]. Delivery is
//! fire-and-forget; a failing webhook is logged and otherwise ignored.

use crate::config::{AlertConfig, WebhookConfig};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What went wrong with the worker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// The worker refused or never accepted the connection
    Unreachable,
    /// The worker accepted the request but exceeded the deadline
    Timeout,
}

impl AlertKind {
    /// Alert kind for a proxy-side error, if the error warrants one
    pub fn for_error(error: &Error) -> Option<Self> {
        match error {
            Error::UpstreamUnreachable { .. } => Some(AlertKind::Unreachable),
            Error::UpstreamTimeout { .. } => Some(AlertKind::Timeout),
            _ => None,
        }
    }
}

/// Body posted to each webhook
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPayload {
    /// Failure kind
    pub kind: AlertKind,
    /// Worker base URL the proxy was talking to
    pub worker_url: String,
    /// Human-readable detail
    pub message: String,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
}

/// Sends [`AlertPayload`]s to the configured webhooks
#[derive(Clone, Debug)]
pub struct AlertNotifier {
    webhooks: Arc<[WebhookConfig]>,
    client: reqwest::Client,
}

impl AlertNotifier {
    /// Create a notifier for the configured webhooks
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            webhooks: config.webhooks.clone().into(),
            client: reqwest::Client::new(),
        }
    }

    /// A notifier that never sends anything
    pub fn disabled() -> Self {
        Self::new(&AlertConfig::default())
    }

    /// Whether any webhook is configured
    pub fn is_enabled(&self) -> bool {
        !self.webhooks.is_empty()
    }

    /// Post an alert to every webhook in the background.
    ///
    /// Returns the delivery task, or `None` when no webhook is configured.
    /// Callers normally drop the handle.
    pub fn notify(
        &self,
        kind: AlertKind,
        worker_url: &str,
        message: impl Into<String>,
    ) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            return None;
        }

        let payload = Arc::new(AlertPayload {
            kind,
            worker_url: worker_url.to_string(),
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp(),
        });
        let webhooks = self.webhooks.clone();
        let client = self.client.clone();

        tracing::info!(kind = ?kind, worker_url = %worker_url, webhooks = webhooks.len(), "Sending worker alert");

        Some(tokio::spawn(async move {
            for webhook in webhooks.iter() {
                let mut request = client
                    .post(&webhook.url)
                    .json(payload.as_ref())
                    .timeout(webhook.timeout);

                if let Some(auth) = &webhook.auth_header {
                    request = request.header("Authorization", auth);
                }

                match tokio::time::timeout(webhook.timeout, request.send()).await {
                    Ok(Ok(response)) if response.status().is_success() => {
                        tracing::debug!(url = %webhook.url, "alert sent successfully");
                    }
                    Ok(Ok(response)) => {
                        tracing::warn!(
                            url = %webhook.url,
                            status = %response.status(),
                            "alert webhook rejected the alert"
                        );
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(url = %webhook.url, error = %e, "alert webhook failed");
                    }
                    Err(_) => {
                        tracing::warn!(
                            url = %webhook.url,
                            timeout = ?webhook.timeout,
                            "alert webhook timed out"
                        );
                    }
                }
            }
        }))
    }

    /// Alert for `error` if it is a worker outage
    pub fn notify_for_error(&self, error: &Error, worker_url: &str) -> Option<JoinHandle<()>> {
        let kind = AlertKind::for_error(error)?;
        self.notify(kind, worker_url, error.to_string())
    }
}
