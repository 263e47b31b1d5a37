//! Relay adapter over the third-party form-delivery endpoint.
//!
//! The adapter owns a `RelayStatus` and publishes it through a
//! `tokio::sync::watch` channel; the orchestrator only ever reads it.
//!
//! Lifecycle of one submission:
//!
//! ```text
//! idle ──submit()──▶ submitting ──transport done──▶ succeeded | errors
//! ```
//!
//! `submit()` flips `submitting` to true synchronously, before the transport
//! task is spawned. Any observer therefore sees `submitting = true` before it
//! can see a terminal flag of the same cycle. A second `submit()` while a
//! delivery is in flight is rejected without touching the transport.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use strum::Display;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::form::FormInput;

/// Transport-level failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransportKind {
    Network,
    Timeout,
}

/// Structured, serializable error surfaced through `RelayStatus::errors`.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayError {
    /// The request never produced a response (offline, DNS, TLS, timeout).
    #[error("{kind} error while contacting the form relay: {message}")]
    Transport { kind: TransportKind, message: String },
    /// The provider answered with a non-2xx status.
    #[error("form relay rejected the submission (HTTP {status})")]
    Provider {
        status: u16,
        payload: serde_json::Value,
    },
}

impl RelayError {
    pub fn network(message: impl Into<String>) -> Self {
        RelayError::Transport {
            kind: TransportKind::Network,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        RelayError::Transport {
            kind: TransportKind::Timeout,
            message: message.into(),
        }
    }

    /// Build a provider rejection from a raw response body. JSON bodies are
    /// kept verbatim; anything else is wrapped as `{"body": "..."}`.
    pub fn provider(status: u16, body: &str) -> Self {
        let payload = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::json!({ "body": body }));
        RelayError::Provider { status, payload }
    }

    /// Pretty-printed diagnostics for the error modal's details block.
    ///
    /// Provider rejections show the provider's payload as-is, transport
    /// failures show the serialized error itself.
    pub fn diagnostics(&self) -> String {
        let rendered = match self {
            RelayError::Provider { payload, .. } => serde_json::to_string_pretty(payload),
            RelayError::Transport { .. } => serde_json::to_string_pretty(self),
        };
        rendered.unwrap_or_else(|_| self.to_string())
    }
}

/// Observable status of the relay adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelayStatus {
    pub submitting: bool,
    pub succeeded: bool,
    pub errors: Option<RelayError>,
    /// Monotonic submission counter; 0 means nothing was ever submitted.
    pub cycle: u64,
}

impl RelayStatus {
    fn started(cycle: u64) -> Self {
        Self {
            submitting: true,
            succeeded: false,
            errors: None,
            cycle,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.submitting && !self.succeeded && self.errors.is_none()
    }

    /// True once the cycle has finished either way.
    pub fn is_terminal(&self) -> bool {
        !self.submitting && (self.succeeded || self.errors.is_some())
    }
}

/// Reason a submit was not accepted by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight (cycle {0})")]
    InFlight(u64),
}

/// Seam to the actual delivery mechanism.
///
/// Implementations receive the full payload and resolve once the provider
/// has answered. They never retry.
pub trait RelayTransport: Send + Sync + 'static {
    fn deliver(&self, payload: FormInput) -> BoxFuture<'static, Result<(), RelayError>>;
}

/// Cloneable handle to the relay; all clones share one status.
#[derive(Clone)]
pub struct RelayAdapter {
    transport: Arc<dyn RelayTransport>,
    status_tx: Arc<watch::Sender<RelayStatus>>,
}

impl RelayAdapter {
    pub fn new(transport: impl RelayTransport) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn RelayTransport>) -> Self {
        let (status_tx, _) = watch::channel(RelayStatus::default());
        Self {
            transport,
            status_tx: Arc::new(status_tx),
        }
    }

    /// Live view of the adapter status.
    pub fn status(&self) -> watch::Receiver<RelayStatus> {
        self.status_tx.subscribe()
    }

    pub fn snapshot(&self) -> RelayStatus {
        self.status_tx.borrow().clone()
    }

    /// Publish an arbitrary status, bypassing the delivery task.
    #[cfg(test)]
    pub(crate) fn force_status(&self, status: RelayStatus) {
        self.status_tx.send_replace(status);
    }

    /// Start delivering `payload`. Must be called from within a tokio runtime.
    ///
    /// Returns the cycle number of the accepted submission.
    pub fn submit(&self, payload: FormInput) -> Result<u64, SubmitRejected> {
        let mut outcome = Err(SubmitRejected::InFlight(0));
        self.status_tx.send_if_modified(|status| {
            if status.submitting {
                outcome = Err(SubmitRejected::InFlight(status.cycle));
                return false;
            }
            let cycle = status.cycle + 1;
            *status = RelayStatus::started(cycle);
            outcome = Ok(cycle);
            true
        });

        let cycle = match outcome {
            Ok(cycle) => cycle,
            Err(rejected) => {
                warn!("relay submit rejected: {rejected}");
                return Err(rejected);
            }
        };

        info!("[relay:{cycle}] delivering contact submission");
        let delivery = self.transport.deliver(payload);
        let status_tx = Arc::clone(&self.status_tx);
        tokio::spawn(async move {
            let result = delivery.await;
            match &result {
                Ok(()) => info!("[relay:{cycle}] delivered"),
                Err(e) => warn!("[relay:{cycle}] delivery failed: {e}"),
            }
            status_tx.send_modify(|status| {
                if status.cycle != cycle {
                    debug!("[relay:{cycle}] stale completion ignored");
                    return;
                }
                status.submitting = false;
                match result {
                    Ok(()) => status.succeeded = true,
                    Err(e) => status.errors = Some(e),
                }
            });
        });

        Ok(cycle)
    }
}
