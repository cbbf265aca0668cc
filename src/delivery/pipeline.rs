use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::models::{ContextSnapshot, SnapshotSchema};

use super::payload::Payload;
use super::transport::Transport;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "delivery";

use crate::{log_error, log_info, log_warn};

/// Terminal result of one delivery attempt. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    /// The sink answered, but not with a 2xx.
    Rejected { status: u16 },
    TransportError(String),
    TimedOut,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Fire-and-forget delivery of decided transitions.
///
/// One request per call, bounded by `timeout`. No retry, no queue, and
/// the caller's recorded state is never touched on failure.
#[derive(Clone)]
pub struct DeliveryPipeline {
    transport: Arc<dyn Transport>,
    schema: Arc<SnapshotSchema>,
    identifier_field: Arc<str>,
    timeout: Duration,
    in_flight: TaskTracker,
}

impl DeliveryPipeline {
    pub fn new(
        transport: Arc<dyn Transport>,
        schema: SnapshotSchema,
        identifier_field: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            schema: Arc::new(schema),
            identifier_field: Arc::from(identifier_field),
            timeout,
            in_flight: TaskTracker::new(),
        }
    }

    pub fn payload_for(&self, snapshot: &ContextSnapshot) -> Payload {
        Payload::from_snapshot(snapshot, &self.schema, &self.identifier_field)
    }

    /// Dispatch in the background. Callers are free to drop the handle.
    pub fn deliver(&self, snapshot: &ContextSnapshot) -> JoinHandle<DeliveryOutcome> {
        let payload = self.payload_for(snapshot);
        let pipeline = self.clone();
        self.in_flight
            .spawn(async move { pipeline.attempt(payload).await })
    }

    pub async fn attempt(&self, payload: Payload) -> DeliveryOutcome {
        let attempt_id = Uuid::new_v4();
        let dispatched_at = Utc::now();
        let started = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, self.transport.send(&payload)).await
        {
            Ok(Ok(status)) if (200..300).contains(&status) => DeliveryOutcome::Delivered { status },
            Ok(Ok(status)) => DeliveryOutcome::Rejected { status },
            Ok(Err(err)) => DeliveryOutcome::TransportError(format!("{:#}", err)),
            Err(_) => DeliveryOutcome::TimedOut,
        };

        let elapsed_ms = started.elapsed().as_millis();
        match &outcome {
            DeliveryOutcome::Delivered { status } => log_info!(
                "attempt {} delivered {} (HTTP {}, {}ms, dispatched {})",
                attempt_id,
                payload,
                status,
                elapsed_ms,
                dispatched_at.to_rfc3339()
            ),
            DeliveryOutcome::Rejected { status } => log_error!(
                "attempt {} rejected by sink (HTTP {}) payload={} dispatched {}",
                attempt_id,
                status,
                payload,
                dispatched_at.to_rfc3339()
            ),
            DeliveryOutcome::TransportError(err) => log_error!(
                "attempt {} transport error: {} payload={} dispatched {}",
                attempt_id,
                err,
                payload,
                dispatched_at.to_rfc3339()
            ),
            DeliveryOutcome::TimedOut => log_warn!(
                "attempt {} timed out after {}ms payload={} dispatched {}",
                attempt_id,
                self.timeout.as_millis(),
                payload,
                dispatched_at.to_rfc3339()
            ),
        }

        outcome
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait for every dispatched attempt to finish. Each is bounded by the
    /// delivery timeout.
    pub async fn drain(&self) {
        self.in_flight.close();
        self.in_flight.wait().await;
        self.in_flight.reopen();
    }
}
