use crate::models::ContextSnapshot;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "tracker";

use crate::{log_debug, log_info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Notify(ContextSnapshot),
    Suppress,
}

/// Holds the last snapshot handed to the delivery pipeline.
///
/// The record is replaced before delivery is attempted and is never rolled
/// back, so a failed delivery leaves the sink stale until the next change.
/// `evaluate` takes `&mut self`; the orchestrator task is the only owner, which
/// makes compare-and-replace exclusive even on a multi-threaded runtime.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    record: Option<ContextSnapshot>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, candidate: ContextSnapshot) -> Decision {
        if self.record.as_ref() == Some(&candidate) {
            log_debug!("suppressed unchanged context {:?}", candidate.identifier);
            return Decision::Suppress;
        }

        log_info!(
            "context changed {:?} -> {:?}",
            self.record.as_ref().and_then(|r| r.identifier.as_deref()),
            candidate.identifier
        );
        self.record = Some(candidate.clone());
        Decision::Notify(candidate)
    }

    pub fn last_notified(&self) -> Option<&ContextSnapshot> {
        self.record.as_ref()
    }
}
