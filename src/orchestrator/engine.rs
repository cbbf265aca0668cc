use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::delivery::{DeliveryOutcome, DeliveryPipeline, Transport};
use crate::extractor::Extractor;
use crate::models::{ActivityState, ContextSnapshot, SnapshotSchema};
use crate::settings::NotifierSettings;
use crate::tracking::{ActivityGate, ChangeTracker, Decision, GateEffect, MutationDebouncer};

use super::Signal;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "orchestrator";

use crate::{log_debug, log_warn};

/// Owns the tracking state and runs re-evaluation.
///
/// Exactly one task drives an `Orchestrator`, so every `reevaluate` call is
/// sequential and the tracker's compare-and-replace needs no lock.
pub struct Orchestrator {
    extractor: Box<dyn Extractor>,
    gate: ActivityGate,
    tracker: ChangeTracker,
    debouncer: MutationDebouncer,
    pipeline: DeliveryPipeline,
    schema: SnapshotSchema,
    settle_delay: Duration,
    settle_tx: mpsc::UnboundedSender<()>,
    settle_rx: Option<mpsc::UnboundedReceiver<()>>,
}

impl Orchestrator {
    pub fn new(
        settings: &NotifierSettings,
        extractor: Box<dyn Extractor>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let pipeline = DeliveryPipeline::new(
            transport,
            settings.schema.clone(),
            &settings.identifier_field,
            settings.delivery_timeout(),
        );
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();

        Self {
            extractor,
            gate: ActivityGate::new(),
            tracker: ChangeTracker::new(),
            debouncer: MutationDebouncer::new(settings.quiet_window()),
            pipeline,
            schema: settings.schema.clone(),
            settle_delay: settings.settle_delay(),
            settle_tx,
            settle_rx: Some(settle_rx),
        }
    }

    pub fn activity(&self) -> ActivityState {
        self.gate.current_activity()
    }

    pub fn last_notified(&self) -> Option<&ContextSnapshot> {
        self.tracker.last_notified()
    }

    pub fn pipeline(&self) -> &DeliveryPipeline {
        &self.pipeline
    }

    pub(crate) fn debouncer(&mut self) -> &mut MutationDebouncer {
        &mut self.debouncer
    }

    /// Receiver for settle-delay expiries. Yields once.
    pub(crate) fn take_settle_timers(&mut self) -> Option<mpsc::UnboundedReceiver<()>> {
        self.settle_rx.take()
    }

    /// The snapshot the tracker should see right now.
    pub fn candidate(&self) -> ContextSnapshot {
        if self.gate.current_activity() == ActivityState::Inactive {
            return self.schema.sentinel();
        }

        match self.extractor.extract() {
            Ok(Some(snapshot)) if snapshot.identifier.is_some() => snapshot,
            Ok(_) => self.schema.sentinel(),
            Err(err) => {
                log_warn!("extraction failed, treating as no context: {:#}", err);
                self.schema.sentinel()
            }
        }
    }

    /// Compare the current candidate with the last notification and dispatch
    /// a delivery when it changed. The returned handle may be ignored.
    pub fn reevaluate(&mut self) -> Option<JoinHandle<DeliveryOutcome>> {
        let candidate = self.candidate();
        match self.tracker.evaluate(candidate) {
            Decision::Notify(snapshot) => Some(self.pipeline.deliver(&snapshot)),
            Decision::Suppress => None,
        }
    }

    /// Route one external signal. `Break` after pending teardown.
    pub fn handle_signal(&mut self, signal: Signal) -> ControlFlow<()> {
        log_debug!("signal {:?}", signal);
        let effect = match signal {
            Signal::Mutation => {
                self.debouncer.signal();
                return ControlFlow::Continue(());
            }
            Signal::Visibility { hidden } => self.gate.on_visibility_change(hidden),
            Signal::Focus { focused } => self.gate.on_focus_change(focused),
            Signal::PendingTeardown => self.gate.on_pending_teardown(),
        };

        match effect {
            GateEffect::EvaluateNow => {
                self.reevaluate();
                ControlFlow::Continue(())
            }
            GateEffect::EvaluateAfterSettle => {
                self.schedule_settle();
                ControlFlow::Continue(())
            }
            GateEffect::EvaluateSync => {
                self.reevaluate();
                ControlFlow::Break(())
            }
        }
    }

    // Settle timers are never cancelled; rapid toggling can queue several.
    fn schedule_settle(&self) {
        let tx = self.settle_tx.clone();
        let delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::delivery::Payload;
    use crate::models::{NO_CASE, NO_COMPANY};

    struct ScriptedExtractor {
        script: Mutex<VecDeque<Result<Option<ContextSnapshot>>>>,
        fallback: Option<ContextSnapshot>,
    }

    impl ScriptedExtractor {
        fn always(snapshot: Option<ContextSnapshot>) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: snapshot,
            }
        }

        fn then(self, step: Result<Option<ContextSnapshot>>) -> Self {
            self.script.lock().unwrap().push_back(step);
            self
        }
    }

    impl Extractor for ScriptedExtractor {
        fn extract(&self) -> Result<Option<ContextSnapshot>> {
            match self.script.lock().unwrap().pop_front() {
                Some(step) => step,
                None => Ok(self.fallback.clone()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Payload>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, payload: &Payload) -> Result<u16> {
            self.sent.lock().unwrap().push(payload.clone());
            Ok(200)
        }
    }

    fn acme() -> ContextSnapshot {
        ContextSnapshot::new("00012345").with_attribute("company", Some("Acme"))
    }

    fn orchestrator(extractor: ScriptedExtractor) -> (Orchestrator, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let orchestrator = Orchestrator::new(
            &NotifierSettings::default(),
            Box::new(extractor),
            transport.clone(),
        );
        (orchestrator, transport)
    }

    #[tokio::test]
    async fn inactive_forces_sentinel() {
        let (mut orchestrator, transport) = orchestrator(ScriptedExtractor::always(Some(acme())));
        orchestrator.reevaluate().unwrap().await.unwrap();

        assert_eq!(orchestrator.activity(), ActivityState::Active);
        let flow = orchestrator.handle_signal(Signal::Visibility { hidden: true });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(orchestrator.activity(), ActivityState::Inactive);
        assert_eq!(orchestrator.candidate().identifier.as_deref(), Some(NO_CASE));
        assert!(orchestrator.reevaluate().is_none());

        orchestrator.pipeline().drain().await;
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].get("case_number"), Some(NO_CASE));
        assert_eq!(sent[1].get("company"), Some(NO_COMPANY));
    }

    #[tokio::test]
    async fn extraction_error_folds_into_sentinel() {
        let extractor = ScriptedExtractor::always(Some(acme())).then(Err(anyhow!("boom")));
        let (mut orchestrator, _transport) = orchestrator(extractor);

        assert!(orchestrator.reevaluate().is_some());
        assert_eq!(
            orchestrator.last_notified(),
            Some(&SnapshotSchema::default().sentinel())
        );
        assert!(orchestrator.reevaluate().is_some());
        assert_eq!(orchestrator.last_notified(), Some(&acme()));
    }

    #[tokio::test]
    async fn snapshot_without_identifier_is_sentinel() {
        let unidentified = ContextSnapshot::default().with_attribute("company", Some("Acme"));
        let (orchestrator, _transport) = orchestrator(ScriptedExtractor::always(Some(unidentified)));
        assert_eq!(orchestrator.candidate(), SnapshotSchema::default().sentinel());
    }

    #[tokio::test]
    async fn mutation_only_arms_debouncer() {
        let (mut orchestrator, transport) = orchestrator(ScriptedExtractor::always(Some(acme())));
        assert_eq!(orchestrator.handle_signal(Signal::Mutation), ControlFlow::Continue(()));
        assert!(orchestrator.debouncer().is_pending());
        assert!(orchestrator.last_notified().is_none());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn teardown_evaluates_inline_and_breaks() {
        let (mut orchestrator, transport) = orchestrator(ScriptedExtractor::always(Some(acme())));
        orchestrator.reevaluate();

        assert_eq!(orchestrator.handle_signal(Signal::PendingTeardown), ControlFlow::Break(()));
        assert!(SnapshotSchema::default().is_sentinel(orchestrator.last_notified().unwrap()));

        orchestrator.pipeline().drain().await;
        assert_eq!(transport.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn teardown_when_already_sentinel_sends_nothing() {
        let (mut orchestrator, transport) = orchestrator(ScriptedExtractor::always(None));
        orchestrator.reevaluate();
        orchestrator.handle_signal(Signal::PendingTeardown);

        orchestrator.pipeline().drain().await;
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }
}
