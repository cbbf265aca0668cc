use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tracking::MutationDebouncer;

use super::{Orchestrator, Signal};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "notifier";

use crate::{log_info, log_warn};

/// Drive `orchestrator` until teardown, cancellation, or the signal source
/// going away. A closed source counts as teardown.
///
/// Returns once every dispatched delivery has finished.
pub async fn notifier_loop(
    mut orchestrator: Orchestrator,
    mut signals: mpsc::UnboundedReceiver<Signal>,
    cancel_token: CancellationToken,
) {
    let Some(mut settle_timers) = orchestrator.take_settle_timers() else {
        log_warn!("settle timers already claimed; refusing to run");
        return;
    };

    orchestrator.reevaluate();

    loop {
        let debounce_deadline = orchestrator.debouncer().deadline();

        tokio::select! {
            _ = cancel_token.cancelled() => {
                log_info!("notifier loop cancelled");
                break;
            }
            signal = signals.recv() => {
                let signal = signal.unwrap_or_else(|| {
                    log_info!("signal source closed, tearing down");
                    Signal::PendingTeardown
                });
                if let ControlFlow::Break(()) = orchestrator.handle_signal(signal) {
                    break;
                }
            }
            Some(()) = settle_timers.recv() => {
                orchestrator.reevaluate();
            }
            _ = MutationDebouncer::wait(debounce_deadline) => {
                if orchestrator.debouncer().take_fired() {
                    orchestrator.reevaluate();
                }
            }
        }
    }

    let pending = orchestrator.pipeline().in_flight();
    if pending > 0 {
        log_info!("waiting for {} in-flight deliveries", pending);
    }
    orchestrator.pipeline().drain().await;
    log_info!("notifier loop stopped");
}
