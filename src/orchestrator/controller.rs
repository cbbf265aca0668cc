use anyhow::{anyhow, bail, Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::notifier_loop;
use super::{Orchestrator, Signal};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "controller";

use crate::log_info;

/// Cloneable sender side for the raw signal sources.
#[derive(Debug, Clone)]
pub struct NotifierHandle {
    tx: mpsc::UnboundedSender<Signal>,
}

impl NotifierHandle {
    /// A detached handle plus its receiving end, for driving
    /// [`notifier_loop`] directly.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Signal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, signal: Signal) -> Result<()> {
        self.tx
            .send(signal)
            .map_err(|_| anyhow!("notifier loop is not running"))
    }

    pub fn mutation(&self) -> Result<()> {
        self.send(Signal::Mutation)
    }

    pub fn visibility(&self, hidden: bool) -> Result<()> {
        self.send(Signal::Visibility { hidden })
    }

    pub fn focus(&self, focused: bool) -> Result<()> {
        self.send(Signal::Focus { focused })
    }

    pub fn teardown(&self) -> Result<()> {
        self.send(Signal::PendingTeardown)
    }
}

pub struct NotifierController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl Default for NotifierController {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifierController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Spawn the notifier loop. The initial evaluation runs as soon as the
    /// task is scheduled.
    pub fn start(&mut self, orchestrator: Orchestrator) -> Result<NotifierHandle> {
        if self.handle.is_some() {
            bail!("notifier already running");
        }

        let cancel_token = CancellationToken::new();
        let (signals, rx) = NotifierHandle::channel();

        let handle = tokio::spawn(notifier_loop(orchestrator, rx, cancel_token.clone()));
        log_info!("notifier started");

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(signals)
    }

    /// Wait for the loop to end on its own (teardown or closed source).
    pub async fn wait(&mut self) -> Result<()> {
        self.cancel_token = None;
        match self.handle.take() {
            Some(handle) => handle.await.context("notifier loop task failed to join"),
            None => Ok(()),
        }
    }

    /// Cancel the loop without a final evaluation and wait for it.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.wait().await
    }
}
