//! Newline-delimited JSON event bridge.
//!
//! A host-side shim writes one event per line:
//! ```text
//! {"type":"tabs","tabs":[{"title":"00012345 | Case","selected":true,"account":"Acme"}]}
//! {"type":"mutation"}
//! {"type":"visibility","hidden":true}
//! {"type":"focus","focused":false}
//! {"type":"teardown"}
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::extractor::{SharedTabStrip, Tab};
use crate::orchestrator::{NotifierHandle, Signal};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "bridge";

use crate::{log_info, log_warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    Tabs { tabs: Vec<Tab> },
    Mutation,
    Visibility { hidden: bool },
    Focus { focused: bool },
    Teardown,
}

/// Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<BridgeEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .context("malformed bridge event")
}

/// Forward events from `reader` until teardown or end of input.
///
/// Tab updates replace `strip` and count as a mutation. End of input is
/// forwarded as pending teardown.
pub async fn run_bridge<R>(mut reader: R, strip: SharedTabStrip, notifier: NotifierHandle) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("failed to read bridge input")?;
        if read == 0 {
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(err) => {
                log_warn!("skipping line that is not UTF-8: {}", err);
                continue;
            }
        };

        let event = match parse_line(line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                log_warn!("skipping line: {:#}", err);
                continue;
            }
        };

        let signal = match event {
            BridgeEvent::Tabs { tabs } => {
                strip.replace(tabs)?;
                Signal::Mutation
            }
            BridgeEvent::Mutation => Signal::Mutation,
            BridgeEvent::Visibility { hidden } => Signal::Visibility { hidden },
            BridgeEvent::Focus { focused } => Signal::Focus { focused },
            BridgeEvent::Teardown => {
                notifier.send(Signal::PendingTeardown)?;
                return Ok(());
            }
        };

        notifier.send(signal)?;
    }

    log_info!("bridge input closed");
    // The loop may already be gone if it was cancelled.
    let _ = notifier.send(Signal::PendingTeardown);
    Ok(())
}
