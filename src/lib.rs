pub mod bridge;
pub mod delivery;
pub mod extractor;
pub mod models;
pub mod orchestrator;
pub mod settings;
pub mod tracking;
pub mod utils;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;

use delivery::HttpTransport;
use extractor::{CaseTabExtractor, SharedTabStrip};
use orchestrator::{NotifierController, Orchestrator};
use settings::SettingsStore;

pub const DEFAULT_SETTINGS_FILE: &str = "casewatch.json";

/// Watch tab events on stdin and notify the configured endpoint until the
/// host tears down or stdin closes.
pub async fn run(settings_path: &Path) -> Result<()> {
    utils::logging::init(utils::logging::debug_requested());

    log::info!("casewatch starting up...");

    let settings = SettingsStore::load(settings_path)?;
    log::info!(
        "notifying {} (quiet window {}ms, settle {}ms, timeout {}ms)",
        settings.endpoint,
        settings.quiet_window_ms,
        settings.settle_delay_ms,
        settings.delivery_timeout_ms
    );

    let transport = HttpTransport::new(&settings.endpoint)?;
    let strip = SharedTabStrip::new();
    let extractor = CaseTabExtractor::new(strip.clone())?;
    let orchestrator = Orchestrator::new(&settings, Box::new(extractor), Arc::new(transport));

    let mut controller = NotifierController::new();
    let notifier = controller.start(orchestrator)?;

    let stdin = BufReader::new(tokio::io::stdin());
    let bridge_result = bridge::run_bridge(stdin, strip, notifier).await;

    controller.wait().await?;
    bridge_result.context("event bridge failed")
}
