use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tokio::time::Duration;

use crate::models::SnapshotSchema;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "settings";

use crate::{log_info, log_warn};

pub const ENDPOINT_ENV: &str = "CASEWATCH_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierSettings {
    pub endpoint: String,
    pub quiet_window_ms: u64,
    pub settle_delay_ms: u64,
    pub delivery_timeout_ms: u64,
    pub identifier_field: String,
    pub schema: SnapshotSchema,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/".into(),
            quiet_window_ms: 500,
            settle_delay_ms: 300,
            delivery_timeout_ms: 5_000,
            identifier_field: "case_number".into(),
            schema: SnapshotSchema::default(),
        }
    }
}

impl NotifierSettings {
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.quiet_window_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }
}

pub struct SettingsStore;

impl SettingsStore {
    /// Read settings from `path`, then apply the endpoint override.
    ///
    /// A missing file means defaults. A file that exists but does not parse
    /// also means defaults, with a warning.
    pub fn load(path: &Path) -> Result<NotifierSettings> {
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(parsed) => {
                    log_info!("settings loaded from {}", path.display());
                    parsed
                }
                Err(err) => {
                    log_warn!(
                        "ignoring malformed settings in {}: {}",
                        path.display(),
                        err
                    );
                    NotifierSettings::default()
                }
            }
        } else {
            NotifierSettings::default()
        };

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                settings.endpoint = endpoint.trim().to_string();
            }
        }

        Ok(settings)
    }
}
