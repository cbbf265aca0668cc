//! Case number extraction from a console tab strip.
//!
//! The active case lives in the selected tab whose title reads
//! `"<digits> | Case"`. The tab's account line, when the host exposes one,
//! becomes the `company` attribute.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::Extractor;
use crate::models::ContextSnapshot;

const CASE_TITLE_MARKER: &str = "| Case";
const CASE_TITLE_PATTERN: &str = r"^(\d+)\s*\|\s*Case$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub title: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub account: Option<String>,
}

pub trait TabStrip: Send + Sync {
    fn tabs(&self) -> Result<Vec<Tab>>;
}

/// Tab strip state pushed in by the event bridge.
#[derive(Debug, Clone, Default)]
pub struct SharedTabStrip {
    tabs: Arc<Mutex<Vec<Tab>>>,
}

impl SharedTabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, tabs: Vec<Tab>) -> Result<()> {
        let mut guard = self
            .tabs
            .lock()
            .map_err(|_| anyhow!("tab strip lock poisoned"))?;
        *guard = tabs;
        Ok(())
    }
}

impl TabStrip for SharedTabStrip {
    fn tabs(&self) -> Result<Vec<Tab>> {
        self.tabs
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| anyhow!("tab strip lock poisoned"))
    }
}

pub struct CaseTabExtractor<S> {
    strip: S,
    pattern: Regex,
}

impl<S: TabStrip> CaseTabExtractor<S> {
    pub fn new(strip: S) -> Result<Self> {
        let pattern = Regex::new(CASE_TITLE_PATTERN).context("invalid case title pattern")?;
        Ok(Self { strip, pattern })
    }

    fn case_number<'a>(&self, title: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl<S: TabStrip> Extractor for CaseTabExtractor<S> {
    fn extract(&self) -> Result<Option<ContextSnapshot>> {
        let tabs = self.strip.tabs()?;
        let Some(active) = tabs
            .iter()
            .find(|tab| tab.selected && tab.title.contains(CASE_TITLE_MARKER))
        else {
            return Ok(None);
        };

        let Some(number) = self.case_number(&active.title) else {
            return Ok(None);
        };

        let company = active
            .account
            .as_deref()
            .map(str::trim)
            .filter(|account| !account.is_empty());

        Ok(Some(
            ContextSnapshot::new(number).with_attribute("company", company),
        ))
    }
}
