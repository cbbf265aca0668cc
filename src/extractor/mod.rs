pub mod case_tab;

use anyhow::Result;

use crate::models::ContextSnapshot;

pub use case_tab::{CaseTabExtractor, SharedTabStrip, Tab, TabStrip};

/// Reads the observed document and reports its active context.
///
/// Must return promptly. `Ok(None)` means nothing identifiable is open; an
/// `Err` is logged by the caller and treated the same way.
pub trait Extractor: Send + Sync {
    fn extract(&self) -> Result<Option<ContextSnapshot>>;
}
