use crate::models::ActivityState;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "activity";

use crate::log_info;

/// What the orchestrator should schedule after an activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEffect {
    /// Went inactive: evaluate right away so the sink hears about it.
    EvaluateNow,
    /// Became (possibly) active: wait for the host page to settle first.
    EvaluateAfterSettle,
    /// Host is going away: evaluate inline before anything else runs.
    EvaluateSync,
}

/// Derives [`ActivityState`] from visibility, focus and teardown signals.
///
/// Active only while the document is visible and the window focused. A
/// pending teardown is sticky.
#[derive(Debug)]
pub struct ActivityGate {
    visible: bool,
    focused: bool,
    tearing_down: bool,
}

impl Default for ActivityGate {
    fn default() -> Self {
        Self {
            visible: true,
            focused: true,
            tearing_down: false,
        }
    }
}

impl ActivityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_activity(&self) -> ActivityState {
        if self.visible && self.focused && !self.tearing_down {
            ActivityState::Active
        } else {
            ActivityState::Inactive
        }
    }

    pub fn on_visibility_change(&mut self, hidden: bool) -> GateEffect {
        self.visible = !hidden;
        self.settle_or_now(!hidden, if hidden { "hidden" } else { "visible" })
    }

    pub fn on_focus_change(&mut self, focused: bool) -> GateEffect {
        self.focused = focused;
        self.settle_or_now(focused, if focused { "focus" } else { "blur" })
    }

    pub fn on_pending_teardown(&mut self) -> GateEffect {
        self.tearing_down = true;
        log_info!("pending teardown, now {}", self.current_activity().as_str());
        GateEffect::EvaluateSync
    }

    fn settle_or_now(&self, activating: bool, event: &str) -> GateEffect {
        log_info!("{} -> {}", event, self.current_activity().as_str());
        if activating {
            GateEffect::EvaluateAfterSettle
        } else {
            GateEffect::EvaluateNow
        }
    }
}
