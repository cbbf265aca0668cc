use tokio::time::{sleep_until, Duration, Instant};

/// Trailing-edge debounce for tree mutation signals.
///
/// Every `signal` pushes the deadline out to `now + quiet_window`, replacing
/// whatever was pending. There is no max-wait: a tree that never goes quiet
/// never fires.
#[derive(Debug)]
pub struct MutationDebouncer {
    quiet_window: Duration,
    deadline: Option<Instant>,
}

impl MutationDebouncer {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            deadline: None,
        }
    }

    pub fn signal(&mut self) {
        self.deadline = Some(Instant::now() + self.quiet_window);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm after the deadline was reached. Returns whether it was armed.
    pub fn take_fired(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Resolves at `deadline`, or never when nothing is pending.
    ///
    /// Takes the deadline by value so a `select!` loop can rebuild the timer
    /// each turn without borrowing the debouncer.
    pub async fn wait(deadline: Option<Instant>) {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
