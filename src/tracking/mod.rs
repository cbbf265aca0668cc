pub mod activity_gate;
pub mod change_tracker;
pub mod debouncer;

pub use activity_gate::{ActivityGate, GateEffect};
pub use change_tracker::{ChangeTracker, Decision};
pub use debouncer::MutationDebouncer;
