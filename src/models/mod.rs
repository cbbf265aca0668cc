pub mod activity;
pub mod snapshot;

pub use activity::ActivityState;
pub use snapshot::{AttributeSpec, ContextSnapshot, SnapshotSchema, NO_CASE, NO_COMPANY};
